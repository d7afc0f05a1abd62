//! orgchart-console CLI
//!
//! Serves the admin console, or queries the backend directly from the terminal.

use std::collections::HashSet;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use orgchart_console::config::API_URL_ENV;
use orgchart_console::{connect, load_config, tree, Config};
use tracing::Level;

#[derive(Parser)]
#[command(name = "orgchart-console")]
#[command(about = "Admin console for the org chart backend")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend API base URL (overrides environment and config file)
    #[arg(long)]
    api_url: Option<String>,

    /// Console port (overrides config file)
    #[arg(long)]
    port: Option<u16>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the console (default)
    Serve,
    /// Print the reporting tree under an employee
    Tree {
        /// Root employee id
        root: u64,
        /// Node ids whose subtrees are hidden
        #[arg(long)]
        collapse: Vec<u64>,
    },
    /// Check whether the backend is reachable
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, api_url={:?}, port={:?}, log_level={:?}",
        args.config,
        args.api_url,
        args.port,
        args.log_level
    );

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    config.apply_api_url(args.api_url.clone(), std::env::var(API_URL_ENV).ok());
    if let Some(port) = args.port {
        config.console.port = port;
    }
    config.validate()?;

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            tracing::info!("Starting orgchart console");
            orgchart_console::run(config).await?;
        }
        Command::Tree { root, collapse } => {
            let api = connect(&config);
            let node = api.employee_tree(root).await?;
            let collapsed: HashSet<u64> = collapse.into_iter().collect();
            print!("{}", tree::render_text(&node, &collapsed));
        }
        Command::Health => {
            let api = connect(&config);
            match api.check_health().await {
                Ok(payload) => println!("Backend connected at {}: {}", api.base_url(), payload),
                Err(e) => {
                    println!("Cannot reach backend at {}.", api.base_url());
                    return Err(e.into());
                }
            }
        }
    }

    Ok(())
}

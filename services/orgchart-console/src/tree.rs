//! Reporting-line tree viewer
//!
//! The backend computes the subtree; the viewer only fetches it, tracks which
//! nodes are collapsed, and renders it. Selecting a new root cancels any
//! fetch still in flight for an earlier selection.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;

use crate::api::OrgChartApi;
use crate::model::{Employee, TreeNode};

/// Marker shown in front of a node
pub fn node_marker(node: &TreeNode, collapsed: &HashSet<u64>) -> &'static str {
    if !node.has_children() {
        "•"
    } else if collapsed.contains(&node.id) {
        "+"
    } else {
        "−"
    }
}

/// Title and team line under a node's name
pub fn node_subtitle(node: &TreeNode) -> String {
    match node.team.as_deref().filter(|t| !t.is_empty()) {
        Some(team) if node.title.is_empty() => format!("· {}", team),
        Some(team) => format!("{} · {}", node.title, team),
        None => node.title.clone(),
    }
}

/// Render a subtree as indented text, two spaces per level.
/// Children of collapsed nodes are skipped.
pub fn render_text(node: &TreeNode, collapsed: &HashSet<u64>) -> String {
    let mut out = String::new();
    write_text(&mut out, node, collapsed, 0);
    out
}

fn write_text(out: &mut String, node: &TreeNode, collapsed: &HashSet<u64>, depth: usize) {
    let subtitle = node_subtitle(node);
    let _ = write!(
        out,
        "{:indent$}{} {}",
        "",
        node_marker(node, collapsed),
        node.name,
        indent = depth * 2
    );
    if !subtitle.is_empty() {
        let _ = write!(out, " ({})", subtitle);
    }
    out.push('\n');
    if collapsed.contains(&node.id) {
        return;
    }
    for child in &node.children {
        write_text(out, child, collapsed, depth + 1);
    }
}

/// Employees ordered for the root selector: by name, case-insensitive
pub fn root_options(employees: &[Employee]) -> Vec<&Employee> {
    let mut options: Vec<&Employee> = employees.iter().collect();
    options.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });
    options
}

/// Snapshot of the viewer
#[derive(Debug, Clone, Default, Serialize)]
pub struct TreeViewState {
    pub root_id: Option<u64>,
    pub node: Option<TreeNode>,
    pub busy: bool,
    pub error: Option<String>,
    pub collapsed: HashSet<u64>,
}

impl TreeViewState {
    /// Tree to display: only when loaded without error
    pub fn visible_node(&self) -> Option<&TreeNode> {
        if self.busy || self.error.is_some() {
            None
        } else {
            self.node.as_ref()
        }
    }
}

/// Outcome of a tree fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    Failed,
    /// A newer selection replaced this one before it completed
    Superseded,
}

/// Shared state holder for the hierarchy viewer
pub struct TreeViewer {
    api: Arc<OrgChartApi>,
    state: Arc<RwLock<TreeViewState>>,
    latest: AtomicU64,
    in_flight: Mutex<Option<CancellationToken>>,
}

impl std::fmt::Debug for TreeViewer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeViewer")
            .field("generation", &self.latest.load(Ordering::SeqCst))
            .finish()
    }
}

impl TreeViewer {
    pub fn new(api: Arc<OrgChartApi>) -> Self {
        Self {
            api,
            state: Arc::new(RwLock::new(TreeViewState::default())),
            latest: AtomicU64::new(0),
            in_flight: Mutex::new(None),
        }
    }

    pub async fn snapshot(&self) -> TreeViewState {
        self.state.read().await.clone()
    }

    /// Select a new root and fetch its subtree
    pub async fn select(&self, root_id: u64) -> LoadOutcome {
        let (generation, token) = {
            let mut state = self.state.write().await;
            if state.root_id != Some(root_id) {
                state.collapsed.clear();
            }
            state.root_id = Some(root_id);
            self.begin(&mut state).await
        };
        self.load(root_id, generation, token).await
    }

    /// Re-fetch the current root, if one is selected
    pub async fn refresh(&self) -> Option<LoadOutcome> {
        let (root_id, generation, token) = {
            let mut state = self.state.write().await;
            let root_id = state.root_id?;
            let (generation, token) = self.begin(&mut state).await;
            (root_id, generation, token)
        };
        Some(self.load(root_id, generation, token).await)
    }

    /// Flip one node between expanded and collapsed. Returns true if now collapsed.
    pub async fn toggle(&self, node_id: u64) -> bool {
        let mut state = self.state.write().await;
        if state.collapsed.remove(&node_id) {
            false
        } else {
            state.collapsed.insert(node_id);
            true
        }
    }

    /// Take the next generation, cancel the fetch in flight and mark the
    /// viewer busy. Runs under the state lock so the root and its generation
    /// always move together.
    async fn begin(&self, state: &mut TreeViewState) -> (u64, CancellationToken) {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let token = CancellationToken::new();
        if let Some(previous) = self.in_flight.lock().await.replace(token.clone()) {
            previous.cancel();
        }
        state.busy = true;
        state.error = None;
        (generation, token)
    }

    async fn load(&self, root_id: u64, generation: u64, token: CancellationToken) -> LoadOutcome {
        tracing::debug!("Loading tree for {} (generation {})", root_id, generation);

        let result = tokio::select! {
            _ = token.cancelled() => {
                tracing::debug!("Tree request for {} cancelled", root_id);
                return LoadOutcome::Superseded;
            }
            result = self.api.employee_tree(root_id) => result,
        };

        let mut state = self.state.write().await;
        if self.latest.load(Ordering::SeqCst) != generation {
            tracing::debug!("Discarding superseded tree for {}", root_id);
            return LoadOutcome::Superseded;
        }
        state.busy = false;
        match result {
            Ok(node) => {
                tracing::debug!("Loaded tree for {} ({} nodes)", root_id, node.size());
                state.node = Some(node);
                LoadOutcome::Loaded
            }
            Err(e) => {
                tracing::warn!("Failed to load tree for {}: {}", root_id, e);
                state.error = Some(e.to_string());
                state.node = None;
                LoadOutcome::Failed
            }
        }
    }
}

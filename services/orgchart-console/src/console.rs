//! Console web server: the root container that composes stores, forms and
//! the tree viewer behind an axum router

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;

use crate::api::OrgChartApi;
use crate::forms::{
    EditEmployeeDialog, EmployeeForm, EmployeeFormState, Notice, TeamForm, TeamFormState,
};
use crate::model::Employee;
use crate::render::{render_page, Page};
use crate::store::{EmployeeStore, Reload, TeamStore};
use crate::tree::TreeViewer;
use crate::ConsoleError;

/// Console application state
#[derive(Debug, Clone)]
pub struct ConsoleState {
    pub api: Arc<OrgChartApi>,
    pub teams: Arc<TeamStore>,
    pub employees: Arc<EmployeeStore>,
    pub tree: Arc<TreeViewer>,
    backend_up: Arc<AtomicBool>,
}

impl ConsoleState {
    pub fn new(api: Arc<OrgChartApi>) -> Self {
        Self {
            teams: Arc::new(TeamStore::new(Arc::clone(&api))),
            employees: Arc::new(EmployeeStore::new(Arc::clone(&api))),
            tree: Arc::new(TreeViewer::new(Arc::clone(&api))),
            backend_up: Arc::new(AtomicBool::new(false)),
            api,
        }
    }

    /// Health check plus a reload of both collections
    pub async fn mount(&self) {
        let (health, _, _) = tokio::join!(
            self.api.check_health(),
            self.teams.load(),
            self.employees.load()
        );
        let up = match health {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("Backend health check failed: {}", e);
                false
            }
        };
        self.backend_up.store(up, Ordering::SeqCst);
    }

    pub fn backend_up(&self) -> bool {
        self.backend_up.load(Ordering::SeqCst)
    }

    /// Employee from the loaded collection, falling back to the backend
    async fn find_employee(&self, id: u64) -> crate::Result<Employee> {
        let cached = self
            .employees
            .data()
            .await
            .into_iter()
            .find(|e| e.id == id);
        match cached {
            Some(employee) => Ok(employee),
            None => self.api.get_employee(id).await.map_err(|e| match e {
                ConsoleError::Api { status: 404, .. } => {
                    ConsoleError::NotFound(format!("Employee {}", id))
                }
                other => other,
            }),
        }
    }

    async fn page(&self) -> Page {
        Page {
            api_url: self.api.base_url().to_string(),
            backend_up: self.backend_up(),
            teams: self.teams.snapshot().await,
            employees: self.employees.snapshot().await,
            team_form: TeamFormState::default(),
            employee_form: EmployeeFormState::default(),
            tree: self.tree.snapshot().await,
            edit: None,
            banner: None,
        }
    }
}

/// Build the console axum router
pub fn build_router(state: ConsoleState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/teams", post(create_team_handler))
        .route("/employees", post(create_employee_handler))
        .route("/employees/{id}", post(save_employee_handler))
        .route("/employees/{id}/edit", get(edit_employee_handler))
        .route("/employees/{id}/delete", post(delete_employee_handler))
        .route("/tree", post(select_tree_handler))
        .route("/tree/refresh", post(refresh_tree_handler))
        .route("/tree/toggle/{id}", post(toggle_tree_handler))
        .route("/api/teams", get(teams_json_handler))
        .route("/api/employees", get(employees_json_handler))
        .route("/api/tree", get(tree_json_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

async fn index_handler(State(console): State<ConsoleState>) -> impl IntoResponse {
    console.mount().await;
    Html(render_page(&console.page().await))
}

async fn create_team_handler(
    State(console): State<ConsoleState>,
    Form(form): Form<TeamForm>,
) -> impl IntoResponse {
    let mut team_form = TeamFormState::with_form(form);
    team_form
        .submit(&console.api, console.teams.as_ref() as &dyn Reload)
        .await;

    let mut page = console.page().await;
    page.team_form = team_form;
    Html(render_page(&page))
}

async fn create_employee_handler(
    State(console): State<ConsoleState>,
    Form(form): Form<EmployeeForm>,
) -> impl IntoResponse {
    let mut employee_form = EmployeeFormState::with_form(form);
    employee_form
        .submit(&console.api, console.employees.as_ref() as &dyn Reload)
        .await;

    let mut page = console.page().await;
    page.employee_form = employee_form;
    Html(render_page(&page))
}

async fn edit_employee_handler(
    State(console): State<ConsoleState>,
    Path(id): Path<u64>,
) -> impl IntoResponse {
    let found = console.find_employee(id).await;
    let mut page = console.page().await;
    match found {
        Ok(employee) => page.edit = Some(EditEmployeeDialog::open_for(employee)),
        Err(e) => page.banner = Some(Notice::error(e.to_string())),
    }
    Html(render_page(&page))
}

async fn save_employee_handler(
    State(console): State<ConsoleState>,
    Path(id): Path<u64>,
    Form(form): Form<EmployeeForm>,
) -> impl IntoResponse {
    let mut banner = None;
    let mut dialog = None;
    match console.find_employee(id).await {
        Ok(employee) => {
            let mut edit = EditEmployeeDialog::open_for(employee);
            edit.form = form;
            edit.save(&console.api, console.employees.as_ref() as &dyn Reload)
                .await;
            dialog = Some(edit);
        }
        Err(e) => banner = Some(Notice::error(e.to_string())),
    }

    let mut page = console.page().await;
    page.edit = dialog.filter(|d| d.open);
    page.banner = banner;
    Html(render_page(&page))
}

async fn delete_employee_handler(
    State(console): State<ConsoleState>,
    Path(id): Path<u64>,
) -> impl IntoResponse {
    let banner = match console.api.delete_employee(id).await {
        Ok(()) => {
            tracing::info!("Deleted employee {}", id);
            console.employees.reload().await;
            Notice::success("Employee deleted")
        }
        Err(e) => {
            tracing::warn!("Failed to delete employee {}: {}", id, e);
            Notice::error(e.to_string())
        }
    };

    let mut page = console.page().await;
    page.banner = Some(banner);
    Html(render_page(&page))
}

#[derive(Debug, Deserialize)]
struct TreeSelection {
    #[serde(default)]
    root: String,
}

async fn select_tree_handler(
    State(console): State<ConsoleState>,
    Form(selection): Form<TreeSelection>,
) -> impl IntoResponse {
    let root = selection.root.trim();
    let mut banner = None;
    if !root.is_empty() {
        match root.parse::<u64>() {
            Ok(id) => {
                console.tree.select(id).await;
            }
            Err(_) => banner = Some(Notice::error("Invalid root employee")),
        }
    }

    let mut page = console.page().await;
    page.banner = banner;
    Html(render_page(&page))
}

async fn refresh_tree_handler(State(console): State<ConsoleState>) -> impl IntoResponse {
    console.tree.refresh().await;
    Html(render_page(&console.page().await))
}

async fn toggle_tree_handler(
    State(console): State<ConsoleState>,
    Path(id): Path<u64>,
) -> impl IntoResponse {
    console.tree.toggle(id).await;
    Html(render_page(&console.page().await))
}

async fn teams_json_handler(State(console): State<ConsoleState>) -> impl IntoResponse {
    Json(console.teams.snapshot().await)
}

async fn employees_json_handler(State(console): State<ConsoleState>) -> impl IntoResponse {
    Json(console.employees.snapshot().await)
}

async fn tree_json_handler(State(console): State<ConsoleState>) -> impl IntoResponse {
    Json(console.tree.snapshot().await)
}

async fn health_handler() -> impl IntoResponse {
    "OK"
}

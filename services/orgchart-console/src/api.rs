//! Typed client for the org chart backend API

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::io::{HttpClient, HttpResponse};
use crate::model::{Employee, EmployeeUpdate, NewEmployee, NewTeam, Team, TreeNode};
use crate::ConsoleError;

/// Client for the org chart REST API rooted at a base URL
pub struct OrgChartApi {
    base_url: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for OrgChartApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrgChartApi")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl OrgChartApi {
    pub fn new(base_url: &str, http: Arc<dyn HttpClient>) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        tracing::debug!("Created OrgChartApi at {}", base_url);
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Liveness payload from `/healthz`
    pub async fn health(&self) -> crate::Result<serde_json::Value> {
        self.get_json("/healthz").await
    }

    /// Fetch `/healthz` and fail unless the payload reports the backend live
    pub async fn check_health(&self) -> crate::Result<serde_json::Value> {
        let payload = self.health().await?;
        if is_live(&payload) {
            Ok(payload)
        } else {
            Err(ConsoleError::Api {
                status: 200,
                message: format!("Backend reported not live: {}", payload),
            })
        }
    }

    pub async fn list_teams(&self) -> crate::Result<Vec<Team>> {
        self.get_json("/teams").await
    }

    pub async fn create_team(&self, team: &NewTeam) -> crate::Result<Team> {
        self.post_json("/teams", team).await
    }

    pub async fn list_employees(&self) -> crate::Result<Vec<Employee>> {
        self.get_json("/employees").await
    }

    pub async fn get_employee(&self, id: u64) -> crate::Result<Employee> {
        self.get_json(&format!("/employees/{}", id)).await
    }

    pub async fn create_employee(&self, employee: &NewEmployee) -> crate::Result<Employee> {
        self.post_json("/employees", employee).await
    }

    pub async fn update_employee(
        &self,
        id: u64,
        employee: &EmployeeUpdate,
    ) -> crate::Result<Employee> {
        let body = serde_json::to_string(employee)?;
        let response = self
            .http
            .put_json(&self.url(&format!("/employees/{}", id)), &body)
            .await?;
        decode(response)
    }

    /// Delete an employee. The backend answers 204 with no body.
    pub async fn delete_employee(&self, id: u64) -> crate::Result<()> {
        let response = self
            .http
            .delete(&self.url(&format!("/employees/{}", id)))
            .await?;
        check_status(&response)
    }

    /// Reporting subtree rooted at `id`
    pub async fn employee_tree(&self, id: u64) -> crate::Result<TreeNode> {
        self.get_json(&format!("/employees/{}/tree", id)).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> crate::Result<T> {
        let response = self.http.get(&self.url(path)).await?;
        decode(response)
    }

    async fn post_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> crate::Result<T> {
        let body = serde_json::to_string(body)?;
        let response = self.http.post_json(&self.url(path), &body).await?;
        decode(response)
    }
}

/// Whether a health payload means the backend is up. Null, false, zero and
/// the empty string mean down.
pub fn is_live(payload: &Value) -> bool {
    match payload {
        Value::Null => false,
        Value::Bool(live) => *live,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn check_status(response: &HttpResponse) -> crate::Result<()> {
    if response.is_success() {
        Ok(())
    } else {
        tracing::debug!("Backend returned {}: {}", response.status, response.body);
        Err(ConsoleError::from_status(response.status, &response.body))
    }
}

fn decode<T: DeserializeOwned>(response: HttpResponse) -> crate::Result<T> {
    check_status(&response)?;
    Ok(serde_json::from_str(&response.body)?)
}

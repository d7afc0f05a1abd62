//! BDD test world for the org chart console

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request};
use cucumber::World;
use tower::ServiceExt;

use orgchart_console::api::OrgChartApi;
use orgchart_console::console::{build_router, ConsoleState};
use orgchart_console::tree::LoadOutcome;

use crate::backend::{FakeBackend, BASE_URL};

#[derive(Debug, World)]
pub struct ConsoleWorld {
    pub backend: Arc<FakeBackend>,
    pub console: ConsoleState,

    // Console page testing
    pub response_body: Option<String>,

    // Tree testing
    pub printed_tree: Option<String>,
    pub tree_outcomes: Vec<LoadOutcome>,
}

impl Default for ConsoleWorld {
    fn default() -> Self {
        let backend = Arc::new(FakeBackend::default());
        let api = Arc::new(OrgChartApi::new(BASE_URL, backend.clone()));
        Self {
            console: ConsoleState::new(api),
            backend,
            response_body: None,
            printed_tree: None,
            tree_outcomes: Vec::new(),
        }
    }
}

impl ConsoleWorld {
    pub async fn get(&mut self, uri: &str) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await;
    }

    pub async fn post_form(&mut self, uri: &str, body: &str) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await;
    }

    async fn send(&mut self, request: Request<Body>) {
        let app = build_router(self.console.clone());
        let response = app.oneshot(request).await.unwrap();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        self.response_body = Some(String::from_utf8(body.to_vec()).unwrap());
    }

    pub fn body(&self) -> &str {
        self.response_body.as_deref().expect("no response body")
    }
}

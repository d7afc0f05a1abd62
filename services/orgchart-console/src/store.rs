//! Collection stores for teams and employees
//!
//! A store fetches its whole collection from the backend and replaces its
//! state wholesale on every reload. Overlapping reloads resolve to the most
//! recently started one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::api::OrgChartApi;
use crate::model::{Employee, Team};

/// A collection the backend can list
#[async_trait]
pub trait Collection: Clone + Send + Sync + 'static {
    /// Collection name used in logs
    const NAME: &'static str;

    async fn fetch(api: &OrgChartApi) -> crate::Result<Vec<Self>>;
}

#[async_trait]
impl Collection for Team {
    const NAME: &'static str = "teams";

    async fn fetch(api: &OrgChartApi) -> crate::Result<Vec<Self>> {
        api.list_teams().await
    }
}

#[async_trait]
impl Collection for Employee {
    const NAME: &'static str = "employees";

    async fn fetch(api: &OrgChartApi) -> crate::Result<Vec<Self>> {
        api.list_employees().await
    }
}

/// Something that can be told to re-fetch after a mutation
#[async_trait]
pub trait Reload: Send + Sync {
    async fn reload(&self);
}

/// Snapshot of a collection's state
#[derive(Debug, Clone, Serialize)]
pub struct CollectionState<T> {
    pub data: Vec<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for CollectionState<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            loading: true,
            error: None,
        }
    }
}

/// Shared state holder for one backend collection
pub struct CollectionStore<T: Collection> {
    api: Arc<OrgChartApi>,
    state: Arc<RwLock<CollectionState<T>>>,
    latest: AtomicU64,
}

impl<T: Collection> std::fmt::Debug for CollectionStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionStore")
            .field("collection", &T::NAME)
            .field("generation", &self.latest.load(Ordering::SeqCst))
            .finish()
    }
}

impl<T: Collection> CollectionStore<T> {
    pub fn new(api: Arc<OrgChartApi>) -> Self {
        Self {
            api,
            state: Arc::new(RwLock::new(CollectionState::default())),
            latest: AtomicU64::new(0),
        }
    }

    /// Current state, cloned
    pub async fn snapshot(&self) -> CollectionState<T> {
        self.state.read().await.clone()
    }

    pub async fn data(&self) -> Vec<T> {
        self.state.read().await.data.clone()
    }

    /// Fetch the collection and replace the state.
    ///
    /// On failure the previous data is kept and the error message recorded.
    /// A response is dropped if a newer load started while it was in flight.
    pub async fn load(&self) {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.write().await.loading = true;
        tracing::debug!("Loading {} (generation {})", T::NAME, generation);

        let result = T::fetch(&self.api).await;

        let mut state = self.state.write().await;
        if self.latest.load(Ordering::SeqCst) != generation {
            tracing::debug!(
                "Discarding stale {} response (generation {})",
                T::NAME,
                generation
            );
            return;
        }
        match result {
            Ok(data) => {
                tracing::debug!("Loaded {} {}", data.len(), T::NAME);
                state.data = data;
                state.error = None;
            }
            Err(e) => {
                tracing::warn!("Failed to load {}: {}", T::NAME, e);
                state.error = Some(e.to_string());
            }
        }
        state.loading = false;
    }
}

#[async_trait]
impl<T: Collection> Reload for CollectionStore<T> {
    async fn reload(&self) {
        self.load().await;
    }
}

pub type TeamStore = CollectionStore<Team>;
pub type EmployeeStore = CollectionStore<Employee>;

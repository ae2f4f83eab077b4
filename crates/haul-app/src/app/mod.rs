//! App store and use cases
//!
//! [`App`] owns the single [`AppState`] every view reads from. Writes follow
//! one pattern: check the session's permissions, validate, apply the change
//! to local state, then send the mutation without waiting on delivery
//! guarantees. The next refresh reconciles with the server.

mod master_data;
mod notice;
mod polling;
mod records;
mod releases;
mod session;
mod single_flight;
mod state;

pub use notice::{Notice, NoticeLevel};
pub use polling::spawn_polling;
pub use single_flight::{FlightGuard, SingleFlight};
pub use state::AppState;

use chrono::{DateTime, Local};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{watch, RwLock, RwLockReadGuard};
use tracing::{debug, info};

use haul_domain::model::UserRole;
use haul_domain::repository::{SessionRepository, SnapshotRepository};
use haul_infra::{ConnectionStatus, DataClient, HttpTransport, Mutation};
use haul_store::LocalCache;
use haul_types::{Error, Result};

use crate::config::Config;

/// Outcome of one completed refresh
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncReport {
    pub status: ConnectionStatus,
    pub records: usize,
    pub releases: usize,
    pub at: DateTime<Local>,
}

pub struct App {
    state: RwLock<AppState>,
    client: DataClient,
    session: Arc<dyn SessionRepository + Send + Sync>,
    refresh_gate: SingleFlight,
    sync_events: watch::Sender<Option<SyncReport>>,
    offline: bool,
}

impl App {
    /// Start from the cached snapshot and the persisted session
    pub fn new(
        client: DataClient,
        snapshot: &dyn SnapshotRepository,
        session: Arc<dyn SessionRepository + Send + Sync>,
    ) -> Result<Self> {
        let state = AppState {
            dataset: snapshot.load_snapshot()?,
            user: session.load_user()?,
            commodity: session.load_commodity()?,
            ..Default::default()
        };
        let (sync_events, _) = watch::channel(None);
        Ok(Self {
            state: RwLock::new(state),
            client,
            session,
            refresh_gate: SingleFlight::new(),
            sync_events,
            offline: false,
        })
    }

    /// Work from the cache only: refreshes are skipped and writes stay local
    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    pub fn is_offline(&self) -> bool {
        self.offline
    }

    /// Wire the file cache and HTTP transport from configuration
    pub fn open(config: &Config, endpoint_override: Option<String>, offline: bool) -> Result<Self> {
        let cache = Arc::new(LocalCache::open(config.cache_dir()?)?);
        let endpoint = endpoint_override.or_else(|| config.endpoint_url.clone());
        let client = DataClient::new(
            endpoint,
            Arc::new(HttpTransport::new()),
            cache.clone(),
            config.retry_policy(),
        );
        let session: Arc<dyn SessionRepository + Send + Sync> = cache.clone();
        let app = Self::new(client, cache.as_ref(), session)?;
        Ok(if offline { app.offline() } else { app })
    }

    pub async fn state(&self) -> RwLockReadGuard<'_, AppState> {
        self.state.read().await
    }

    pub async fn has_session(&self) -> bool {
        self.state.read().await.user.is_some()
    }

    /// Drain notices raised since the last call
    pub async fn take_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut self.state.write().await.notices)
    }

    /// Receives a report after every completed refresh
    pub fn subscribe(&self) -> watch::Receiver<Option<SyncReport>> {
        self.sync_events.subscribe()
    }

    pub fn is_refreshing(&self) -> bool {
        self.refresh_gate.is_busy()
    }

    /// Re-pull the full snapshot; `None` when a refresh is already running
    /// or the app is offline
    pub async fn refresh(&self) -> Option<ConnectionStatus> {
        if self.offline {
            debug!("Offline mode, refresh skipped");
            return None;
        }
        let Some(_flight) = self.refresh_gate.try_begin() else {
            debug!("Refresh already in flight, skipping");
            return None;
        };

        let (dataset, status) = self.client.fetch_all().await;
        let report = SyncReport {
            status,
            records: dataset.records.len(),
            releases: dataset.releases.len(),
            at: Local::now(),
        };
        {
            let mut state = self.state.write().await;
            state.apply_snapshot(dataset, status);
            if status == ConnectionStatus::Offline {
                state.notify(Notice::new(
                    NoticeLevel::Warning,
                    "Server unreachable, showing cached data",
                ));
            }
        }
        info!(status = %status, records = report.records, "Refresh complete");
        self.sync_events.send_replace(Some(report));
        Some(status)
    }

    /// Send a write and record whether it went through
    async fn send(&self, mutation: Mutation, failure: &str) -> ConnectionStatus {
        let status = if self.offline {
            debug!("Offline mode, {} not sent", mutation.action());
            ConnectionStatus::Offline
        } else {
            self.client.mutate(&mutation).await
        };
        let mut state = self.state.write().await;
        state.connection = status;
        if status == ConnectionStatus::Offline {
            state.notify(Notice::new(NoticeLevel::Warning, failure));
        }
        status
    }
}

/// Session user, provided `allowed` accepts their role
fn permit<'a>(
    state: &'a AppState,
    allowed: impl Fn(&UserRole) -> bool,
    action: &str,
) -> Result<&'a haul_domain::model::AppUser> {
    let user = state.require_user()?;
    if allowed(&user.role) {
        Ok(user)
    } else {
        Err(Error::Forbidden(format!("role '{}' cannot {}", user.role, action)))
    }
}

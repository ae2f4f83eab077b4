use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use haul_domain::model::Dataset;
use haul_domain::repository::SnapshotRepository;

use super::error::RemoteError;
use super::retry::RetryPolicy;
use super::transport::Transport;
use super::wire::{Mutation, FETCH_ACTION};

/// Whether the last exchange with the endpoint went through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Online,
    #[default]
    Offline,
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionStatus::Online => write!(f, "online"),
            ConnectionStatus::Offline => write!(f, "offline"),
        }
    }
}

/// Snapshot reads with cache fallback, fire-and-forget writes
///
/// Neither operation returns an error: failures degrade to the cached
/// snapshot and an `Offline` status.
#[derive(Clone)]
pub struct DataClient {
    endpoint: Option<String>,
    transport: Arc<dyn Transport>,
    cache: Arc<dyn SnapshotRepository + Send + Sync>,
    policy: RetryPolicy,
}

impl DataClient {
    pub fn new(
        endpoint: Option<String>,
        transport: Arc<dyn Transport>,
        cache: Arc<dyn SnapshotRepository + Send + Sync>,
        policy: RetryPolicy,
    ) -> Self {
        let endpoint = endpoint
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());
        Self {
            endpoint,
            transport,
            cache,
            policy,
        }
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    async fn fetch_remote(&self) -> Result<Dataset, RemoteError> {
        let endpoint = self.endpoint.as_deref().ok_or(RemoteError::NoEndpoint)?;
        let body = self
            .policy
            .run(|| self.transport.get(endpoint, FETCH_ACTION))
            .await?;
        serde_json::from_str(&body).map_err(|e| RemoteError::Decode(e.to_string()))
    }

    /// Pull the full snapshot; on success it replaces the cache
    pub async fn fetch_all(&self) -> (Dataset, ConnectionStatus) {
        match self.fetch_remote().await {
            Ok(dataset) => {
                if let Err(e) = self.cache.save_snapshot(&dataset) {
                    warn!("Failed to cache snapshot: {}", e);
                }
                info!(
                    records = dataset.records.len(),
                    releases = dataset.releases.len(),
                    "Snapshot fetched"
                );
                (dataset, ConnectionStatus::Online)
            }
            Err(e) => {
                warn!("Fetch failed, using cached snapshot: {}", e);
                let dataset = self.cache.load_snapshot().unwrap_or_else(|e| {
                    warn!("Cache unreadable: {}", e);
                    Dataset::default()
                });
                (dataset, ConnectionStatus::Offline)
            }
        }
    }

    /// Send a write once; a failure is logged and not replayed
    pub async fn mutate(&self, mutation: &Mutation) -> ConnectionStatus {
        match self.send(mutation).await {
            Ok(()) => {
                debug!("{} sent", mutation.action());
                ConnectionStatus::Online
            }
            Err(e) => {
                warn!("{} not delivered: {}", mutation.action(), e);
                ConnectionStatus::Offline
            }
        }
    }

    async fn send(&self, mutation: &Mutation) -> Result<(), RemoteError> {
        let endpoint = self.endpoint.as_deref().ok_or(RemoteError::NoEndpoint)?;
        let body = serde_json::to_string(mutation).map_err(|e| RemoteError::Decode(e.to_string()))?;
        tokio::time::timeout(self.policy.timeout, self.transport.post(endpoint, body))
            .await
            .map_err(|_| RemoteError::Timeout(self.policy.timeout))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use haul_domain::model::{OperationStatus, TransportRecord};
    use haul_store::LocalCache;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Scripted endpoint: fails the first `failures` GETs, records every POST
    #[derive(Default)]
    struct FakeTransport {
        failures: u32,
        body: String,
        gets: AtomicU32,
        posts: Mutex<Vec<String>>,
        reject_posts: bool,
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn get(&self, _url: &str, action: &str) -> Result<String, RemoteError> {
            assert_eq!(action, "getAllData");
            let n = self.gets.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                return Err(RemoteError::Timeout(Duration::from_secs(10)));
            }
            Ok(self.body.clone())
        }

        async fn post(&self, _url: &str, body: String) -> Result<(), RemoteError> {
            if self.reject_posts {
                return Err(RemoteError::Status(502));
            }
            self.posts.lock().unwrap().push(body);
            Ok(())
        }
    }

    const BODY: &str = r#"{
        "transports": [{"autoId": "TR-1", "unloadingSite": "SiteA", "orderNo": "1", "weight": 40, "status": "تمت", "goodsType": "ذرة صفراء"}],
        "releases": [{"releaseNo": "R-1", "siteName": "SiteA", "orderNo": "1", "totalQuantity": "100", "goodsType": "ذرة صفراء"}],
        "factoryBalances": [],
        "masterData": {"users": [{"name": "Admin", "pin": 1111, "role": "admin"}]}
    }"#;

    fn client(transport: Arc<FakeTransport>, dir: &TempDir) -> (DataClient, Arc<LocalCache>) {
        let cache = Arc::new(LocalCache::open(dir.path().to_path_buf()).unwrap());
        let client = DataClient::new(
            Some("https://example.invalid/exec".to_string()),
            transport,
            cache.clone(),
            RetryPolicy::default(),
        );
        (client, cache)
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_success_writes_cache() {
        let dir = TempDir::new().unwrap();
        let transport = Arc::new(FakeTransport {
            body: BODY.to_string(),
            ..Default::default()
        });
        let (client, cache) = client(transport, &dir);

        let (dataset, status) = client.fetch_all().await;
        assert_eq!(status, ConnectionStatus::Online);
        assert_eq!(dataset.records[0].status, OperationStatus::Done);
        assert_eq!(dataset.releases[0].total_quantity, 100.0);
        assert_eq!(cache.load_snapshot().unwrap(), dataset);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_recovers_within_retries() {
        let dir = TempDir::new().unwrap();
        let transport = Arc::new(FakeTransport {
            failures: 2,
            body: BODY.to_string(),
            ..Default::default()
        });
        let (client, _) = client(transport.clone(), &dir);

        let (_, status) = client.fetch_all().await;
        assert_eq!(status, ConnectionStatus::Online);
        assert_eq!(transport.gets.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_failure_falls_back_to_cache() {
        let dir = TempDir::new().unwrap();
        let cached = Dataset {
            records: vec![TransportRecord {
                auto_id: "cached".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let transport = Arc::new(FakeTransport {
            failures: u32::MAX,
            ..Default::default()
        });
        let (client, cache) = client(transport.clone(), &dir);
        cache.save_snapshot(&cached).unwrap();

        let (dataset, status) = client.fetch_all().await;
        assert_eq!(status, ConnectionStatus::Offline);
        assert_eq!(dataset, cached);
        assert_eq!(transport.gets.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_undecodable_body_is_offline() {
        let dir = TempDir::new().unwrap();
        let transport = Arc::new(FakeTransport {
            body: "<html>Sign in</html>".to_string(),
            ..Default::default()
        });
        let (client, _) = client(transport.clone(), &dir);

        let (dataset, status) = client.fetch_all().await;
        assert_eq!(status, ConnectionStatus::Offline);
        assert_eq!(dataset, Dataset::default());
        assert_eq!(transport.gets.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_mutation_posts_tagged_body() {
        let dir = TempDir::new().unwrap();
        let transport = Arc::new(FakeTransport::default());
        let (client, _) = client(transport.clone(), &dir);

        let status = client
            .mutate(&Mutation::DeleteRelease {
                id: "R-1".to_string(),
                goods_type: "صويا".to_string(),
            })
            .await;
        assert_eq!(status, ConnectionStatus::Online);
        let posts = transport.posts.lock().unwrap();
        let body: serde_json::Value = serde_json::from_str(&posts[0]).unwrap();
        assert_eq!(body["action"], "deleteRelease");
        assert_eq!(body["id"], "R-1");
    }

    #[tokio::test]
    async fn test_failed_mutation_is_swallowed() {
        let dir = TempDir::new().unwrap();
        let transport = Arc::new(FakeTransport {
            reject_posts: true,
            ..Default::default()
        });
        let (client, _) = client(transport, &dir);
        let status = client
            .mutate(&Mutation::UpdateRecord {
                record: TransportRecord::default(),
            })
            .await;
        assert_eq!(status, ConnectionStatus::Offline);
    }

    #[tokio::test]
    async fn test_missing_endpoint_reads_cache() {
        let dir = TempDir::new().unwrap();
        let cache = Arc::new(LocalCache::open(dir.path().to_path_buf()).unwrap());
        let client = DataClient::new(
            Some("   ".to_string()),
            Arc::new(FakeTransport::default()),
            cache,
            RetryPolicy::default(),
        );
        assert!(client.endpoint().is_none());
        let (_, status) = client.fetch_all().await;
        assert_eq!(status, ConnectionStatus::Offline);
    }
}

//! Mock provider for testing.
//!
//! This provider serves clusters, secrets and statement results from memory,
//! with error injection and a call log for asserting which provider calls a
//! walkthrough made.

use crate::records::{ClusterRecord, SecretPage, SecretRecord, StatementRequest, StatementResult};
use crate::{AuroraProvider, Result, WalkthroughError};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Default number of secrets per listing page, matching the AWS page size
/// the walkthrough requests.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// A provider call recorded by [`MockProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    ListClusters,
    ListSecretsPage { next_token: Option<String> },
    DescribeCluster { cluster: String },
    ExecuteStatement { sql: String },
}

#[derive(Default)]
struct MockState {
    clusters: Vec<ClusterRecord>,
    secrets: Vec<SecretRecord>,
    statement_result: StatementResult,
    calls: Vec<MockCall>,

    list_clusters_error: Option<WalkthroughError>,
    list_secrets_error: Option<WalkthroughError>,
    describe_error: Option<WalkthroughError>,
    statement_error: Option<WalkthroughError>,
}

/// Mock provider for testing.
///
/// Clones share state, so a test can hand one clone to the walkthrough and
/// inspect [`calls`](MockProvider::calls) on another afterwards.
///
/// # Example
///
/// ```
/// use aurora_walkthrough::providers::mock::MockProvider;
/// use aurora_walkthrough::records::SecretRecord;
/// use aurora_walkthrough::AuroraProvider;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> aurora_walkthrough::Result<()> {
///     let provider = MockProvider::new().with_page_size(2);
///     for i in 0..3 {
///         provider
///             .add_secret(SecretRecord::new(format!("secret-{}", i), format!("arn:{}", i)))
///             .await;
///     }
///
///     let first = provider.list_secrets_page(None).await?;
///     assert_eq!(first.secrets.len(), 2);
///
///     let second = provider.list_secrets_page(first.next_token).await?;
///     assert_eq!(second.secrets.len(), 1);
///     assert!(second.next_token.is_none());
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct MockProvider {
    region: String,
    page_size: usize,
    state: Arc<RwLock<MockState>>,
}

impl MockProvider {
    /// Creates a new mock provider with no clusters, secrets or rows.
    pub fn new() -> Self {
        Self {
            region: "us-east-1".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            state: Arc::new(RwLock::new(MockState::default())),
        }
    }

    /// Sets the region reported by [`AuroraProvider::region`].
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Sets how many secrets each listing page holds.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Pre-populates the provider with a cluster.
    pub async fn add_cluster(&self, cluster: ClusterRecord) {
        self.state.write().await.clusters.push(cluster);
    }

    /// Pre-populates the provider with a secret, appended in listing order.
    pub async fn add_secret(&self, secret: SecretRecord) {
        self.state.write().await.secrets.push(secret);
    }

    /// Sets the rows every statement execution returns.
    pub async fn set_statement_result(&self, result: StatementResult) {
        self.state.write().await.statement_result = result;
    }

    /// Makes `list_clusters()` fail.
    pub async fn fail_list_clusters(&self, err: WalkthroughError) {
        self.state.write().await.list_clusters_error = Some(err);
    }

    /// Makes `list_secrets_page()` fail.
    pub async fn fail_list_secrets(&self, err: WalkthroughError) {
        self.state.write().await.list_secrets_error = Some(err);
    }

    /// Makes `describe_cluster()` fail.
    pub async fn fail_describe_cluster(&self, err: WalkthroughError) {
        self.state.write().await.describe_error = Some(err);
    }

    /// Makes `execute_statement()` fail.
    pub async fn fail_execute_statement(&self, err: WalkthroughError) {
        self.state.write().await.statement_error = Some(err);
    }

    /// Returns every call made so far, in order.
    pub async fn calls(&self) -> Vec<MockCall> {
        self.state.read().await.calls.clone()
    }

    async fn record(&self, call: MockCall) {
        self.state.write().await.calls.push(call);
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Rebuilds an injected error so it can be returned more than once.
fn replay(err: &WalkthroughError) -> WalkthroughError {
    match err {
        WalkthroughError::BadRequest(msg) => WalkthroughError::BadRequest(msg.clone()),
        WalkthroughError::NotFound(msg) => WalkthroughError::NotFound(msg.clone()),
        other => WalkthroughError::Other(anyhow::anyhow!("{}", other)),
    }
}

#[async_trait]
impl AuroraProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn region(&self) -> &str {
        &self.region
    }

    async fn init(&mut self) -> Result<()> {
        Ok(())
    }

    async fn list_clusters(&self) -> Result<Vec<ClusterRecord>> {
        self.record(MockCall::ListClusters).await;

        let state = self.state.read().await;
        if let Some(ref err) = state.list_clusters_error {
            return Err(WalkthroughError::provider_op(
                "rds",
                "describe_db_clusters",
                replay(err),
            ));
        }
        Ok(state.clusters.clone())
    }

    async fn list_secrets_page(&self, next_token: Option<String>) -> Result<SecretPage> {
        self.record(MockCall::ListSecretsPage {
            next_token: next_token.clone(),
        })
        .await;

        let state = self.state.read().await;
        if let Some(ref err) = state.list_secrets_error {
            return Err(WalkthroughError::provider_op(
                "secretsmanager",
                "list_secrets",
                replay(err),
            ));
        }

        let start = match next_token {
            Some(token) => token.parse::<usize>().map_err(|_| {
                WalkthroughError::BadRequest(format!("invalid next token: {}", token))
            })?,
            None => 0,
        };
        let end = (start + self.page_size).min(state.secrets.len());

        Ok(SecretPage {
            secrets: state.secrets.get(start..end).unwrap_or_default().to_vec(),
            next_token: (end < state.secrets.len()).then(|| end.to_string()),
        })
    }

    async fn describe_cluster(&self, cluster: &str) -> Result<ClusterRecord> {
        self.record(MockCall::DescribeCluster {
            cluster: cluster.to_string(),
        })
        .await;

        let state = self.state.read().await;
        if let Some(ref err) = state.describe_error {
            return Err(WalkthroughError::provider_op(
                "rds",
                "describe_db_clusters",
                replay(err),
            ));
        }

        state
            .clusters
            .iter()
            .find(|c| c.arn == cluster || c.identifier == cluster)
            .cloned()
            .ok_or_else(|| WalkthroughError::NotFound(cluster.to_string()))
    }

    async fn execute_statement(&self, request: &StatementRequest) -> Result<StatementResult> {
        self.record(MockCall::ExecuteStatement {
            sql: request.sql.clone(),
        })
        .await;

        let state = self.state.read().await;
        if let Some(ref err) = state.statement_error {
            return Err(WalkthroughError::provider_op(
                "rds-data",
                "execute_statement",
                replay(err),
            ));
        }
        Ok(state.statement_result.clone())
    }
}

/// Registers the mock provider with the factory.
pub fn register() {
    crate::factory::register_provider("mock", |cfg| {
        Ok(Box::new(MockProvider::new().with_region(cfg.region)))
    });
}

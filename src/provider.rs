//! Provider trait definition for cloud integrations.
//!
//! This module defines the [`AuroraProvider`] trait that the walkthrough talks
//! to. It covers exactly the read-only calls needed to discover a cluster, its
//! credential secret and its databases.

use crate::records::{ClusterRecord, SecretPage, StatementRequest, StatementResult};
use crate::Result;
use async_trait::async_trait;

/// A cloud provider client scoped to one region.
///
/// All implementations must be `Send + Sync`.
///
/// # Implementations
///
/// - **SDK-based**: AWS (RDS, Secrets Manager, RDS Data API)
/// - **Testing**: Mock provider with error injection and a call log
#[async_trait]
pub trait AuroraProvider: Send + Sync {
    // ========================================================================
    // Metadata
    // ========================================================================

    /// Returns the provider name (e.g., "awscloudformation", "mock").
    fn name(&self) -> &str;

    /// Returns the region every call is scoped to.
    fn region(&self) -> &str;

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Initializes the provider.
    ///
    /// For SDK providers, this loads credentials and builds service clients.
    async fn init(&mut self) -> Result<()>;

    // ========================================================================
    // Discovery
    // ========================================================================

    /// Lists all database clusters in the region.
    ///
    /// Every engine mode is returned; filtering is the caller's concern.
    async fn list_clusters(&self) -> Result<Vec<ClusterRecord>>;

    /// Lists one page of stored secrets.
    ///
    /// Pass `None` for the first page and the previous page's
    /// `next_token` afterwards. See [`crate::secrets::list_all_secrets`]
    /// for the merged listing.
    async fn list_secrets_page(&self, next_token: Option<String>) -> Result<SecretPage>;

    /// Describes a single cluster by ARN or identifier.
    ///
    /// # Errors
    ///
    /// - [`WalkthroughError::NotFound`](crate::WalkthroughError::NotFound):
    ///   No cluster matches
    async fn describe_cluster(&self, cluster: &str) -> Result<ClusterRecord>;

    // ========================================================================
    // Data API
    // ========================================================================

    /// Executes a SQL statement through the managed data API.
    ///
    /// # Errors
    ///
    /// - [`WalkthroughError::BadRequest`](crate::WalkthroughError::BadRequest):
    ///   The statement or the credentials were rejected
    async fn execute_statement(&self, request: &StatementRequest) -> Result<StatementResult>;
}

//! Error types for walkthrough operations.

use thiserror::Error;

/// Result type alias using [`WalkthroughError`].
pub type Result<T> = std::result::Result<T, WalkthroughError>;

/// Message fragment the data API returns when the secret holds bad credentials.
const ACCESS_DENIED_PATTERN: &str = "Access denied for user";

/// Errors that can stop a walkthrough.
///
/// All errors implement `std::error::Error` and can be chained with `source()`.
#[derive(Debug, Error)]
pub enum WalkthroughError {
    /// A resource the walkthrough depends on does not exist
    /// (API resource, serverless cluster, database).
    #[error("{0}")]
    ResourceDoesNotExist(String),

    /// No credential secret could be found for the cluster.
    #[error("{0}")]
    CredentialsNotFound(String),

    /// The provider rejected a request as malformed or unauthorized.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// A requested provider resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Provider call failed with context.
    #[error("{service}: {operation}: {source}")]
    ProviderOperation {
        /// Service name (rds, secretsmanager, rds-data)
        service: String,
        /// Operation name (describe_db_clusters, list_secrets, ...)
        operation: String,
        /// Underlying error
        #[source]
        source: Box<WalkthroughError>,
    },

    /// Data-source metadata or project metadata is malformed.
    #[error("invalid metadata: {0}")]
    InvalidMetadata(String),

    /// The prompt could not be rendered or answered.
    #[error("prompt failed: {0}")]
    Prompt(String),

    /// I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error (catch-all).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WalkthroughError {
    /// Wraps an underlying error with the service and operation that failed.
    ///
    /// # Example
    ///
    /// ```
    /// use aurora_walkthrough::WalkthroughError;
    ///
    /// let err = WalkthroughError::NotFound("cluster-1".to_string());
    /// let wrapped = WalkthroughError::provider_op("rds", "describe_db_clusters", err);
    ///
    /// assert_eq!(
    ///     wrapped.to_string(),
    ///     "rds: describe_db_clusters: not found: cluster-1"
    /// );
    /// ```
    pub fn provider_op(
        service: impl Into<String>,
        operation: impl Into<String>,
        err: WalkthroughError,
    ) -> Self {
        Self::ProviderOperation {
            service: service.into(),
            operation: operation.into(),
            source: Box::new(err),
        }
    }

    /// Classification used when the error is emitted as telemetry.
    pub fn telemetry_kind(&self) -> &'static str {
        match self {
            Self::ResourceDoesNotExist(_) => "ResourceDoesNotExistError",
            Self::CredentialsNotFound(_) => "ResourceCredentialsNotFoundError",
            Self::BadRequest(_) | Self::NotFound(_) | Self::ProviderOperation { .. } => {
                "ProviderError"
            }
            Self::InvalidMetadata(_) => "InvalidMetadataError",
            Self::Prompt(_) => "PromptError",
            Self::Io(_) | Self::Json(_) | Self::Other(_) => "UnknownFault",
        }
    }

    /// Returns true for the stops the walkthrough reports as a normal outcome
    /// (nothing to select), as opposed to faults.
    pub fn is_expected_stop(&self) -> bool {
        matches!(
            self,
            Self::ResourceDoesNotExist(_) | Self::CredentialsNotFound(_)
        )
    }

    /// Returns true if this error, or any error it wraps, is a bad request
    /// caused by the database rejecting the stored credentials.
    pub fn is_access_denied(&self) -> bool {
        match self {
            Self::BadRequest(message) => message.contains(ACCESS_DENIED_PATTERN),
            Self::ProviderOperation { source, .. } => source.is_access_denied(),
            _ => false,
        }
    }
}

impl From<dialoguer::Error> for WalkthroughError {
    fn from(err: dialoguer::Error) -> Self {
        Self::Prompt(err.to_string())
    }
}

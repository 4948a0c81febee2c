//! Records exchanged with providers and returned by the walkthrough.

use serde::{Deserialize, Serialize};

/// Engine mode of clusters the walkthrough can attach.
pub const SERVERLESS_ENGINE_MODE: &str = "serverless";

/// A database cluster as returned by the provider's cluster listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterRecord {
    /// User-facing cluster identifier
    pub identifier: String,

    /// Cluster ARN
    pub arn: String,

    /// Provider-internal resource id (`cluster-XXXX`)
    pub resource_id: String,

    /// Engine name (`aurora-mysql`, `aurora-postgresql`, ...)
    pub engine: String,

    /// Engine mode (`serverless`, `provisioned`, ...)
    pub engine_mode: String,
}

impl ClusterRecord {
    /// Returns true if the cluster runs in serverless engine mode.
    pub fn is_serverless(&self) -> bool {
        self.engine_mode == SERVERLESS_ENGINE_MODE
    }
}

/// A stored secret (name and ARN only, values are never fetched).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SecretRecord {
    pub name: String,
    pub arn: String,
}

impl SecretRecord {
    pub fn new(name: impl Into<String>, arn: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arn: arn.into(),
        }
    }
}

/// One page of a secret listing.
#[derive(Debug, Clone, Default)]
pub struct SecretPage {
    pub secrets: Vec<SecretRecord>,

    /// Continuation token, `None` on the last page
    pub next_token: Option<String>,
}

/// A SQL statement sent through the data API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementRequest {
    pub resource_arn: String,
    pub secret_arn: String,
    pub sql: String,
    pub database: Option<String>,
}

/// A single column value in a statement result.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    String(String),
    Long(i64),
    Double(f64),
    Boolean(bool),
    Null,
    /// Blob or array values, which the walkthrough never reads
    Unsupported,
}

impl Field {
    /// Returns the string value, if this is a string field.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }
}

/// Rows returned by a statement execution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatementResult {
    pub records: Vec<Vec<Field>>,
}

impl StatementResult {
    /// Builds a result with one string column per row.
    pub fn from_strings<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            records: values
                .into_iter()
                .map(|v| vec![Field::String(v.into())])
                .collect(),
        }
    }
}

/// Everything the walkthrough collected.
///
/// Field names serialize to the keys the data-source questions use.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WalkthroughResult {
    pub region: String,

    #[serde(rename = "dbClusterArn")]
    pub cluster_arn: String,

    #[serde(rename = "secretStoreArn")]
    pub secret_arn: String,

    #[serde(rename = "databaseName")]
    pub database_name: String,

    /// Name of the API resource the data source is attached to
    #[serde(rename = "resourceName")]
    pub resource_name: String,
}

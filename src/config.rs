//! Configuration types for provider client resolution.

use std::collections::HashMap;

/// Service context provider clients are scoped to.
pub const SERVICE_CONTEXT: &str = "aurora-serverless";

/// Action the walkthrough performs with provider clients.
pub const ACTION_LIST: &str = "list";

/// Provider plugin identifier.
///
/// Each variant corresponds to a provider implementation registered with
/// the [factory](crate::factory). Providers must be enabled via Cargo
/// feature flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderType {
    /// AWS SDK provider (the project's CloudFormation provider plugin)
    AwsCloudFormation,
    /// In-memory provider for tests
    Mock,
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AwsCloudFormation => write!(f, "awscloudformation"),
            Self::Mock => write!(f, "mock"),
        }
    }
}

impl std::str::FromStr for ProviderType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "awscloudformation" => Ok(Self::AwsCloudFormation),
            "mock" => Ok(Self::Mock),
            other => Err(format!("unknown provider: {}", other)),
        }
    }
}

/// Configuration for resolving a provider client.
///
/// Use the builder pattern for ergonomic configuration:
///
/// ```
/// use aurora_walkthrough::{ProviderConfig, ProviderType};
///
/// let config = ProviderConfig::new(ProviderType::AwsCloudFormation)
///     .with_region("us-west-2")
///     .with_option("endpoint", "http://localhost:4566");
///
/// assert_eq!(config.service, "aurora-serverless");
/// assert_eq!(config.action, "list");
/// ```
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Provider type
    pub provider: ProviderType,

    /// Region every client call is scoped to
    pub region: String,

    /// Service context the client is configured for
    pub service: String,

    /// Action the client is used for
    pub action: String,

    /// Provider-specific options
    pub options: HashMap<String, String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider: ProviderType::AwsCloudFormation,
            region: "us-east-1".to_string(),
            service: SERVICE_CONTEXT.to_string(),
            action: ACTION_LIST.to_string(),
            options: HashMap::new(),
        }
    }
}

impl ProviderConfig {
    /// Creates a new configuration for the specified provider.
    pub fn new(provider: ProviderType) -> Self {
        Self {
            provider,
            ..Default::default()
        }
    }

    /// Sets the region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Sets the service context and action the client is scoped to.
    pub fn with_context(mut self, service: impl Into<String>, action: impl Into<String>) -> Self {
        self.service = service.into();
        self.action = action.into();
        self
    }

    /// Adds a provider-specific option.
    ///
    /// Common options:
    ///
    /// **AWS:**
    /// - `endpoint`: Custom endpoint URL (for LocalStack testing)
    /// - `profile`: Named profile from the shared credentials file
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Gets a provider-specific option value.
    pub fn get_option(&self, key: &str) -> Option<&String> {
        self.options.get(key)
    }
}

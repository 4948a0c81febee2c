//! Provider factory and registration system.

use crate::{AuroraProvider, ProviderConfig, Result, WalkthroughError};
use std::collections::HashMap;
use std::sync::{OnceLock, PoisonError, RwLock};
use tracing::debug;

/// Factory function type for creating providers.
pub type ProviderFactory = fn(ProviderConfig) -> Result<Box<dyn AuroraProvider>>;

static PROVIDER_REGISTRY: OnceLock<RwLock<HashMap<String, ProviderFactory>>> = OnceLock::new();

fn registry() -> &'static RwLock<HashMap<String, ProviderFactory>> {
    PROVIDER_REGISTRY.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Registers a provider factory function under a provider name.
///
/// This is typically called from provider modules' `register()` functions
/// during library initialization.
pub fn register_provider(provider_name: &str, factory: ProviderFactory) {
    let mut reg = registry().write().unwrap_or_else(PoisonError::into_inner);
    reg.insert(provider_name.to_string(), factory);
}

/// Creates a new, uninitialized provider from configuration.
///
/// The factory is looked up by `config.provider`'s name. If the provider is
/// not registered, an error is returned with a hint to check feature flags.
///
/// # Errors
///
/// Returns an error if:
/// - Provider is not registered (missing feature flag)
/// - Provider factory returns an error
pub fn new_provider(config: ProviderConfig) -> Result<Box<dyn AuroraProvider>> {
    crate::init();

    let provider_name = config.provider.to_string();

    let reg = registry().read().unwrap_or_else(PoisonError::into_inner);
    let factory = reg.get(&provider_name).ok_or_else(|| {
        WalkthroughError::Other(anyhow::anyhow!(
            "unknown provider: {} (did you enable the matching feature flag?)",
            provider_name
        ))
    })?;

    factory(config)
}

/// Resolves a ready-to-use client for the config's provider, service context
/// and region.
///
/// # Example
///
/// ```no_run
/// use aurora_walkthrough::{factory, ProviderConfig, ProviderType};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> aurora_walkthrough::Result<()> {
///     let config = ProviderConfig::new(ProviderType::AwsCloudFormation)
///         .with_region("us-east-1");
///     let client = factory::configured_client(config).await?;
///     let clusters = client.list_clusters().await?;
///     println!("{} clusters", clusters.len());
///     Ok(())
/// }
/// ```
pub async fn configured_client(config: ProviderConfig) -> Result<Box<dyn AuroraProvider>> {
    debug!(
        provider = %config.provider,
        service = %config.service,
        action = %config.action,
        region = %config.region,
        "resolving provider client"
    );

    let mut provider = new_provider(config)?;
    provider.init().await?;
    Ok(provider)
}

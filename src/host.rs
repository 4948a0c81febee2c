//! Host context the walkthrough runs in.
//!
//! The host owns everything outside the walkthrough's own logic: reading
//! project metadata, talking to the user, emitting telemetry and resolving
//! provider clients.

use crate::project::ProjectMetadata;
use crate::{factory, AuroraProvider, ProviderConfig, Result, WalkthroughError};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::error;

/// Severity of a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Environment the walkthrough is hosted in.
#[async_trait]
pub trait Host: Send + Sync {
    /// Reads the project's metadata.
    fn project_metadata(&self) -> Result<ProjectMetadata>;

    /// Shows a message to the user.
    fn print(&self, level: MessageLevel, message: &str);

    /// Records an error for usage telemetry.
    fn emit_error(&self, error: &WalkthroughError);

    /// Resolves an initialized provider client for `config`.
    async fn provider_client(&self, config: ProviderConfig) -> Result<Box<dyn AuroraProvider>>;
}

/// Host for an interactive terminal session in a project directory.
///
/// Messages go to stderr; stdout is left for the walkthrough result.
#[derive(Debug, Clone)]
pub struct TerminalHost {
    project_dir: PathBuf,
    options: Vec<(String, String)>,
}

impl TerminalHost {
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            options: Vec::new(),
        }
    }

    /// Adds a provider option applied to every client this host resolves
    /// (e.g. `endpoint`, `profile`).
    pub fn with_provider_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.push((key.into(), value.into()));
        self
    }
}

#[async_trait]
impl Host for TerminalHost {
    fn project_metadata(&self) -> Result<ProjectMetadata> {
        ProjectMetadata::load(&self.project_dir)
    }

    fn print(&self, level: MessageLevel, message: &str) {
        match level {
            MessageLevel::Info => eprintln!("{}", message),
            MessageLevel::Success => eprintln!("✔ {}", message),
            MessageLevel::Warning => eprintln!("⚠ {}", message),
            MessageLevel::Error => eprintln!("✖ {}", message),
        }
    }

    fn emit_error(&self, err: &WalkthroughError) {
        error!(
            target: "aurora_walkthrough::telemetry",
            kind = err.telemetry_kind(),
            message = %err,
            "walkthrough error"
        );
    }

    async fn provider_client(&self, config: ProviderConfig) -> Result<Box<dyn AuroraProvider>> {
        let config = self
            .options
            .iter()
            .fold(config, |config, (key, value)| config.with_option(key, value));
        factory::configured_client(config).await
    }
}

#[cfg(feature = "mock")]
pub use self::mock::MockHost;

#[cfg(feature = "mock")]
mod mock {
    use super::*;
    use crate::providers::mock::MockProvider;
    use std::sync::{Mutex, PoisonError};

    /// In-memory host for tests.
    ///
    /// Serves fixed project metadata, hands out clones of one
    /// [`MockProvider`], and records everything printed or emitted.
    pub struct MockHost {
        metadata: ProjectMetadata,
        provider: MockProvider,
        messages: Mutex<Vec<(MessageLevel, String)>>,
        emitted: Mutex<Vec<&'static str>>,
        client_requests: Mutex<Vec<ProviderConfig>>,
    }

    impl MockHost {
        pub fn new(metadata: ProjectMetadata, provider: MockProvider) -> Self {
            Self {
                metadata,
                provider,
                messages: Mutex::new(Vec::new()),
                emitted: Mutex::new(Vec::new()),
                client_requests: Mutex::new(Vec::new()),
            }
        }

        /// Messages printed so far.
        pub fn messages(&self) -> Vec<(MessageLevel, String)> {
            self.messages
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Messages printed at `level`.
        pub fn messages_at(&self, level: MessageLevel) -> Vec<String> {
            self.messages()
                .into_iter()
                .filter(|(l, _)| *l == level)
                .map(|(_, m)| m)
                .collect()
        }

        /// Telemetry kinds emitted so far.
        pub fn emitted(&self) -> Vec<&'static str> {
            self.emitted
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Provider configurations clients were requested for.
        pub fn client_requests(&self) -> Vec<ProviderConfig> {
            self.client_requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }
    }

    #[async_trait]
    impl Host for MockHost {
        fn project_metadata(&self) -> Result<ProjectMetadata> {
            Ok(self.metadata.clone())
        }

        fn print(&self, level: MessageLevel, message: &str) {
            self.messages
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push((level, message.to_string()));
        }

        fn emit_error(&self, err: &WalkthroughError) {
            self.emitted
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(err.telemetry_kind());
        }

        async fn provider_client(
            &self,
            config: ProviderConfig,
        ) -> Result<Box<dyn AuroraProvider>> {
            let provider = self.provider.clone().with_region(config.region.clone());
            self.client_requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(config);
            Ok(Box::new(provider))
        }
    }
}

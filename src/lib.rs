//! Aurora Walkthrough - attach an Aurora Serverless cluster to a GraphQL API.
//!
//! The walkthrough checks that the project has an AppSync API, then asks for
//! a region, an Aurora Serverless cluster, the secret holding the cluster's
//! credentials and finally a database. Whatever can be decided without the
//! user is decided automatically: a single cluster, the secret named after
//! the cluster, a single secret.
//!
//! # Features
//!
//! - **Provider seam**: AWS calls go through the [`AuroraProvider`] trait,
//!   resolved by name from a [factory] registry
//! - **Lazy pagination**: secrets are streamed page by page
//!   ([`secrets::list_all_secrets`])
//! - **Host seam**: project metadata, messages, telemetry and clients come
//!   from a [`host::Host`], so the walkthrough runs headless in tests
//! - **No process exits**: errors are returned and turned into an exit code
//!   by the [`runner`]
//!
//! # Quick Start
//!
//! ```no_run
//! use aurora_walkthrough::defaults::RdsDefaults;
//! use aurora_walkthrough::host::TerminalHost;
//! use aurora_walkthrough::prompt::TerminalPrompter;
//! use aurora_walkthrough::questions::DataSourceMetadata;
//! use aurora_walkthrough::{runner, Walkthrough};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> aurora_walkthrough::Result<()> {
//!     let metadata = DataSourceMetadata::bundled()?;
//!     let host = TerminalHost::new(".");
//!     let mut prompter = TerminalPrompter;
//!
//!     let mut walkthrough = Walkthrough::new(&host, &mut prompter);
//!     match runner::run(&mut walkthrough, &RdsDefaults, &metadata).await {
//!         Ok(result) => println!("{}", serde_json::to_string_pretty(&result)?),
//!         Err(termination) => std::process::exit(i32::from(termination.code())),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Providers
//!
//! | Provider | Feature Flag | Notes |
//! |----------|-------------|-------|
//! | Mock | `mock` (default) | In-memory, with error injection and a call log |
//! | AWS | `aws` | RDS, RDS Data and Secrets Manager SDK clients |

pub mod config;
pub mod defaults;
pub mod engine;
pub mod error;
pub mod factory;
pub mod host;
pub mod progress;
pub mod project;
pub mod prompt;
pub mod provider;
pub mod providers;
pub mod questions;
pub mod records;
pub mod runner;
pub mod secrets;
pub mod walkthrough;

pub use config::{ProviderConfig, ProviderType};
pub use error::{Result, WalkthroughError};
pub use provider::AuroraProvider;
pub use records::WalkthroughResult;
pub use walkthrough::Walkthrough;

use std::sync::Once;

static INIT: Once = Once::new();

/// Registers all compiled providers with the factory.
///
/// Called automatically by [`factory::new_provider`]; calling it again is a
/// no-op.
pub fn init() {
    INIT.call_once(providers::register_all);
}

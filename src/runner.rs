//! Top-level runner: turns walkthrough errors into a reported termination.
//!
//! The walkthrough itself never exits the process. The runner prints the
//! error through the host, emits it for telemetry and maps it to an exit
//! code, so the binary is the only place that decides to stop.

use crate::defaults::DefaultsSource;
use crate::host::{Host, MessageLevel};
use crate::questions::DataSourceMetadata;
use crate::records::WalkthroughResult;
use crate::walkthrough::Walkthrough;
use crate::WalkthroughError;
use std::process::ExitCode;
use tracing::info;

/// A walkthrough that stopped before producing a result.
#[derive(Debug)]
pub struct Termination {
    error: WalkthroughError,
}

impl Termination {
    /// The error that stopped the walkthrough.
    pub fn error(&self) -> &WalkthroughError {
        &self.error
    }

    /// Numeric exit status: 0 when there was simply nothing to select,
    /// 1 for faults.
    pub fn code(&self) -> u8 {
        if self.error.is_expected_stop() {
            0
        } else {
            1
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code())
    }
}

/// Reports `error` through `host` and wraps it as a termination.
pub fn terminate(host: &dyn Host, error: WalkthroughError) -> Termination {
    host.print(MessageLevel::Error, &error.to_string());
    host.emit_error(&error);
    Termination { error }
}

/// Runs `walkthrough` to completion, reporting any error it stops with.
pub async fn run(
    walkthrough: &mut Walkthrough<'_>,
    defaults: &dyn DefaultsSource,
    metadata: &DataSourceMetadata,
) -> Result<WalkthroughResult, Termination> {
    match walkthrough.run(defaults, metadata).await {
        Ok(result) => {
            info!(
                region = %result.region,
                cluster = %result.cluster_arn,
                database = %result.database_name,
                "data source selected"
            );
            Ok(result)
        }
        Err(error) => Err(terminate(walkthrough.host(), error)),
    }
}

//! Scoped progress spinners.
//!
//! A step that talks to the network acquires a [`Spinner`] from
//! [`Progress::start`] and owns it until the step ends. Dropping a spinner
//! that was neither succeeded nor failed clears it from the terminal.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::debug;

const TICK_STRINGS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✔"];

/// Whether spinners are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Progress {
    /// Animated spinner on stderr
    #[default]
    Animated,
    /// Nothing is drawn (tests, non-interactive runs)
    Hidden,
}

impl Progress {
    /// Starts a spinner for one step.
    pub fn start(self, message: impl Into<String>) -> Spinner {
        let message = message.into();
        debug!(%message, "step started");

        let bar = match self {
            Self::Animated => {
                let bar = ProgressBar::new_spinner();
                if let Ok(style) = ProgressStyle::default_spinner()
                    .tick_strings(TICK_STRINGS)
                    .template("{spinner:.cyan} {msg}")
                {
                    bar.set_style(style);
                }
                bar.enable_steady_tick(Duration::from_millis(80));
                bar
            }
            Self::Hidden => ProgressBar::hidden(),
        };
        bar.set_message(message);

        Spinner { bar, done: false }
    }
}

/// A running spinner, cleared on drop.
#[derive(Debug)]
pub struct Spinner {
    bar: ProgressBar,
    done: bool,
}

impl Spinner {
    /// Stops the spinner and leaves a success line.
    pub fn succeed(mut self, message: impl Into<String>) {
        let message = message.into();
        debug!(%message, "step succeeded");
        self.bar.finish_with_message(format!("✔ {}", message));
        self.done = true;
    }

    /// Stops the spinner and leaves a failure line.
    pub fn fail(mut self, message: impl Into<String>) {
        let message = message.into();
        debug!(%message, "step failed");
        self.bar.abandon_with_message(format!("✖ {}", message));
        self.done = true;
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if !self.done {
            self.bar.finish_and_clear();
        }
    }
}

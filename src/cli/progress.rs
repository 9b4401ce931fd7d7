//! Progress feedback while sources are fetched.
//!
//! Adapts to the output context:
//! - TTY mode: animated spinner on stderr
//! - Non-TTY mode: one line per operation on stderr
//! - Robot mode: JSON progress events on stderr
//! - Quiet mode: nothing

use std::io::IsTerminal;
use std::time::Duration;

use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

// ============================================================================
// Progress Mode Detection
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMode {
    Tty,
    NonTty,
    Robot,
    Quiet,
}

impl ProgressMode {
    #[must_use]
    pub fn detect(robot_mode: bool, quiet: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if robot_mode {
            Self::Robot
        } else if std::io::stderr().is_terminal() {
            Self::Tty
        } else {
            Self::NonTty
        }
    }
}

// ============================================================================
// Progress Events (Robot Mode)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressEventType {
    SpinnerStart,
    SpinnerComplete,
    SpinnerError,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressEvent {
    #[serde(rename = "type")]
    pub event_type: &'static str,
    pub event: ProgressEventType,
    pub operation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub timestamp: String,
}

impl ProgressEvent {
    fn new(event: ProgressEventType, operation: &str) -> Self {
        Self {
            event_type: "progress",
            event,
            operation: operation.to_string(),
            message: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    fn with_message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }

    fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            eprintln!("{json}");
        }
    }
}

// ============================================================================
// Progress Reporter
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct ProgressReporter {
    mode: ProgressMode,
}

impl ProgressReporter {
    #[must_use]
    pub fn new(robot_mode: bool, quiet: bool) -> Self {
        Self {
            mode: ProgressMode::detect(robot_mode, quiet),
        }
    }

    #[must_use]
    pub const fn with_mode(mode: ProgressMode) -> Self {
        Self { mode }
    }

    #[must_use]
    pub const fn mode(&self) -> ProgressMode {
        self.mode
    }

    /// Start a spinner for an operation of unknown length.
    pub fn spinner(&self, msg: &str) -> ProgressHandle {
        match self.mode {
            ProgressMode::Quiet => ProgressHandle::Noop,
            ProgressMode::Robot => {
                ProgressEvent::new(ProgressEventType::SpinnerStart, msg).emit();
                ProgressHandle::Robot {
                    operation: msg.to_string(),
                }
            }
            ProgressMode::NonTty => {
                eprintln!("[agent-skills] {msg}...");
                ProgressHandle::NonTty
            }
            ProgressMode::Tty => {
                let pb = ProgressBar::new_spinner();
                if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")
                {
                    pb.set_style(
                        style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
                    );
                }
                pb.set_message(msg.to_string());
                pb.enable_steady_tick(Duration::from_millis(100));
                ProgressHandle::Tty(pb)
            }
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(false, false)
    }
}

// ============================================================================
// Progress Handle
// ============================================================================

pub enum ProgressHandle {
    Tty(ProgressBar),
    NonTty,
    Robot { operation: String },
    Noop,
}

impl ProgressHandle {
    /// Finish with a success message.
    pub fn finish_with_message(&self, msg: &str) {
        match self {
            Self::Tty(pb) => pb.finish_with_message(format!("✓ {msg}")),
            Self::Robot { operation } => {
                ProgressEvent::new(ProgressEventType::SpinnerComplete, operation)
                    .with_message(msg)
                    .emit();
            }
            Self::NonTty => eprintln!("[agent-skills] ✓ {msg}"),
            Self::Noop => {}
        }
    }

    /// Finish and erase the spinner.
    pub fn finish(&self) {
        match self {
            Self::Tty(pb) => pb.finish_and_clear(),
            Self::Robot { operation } => {
                ProgressEvent::new(ProgressEventType::SpinnerComplete, operation).emit();
            }
            Self::NonTty | Self::Noop => {}
        }
    }

    /// Stop with an error message.
    pub fn abandon_with_message(&self, msg: &str) {
        match self {
            Self::Tty(pb) => pb.abandon_with_message(format!("✗ {msg}")),
            Self::Robot { operation } => {
                ProgressEvent::new(ProgressEventType::SpinnerError, operation)
                    .with_message(msg)
                    .emit();
            }
            Self::NonTty => eprintln!("[agent-skills] ✗ {msg}"),
            Self::Noop => {}
        }
    }

    #[must_use]
    pub const fn is_noop(&self) -> bool {
        matches!(self, Self::Noop)
    }
}

// ============================================================================
// Tests
// ============================================================================

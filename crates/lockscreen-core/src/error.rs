//! Error types for the lock screen core.
//!
//! Only panel transitions can fail: embedded views (camera, emergency call)
//! load asynchronously and may never report ready. Everything else in the
//! core degrades to a no-op instead of an error.

use std::time::Duration;

use thiserror::Error;

use crate::panel::Panel;

/// Errors raised while loading a panel with embedded content.
///
/// Both variants are recoverable: the panel controller tears the embedded view
/// down and falls back to the main panel.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PanelError {
    /// Embedded view did not signal ready before the load deadline.
    #[error("{panel} panel did not become ready within {elapsed:?}")]
    LoadTimeout {
        /// Panel that was loading
        panel: Panel,
        /// How long we waited
        elapsed: Duration,
    },

    /// Embedded view reported a load failure.
    #[error("{panel} panel failed to load: {reason}")]
    LoadFailed {
        /// Panel that was loading
        panel: Panel,
        /// Failure description from the host
        reason: String,
    },
}

impl PanelError {
    /// Panel whose load failed.
    pub fn panel(&self) -> Panel {
        match self {
            Self::LoadTimeout { panel, .. } | Self::LoadFailed { panel, .. } => *panel,
        }
    }

    /// Returns true if the failure was a missed deadline rather than an
    /// explicit error report.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::LoadTimeout { .. })
    }
}

//! Observable state snapshots for invariant checking.
//!
//! Snapshots capture the observable state of the lock screen at a point in
//! time. Invariants operate on snapshots rather than live state to ensure
//! consistent, atomic checks.

use std::{ops::Sub, time::Duration};

use lockscreen_app::LockScreen;
use lockscreen_core::{Panel, PasscodeStatus};

/// Snapshot of the lock screen's observable state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenSnapshot {
    /// Device is locked
    pub locked: bool,
    /// Lock screen is enabled
    pub enabled: bool,
    /// Passcode is enabled
    pub passcode_enabled: bool,
    /// Panel currently shown
    pub current_panel: Panel,
    /// Panel whose embedded view is loading
    pub loading_panel: Option<Panel>,
    /// Panel requested behind the in-flight load
    pub queued_panel: Option<Panel>,
    /// Digits entered on the keypad
    pub passcode_entered: usize,
    /// Stored passcode length
    pub passcode_length: usize,
    /// Passcode display status
    pub passcode_status: PasscodeStatus,
    /// Screen is on
    pub screen_on: bool,
    /// A committed gesture waits for its handle animation
    pub gesture_pending: bool,
    /// A pointer session is open
    pub tracking: bool,
}

impl ScreenSnapshot {
    /// Capture the observable state of `screen`.
    pub fn from_screen<I>(screen: &LockScreen<I>) -> Self
    where
        I: Copy + Ord + Send + Sync + Sub<Output = Duration>,
    {
        let state = screen.lock_state();
        Self {
            locked: state.is_locked(),
            enabled: state.is_enabled(),
            passcode_enabled: state.is_passcode_enabled(),
            current_panel: screen.current_panel(),
            loading_panel: screen.loading_panel(),
            queued_panel: screen.queued_panel(),
            passcode_entered: screen.passcode_entered(),
            passcode_length: screen.passcode_length(),
            passcode_status: screen.passcode_status(),
            screen_on: screen.is_screen_on(),
            gesture_pending: screen.gesture_pending(),
            tracking: screen.is_tracking(),
        }
    }

    /// Whether no panel transition is in flight.
    pub fn is_settled(&self) -> bool {
        self.loading_panel.is_none() && self.queued_panel.is_none()
    }
}

impl Default for ScreenSnapshot {
    /// Freshly booted, enabled lock screen with the default passcode.
    fn default() -> Self {
        Self {
            locked: true,
            enabled: true,
            passcode_enabled: false,
            current_panel: Panel::Main,
            loading_panel: None,
            queued_panel: None,
            passcode_entered: 0,
            passcode_length: 4,
            passcode_status: PasscodeStatus::Idle,
            screen_on: true,
            gesture_pending: false,
            tracking: false,
        }
    }
}

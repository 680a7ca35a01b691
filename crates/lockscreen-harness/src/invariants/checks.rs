//! Standard invariant checks.
//!
//! These invariants capture behavioral properties that must always hold.
//! They verify WHAT must be true, not specific test scenarios.

use lockscreen_core::{Panel, PasscodeStatus};

use super::{Invariant, InvariantResult, ScreenSnapshot, Violation};

/// A disabled lock screen never holds the device locked.
///
/// Disabling while locked must unlock immediately, and nothing may lock a
/// disabled lock screen afterwards.
pub struct DisabledImpliesUnlocked;

impl Invariant for DisabledImpliesUnlocked {
    fn name(&self) -> &'static str {
        "disabled_implies_unlocked"
    }

    fn check(&self, state: &ScreenSnapshot) -> InvariantResult {
        if !state.enabled && state.locked {
            return Err(Violation {
                invariant: self.name(),
                message: "lock screen disabled but device locked".to_string(),
            });
        }
        Ok(())
    }
}

/// The keypad buffer never holds more digits than the stored passcode.
pub struct PasscodeWithinCodeLength;

impl Invariant for PasscodeWithinCodeLength {
    fn name(&self) -> &'static str {
        "passcode_within_code_length"
    }

    fn check(&self, state: &ScreenSnapshot) -> InvariantResult {
        if state.passcode_entered > state.passcode_length {
            return Err(Violation {
                invariant: self.name(),
                message: format!(
                    "{} digits entered for a {}-digit passcode",
                    state.passcode_entered, state.passcode_length
                ),
            });
        }
        Ok(())
    }
}

/// The error display only shows for a complete, rejected entry.
pub struct ErrorHoldsFullEntry;

impl Invariant for ErrorHoldsFullEntry {
    fn name(&self) -> &'static str {
        "error_holds_full_entry"
    }

    fn check(&self, state: &ScreenSnapshot) -> InvariantResult {
        if state.passcode_status == PasscodeStatus::Error
            && state.passcode_entered != state.passcode_length
        {
            return Err(Violation {
                invariant: self.name(),
                message: format!(
                    "error showing with {} of {} digits",
                    state.passcode_entered, state.passcode_length
                ),
            });
        }
        Ok(())
    }
}

/// Only panels with an embedded view are ever loading.
pub struct LoadingPanelIsEmbedded;

impl Invariant for LoadingPanelIsEmbedded {
    fn name(&self) -> &'static str {
        "loading_panel_is_embedded"
    }

    fn check(&self, state: &ScreenSnapshot) -> InvariantResult {
        match state.loading_panel {
            Some(panel) if !panel.has_embedded_view() => Err(Violation {
                invariant: self.name(),
                message: format!("{panel} panel loading without an embedded view"),
            }),
            _ => Ok(()),
        }
    }
}

/// Once transitions settle, an unlocked device shows the main panel.
///
/// Secondary panels (passcode, camera, emergency call) are only reachable
/// while locked.
pub struct UnlockedShowsMain;

impl Invariant for UnlockedShowsMain {
    fn name(&self) -> &'static str {
        "unlocked_shows_main"
    }

    fn check(&self, state: &ScreenSnapshot) -> InvariantResult {
        if !state.locked && state.is_settled() && state.current_panel != Panel::Main {
            return Err(Violation {
                invariant: self.name(),
                message: format!("unlocked on {} panel", state.current_panel),
            });
        }
        Ok(())
    }
}

/// A dark screen holds no drag and no pending commit.
///
/// Turning the screen off drops whatever gesture was in progress, so a lost
/// handle animation can never block the next unlock drag.
pub struct ScreenOffClearsGesture;

impl Invariant for ScreenOffClearsGesture {
    fn name(&self) -> &'static str {
        "screen_off_clears_gesture"
    }

    fn check(&self, state: &ScreenSnapshot) -> InvariantResult {
        if !state.screen_on && (state.gesture_pending || state.tracking) {
            return Err(Violation {
                invariant: self.name(),
                message: format!(
                    "screen off with gesture pending={} tracking={}",
                    state.gesture_pending, state.tracking
                ),
            });
        }
        Ok(())
    }
}

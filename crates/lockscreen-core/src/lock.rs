//! Locked/unlocked state and passcode timeout policy.
//!
//! # State Machine
//!
//! ```text
//!             unlock()
//! ┌────────┐ ─────────────────> ┌──────────┐
//! │ Locked │                    │ Unlocked │
//! └────────┘ <───────────────── └──────────┘
//!             lock() if enabled
//! ```
//!
//! Disabling the lock screen while locked forces an unlock. Re-enabling never
//! locks by itself; the next screen-off does.
//!
//! # Passcode timeout
//!
//! The screen-off instant is recorded only while unlocked. Recording it while
//! already locked would restart the grace period, so a user could dodge the
//! passcode forever by toggling the screen.

use std::{
    ops::Sub,
    time::{Duration, Instant},
};

use crate::config::{Setting, Settings};

/// Lock flags.
///
/// Fields are private; [`LockStateMachine`] enforces that a disabled lock
/// screen is never locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockState {
    locked: bool,
    enabled: bool,
    passcode_enabled: bool,
    unlock_sound_enabled: bool,
}

impl LockState {
    /// Whether the device is locked.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Whether the lock screen is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Raw passcode flag. Only meaningful when enabled.
    pub fn is_passcode_enabled(&self) -> bool {
        self.passcode_enabled
    }

    /// Whether unlocking plays a sound.
    pub fn is_unlock_sound_enabled(&self) -> bool {
        self.unlock_sound_enabled
    }
}

/// Passcode code and screen-off timeout tracking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasscodePolicy<I> {
    code: String,
    request_timeout: Duration,
    /// First screen-off since the last unlock. `None` until one is seen.
    screen_off_at: Option<I>,
    timeout_exceeded: bool,
}

impl<I> PasscodePolicy<I> {
    /// Stored passcode.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Grace period after screen-off.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Whether the last screen-on came after the grace period.
    pub fn timeout_exceeded(&self) -> bool {
        self.timeout_exceeded
    }
}

/// A lock state change that actually happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockTransition {
    /// Unlocked → Locked
    Locked {
        /// Skip the lock animation
        instant: bool,
    },
    /// Locked → Unlocked
    Unlocked {
        /// Skip the unlock animation
        instant: bool,
        /// Unlock sound should play
        play_sound: bool,
    },
}

/// Lock state machine.
///
/// Generic over `Instant` to support virtual time in simulation.
#[derive(Debug, Clone)]
pub struct LockStateMachine<I = Instant>
where
    I: Copy + Ord + Send + Sync + Sub<Output = Duration>,
{
    state: LockState,
    policy: PasscodePolicy<I>,
}

impl<I> LockStateMachine<I>
where
    I: Copy + Ord + Send + Sync + Sub<Output = Duration>,
{
    /// Create from a settings snapshot. Starts locked if enabled.
    pub fn new(settings: &Settings) -> Self {
        Self {
            state: LockState {
                locked: settings.enabled,
                enabled: settings.enabled,
                passcode_enabled: settings.passcode_enabled,
                unlock_sound_enabled: settings.unlock_sound_enabled,
            },
            policy: PasscodePolicy {
                code: settings.passcode.clone(),
                request_timeout: settings.request_timeout,
                screen_off_at: None,
                // Booting locked behaves like an unbounded screen-off
                timeout_exceeded: true,
            },
        }
    }

    /// Lock flags.
    pub fn state(&self) -> &LockState {
        &self.state
    }

    /// Passcode policy.
    pub fn policy(&self) -> &PasscodePolicy<I> {
        &self.policy
    }

    /// Whether the device is locked.
    pub fn is_locked(&self) -> bool {
        self.state.locked
    }

    /// Whether the passcode applies: enabled lock screen with passcode on.
    pub fn passcode_enabled(&self) -> bool {
        self.state.enabled && self.state.passcode_enabled
    }

    /// Whether an unlock gesture must go through the passcode panel.
    pub fn requires_passcode(&self) -> bool {
        self.passcode_enabled() && self.policy.timeout_exceeded
    }

    /// Stored passcode.
    pub fn passcode(&self) -> &str {
        &self.policy.code
    }

    /// Lock. No-op when already locked or disabled.
    pub fn lock(&mut self, instant: bool) -> Option<LockTransition> {
        if self.state.locked || !self.state.enabled {
            return None;
        }

        self.state.locked = true;
        tracing::debug!(instant, "locked");
        Some(LockTransition::Locked { instant })
    }

    /// Unlock. Never blocked; callers validate the passcode beforehand.
    pub fn unlock(&mut self, instant: bool) -> Option<LockTransition> {
        if !self.state.locked {
            return None;
        }

        self.state.locked = false;
        let play_sound = self.state.unlock_sound_enabled && !instant;
        tracing::debug!(instant, play_sound, "unlocked");
        Some(LockTransition::Unlocked { instant, play_sound })
    }

    /// Lock only if the lock screen is enabled.
    pub fn lock_if_enabled(&mut self, instant: bool) -> Option<LockTransition> {
        if !self.state.enabled {
            return None;
        }
        self.lock(instant)
    }

    /// Screen power changed.
    ///
    /// Off records the screen-off instant (only while unlocked). On
    /// recomputes whether the passcode grace period elapsed. Both end by
    /// locking if enabled.
    pub fn screen_changed(&mut self, on: bool, now: I) -> Option<LockTransition> {
        if on {
            self.policy.timeout_exceeded = match self.policy.screen_off_at {
                Some(off_at) => now - off_at > self.policy.request_timeout,
                None => true,
            };
            tracing::debug!(timeout_exceeded = self.policy.timeout_exceeded, "screen on");
        } else if !self.state.locked {
            self.policy.screen_off_at = Some(now);
        }

        self.lock_if_enabled(true)
    }

    /// Enable or disable the lock screen. Disabling while locked unlocks.
    pub fn set_enabled(&mut self, enabled: bool) -> Option<LockTransition> {
        self.state.enabled = enabled;
        if enabled { None } else { self.unlock(true) }
    }

    /// Enable or disable the passcode.
    pub fn set_passcode_enabled(&mut self, enabled: bool) {
        self.state.passcode_enabled = enabled;
    }

    /// Replace the stored passcode.
    pub fn set_passcode(&mut self, code: String) {
        self.policy.code = code;
    }

    /// Replace the passcode grace period.
    pub fn set_request_timeout(&mut self, timeout: Duration) {
        self.policy.request_timeout = timeout;
    }

    /// Enable or disable the unlock sound.
    pub fn set_unlock_sound_enabled(&mut self, enabled: bool) {
        self.state.unlock_sound_enabled = enabled;
    }

    /// Apply a single settings change.
    pub fn apply(&mut self, setting: Setting) -> Option<LockTransition> {
        match setting {
            Setting::Enabled(enabled) => return self.set_enabled(enabled),
            Setting::PasscodeEnabled(enabled) => self.set_passcode_enabled(enabled),
            Setting::Passcode(code) => self.set_passcode(code),
            Setting::RequestTimeout(timeout) => self.set_request_timeout(timeout),
            Setting::UnlockSoundEnabled(enabled) => self.set_unlock_sound_enabled(enabled),
        }
        None
    }
}

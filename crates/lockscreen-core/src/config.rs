//! Configuration for the lock screen state machines.
//!
//! Two kinds of input live here:
//!
//! - Tuning knobs that belong to the device build (gesture commit ratio, load
//!   deadlines, error display delay). These come with `DEFAULT_*` constants.
//! - [`Settings`], a read-only snapshot of the user settings store. The core
//!   never persists settings; changes arrive one at a time as [`Setting`].

use std::time::Duration;

/// Fraction of the handle's maximum travel a drag must cover to commit.
pub const DEFAULT_COMMIT_RATIO: f32 = 0.75;

/// How long a committed gesture may wait for its handle animation to end.
pub const DEFAULT_HANDLE_ANIMATION_TIMEOUT: Duration = Duration::from_secs(1);

/// How long an embedded panel may take to report ready.
pub const DEFAULT_PANEL_LOAD_TIMEOUT: Duration = Duration::from_secs(5);

/// How long a passcode mismatch stays on screen before the entry resets.
pub const DEFAULT_PASSCODE_ERROR_TIMEOUT: Duration = Duration::from_millis(500);

/// Passcode used until the settings store provides one.
pub const DEFAULT_PASSCODE: &str = "0000";

/// Embedded source for the secure camera panel.
pub const DEFAULT_CAMERA_SOURCE: &str = "./camera/index.html";

/// Embedded source for the emergency-call panel.
pub const DEFAULT_EMERGENCY_CALL_SOURCE: &str = "./emergency-call/index.html";

/// Gesture classification configuration
#[derive(Debug, Clone, PartialEq)]
pub struct GestureConfig {
    /// Commit threshold as a fraction of `max_handle_offset`, in `(0, 1]`
    pub commit_ratio: f32,
    /// Deadline for the handle animation to report its end. A commit still
    /// pending afterwards resolves as if the animation had finished.
    pub animation_timeout: Duration,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            commit_ratio: DEFAULT_COMMIT_RATIO,
            animation_timeout: DEFAULT_HANDLE_ANIMATION_TIMEOUT,
        }
    }
}

/// Panel transition configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelConfig {
    /// Deadline for embedded panels to report ready
    pub load_timeout: Duration,
    /// Embedded source loaded for the camera panel
    pub camera_source: String,
    /// Embedded source loaded for the emergency-call panel
    pub emergency_call_source: String,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            load_timeout: DEFAULT_PANEL_LOAD_TIMEOUT,
            camera_source: DEFAULT_CAMERA_SOURCE.to_string(),
            emergency_call_source: DEFAULT_EMERGENCY_CALL_SOURCE.to_string(),
        }
    }
}

/// Passcode entry configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasscodeConfig {
    /// Delay before a rejected entry is cleared
    pub error_timeout: Duration,
}

impl Default for PasscodeConfig {
    fn default() -> Self {
        Self { error_timeout: DEFAULT_PASSCODE_ERROR_TIMEOUT }
    }
}

/// Snapshot of the user-facing lock screen settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Lock screen enabled at all
    pub enabled: bool,
    /// Passcode required (only meaningful when `enabled`)
    pub passcode_enabled: bool,
    /// Stored passcode digits
    pub passcode: String,
    /// Grace period after screen-off before the passcode is required again
    pub request_timeout: Duration,
    /// Play a sound on unlock
    pub unlock_sound_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: true,
            passcode_enabled: false,
            passcode: DEFAULT_PASSCODE.to_string(),
            request_timeout: Duration::ZERO,
            unlock_sound_enabled: true,
        }
    }
}

/// A single settings change pushed by the settings store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Setting {
    /// `lockscreen.enabled`
    Enabled(bool),
    /// `lockscreen.passcode-lock.enabled`
    PasscodeEnabled(bool),
    /// `lockscreen.passcode-lock.code`
    Passcode(String),
    /// `lockscreen.passcode-lock.timeout`
    RequestTimeout(Duration),
    /// `lockscreen.unlock-sound.enabled`
    UnlockSoundEnabled(bool),
}

impl Setting {
    /// Settings store key for this setting.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Enabled(_) => "lockscreen.enabled",
            Self::PasscodeEnabled(_) => "lockscreen.passcode-lock.enabled",
            Self::Passcode(_) => "lockscreen.passcode-lock.code",
            Self::RequestTimeout(_) => "lockscreen.passcode-lock.timeout",
            Self::UnlockSoundEnabled(_) => "lockscreen.unlock-sound.enabled",
        }
    }
}

/// Complete configuration for a lock screen instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LockScreenConfig {
    /// Gesture classification
    pub gesture: GestureConfig,
    /// Panel transitions
    pub panel: PanelConfig,
    /// Passcode entry
    pub passcode: PasscodeConfig,
    /// Initial settings snapshot
    pub settings: Settings,
}

impl LockScreenConfig {
    /// Configuration with the given initial settings and default tuning.
    pub fn with_settings(settings: Settings) -> Self {
        Self { settings, ..Self::default() }
    }
}

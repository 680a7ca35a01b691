//! Lock screen input events.
//!
//! This module defines [`LockScreenEvent`], the closed set of inputs that
//! drive the [`crate::LockScreen`] state machine.
//!
//! Events originate from three sources:
//! - User interaction (pointer, keypad, home button).
//! - Device state (screen power, connectivity, settings changes, ticks).
//! - Completion signals from the presentation layer (embedded view ready,
//!   transition end, camera launch failure).

use lockscreen_core::{GestureGeometry, HitTarget, KeypadKey, Panel, Point, Setting};

use crate::ConnectivityState;

/// Physical home button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomePress {
    /// Short press
    Short,
    /// Long press (task switcher)
    Long,
}

/// Element whose visual transition finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionSource {
    /// The overlay (panel cross-fade, lock/unlock slide)
    Overlay,
    /// The handle (commit animation)
    Handle,
}

/// Events processed by the lock screen state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum LockScreenEvent {
    /// Pointer went down.
    PointerDown {
        /// Pointer position
        point: Point,
        /// Element under the pointer
        target: HitTarget,
        /// Layout measured at the moment of the press
        geometry: GestureGeometry,
    },

    /// Pointer moved.
    PointerMove {
        /// Pointer position
        point: Point,
    },

    /// Pointer released.
    PointerUp {
        /// Pointer position
        point: Point,
    },

    /// Screen turned on or off.
    ScreenPower {
        /// Screen is on
        on: bool,
    },

    /// Connectivity changed.
    Connectivity(ConnectivityState),

    /// Home button pressed.
    HomeButton(HomePress),

    /// Passcode keypad key pressed.
    Keypad(KeypadKey),

    /// Embedded view finished loading.
    EmbeddedReady {
        /// Panel hosting the view
        panel: Panel,
    },

    /// Embedded view failed to load.
    EmbeddedFailed {
        /// Panel hosting the view
        panel: Panel,
        /// Failure description
        reason: String,
    },

    /// A visual transition finished.
    TransitionEnd(TransitionSource),

    /// A lock screen setting changed.
    SettingChanged(Setting),

    /// Launching the camera application failed.
    CameraLaunchFailed {
        /// Failure description
        reason: String,
    },

    /// Periodic tick.
    Tick,

    /// Host is shutting the lock screen down.
    Shutdown,
}

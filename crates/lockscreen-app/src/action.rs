//! Lock screen side-effects and intents.
//!
//! This module defines the [`LockScreenAction`] enum, which represents
//! instructions produced by the [`crate::LockScreen`] state machine for the
//! runtime to execute.

use lockscreen_core::{DragFeedback, GestureTarget, Panel, PanelError, PasscodeStatus};

/// Notifications for observers outside the lock screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    /// Device locked (`lock`).
    Locked {
        /// Lock happened without animation
        instant: bool,
    },
    /// Device unlocked (`unlock`).
    Unlocked {
        /// Unlock happened without animation
        instant: bool,
    },
    /// Current panel changed (`lockpanelchange`).
    PanelChanged {
        /// Previous panel
        from: Panel,
        /// New panel
        to: Panel,
    },
}

/// Actions produced by the lock screen state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum LockScreenAction {
    /// Render the lock screen.
    Render,

    /// Stop the runtime.
    Quit,

    /// Update the in-progress drag visuals.
    DragFeedback(DragFeedback),

    /// Animate the handle to the committed target's end position, then
    /// report [`crate::TransitionSource::Handle`].
    AnimateHandle {
        /// Committed target
        target: GestureTarget,
    },

    /// Animate the handle and side targets back to rest.
    ResetHandle,

    /// Instantiate an embedded view, then report ready or failure.
    MountEmbedded {
        /// Panel hosting the view
        panel: Panel,
        /// Embedded content source
        source: String,
    },

    /// Tear down an embedded view.
    UnmountEmbedded {
        /// Panel hosting the view
        panel: Panel,
    },

    /// Hand off to the external camera application.
    LaunchCamera,

    /// Play the unlock sound.
    PlayUnlockSound,

    /// Passcode entry display changed.
    PasscodeUpdated {
        /// Digits entered
        entered: usize,
        /// Display status
        status: PasscodeStatus,
    },

    /// Notify observers.
    Notify(Notification),

    /// Stop the home button event from reaching the home screen.
    ConsumeHomeButton,

    /// Panel load failed and the lock screen fell back.
    PanelLoadFailed(PanelError),
}

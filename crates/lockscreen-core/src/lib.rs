//! Lock screen core
//!
//! Pure state machines for the interactive part of a lock screen. Every
//! component follows the same shape: methods take the current time as input
//! and return actions for a driver to execute. Nothing here performs I/O,
//! which keeps the logic deterministic under simulation.
//!
//! # Components
//!
//! - [`gesture::GestureTracker`]: pointer tracking and drag classification
//! - [`panel::PanelController`]: serialized load/unload panel transitions
//! - [`lock::LockStateMachine`]: locked/unlocked state and passcode timeout
//! - [`passcode::PasscodeInput`]: digit entry with delay-on-error

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod env;
pub mod error;
pub mod gesture;
pub mod lock;
pub mod panel;
pub mod passcode;

pub use config::{
    GestureConfig, LockScreenConfig, PanelConfig, PasscodeConfig, Setting, Settings,
};
pub use error::PanelError;
pub use gesture::{
    DragFeedback, GestureGeometry, GestureTarget, GestureTracker, HitTarget, Point, Rect, Release,
};
pub use lock::{LockState, LockStateMachine, LockTransition, PasscodePolicy};
pub use panel::{Panel, PanelAction, PanelController};
pub use passcode::{KeypadKey, PasscodeInput, PasscodeOutcome, PasscodeStatus};

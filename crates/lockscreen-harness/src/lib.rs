//! Deterministic simulation harness for lock screen testing.
//!
//! Virtual-clock implementations of the Environment and Driver traits so the
//! production [`lockscreen_app::Runtime`] runs unchanged under test, with
//! every embedded view, camera launch and visual transition scripted.
//!
//! # Invariant Testing
//!
//! The `invariants` module provides behavioral testing through invariant
//! checks. Invariants verify WHAT must be true across all execution paths, not
//! specific scenarios. Use [`InvariantRegistry::standard()`] for the common
//! lock screen invariants.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod invariants;
pub mod sim_driver;
pub mod sim_env;

pub use invariants::{
    DisabledImpliesUnlocked, ErrorHoldsFullEntry, Invariant, InvariantRegistry, InvariantResult,
    LoadingPanelIsEmbedded, PasscodeWithinCodeLength, ScreenOffClearsGesture, ScreenSnapshot,
    UnlockedShowsMain, Violation,
};
pub use sim_driver::{EmbeddedBehavior, SimDriver, SimDriverError};
pub use sim_env::{SimEnv, SimInstant};

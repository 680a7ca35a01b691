//! Lock screen application layer
//!
//! Wires the core state machines into a single event-driven lock screen and
//! runs it against a platform driver, so the same orchestration code runs in
//! production and in deterministic simulation.
//!
//! # Components
//!
//! - [`LockScreen`]: event dispatch across gesture, panel, lock and passcode
//! - [`Driver`]: trait for platform-specific presentation and input
//! - [`Runtime`]: generic orchestration loop using Driver
//! - [`SystemEnv`]: production environment backed by the system clock

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod driver;
mod event;
mod runtime;
mod state;
mod system_env;

pub use action::{LockScreenAction, Notification};
pub use app::LockScreen;
pub use driver::Driver;
pub use event::{HomePress, LockScreenEvent, TransitionSource};
pub use runtime::{DEFAULT_TICK_INTERVAL, Runtime, RuntimeConfig};
pub use state::ConnectivityState;
pub use system_env::SystemEnv;

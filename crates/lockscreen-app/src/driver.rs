//! Driver trait for abstracting presentation and input.
//!
//! The [`Driver`] trait decouples the lock screen runtime from a specific
//! platform. A device shell implements it to receive input and render the
//! overlay, while the generic [`crate::Runtime`] handles all orchestration.

use std::{future::Future, ops::Sub, time::Duration};

use lockscreen_core::Panel;

use crate::{LockScreen, LockScreenAction, LockScreenEvent, Notification};

/// Abstracts platform I/O for the lock screen runtime.
///
/// Implementations provide input and presentation while the generic
/// [`Runtime`](crate::Runtime) handles orchestration logic.
///
/// # Associated Types
///
/// - [`Error`](Driver::Error): Platform-specific error type
/// - [`Instant`](Driver::Instant): Time representation (real or virtual)
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Time instant type. Enables virtual time in simulation.
    type Instant: Copy + Ord + Send + Sync + Sub<Output = Duration>;

    /// Poll for the next input event.
    ///
    /// Returns `None` if no event is ready.
    fn poll_event(
        &mut self,
    ) -> impl Future<Output = Result<Option<LockScreenEvent>, Self::Error>> + Send;

    /// Start loading an embedded view.
    ///
    /// Completion is reported later through
    /// [`LockScreenEvent::EmbeddedReady`] or
    /// [`LockScreenEvent::EmbeddedFailed`]. An `Err` here means the view
    /// could not even be created.
    fn mount_embedded(&mut self, panel: Panel, source: &str) -> Result<(), Self::Error>;

    /// Tear down an embedded view.
    fn unmount_embedded(&mut self, panel: Panel) -> Result<(), Self::Error>;

    /// Hand off to the camera application.
    fn launch_camera(&mut self) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Deliver a notification to observers.
    fn notify(&mut self, notification: Notification) -> Result<(), Self::Error>;

    /// Apply a visual action: drag feedback, handle animation, unlock sound,
    /// passcode display or home button consumption.
    fn present(&mut self, action: &LockScreenAction) -> Result<(), Self::Error>;

    /// Render the lock screen state.
    fn render(&mut self, screen: &LockScreen<Self::Instant>) -> Result<(), Self::Error>;

    /// Release platform resources.
    fn stop(&mut self);
}

//! Generic runtime for lock screen orchestration.
//!
//! The Runtime drives the lock screen event loop, coordinating between:
//! - [`LockScreen`]: event dispatch state machine
//! - [`Driver`]: platform-specific input and presentation
//! - [`Environment`]: clock and tick pacing

use std::time::Duration;

use lockscreen_core::{LockScreenConfig, env::Environment};

use crate::{Driver, LockScreen, LockScreenAction, LockScreenEvent};

/// Default pause between ticks while no input is pending.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Runtime loop configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Pause between ticks while the driver has no input
    pub tick_interval: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self { tick_interval: DEFAULT_TICK_INTERVAL }
    }
}

/// Generic runtime that orchestrates the lock screen and a driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `E`: Environment providing time
pub struct Runtime<D, E>
where
    D: Driver,
    E: Environment,
{
    driver: D,
    env: E,
    screen: LockScreen<D::Instant>,
    config: RuntimeConfig,
}

impl<D, E> Runtime<D, E>
where
    D: Driver<Instant = E::Instant>,
    E: Environment,
{
    /// Create a new runtime with the given driver and environment.
    pub fn new(driver: D, env: E, lock_screen: LockScreenConfig, config: RuntimeConfig) -> Self {
        let screen = LockScreen::new(lock_screen);
        Self { driver, env, screen, config }
    }

    /// Run the main event loop until the lock screen quits.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(mut self) -> Result<(), D::Error> {
        self.driver.render(&self.screen)?;

        loop {
            let should_quit = self.step().await?;
            if should_quit {
                break;
            }
        }

        self.driver.stop();
        Ok(())
    }

    /// Process one cycle of the event loop: at most one input event, then a
    /// tick. Sleeps for the tick interval when no input is pending.
    ///
    /// Returns `true` if the lock screen should quit.
    pub async fn step(&mut self) -> Result<bool, D::Error> {
        match self.driver.poll_event().await? {
            Some(event) => {
                if self.dispatch(event).await? {
                    return Ok(true);
                }
            },
            None => self.env.sleep(self.config.tick_interval).await,
        }

        self.dispatch(LockScreenEvent::Tick).await
    }

    /// Feed one event to the lock screen and execute the resulting actions.
    ///
    /// Returns `true` if the lock screen should quit.
    pub async fn dispatch(&mut self, event: LockScreenEvent) -> Result<bool, D::Error> {
        let now = self.env.now();
        let actions = self.screen.handle(event, now);
        self.process_actions(actions).await
    }

    /// Execute actions, feeding driver failures back as events.
    ///
    /// Returns `true` if should quit.
    async fn process_actions(
        &mut self,
        initial_actions: Vec<LockScreenAction>,
    ) -> Result<bool, D::Error> {
        let mut pending_actions = initial_actions;

        while !pending_actions.is_empty() {
            let actions = std::mem::take(&mut pending_actions);

            for action in actions {
                match action {
                    LockScreenAction::Render => self.driver.render(&self.screen)?,
                    LockScreenAction::Quit => return Ok(true),
                    LockScreenAction::MountEmbedded { panel, source } => {
                        if let Err(error) = self.driver.mount_embedded(panel, &source) {
                            tracing::warn!(%panel, %error, "failed to create embedded view");
                            let reason = error.to_string();
                            let event = LockScreenEvent::EmbeddedFailed { panel, reason };
                            let now = self.env.now();
                            pending_actions.extend(self.screen.handle(event, now));
                        }
                    },
                    LockScreenAction::UnmountEmbedded { panel } => {
                        self.driver.unmount_embedded(panel)?;
                    },
                    LockScreenAction::LaunchCamera => {
                        if let Err(error) = self.driver.launch_camera().await {
                            let event =
                                LockScreenEvent::CameraLaunchFailed { reason: error.to_string() };
                            let now = self.env.now();
                            pending_actions.extend(self.screen.handle(event, now));
                        }
                    },
                    LockScreenAction::Notify(notification) => self.driver.notify(notification)?,
                    LockScreenAction::PanelLoadFailed(ref error) => {
                        tracing::info!(
                            panel = %error.panel(),
                            timeout = error.is_timeout(),
                            "presenting panel load failure"
                        );
                        self.driver.present(&action)?;
                    },

                    // Purely visual, the driver decides how to show them
                    LockScreenAction::DragFeedback(_)
                    | LockScreenAction::AnimateHandle { .. }
                    | LockScreenAction::ResetHandle
                    | LockScreenAction::PlayUnlockSound
                    | LockScreenAction::PasscodeUpdated { .. }
                    | LockScreenAction::ConsumeHomeButton => self.driver.present(&action)?,
                }
            }
        }
        Ok(false)
    }

    /// Get a reference to the lock screen.
    pub fn screen(&self) -> &LockScreen<D::Instant> {
        &self.screen
    }

    /// Get a reference to the driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Get a mutable reference to the driver.
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }
}

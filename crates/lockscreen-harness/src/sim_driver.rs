//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` stands in for the device shell. It implements [`Driver`] so
//! the same [`lockscreen_app::Runtime`] orchestration code runs in both
//! production and simulation, with embedded views, camera launches and
//! visual transitions scripted by the test.

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex, PoisonError},
};

use lockscreen_app::{
    Driver, LockScreen, LockScreenAction, LockScreenEvent, Notification, TransitionSource,
};
use lockscreen_core::Panel;

use crate::{
    SimInstant,
    invariants::{InvariantRegistry, ScreenSnapshot},
};

/// Error type for simulation driver.
#[derive(Debug, Clone)]
pub struct SimDriverError(pub String);

impl std::fmt::Display for SimDriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SimDriverError: {}", self.0)
    }
}

impl std::error::Error for SimDriverError {}

/// How a simulated embedded view responds to being mounted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EmbeddedBehavior {
    /// Reports ready on the next poll
    #[default]
    Ready,
    /// Reports a load failure on the next poll
    Fail(String),
    /// Never reports back
    Hang,
    /// Mounting itself returns an error
    Reject,
}

/// Shared state for event injection and recording.
///
/// This allows injection from outside async contexts.
#[derive(Default)]
struct SharedState {
    pending_events: VecDeque<LockScreenEvent>,
    closed: bool,
    stopped: bool,
    auto_transitions: bool,
    fail_camera_launch: bool,
    behaviors: HashMap<Panel, EmbeddedBehavior>,
    mounted: Vec<Panel>,
    mounts: Vec<(Panel, String)>,
    unmounts: Vec<Panel>,
    camera_launches: usize,
    notifications: Vec<Notification>,
    presented: Vec<LockScreenAction>,
    frames: Vec<ScreenSnapshot>,
}

/// Simulation driver for deterministic testing.
///
/// Clones share state, so a test keeps a handle for injection and
/// inspection while the runtime owns another.
#[derive(Clone, Default)]
pub struct SimDriver {
    state: Arc<Mutex<SharedState>>,
    invariants: Option<Arc<InvariantRegistry>>,
}

impl SimDriver {
    /// Create a new simulation driver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable invariant checking on every render.
    #[must_use]
    pub fn with_invariants(mut self, registry: InvariantRegistry) -> Self {
        self.invariants = Some(Arc::new(registry));
        self
    }

    /// Report the end of every visual transition the lock screen starts.
    #[must_use]
    pub fn with_auto_transitions(self) -> Self {
        self.with_state(|state| state.auto_transitions = true);
        self
    }

    /// Script how the embedded view of `panel` responds to mounting.
    pub fn set_embedded_behavior(&self, panel: Panel, behavior: EmbeddedBehavior) {
        self.with_state(|state| {
            state.behaviors.insert(panel, behavior);
        });
    }

    /// Make camera launches fail.
    pub fn set_camera_launch_fails(&self, fails: bool) {
        self.with_state(|state| state.fail_camera_launch = fails);
    }

    /// Inject a `LockScreenEvent` for processing.
    pub fn inject_event(&self, event: LockScreenEvent) {
        self.with_state(|state| state.pending_events.push_back(event));
    }

    /// Inject several events in order.
    pub fn inject_events(&self, events: impl IntoIterator<Item = LockScreenEvent>) {
        self.with_state(|state| state.pending_events.extend(events));
    }

    /// Close the input side. Once the queue drains, polling yields
    /// [`LockScreenEvent::Shutdown`].
    pub fn close(&self) {
        self.with_state(|state| state.closed = true);
    }

    /// Check if there are pending events to process.
    pub fn has_pending(&self) -> bool {
        self.with_state(|state| !state.pending_events.is_empty())
    }

    /// Whether the runtime stopped the driver.
    pub fn is_stopped(&self) -> bool {
        self.with_state(|state| state.stopped)
    }

    /// Panels whose embedded view is currently mounted.
    pub fn mounted(&self) -> Vec<Panel> {
        self.with_state(|state| state.mounted.clone())
    }

    /// Every mount request, in order.
    pub fn mounts(&self) -> Vec<(Panel, String)> {
        self.with_state(|state| state.mounts.clone())
    }

    /// Every unmount request, in order.
    pub fn unmounts(&self) -> Vec<Panel> {
        self.with_state(|state| state.unmounts.clone())
    }

    /// Number of successful camera launches.
    pub fn camera_launches(&self) -> usize {
        self.with_state(|state| state.camera_launches)
    }

    /// Notifications delivered to observers, in order.
    pub fn notifications(&self) -> Vec<Notification> {
        self.with_state(|state| state.notifications.clone())
    }

    /// Visual actions presented, in order.
    pub fn presented(&self) -> Vec<LockScreenAction> {
        self.with_state(|state| state.presented.clone())
    }

    /// Snapshot captured by the most recent render.
    pub fn last_frame(&self) -> Option<ScreenSnapshot> {
        self.with_state(|state| state.frames.last().cloned())
    }

    /// Number of renders.
    pub fn render_count(&self) -> usize {
        self.with_state(|state| state.frames.len())
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut SharedState) -> T) -> T {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;
    type Instant = SimInstant;

    async fn poll_event(&mut self) -> Result<Option<LockScreenEvent>, Self::Error> {
        Ok(self.with_state(|state| match state.pending_events.pop_front() {
            Some(event) => Some(event),
            None if state.closed => Some(LockScreenEvent::Shutdown),
            None => None,
        }))
    }

    fn mount_embedded(&mut self, panel: Panel, source: &str) -> Result<(), Self::Error> {
        self.with_state(|state| {
            state.mounts.push((panel, source.to_string()));

            let behavior = state.behaviors.get(&panel).cloned().unwrap_or_default();
            tracing::debug!(%panel, source, ?behavior, "simulated mount");

            match behavior {
                EmbeddedBehavior::Ready => {
                    state.pending_events.push_back(LockScreenEvent::EmbeddedReady { panel });
                },
                EmbeddedBehavior::Fail(reason) => {
                    let event = LockScreenEvent::EmbeddedFailed { panel, reason };
                    state.pending_events.push_back(event);
                },
                EmbeddedBehavior::Hang => {},
                EmbeddedBehavior::Reject => {
                    return Err(SimDriverError(format!("cannot create {panel} view")));
                },
            }

            state.mounted.push(panel);
            Ok(())
        })
    }

    fn unmount_embedded(&mut self, panel: Panel) -> Result<(), Self::Error> {
        self.with_state(|state| {
            state.unmounts.push(panel);
            state.mounted.retain(|p| *p != panel);
        });
        Ok(())
    }

    async fn launch_camera(&mut self) -> Result<(), Self::Error> {
        self.with_state(|state| {
            if state.fail_camera_launch {
                return Err(SimDriverError("camera activity unavailable".to_string()));
            }
            state.camera_launches += 1;
            Ok(())
        })
    }

    fn notify(&mut self, notification: Notification) -> Result<(), Self::Error> {
        self.with_state(|state| {
            if state.auto_transitions && matches!(notification, Notification::PanelChanged { .. }) {
                let event = LockScreenEvent::TransitionEnd(TransitionSource::Overlay);
                state.pending_events.push_back(event);
            }
            state.notifications.push(notification);
        });
        Ok(())
    }

    fn present(&mut self, action: &LockScreenAction) -> Result<(), Self::Error> {
        self.with_state(|state| {
            if state.auto_transitions && matches!(action, LockScreenAction::AnimateHandle { .. }) {
                let event = LockScreenEvent::TransitionEnd(TransitionSource::Handle);
                state.pending_events.push_back(event);
            }
            state.presented.push(action.clone());
        });
        Ok(())
    }

    fn render(&mut self, screen: &LockScreen<Self::Instant>) -> Result<(), Self::Error> {
        let snapshot = ScreenSnapshot::from_screen(screen);

        if let Some(registry) = &self.invariants {
            registry.assert_all(&snapshot, "after render");
        }

        self.with_state(|state| state.frames.push(snapshot));
        Ok(())
    }

    fn stop(&mut self) {
        self.with_state(|state| state.stopped = true);
    }
}

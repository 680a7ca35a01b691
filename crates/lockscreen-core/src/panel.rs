//! Panel transition state machine.
//!
//! Exactly one panel is current at any time. Switching goes through a fixed
//! two-phase sequence:
//!
//! ```text
//!                  embedded?          ready / sync
//! switch_panel ──> load(target) ──────────────────> unload(current, target)
//!                       │                                   │
//!                       │ timeout / failure                 ↓
//!                       ↓                          current = target
//!               teardown + fallback(main)          Changed { from, to }
//! ```
//!
//! Embedded panels (camera, emergency call) must finish loading before the
//! outgoing panel starts its exit; otherwise the overlay flashes empty while
//! the embedded content boots. Requests arriving while a load is in flight are
//! coalesced: only the most recent target runs once the load completes.
//!
//! Like the other core state machines this performs no I/O. The driver
//! executes [`PanelAction`]s and reports completion through
//! [`PanelController::embedded_ready`],
//! [`PanelController::embedded_failed`] and
//! [`PanelController::overlay_transition_end`].

use std::{
    fmt,
    ops::Sub,
    time::{Duration, Instant},
};

use crate::{config::PanelConfig, error::PanelError};

/// Mutually exclusive content views hosted by the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Panel {
    /// Clock and unlock handle
    #[default]
    Main,
    /// Passcode keypad
    Passcode,
    /// Secure camera (embedded)
    Camera,
    /// Emergency dialer (embedded)
    EmergencyCall,
}

impl Panel {
    /// Stable panel name, as exposed to observers.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Passcode => "passcode",
            Self::Camera => "camera",
            Self::EmergencyCall => "emergency-call",
        }
    }

    /// Whether the panel hosts an embedded view that loads asynchronously.
    pub const fn has_embedded_view(self) -> bool {
        matches!(self, Self::Camera | Self::EmergencyCall)
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Actions returned by the panel controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelAction {
    /// Instantiate the embedded view for `panel` and report when ready
    LoadEmbedded {
        /// Panel being loaded
        panel: Panel,
        /// Embedded content source
        source: String,
    },

    /// Tear down the embedded view for `panel`
    UnloadEmbedded {
        /// Panel being torn down
        panel: Panel,
    },

    /// Clear the passcode entry unless it is showing an error
    ResetPasscode,

    /// Animate the handle and side targets back to rest
    ResetHandle,

    /// Current panel changed
    Changed {
        /// Previous panel
        from: Panel,
        /// New panel
        to: Panel,
    },

    /// Loading a panel failed; the controller already fell back
    LoadFailed(PanelError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase<I> {
    Idle,
    Loading { target: Panel, started_at: I },
}

/// Panel transition state machine.
///
/// Generic over `Instant` so load deadlines work with virtual time.
#[derive(Debug, Clone)]
pub struct PanelController<I = Instant>
where
    I: Copy + Ord + Send + Sync + Sub<Output = Duration>,
{
    config: PanelConfig,
    current: Panel,
    phase: Phase<I>,
    /// Latest request that arrived during a load. Older ones are dropped.
    queued: Option<Panel>,
    /// Cleanup that waits for the overlay exit transition.
    deferred: Vec<PanelAction>,
}

impl<I> PanelController<I>
where
    I: Copy + Ord + Send + Sync + Sub<Output = Duration>,
{
    /// Create a controller showing [`Panel::Main`].
    pub fn new(config: PanelConfig) -> Self {
        Self { config, current: Panel::Main, phase: Phase::Idle, queued: None, deferred: Vec::new() }
    }

    /// Current panel.
    pub fn current(&self) -> Panel {
        self.current
    }

    /// Panel whose embedded view is loading. `None` if idle.
    pub fn loading(&self) -> Option<Panel> {
        match self.phase {
            Phase::Loading { target, .. } => Some(target),
            Phase::Idle => None,
        }
    }

    /// Request queued behind the in-flight load. `None` if nothing queued.
    pub fn queued(&self) -> Option<Panel> {
        self.queued
    }

    /// Whether a transition is in flight.
    pub fn is_transitioning(&self) -> bool {
        self.loading().is_some()
    }

    /// Whether cleanup is waiting for the overlay transition to end.
    pub fn has_deferred(&self) -> bool {
        !self.deferred.is_empty()
    }

    /// Switch to `target`.
    ///
    /// Queued (replacing any earlier queued request) if a load is in flight.
    pub fn switch_panel(&mut self, target: Panel, now: I) -> Vec<PanelAction> {
        let mut actions = Vec::new();

        if let Phase::Loading { target: loading, .. } = self.phase {
            tracing::debug!(%loading, queued = %target, "panel switch queued behind load");
            self.queued = Some(target);
            return actions;
        }

        self.begin(target, now, &mut actions);
        actions
    }

    /// Embedded view for `panel` reported ready.
    ///
    /// Ignored unless `panel` is the one currently loading.
    pub fn embedded_ready(&mut self, panel: Panel, now: I) -> Vec<PanelAction> {
        let mut actions = Vec::new();

        match self.phase {
            Phase::Loading { target, .. } if target == panel => {
                self.complete(panel, now, &mut actions);
            },
            _ => tracing::debug!(%panel, "ignoring stale embedded ready signal"),
        }

        actions
    }

    /// Embedded view for `panel` reported a load failure.
    pub fn embedded_failed(&mut self, panel: Panel, reason: String, now: I) -> Vec<PanelAction> {
        let mut actions = Vec::new();

        match self.phase {
            Phase::Loading { target, .. } if target == panel => {
                self.fail(PanelError::LoadFailed { panel, reason }, now, &mut actions);
            },
            _ => tracing::debug!(%panel, "ignoring stale embedded failure signal"),
        }

        actions
    }

    /// Overlay exit transition finished. Releases deferred cleanup.
    pub fn overlay_transition_end(&mut self) -> Vec<PanelAction> {
        std::mem::take(&mut self.deferred)
    }

    /// Process periodic maintenance (load deadline).
    pub fn tick(&mut self, now: I) -> Vec<PanelAction> {
        let mut actions = Vec::new();

        if let Phase::Loading { target, started_at } = self.phase {
            let elapsed = now - started_at;
            if elapsed > self.config.load_timeout {
                self.fail(PanelError::LoadTimeout { panel: target, elapsed }, now, &mut actions);
            }
        }

        actions
    }

    fn embedded_source(&self, panel: Panel) -> Option<&str> {
        match panel {
            Panel::Camera => Some(&self.config.camera_source),
            Panel::EmergencyCall => Some(&self.config.emergency_call_source),
            Panel::Main | Panel::Passcode => None,
        }
    }

    fn begin(&mut self, target: Panel, now: I, actions: &mut Vec<PanelAction>) {
        if target != self.current
            && let Some(source) = self.embedded_source(target)
        {
            let source = source.to_string();
            self.flush_deferred_teardown(target, actions);
            actions.push(PanelAction::LoadEmbedded { panel: target, source });
            self.phase = Phase::Loading { target, started_at: now };
            return;
        }

        // Main and passcode have nothing to load, and an embedded panel
        // that is already current keeps its view.
        self.complete(target, now, actions);
    }

    fn complete(&mut self, target: Panel, now: I, actions: &mut Vec<PanelAction>) {
        self.phase = Phase::Idle;

        let from = self.current;
        if !(from == target && from.has_embedded_view()) {
            self.unload(from, target, actions);
        }

        self.current = target;
        if from != target {
            tracing::debug!(%from, to = %target, "panel changed");
            actions.push(PanelAction::Changed { from, to: target });
        }

        if let Some(next) = self.queued.take() {
            self.begin(next, now, actions);
        }
    }

    fn unload(&mut self, panel: Panel, incoming: Panel, actions: &mut Vec<PanelAction>) {
        match panel {
            Panel::Passcode => actions.push(PanelAction::ResetPasscode),
            Panel::Camera => actions.push(PanelAction::UnloadEmbedded { panel }),
            Panel::EmergencyCall => self.defer(PanelAction::UnloadEmbedded { panel }),
            // Handle must not snap back while the camera cross-fade runs
            Panel::Main if incoming == Panel::Camera => self.defer(PanelAction::ResetHandle),
            Panel::Main => actions.push(PanelAction::ResetHandle),
        }
    }

    fn fail(&mut self, error: PanelError, now: I, actions: &mut Vec<PanelAction>) {
        let panel = error.panel();
        tracing::warn!(%error, "panel load failed, falling back");

        self.phase = Phase::Idle;
        actions.push(PanelAction::UnloadEmbedded { panel });
        actions.push(PanelAction::LoadFailed(error));

        let fallback = match self.queued.take() {
            Some(next) if next != panel => next,
            _ => Panel::Main,
        };
        self.begin(fallback, now, actions);
    }

    fn defer(&mut self, action: PanelAction) {
        if !self.deferred.contains(&action) {
            self.deferred.push(action);
        }
    }

    /// A view about to be mounted must not be removed by a teardown that was
    /// deferred for its previous instance.
    fn flush_deferred_teardown(&mut self, panel: Panel, actions: &mut Vec<PanelAction>) {
        let teardown = PanelAction::UnloadEmbedded { panel };
        if let Some(index) = self.deferred.iter().position(|a| *a == teardown) {
            actions.push(self.deferred.remove(index));
        }
    }
}

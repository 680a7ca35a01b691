//! Lock screen state machine.
//!
//! This module defines [`LockScreen`], which wires the core state machines
//! together and dispatches every [`LockScreenEvent`] to the component that
//! owns it.
//!
//! This is a pure state machine: it consumes events plus the current time and
//! produces [`LockScreenAction`] instructions for the runtime to execute.
//!
//! # Responsibilities
//!
//! - Routes pointer events to the gesture tracker and resolves commits into
//!   unlock, passcode or camera flows.
//! - Routes lock transitions (screen power, settings) into panel requests and
//!   observer notifications.
//! - Routes keypad input to passcode entry and unlocks on a match.
//! - Translates panel controller actions into presentation actions.

use std::{
    ops::Sub,
    time::{Duration, Instant},
};

use lockscreen_core::{
    GestureGeometry, GestureTarget, GestureTracker, HitTarget, KeypadKey, LockScreenConfig,
    LockState, LockStateMachine, LockTransition, Panel, PanelAction, PanelController,
    PasscodeInput, PasscodeOutcome, PasscodeStatus, Point, Setting,
};

use crate::{
    ConnectivityState, HomePress, LockScreenAction, LockScreenEvent, Notification,
    TransitionSource,
};

/// Lock screen state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies - fully testable in simulation.
#[derive(Debug, Clone)]
pub struct LockScreen<I = Instant>
where
    I: Copy + Ord + Send + Sync + Sub<Output = Duration>,
{
    gestures: GestureTracker,
    panels: PanelController<I>,
    lock: LockStateMachine<I>,
    passcode: PasscodeInput<I>,
    connectivity: ConnectivityState,
    screen_on: bool,
    handle_animation: Option<I>,
    handle_animation_timeout: Duration,
}

impl<I> LockScreen<I>
where
    I: Copy + Ord + Send + Sync + Sub<Output = Duration>,
{
    /// Create a lock screen showing the main panel.
    pub fn new(config: LockScreenConfig) -> Self {
        Self {
            handle_animation_timeout: config.gesture.animation_timeout,
            gestures: GestureTracker::new(config.gesture),
            panels: PanelController::new(config.panel),
            lock: LockStateMachine::new(&config.settings),
            passcode: PasscodeInput::new(config.passcode),
            connectivity: ConnectivityState::default(),
            screen_on: true,
            handle_animation: None,
        }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: LockScreenEvent, now: I) -> Vec<LockScreenAction> {
        let mut actions = match event {
            LockScreenEvent::PointerDown { point, target, geometry } => {
                self.pointer_down(point, target, geometry, now)
            },
            LockScreenEvent::PointerMove { point } => {
                let feedback = self.gestures.pointer_move(point);
                feedback.map(LockScreenAction::DragFeedback).into_iter().collect()
            },
            LockScreenEvent::PointerUp { point } => self.pointer_up(point, now),
            LockScreenEvent::ScreenPower { on } => {
                self.screen_on = on;
                // The handle animation may never report its end across a power change
                let mut actions = self.cancel_gesture();
                let transition = self.lock.screen_changed(on, now);
                actions.extend(self.apply_transition(transition, now));
                actions
            },
            LockScreenEvent::Connectivity(state) => {
                tracing::debug!(has_service = state.has_service(), "connectivity changed");
                self.connectivity = state;
                vec![LockScreenAction::Render]
            },
            LockScreenEvent::HomeButton(press) => self.home_button(press, now),
            LockScreenEvent::Keypad(key) => self.keypad(key, now),
            LockScreenEvent::EmbeddedReady { panel } => {
                let actions = self.panels.embedded_ready(panel, now);
                self.apply_panel_actions(actions)
            },
            LockScreenEvent::EmbeddedFailed { panel, reason } => {
                let actions = self.panels.embedded_failed(panel, reason, now);
                self.apply_panel_actions(actions)
            },
            LockScreenEvent::TransitionEnd(TransitionSource::Overlay) => {
                let actions = self.panels.overlay_transition_end();
                self.apply_panel_actions(actions)
            },
            LockScreenEvent::TransitionEnd(TransitionSource::Handle) => self.resolve_gesture(now),
            LockScreenEvent::SettingChanged(setting) => self.apply_setting(setting, now),
            LockScreenEvent::CameraLaunchFailed { reason } => {
                tracing::warn!(%reason, "camera launch failed");
                vec![]
            },
            LockScreenEvent::Tick => self.tick(now),
            LockScreenEvent::Shutdown => return vec![LockScreenAction::Quit],
        };

        if !actions.is_empty() && !actions.contains(&LockScreenAction::Render) {
            actions.push(LockScreenAction::Render);
        }
        actions
    }

    /// Whether the device is locked.
    pub fn is_locked(&self) -> bool {
        self.lock.is_locked()
    }

    /// Lock flags.
    pub fn lock_state(&self) -> &LockState {
        self.lock.state()
    }

    /// Whether an unlock gesture currently routes through the passcode.
    pub fn requires_passcode(&self) -> bool {
        self.lock.requires_passcode()
    }

    /// Whether the last screen-on came after the passcode grace period.
    pub fn timeout_exceeded(&self) -> bool {
        self.lock.policy().timeout_exceeded()
    }

    /// Stored passcode length.
    pub fn passcode_length(&self) -> usize {
        self.lock.passcode().len()
    }

    /// Current panel.
    pub fn current_panel(&self) -> Panel {
        self.panels.current()
    }

    /// Panel whose embedded view is loading. `None` if idle.
    pub fn loading_panel(&self) -> Option<Panel> {
        self.panels.loading()
    }

    /// Panel requested behind the in-flight load. `None` if nothing queued.
    pub fn queued_panel(&self) -> Option<Panel> {
        self.panels.queued()
    }

    /// Digits entered on the passcode keypad.
    pub fn passcode_entered(&self) -> usize {
        self.passcode.entered()
    }

    /// Passcode display status.
    pub fn passcode_status(&self) -> PasscodeStatus {
        self.passcode.status()
    }

    /// Whether a committed gesture waits for its handle animation.
    pub fn gesture_pending(&self) -> bool {
        self.gestures.awaiting_resolution()
    }

    /// Whether a pointer session is open.
    pub fn is_tracking(&self) -> bool {
        self.gestures.is_tracking()
    }

    /// Last reported connectivity.
    pub fn connectivity(&self) -> &ConnectivityState {
        &self.connectivity
    }

    /// Whether the screen is on.
    pub fn is_screen_on(&self) -> bool {
        self.screen_on
    }

    fn pointer_down(
        &mut self,
        point: Point,
        target: HitTarget,
        geometry: GestureGeometry,
        now: I,
    ) -> Vec<LockScreenAction> {
        // Drag targets only exist on the main panel of a locked, lit screen
        if !self.screen_on
            || !self.lock.is_locked()
            || self.panels.current() != Panel::Main
            || self.panels.is_transitioning()
        {
            return vec![];
        }

        match self.gestures.pointer_down(point, target, geometry) {
            Some(target) => self.animate_handle(target, now),
            None => vec![],
        }
    }

    fn pointer_up(&mut self, point: Point, now: I) -> Vec<LockScreenAction> {
        let Some(release) = self.gestures.pointer_up(point) else {
            return vec![];
        };

        let mut actions: Vec<_> =
            release.feedback.map(LockScreenAction::DragFeedback).into_iter().collect();

        match release.target {
            GestureTarget::None => actions.push(LockScreenAction::ResetHandle),
            _ if release.settled => actions.extend(self.resolve_gesture(now)),
            target => actions.extend(self.animate_handle(target, now)),
        }

        actions
    }

    fn animate_handle(&mut self, target: GestureTarget, now: I) -> Vec<LockScreenAction> {
        self.handle_animation = Some(now);
        vec![LockScreenAction::AnimateHandle { target }]
    }

    /// Drop any open drag or pending commit and put the handle back.
    fn cancel_gesture(&mut self) -> Vec<LockScreenAction> {
        let active = self.gestures.is_tracking() || self.gestures.awaiting_resolution();
        self.gestures.reset();
        self.handle_animation = None;

        if active { vec![LockScreenAction::ResetHandle] } else { vec![] }
    }

    fn resolve_gesture(&mut self, now: I) -> Vec<LockScreenAction> {
        self.handle_animation = None;
        let Some(target) = self.gestures.resolve() else {
            tracing::debug!("no gesture awaiting resolution");
            return vec![];
        };

        tracing::debug!(?target, "resolving gesture");

        match target {
            GestureTarget::Unlock if self.lock.requires_passcode() => {
                self.switch_panel(Panel::Passcode, now)
            },
            GestureTarget::Unlock => self.unlock(now),
            GestureTarget::Camera if self.lock.passcode_enabled() => {
                self.switch_panel(Panel::Camera, now)
            },
            GestureTarget::Camera => {
                let mut actions = self.unlock(now);
                actions.push(LockScreenAction::LaunchCamera);
                actions
            },
            GestureTarget::None => vec![LockScreenAction::ResetHandle],
        }
    }

    fn home_button(&mut self, press: HomePress, now: I) -> Vec<LockScreenAction> {
        if !self.lock.is_locked() {
            return vec![];
        }

        let mut actions = vec![LockScreenAction::ConsumeHomeButton];
        if press == HomePress::Short {
            actions.extend(self.switch_panel(Panel::Main, now));
        }
        actions
    }

    fn keypad(&mut self, key: KeypadKey, now: I) -> Vec<LockScreenAction> {
        // The panel may already be on its way out
        if self.panels.current() != Panel::Passcode || self.panels.is_transitioning() {
            tracing::debug!(?key, "keypad input outside passcode panel");
            return vec![];
        }

        match key {
            KeypadKey::Digit(digit) => {
                match self.passcode.enter_digit(digit, self.lock.passcode(), now) {
                    PasscodeOutcome::Ignored => vec![],
                    PasscodeOutcome::Pending { .. } | PasscodeOutcome::Rejected => {
                        vec![self.passcode_updated()]
                    },
                    PasscodeOutcome::Accepted => {
                        let mut actions = vec![self.passcode_updated()];
                        actions.extend(self.unlock(now));
                        actions
                    },
                }
            },
            KeypadKey::Backspace => {
                if self.passcode.backspace() { vec![self.passcode_updated()] } else { vec![] }
            },
            KeypadKey::Cancel => self.switch_panel(Panel::Main, now),
            KeypadKey::EmergencyCall => self.switch_panel(Panel::EmergencyCall, now),
        }
    }

    fn apply_setting(&mut self, setting: Setting, now: I) -> Vec<LockScreenAction> {
        tracing::debug!(key = setting.key(), "setting changed");
        let passcode_changed = matches!(setting, Setting::Passcode(_));

        let transition = self.lock.apply(setting);
        let mut actions = self.apply_transition(transition, now);

        if passcode_changed {
            self.passcode.clear();
            actions.push(self.passcode_updated());
        }
        actions
    }

    fn tick(&mut self, now: I) -> Vec<LockScreenAction> {
        let mut actions = Vec::new();

        if self.passcode.tick(now) {
            actions.push(self.passcode_updated());
        }

        let panel_actions = self.panels.tick(now);
        actions.extend(self.apply_panel_actions(panel_actions));

        let expired = self
            .handle_animation
            .is_some_and(|started| now - started > self.handle_animation_timeout);
        if expired {
            tracing::warn!(
                timeout = ?self.handle_animation_timeout,
                "handle animation did not end, resolving gesture"
            );
            actions.extend(self.resolve_gesture(now));
        }
        actions
    }

    /// Unlock and return to the main panel.
    ///
    /// Falls back to a plain panel switch when already unlocked, so a
    /// validated passcode always leaves the passcode panel.
    fn unlock(&mut self, now: I) -> Vec<LockScreenAction> {
        match self.lock.unlock(false) {
            Some(transition) => self.apply_transition(Some(transition), now),
            None => self.switch_panel(Panel::Main, now),
        }
    }

    fn apply_transition(
        &mut self,
        transition: Option<LockTransition>,
        now: I,
    ) -> Vec<LockScreenAction> {
        let mut actions = match transition {
            None => return vec![],
            Some(LockTransition::Locked { instant }) => {
                vec![LockScreenAction::Notify(Notification::Locked { instant })]
            },
            Some(LockTransition::Unlocked { instant, play_sound }) => {
                let mut actions =
                    vec![LockScreenAction::Notify(Notification::Unlocked { instant })];
                if play_sound {
                    actions.push(LockScreenAction::PlayUnlockSound);
                }
                actions
            },
        };

        self.gestures.reset();
        self.handle_animation = None;
        actions.extend(self.switch_panel(Panel::Main, now));
        actions
    }

    fn switch_panel(&mut self, target: Panel, now: I) -> Vec<LockScreenAction> {
        let actions = self.panels.switch_panel(target, now);
        self.apply_panel_actions(actions)
    }

    fn apply_panel_actions(&mut self, actions: Vec<PanelAction>) -> Vec<LockScreenAction> {
        let mut out = Vec::with_capacity(actions.len());

        for action in actions {
            match action {
                PanelAction::LoadEmbedded { panel, source } => {
                    out.push(LockScreenAction::MountEmbedded { panel, source });
                },
                PanelAction::UnloadEmbedded { panel } => {
                    out.push(LockScreenAction::UnmountEmbedded { panel });
                },
                PanelAction::ResetPasscode => {
                    if self.passcode.reset_unless_error() {
                        out.push(self.passcode_updated());
                    }
                },
                PanelAction::ResetHandle => out.push(LockScreenAction::ResetHandle),
                PanelAction::Changed { from, to } => {
                    out.push(LockScreenAction::Notify(Notification::PanelChanged { from, to }));
                },
                PanelAction::LoadFailed(error) => {
                    out.push(LockScreenAction::PanelLoadFailed(error));
                },
            }
        }

        out
    }

    fn passcode_updated(&self) -> LockScreenAction {
        LockScreenAction::PasscodeUpdated {
            entered: self.passcode.entered(),
            status: self.passcode.status(),
        }
    }
}

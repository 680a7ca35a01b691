//! Property-based tests for the lock screen state machine.
//!
//! Tests verify that invariants hold under arbitrary event sequences.
//! This ensures behavioral correctness across all possible interleavings of
//! user input, device state and embedded view completions.

use std::time::Duration;

use lockscreen_app::{
    HomePress, LockScreen, LockScreenAction, LockScreenEvent, Notification, TransitionSource,
};
use lockscreen_core::{
    GestureGeometry, HitTarget, KeypadKey, LockScreenConfig, Panel, Point, Rect, Setting,
    Settings,
};
use lockscreen_harness::{InvariantRegistry, ScreenSnapshot};
use proptest::prelude::*;

fn geometry() -> GestureGeometry {
    GestureGeometry {
        overlay_width: 320.0,
        handle_width: 60.0,
        max_handle_offset: 120.0,
        handle: Rect::new(130.0, 400.0, 60.0, 60.0),
    }
}

/// Events paired with how far the clock moves before they arrive.
#[derive(Debug, Clone)]
struct Step {
    advance: Duration,
    event: LockScreenEvent,
}

fn point_strategy() -> impl Strategy<Value = Point> {
    (0.0f32..320.0, 200.0f32..480.0).prop_map(|(x, y)| Point::new(x, y))
}

fn hit_strategy() -> impl Strategy<Value = HitTarget> {
    prop_oneof![
        4 => Just(HitTarget::Handle),
        1 => Just(HitTarget::Track),
        1 => Just(HitTarget::AccessibilityUnlock),
        1 => Just(HitTarget::AccessibilityCamera),
        1 => Just(HitTarget::Other),
    ]
}

fn panel_strategy() -> impl Strategy<Value = Panel> {
    prop_oneof![
        Just(Panel::Main),
        Just(Panel::Passcode),
        Just(Panel::Camera),
        Just(Panel::EmergencyCall),
    ]
}

fn key_strategy() -> impl Strategy<Value = KeypadKey> {
    prop_oneof![
        6 => (0u8..=9).prop_map(KeypadKey::Digit),
        1 => Just(KeypadKey::Backspace),
        1 => Just(KeypadKey::Cancel),
        1 => Just(KeypadKey::EmergencyCall),
    ]
}

fn setting_strategy() -> impl Strategy<Value = Setting> {
    prop_oneof![
        any::<bool>().prop_map(Setting::Enabled),
        any::<bool>().prop_map(Setting::PasscodeEnabled),
        "[0-9]{1,6}".prop_map(Setting::Passcode),
        (0u64..20).prop_map(|s| Setting::RequestTimeout(Duration::from_secs(s))),
        any::<bool>().prop_map(Setting::UnlockSoundEnabled),
    ]
}

fn event_strategy() -> impl Strategy<Value = LockScreenEvent> {
    prop_oneof![
        3 => (point_strategy(), hit_strategy()).prop_map(|(point, target)| {
            LockScreenEvent::PointerDown { point, target, geometry: geometry() }
        }),
        3 => point_strategy().prop_map(|point| LockScreenEvent::PointerMove { point }),
        2 => point_strategy().prop_map(|point| LockScreenEvent::PointerUp { point }),
        2 => any::<bool>().prop_map(|on| LockScreenEvent::ScreenPower { on }),
        1 => prop_oneof![Just(HomePress::Short), Just(HomePress::Long)]
            .prop_map(LockScreenEvent::HomeButton),
        5 => key_strategy().prop_map(LockScreenEvent::Keypad),
        2 => panel_strategy().prop_map(|panel| LockScreenEvent::EmbeddedReady { panel }),
        1 => panel_strategy()
            .prop_map(|panel| LockScreenEvent::EmbeddedFailed { panel, reason: "failed".into() }),
        2 => Just(LockScreenEvent::TransitionEnd(TransitionSource::Handle)),
        1 => Just(LockScreenEvent::TransitionEnd(TransitionSource::Overlay)),
        1 => setting_strategy().prop_map(LockScreenEvent::SettingChanged),
        2 => Just(LockScreenEvent::Tick),
    ]
}

fn step_strategy() -> impl Strategy<Value = Step> {
    (0u64..3_000, event_strategy())
        .prop_map(|(ms, event)| Step { advance: Duration::from_millis(ms), event })
}

fn settings_strategy() -> impl Strategy<Value = Settings> {
    (any::<bool>(), any::<bool>()).prop_map(|(enabled, passcode_enabled)| Settings {
        enabled,
        passcode_enabled,
        passcode: "1234".into(),
        ..Settings::default()
    })
}

proptest! {
    /// Lock screen invariants hold under arbitrary event sequences.
    #[test]
    fn prop_lockscreen_invariants_hold(
        settings in settings_strategy(),
        steps in prop::collection::vec(step_strategy(), 0..80),
    ) {
        let mut screen: LockScreen<Duration> =
            LockScreen::new(LockScreenConfig::with_settings(settings));
        let invariants = InvariantRegistry::standard();
        let mut now = Duration::ZERO;

        for step in steps {
            now += step.advance;
            let _ = screen.handle(step.event.clone(), now);

            let snapshot = ScreenSnapshot::from_screen(&screen);
            prop_assert!(
                invariants.check_all(&snapshot).is_ok(),
                "Invariant violated after {:?}: {:?}", step.event, snapshot
            );
        }
    }

    /// Every non-empty batch of actions ends with exactly one render, and
    /// shutdown always quits without rendering.
    #[test]
    fn prop_render_closes_every_batch(steps in prop::collection::vec(step_strategy(), 0..60)) {
        let mut screen: LockScreen<Duration> = LockScreen::new(LockScreenConfig::default());
        let mut now = Duration::ZERO;

        for step in steps {
            now += step.advance;
            let actions = screen.handle(step.event, now);

            if !actions.is_empty() {
                prop_assert_eq!(actions.last(), Some(&LockScreenAction::Render));
                let renders = actions.iter().filter(|a| **a == LockScreenAction::Render).count();
                prop_assert_eq!(renders, 1);
            }
        }

        let actions = screen.handle(LockScreenEvent::Shutdown, now);
        prop_assert_eq!(actions, vec![LockScreenAction::Quit]);
    }

    /// Each committed gesture produces at most one unlock, no matter how
    /// many handle completions follow.
    #[test]
    fn prop_gesture_resolves_once(
        target in prop_oneof![
            Just(HitTarget::AccessibilityUnlock),
            Just(HitTarget::AccessibilityCamera),
        ],
        completions in 1usize..6,
    ) {
        let mut screen: LockScreen<Duration> = LockScreen::new(LockScreenConfig::default());
        let point = Point::new(160.0, 430.0);
        let mut actions = screen.handle(
            LockScreenEvent::PointerDown { point, target, geometry: geometry() },
            Duration::ZERO,
        );
        for _ in 0..completions {
            let event = LockScreenEvent::TransitionEnd(TransitionSource::Handle);
            actions.extend(screen.handle(event, Duration::ZERO));
        }

        let unlocks = actions
            .iter()
            .filter(|a| matches!(a, LockScreenAction::Notify(Notification::Unlocked { .. })))
            .count();
        let launches = actions.iter().filter(|a| **a == LockScreenAction::LaunchCamera).count();

        prop_assert_eq!(unlocks, 1);
        prop_assert_eq!(launches, usize::from(target == HitTarget::AccessibilityCamera));
    }
}

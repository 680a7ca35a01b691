//! Property-based tests for gesture classification.
//!
//! Drags shorter than the commit threshold must never commit, drags past it
//! must, and a commit resolves exactly once no matter how often resolution is
//! requested.

use lockscreen_core::{
    GestureConfig, GestureGeometry, GestureTarget, GestureTracker, HitTarget, Point, Rect,
};
use proptest::prelude::*;

const MAX_OFFSET: f32 = 120.0;
const ORIGIN: Point = Point::new(160.0, 430.0);

fn geometry() -> GestureGeometry {
    GestureGeometry {
        overlay_width: 320.0,
        handle_width: 60.0,
        max_handle_offset: MAX_OFFSET,
        handle: Rect::new(130.0, 400.0, 60.0, 60.0),
    }
}

fn threshold() -> f32 {
    GestureConfig::default().commit_ratio * MAX_OFFSET
}

fn drag(path: &[(f32, f32)], end: (f32, f32)) -> (GestureTracker, GestureTarget) {
    let mut gestures = GestureTracker::new(GestureConfig::default());
    gestures.pointer_down(ORIGIN, HitTarget::Handle, geometry());
    for (dx, dy) in path {
        gestures.pointer_move(Point::new(ORIGIN.x + dx, ORIGIN.y + dy));
    }
    let release = gestures.pointer_up(Point::new(ORIGIN.x + end.0, ORIGIN.y + end.1));
    let target = release.map_or(GestureTarget::None, |r| r.target);
    (gestures, target)
}

fn below_threshold() -> impl Strategy<Value = f32> {
    let t = threshold();
    (-t + 0.01)..(t - 0.01)
}

proptest! {
    #[test]
    fn prop_short_drags_commit_nothing(dx in below_threshold(), dy in below_threshold()) {
        let (mut gestures, target) = drag(&[], (dx, dy));

        prop_assert_eq!(target, GestureTarget::None);
        prop_assert!(!gestures.awaiting_resolution());
        prop_assert_eq!(gestures.resolve(), None);
    }

    #[test]
    fn prop_upward_drags_past_threshold_unlock(
        dx in 0.0f32..threshold() - 0.01,
        dy in threshold()..400.0,
    ) {
        let (_, target) = drag(&[], (dx, -dy));
        prop_assert_eq!(target, GestureTarget::Unlock);
    }

    #[test]
    fn prop_leftward_drags_past_threshold_open_camera(
        dx in threshold()..400.0,
        dy in -400.0f32..400.0,
    ) {
        let (_, target) = drag(&[], (-dx, dy));
        prop_assert_eq!(target, GestureTarget::Camera);
    }

    #[test]
    fn prop_intermediate_moves_do_not_affect_classification(
        path in prop::collection::vec((-400.0f32..400.0, -400.0f32..400.0), 0..20),
        dx in below_threshold(),
        dy in below_threshold(),
    ) {
        let (_, target) = drag(&path, (dx, dy));
        prop_assert_eq!(target, GestureTarget::None);
    }

    #[test]
    fn prop_feedback_stays_in_bounds(
        path in prop::collection::vec((-1000.0f32..1000.0, -1000.0f32..1000.0), 1..20),
    ) {
        let mut gestures = GestureTracker::new(GestureConfig::default());
        gestures.pointer_down(ORIGIN, HitTarget::Track, geometry());

        for (dx, dy) in path {
            let feedback = gestures.pointer_move(Point::new(ORIGIN.x + dx, ORIGIN.y + dy));
            prop_assert!(feedback.is_some());
            if let Some(feedback) = feedback {
                prop_assert!((0.0..=1.0).contains(&feedback.reveal));
                prop_assert!((-MAX_OFFSET..=0.0).contains(&feedback.handle_offset));
                prop_assert!((-MAX_OFFSET..=MAX_OFFSET).contains(&feedback.horizontal_offset));
            }
        }
    }

    #[test]
    fn prop_commit_resolves_exactly_once(
        dy in threshold()..400.0,
        extra_resolves in 1usize..5,
    ) {
        let (mut gestures, target) = drag(&[], (0.0, -dy));
        prop_assert_eq!(target, GestureTarget::Unlock);

        prop_assert_eq!(gestures.resolve(), Some(GestureTarget::Unlock));
        for _ in 0..extra_resolves {
            prop_assert_eq!(gestures.resolve(), None);
        }
    }
}

//! Drag gesture tracking.
//!
//! Converts raw pointer events into a committed outcome plus continuous
//! feedback for the presentation layer.
//!
//! # Lifecycle
//!
//! ```text
//! pointer_down ──> session (touched?) ──pointer_move──> feedback
//!                        │
//!                        │ pointer_up
//!                        ↓
//!              classify ──> Release { target, settled }
//!                        │
//!                        │ target != None
//!                        ↓
//!              pending commit ──resolve()──> fired once
//! ```
//!
//! Geometry is captured when the session opens and stays fixed until the
//! session ends. Measuring again mid-drag makes the handle jitter whenever
//! the layout shifts under the finger.

use crate::config::GestureConfig;

/// Curve control point of the rail when the handle rests.
const REST_CURVE_CONTROL: f32 = 150.0;

/// How far the curve control point moves over a full reveal.
const CURVE_TRAVEL: f32 = 100.0;

/// Pointer position in overlay coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal position
    pub x: f32,
    /// Vertical position (grows downward)
    pub y: f32,
}

impl Point {
    /// Create a point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in overlay coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    /// Create a rectangle.
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Whether `point` lies inside the rectangle (edges included).
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

/// Element under the pointer when it went down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitTarget {
    /// The draggable handle
    Handle,
    /// The track the handle moves along
    Track,
    /// Accessibility shortcut that unlocks without dragging
    AccessibilityUnlock,
    /// Accessibility shortcut that opens the camera without dragging
    AccessibilityCamera,
    /// Anything else on the overlay
    Other,
}

/// Layout measurements captured at session start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureGeometry {
    /// Overlay width
    pub overlay_width: f32,
    /// Handle width
    pub handle_width: f32,
    /// Maximum handle travel in either direction
    pub max_handle_offset: f32,
    /// Hit region of the handle, used for lazy activation
    pub handle: Rect,
}

/// Outcome of a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GestureTarget {
    /// Released before crossing any threshold
    #[default]
    None,
    /// Unlock the device
    Unlock,
    /// Open the camera
    Camera,
}

/// Continuous visual state of an in-progress drag.
///
/// Purely presentational. Nothing in the core reads these values back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragFeedback {
    /// Vertical handle offset, in `[-max_handle_offset, 0]`
    pub handle_offset: f32,
    /// Horizontal handle offset, in `[-max_handle_offset, max_handle_offset]`
    pub horizontal_offset: f32,
    /// Reveal progress of the side targets, in `[0, 1]`
    pub reveal: f32,
    /// Vertical offset of the side targets (half the handle's)
    pub target_offset: f32,
    /// Control point of the rail curve
    pub curve_control: f32,
}

impl DragFeedback {
    /// Feedback for a handle at rest.
    pub const REST: Self = Self {
        handle_offset: 0.0,
        horizontal_offset: 0.0,
        reveal: 0.0,
        target_offset: 0.0,
        curve_control: REST_CURVE_CONTROL,
    };
}

/// Result of releasing the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Release {
    /// Classified outcome
    pub target: GestureTarget,
    /// Feedback for the final pointer position. `None` if never touched.
    pub feedback: Option<DragFeedback>,
    /// Handle already rests at the target's end position, so no commit
    /// animation is needed before resolving.
    pub settled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct GestureSession {
    touched: bool,
    origin: Point,
    dx: f32,
    dy: f32,
    geometry: GestureGeometry,
}

impl GestureSession {
    fn new(origin: Point, touched: bool, geometry: GestureGeometry) -> Self {
        Self { touched, origin, dx: 0.0, dy: 0.0, geometry }
    }

    fn feedback(&self) -> DragFeedback {
        let reveal = -self.dy / self.geometry.max_handle_offset;
        DragFeedback {
            handle_offset: self.dy,
            horizontal_offset: self.dx,
            reveal,
            target_offset: self.dy / 2.0,
            curve_control: REST_CURVE_CONTROL - reveal * CURVE_TRAVEL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Commit {
    Pending(GestureTarget),
    Resolved,
}

/// Classify a displacement against a commit threshold.
///
/// Leftward travel wins over upward travel so a diagonal drag toward the
/// camera target never unlocks.
pub fn classify(dx: f32, dy: f32, threshold: f32) -> GestureTarget {
    if dx <= -threshold {
        GestureTarget::Camera
    } else if dx >= threshold || -dy >= threshold {
        GestureTarget::Unlock
    } else {
        GestureTarget::None
    }
}

/// Gesture state machine.
///
/// Owns at most one [`GestureSession`] and at most one commit awaiting
/// resolution.
#[derive(Debug, Clone)]
pub struct GestureTracker {
    config: GestureConfig,
    session: Option<GestureSession>,
    commit: Option<Commit>,
}

impl GestureTracker {
    /// Create an idle tracker.
    pub fn new(config: GestureConfig) -> Self {
        Self { config, session: None, commit: None }
    }

    /// Pointer went down on `target`.
    ///
    /// Returns the committed target when `target` is an accessibility
    /// shortcut. Ignored while a previous commit still awaits resolution.
    pub fn pointer_down(
        &mut self,
        point: Point,
        target: HitTarget,
        geometry: GestureGeometry,
    ) -> Option<GestureTarget> {
        if self.awaiting_resolution() {
            tracing::debug!("pointer down ignored: commit awaiting resolution");
            return None;
        }

        self.commit = None;
        self.session = None;

        let touched = match target {
            HitTarget::AccessibilityUnlock => return Some(self.commit_now(GestureTarget::Unlock)),
            HitTarget::AccessibilityCamera => return Some(self.commit_now(GestureTarget::Camera)),
            HitTarget::Handle | HitTarget::Track => true,
            HitTarget::Other => false,
        };

        let max = geometry.max_handle_offset;
        if max.is_nan() || max <= 0.0 {
            tracing::warn!(
                max_handle_offset = geometry.max_handle_offset,
                "pointer down ignored: handle has no travel"
            );
            return None;
        }

        self.session = Some(GestureSession::new(point, touched, geometry));
        None
    }

    /// Pointer moved. Returns feedback once the session is touched.
    pub fn pointer_move(&mut self, point: Point) -> Option<DragFeedback> {
        let session = self.session.as_mut()?;

        if !session.touched {
            if !session.geometry.handle.contains(point) {
                return None;
            }
            session.touched = true;
            session.origin = point;
        }

        let max = session.geometry.max_handle_offset;
        session.dy = (point.y - session.origin.y).clamp(-max, 0.0);
        session.dx = (point.x - session.origin.x).clamp(-max, max);

        Some(session.feedback())
    }

    /// Pointer released. Classifies the drag and ends the session.
    ///
    /// Returns `None` if no session was open.
    pub fn pointer_up(&mut self, point: Point) -> Option<Release> {
        self.session?;
        let feedback = self.pointer_move(point);
        let session = self.session.take()?;

        if !session.touched {
            return Some(Release { target: GestureTarget::None, feedback: None, settled: false });
        }

        let max = session.geometry.max_handle_offset;
        let threshold = self.config.commit_ratio * max;
        let target = classify(session.dx, session.dy, threshold);

        let settled = match target {
            GestureTarget::Camera => session.dx <= -max,
            GestureTarget::Unlock => session.dy <= -max || session.dx >= max,
            GestureTarget::None => false,
        };

        if target != GestureTarget::None {
            self.commit = Some(Commit::Pending(target));
        }

        tracing::debug!(?target, dx = session.dx, dy = session.dy, settled, "gesture released");

        Some(Release { target, feedback, settled })
    }

    /// Fire the pending commit.
    ///
    /// Returns the target exactly once per commit; later calls return `None`
    /// until a new commit is made.
    pub fn resolve(&mut self) -> Option<GestureTarget> {
        match self.commit {
            Some(Commit::Pending(target)) => {
                self.commit = Some(Commit::Resolved);
                Some(target)
            },
            _ => None,
        }
    }

    /// Whether a commit was classified but not yet resolved.
    pub fn awaiting_resolution(&self) -> bool {
        matches!(self.commit, Some(Commit::Pending(_)))
    }

    /// Whether a pointer session is open.
    pub fn is_tracking(&self) -> bool {
        self.session.is_some()
    }

    /// Whether the open session has reached the handle.
    pub fn is_touched(&self) -> bool {
        self.session.is_some_and(|s| s.touched)
    }

    /// Drop the session and any commit.
    pub fn reset(&mut self) {
        self.session = None;
        self.commit = None;
    }

    fn commit_now(&mut self, target: GestureTarget) -> GestureTarget {
        self.commit = Some(Commit::Pending(target));
        target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> GestureGeometry {
        GestureGeometry {
            overlay_width: 320.0,
            handle_width: 60.0,
            max_handle_offset: 120.0,
            handle: Rect::new(130.0, 400.0, 60.0, 60.0),
        }
    }

    fn tracker() -> GestureTracker {
        GestureTracker::new(GestureConfig::default())
    }

    #[test]
    fn handle_press_opens_touched_session() {
        let mut gestures = tracker();
        let committed = gestures.pointer_down(Point::new(160.0, 430.0), HitTarget::Handle, geometry());

        assert_eq!(committed, None);
        assert!(gestures.is_tracking());
        assert!(gestures.is_touched());
    }

    #[test]
    fn move_outside_handle_is_ignored_until_entering_it() {
        let mut gestures = tracker();
        gestures.pointer_down(Point::new(20.0, 100.0), HitTarget::Other, geometry());

        assert_eq!(gestures.pointer_move(Point::new(30.0, 50.0)), None);
        assert!(!gestures.is_touched());

        let feedback = gestures.pointer_move(Point::new(160.0, 430.0));
        assert_eq!(feedback, Some(DragFeedback::REST));
        assert!(gestures.is_touched());

        // Origin is where the pointer entered the handle
        let feedback = gestures.pointer_move(Point::new(160.0, 370.0));
        assert_eq!(feedback.map(|f| f.handle_offset), Some(-60.0));
    }

    #[test]
    fn vertical_offset_is_clamped() {
        let mut gestures = tracker();
        gestures.pointer_down(Point::new(160.0, 430.0), HitTarget::Handle, geometry());

        let down = gestures.pointer_move(Point::new(160.0, 500.0));
        assert_eq!(down.map(|f| f.handle_offset), Some(0.0));

        let up = gestures.pointer_move(Point::new(160.0, 100.0));
        let up = up.unwrap();
        assert_eq!(up.handle_offset, -120.0);
        assert_eq!(up.reveal, 1.0);
        assert_eq!(up.target_offset, -60.0);
        assert_eq!(up.curve_control, 50.0);
    }

    #[test]
    fn full_upward_drag_commits_unlock_settled() {
        let mut gestures = tracker();
        gestures.pointer_down(Point::new(160.0, 430.0), HitTarget::Handle, geometry());

        let release = gestures.pointer_up(Point::new(160.0, 200.0)).unwrap();
        assert_eq!(release.target, GestureTarget::Unlock);
        assert!(release.settled);
        assert!(!gestures.is_tracking());
        assert!(gestures.awaiting_resolution());
    }

    #[test]
    fn partial_leftward_drag_commits_camera_unsettled() {
        let mut gestures = tracker();
        gestures.pointer_down(Point::new(160.0, 430.0), HitTarget::Handle, geometry());

        let release = gestures.pointer_up(Point::new(60.0, 430.0)).unwrap();
        assert_eq!(release.target, GestureTarget::Camera);
        assert!(!release.settled);
    }

    #[test]
    fn short_drag_commits_nothing() {
        let mut gestures = tracker();
        gestures.pointer_down(Point::new(160.0, 430.0), HitTarget::Handle, geometry());

        let release = gestures.pointer_up(Point::new(170.0, 400.0)).unwrap();
        assert_eq!(release.target, GestureTarget::None);
        assert!(!gestures.awaiting_resolution());
        assert_eq!(gestures.resolve(), None);
    }

    #[test]
    fn untouched_release_commits_nothing() {
        let mut gestures = tracker();
        gestures.pointer_down(Point::new(10.0, 10.0), HitTarget::Other, geometry());

        let release = gestures.pointer_up(Point::new(10.0, 0.0)).unwrap();
        assert_eq!(release, Release { target: GestureTarget::None, feedback: None, settled: false });
    }

    #[test]
    fn accessibility_targets_commit_immediately() {
        let mut gestures = tracker();
        let committed =
            gestures.pointer_down(Point::default(), HitTarget::AccessibilityCamera, geometry());

        assert_eq!(committed, Some(GestureTarget::Camera));
        assert!(!gestures.is_tracking());
        assert!(gestures.awaiting_resolution());
    }

    #[test]
    fn resolve_fires_once() {
        let mut gestures = tracker();
        gestures.pointer_down(Point::default(), HitTarget::AccessibilityUnlock, geometry());

        assert_eq!(gestures.resolve(), Some(GestureTarget::Unlock));
        assert_eq!(gestures.resolve(), None);
        assert!(!gestures.awaiting_resolution());
    }

    #[test]
    fn pointer_down_ignored_while_commit_pending() {
        let mut gestures = tracker();
        gestures.pointer_down(Point::default(), HitTarget::AccessibilityUnlock, geometry());

        let committed =
            gestures.pointer_down(Point::default(), HitTarget::AccessibilityCamera, geometry());
        assert_eq!(committed, None);
        assert_eq!(gestures.resolve(), Some(GestureTarget::Unlock));
    }

    #[test]
    fn reset_drops_pending_commit() {
        let mut gestures = tracker();
        gestures.pointer_down(Point::new(160.0, 430.0), HitTarget::Handle, geometry());
        gestures.pointer_up(Point::new(60.0, 430.0));
        assert!(gestures.awaiting_resolution());

        gestures.reset();
        assert!(!gestures.awaiting_resolution());
        assert_eq!(gestures.resolve(), None);

        let committed =
            gestures.pointer_down(Point::default(), HitTarget::AccessibilityUnlock, geometry());
        assert_eq!(committed, Some(GestureTarget::Unlock));
    }

    #[test]
    fn degenerate_geometry_opens_no_session() {
        let mut gestures = tracker();
        let flat = GestureGeometry { max_handle_offset: 0.0, ..geometry() };
        gestures.pointer_down(Point::default(), HitTarget::Handle, flat);

        assert!(!gestures.is_tracking());
        assert_eq!(gestures.pointer_up(Point::default()), None);
    }

    #[test]
    fn camera_wins_diagonal_drag() {
        assert_eq!(classify(-100.0, -100.0, 90.0), GestureTarget::Camera);
        assert_eq!(classify(100.0, 0.0, 90.0), GestureTarget::Unlock);
        assert_eq!(classify(0.0, -90.0, 90.0), GestureTarget::Unlock);
        assert_eq!(classify(-89.0, -89.0, 90.0), GestureTarget::None);
    }
}

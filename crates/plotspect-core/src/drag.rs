//! Generic click-drag gesture engine.
//!
//! One [`DragController`] drives any positionable target through a
//! [`PositionAdapter`], so cursors, readout boxes, and floating panels
//! all share the same begin/update/end state machine instead of
//! subclassing a mover. A gesture is subscription lifetime, not a
//! blocked call stack: `begin` routes pointer-move/up to the target's
//! widget id, and both routes are released on `end` and on `cancel`.

use kurbo::Point;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::events::{EventBus, EventKind, SubscriptionId, WidgetId};
use crate::space::TransformSpace;

/// Restricts a gesture's effect to one coordinate component.
///
/// An enum rather than two flags, so the contradictory "both locked"
/// configuration cannot be expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AxisLock {
    #[default]
    None,
    XOnly,
    YOnly,
}

/// Position strategy supplied per target type.
///
/// `get`/`set` speak the target's local space; the controller converts
/// pointer deltas into that space before applying them.
pub trait PositionAdapter {
    /// Current position in the target's local space.
    fn get(&self) -> Point;
    /// Move the target; the post-move hook (readout refresh, redraw
    /// request) is the caller's responsibility.
    fn set(&mut self, position: Point);
}

/// Live gesture state, created on `begin` and destroyed on `end`.
#[derive(Debug)]
struct DragSession {
    target: WidgetId,
    space: TransformSpace,
    lock: AxisLock,
    /// Target position captured at gesture start; the locked component
    /// is pinned back to it on every move.
    origin: Point,
    /// Pointer position of the previous event, in local space.
    last_local: Point,
    move_sub: SubscriptionId,
    up_sub: SubscriptionId,
}

/// Generic drag gesture state machine. At most one live session.
#[derive(Debug, Default)]
pub struct DragController {
    session: Option<DragSession>,
}

impl DragController {
    /// Create an idle controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a session is currently open.
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Target of the open session, if any.
    pub fn target(&self) -> Option<WidgetId> {
        self.session.as_ref().map(|s| s.target)
    }

    /// Open a session on `target`: capture its position and the pointer
    /// position in the target's space, then route pointer-move/up to it.
    ///
    /// A second `begin` while a session is open supersedes it: the old
    /// session's routes are released first, so nothing keeps firing
    /// into an abandoned gesture.
    pub fn begin(
        &mut self,
        bus: &mut EventBus,
        target: WidgetId,
        space: TransformSpace,
        device_pos: Point,
        lock: AxisLock,
        adapter: &dyn PositionAdapter,
    ) {
        if self.session.is_some() {
            warn!("drag begin while a session is open; superseding");
            self.end(bus);
        }
        let move_sub = bus.subscribe(EventKind::PointerMove, target);
        let up_sub = bus.subscribe(EventKind::PointerUp, target);
        let origin = adapter.get();
        self.session = Some(DragSession {
            target,
            space,
            lock,
            origin,
            last_local: space.to_local(device_pos),
            move_sub,
            up_sub,
        });
        debug!("drag session opened at {origin:?} (lock {lock:?})");
    }

    /// Apply one pointer-move: local-space delta since the previous
    /// pointer position, locked component suppressed. Returns whether a
    /// session consumed the move.
    pub fn update(&mut self, device_pos: Point, adapter: &mut dyn PositionAdapter) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let local = session.space.to_local(device_pos);
        let delta = local - session.last_local;
        let old = adapter.get();
        let moved = match session.lock {
            AxisLock::None => Point::new(old.x + delta.x, old.y + delta.y),
            AxisLock::XOnly => Point::new(old.x + delta.x, session.origin.y),
            AxisLock::YOnly => Point::new(session.origin.x, old.y + delta.y),
        };
        adapter.set(moved);
        session.last_local = local;
        true
    }

    /// Close the session and release both routes. Idempotent.
    pub fn end(&mut self, bus: &mut EventBus) {
        if let Some(session) = self.session.take() {
            bus.unsubscribe(session.move_sub);
            bus.unsubscribe(session.up_sub);
            debug!("drag session closed");
        }
    }

    /// Force-close an open session early, e.g. when the dragged widget
    /// is hidden mid-gesture. Identical to a release.
    pub fn cancel(&mut self, bus: &mut EventBus) {
        self.end(bus);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::{Frame, SpaceKind};
    use kurbo::Rect;

    struct FreePoint(Point);

    impl PositionAdapter for FreePoint {
        fn get(&self) -> Point {
            self.0
        }
        fn set(&mut self, position: Point) {
            self.0 = position;
        }
    }

    fn space() -> TransformSpace {
        // Panel spans 100x100 px over a 10x10 data view: 10 px per unit.
        Frame::new(
            Rect::new(0.0, 0.0, 200.0, 200.0),
            Rect::new(0.0, 0.0, 100.0, 100.0),
            (0.0, 10.0),
            (0.0, 10.0),
        )
        .expect("valid frame")
        .resolve(SpaceKind::Data)
    }

    #[test]
    fn test_drag_applies_local_delta() {
        let mut bus = EventBus::new();
        let mut drag = DragController::new();
        let mut target = FreePoint(Point::new(5.0, 5.0));

        drag.begin(
            &mut bus,
            WidgetId::new(),
            space(),
            Point::new(50.0, 50.0),
            AxisLock::None,
            &target,
        );
        // +20 px right, +10 px down => +2 data x, -1 data y.
        assert!(drag.update(Point::new(70.0, 60.0), &mut target));
        assert!((target.0.x - 7.0).abs() < 1e-9);
        assert!((target.0.y - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_axis_lock_pins_other_component() {
        let mut bus = EventBus::new();
        let mut drag = DragController::new();
        let mut target = FreePoint(Point::new(5.0, 5.0));

        drag.begin(
            &mut bus,
            WidgetId::new(),
            space(),
            Point::new(50.0, 50.0),
            AxisLock::XOnly,
            &target,
        );
        for device in [Point::new(60.0, 80.0), Point::new(30.0, 10.0)] {
            drag.update(device, &mut target);
            assert!((target.0.y - 5.0).abs() < 1e-9);
        }
        assert!((target.0.x - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_end_is_idempotent_and_releases_routes() {
        let mut bus = EventBus::new();
        let mut drag = DragController::new();
        let target = FreePoint(Point::new(0.0, 0.0));

        drag.begin(
            &mut bus,
            WidgetId::new(),
            space(),
            Point::ZERO,
            AxisLock::None,
            &target,
        );
        assert_eq!(bus.subscription_count(), 2);
        drag.end(&mut bus);
        drag.end(&mut bus);
        assert_eq!(bus.subscription_count(), 0);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_second_begin_supersedes_with_cleanup() {
        let mut bus = EventBus::new();
        let mut drag = DragController::new();
        let target = FreePoint(Point::new(0.0, 0.0));
        let first = WidgetId::new();
        let second = WidgetId::new();

        drag.begin(&mut bus, first, space(), Point::ZERO, AxisLock::None, &target);
        drag.begin(&mut bus, second, space(), Point::ZERO, AxisLock::None, &target);

        assert_eq!(bus.subscription_count(), 2);
        assert!(!bus.is_subscribed(first, EventKind::PointerMove));
        assert!(bus.is_subscribed(second, EventKind::PointerMove));
        assert_eq!(drag.target(), Some(second));
    }

    #[test]
    fn test_cancel_matches_release() {
        let mut bus = EventBus::new();
        let mut drag = DragController::new();
        let mut target = FreePoint(Point::new(0.0, 0.0));

        drag.begin(
            &mut bus,
            WidgetId::new(),
            space(),
            Point::ZERO,
            AxisLock::None,
            &target,
        );
        drag.cancel(&mut bus);
        assert_eq!(bus.subscription_count(), 0);
        // Moves after cancellation are ignored.
        assert!(!drag.update(Point::new(50.0, 50.0), &mut target));
        assert!((target.0.x).abs() < 1e-9);
    }
}

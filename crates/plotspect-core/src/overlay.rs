//! Top-level wiring: routes host-dispatched events to cursors, floating
//! boxes, and readout affordances.
//!
//! Glue only; every invariant lives in the modules this delegates to.
//! Pointer-down hit tests run against the widget registry; move/up
//! events are forwarded solely to the ids currently routed in the
//! subscription table.

use kurbo::{Point, Rect, Size};
use log::debug;

use crate::drag::{AxisLock, DragController, PositionAdapter};
use crate::error::{OverlayError, OverlayResult};
use crate::events::{EventBus, EventKind, KeyEvent, MouseButton, PointerEvent, WidgetId};
use crate::host::{Axis, PlotHost, PrimitiveId};
use crate::pair::{CursorPair, PairCursor};
use crate::space::{Frame, SpaceKind};

/// Pick tolerance around a cursor line, device pixels.
pub const CURSOR_PICK_RADIUS: f64 = 5.0;
/// Fraction of a floating box's extent treated as its draggable edge.
const BOX_EDGE_FRACTION: f64 = 0.05;

/// What a box hosts, for routing readout affordance clicks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxRole {
    /// A checkbox panel or other plain floating box.
    Panel,
    /// The readout box of the cursor pair at this index.
    Readout(usize),
}

/// A draggable floating box (readout or panel frame). The position is
/// the lower-left anchor in the box's own space.
#[derive(Debug)]
struct FloatingBox {
    id: WidgetId,
    primitive: PrimitiveId,
    space: SpaceKind,
    position: Point,
    size: Size,
    visible: bool,
    role: BoxRole,
}

struct BoxAdapter<'a> {
    bx: &'a mut FloatingBox,
    host: &'a mut dyn PlotHost,
}

impl PositionAdapter for BoxAdapter<'_> {
    fn get(&self) -> Point {
        self.bx.position
    }

    fn set(&mut self, position: Point) {
        self.bx.position = position;
        self.host.move_primitive(self.bx.primitive, position);
    }
}

/// Action the overlay cannot perform itself and hands back to the
/// caller, who owns the host toggle widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayAction {
    None,
    /// Right-click on empty canvas: flip checkbox panel visibility.
    TogglePanels,
}

/// The inspection overlay: widget registry, routing table, and event
/// dispatch.
pub struct InspectOverlay {
    bus: EventBus,
    frame: Frame,
    pairs: Vec<CursorPair>,
    boxes: Vec<FloatingBox>,
    box_drag: DragController,
}

impl InspectOverlay {
    /// Create an overlay for the given host geometry.
    pub fn new(frame: Frame) -> Self {
        Self {
            bus: EventBus::new(),
            frame,
            pairs: Vec::new(),
            boxes: Vec::new(),
            box_drag: DragController::new(),
        }
    }

    /// Refresh the host geometry snapshot (resize, pan, zoom).
    pub fn set_frame(&mut self, frame: Frame) {
        self.frame = frame;
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Routing table, exposed for leak checks and tests.
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Register a cursor pair; returns its index.
    pub fn add_pair(&mut self, pair: CursorPair) -> usize {
        self.pairs.push(pair);
        self.pairs.len() - 1
    }

    pub fn pair(&self, index: usize) -> Option<&CursorPair> {
        self.pairs.get(index)
    }

    pub fn pair_mut(&mut self, index: usize) -> Option<&mut CursorPair> {
        self.pairs.get_mut(index)
    }

    /// Register a draggable floating box; returns its routing id. A
    /// readout role must reference an already-registered cursor pair.
    pub fn add_box(
        &mut self,
        primitive: PrimitiveId,
        space: SpaceKind,
        position: Point,
        size: Size,
        role: BoxRole,
    ) -> OverlayResult<WidgetId> {
        if let BoxRole::Readout(pair_index) = role {
            if pair_index >= self.pairs.len() {
                return Err(OverlayError::Dependency(format!(
                    "readout box references unregistered cursor pair {pair_index}"
                )));
            }
        }
        let id = WidgetId::new();
        self.boxes.push(FloatingBox {
            id,
            primitive,
            space,
            position,
            size,
            visible: true,
            role,
        });
        Ok(id)
    }

    /// Show or hide a floating box; hiding one mid-drag cancels the
    /// live session.
    pub fn set_box_visible(&mut self, id: WidgetId, visible: bool, host: &mut dyn PlotHost) {
        let Some(bx) = self.boxes.iter_mut().find(|b| b.id == id) else {
            return;
        };
        bx.visible = visible;
        let primitive = bx.primitive;
        if !visible && self.box_drag.target() == Some(id) {
            self.box_drag.cancel(&mut self.bus);
        }
        host.set_primitive_visible(primitive, visible);
    }

    /// Show or hide a cursor pair as a unit.
    pub fn set_pair_visible(&mut self, index: usize, visible: bool, host: &mut dyn PlotHost) {
        if let Some(pair) = self.pairs.get_mut(index) {
            pair.set_visible(visible, &mut self.bus, host);
        }
    }

    /// Dispatch one pointer event. Returns an action for the caller
    /// when the overlay cannot complete the behavior itself.
    pub fn handle_pointer_event(
        &mut self,
        event: &PointerEvent,
        host: &mut dyn PlotHost,
    ) -> OverlayAction {
        match event {
            PointerEvent::Down {
                position,
                button: MouseButton::Left,
            } => {
                self.on_left_down(*position, host);
                OverlayAction::None
            }
            PointerEvent::Down {
                position,
                button: MouseButton::Right,
            } => self.on_right_down(*position, host),
            PointerEvent::Down { .. } => OverlayAction::None,
            PointerEvent::Move { position } => {
                self.on_move(*position, host);
                OverlayAction::None
            }
            PointerEvent::Up { position: _, .. } => {
                self.on_up(host);
                OverlayAction::None
            }
        }
    }

    /// Dispatch one keyboard event. Key `a` toggles cursor-pair
    /// visibility: pairs in disagreement are all shown first, otherwise
    /// every pair flips.
    pub fn handle_key_event(&mut self, event: &KeyEvent, host: &mut dyn PlotHost) {
        let KeyEvent::Pressed(key) = event else {
            return;
        };
        if key != "a" && key != "A" {
            return;
        }
        let visible_count = self.pairs.iter().filter(|p| p.visible()).count();
        let target = if visible_count != 0 && visible_count != self.pairs.len() {
            true
        } else {
            visible_count == 0
        };
        for pair in &mut self.pairs {
            pair.set_visible(target, &mut self.bus, host);
        }
        host.request_redraw();
    }

    fn on_left_down(&mut self, position: Point, host: &mut dyn PlotHost) {
        if let Some((index, which)) = self.hit_cursor(position) {
            let frame = self.frame;
            if self.pairs[index].begin_drag(which, &mut self.bus, &frame, position, host) {
                debug!("cursor drag picked on pair {index}");
                return;
            }
        }
        if let Some(i) = self.hit_box(position) {
            let space = self.frame.resolve(self.boxes[i].space);
            let id = self.boxes[i].id;
            let adapter = BoxAdapter {
                bx: &mut self.boxes[i],
                host: &mut *host,
            };
            self.box_drag
                .begin(&mut self.bus, id, space, position, AxisLock::None, &adapter);
        }
    }

    fn on_right_down(&mut self, position: Point, host: &mut dyn PlotHost) -> OverlayAction {
        // Readout affordances: the lower-right icons of a readout box
        // center the pair or flip its sync mode.
        for i in 0..self.boxes.len() {
            let bx = &self.boxes[i];
            if !bx.visible {
                continue;
            }
            let BoxRole::Readout(pair_index) = bx.role else {
                continue;
            };
            let rect = self.box_device_rect(bx);
            if !rect.contains(position) {
                continue;
            }
            let x_norm = (position.x - rect.x0) / rect.width();
            // Device y grows downward: the icon row is the bottom half.
            let lower_half = position.y > rect.y0 + rect.height() / 2.0;
            if lower_half && x_norm > 0.8 {
                if let Some(pair) = self.pairs.get_mut(pair_index) {
                    pair.center(host);
                    host.request_redraw();
                }
            } else if lower_half && x_norm > 0.5 {
                if let Some(pair) = self.pairs.get_mut(pair_index) {
                    let mode = match pair.sync_mode() {
                        crate::pair::SyncMode::Independent => crate::pair::SyncMode::LockedOffset,
                        crate::pair::SyncMode::LockedOffset => crate::pair::SyncMode::Independent,
                    };
                    pair.set_sync_mode(mode, host);
                    host.request_redraw();
                }
            }
            return OverlayAction::None;
        }
        if self.hit_box(position).is_none() {
            return OverlayAction::TogglePanels;
        }
        OverlayAction::None
    }

    fn on_move(&mut self, position: Point, host: &mut dyn PlotHost) {
        let targets: Vec<WidgetId> = self.bus.targets(EventKind::PointerMove).collect();
        if targets.is_empty() {
            return;
        }
        for id in targets {
            if let Some(index) = self.pairs.iter().position(|p| p.role_of(id).is_some()) {
                self.pairs[index].on_pointer_move(position, host);
            } else if let Some(i) = self.boxes.iter().position(|b| b.id == id) {
                let mut adapter = BoxAdapter {
                    bx: &mut self.boxes[i],
                    host: &mut *host,
                };
                self.box_drag.update(position, &mut adapter);
            }
        }
        host.request_redraw();
    }

    fn on_up(&mut self, host: &mut dyn PlotHost) {
        let targets: Vec<WidgetId> = self.bus.targets(EventKind::PointerUp).collect();
        if targets.is_empty() {
            return;
        }
        for id in targets {
            if let Some(index) = self.pairs.iter().position(|p| p.role_of(id).is_some()) {
                self.pairs[index].end_drag(&mut self.bus);
            } else if self.boxes.iter().any(|b| b.id == id) {
                self.box_drag.end(&mut self.bus);
            }
        }
        host.request_redraw();
    }

    /// Hit test cursor lines in device space within the pick radius.
    fn hit_cursor(&self, device: Point) -> Option<(usize, PairCursor)> {
        let space = self.frame.resolve(SpaceKind::Data);
        for (index, pair) in self.pairs.iter().enumerate() {
            if !pair.visible() {
                continue;
            }
            for (which, cursor) in [
                (PairCursor::Primary, pair.primary()),
                (PairCursor::Secondary, pair.secondary()),
            ] {
                if !cursor.enabled() {
                    continue;
                }
                let line_device = space.to_device(cursor.line_point());
                let distance = match cursor.axis() {
                    Axis::X => (device.x - line_device.x).abs(),
                    Axis::Y => (device.y - line_device.y).abs(),
                };
                if distance <= CURSOR_PICK_RADIUS {
                    return Some((index, which));
                }
            }
        }
        None
    }

    /// Hit test floating-box edges: inside the device rect but outside
    /// its inset interior.
    fn hit_box(&self, device: Point) -> Option<usize> {
        for (i, bx) in self.boxes.iter().enumerate() {
            if !bx.visible {
                continue;
            }
            let rect = self.box_device_rect(bx);
            let margin_x = rect.width() * BOX_EDGE_FRACTION;
            let margin_y = rect.height() * BOX_EDGE_FRACTION;
            let inner = Rect::new(
                rect.x0 + margin_x,
                rect.y0 + margin_y,
                rect.x1 - margin_x,
                rect.y1 - margin_y,
            );
            if rect.contains(device) && !inner.contains(device) {
                return Some(i);
            }
        }
        None
    }

    fn box_device_rect(&self, bx: &FloatingBox) -> Rect {
        let space = self.frame.resolve(bx.space);
        let anchor = space.to_device(bx.position);
        let opposite = space.to_device(Point::new(
            bx.position.x + bx.size.width,
            bx.position.y + bx.size.height,
        ));
        Rect::from_points(anchor, opposite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::{Cursor, LabelSide};
    use crate::host::StyleProps;
    use crate::pair::SyncMode;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MockHost {
        positions: HashMap<PrimitiveId, Point>,
        visible: HashMap<PrimitiveId, bool>,
        bounds: (f64, f64),
        redraws: usize,
    }

    impl PlotHost for MockHost {
        fn move_primitive(&mut self, id: PrimitiveId, position: Point) {
            self.positions.insert(id, position);
        }
        fn set_primitive_visible(&mut self, id: PrimitiveId, visible: bool) {
            self.visible.insert(id, visible);
        }
        fn set_primitive_text(&mut self, _id: PrimitiveId, _text: &str) {}
        fn set_primitive_style(&mut self, _id: PrimitiveId, _style: StyleProps) {}
        fn view_bounds(&self, _axis: Axis) -> (f64, f64) {
            self.bounds
        }
        fn request_redraw(&mut self) {
            self.redraws += 1;
        }
    }

    fn frame() -> Frame {
        // 100x100 px panel over a 10x10 data view.
        Frame::new(
            Rect::new(0.0, 0.0, 120.0, 120.0),
            Rect::new(0.0, 0.0, 100.0, 100.0),
            (0.0, 10.0),
            (0.0, 10.0),
        )
        .expect("valid frame")
    }

    fn x_pair(primary_at: f64, secondary_at: f64) -> CursorPair {
        let primary = Cursor::new(
            Axis::X,
            primary_at,
            PrimitiveId::new(),
            PrimitiveId::new(),
            LabelSide::Near,
        );
        let secondary = Cursor::new(
            Axis::X,
            secondary_at,
            PrimitiveId::new(),
            PrimitiveId::new(),
            LabelSide::Far,
        );
        CursorPair::new(primary, secondary, PrimitiveId::new()).expect("same axis")
    }

    #[test]
    fn test_click_near_cursor_starts_drag() {
        let mut overlay = InspectOverlay::new(frame());
        let mut host = MockHost::default();
        let index = overlay.add_pair(x_pair(3.0, 7.0));

        // Data x = 3 sits at device x = 30; 4 px away is within radius.
        overlay.handle_pointer_event(
            &PointerEvent::Down {
                position: Point::new(34.0, 50.0),
                button: MouseButton::Left,
            },
            &mut host,
        );
        assert_eq!(
            overlay.pair(index).unwrap().dragging(),
            Some(PairCursor::Primary)
        );

        overlay.handle_pointer_event(
            &PointerEvent::Move {
                position: Point::new(54.0, 50.0),
            },
            &mut host,
        );
        assert!((overlay.pair(index).unwrap().primary().position() - 5.0).abs() < 1e-9);

        overlay.handle_pointer_event(
            &PointerEvent::Up {
                position: Point::new(54.0, 50.0),
                button: MouseButton::Left,
            },
            &mut host,
        );
        assert!(overlay.pair(index).unwrap().dragging().is_none());
        assert_eq!(overlay.bus().subscription_count(), 0);
    }

    #[test]
    fn test_click_far_from_cursors_is_ignored() {
        let mut overlay = InspectOverlay::new(frame());
        let mut host = MockHost::default();
        let index = overlay.add_pair(x_pair(3.0, 7.0));

        overlay.handle_pointer_event(
            &PointerEvent::Down {
                position: Point::new(50.0, 50.0),
                button: MouseButton::Left,
            },
            &mut host,
        );
        assert!(overlay.pair(index).unwrap().dragging().is_none());
        assert_eq!(overlay.bus().subscription_count(), 0);
    }

    #[test]
    fn test_key_toggle_resolves_disagreement_first() {
        let mut overlay = InspectOverlay::new(frame());
        let mut host = MockHost::default();
        let first = overlay.add_pair(x_pair(1.0, 2.0));
        let second = overlay.add_pair(x_pair(3.0, 4.0));

        overlay.set_pair_visible(second, false, &mut host);
        overlay.handle_key_event(&KeyEvent::Pressed("a".to_string()), &mut host);
        assert!(overlay.pair(first).unwrap().visible());
        assert!(overlay.pair(second).unwrap().visible());

        // In agreement now: next press hides both.
        overlay.handle_key_event(&KeyEvent::Pressed("A".to_string()), &mut host);
        assert!(!overlay.pair(first).unwrap().visible());
        assert!(!overlay.pair(second).unwrap().visible());
    }

    #[test]
    fn test_readout_box_requires_registered_pair() {
        let mut overlay = InspectOverlay::new(frame());
        let result = overlay.add_box(
            PrimitiveId::new(),
            SpaceKind::PanelNormalized,
            Point::new(0.02, 0.8),
            Size::new(0.4, 0.1),
            BoxRole::Readout(0),
        );
        assert!(matches!(result, Err(OverlayError::Dependency(_))));
    }

    #[test]
    fn test_right_click_on_empty_canvas_requests_panel_toggle() {
        let mut overlay = InspectOverlay::new(frame());
        let mut host = MockHost::default();
        let action = overlay.handle_pointer_event(
            &PointerEvent::Down {
                position: Point::new(110.0, 110.0),
                button: MouseButton::Right,
            },
            &mut host,
        );
        assert_eq!(action, OverlayAction::TogglePanels);
    }

    #[test]
    fn test_readout_center_affordance() {
        let mut overlay = InspectOverlay::new(frame());
        let mut host = MockHost {
            bounds: (0.0, 2.0),
            ..Default::default()
        };
        let index = overlay.add_pair(x_pair(0.0, 0.0));
        // Readout box: panel-normalized, anchored at (0.02, 0.8),
        // 0.4 x 0.1 => device rect x [2, 42], y [10, 20].
        overlay
            .add_box(
                PrimitiveId::new(),
                SpaceKind::PanelNormalized,
                Point::new(0.02, 0.8),
                Size::new(0.4, 0.1),
                BoxRole::Readout(index),
            )
            .expect("pair registered");

        // Lower-right corner of the box: the center affordance.
        let action = overlay.handle_pointer_event(
            &PointerEvent::Down {
                position: Point::new(40.0, 19.0),
                button: MouseButton::Right,
            },
            &mut host,
        );
        assert_eq!(action, OverlayAction::None);
        assert!((overlay.pair(index).unwrap().primary().position() - 0.9).abs() < 1e-9);
        assert!((overlay.pair(index).unwrap().secondary().position() - 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_readout_sync_affordance_flips_mode() {
        let mut overlay = InspectOverlay::new(frame());
        let mut host = MockHost::default();
        let index = overlay.add_pair(x_pair(0.0, 0.0));
        overlay
            .add_box(
                PrimitiveId::new(),
                SpaceKind::PanelNormalized,
                Point::new(0.02, 0.8),
                Size::new(0.4, 0.1),
                BoxRole::Readout(index),
            )
            .expect("pair registered");

        // Lower-middle band: the sync-mode affordance.
        overlay.handle_pointer_event(
            &PointerEvent::Down {
                position: Point::new(30.0, 19.0),
                button: MouseButton::Right,
            },
            &mut host,
        );
        assert_eq!(
            overlay.pair(index).unwrap().sync_mode(),
            SyncMode::LockedOffset
        );
    }

    #[test]
    fn test_box_edge_drag_moves_box() {
        let mut overlay = InspectOverlay::new(frame());
        let mut host = MockHost::default();
        let primitive = PrimitiveId::new();
        // Figure-normalized box: device rect x [12, 60], y [60, 108].
        let id = overlay
            .add_box(
                primitive,
                SpaceKind::FigureNormalized,
                Point::new(0.1, 0.1),
                Size::new(0.4, 0.4),
                BoxRole::Panel,
            )
            .expect("panel boxes need no pair");

        // Grab the left edge and drag 12 px right, 12 px up.
        overlay.handle_pointer_event(
            &PointerEvent::Down {
                position: Point::new(13.0, 80.0),
                button: MouseButton::Left,
            },
            &mut host,
        );
        assert_eq!(overlay.bus().subscription_count(), 2);
        overlay.handle_pointer_event(
            &PointerEvent::Move {
                position: Point::new(25.0, 68.0),
            },
            &mut host,
        );
        // 12 px over a 120 px figure is 0.1 normalized units.
        let moved = host.positions[&primitive];
        assert!((moved.x - 0.2).abs() < 1e-9);
        assert!((moved.y - 0.2).abs() < 1e-9);

        overlay.handle_pointer_event(
            &PointerEvent::Up {
                position: Point::new(25.0, 68.0),
                button: MouseButton::Left,
            },
            &mut host,
        );
        assert_eq!(overlay.bus().subscription_count(), 0);

        // Hiding the box cancels any later session mid-drag.
        overlay.handle_pointer_event(
            &PointerEvent::Down {
                position: Point::new(25.0, 80.0),
                button: MouseButton::Left,
            },
            &mut host,
        );
        if overlay.bus().subscription_count() > 0 {
            overlay.set_box_visible(id, false, &mut host);
            assert_eq!(overlay.bus().subscription_count(), 0);
        }
    }
}

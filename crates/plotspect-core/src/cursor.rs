//! Single measurement cursor: a line plus a label pinned to one axis.

use kurbo::Point;
use serde::{Deserialize, Serialize};

use crate::drag::PositionAdapter;
use crate::events::WidgetId;
use crate::host::{Axis, PlotHost, PrimitiveId};

/// Panel-normalized label anchors for x-axis cursors (bottom, top).
const X_LABEL_ANCHORS: (f64, f64) = (0.04, 0.96);
/// Panel-normalized label anchors for y-axis cursors (left, right).
const Y_LABEL_ANCHORS: (f64, f64) = (0.03, 0.97);

/// Which end of the panel the cursor label sits at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LabelSide {
    /// Bottom for x-cursors, left for y-cursors.
    #[default]
    Near,
    /// Top for x-cursors, right for y-cursors.
    Far,
}

/// A positional marker on one axis, draggable through the shared drag
/// engine. The line and label primitives are host-owned; the cursor
/// only references them.
#[derive(Debug)]
pub struct Cursor {
    id: WidgetId,
    axis: Axis,
    position: f64,
    visible: bool,
    enabled: bool,
    line: PrimitiveId,
    label: PrimitiveId,
    label_side: LabelSide,
}

impl Cursor {
    /// Create a cursor over host primitives `line` and `label`.
    pub fn new(
        axis: Axis,
        position: f64,
        line: PrimitiveId,
        label: PrimitiveId,
        label_side: LabelSide,
    ) -> Self {
        Self {
            id: WidgetId::new(),
            axis,
            position,
            visible: true,
            enabled: true,
            line,
            label,
            label_side,
        }
    }

    /// Routing identity of this cursor.
    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// Axis the cursor is pinned to.
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Current data-space position.
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Whether the cursor is currently shown.
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Whether the cursor accepts drag-begin requests.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Update the scalar position and reposition both primitives.
    /// Visibility and enablement are untouched.
    pub fn set_position(&mut self, value: f64, host: &mut dyn PlotHost) {
        self.position = value;
        host.move_primitive(self.line, self.line_point());
        host.move_primitive(self.label, self.label_point());
    }

    /// Atomically toggle line and label visibility. The stored position
    /// is unaffected.
    pub fn set_visible(&mut self, visible: bool, host: &mut dyn PlotHost) {
        self.visible = visible;
        host.set_primitive_visible(self.line, visible);
        host.set_primitive_visible(self.label, visible);
    }

    /// Gate drag picking. Disabling does not change visibility.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// `false` when hidden; otherwise whether the position lies inside
    /// the host's current view range on this axis, bounds inclusive.
    pub fn is_in_view(&self, host: &dyn PlotHost) -> bool {
        if !self.visible {
            return false;
        }
        let (low, high) = host.view_bounds(self.axis);
        low <= self.position && self.position <= high
    }

    /// Anchor point of the line primitive: the scalar on this axis, the
    /// other component unused.
    pub fn line_point(&self) -> Point {
        match self.axis {
            Axis::X => Point::new(self.position, 0.0),
            Axis::Y => Point::new(0.0, self.position),
        }
    }

    /// Blended anchor of the label: data units on the cursor axis,
    /// panel-normalized on the other.
    fn label_point(&self) -> Point {
        match self.axis {
            Axis::X => {
                let (near, far) = X_LABEL_ANCHORS;
                let anchor = match self.label_side {
                    LabelSide::Near => near,
                    LabelSide::Far => far,
                };
                Point::new(self.position, anchor)
            }
            Axis::Y => {
                let (near, far) = Y_LABEL_ANCHORS;
                let anchor = match self.label_side {
                    LabelSide::Near => near,
                    LabelSide::Far => far,
                };
                Point::new(anchor, self.position)
            }
        }
    }
}

/// [`PositionAdapter`] exposing a cursor's scalar position as a point
/// on its axis, so the generic drag engine can move it.
pub struct CursorPositionAdapter<'a> {
    cursor: &'a mut Cursor,
    host: &'a mut dyn PlotHost,
}

impl<'a> CursorPositionAdapter<'a> {
    pub fn new(cursor: &'a mut Cursor, host: &'a mut dyn PlotHost) -> Self {
        Self { cursor, host }
    }
}

impl PositionAdapter for CursorPositionAdapter<'_> {
    fn get(&self) -> Point {
        self.cursor.line_point()
    }

    fn set(&mut self, position: Point) {
        let value = match self.cursor.axis {
            Axis::X => position.x,
            Axis::Y => position.y,
        };
        self.cursor.set_position(value, self.host);
    }
}

/// Axis lock matching a cursor's movement freedom.
pub fn lock_for_axis(axis: Axis) -> crate::drag::AxisLock {
    match axis {
        Axis::X => crate::drag::AxisLock::XOnly,
        Axis::Y => crate::drag::AxisLock::YOnly,
    }
}

//! Linked cursor pair with live numeric readout.
//!
//! Two cursors on the same axis, optionally dragged as a unit: in
//! locked-offset mode the gap between them is snapshotted when a drag
//! starts and the non-dragged cursor follows to preserve it. The
//! readout text box shows both positions and their signed difference
//! after every mutation.

use kurbo::Point;
use serde::{Deserialize, Serialize};

use crate::cursor::{Cursor, CursorPositionAdapter, lock_for_axis};
use crate::drag::DragController;
use crate::error::{OverlayError, OverlayResult};
use crate::events::{EventBus, WidgetId};
use crate::host::{Axis, PlotHost, PrimitiveId};
use crate::space::{Frame, SpaceKind};

/// Fraction of the view range the cursors sit from the midpoint after
/// `center()`. X is tighter because it measures time/duration.
const CENTER_FRACTION_X: f64 = 0.05;
const CENTER_FRACTION_Y: f64 = 0.10;

/// How the two cursors move relative to each other during a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SyncMode {
    #[default]
    Independent,
    /// Dragging one cursor carries the other, preserving their gap.
    LockedOffset,
}

/// Selects one cursor of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PairCursor {
    Primary,
    Secondary,
}

/// Snapshot handed to the readout listener after every recompute.
#[derive(Debug, Clone, PartialEq)]
pub struct Readout {
    pub primary: f64,
    pub secondary: f64,
    /// Signed gap; inverted on the y-axis so a "positive gap" reads
    /// consistently across axes.
    pub delta: f64,
    /// Two-line display text, 4 decimal digits.
    pub text: String,
}

type ReadoutListener = Box<dyn FnMut(&Readout)>;

/// Two cursors sharing an axis, a sync mode, and a readout box.
pub struct CursorPair {
    axis: Axis,
    primary: Cursor,
    secondary: Cursor,
    sync: SyncMode,
    /// Gap captured at locked-drag start; `None` outside a locked drag.
    offset: Option<f64>,
    visible: bool,
    readout_box: PrimitiveId,
    drag: DragController,
    dragging: Option<PairCursor>,
    on_readout: Option<ReadoutListener>,
}

impl CursorPair {
    /// Compose two cursors and a readout text primitive. Fails if the
    /// cursors are pinned to different axes.
    pub fn new(primary: Cursor, secondary: Cursor, readout_box: PrimitiveId) -> OverlayResult<Self> {
        if primary.axis() != secondary.axis() {
            return Err(OverlayError::Configuration(format!(
                "cursor pair axes differ: {:?} vs {:?}",
                primary.axis(),
                secondary.axis()
            )));
        }
        Ok(Self {
            axis: primary.axis(),
            primary,
            secondary,
            sync: SyncMode::default(),
            offset: None,
            visible: true,
            readout_box,
            drag: DragController::new(),
            dragging: None,
            on_readout: None,
        })
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn sync_mode(&self) -> SyncMode {
        self.sync
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn primary(&self) -> &Cursor {
        &self.primary
    }

    pub fn secondary(&self) -> &Cursor {
        &self.secondary
    }

    /// Which of the pair's cursors `id` belongs to, if either.
    pub fn role_of(&self, id: WidgetId) -> Option<PairCursor> {
        if self.primary.id() == id {
            Some(PairCursor::Primary)
        } else if self.secondary.id() == id {
            Some(PairCursor::Secondary)
        } else {
            None
        }
    }

    /// Cursor currently being dragged, if a session is open.
    pub fn dragging(&self) -> Option<PairCursor> {
        self.dragging
    }

    /// Register the single-slot readout listener; a new registration
    /// replaces the previous one.
    pub fn on_readout(&mut self, listener: impl FnMut(&Readout) + 'static) {
        self.on_readout = Some(Box::new(listener));
    }

    /// Drop the readout listener.
    pub fn clear_readout_listener(&mut self) {
        self.on_readout = None;
    }

    /// Switch sync mode and refresh the readout glyph. Leaving locked
    /// mode drops any captured offset.
    pub fn set_sync_mode(&mut self, mode: SyncMode, host: &mut dyn PlotHost) {
        self.sync = mode;
        if mode == SyncMode::Independent {
            self.offset = None;
        }
        self.update_readout(host);
    }

    /// Begin dragging one cursor. In locked-offset mode the current gap
    /// `primary - secondary` is snapshotted first, with a fixed sign
    /// convention regardless of which cursor was grabbed. Returns
    /// whether a session was opened (hidden or disabled cursors refuse
    /// the pick).
    pub fn begin_drag(
        &mut self,
        which: PairCursor,
        bus: &mut EventBus,
        frame: &Frame,
        device_pos: Point,
        host: &mut dyn PlotHost,
    ) -> bool {
        let grabbed = match which {
            PairCursor::Primary => &self.primary,
            PairCursor::Secondary => &self.secondary,
        };
        if !self.visible || !grabbed.enabled() {
            return false;
        }
        if self.sync == SyncMode::LockedOffset {
            self.offset = Some(self.primary.position() - self.secondary.position());
        }
        let lock = lock_for_axis(self.axis);
        let space = frame.resolve(SpaceKind::Data);
        let cursor = match which {
            PairCursor::Primary => &mut self.primary,
            PairCursor::Secondary => &mut self.secondary,
        };
        let id = cursor.id();
        let adapter = CursorPositionAdapter::new(cursor, host);
        self.drag.begin(bus, id, space, device_pos, lock, &adapter);
        self.dragging = Some(which);
        true
    }

    /// Post-move hook: apply the pointer move to the dragged cursor,
    /// carry its partner when locked, then refresh the readout and
    /// fire the listener.
    pub fn on_pointer_move(&mut self, device_pos: Point, host: &mut dyn PlotHost) {
        let Some(which) = self.dragging else {
            return;
        };
        let moved = {
            let cursor = match which {
                PairCursor::Primary => &mut self.primary,
                PairCursor::Secondary => &mut self.secondary,
            };
            let mut adapter = CursorPositionAdapter::new(cursor, host);
            self.drag.update(device_pos, &mut adapter)
        };
        if !moved {
            return;
        }
        if self.sync == SyncMode::LockedOffset {
            if let Some(offset) = self.offset {
                match which {
                    PairCursor::Primary => {
                        let value = self.primary.position() - offset;
                        self.secondary.set_position(value, host);
                    }
                    PairCursor::Secondary => {
                        let value = self.secondary.position() + offset;
                        self.primary.set_position(value, host);
                    }
                }
            }
        }
        self.update_readout(host);
    }

    /// Close the open drag session. Idempotent.
    pub fn end_drag(&mut self, bus: &mut EventBus) {
        self.drag.end(bus);
        self.dragging = None;
        self.offset = None;
    }

    /// Force-close a session early; semantics identical to a release.
    pub fn cancel_drag(&mut self, bus: &mut EventBus) {
        self.end_drag(bus);
    }

    /// Show or hide both cursors and the readout as one unit. Hiding
    /// mid-drag cancels the live session so no stale routes survive.
    pub fn set_visible(&mut self, visible: bool, bus: &mut EventBus, host: &mut dyn PlotHost) {
        if !visible && self.dragging.is_some() {
            self.cancel_drag(bus);
        }
        self.visible = visible;
        self.primary.set_visible(visible, host);
        self.secondary.set_visible(visible, host);
        host.set_primitive_visible(self.readout_box, visible);
    }

    /// Convenience inverse of the current visibility.
    pub fn toggle_visible(&mut self, bus: &mut EventBus, host: &mut dyn PlotHost) {
        self.set_visible(!self.visible, bus, host);
    }

    /// Set both cursor positions directly and refresh the readout.
    pub fn set_positions(&mut self, primary: f64, secondary: f64, host: &mut dyn PlotHost) {
        self.primary.set_position(primary, host);
        self.secondary.set_position(secondary, host);
        self.update_readout(host);
    }

    /// Reset both cursors around the current view midpoint: 5% of the
    /// view range on the x-axis, 10% on the y-axis.
    pub fn center(&mut self, host: &mut dyn PlotHost) {
        let (low, high) = host.view_bounds(self.axis);
        let mid = (low + high) / 2.0;
        let range = high - low;
        let fraction = match self.axis {
            Axis::X => CENTER_FRACTION_X,
            Axis::Y => CENTER_FRACTION_Y,
        };
        self.set_positions(mid - range * fraction, mid + range * fraction, host);
    }

    /// `false` unless both cursors are visible and inside the view.
    pub fn is_in_view(&self, host: &dyn PlotHost) -> bool {
        self.primary.is_in_view(host) && self.secondary.is_in_view(host)
    }

    /// Compute the current readout snapshot.
    pub fn readout(&self) -> Readout {
        let p = self.primary.position();
        let s = self.secondary.position();
        let (tag, delta) = match self.axis {
            Axis::X => ("x", s - p),
            Axis::Y => ("y", p - s),
        };
        // Glyph padding differs per mode so the >||< icon stays put.
        let mode = match self.sync {
            SyncMode::LockedOffset => "[══]       >||<",
            SyncMode::Independent => "[―][―]    >||<",
        };
        let text = format!("{tag}1 = {p:.4}    \u{2206}{tag} = {delta:.4}\n{tag}2 = {s:.4}      {mode}");
        Readout {
            primary: p,
            secondary: s,
            delta,
            text,
        }
    }

    fn update_readout(&mut self, host: &mut dyn PlotHost) {
        let readout = self.readout();
        host.set_primitive_text(self.readout_box, &readout.text);
        if let Some(listener) = self.on_readout.as_mut() {
            listener(&readout);
        }
    }
}

//! Boundary traits for the host plotting surface.
//!
//! The overlay never draws anything. It references primitives the host
//! created (cursor lines, labels, readout boxes, plotted series) by id
//! and mutates their position, visibility, text, and style through
//! [`PlotHost`]. Checkbox panels additionally talk to the host's raw
//! toggle widget through [`ToggleWidget`].

use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier for a host-owned renderable primitive.
///
/// Primitives are registered by the host at construction time; the
/// overlay only ever addresses them by id, never by object identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrimitiveId(Uuid);

impl PrimitiveId {
    /// Mint a fresh primitive id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PrimitiveId {
    fn default() -> Self {
        Self::new()
    }
}

/// Plot axis a cursor or view range is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

/// Style properties the overlay pushes onto primitives.
///
/// `alpha` always applies; the optional fields are not touched by the
/// host when left as `None`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StyleProps {
    /// Opacity in `[0, 1]`.
    pub alpha: f64,
    /// Stroke width for line primitives.
    pub line_width: Option<f64>,
    /// Draw order; larger values draw on top.
    pub z_order: Option<f64>,
}

impl StyleProps {
    /// Alpha-only style update.
    pub fn alpha(alpha: f64) -> Self {
        Self {
            alpha,
            line_width: None,
            z_order: None,
        }
    }
}

/// The host plotting surface.
///
/// Position semantics depend on the primitive kind: cursor lines take
/// the data-space scalar on their axis (the other component is
/// ignored), cursor labels take a blended point (data on the cursor
/// axis, panel-normalized on the other), and floating boxes take their
/// anchor corner in the space they were registered in.
pub trait PlotHost {
    /// Reposition a primitive.
    fn move_primitive(&mut self, id: PrimitiveId, position: Point);
    /// Show or hide a primitive.
    fn set_primitive_visible(&mut self, id: PrimitiveId, visible: bool);
    /// Replace the text of a text primitive.
    fn set_primitive_text(&mut self, id: PrimitiveId, text: &str);
    /// Apply style properties to a primitive.
    fn set_primitive_style(&mut self, id: PrimitiveId, style: StyleProps);
    /// Current visible data range `(low, high)` on an axis.
    fn view_bounds(&self, axis: Axis) -> (f64, f64);
    /// Ask the host to schedule a redraw.
    fn request_redraw(&mut self);
}

/// The host's raw checkbox widget.
///
/// The visual check state is all the host exposes; the overlay keeps
/// the authoritative logical state itself and drives the visuals to
/// match (see `checkbox` module for why the two are decoupled).
pub trait ToggleWidget {
    /// Visual check state of every box, in construction order.
    fn status(&self) -> Vec<bool>;
    /// Flip the visual state of one box.
    fn set_active(&mut self, index: usize);
}

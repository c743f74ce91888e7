//! Coordinate conversion between device pixels and widget-local spaces.
//!
//! The pointer always reports device pixels, but drag deltas must be
//! computed in whatever space the dragged widget's position setter
//! expects: data units for cursors, panel-normalized units for readout
//! boxes, figure-normalized units for floating panels. A [`Frame`]
//! snapshots the host geometry and resolves the conversion pair for a
//! given [`SpaceKind`].

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

use crate::error::{OverlayError, OverlayResult};

/// The local coordinate space a widget's position lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpaceKind {
    /// Plot data units inside the panel.
    Data,
    /// `[0, 1]` normalized over the panel rectangle.
    PanelNormalized,
    /// `[0, 1]` normalized over the whole figure canvas.
    FigureNormalized,
}

/// Snapshot of the host geometry needed to resolve transforms.
///
/// Device y grows downward; data and normalized y grow upward, so every
/// conversion flips the vertical axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    figure: Rect,
    panel: Rect,
    view_x: (f64, f64),
    view_y: (f64, f64),
}

impl Frame {
    /// Build a frame from the figure and panel rectangles (device
    /// pixels) and the panel's data-space view ranges.
    pub fn new(
        figure: Rect,
        panel: Rect,
        view_x: (f64, f64),
        view_y: (f64, f64),
    ) -> OverlayResult<Self> {
        if figure.width() <= 0.0 || figure.height() <= 0.0 {
            return Err(OverlayError::Configuration(format!(
                "degenerate figure rect {figure:?}"
            )));
        }
        if panel.width() <= 0.0 || panel.height() <= 0.0 {
            return Err(OverlayError::Configuration(format!(
                "degenerate panel rect {panel:?}"
            )));
        }
        if (view_x.1 - view_x.0) == 0.0 || (view_y.1 - view_y.0) == 0.0 {
            return Err(OverlayError::Configuration(
                "empty data view span".to_string(),
            ));
        }
        Ok(Self {
            figure,
            panel,
            view_x,
            view_y,
        })
    }

    /// Resolve the conversion pair for a widget living in `kind`.
    pub fn resolve(&self, kind: SpaceKind) -> TransformSpace {
        TransformSpace {
            kind,
            figure: self.figure,
            panel: self.panel,
            view_x: self.view_x,
            view_y: self.view_y,
        }
    }
}

/// A stateless, side-effect-free conversion pair for one space.
///
/// `to_local` and `to_device` are mutual inverses up to floating-point
/// tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformSpace {
    kind: SpaceKind,
    figure: Rect,
    panel: Rect,
    view_x: (f64, f64),
    view_y: (f64, f64),
}

impl TransformSpace {
    /// The space this pair converts to and from.
    pub fn kind(&self) -> SpaceKind {
        self.kind
    }

    /// Convert a device-pixel position into this space.
    pub fn to_local(&self, device: Point) -> Point {
        match self.kind {
            SpaceKind::Data => {
                let nx = (device.x - self.panel.x0) / self.panel.width();
                let ny = (self.panel.y1 - device.y) / self.panel.height();
                Point::new(
                    self.view_x.0 + nx * (self.view_x.1 - self.view_x.0),
                    self.view_y.0 + ny * (self.view_y.1 - self.view_y.0),
                )
            }
            SpaceKind::PanelNormalized => normalize(self.panel, device),
            SpaceKind::FigureNormalized => normalize(self.figure, device),
        }
    }

    /// Convert a position in this space back into device pixels.
    pub fn to_device(&self, local: Point) -> Point {
        match self.kind {
            SpaceKind::Data => {
                let nx = (local.x - self.view_x.0) / (self.view_x.1 - self.view_x.0);
                let ny = (local.y - self.view_y.0) / (self.view_y.1 - self.view_y.0);
                Point::new(
                    self.panel.x0 + nx * self.panel.width(),
                    self.panel.y1 - ny * self.panel.height(),
                )
            }
            SpaceKind::PanelNormalized => denormalize(self.panel, local),
            SpaceKind::FigureNormalized => denormalize(self.figure, local),
        }
    }
}

fn normalize(rect: Rect, device: Point) -> Point {
    Point::new(
        (device.x - rect.x0) / rect.width(),
        (rect.y1 - device.y) / rect.height(),
    )
}

fn denormalize(rect: Rect, local: Point) -> Point {
    Point::new(
        rect.x0 + local.x * rect.width(),
        rect.y1 - local.y * rect.height(),
    )
}

//! Plotspect Core Library
//!
//! Host-agnostic interaction layer for 2D plots: draggable measurement
//! cursors with live readouts, exclusive checkbox groups, and
//! legend-driven series emphasis. The host rendering toolkit stays
//! behind the [`host::PlotHost`] trait; this crate owns only the
//! interaction state machines.

pub mod checkbox;
pub mod cursor;
pub mod drag;
pub mod error;
pub mod events;
pub mod host;
pub mod legend;
pub mod overlay;
pub mod pair;
pub mod space;

pub use checkbox::{CheckboxGroup, CheckboxItem};
pub use cursor::{Cursor, CursorPositionAdapter, LabelSide};
pub use drag::{AxisLock, DragController, PositionAdapter};
pub use error::{OverlayError, OverlayResult};
pub use events::{EventBus, EventKind, KeyEvent, MouseButton, PointerEvent, SubscriptionId, WidgetId};
pub use host::{Axis, PlotHost, PrimitiveId, StyleProps, ToggleWidget};
pub use legend::{EmphasisStyle, LegendEntry, LegendHighlighter};
pub use overlay::{BoxRole, InspectOverlay, OverlayAction, CURSOR_PICK_RADIUS};
pub use pair::{CursorPair, PairCursor, Readout, SyncMode};
pub use space::{Frame, SpaceKind, TransformSpace};

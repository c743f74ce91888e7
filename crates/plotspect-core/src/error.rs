//! Error types for overlay construction and configuration.

use thiserror::Error;

/// Errors raised while building or configuring overlay widgets.
///
/// Both variants are fatal for the widget being constructed: a failed
/// widget is never returned half-built, and siblings already attached to
/// the same panel are unaffected. Lookups by unknown name (checkbox
/// items, legend labels) are deliberately *not* errors; they resolve to
/// no-ops or empty results because interactive panels are queried
/// speculatively.
#[derive(Debug, Error)]
pub enum OverlayError {
    /// Invalid construction arguments (degenerate geometry, mismatched
    /// cursor axes, duplicate names).
    #[error("invalid configuration: {0}")]
    Configuration(String),
    /// A widget references another that was never registered, e.g. a
    /// readout box naming a cursor pair the overlay does not hold.
    #[error("missing dependency: {0}")]
    Dependency(String),
}

/// Result type for overlay operations.
pub type OverlayResult<T> = Result<T, OverlayError>;

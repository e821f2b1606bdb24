//! Geometry value types consumed by the trellis view engine.

/// Error types for geometry operations.
mod error;
/// Width/height size type.
mod expanse;
/// Edge insets.
mod insets;
/// Point helpers.
mod point;
/// Rectangle operations.
mod rect;

pub use error::{Error, Result};
pub use expanse::Expanse;
pub use insets::Insets;
pub use point::Point;
pub use rect::Rect;

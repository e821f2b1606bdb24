//! Geometry types used throughout the tree.

pub use ::geom::{Expanse, Insets, Point, Rect};

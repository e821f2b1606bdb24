//! Stock view behaviours.

mod leaf;
mod linear;
mod stack;

pub use leaf::Leaf;
pub use linear::{Linear, Orientation};
pub use stack::Stack;

/// Extent of a measured size plus signed margins, floored at zero.
fn span(size: u32, margins: i32) -> u32 {
    (i64::from(size) + i64::from(margins)).clamp(0, i64::from(u32::MAX)) as u32
}

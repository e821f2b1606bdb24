/// Distances inward from each edge of a rectangle.
///
/// Used for padding, drawable padding and optical insets. Values are unsigned,
/// so an inset can never be negative.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Insets {
    /// Left edge inset.
    pub left: u32,
    /// Top edge inset.
    pub top: u32,
    /// Right edge inset.
    pub right: u32,
    /// Bottom edge inset.
    pub bottom: u32,
}

impl Insets {
    /// Zero insets on every edge.
    pub const NONE: Self = Self::new(0, 0, 0, 0);

    /// Construct insets from the four edges.
    pub const fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// The same inset on all four edges.
    pub const fn all(v: u32) -> Self {
        Self::new(v, v, v, v)
    }

    /// Combined left and right inset.
    pub fn horizontal(&self) -> u32 {
        self.left.saturating_add(self.right)
    }

    /// Combined top and bottom inset.
    pub fn vertical(&self) -> u32 {
        self.top.saturating_add(self.bottom)
    }

    /// Are all edges zero?
    pub fn is_zero(&self) -> bool {
        *self == Self::NONE
    }
}

use super::{Expanse, Insets, Point};
use crate::{Error, Result};

/// An axis-aligned rectangle in signed pixel coordinates.
///
/// Edges are half-open: `left` and `top` are inside the rectangle, `right`
/// and `bottom` are not. A rectangle is always well-formed (`left <= right`,
/// `top <= bottom`); constructors that take raw edges reject anything else.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Rect {
    /// Left edge.
    left: i32,
    /// Top edge.
    top: i32,
    /// Right edge, exclusive.
    right: i32,
    /// Bottom edge, exclusive.
    bottom: i32,
}

impl Rect {
    /// Construct a rectangle from its four edges.
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Result<Self> {
        if left > right || top > bottom {
            return Err(Error::Geometry(format!(
                "malformed rect: ({left}, {top}, {right}, {bottom})"
            )));
        }
        Ok(Self {
            left,
            top,
            right,
            bottom,
        })
    }

    /// Construct a rectangle from an origin and a size. The far edges saturate.
    pub fn at(origin: Point, size: Expanse) -> Self {
        Self {
            left: origin.x,
            top: origin.y,
            right: saturating_extend(origin.x, size.w),
            bottom: saturating_extend(origin.y, size.h),
        }
    }

    /// Construct a rectangle at the origin with the given size.
    pub fn sized(w: u32, h: u32) -> Self {
        Self::at(Point::zero(), Expanse::new(w, h))
    }

    /// The zero rectangle.
    pub const fn zero() -> Self {
        Self {
            left: 0,
            top: 0,
            right: 0,
            bottom: 0,
        }
    }

    /// Left edge.
    pub fn left(&self) -> i32 {
        self.left
    }

    /// Top edge.
    pub fn top(&self) -> i32 {
        self.top
    }

    /// Right edge, exclusive.
    pub fn right(&self) -> i32 {
        self.right
    }

    /// Bottom edge, exclusive.
    pub fn bottom(&self) -> i32 {
        self.bottom
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.right.abs_diff(self.left)
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.bottom.abs_diff(self.top)
    }

    /// The size of this rectangle.
    pub fn size(&self) -> Expanse {
        Expanse::new(self.width(), self.height())
    }

    /// The top-left corner.
    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Does this rectangle enclose no pixels?
    pub fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    /// Does this rectangle contain the point?
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.left && p.x < self.right && p.y >= self.top && p.y < self.bottom
    }

    /// Does this rectangle completely enclose the other? An empty rectangle
    /// encloses nothing.
    pub fn contains(&self, other: &Self) -> bool {
        !self.is_empty()
            && self.left <= other.left
            && self.top <= other.top
            && self.right >= other.right
            && self.bottom >= other.bottom
    }

    /// The intersection of two rectangles, or `None` if they do not overlap.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right.min(other.right);
        let bottom = self.bottom.min(other.bottom);
        if left >= right || top >= bottom {
            return None;
        }
        Some(Self {
            left,
            top,
            right,
            bottom,
        })
    }

    /// The bounding union of two rectangles. Empty rectangles contribute
    /// nothing.
    pub fn union(&self, other: &Self) -> Self {
        if other.is_empty() {
            return *self;
        }
        if self.is_empty() {
            return *other;
        }
        Self {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Translate the rectangle, saturating at the integer bounds.
    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::at(self.origin().offset(dx, dy), self.size())
    }

    /// Shrink the rectangle by the given insets. Insets larger than the
    /// rectangle collapse it to an empty rectangle at the clamped position.
    pub fn inset(&self, insets: Insets) -> Self {
        let left = saturating_extend(self.left, insets.left).min(self.right);
        let top = saturating_extend(self.top, insets.top).min(self.bottom);
        let right = saturating_retract(self.right, insets.right).max(left);
        let bottom = saturating_retract(self.bottom, insets.bottom).max(top);
        Self {
            left,
            top,
            right,
            bottom,
        }
    }
}

/// Add an unsigned extent to a signed coordinate, saturating.
fn saturating_extend(v: i32, by: u32) -> i32 {
    (v as i64 + by as i64).clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Subtract an unsigned extent from a signed coordinate, saturating.
fn saturating_retract(v: i32, by: u32) -> i32 {
    (v as i64 - by as i64).clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

//! Per-child layout parameters, consulted by the parent during measure and
//! layout.

use crate::core::ResolvedDirection;

/// A requested size along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    /// An exact size in pixels.
    Px(u32),
    /// As large as the parent allows.
    MatchParent,
    /// As large as the content needs.
    WrapContent,
}

/// Margins around a child. Start and end margins, when set, take precedence
/// over left and right once resolved against a layout direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Margins {
    /// Left margin as given.
    left: i32,
    /// Top margin.
    top: i32,
    /// Right margin as given.
    right: i32,
    /// Bottom margin.
    bottom: i32,
    /// Relative start margin.
    start: Option<i32>,
    /// Relative end margin.
    end: Option<i32>,
    /// Effective left margin after resolution.
    resolved_left: i32,
    /// Effective right margin after resolution.
    resolved_right: i32,
    /// Direction the effective margins were computed for.
    resolved_for: Option<ResolvedDirection>,
}

impl Margins {
    /// Absolute margins.
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
            resolved_left: left,
            resolved_right: right,
            ..Self::default()
        }
    }

    /// The same margin on every side.
    pub fn all(v: i32) -> Self {
        Self::new(v, v, v, v)
    }

    /// Direction-relative margins.
    pub fn relative(start: i32, top: i32, end: i32, bottom: i32) -> Self {
        let mut m = Self::new(0, top, 0, bottom);
        m.start = Some(start);
        m.end = Some(end);
        m
    }

    /// Set the start margin. Takes effect on the next resolution.
    pub fn set_start(&mut self, start: i32) {
        self.start = Some(start);
        self.resolved_for = None;
    }

    /// Set the end margin. Takes effect on the next resolution.
    pub fn set_end(&mut self, end: i32) {
        self.end = Some(end);
        self.resolved_for = None;
    }

    /// Map start and end onto left and right for a direction. A no-op when
    /// already resolved for that direction.
    pub fn resolve(&mut self, direction: ResolvedDirection) {
        if self.resolved_for == Some(direction) {
            return;
        }
        let (left, right) = match direction {
            ResolvedDirection::Ltr => (self.start, self.end),
            ResolvedDirection::Rtl => (self.end, self.start),
        };
        self.resolved_left = left.unwrap_or(self.left);
        self.resolved_right = right.unwrap_or(self.right);
        self.resolved_for = Some(direction);
    }

    /// Is a resolution for `direction` current?
    pub fn is_resolved_for(&self, direction: ResolvedDirection) -> bool {
        self.resolved_for == Some(direction)
    }

    /// Forget the current resolution.
    pub(crate) fn reset_resolution(&mut self) {
        self.resolved_for = None;
    }

    /// Effective left margin.
    pub fn left(&self) -> i32 {
        self.resolved_left
    }

    /// Top margin.
    pub fn top(&self) -> i32 {
        self.top
    }

    /// Effective right margin.
    pub fn right(&self) -> i32 {
        self.resolved_right
    }

    /// Bottom margin.
    pub fn bottom(&self) -> i32 {
        self.bottom
    }

    /// Sum of effective left and right margins.
    pub fn horizontal(&self) -> i32 {
        self.resolved_left + self.resolved_right
    }

    /// Sum of top and bottom margins.
    pub fn vertical(&self) -> i32 {
        self.top + self.bottom
    }
}

/// Layout parameters a child carries for its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayoutParams {
    /// Requested width.
    pub width: Dimension,
    /// Requested height.
    pub height: Dimension,
    /// Margins, for parents that honour them.
    pub margins: Margins,
}

impl LayoutParams {
    /// Parameters with the given dimensions and no margins.
    pub fn new(width: Dimension, height: Dimension) -> Self {
        Self {
            width,
            height,
            margins: Margins::default(),
        }
    }

    /// Wrap content on both axes.
    pub fn wrap() -> Self {
        Self::new(Dimension::WrapContent, Dimension::WrapContent)
    }

    /// Match the parent on both axes.
    pub fn fill() -> Self {
        Self::new(Dimension::MatchParent, Dimension::MatchParent)
    }

    /// Exact pixel size on both axes.
    pub fn px(w: u32, h: u32) -> Self {
        Self::new(Dimension::Px(w), Dimension::Px(h))
    }

    /// Builder: attach margins.
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self::wrap()
    }
}

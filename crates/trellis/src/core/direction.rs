/// Requested layout direction for a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LayoutDirection {
    /// Left to right.
    Ltr,
    /// Right to left.
    Rtl,
    /// Take the parent's resolved direction.
    #[default]
    Inherit,
    /// Take the direction of the root's locale.
    Locale,
}

/// A concrete layout direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResolvedDirection {
    /// Left to right.
    #[default]
    Ltr,
    /// Right to left.
    Rtl,
}

impl ResolvedDirection {
    /// Is this right to left?
    pub fn is_rtl(self) -> bool {
        self == Self::Rtl
    }
}

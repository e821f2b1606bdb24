use bitflags::bitflags;

bitflags! {
    /// Public configuration flags for a view.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ViewFlags: u32 {
        /// The view may take input focus.
        const FOCUSABLE = 1 << 0;
        /// The view may take focus while the root is in touch mode.
        const FOCUSABLE_IN_TOUCH_MODE = 1 << 1;
        /// The view draws nothing itself; `on_draw` is skipped.
        const WILL_NOT_DRAW = 1 << 2;
        /// The view ignores input and reports a disabled drawable state.
        const DISABLED = 1 << 3;
    }
}

impl Default for ViewFlags {
    fn default() -> Self {
        Self::empty()
    }
}

bitflags! {
    /// Transient engine state for a view.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub(crate) struct PrivateFlags: u32 {
        /// Some part of the view needs redrawing.
        const DIRTY = 1 << 0;
        /// The view was invalidated since it last drew.
        const INVALIDATED = 1 << 1;
        /// A frame has been assigned at least once.
        const HAS_BOUNDS = 1 << 2;
        /// The view drew since its last full invalidation.
        const DRAWN = 1 << 3;
        /// Set by the measured-dimension setter; checked after `on_measure`.
        const MEASURED_DIMENSION_SET = 1 << 4;
        /// Measure and layout must run regardless of caches.
        const FORCE_LAYOUT = 1 << 5;
        /// `on_layout` must run on the next `layout` call.
        const LAYOUT_REQUIRED = 1 << 6;
        /// The measured size came from the cache; remeasure before layout.
        const MEASURE_NEEDED_BEFORE_LAYOUT = 1 << 7;
        /// The view has completed at least one layout.
        const IS_LAID_OUT = 1 << 8;
        /// The drawable state must be recomputed.
        const DRAWABLE_STATE_DIRTY = 1 << 9;
        /// Relative padding has been mapped to left/right.
        const PADDING_RESOLVED = 1 << 10;
        /// The layout direction has been resolved.
        const LAYOUT_DIRECTION_RESOLVED = 1 << 11;
        /// The resolved layout direction is right to left.
        const LAYOUT_DIRECTION_RTL = 1 << 12;
        /// This view holds input focus.
        const FOCUSED = 1 << 13;
        /// The pointer is over this view.
        const HOVERED = 1 << 14;
        /// The view is pressed.
        const PRESSED = 1 << 15;
        /// The background bounds must be pushed before the next draw.
        const BACKGROUND_BOUNDS_DIRTY = 1 << 16;
        /// Explicitly invalidated; the next measure skips the cache.
        const REMEASURE = 1 << 17;
    }
}

bitflags! {
    /// Configuration flags for a view group.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct GroupFlags: u32 {
        /// Clip each child's drawing to the child's bounds, and clip
        /// invalidations to the group's bounds.
        const CLIP_CHILDREN = 1 << 0;
        /// Clip children to the group's padded content area.
        const CLIP_TO_PADDING = 1 << 1;
        /// On touchscreen devices, focus cannot enter this group's descendants.
        const TOUCHSCREEN_BLOCKS_FOCUS = 1 << 2;
    }
}

impl Default for GroupFlags {
    fn default() -> Self {
        Self::CLIP_CHILDREN | Self::CLIP_TO_PADDING
    }
}

/// View visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    /// Drawn and laid out.
    #[default]
    Visible,
    /// Laid out but not drawn.
    Invisible,
    /// Neither drawn nor given space in layout.
    Gone,
}

/// How a group orders itself against its descendants when taking focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DescendantFocusability {
    /// Try the group itself first, then its children.
    #[default]
    BeforeDescendants,
    /// Try the children first, then the group itself.
    AfterDescendants,
    /// Focus never enters the children.
    BlockDescendants,
}

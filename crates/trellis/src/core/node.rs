use std::{any::Any, collections::HashMap, fmt};

use crate::{
    core::{
        behavior::ViewBehavior,
        direction::{LayoutDirection, ResolvedDirection},
        flags::{DescendantFocusability, GroupFlags, PrivateFlags, ViewFlags, Visibility},
        id::{NO_ID, NodeId},
    },
    drawable::Drawable,
    geom::{Expanse, Insets, Point, Rect},
    measure_spec::{MEASURED_SIZE_MASK, MEASURED_STATE_MASK, MEASURED_HEIGHT_STATE_SHIFT, MeasureSpec},
    params::LayoutParams,
};

/// Padding as configured, plus its direction-resolved form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Padding {
    /// Absolute padding as last set.
    pub(crate) user: Insets,
    /// Relative start padding, overriding left or right once resolved.
    pub(crate) start: Option<u32>,
    /// Relative end padding.
    pub(crate) end: Option<u32>,
    /// Effective padding.
    pub(crate) resolved: Insets,
}

impl Padding {
    /// Compute the effective padding for a direction.
    pub(crate) fn resolve(&mut self, direction: ResolvedDirection) {
        let (left, right) = match direction {
            ResolvedDirection::Ltr => (self.start, self.end),
            ResolvedDirection::Rtl => (self.end, self.start),
        };
        self.resolved = Insets::new(
            left.unwrap_or(self.user.left),
            self.user.top,
            right.unwrap_or(self.user.right),
            self.user.bottom,
        );
    }
}

/// State carried only by group nodes.
#[derive(Debug, Default)]
pub(crate) struct GroupState {
    /// Children in drawing order; the last child is topmost.
    pub(crate) children: Vec<NodeId>,
    /// The child on the focus path, if any.
    pub(crate) focused: Option<NodeId>,
    /// Group configuration.
    pub(crate) flags: GroupFlags,
    /// Focus ordering against descendants.
    pub(crate) descendant_focusability: DescendantFocusability,
    /// Accumulated damage in local coordinates since the last draw.
    pub(crate) dirty: Option<Rect>,
    /// Children still drawn and invalidated while hidden or removed.
    pub(crate) transitioning: Vec<NodeId>,
}

/// A view in the arena.
pub struct Node {
    /// Behaviour. `None` only while checked out for a callback.
    pub(crate) behavior: Option<Box<dyn ViewBehavior>>,
    /// User-assigned identity.
    pub(crate) view_id: i32,
    /// Parent group. The root view has none.
    pub(crate) parent: Option<NodeId>,
    /// Frame in the parent's coordinate space.
    pub(crate) frame: Rect,
    /// Scroll offset of the content.
    pub(crate) scroll: Point,
    /// Padding.
    pub(crate) padding: Padding,
    /// Minimum width.
    pub(crate) min_width: u32,
    /// Minimum height.
    pub(crate) min_height: u32,
    /// Measured width, with state in the high byte.
    pub(crate) measured_width: u32,
    /// Measured height, with state in the high byte.
    pub(crate) measured_height: u32,
    /// Results of previous measures keyed by the specs that produced them.
    pub(crate) measure_cache: HashMap<(MeasureSpec, MeasureSpec), (u32, u32)>,
    /// Width spec of the last measure.
    pub(crate) old_width_spec: Option<MeasureSpec>,
    /// Height spec of the last measure.
    pub(crate) old_height_spec: Option<MeasureSpec>,
    /// Public configuration.
    pub(crate) flags: ViewFlags,
    /// Visibility.
    pub(crate) visibility: Visibility,
    /// Engine state.
    pub(crate) private: PrivateFlags,
    /// Requested layout direction.
    pub(crate) layout_direction: LayoutDirection,
    /// Parameters for the parent.
    pub(crate) layout_params: Option<LayoutParams>,
    /// Background drawable.
    pub(crate) background: Option<Box<dyn Drawable>>,
    /// Is the view attached to a root?
    pub(crate) attached: bool,
    /// Group state for group nodes.
    pub(crate) group: Option<GroupState>,
}

impl Node {
    /// Build a node around a behaviour.
    pub(crate) fn new(behavior: Box<dyn ViewBehavior>, group: bool) -> Self {
        Self {
            behavior: Some(behavior),
            view_id: NO_ID,
            parent: None,
            frame: Rect::zero(),
            scroll: Point::zero(),
            padding: Padding::default(),
            min_width: 0,
            min_height: 0,
            measured_width: 0,
            measured_height: 0,
            measure_cache: HashMap::new(),
            old_width_spec: None,
            old_height_spec: None,
            flags: ViewFlags::default(),
            visibility: Visibility::Visible,
            private: PrivateFlags::DRAWABLE_STATE_DIRTY,
            layout_direction: LayoutDirection::Inherit,
            layout_params: None,
            background: None,
            attached: false,
            group: group.then(GroupState::default),
        }
    }

    /// User-assigned identity, or [`NO_ID`].
    pub fn view_id(&self) -> i32 {
        self.view_id
    }

    /// Parent group.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Frame in the parent's coordinates.
    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// Left edge in the parent.
    pub fn left(&self) -> i32 {
        self.frame.left()
    }

    /// Top edge in the parent.
    pub fn top(&self) -> i32 {
        self.frame.top()
    }

    /// Right edge in the parent.
    pub fn right(&self) -> i32 {
        self.frame.right()
    }

    /// Bottom edge in the parent.
    pub fn bottom(&self) -> i32 {
        self.frame.bottom()
    }

    /// Laid-out width.
    pub fn width(&self) -> u32 {
        self.frame.width()
    }

    /// Laid-out height.
    pub fn height(&self) -> u32 {
        self.frame.height()
    }

    /// Scroll offset.
    pub fn scroll(&self) -> Point {
        self.scroll
    }

    /// Effective padding.
    pub fn padding(&self) -> Insets {
        self.padding.resolved
    }

    /// Minimum size.
    pub fn minimum_size(&self) -> Expanse {
        Expanse::new(self.min_width, self.min_height)
    }

    /// Measured width without state bits.
    pub fn measured_width(&self) -> u32 {
        self.measured_width & MEASURED_SIZE_MASK
    }

    /// Measured height without state bits.
    pub fn measured_height(&self) -> u32 {
        self.measured_height & MEASURED_SIZE_MASK
    }

    /// Measured width including state bits.
    pub fn measured_width_and_state(&self) -> u32 {
        self.measured_width
    }

    /// Measured height including state bits.
    pub fn measured_height_and_state(&self) -> u32 {
        self.measured_height
    }

    /// Width state in the high byte, height state shifted into the low bits.
    pub fn measured_state(&self) -> u32 {
        (self.measured_width & MEASURED_STATE_MASK)
            | ((self.measured_height >> MEASURED_HEIGHT_STATE_SHIFT)
                & (MEASURED_STATE_MASK >> MEASURED_HEIGHT_STATE_SHIFT))
    }

    /// Public configuration flags.
    pub fn flags(&self) -> ViewFlags {
        self.flags
    }

    /// Visibility.
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Is the view enabled?
    pub fn is_enabled(&self) -> bool {
        !self.flags.contains(ViewFlags::DISABLED)
    }

    /// Requested layout direction.
    pub fn layout_direction(&self) -> LayoutDirection {
        self.layout_direction
    }

    /// Layout parameters, if any have been assigned.
    pub fn layout_params(&self) -> Option<&LayoutParams> {
        self.layout_params.as_ref()
    }

    /// Is this a group?
    pub fn is_group(&self) -> bool {
        self.group.is_some()
    }

    /// Children of a group; empty for leaves.
    pub fn children(&self) -> &[NodeId] {
        self.group
            .as_ref()
            .map(|g| g.children.as_slice())
            .unwrap_or_default()
    }

    /// The child on the focus path, for groups.
    pub fn focused_child(&self) -> Option<NodeId> {
        self.group.as_ref().and_then(|g| g.focused)
    }

    /// Focus ordering against descendants, for groups.
    pub fn descendant_focusability(&self) -> Option<DescendantFocusability> {
        self.group.as_ref().map(|g| g.descendant_focusability)
    }

    /// Group configuration flags, for groups.
    pub fn group_flags(&self) -> Option<GroupFlags> {
        self.group.as_ref().map(|g| g.flags)
    }

    /// Damage accumulated by a group since it last drew.
    pub fn dirty_region(&self) -> Option<Rect> {
        self.group.as_ref().and_then(|g| g.dirty)
    }

    /// Is this view attached to a root?
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Does this view itself hold focus?
    pub fn is_focused(&self) -> bool {
        self.private.contains(PrivateFlags::FOCUSED)
    }

    /// Is this view or a descendant focused?
    pub fn has_focus(&self) -> bool {
        self.is_focused() || self.focused_child().is_some()
    }

    /// Is the pointer over this view?
    pub fn is_hovered(&self) -> bool {
        self.private.contains(PrivateFlags::HOVERED)
    }

    /// Is the view pressed?
    pub fn is_pressed(&self) -> bool {
        self.private.contains(PrivateFlags::PRESSED)
    }

    /// Has a layout been requested that has not run yet?
    pub fn is_layout_requested(&self) -> bool {
        self.private.contains(PrivateFlags::FORCE_LAYOUT)
    }

    /// Has the view completed a layout?
    pub fn is_laid_out(&self) -> bool {
        self.private.contains(PrivateFlags::IS_LAID_OUT)
    }

    /// Does the view need redrawing?
    pub fn is_dirty(&self) -> bool {
        self.private.contains(PrivateFlags::DIRTY)
    }

    /// Has a resolved layout direction been computed?
    pub fn is_layout_direction_resolved(&self) -> bool {
        self.private.contains(PrivateFlags::LAYOUT_DIRECTION_RESOLVED)
    }

    /// Resolved direction; left to right until resolution has happened.
    pub fn resolved_layout_direction(&self) -> ResolvedDirection {
        if self.private.contains(PrivateFlags::LAYOUT_DIRECTION_RTL) {
            ResolvedDirection::Rtl
        } else {
            ResolvedDirection::Ltr
        }
    }

    /// Does the view carry a background?
    pub fn has_background(&self) -> bool {
        self.background.is_some()
    }

    /// Optical insets of the background.
    pub fn optical_insets(&self) -> Insets {
        self.background
            .as_ref()
            .map_or(Insets::NONE, |b| b.optical_insets())
    }

    /// Bounds in the view's own coordinates.
    pub fn local_bounds(&self) -> Rect {
        Rect::sized(self.frame.width(), self.frame.height())
    }

    /// Visible content area in the view's own coordinates, offset by scroll.
    pub fn drawing_rect(&self) -> Rect {
        Rect::at(self.scroll, self.frame.size())
    }

    /// Area in the parent that responds to touches.
    pub fn hit_rect(&self) -> Rect {
        self.frame
    }

    /// Behaviour name, or an empty string while checked out.
    pub fn name(&self) -> String {
        self.behavior.as_ref().map_or_else(String::new, |b| b.name())
    }

    /// Borrow the behaviour as a concrete type.
    pub fn behavior<T: ViewBehavior>(&self) -> Option<&T> {
        let b = self.behavior.as_ref()?;
        let any: &dyn Any = b.as_ref();
        any.downcast_ref::<T>()
    }

    /// Mutably borrow the behaviour as a concrete type.
    pub fn behavior_mut<T: ViewBehavior>(&mut self) -> Option<&mut T> {
        let b = self.behavior.as_mut()?;
        let any: &mut dyn Any = b.as_mut();
        any.downcast_mut::<T>()
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name())
            .field("view_id", &self.view_id)
            .field("parent", &self.parent)
            .field("frame", &self.frame)
            .field("visibility", &self.visibility)
            .field("attached", &self.attached)
            .field("children", &self.children())
            .finish()
    }
}

use crate::{
    core::{direction::ResolvedDirection, id::NodeId, root::RootOptions},
    geom::Expanse,
};

/// State shared by every view attached to one root.
#[derive(Debug, Clone)]
pub struct AttachInfo {
    /// Size of the surface the root draws into.
    pub(crate) surface: Expanse,
    /// Is the window showing?
    pub(crate) window_visible: bool,
    /// Is the root in touch mode?
    pub(crate) in_touch_mode: bool,
    /// Does the device have a touchscreen?
    pub(crate) has_touchscreen: bool,
    /// Direction of the root's locale.
    pub(crate) locale_direction: ResolvedDirection,
    /// The view whose layout request is currently propagating.
    pub(crate) view_requesting_layout: Option<NodeId>,
    /// Set when damage could not be tracked precisely; the next frame
    /// redraws everything.
    pub(crate) ignore_dirty_state: bool,
    /// View currently under the pointer.
    pub(crate) hovered: Option<NodeId>,
}

impl AttachInfo {
    /// Build from root options.
    pub(crate) fn new(options: &RootOptions) -> Self {
        Self {
            surface: options.size,
            window_visible: options.window_visible,
            in_touch_mode: options.in_touch_mode,
            has_touchscreen: options.has_touchscreen,
            locale_direction: options.locale_direction,
            view_requesting_layout: None,
            ignore_dirty_state: false,
            hovered: None,
        }
    }

    /// Size of the surface.
    pub fn surface(&self) -> Expanse {
        self.surface
    }

    /// Is the window showing?
    pub fn window_visible(&self) -> bool {
        self.window_visible
    }

    /// Is the root in touch mode?
    pub fn in_touch_mode(&self) -> bool {
        self.in_touch_mode
    }

    /// Does the device have a touchscreen?
    pub fn has_touchscreen(&self) -> bool {
        self.has_touchscreen
    }

    /// Direction of the locale.
    pub fn locale_direction(&self) -> ResolvedDirection {
        self.locale_direction
    }

    /// Will the next frame ignore tracked damage and redraw everything?
    pub fn ignore_dirty_state(&self) -> bool {
        self.ignore_dirty_state
    }

    /// View currently under the pointer.
    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }
}

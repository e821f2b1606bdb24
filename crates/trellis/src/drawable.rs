//! Backgrounds and other drawables attached to views.

use std::time::Instant;

use bitflags::bitflags;

use crate::{
    canvas::Canvas,
    error::Result,
    geom::{Insets, Rect},
};

bitflags! {
    /// The view state a drawable can react to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StateSet: u32 {
        /// The view holds focus.
        const FOCUSED = 1 << 0;
        /// The pointer is over the view.
        const HOVERED = 1 << 1;
        /// The view is enabled.
        const ENABLED = 1 << 2;
        /// The view is pressed.
        const PRESSED = 1 << 3;
        /// The view's window is visible.
        const WINDOW_VISIBLE = 1 << 4;
    }
}

/// Something a view can paint behind its content.
pub trait Drawable: Send {
    /// Paint into the bounds last given to [`Drawable::set_bounds`].
    fn draw(&mut self, canvas: &mut dyn Canvas) -> Result<()>;

    /// Set the absolute bounds to paint into.
    fn set_bounds(&mut self, bounds: Rect);

    /// Current bounds.
    fn bounds(&self) -> Rect;

    /// Padding the drawable asks its host to adopt, if any.
    fn padding(&self) -> Option<Insets> {
        None
    }

    /// Insets from the bounds to the visually meaningful edges.
    fn optical_insets(&self) -> Insets {
        Insets::NONE
    }

    /// Update the state. Returns true if the appearance changed.
    fn set_state(&mut self, _state: StateSet) -> bool {
        false
    }

    /// Does the drawable react to state?
    fn is_stateful(&self) -> bool {
        false
    }

    /// Smallest width the drawable can paint sensibly.
    fn minimum_width(&self) -> u32 {
        0
    }

    /// Smallest height the drawable can paint sensibly.
    fn minimum_height(&self) -> u32 {
        0
    }

    /// Notification that the drawable became visible or hidden. Animated
    /// drawables schedule or cancel their frames through `host`. Returns true
    /// if the visibility changed.
    fn set_visible(&mut self, _visible: bool, _host: &mut dyn DrawableCallback) -> bool {
        false
    }

    /// Run an action scheduled earlier with
    /// [`DrawableCallback::schedule_drawable`].
    fn run(&mut self, _what: u64, _host: &mut dyn DrawableCallback) {}
}

/// The host side of a drawable: how a drawable asks for redraws and timed
/// callbacks.
pub trait DrawableCallback {
    /// Ask the host to redraw the drawable.
    fn invalidate_drawable(&mut self);

    /// Ask for [`Drawable::run`] to be called with `what` at `when`.
    fn schedule_drawable(&mut self, what: u64, when: Instant);

    /// Cancel a scheduled action.
    fn unschedule_drawable(&mut self, what: u64);
}

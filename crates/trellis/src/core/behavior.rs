use std::any::{Any, type_name};

use crate::{
    canvas::Canvas,
    core::{context::ViewContext, focus::FocusDirection},
    error::Result,
    geom::{Expanse, Rect},
    measure_spec::{MeasureSpec, get_default_size},
};

/// Outcome of a draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawOutcome {
    /// Drawing is complete.
    #[default]
    Done,
    /// The view wants another frame; its parent re-invalidates it once.
    Again,
}

/// The overridable hooks of a view.
///
/// The tree owns all structural state; a behaviour is the per-view logic
/// plugged into it. Hooks receive a [`ViewContext`] scoped to their own
/// node, through which they can measure and place children.
pub trait ViewBehavior: Any + Send {
    /// Compute the measured size for the given constraints. Must end by
    /// calling [`ViewContext::set_measured_dimension`].
    fn on_measure(
        &mut self,
        ctx: &mut ViewContext<'_>,
        width: MeasureSpec,
        height: MeasureSpec,
    ) -> Result<()> {
        default_measure(ctx, width, height)
    }

    /// Position children. `frame` is the view's new frame in its parent.
    fn on_layout(&mut self, _ctx: &mut ViewContext<'_>, _changed: bool, _frame: Rect) -> Result<()> {
        Ok(())
    }

    /// Draw content into absolute `bounds`.
    fn on_draw(&mut self, _canvas: &mut dyn Canvas, _bounds: Rect) -> Result<DrawOutcome> {
        Ok(DrawOutcome::Done)
    }

    /// The view's size changed during layout.
    fn on_size_changed(&mut self, _ctx: &mut ViewContext<'_>, _new: Expanse, _old: Expanse) {}

    /// The view gained or lost focus.
    fn on_focus_changed(
        &mut self,
        _ctx: &mut ViewContext<'_>,
        _gained: bool,
        _direction: FocusDirection,
    ) {
    }

    /// The view was attached to a root.
    fn on_attached(&mut self, _ctx: &mut ViewContext<'_>) {}

    /// The view is about to be detached from its root.
    fn on_detached(&mut self, _ctx: &mut ViewContext<'_>) {}

    /// Name used in logs and debug output.
    fn name(&self) -> String {
        let name = type_name::<Self>();
        name.rsplit("::").next().unwrap_or(name).to_string()
    }
}

impl<B: ViewBehavior> From<B> for Box<dyn ViewBehavior> {
    fn from(b: B) -> Self {
        Box::new(b)
    }
}

/// The stock measure: the suggested minimum size, expanded to the constraint
/// under `AtMost` and `Exactly`.
pub fn default_measure(
    ctx: &mut ViewContext<'_>,
    width: MeasureSpec,
    height: MeasureSpec,
) -> Result<()> {
    let w = get_default_size(ctx.suggested_minimum_width()?, width);
    let h = get_default_size(ctx.suggested_minimum_height()?, height);
    ctx.set_measured_dimension(w, h)
}

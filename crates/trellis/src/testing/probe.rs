use std::sync::{Arc, Mutex, MutexGuard};

use crate::{
    canvas::{Canvas, Color},
    core::{DrawOutcome, FocusDirection, ViewBehavior, ViewContext, default_measure},
    error::Result,
    geom::{Expanse, Rect},
    measure_spec::{MeasureSpec, resolve_size},
};

/// Calls a [`Probe`] has seen.
#[derive(Debug, Default, Clone)]
pub struct ProbeLog {
    /// `on_measure` calls.
    pub measures: usize,
    /// Specs passed to `on_measure`, in order.
    pub specs: Vec<(MeasureSpec, MeasureSpec)>,
    /// `on_layout` calls.
    pub layouts: usize,
    /// `on_draw` calls.
    pub draws: usize,
    /// Draw bounds, in order.
    pub draw_bounds: Vec<Rect>,
    /// Size changes as `(new, old)`.
    pub size_changes: Vec<(Expanse, Expanse)>,
    /// Focus changes; true for gained.
    pub focus_changes: Vec<bool>,
    /// Attach notifications.
    pub attached: usize,
    /// Detach notifications.
    pub detached: usize,
}

/// Shared, inspectable handle on a probe's log.
#[derive(Debug, Clone, Default)]
pub struct ProbeHandle(Arc<Mutex<ProbeLog>>);

impl ProbeHandle {
    /// Lock the log.
    pub fn get(&self) -> MutexGuard<'_, ProbeLog> {
        self.0.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// `on_measure` calls so far.
    pub fn measures(&self) -> usize {
        self.get().measures
    }

    /// `on_layout` calls so far.
    pub fn layouts(&self) -> usize {
        self.get().layouts
    }

    /// `on_draw` calls so far.
    pub fn draws(&self) -> usize {
        self.get().draws
    }
}

/// A behaviour that counts its hook calls and can misbehave on demand.
#[derive(Debug, Default)]
pub struct Probe {
    /// Desired size; `None` measures like a plain leaf.
    desired: Option<Expanse>,
    /// Fill colour when drawing.
    color: Color,
    /// Remaining layouts during which to request another layout.
    relayouts: usize,
    /// Remaining draws that ask for another frame.
    draw_again: usize,
    /// Shared log.
    log: ProbeHandle,
}

impl Probe {
    /// A probe that measures like a leaf.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: wrap to a desired size.
    pub fn with_size(mut self, w: u32, h: u32) -> Self {
        self.desired = Some(Expanse::new(w, h));
        self
    }

    /// Builder: fill colour.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Builder: request a layout from inside the next `n` layouts.
    pub fn relayout_during_layout(mut self, n: usize) -> Self {
        self.relayouts = n;
        self
    }

    /// Builder: ask for another frame from the next `n` draws.
    pub fn draw_again(mut self, n: usize) -> Self {
        self.draw_again = n;
        self
    }

    /// Handle on the log.
    pub fn handle(&self) -> ProbeHandle {
        self.log.clone()
    }
}

impl ViewBehavior for Probe {
    fn on_measure(
        &mut self,
        ctx: &mut ViewContext<'_>,
        width: MeasureSpec,
        height: MeasureSpec,
    ) -> Result<()> {
        {
            let mut log = self.log.get();
            log.measures += 1;
            log.specs.push((width, height));
        }
        match self.desired {
            Some(size) => ctx.set_measured_dimension(
                resolve_size(size.w, width),
                resolve_size(size.h, height),
            ),
            None => default_measure(ctx, width, height),
        }
    }

    fn on_layout(&mut self, ctx: &mut ViewContext<'_>, _changed: bool, _frame: Rect) -> Result<()> {
        self.log.get().layouts += 1;
        if self.relayouts > 0 {
            self.relayouts -= 1;
            ctx.request_layout()?;
        }
        Ok(())
    }

    fn on_draw(&mut self, canvas: &mut dyn Canvas, bounds: Rect) -> Result<DrawOutcome> {
        {
            let mut log = self.log.get();
            log.draws += 1;
            log.draw_bounds.push(bounds);
        }
        canvas.fill_rect(bounds, self.color)?;
        if self.draw_again > 0 {
            self.draw_again -= 1;
            return Ok(DrawOutcome::Again);
        }
        Ok(DrawOutcome::Done)
    }

    fn on_size_changed(&mut self, _ctx: &mut ViewContext<'_>, new: Expanse, old: Expanse) {
        self.log.get().size_changes.push((new, old));
    }

    fn on_focus_changed(&mut self, _ctx: &mut ViewContext<'_>, gained: bool, _direction: FocusDirection) {
        self.log.get().focus_changes.push(gained);
    }

    fn on_attached(&mut self, _ctx: &mut ViewContext<'_>) {
        self.log.get().attached += 1;
    }

    fn on_detached(&mut self, _ctx: &mut ViewContext<'_>) {
        self.log.get().detached += 1;
    }
}

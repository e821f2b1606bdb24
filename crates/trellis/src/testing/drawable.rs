use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::{Duration, Instant},
};

use crate::{
    canvas::{Canvas, Color},
    drawable::{Drawable, DrawableCallback, StateSet},
    error::Result,
    geom::{Expanse, Insets, Rect},
};

/// Action code a [`TestDrawable`] schedules for its animation frames.
const FRAME: u64 = 1;

/// What a [`TestDrawable`] has been told.
#[derive(Debug, Default, Clone)]
pub struct DrawableLog {
    /// States pushed by the host.
    pub states: Vec<StateSet>,
    /// Bounds pushed by the host.
    pub bounds: Vec<Rect>,
    /// Visibility changes.
    pub visible: Vec<bool>,
    /// Scheduled actions that ran.
    pub runs: Vec<u64>,
    /// Draw calls.
    pub draws: usize,
}

/// A stateful drawable that fills its bounds, optionally animating.
#[derive(Debug)]
pub struct TestDrawable {
    /// Current bounds.
    bounds: Rect,
    /// Fill colour.
    color: Color,
    /// Fill colour while focused.
    focus_color: Color,
    /// Padding to hand to the host.
    padding: Option<Insets>,
    /// Minimum size.
    minimum: Expanse,
    /// Current state.
    state: StateSet,
    /// Frame interval when animating.
    frame_interval: Option<Duration>,
    /// Shared record of calls.
    log: Arc<Mutex<DrawableLog>>,
}

impl TestDrawable {
    /// A drawable filling with `color`.
    pub fn new(color: Color) -> Self {
        Self {
            bounds: Rect::zero(),
            color,
            focus_color: color,
            padding: None,
            minimum: Expanse::new(0, 0),
            state: StateSet::empty(),
            frame_interval: None,
            log: Arc::new(Mutex::new(DrawableLog::default())),
        }
    }

    /// Builder: fill with a different colour while focused.
    pub fn with_focus_color(mut self, color: Color) -> Self {
        self.focus_color = color;
        self
    }

    /// Builder: padding for the host to adopt.
    pub fn with_padding(mut self, padding: Insets) -> Self {
        self.padding = Some(padding);
        self
    }

    /// Builder: minimum size.
    pub fn with_minimum(mut self, w: u32, h: u32) -> Self {
        self.minimum = Expanse::new(w, h);
        self
    }

    /// Builder: schedule a frame every `interval` while visible.
    pub fn animated(mut self, interval: Duration) -> Self {
        self.frame_interval = Some(interval);
        self
    }

    /// Shared handle on the call record.
    pub fn log(&self) -> Arc<Mutex<DrawableLog>> {
        self.log.clone()
    }

    /// Lock the call record.
    fn record(&self) -> MutexGuard<'_, DrawableLog> {
        self.log.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drawable for TestDrawable {
    fn draw(&mut self, canvas: &mut dyn Canvas) -> Result<()> {
        self.record().draws += 1;
        let color = if self.state.contains(StateSet::FOCUSED) {
            self.focus_color
        } else {
            self.color
        };
        canvas.fill_rect(self.bounds, color)
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.record().bounds.push(bounds);
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn padding(&self) -> Option<Insets> {
        self.padding
    }

    fn set_state(&mut self, state: StateSet) -> bool {
        self.record().states.push(state);
        let changed = self.state.contains(StateSet::FOCUSED) != state.contains(StateSet::FOCUSED);
        self.state = state;
        changed && self.focus_color != self.color
    }

    fn is_stateful(&self) -> bool {
        true
    }

    fn minimum_width(&self) -> u32 {
        self.minimum.w
    }

    fn minimum_height(&self) -> u32 {
        self.minimum.h
    }

    fn set_visible(&mut self, visible: bool, host: &mut dyn DrawableCallback) -> bool {
        self.record().visible.push(visible);
        if let Some(interval) = self.frame_interval {
            if visible {
                host.schedule_drawable(FRAME, Instant::now() + interval);
            } else {
                host.unschedule_drawable(FRAME);
            }
        }
        true
    }

    fn run(&mut self, what: u64, host: &mut dyn DrawableCallback) {
        self.record().runs.push(what);
        host.invalidate_drawable();
        if let Some(interval) = self.frame_interval {
            host.schedule_drawable(FRAME, Instant::now() + interval);
        }
    }
}

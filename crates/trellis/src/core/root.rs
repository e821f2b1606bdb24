use std::{
    fmt,
    thread::{self, ThreadId},
    time::{Duration, Instant},
};

use crate::{
    canvas::Canvas,
    core::{
        behavior::DrawOutcome,
        direction::ResolvedDirection,
        focus::FocusManager,
        id::NodeId,
        tasks::{Callback, Task, TaskId},
        tree::ViewTree,
    },
    error::{Error, Result},
    geom::{Expanse, Point, Rect},
    measure_spec::MeasureSpec,
    params::{Dimension, LayoutParams},
};

/// Layout passes a single frame may run. Requests made during the last pass
/// are deferred to the next frame.
pub const MAX_LAYOUT_PASSES_PER_FRAME: usize = 2;

/// Configuration for a [`ViewRoot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootOptions {
    /// Initial surface size.
    pub size: Expanse,
    /// Start in touch mode.
    pub in_touch_mode: bool,
    /// The device has a touchscreen.
    pub has_touchscreen: bool,
    /// Direction of the locale, used by views with locale direction and as
    /// the direction the root view inherits.
    pub locale_direction: ResolvedDirection,
    /// Start with the window showing.
    pub window_visible: bool,
}

impl Default for RootOptions {
    fn default() -> Self {
        Self {
            size: Expanse::new(0, 0),
            in_touch_mode: false,
            has_touchscreen: false,
            locale_direction: ResolvedDirection::Ltr,
            window_visible: true,
        }
    }
}

impl RootOptions {
    /// Builder: surface size.
    pub fn with_size(mut self, w: u32, h: u32) -> Self {
        self.size = Expanse::new(w, h);
        self
    }

    /// Builder: touch mode.
    pub fn with_touch_mode(mut self, in_touch_mode: bool) -> Self {
        self.in_touch_mode = in_touch_mode;
        self
    }

    /// Builder: touchscreen presence.
    pub fn with_touchscreen(mut self, has_touchscreen: bool) -> Self {
        self.has_touchscreen = has_touchscreen;
        self
    }

    /// Builder: locale direction.
    pub fn with_locale_direction(mut self, direction: ResolvedDirection) -> Self {
        self.locale_direction = direction;
        self
    }

    /// Builder: initial window visibility.
    pub fn with_window_visible(mut self, visible: bool) -> Self {
        self.window_visible = visible;
        self
    }
}

/// The root's side of the parent protocol.
#[derive(Debug, Default)]
pub(crate) struct RootState {
    /// A layout was requested and has not run.
    pub(crate) layout_requested: bool,
    /// A layout pass is running.
    pub(crate) in_layout: bool,
    /// The root is re-running layout for requests made during layout.
    pub(crate) handling_layout_in_layout_request: bool,
    /// Views that requested layout while a pass was running.
    pub(crate) layout_requesters: Vec<NodeId>,
    /// Damage accumulated since the last draw, in surface coordinates.
    pub(crate) dirty: Rect,
    /// Something changed that needs a frame.
    pub(crate) traversal_scheduled: bool,
}

/// What a frame did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Due tasks run before layout.
    pub tasks_run: usize,
    /// Layout passes run; zero when no layout was needed.
    pub layout_passes: usize,
    /// The clip used for drawing, or `None` for a full redraw.
    pub damage: Option<Rect>,
    /// Was anything drawn?
    pub drew: bool,
}

/// The top of a view hierarchy: owns the tree, drives frames, and pins the
/// hierarchy to the thread that created it.
pub struct ViewRoot {
    /// The views.
    tree: ViewTree,
    /// Thread allowed to touch the tree.
    owner: ThreadId,
    /// No frame has been drawn yet.
    first_frame: bool,
}

impl ViewRoot {
    /// Create a root owned by the calling thread.
    pub fn new(options: RootOptions) -> Self {
        Self {
            tree: ViewTree::new(&options),
            owner: thread::current().id(),
            first_frame: true,
        }
    }

    /// Fail unless called on the owning thread.
    pub fn check_thread(&self) -> Result<()> {
        if thread::current().id() != self.owner {
            tracing::warn!("view hierarchy touched from a foreign thread");
            return Err(Error::WrongThread);
        }
        Ok(())
    }

    /// The tree, for reading.
    pub fn tree(&self) -> Result<&ViewTree> {
        self.check_thread()?;
        Ok(&self.tree)
    }

    /// The tree, for editing.
    pub fn tree_mut(&mut self) -> Result<&mut ViewTree> {
        self.check_thread()?;
        Ok(&mut self.tree)
    }

    /// The installed root view.
    pub fn view(&self) -> Result<Option<NodeId>> {
        self.check_thread()?;
        Ok(self.tree.root_view)
    }

    /// Install `view` as the root view, replacing and detaching any previous
    /// one. The view must not have a parent.
    pub fn set_view(&mut self, view: NodeId) -> Result<()> {
        self.check_thread()?;
        let tree = &mut self.tree;
        if tree.node(view)?.parent.is_some() {
            return Err(Error::AlreadyHasParent { child: view });
        }
        if tree.root_view == Some(view) {
            return Ok(());
        }
        if let Some(old) = tree.root_view {
            if tree.has_focus(old) {
                tree.clear_focus(old)?;
            }
            tree.dispatch_detached(old)?;
            tree.root_view = None;
        }
        tree.root_view = Some(view);
        tree.dispatch_attached(view)?;
        tree.request_layout(view)?;
        tree.attach.ignore_dirty_state = true;
        tree.root.traversal_scheduled = true;
        tracing::debug!("root view set to {view:?}");
        Ok(())
    }

    /// Surface size.
    pub fn size(&self) -> Result<Expanse> {
        self.check_thread()?;
        Ok(self.tree.attach.surface)
    }

    /// Resize the surface. Schedules a layout and a full redraw.
    pub fn resize(&mut self, w: u32, h: u32) -> Result<()> {
        self.check_thread()?;
        let size = Expanse::new(w, h);
        if self.tree.attach.surface == size {
            return Ok(());
        }
        self.tree.attach.surface = size;
        self.tree.root.layout_requested = true;
        self.tree.attach.ignore_dirty_state = true;
        self.tree.root.traversal_scheduled = true;
        Ok(())
    }

    /// Show or hide the window. Invalidation is ignored while hidden, and
    /// showing the window forces a full redraw.
    pub fn set_window_visible(&mut self, visible: bool) -> Result<()> {
        self.check_thread()?;
        if self.tree.attach.window_visible == visible {
            return Ok(());
        }
        self.tree.attach.window_visible = visible;
        if let Some(v) = self.tree.root_view {
            for n in self.tree.subtree(v) {
                self.tree.update_background_visibility(n)?;
            }
        }
        if visible {
            self.tree.attach.ignore_dirty_state = true;
            self.tree.root.traversal_scheduled = true;
        }
        Ok(())
    }

    /// Enter or leave touch mode.
    pub fn set_in_touch_mode(&mut self, in_touch_mode: bool) -> Result<()> {
        self.check_thread()?;
        self.tree.set_in_touch_mode(in_touch_mode)
    }

    /// Run `f` at the start of the next frame.
    pub fn post(
        &mut self,
        f: impl FnOnce(&mut ViewTree) -> Result<()> + Send + 'static,
    ) -> Result<TaskId> {
        self.post_at(f, Instant::now())
    }

    /// Run `f` at the start of the first frame after `delay`.
    pub fn post_delayed(
        &mut self,
        f: impl FnOnce(&mut ViewTree) -> Result<()> + Send + 'static,
        delay: Duration,
    ) -> Result<TaskId> {
        self.post_at(f, Instant::now() + delay)
    }

    /// Run `f` at the start of the first frame at or after `when`.
    pub fn post_at(
        &mut self,
        f: impl FnOnce(&mut ViewTree) -> Result<()> + Send + 'static,
        when: Instant,
    ) -> Result<TaskId> {
        self.check_thread()?;
        let callback: Callback = Box::new(f);
        self.tree.root.traversal_scheduled = true;
        Ok(self.tree.tasks.post(Task::Callback(callback), when))
    }

    /// Cancel a posted task. Returns false if it already ran.
    pub fn remove_callbacks(&mut self, id: TaskId) -> Result<bool> {
        self.check_thread()?;
        Ok(self.tree.tasks.remove(id))
    }

    /// Number of tasks waiting to run.
    pub fn pending_tasks(&self) -> Result<usize> {
        self.check_thread()?;
        Ok(self.tree.tasks.len())
    }

    /// When the earliest waiting task comes due.
    pub fn next_task_due(&self) -> Result<Option<Instant>> {
        self.check_thread()?;
        Ok(self.tree.tasks.next_due())
    }

    /// Has anything happened that needs a frame?
    pub fn needs_frame(&self) -> Result<bool> {
        self.check_thread()?;
        Ok(self.tree.root.traversal_scheduled || self.tree.root.layout_requested)
    }

    /// Is a root layout pending?
    pub fn is_layout_requested(&self) -> Result<bool> {
        self.check_thread()?;
        Ok(self.tree.root.layout_requested)
    }

    /// Damage accumulated since the last frame, in surface coordinates.
    pub fn dirty_region(&self) -> Result<Option<Rect>> {
        self.check_thread()?;
        let d = self.tree.root.dirty;
        Ok((!d.is_empty()).then_some(d))
    }

    /// Draw a frame now.
    pub fn draw(&mut self, canvas: &mut dyn Canvas) -> Result<FrameStats> {
        self.draw_at(Instant::now(), canvas)
    }

    /// Draw a frame as of `now`: run due tasks in posting order, lay out if
    /// needed, then draw the hierarchy clipped to the accumulated damage.
    pub fn draw_at(&mut self, now: Instant, canvas: &mut dyn Canvas) -> Result<FrameStats> {
        self.check_thread()?;
        let mut stats = FrameStats::default();
        self.tree.root.traversal_scheduled = false;

        let mut failed = None;
        for (id, task) in self.tree.tasks.take_due(now) {
            tracing::trace!("running task {id:?}: {task:?}");
            stats.tasks_run += 1;
            if let Err(e) = self.run_task(task) {
                tracing::warn!("task {id:?} failed: {e}");
                failed.get_or_insert(e);
            }
        }
        if let Some(e) = failed {
            return Err(e);
        }

        if self.first_frame || self.tree.root.layout_requested {
            stats.layout_passes = self.perform_layout(now)?;
        }

        let full = self.first_frame || self.tree.attach.ignore_dirty_state;
        let damage = (!full).then_some(self.tree.root.dirty);
        self.tree.root.dirty = Rect::zero();
        self.tree.attach.ignore_dirty_state = false;
        self.first_frame = false;
        // Layout damage is drawn below. Only tasks already due need another frame.
        self.tree.root.traversal_scheduled =
            self.tree.tasks.next_due().is_some_and(|t| t <= now);
        stats.damage = damage;

        if damage.is_some_and(|d| d.is_empty()) || !self.tree.attach.window_visible {
            tracing::trace!("nothing to draw");
            return Ok(stats);
        }
        let Some(view) = self.tree.root_view else {
            return Ok(stats);
        };

        canvas.begin()?;
        let count = canvas.save();
        if let Some(d) = damage {
            canvas.clip_rect(d);
        }
        let outcome = self.tree.draw_view(view, canvas, Point::zero())?;
        canvas.restore_to_count(count)?;
        canvas.end()?;
        stats.drew = true;
        if outcome == DrawOutcome::Again {
            self.tree.invalidate(view)?;
        }
        Ok(stats)
    }

    /// Execute one deferred task.
    fn run_task(&mut self, task: Task) -> Result<()> {
        match task {
            Task::Callback(f) => f(&mut self.tree),
            Task::Drawable { node, what } => self.tree.run_drawable_task(node, what),
            Task::RequestLayout(ids) => {
                for id in ids {
                    if self.tree.is_attached(id) {
                        self.tree.request_layout(id)?;
                    }
                }
                Ok(())
            }
        }
    }

    /// Measure and lay out the hierarchy, servicing requests made during
    /// layout with at most one extra pass. Returns the passes run.
    fn perform_layout(&mut self, now: Instant) -> Result<usize> {
        self.tree.root.layout_requested = false;
        let Some(view) = self.tree.root_view else {
            return Ok(0);
        };
        self.layout_pass(view)?;
        let mut passes = 1;

        loop {
            let requesters = self.tree.valid_layout_requesters();
            if requesters.is_empty() {
                break;
            }
            if passes >= MAX_LAYOUT_PASSES_PER_FRAME {
                tracing::debug!(
                    "deferring {} layout requests made during the final pass",
                    requesters.len()
                );
                self.tree.tasks.post(Task::RequestLayout(requesters), now);
                self.tree.root.traversal_scheduled = true;
                break;
            }
            tracing::debug!("servicing {} layout requests made during layout", requesters.len());
            let mut tree = scopeguard::guard(&mut self.tree, |t| {
                t.root.handling_layout_in_layout_request = false;
            });
            tree.root.handling_layout_in_layout_request = true;
            for id in &requesters {
                tree.request_layout(*id)?;
            }
            Self::layout_pass_in(&mut tree, view)?;
            passes += 1;
        }
        self.tree.root.layout_requested = false;
        Ok(passes)
    }

    /// One measure and layout of the root view.
    fn layout_pass(&mut self, view: NodeId) -> Result<()> {
        Self::layout_pass_in(&mut self.tree, view)
    }

    /// One measure and layout of the root view in `tree`.
    fn layout_pass_in(tree: &mut ViewTree, view: NodeId) -> Result<()> {
        let surface = tree.attach.surface;
        let lp = tree.node(view)?.layout_params.unwrap_or_else(LayoutParams::fill);
        let width = root_measure_spec(surface.w, lp.width);
        let height = root_measure_spec(surface.h, lp.height);
        tree.measure(view, width, height)?;

        tree.root.in_layout = true;
        let mut tree = scopeguard::guard(tree, |t| t.root.in_layout = false);
        let node = tree.node(view)?;
        let frame = Rect::at(
            Point::zero(),
            Expanse::new(node.measured_width(), node.measured_height()),
        );
        tree.layout(view, frame)
    }

    /// The deepest focusable view under `point`, in surface coordinates.
    pub fn hit_deepest_focusable_view(&self, point: Point) -> Result<Option<NodeId>> {
        self.check_thread()?;
        Ok(self
            .tree
            .root_view
            .and_then(|v| self.tree.find_focusable_at(v, point)))
    }

    /// Route a pointer press. Touchscreen devices enter touch mode; the
    /// deepest focusable view under the pointer takes focus and is returned.
    pub fn dispatch_pointer_down(&mut self, point: Point) -> Result<Option<NodeId>> {
        self.check_thread()?;
        if self.tree.attach.has_touchscreen {
            self.tree.set_in_touch_mode(true)?;
        }
        let hit = self
            .tree
            .root_view
            .and_then(|v| self.tree.find_focusable_at(v, point));
        if let Some(id) = hit {
            self.tree.focus(id)?;
        }
        Ok(hit)
    }

    /// Route pointer motion: update the hovered view and return it.
    pub fn dispatch_pointer_move(&mut self, point: Point) -> Result<Option<NodeId>> {
        self.check_thread()?;
        let hit = self
            .tree
            .root_view
            .and_then(|v| self.tree.find_view_at(v, point));
        let old = self.tree.attach.hovered;
        if old != hit {
            if let Some(o) = old
                && self.tree.contains(o)
            {
                self.tree.set_hovered(o, false)?;
            }
            if let Some(n) = hit {
                self.tree.set_hovered(n, true)?;
            }
            self.tree.attach.hovered = hit;
        }
        Ok(hit)
    }
}

/// The measure spec for the root view along one axis.
fn root_measure_spec(window: u32, dimension: Dimension) -> MeasureSpec {
    match dimension {
        Dimension::MatchParent => MeasureSpec::exactly(window),
        Dimension::WrapContent => MeasureSpec::at_most(window),
        Dimension::Px(n) => MeasureSpec::exactly(n),
    }
}

impl fmt::Debug for ViewRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewRoot")
            .field("tree", &self.tree)
            .field("first_frame", &self.first_frame)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn root_specs() {
        assert_eq!(
            root_measure_spec(200, Dimension::MatchParent),
            MeasureSpec::exactly(200)
        );
        assert_eq!(
            root_measure_spec(200, Dimension::WrapContent),
            MeasureSpec::at_most(200)
        );
        assert_eq!(root_measure_spec(200, Dimension::Px(50)), MeasureSpec::exactly(50));
    }

    #[test]
    fn foreign_thread_is_rejected() {
        let root = Arc::new(Mutex::new(ViewRoot::new(RootOptions::default())));
        let r = root.clone();
        let result = thread::spawn(move || r.lock().unwrap().check_thread())
            .join()
            .unwrap();
        assert_eq!(result, Err(Error::WrongThread));
        assert!(root.lock().unwrap().check_thread().is_ok());
    }
}

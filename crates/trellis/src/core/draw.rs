use std::time::Instant;

use crate::{
    canvas::Canvas,
    core::{
        behavior::DrawOutcome,
        flags::{GroupFlags, PrivateFlags, ViewFlags, Visibility},
        id::NodeId,
        tasks::Task,
        tree::ViewTree,
    },
    drawable::{Drawable, DrawableCallback, StateSet},
    error::Result,
    geom::{Point, Rect},
};

/// The callback side of a view's background: a non-owning handle that routes
/// drawable requests back into the tree.
pub(crate) struct DrawableHost<'a> {
    /// The tree.
    tree: &'a mut ViewTree,
    /// Host view.
    node: NodeId,
}

impl DrawableCallback for DrawableHost<'_> {
    fn invalidate_drawable(&mut self) {
        if let Err(e) = self.tree.invalidate(self.node) {
            tracing::warn!("drawable invalidate on {:?} failed: {e}", self.node);
        }
    }

    fn schedule_drawable(&mut self, what: u64, when: Instant) {
        if self.tree.is_attached(self.node) {
            self.tree.tasks.post(Task::Drawable { node: self.node, what }, when);
        }
    }

    fn unschedule_drawable(&mut self, what: u64) {
        self.tree.tasks.remove_drawable(self.node, what);
    }
}

impl ViewTree {
    /// Replace the background. The new drawable's padding, if it has one,
    /// becomes the view's padding. Actions the old drawable scheduled are
    /// cancelled.
    pub fn set_background(&mut self, id: NodeId, background: Option<Box<dyn Drawable>>) -> Result<()> {
        let node = self.node_mut(id)?;
        let old = node.background.take();
        let old_min = old
            .as_ref()
            .map(|b| (b.minimum_width(), b.minimum_height()));
        if let Some(mut old) = old {
            self.tasks.remove_node(id);
            old.set_visible(false, &mut DrawableHost { tree: self, node: id });
        }

        let new_min = background
            .as_ref()
            .map(|b| (b.minimum_width(), b.minimum_height()));
        let padding = background.as_ref().and_then(|b| b.padding());
        let node = self.node_mut(id)?;
        node.background = background;
        node.private.insert(
            PrivateFlags::BACKGROUND_BOUNDS_DIRTY | PrivateFlags::DRAWABLE_STATE_DIRTY,
        );
        if node.background.is_some() {
            node.flags.remove(ViewFlags::WILL_NOT_DRAW);
        }
        if let Some(padding) = padding {
            self.set_padding(id, padding)?;
        }
        self.refresh_drawable_state(id)?;
        self.update_background_visibility(id)?;
        if old_min != new_min {
            self.request_layout(id)?;
        }
        self.invalidate(id)
    }

    /// The state set a view presents to its drawables.
    pub fn drawable_state(&self, id: NodeId) -> Result<StateSet> {
        let node = self.node(id)?;
        let mut state = StateSet::empty();
        state.set(StateSet::FOCUSED, node.is_focused());
        state.set(StateSet::HOVERED, node.is_hovered());
        state.set(StateSet::PRESSED, node.is_pressed());
        state.set(StateSet::ENABLED, node.is_enabled());
        state.set(
            StateSet::WINDOW_VISIBLE,
            node.attached && self.attach.window_visible,
        );
        Ok(state)
    }

    /// Push the current state into a stateful background if it is stale.
    pub(crate) fn refresh_drawable_state(&mut self, id: NodeId) -> Result<()> {
        if !self
            .node(id)?
            .private
            .contains(PrivateFlags::DRAWABLE_STATE_DIRTY)
        {
            return Ok(());
        }
        let state = self.drawable_state(id)?;
        let node = self.node_mut(id)?;
        node.private.remove(PrivateFlags::DRAWABLE_STATE_DIRTY);
        let changed = match node.background.as_mut() {
            Some(bg) if bg.is_stateful() => bg.set_state(state),
            _ => false,
        };
        if changed {
            self.invalidate(id)?;
        }
        Ok(())
    }

    /// Tell the background whether it is showing.
    pub(crate) fn update_background_visibility(&mut self, id: NodeId) -> Result<()> {
        let window_visible = self.attach.window_visible;
        let node = self.node_mut(id)?;
        let visible = node.attached && node.visibility == Visibility::Visible && window_visible;
        let Some(mut bg) = node.background.take() else {
            return Ok(());
        };
        bg.set_visible(visible, &mut DrawableHost { tree: self, node: id });
        if let Some(node) = self.nodes.get_mut(id)
            && node.background.is_none()
        {
            node.background = Some(bg);
        }
        Ok(())
    }

    /// Run a drawable action that came due.
    pub(crate) fn run_drawable_task(&mut self, id: NodeId, what: u64) -> Result<()> {
        let Some(node) = self.nodes.get_mut(id) else {
            return Ok(());
        };
        let Some(mut bg) = node.background.take() else {
            return Ok(());
        };
        bg.run(what, &mut DrawableHost { tree: self, node: id });
        if let Some(node) = self.nodes.get_mut(id)
            && node.background.is_none()
        {
            node.background = Some(bg);
        }
        Ok(())
    }

    /// Draw a view and its subtree. `origin` is the absolute position of
    /// the parent's content origin.
    pub(crate) fn draw_view(
        &mut self,
        id: NodeId,
        canvas: &mut dyn Canvas,
        origin: Point,
    ) -> Result<DrawOutcome> {
        let node = self.node_mut(id)?;
        let abs = node.frame.offset(origin.x, origin.y);
        node.private.remove(PrivateFlags::DIRTY | PrivateFlags::INVALIDATED);
        node.private.insert(PrivateFlags::DRAWN);
        let bounds_dirty = node.private.contains(PrivateFlags::BACKGROUND_BOUNDS_DIRTY)
            || node.background.as_ref().is_some_and(|b| b.bounds() != abs);
        node.private.remove(PrivateFlags::BACKGROUND_BOUNDS_DIRTY);
        if let Some(bg) = node.background.as_mut() {
            if bounds_dirty {
                bg.set_bounds(abs);
            }
            bg.draw(canvas)?;
        }

        let mut outcome = DrawOutcome::Done;
        if !node.flags.contains(ViewFlags::WILL_NOT_DRAW) {
            outcome = self.with_behavior(id, |b, _| b.on_draw(canvas, abs))??;
        }

        let node = self.node(id)?;
        if node.is_group() {
            let content = abs.origin().offset(-node.scroll.x, -node.scroll.y);
            self.dispatch_draw(id, canvas, abs, content)?;
        }
        Ok(outcome)
    }

    /// Draw a group's children. A child that asks for another frame makes
    /// the group re-invalidate itself once.
    fn dispatch_draw(
        &mut self,
        id: NodeId,
        canvas: &mut dyn Canvas,
        abs: Rect,
        content: Point,
    ) -> Result<()> {
        let padding = self.node(id)?.padding();
        let group = self.group(id)?;
        let flags = group.flags;
        let children = group.children.clone();
        let transitioning = group.transitioning.clone();

        let save = if flags.contains(GroupFlags::CLIP_TO_PADDING) {
            let count = canvas.save();
            canvas.clip_rect(abs.inset(padding));
            Some(count)
        } else {
            None
        };

        let mut more = false;
        for child in children {
            let visible = self.node(child)?.visibility == Visibility::Visible;
            if !visible && !transitioning.contains(&child) {
                continue;
            }
            let count = canvas.save();
            if flags.contains(GroupFlags::CLIP_CHILDREN) {
                let frame = self.node(child)?.frame;
                canvas.clip_rect(frame.offset(content.x, content.y));
            }
            let outcome = self.draw_view(child, canvas, content)?;
            canvas.restore_to_count(count)?;
            more |= outcome == DrawOutcome::Again;
        }

        if let Some(count) = save {
            canvas.restore_to_count(count)?;
        }
        self.group_mut(id)?.dirty = None;
        if more {
            tracing::trace!("{id:?} has children that want another frame");
            self.invalidate(id)?;
        }
        Ok(())
    }
}

use std::mem;

use crate::{
    core::{
        flags::{PrivateFlags, Visibility},
        id::NodeId,
        parent::ViewParent,
        tree::ViewTree,
    },
    error::Result,
    geom::Rect,
};

impl ViewTree {
    /// Place a view at `frame` in its parent's coordinates and lay out its
    /// children if the frame changed or a layout is pending.
    pub fn layout(&mut self, id: NodeId, frame: Rect) -> Result<()> {
        let node = self.node(id)?;
        if node.private.contains(PrivateFlags::MEASURE_NEEDED_BEFORE_LAYOUT)
            && let (Some(w), Some(h)) = (node.old_width_spec, node.old_height_spec)
        {
            self.on_measure(id, w, h)?;
            self.node_mut(id)?
                .private
                .remove(PrivateFlags::MEASURE_NEEDED_BEFORE_LAYOUT);
        }

        let changed = self.set_frame(id, frame)?;
        if changed || self.node(id)?.private.contains(PrivateFlags::LAYOUT_REQUIRED) {
            tracing::trace!("on_layout {id:?} {frame:?} changed={changed}");
            self.with_behavior(id, |b, ctx| b.on_layout(ctx, changed, frame))??;
            self.node_mut(id)?
                .private
                .remove(PrivateFlags::LAYOUT_REQUIRED);
        }

        self.node_mut(id)?.private.remove(PrivateFlags::FORCE_LAYOUT);
        self.node_mut(id)?.private.insert(PrivateFlags::IS_LAID_OUT);
        Ok(())
    }

    /// Assign a frame. Returns true if it changed. The old area is damaged
    /// before the change and the new area after it.
    pub(crate) fn set_frame(&mut self, id: NodeId, frame: Rect) -> Result<bool> {
        let node = self.node(id)?;
        let old = node.frame;
        if old == frame && node.private.contains(PrivateFlags::HAS_BOUNDS) {
            return Ok(false);
        }
        let drawn = node.private.contains(PrivateFlags::DRAWN);
        let size_changed = old.size() != frame.size();

        self.invalidate_internal(id, None, size_changed)?;

        let node = self.node_mut(id)?;
        node.frame = frame;
        node.private
            .insert(PrivateFlags::HAS_BOUNDS | PrivateFlags::BACKGROUND_BOUNDS_DIRTY);
        let visible = node.visibility == Visibility::Visible;

        if size_changed {
            self.notify(id, |b, ctx| b.on_size_changed(ctx, frame.size(), old.size()));
        }
        if visible {
            // Let the damage for the new area through even after the full
            // invalidate above.
            self.node_mut(id)?.private.insert(PrivateFlags::DRAWN);
            self.invalidate_internal(id, None, size_changed)?;
        }
        if drawn {
            self.node_mut(id)?.private.insert(PrivateFlags::DRAWN);
        }
        Ok(true)
    }

    /// Request a new measure and layout for `id` and its ancestors.
    ///
    /// During a layout pass the request is recorded at the root instead. While
    /// the root is re-running layout for recorded requests, new requests are
    /// only recorded; they are serviced in a later frame.
    pub fn request_layout(&mut self, id: NodeId) -> Result<()> {
        let node = self.node_mut(id)?;
        node.measure_cache.clear();
        let attached = node.attached;

        if attached && self.root.in_layout && !self.request_layout_during_layout(id) {
            return Ok(());
        }

        let marked = attached && self.attach.view_requesting_layout.is_none();
        if marked {
            self.attach.view_requesting_layout = Some(id);
        }
        self.node_mut(id)?
            .private
            .insert(PrivateFlags::FORCE_LAYOUT | PrivateFlags::INVALIDATED);

        if let Some(parent) = self.parent_of(id)
            && !self.is_layout_requested(parent)
        {
            self.request_parent_layout(parent, id)?;
        }
        if marked {
            self.attach.view_requesting_layout = None;
        }
        Ok(())
    }

    /// Force a full measure and layout of `id` next time its parent lays out,
    /// without propagating the request.
    pub fn force_layout(&mut self, id: NodeId) -> Result<()> {
        let node = self.node_mut(id)?;
        node.measure_cache.clear();
        node.private
            .insert(PrivateFlags::FORCE_LAYOUT | PrivateFlags::INVALIDATED);
        Ok(())
    }

    /// Record a request made during layout. Returns false when the root is
    /// already servicing recorded requests and this one must wait.
    fn request_layout_during_layout(&mut self, id: NodeId) -> bool {
        if !self.root.layout_requesters.contains(&id) {
            self.root.layout_requesters.push(id);
        }
        !self.root.handling_layout_in_layout_request
    }

    /// Drain recorded requests, keeping only views still attached and shown.
    pub(crate) fn valid_layout_requesters(&mut self) -> Vec<NodeId> {
        mem::take(&mut self.root.layout_requesters)
            .into_iter()
            .filter(|id| self.is_attached(*id) && self.is_shown(*id))
            .collect()
    }
}

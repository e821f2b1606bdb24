use crate::{
    core::{
        flags::{PrivateFlags, Visibility},
        id::NodeId,
        parent::{Parent, ViewParent},
        tree::ViewTree,
    },
    error::Result,
    geom::{Point, Rect},
};

impl ViewTree {
    /// Damage all of a view. The view is treated as not drawn until its next
    /// draw, so repeated calls before then are cheap. Its next measure runs
    /// `on_measure` even for constraints it has seen before.
    pub fn invalidate(&mut self, id: NodeId) -> Result<()> {
        self.node_mut(id)?.private.insert(PrivateFlags::REMEASURE);
        self.invalidate_internal(id, None, true)
    }

    /// Damage part of a view, given in its content coordinates.
    pub fn invalidate_rect(&mut self, id: NodeId, dirty: Rect) -> Result<()> {
        let scroll = self.node(id)?.scroll;
        self.invalidate_internal(id, Some(dirty.offset(-scroll.x, -scroll.y)), false)
    }

    /// Damage `dirty` (local coordinates, whole view if `None`) and carry it
    /// up the parent chain.
    pub(crate) fn invalidate_internal(
        &mut self,
        id: NodeId,
        dirty: Option<Rect>,
        full: bool,
    ) -> Result<()> {
        if self.skip_invalidate(id)? {
            return Ok(());
        }
        let node = self.node_mut(id)?;
        let drawn = node
            .private
            .contains(PrivateFlags::DRAWN | PrivateFlags::HAS_BOUNDS);
        if !drawn && node.private.contains(PrivateFlags::INVALIDATED) {
            return Ok(());
        }
        if full {
            node.private.remove(PrivateFlags::DRAWN);
        }
        node.private
            .insert(PrivateFlags::DIRTY | PrivateFlags::INVALIDATED);
        let bounds = node.local_bounds();
        let damage = match dirty {
            Some(d) => d.intersect(&bounds),
            None => Some(bounds),
        };
        let origin = node.frame.origin();
        if let Some(damage) = damage
            && let Some(parent) = self.parent_of(id)
        {
            self.propagate_damage(parent, origin, damage)?;
        }
        Ok(())
    }

    /// Damage `rect`, given in the parent's coordinates, on behalf of `id`.
    pub(crate) fn damage_parent(&mut self, id: NodeId, rect: Rect) -> Result<()> {
        let node = self.node(id)?;
        if !node.attached || rect.is_empty() || !self.attach.window_visible {
            return Ok(());
        }
        if let Some(parent) = self.parent_of(id) {
            self.propagate_damage(parent, Point::zero(), rect)?;
        }
        Ok(())
    }

    /// Walk damage up the chain until a parent absorbs it.
    fn propagate_damage(&mut self, parent: Parent, origin: Point, dirty: Rect) -> Result<()> {
        let mut next = Some((parent, origin, dirty));
        while let Some((p, o, d)) = next {
            next = self.invalidate_child_in_parent(p, o, d)?;
        }
        Ok(())
    }

    /// Invalidation is pointless for views that are detached, hidden (and
    /// not transitioning), or in a hidden window.
    fn skip_invalidate(&self, id: NodeId) -> Result<bool> {
        let node = self.node(id)?;
        if !node.attached || !self.attach.window_visible {
            return Ok(true);
        }
        Ok(node.visibility != Visibility::Visible && !self.is_view_transitioning(id))
    }
}

//! The parent side of the view protocol.
//!
//! A view's parent is either a group in the same arena or the root itself.
//! Requests that travel up the hierarchy (layout, damage, focus) are
//! expressed against [`Parent`] so a group and the root answer them through
//! one interface.

use crate::{
    core::{
        direction::ResolvedDirection,
        flags::{DescendantFocusability, GroupFlags, PrivateFlags},
        id::NodeId,
        tree::ViewTree,
    },
    error::{Error, Result},
    geom::{Point, Rect},
    params::LayoutParams,
};

/// The target of an upward request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parent {
    /// A group view.
    Group(NodeId),
    /// The view root.
    Root,
}

/// Requests a child makes of its parent.
pub trait ViewParent {
    /// Has `parent` already been asked for a layout?
    fn is_layout_requested(&self, parent: Parent) -> bool;

    /// Ask `parent` for a layout on behalf of `requester`.
    fn request_parent_layout(&mut self, parent: Parent, requester: NodeId) -> Result<()>;

    /// Fold `dirty`, given in the coordinates of a child at `origin` in the
    /// parent, into the parent's damage. Returns the next hop if the damage
    /// must continue upward.
    fn invalidate_child_in_parent(
        &mut self,
        parent: Parent,
        origin: Point,
        dirty: Rect,
    ) -> Result<Option<(Parent, Point, Rect)>>;

    /// `child` now holds, or contains, the focused view `focused`.
    fn request_child_focus(&mut self, parent: Parent, child: NodeId, focused: NodeId) -> Result<()>;

    /// `child` gave up focus.
    fn clear_child_focus(&mut self, parent: Parent, child: NodeId) -> Result<()>;

    /// Can children inherit a direction from `parent` yet?
    fn can_resolve_layout_direction(&self, parent: Parent) -> bool;

    /// Direction children inherit from `parent`.
    fn parent_layout_direction(&self, parent: Parent) -> ResolvedDirection;
}

/// Structural edits on groups.
pub trait ViewManager {
    /// Add `child` to `parent` at `index` (or the end), optionally replacing
    /// its layout parameters. Fails without mutating anything if the child
    /// already has a parent or the add would create a cycle.
    fn add_view(
        &mut self,
        parent: NodeId,
        child: NodeId,
        index: Option<usize>,
        params: Option<LayoutParams>,
    ) -> Result<()>;

    /// Replace a child's layout parameters and request a layout.
    fn update_view_layout(&mut self, child: NodeId, params: LayoutParams) -> Result<()>;

    /// Remove `child` from `parent` and drop its subtree.
    fn remove_view(&mut self, parent: NodeId, child: NodeId) -> Result<()>;
}

impl ViewParent for ViewTree {
    fn is_layout_requested(&self, parent: Parent) -> bool {
        match parent {
            Parent::Group(p) => self.nodes.get(p).is_some_and(|n| n.is_layout_requested()),
            Parent::Root => self.root.layout_requested,
        }
    }

    fn request_parent_layout(&mut self, parent: Parent, requester: NodeId) -> Result<()> {
        match parent {
            Parent::Group(p) => self.request_layout(p),
            Parent::Root => {
                if !self.root.handling_layout_in_layout_request {
                    tracing::trace!("root layout requested by {requester:?}");
                    self.root.layout_requested = true;
                    self.root.traversal_scheduled = true;
                }
                Ok(())
            }
        }
    }

    fn invalidate_child_in_parent(
        &mut self,
        parent: Parent,
        origin: Point,
        dirty: Rect,
    ) -> Result<Option<(Parent, Point, Rect)>> {
        match parent {
            Parent::Group(p) => {
                let node = self.node_mut(p)?;
                let bounds = node.local_bounds();
                let frame_origin = node.frame.origin();
                let scroll = node.scroll;
                node.private.insert(PrivateFlags::DIRTY);
                let group = node.group.as_mut().ok_or(Error::NotAGroup(p))?;
                let moved = dirty.offset(origin.x - scroll.x, origin.y - scroll.y);
                let clipped = if group.flags.contains(GroupFlags::CLIP_CHILDREN) {
                    match moved.intersect(&bounds) {
                        Some(r) => r,
                        None => return Ok(None),
                    }
                } else {
                    moved.union(&bounds)
                };
                let imprecise = accumulate(&mut group.dirty, clipped);
                if imprecise {
                    self.attach.ignore_dirty_state = true;
                }
                Ok(self.parent_of(p).map(|next| (next, frame_origin, clipped)))
            }
            Parent::Root => {
                let surface = Rect::at(Point::zero(), self.attach.surface);
                let Some(clipped) = dirty.offset(origin.x, origin.y).intersect(&surface) else {
                    return Ok(None);
                };
                let mut region = Some(self.root.dirty);
                if accumulate(&mut region, clipped) {
                    self.attach.ignore_dirty_state = true;
                }
                self.root.dirty = region.unwrap_or_default();
                self.root.traversal_scheduled = true;
                Ok(None)
            }
        }
    }

    fn request_child_focus(&mut self, parent: Parent, child: NodeId, focused: NodeId) -> Result<()> {
        let p = match parent {
            Parent::Group(p) => p,
            Parent::Root => {
                self.root.traversal_scheduled = true;
                return Ok(());
            }
        };
        if self.group(p)?.descendant_focusability == DescendantFocusability::BlockDescendants {
            return Ok(());
        }
        self.unfocus_self(p)?;
        let previous = self.group(p)?.focused;
        if previous != Some(child) {
            if let Some(old) = previous {
                self.unfocus(old)?;
            }
            self.group_mut(p)?.focused = Some(child);
        }
        match self.parent_of(p) {
            Some(next) => self.request_child_focus(next, p, focused),
            None => Ok(()),
        }
    }

    fn clear_child_focus(&mut self, parent: Parent, child: NodeId) -> Result<()> {
        let Parent::Group(p) = parent else {
            return Ok(());
        };
        let group = self.group_mut(p)?;
        if group.focused == Some(child) {
            group.focused = None;
        }
        match self.parent_of(p) {
            Some(next) => self.clear_child_focus(next, p),
            None => Ok(()),
        }
    }

    fn can_resolve_layout_direction(&self, parent: Parent) -> bool {
        match parent {
            Parent::Group(p) => self
                .nodes
                .get(p)
                .is_some_and(|n| n.is_layout_direction_resolved()),
            Parent::Root => true,
        }
    }

    fn parent_layout_direction(&self, parent: Parent) -> ResolvedDirection {
        match parent {
            Parent::Group(p) => self
                .nodes
                .get(p)
                .map_or(ResolvedDirection::Ltr, |n| n.resolved_layout_direction()),
            Parent::Root => self.attach.locale_direction,
        }
    }
}

/// Union `rect` into an accumulated damage region. Returns true when the
/// existing region was non-empty and did not already contain `rect`, meaning
/// the union over-approximates the real damage.
fn accumulate(region: &mut Option<Rect>, rect: Rect) -> bool {
    match region {
        Some(existing) if !existing.is_empty() => {
            let imprecise = !existing.contains(&rect);
            *existing = existing.union(&rect);
            imprecise
        }
        _ => {
            *region = Some(rect);
            false
        }
    }
}

impl ViewManager for ViewTree {
    fn add_view(
        &mut self,
        parent: NodeId,
        child: NodeId,
        index: Option<usize>,
        params: Option<LayoutParams>,
    ) -> Result<()> {
        self.add_view_inner(parent, child, index, params)
    }

    fn update_view_layout(&mut self, child: NodeId, params: LayoutParams) -> Result<()> {
        if self.parent_of(child).is_none() {
            return Err(Error::Invalid(format!("{child:?} is not in a view hierarchy")));
        }
        self.set_layout_params(child, params)
    }

    fn remove_view(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.remove_view_inner(parent, child)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulate_tracks_precision() {
        let mut region = None;
        assert!(!accumulate(&mut region, Rect::sized(10, 10)));
        assert!(!accumulate(&mut region, Rect::sized(5, 5)));
        assert!(accumulate(&mut region, Rect::sized(20, 5)));
        assert_eq!(region, Some(Rect::sized(20, 10)));

        let mut empty = Some(Rect::zero());
        assert!(!accumulate(&mut empty, Rect::sized(3, 3)));
        assert_eq!(empty, Some(Rect::sized(3, 3)));
    }
}

use std::fmt;

use slotmap::SlotMap;

use crate::{
    core::{
        attach::AttachInfo,
        behavior::ViewBehavior,
        context::ViewContext,
        flags::{DescendantFocusability, GroupFlags, PrivateFlags, ViewFlags, Visibility},
        focus::{FocusListener, FocusManager},
        id::NodeId,
        node::{GroupState, Node},
        parent::{Parent, ViewParent},
        root::{RootOptions, RootState},
        tasks::TaskQueue,
    },
    error::{Error, Result},
    geom::Point,
    params::LayoutParams,
};

/// The arena holding every view of one root, plus the state the views share.
///
/// Views refer to each other through [`NodeId`] handles. Parent links are
/// non-owning; a group owns its children through its child list, and removing
/// a view from its parent drops the whole subtree.
pub struct ViewTree {
    /// Node storage.
    pub(crate) nodes: SlotMap<NodeId, Node>,
    /// The view installed at the root.
    pub(crate) root_view: Option<NodeId>,
    /// State shared by attached views.
    pub(crate) attach: AttachInfo,
    /// The root's side of the parent protocol.
    pub(crate) root: RootState,
    /// Deferred work.
    pub(crate) tasks: TaskQueue,
    /// Global focus observers.
    pub(crate) focus_listeners: Vec<FocusListener>,
}

impl ViewTree {
    /// Create an empty tree.
    pub(crate) fn new(options: &RootOptions) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root_view: None,
            attach: AttachInfo::new(options),
            root: RootState::default(),
            tasks: TaskQueue::default(),
            focus_listeners: Vec::new(),
        }
    }

    /// Create a detached leaf view.
    pub fn create_view(&mut self, behavior: impl Into<Box<dyn ViewBehavior>>) -> NodeId {
        self.nodes.insert(Node::new(behavior.into(), false))
    }

    /// Create a detached group view.
    pub fn create_group(&mut self, behavior: impl Into<Box<dyn ViewBehavior>>) -> NodeId {
        self.nodes.insert(Node::new(behavior.into(), true))
    }

    /// Does the arena hold this node?
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Is the arena empty?
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node.
    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id).ok_or(Error::NodeNotFound(id))
    }

    /// Look up a node mutably.
    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(id).ok_or(Error::NodeNotFound(id))
    }

    /// Group state of a node.
    pub(crate) fn group(&self, id: NodeId) -> Result<&GroupState> {
        self.node(id)?.group.as_ref().ok_or(Error::NotAGroup(id))
    }

    /// Group state of a node, mutably.
    pub(crate) fn group_mut(&mut self, id: NodeId) -> Result<&mut GroupState> {
        self.node_mut(id)?.group.as_mut().ok_or(Error::NotAGroup(id))
    }

    /// Borrow a node's behaviour as a concrete type.
    pub fn behavior<T: ViewBehavior>(&self, id: NodeId) -> Option<&T> {
        self.nodes.get(id)?.behavior::<T>()
    }

    /// Mutably borrow a node's behaviour as a concrete type.
    pub fn behavior_mut<T: ViewBehavior>(&mut self, id: NodeId) -> Option<&mut T> {
        self.nodes.get_mut(id)?.behavior_mut::<T>()
    }

    /// Shared attach state.
    pub fn attach_info(&self) -> &AttachInfo {
        &self.attach
    }

    /// The view installed at the root.
    pub fn root_view(&self) -> Option<NodeId> {
        self.root_view
    }

    /// Parent group of a node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    /// The parent-protocol target of a node: its group, the root for the
    /// root view, or nothing for a detached top-level view.
    pub fn parent_of(&self, id: NodeId) -> Option<Parent> {
        match self.parent(id) {
            Some(p) => Some(Parent::Group(p)),
            None if self.root_view == Some(id) => Some(Parent::Root),
            None => None,
        }
    }

    /// Children of a node; empty for leaves and unknown nodes.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map(|n| n.children()).unwrap_or_default()
    }

    /// Number of children.
    pub fn child_count(&self, id: NodeId) -> usize {
        self.children(id).len()
    }

    /// Index of `child` among `parent`'s children.
    pub fn index_of_child(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.children(parent).iter().position(|c| *c == child)
    }

    /// Is `ancestor` a strict ancestor of `node`?
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = self.parent(node);
        while let Some(p) = cur {
            if p == ancestor {
                return true;
            }
            cur = self.parent(p);
        }
        false
    }

    /// A node and its descendants in pre-order.
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            if !self.nodes.contains_key(n) {
                continue;
            }
            out.push(n);
            stack.extend(self.children(n).iter().rev());
        }
        out
    }

    /// Is the node attached to a root?
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.attached)
    }

    /// Is the node and every ancestor visible?
    pub fn is_shown(&self, id: NodeId) -> bool {
        let mut cur = Some(id);
        while let Some(n) = cur {
            match self.nodes.get(n) {
                Some(node) if node.visibility == Visibility::Visible => cur = node.parent,
                _ => return false,
            }
        }
        true
    }

    /// Set the user-assigned identity.
    pub fn set_id(&mut self, id: NodeId, view_id: i32) -> Result<()> {
        self.node_mut(id)?.view_id = view_id;
        Ok(())
    }

    /// Find the first view in `start`'s subtree, in pre-order, with the given
    /// identity.
    pub fn find_view_by_id(&self, start: NodeId, view_id: i32) -> Option<NodeId> {
        self.subtree(start)
            .into_iter()
            .find(|n| self.nodes.get(*n).is_some_and(|node| node.view_id == view_id))
    }

    /// Check a node's behaviour out of the arena, run `f` with it and a
    /// context scoped to the node, and put it back.
    pub(crate) fn with_behavior<R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut dyn ViewBehavior, &mut ViewContext<'_>) -> R,
    ) -> Result<R> {
        let mut behavior = self
            .node_mut(id)?
            .behavior
            .take()
            .ok_or(Error::ReentrantBehavior(id))?;
        let out = {
            let mut ctx = ViewContext::new(self, id);
            f(behavior.as_mut(), &mut ctx)
        };
        // The hook may have removed its own node.
        if let Some(node) = self.nodes.get_mut(id) {
            node.behavior = Some(behavior);
        }
        Ok(out)
    }

    /// Run a notification hook. Skipped if the behaviour is already running.
    pub(crate) fn notify(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut dyn ViewBehavior, &mut ViewContext<'_>),
    ) {
        match self.with_behavior(id, f) {
            Ok(()) => {}
            Err(e) => tracing::trace!("skipping notification for {id:?}: {e}"),
        }
    }

    /// Set visibility. Hiding a view clears focus held in its subtree, and
    /// moving to or from `Gone` requests a layout.
    pub fn set_visibility(&mut self, id: NodeId, visibility: Visibility) -> Result<()> {
        let old = self.node(id)?.visibility;
        if old == visibility {
            return Ok(());
        }
        if visibility != Visibility::Visible && self.node(id)?.has_focus() {
            self.clear_focus(id)?;
        }
        // Damage the old area before it disappears.
        self.invalidate_in_parent(id)?;
        self.node_mut(id)?.visibility = visibility;
        if old == Visibility::Gone || visibility == Visibility::Gone {
            self.request_layout(id)?;
        }
        self.invalidate_in_parent(id)?;
        self.update_background_visibility(id)?;
        Ok(())
    }

    /// Allow or forbid focus.
    pub fn set_focusable(&mut self, id: NodeId, focusable: bool) -> Result<()> {
        let node = self.node_mut(id)?;
        node.flags.set(ViewFlags::FOCUSABLE, focusable);
        if !focusable {
            node.flags.remove(ViewFlags::FOCUSABLE_IN_TOUCH_MODE);
            if node.is_focused() {
                self.clear_focus(id)?;
            }
        }
        Ok(())
    }

    /// Allow or forbid focus in touch mode. Allowing it implies focusable.
    pub fn set_focusable_in_touch_mode(&mut self, id: NodeId, focusable: bool) -> Result<()> {
        let in_touch_mode = self.attach.in_touch_mode;
        let node = self.node_mut(id)?;
        node.flags.set(ViewFlags::FOCUSABLE_IN_TOUCH_MODE, focusable);
        if focusable {
            node.flags.insert(ViewFlags::FOCUSABLE);
        } else if in_touch_mode && node.is_focused() {
            self.clear_focus(id)?;
        }
        Ok(())
    }

    /// Enable or disable the view.
    pub fn set_enabled(&mut self, id: NodeId, enabled: bool) -> Result<()> {
        let node = self.node_mut(id)?;
        if node.is_enabled() == enabled {
            return Ok(());
        }
        node.flags.set(ViewFlags::DISABLED, !enabled);
        node.private.insert(PrivateFlags::DRAWABLE_STATE_DIRTY);
        self.refresh_drawable_state(id)?;
        self.invalidate(id)
    }

    /// Mark the view as drawing nothing of its own.
    pub fn set_will_not_draw(&mut self, id: NodeId, will_not_draw: bool) -> Result<()> {
        self.node_mut(id)?
            .flags
            .set(ViewFlags::WILL_NOT_DRAW, will_not_draw);
        Ok(())
    }

    /// Set or clear the pressed state.
    pub fn set_pressed(&mut self, id: NodeId, pressed: bool) -> Result<()> {
        let node = self.node_mut(id)?;
        if node.is_pressed() == pressed {
            return Ok(());
        }
        node.private.set(PrivateFlags::PRESSED, pressed);
        node.private.insert(PrivateFlags::DRAWABLE_STATE_DIRTY);
        self.refresh_drawable_state(id)
    }

    /// Set or clear the hovered state.
    pub fn set_hovered(&mut self, id: NodeId, hovered: bool) -> Result<()> {
        let node = self.node_mut(id)?;
        if node.is_hovered() == hovered {
            return Ok(());
        }
        node.private.set(PrivateFlags::HOVERED, hovered);
        node.private.insert(PrivateFlags::DRAWABLE_STATE_DIRTY);
        self.refresh_drawable_state(id)
    }

    /// Set the minimum width.
    pub fn set_minimum_width(&mut self, id: NodeId, width: u32) -> Result<()> {
        self.node_mut(id)?.min_width = width;
        self.request_layout(id)
    }

    /// Set the minimum height.
    pub fn set_minimum_height(&mut self, id: NodeId, height: u32) -> Result<()> {
        self.node_mut(id)?.min_height = height;
        self.request_layout(id)
    }

    /// Replace the view's layout parameters.
    pub fn set_layout_params(&mut self, id: NodeId, params: LayoutParams) -> Result<()> {
        let node = self.node_mut(id)?;
        node.layout_params = Some(params);
        node.private.remove(PrivateFlags::PADDING_RESOLVED);
        self.request_layout(id)
    }

    /// Scroll the content to an absolute offset.
    pub fn scroll_to(&mut self, id: NodeId, x: i32, y: i32) -> Result<()> {
        let node = self.node_mut(id)?;
        let p = Point::new(x, y);
        if node.scroll == p {
            return Ok(());
        }
        node.scroll = p;
        self.invalidate(id)
    }

    /// Scroll the content by a delta.
    pub fn scroll_by(&mut self, id: NodeId, dx: i32, dy: i32) -> Result<()> {
        let p = self.node(id)?.scroll.offset(dx, dy);
        self.scroll_to(id, p.x, p.y)
    }

    /// Shift the frame horizontally without a layout pass.
    pub fn offset_left_and_right(&mut self, id: NodeId, dx: i32) -> Result<()> {
        self.offset_frame(id, dx, 0)
    }

    /// Shift the frame vertically without a layout pass.
    pub fn offset_top_and_bottom(&mut self, id: NodeId, dy: i32) -> Result<()> {
        self.offset_frame(id, 0, dy)
    }

    /// Move the frame and damage the union of the old and new positions.
    fn offset_frame(&mut self, id: NodeId, dx: i32, dy: i32) -> Result<()> {
        if dx == 0 && dy == 0 {
            return Ok(());
        }
        let node = self.node_mut(id)?;
        let old = node.frame;
        node.frame = old.offset(dx, dy);
        let damage = old.union(&node.frame);
        self.damage_parent(id, damage)
    }

    /// Set a group's focus ordering. Blocking clears focus held below it.
    pub fn set_descendant_focusability(
        &mut self,
        id: NodeId,
        policy: DescendantFocusability,
    ) -> Result<()> {
        let group = self.group_mut(id)?;
        group.descendant_focusability = policy;
        if policy == DescendantFocusability::BlockDescendants
            && let Some(focused) = group.focused
        {
            self.clear_focus(focused)?;
        }
        Ok(())
    }

    /// Clip each child to its own bounds while drawing.
    pub fn set_clip_children(&mut self, id: NodeId, clip: bool) -> Result<()> {
        self.group_mut(id)?.flags.set(GroupFlags::CLIP_CHILDREN, clip);
        self.invalidate(id)
    }

    /// Clip children to the padded content area while drawing.
    pub fn set_clip_to_padding(&mut self, id: NodeId, clip: bool) -> Result<()> {
        self.group_mut(id)?
            .flags
            .set(GroupFlags::CLIP_TO_PADDING, clip);
        self.invalidate(id)
    }

    /// Keep focus out of this group's descendants on touchscreen devices.
    pub fn set_touchscreen_blocks_focus(&mut self, id: NodeId, blocks: bool) -> Result<()> {
        let touchscreen = self.attach.has_touchscreen;
        let group = self.group_mut(id)?;
        group.flags.set(GroupFlags::TOUCHSCREEN_BLOCKS_FOCUS, blocks);
        if blocks
            && touchscreen
            && let Some(focused) = group.focused
        {
            self.clear_focus(focused)?;
        }
        Ok(())
    }

    /// Keep drawing and invalidating `child` while it is hidden or removed,
    /// until [`ViewTree::end_view_transition`].
    pub fn start_view_transition(&mut self, group: NodeId, child: NodeId) -> Result<()> {
        let g = self.group_mut(group)?;
        if !g.transitioning.contains(&child) {
            g.transitioning.push(child);
        }
        Ok(())
    }

    /// End a transition started with [`ViewTree::start_view_transition`].
    pub fn end_view_transition(&mut self, group: NodeId, child: NodeId) -> Result<()> {
        self.group_mut(group)?.transitioning.retain(|c| *c != child);
        self.invalidate(group)
    }

    /// Is `child` transitioning in its parent?
    pub fn is_view_transitioning(&self, child: NodeId) -> bool {
        self.parent(child)
            .and_then(|p| self.group(p).ok())
            .is_some_and(|g| g.transitioning.contains(&child))
    }

    /// Mark a subtree attached, top-down, and run the attach hooks.
    pub(crate) fn dispatch_attached(&mut self, id: NodeId) -> Result<()> {
        for n in self.subtree(id) {
            let node = self.node_mut(n)?;
            node.attached = true;
            node.private.remove(
                PrivateFlags::LAYOUT_DIRECTION_RESOLVED | PrivateFlags::PADDING_RESOLVED,
            );
            node.private.insert(PrivateFlags::DRAWABLE_STATE_DIRTY);
            if let Some(lp) = node.layout_params.as_mut() {
                lp.margins.reset_resolution();
            }
            self.resolve_rtl_properties_if_needed(n)?;
            self.refresh_drawable_state(n)?;
            self.update_background_visibility(n)?;
            self.notify(n, |b, ctx| b.on_attached(ctx));
        }
        Ok(())
    }

    /// Run the detach hooks on a subtree, bottom-up, and mark it detached.
    pub(crate) fn dispatch_detached(&mut self, id: NodeId) -> Result<()> {
        for n in self.subtree(id).into_iter().rev() {
            if !self.node(n)?.attached {
                continue;
            }
            self.notify(n, |b, ctx| b.on_detached(ctx));
            self.tasks.remove_node(n);
            self.root.layout_requesters.retain(|r| *r != n);
            if self.attach.hovered == Some(n) {
                self.attach.hovered = None;
            }
            if self.attach.view_requesting_layout == Some(n) {
                self.attach.view_requesting_layout = None;
            }
            let node = self.node_mut(n)?;
            node.attached = false;
            node.private
                .remove(PrivateFlags::HOVERED | PrivateFlags::PRESSED);
            self.update_background_visibility(n)?;
        }
        Ok(())
    }

    /// Unlink `child` from `parent` without dropping it. Focus held in the
    /// subtree is cleared first.
    pub fn detach_view(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if self.parent(child) != Some(parent) {
            self.group(parent)?;
            return Err(Error::NotAChild { parent, child });
        }
        if self.node(child)?.has_focus() {
            self.clear_focus(child)?;
        }
        self.invalidate_in_parent(child)?;
        if self.node(child)?.attached {
            self.dispatch_detached(child)?;
        }
        let group = self.group_mut(parent)?;
        group.children.retain(|c| *c != child);
        group.transitioning.retain(|c| *c != child);
        self.node_mut(child)?.parent = None;
        self.request_layout(parent)?;
        tracing::trace!("detached {child:?} from {parent:?}");
        Ok(())
    }

    /// Remove and drop every child of a group.
    pub fn remove_all_views(&mut self, parent: NodeId) -> Result<()> {
        for child in self.group(parent)?.children.clone() {
            self.remove_view_inner(parent, child)?;
        }
        Ok(())
    }

    /// Remove and drop the child at `index`.
    pub fn remove_view_at(&mut self, parent: NodeId, index: usize) -> Result<()> {
        let child = self
            .group(parent)?
            .children
            .get(index)
            .copied()
            .ok_or_else(|| Error::Invalid(format!("no child at index {index}")))?;
        self.remove_view_inner(parent, child)
    }

    /// Detach a child and drop its subtree from the arena.
    pub(crate) fn remove_view_inner(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.detach_view(parent, child)?;
        for n in self.subtree(child) {
            self.tasks.remove_node(n);
            self.nodes.remove(n);
        }
        Ok(())
    }

    /// Link a validated child under a parent.
    pub(crate) fn add_view_inner(
        &mut self,
        parent: NodeId,
        child: NodeId,
        index: Option<usize>,
        params: Option<LayoutParams>,
    ) -> Result<()> {
        // Validate everything before touching the tree.
        let len = self.group(parent)?.children.len();
        let child_node = self.node(child)?;
        if child_node.parent.is_some() || self.root_view == Some(child) {
            return Err(Error::AlreadyHasParent { child });
        }
        if child == parent || self.is_ancestor(child, parent) {
            return Err(Error::WouldCreateCycle { parent, child });
        }
        let index = index.unwrap_or(len);
        if index > len {
            return Err(Error::Invalid(format!(
                "index {index} out of range for {len} children"
            )));
        }

        self.request_layout(parent)?;
        self.invalidate(parent)?;

        let node = self.node_mut(child)?;
        if let Some(params) = params {
            node.layout_params = Some(params);
        } else if node.layout_params.is_none() {
            node.layout_params = Some(LayoutParams::default());
        }
        node.parent = Some(parent);
        self.group_mut(parent)?.children.insert(index, child);

        if self.node(child)?.has_focus()
            && let Some(focused) = self.find_focus(child)
        {
            self.request_child_focus(Parent::Group(parent), child, focused)?;
        }
        if self.node(parent)?.attached {
            self.dispatch_attached(child)?;
        }
        tracing::trace!("added {child:?} to {parent:?} at {index}");
        Ok(())
    }

    /// Invalidate the area a view occupies in its parent.
    pub(crate) fn invalidate_in_parent(&mut self, id: NodeId) -> Result<()> {
        let frame = self.node(id)?.frame;
        self.damage_parent(id, frame)
    }

    /// Check structural invariants: parent and child links agree, focus
    /// paths point at children, and at most one attached view holds focus.
    pub fn check_invariants(&self) -> Result<()> {
        let mut focused = 0;
        for (id, node) in &self.nodes {
            if let Some(p) = node.parent {
                let parent = self.node(p)?;
                if !parent.children().contains(&id) {
                    return Err(Error::Invalid(format!(
                        "{id:?} names {p:?} as parent but is not among its children"
                    )));
                }
            }
            for child in node.children() {
                if self.node(*child)?.parent != Some(id) {
                    return Err(Error::Invalid(format!(
                        "{child:?} is a child of {id:?} but does not name it as parent"
                    )));
                }
            }
            if let Some(f) = node.focused_child()
                && !node.children().contains(&f)
            {
                return Err(Error::Invalid(format!(
                    "focused child {f:?} of {id:?} is not one of its children"
                )));
            }
            if node.attached && node.is_focused() {
                focused += 1;
            }
        }
        if focused > 1 {
            return Err(Error::Invalid(format!("{focused} views hold focus")));
        }
        Ok(())
    }
}

impl fmt::Debug for ViewTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewTree")
            .field("nodes", &self.nodes.len())
            .field("root_view", &self.root_view)
            .field("attach", &self.attach)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::{Leaf, Stack};

    fn tree() -> ViewTree {
        ViewTree::new(&RootOptions::default())
    }

    #[test]
    fn add_and_find() -> Result<()> {
        let mut t = tree();
        let g = t.create_group(Stack::new());
        let a = t.create_view(Leaf);
        let b = t.create_view(Leaf);
        t.set_id(b, 7)?;
        t.add_view_inner(g, a, None, None)?;
        t.add_view_inner(g, b, Some(0), None)?;
        assert_eq!(t.children(g), &[b, a]);
        assert_eq!(t.find_view_by_id(g, 7), Some(b));
        assert_eq!(t.find_view_by_id(g, 8), None);
        assert_eq!(t.parent_of(a), Some(Parent::Group(g)));
        assert_eq!(t.node(a)?.layout_params(), Some(&LayoutParams::wrap()));
        t.check_invariants()
    }

    #[test]
    fn add_rejects_bad_input_without_mutation() -> Result<()> {
        let mut t = tree();
        let g = t.create_group(Stack::new());
        let inner = t.create_group(Stack::new());
        let leaf = t.create_view(Leaf);
        t.add_view_inner(g, inner, None, None)?;

        assert_eq!(
            t.add_view_inner(inner, g, None, None),
            Err(Error::WouldCreateCycle {
                parent: inner,
                child: g
            })
        );
        assert_eq!(t.add_view_inner(leaf, g, None, None), Err(Error::NotAGroup(leaf)));
        assert!(t.add_view_inner(g, leaf, Some(5), None).is_err());
        assert_eq!(t.children(g), &[inner]);
        assert_eq!(t.parent(leaf), None);
        t.check_invariants()
    }

    #[test]
    fn remove_drops_subtree() -> Result<()> {
        let mut t = tree();
        let g = t.create_group(Stack::new());
        let inner = t.create_group(Stack::new());
        let leaf = t.create_view(Leaf);
        t.add_view_inner(g, inner, None, None)?;
        t.add_view_inner(inner, leaf, None, None)?;
        t.remove_view_inner(g, inner)?;
        assert!(!t.contains(inner));
        assert!(!t.contains(leaf));
        assert!(t.children(g).is_empty());
        Ok(())
    }

    #[test]
    fn detach_keeps_node() -> Result<()> {
        let mut t = tree();
        let g = t.create_group(Stack::new());
        let leaf = t.create_view(Leaf);
        t.add_view_inner(g, leaf, None, None)?;
        t.detach_view(g, leaf)?;
        assert!(t.contains(leaf));
        assert_eq!(t.parent(leaf), None);
        assert_eq!(
            t.detach_view(g, leaf),
            Err(Error::NotAChild {
                parent: g,
                child: leaf
            })
        );
        Ok(())
    }

    #[test]
    fn subtree_is_preorder() -> Result<()> {
        let mut t = tree();
        let g = t.create_group(Stack::new());
        let a = t.create_group(Stack::new());
        let a1 = t.create_view(Leaf);
        let b = t.create_view(Leaf);
        t.add_view_inner(g, a, None, None)?;
        t.add_view_inner(a, a1, None, None)?;
        t.add_view_inner(g, b, None, None)?;
        assert_eq!(t.subtree(g), vec![g, a, a1, b]);
        assert!(t.is_ancestor(g, a1));
        assert!(!t.is_ancestor(a1, g));
        Ok(())
    }
}

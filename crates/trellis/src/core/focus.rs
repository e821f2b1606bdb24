use crate::{
    core::{
        flags::{DescendantFocusability, GroupFlags, PrivateFlags, ViewFlags, Visibility},
        id::NodeId,
        parent::ViewParent,
        tree::ViewTree,
    },
    error::Result,
    geom::Rect,
};

/// Direction of a focus request. Backward requests scan children last to
/// first; everything else scans first to last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FocusDirection {
    /// Next in order.
    #[default]
    Forward,
    /// Previous in order.
    Backward,
    /// Upward.
    Up,
    /// Downward.
    Down,
    /// Leftward.
    Left,
    /// Rightward.
    Right,
}

/// Observer called with `(old, new)` whenever the focused view changes.
pub type FocusListener = Box<dyn FnMut(Option<NodeId>, Option<NodeId>) + Send>;

/// Trait for managing input focus.
///
/// At most one attached view holds focus. Every group between it and the
/// root records which child leads towards it.
pub trait FocusManager {
    /// Ask for focus. A group consults its descendant focusability to decide
    /// between itself and its children. Returns true if `node` or one of its
    /// descendants now holds focus.
    fn request_focus(
        &mut self,
        node: NodeId,
        direction: FocusDirection,
        previous: Option<Rect>,
    ) -> Result<bool>;

    /// Shorthand for a forward request with no previous rectangle.
    fn focus(&mut self, node: NodeId) -> Result<bool> {
        self.request_focus(node, FocusDirection::Forward, None)
    }

    /// Give up focus held by `node` or, for a group, by its descendants.
    fn clear_focus(&mut self, node: NodeId) -> Result<()>;

    /// The focused view in `node`'s subtree.
    fn find_focus(&self, node: NodeId) -> Option<NodeId>;

    /// Is `node` or a descendant focused?
    fn has_focus(&self, node: NodeId) -> bool;

    /// Does `node` itself hold focus?
    fn is_focused(&self, node: NodeId) -> bool;

    /// The child of `node` leading to the focused view.
    fn focused_child(&self, node: NodeId) -> Option<NodeId>;

    /// Could `node` take focus right now, ignoring its ancestors?
    fn can_take_focus(&self, node: NodeId) -> bool;

    /// Does an ancestor keep focus out of `node`?
    fn has_ancestor_that_blocks_descendant_focus(&self, node: NodeId) -> bool;

    /// Register a global focus observer.
    fn add_focus_change_listener(&mut self, listener: FocusListener);
}

impl FocusManager for ViewTree {
    fn request_focus(
        &mut self,
        node: NodeId,
        direction: FocusDirection,
        previous: Option<Rect>,
    ) -> Result<bool> {
        let n = self.node(node)?;
        let Some(group) = n.group.as_ref() else {
            return self.request_focus_no_search(node, direction);
        };
        let policy = if group.flags.contains(GroupFlags::TOUCHSCREEN_BLOCKS_FOCUS)
            && self.attach.has_touchscreen
        {
            DescendantFocusability::BlockDescendants
        } else {
            group.descendant_focusability
        };
        match policy {
            DescendantFocusability::BlockDescendants => {
                self.request_focus_no_search(node, direction)
            }
            DescendantFocusability::BeforeDescendants => {
                if self.request_focus_no_search(node, direction)? {
                    Ok(true)
                } else {
                    self.request_focus_in_descendants(node, direction, previous)
                }
            }
            DescendantFocusability::AfterDescendants => {
                if self.request_focus_in_descendants(node, direction, previous)? {
                    Ok(true)
                } else {
                    self.request_focus_no_search(node, direction)
                }
            }
        }
    }

    fn clear_focus(&mut self, node: NodeId) -> Result<()> {
        let n = self.node(node)?;
        if !n.is_focused() {
            // A group hands the request to the focused view below it.
            if let Some(focused) = self.find_focus(node)
                && focused != node
            {
                return self.clear_focus(focused);
            }
            return Ok(());
        }
        tracing::debug!("clearing focus from {node:?}");
        self.node_mut(node)?.private.remove(PrivateFlags::FOCUSED);
        if let Some(parent) = self.parent_of(node) {
            self.clear_child_focus(parent, node)?;
        }
        self.focus_changed(node, false, FocusDirection::Forward)?;
        self.notify_focus_listeners(Some(node), None);
        Ok(())
    }

    fn find_focus(&self, node: NodeId) -> Option<NodeId> {
        let mut cur = node;
        loop {
            let n = self.nodes.get(cur)?;
            if n.is_focused() {
                return Some(cur);
            }
            cur = n.focused_child()?;
        }
    }

    fn has_focus(&self, node: NodeId) -> bool {
        self.nodes.get(node).is_some_and(|n| n.has_focus())
    }

    fn is_focused(&self, node: NodeId) -> bool {
        self.nodes.get(node).is_some_and(|n| n.is_focused())
    }

    fn focused_child(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|n| n.focused_child())
    }

    fn can_take_focus(&self, node: NodeId) -> bool {
        let Some(n) = self.nodes.get(node) else {
            return false;
        };
        let mode_ok = !self.attach.in_touch_mode
            || n.flags.contains(ViewFlags::FOCUSABLE_IN_TOUCH_MODE);
        n.flags.contains(ViewFlags::FOCUSABLE)
            && n.visibility == Visibility::Visible
            && n.is_enabled()
            && mode_ok
    }

    fn has_ancestor_that_blocks_descendant_focus(&self, node: NodeId) -> bool {
        let mut cur = self.parent(node);
        while let Some(p) = cur {
            let Ok(group) = self.group(p) else {
                return false;
            };
            if group.descendant_focusability == DescendantFocusability::BlockDescendants {
                return true;
            }
            if group.flags.contains(GroupFlags::TOUCHSCREEN_BLOCKS_FOCUS)
                && self.attach.has_touchscreen
            {
                return true;
            }
            cur = self.parent(p);
        }
        false
    }

    fn add_focus_change_listener(&mut self, listener: FocusListener) {
        self.focus_listeners.push(listener);
    }
}

impl ViewTree {
    /// Take focus for `node` itself, without looking at descendants.
    fn request_focus_no_search(&mut self, node: NodeId, direction: FocusDirection) -> Result<bool> {
        if !self.can_take_focus(node) || self.has_ancestor_that_blocks_descendant_focus(node) {
            return Ok(false);
        }
        if !self.node(node)?.is_focused() {
            self.handle_focus_gain(node, direction)?;
        }
        Ok(true)
    }

    /// Offer focus to each visible child in turn.
    fn request_focus_in_descendants(
        &mut self,
        node: NodeId,
        direction: FocusDirection,
        previous: Option<Rect>,
    ) -> Result<bool> {
        let mut children = self.children(node).to_vec();
        if direction == FocusDirection::Backward {
            children.reverse();
        }
        for child in children {
            if self.node(child)?.visibility != Visibility::Visible {
                continue;
            }
            if self.request_focus(child, direction, previous)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Make `node` the focused view and route the focus path to it.
    fn handle_focus_gain(&mut self, node: NodeId, direction: FocusDirection) -> Result<()> {
        tracing::debug!("{node:?} gains focus");
        let old = self
            .find_focus(self.topmost_ancestor(node))
            .filter(|o| *o != node);
        if let Some(child) = self.focused_child(node) {
            self.unfocus(child)?;
            self.group_mut(node)?.focused = None;
        }
        self.node_mut(node)?.private.insert(PrivateFlags::FOCUSED);
        if let Some(parent) = self.parent_of(node) {
            self.request_child_focus(parent, node, node)?;
        }
        self.focus_changed(node, true, direction)?;
        self.notify_focus_listeners(old, Some(node));
        Ok(())
    }

    /// The top of the hierarchy `node` belongs to, whether or not it is
    /// installed at the root.
    fn topmost_ancestor(&self, node: NodeId) -> NodeId {
        let mut top = node;
        while let Some(p) = self.parent(top) {
            top = p;
        }
        top
    }

    /// Drop focus from `node` and everything on the focus path below it,
    /// without touching ancestors.
    pub(crate) fn unfocus(&mut self, node: NodeId) -> Result<()> {
        if let Some(child) = self.focused_child(node) {
            self.unfocus(child)?;
            self.group_mut(node)?.focused = None;
        }
        self.unfocus_self(node)
    }

    /// Drop the focus flag from `node` alone.
    pub(crate) fn unfocus_self(&mut self, node: NodeId) -> Result<()> {
        let n = self.node_mut(node)?;
        if !n.is_focused() {
            return Ok(());
        }
        n.private.remove(PrivateFlags::FOCUSED);
        self.focus_changed(node, false, FocusDirection::Forward)
    }

    /// Run the focus hook and refresh state that depends on focus.
    fn focus_changed(&mut self, node: NodeId, gained: bool, direction: FocusDirection) -> Result<()> {
        self.notify(node, |b, ctx| b.on_focus_changed(ctx, gained, direction));
        self.node_mut(node)?
            .private
            .insert(PrivateFlags::DRAWABLE_STATE_DIRTY);
        self.refresh_drawable_state(node)?;
        self.invalidate(node)
    }

    /// Call every global focus observer.
    fn notify_focus_listeners(&mut self, old: Option<NodeId>, new: Option<NodeId>) {
        for listener in &mut self.focus_listeners {
            listener(old, new);
        }
    }

    /// Enter or leave touch mode. Entering it drops focus from a view that
    /// cannot keep it in touch mode.
    pub fn set_in_touch_mode(&mut self, in_touch_mode: bool) -> Result<()> {
        if self.attach.in_touch_mode == in_touch_mode {
            return Ok(());
        }
        self.attach.in_touch_mode = in_touch_mode;
        tracing::debug!("touch mode: {in_touch_mode}");
        if in_touch_mode
            && let Some(focused) = self.root_view.and_then(|r| self.find_focus(r))
            && !self
                .node(focused)?
                .flags
                .contains(ViewFlags::FOCUSABLE_IN_TOUCH_MODE)
        {
            self.clear_focus(focused)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::{
        core::{parent::ViewManager, root::RootOptions},
        widgets::{Leaf, Stack},
    };

    fn focusable(t: &mut ViewTree) -> Result<NodeId> {
        let id = t.create_view(Leaf);
        t.set_focusable(id, true)?;
        Ok(id)
    }

    #[test]
    fn focus_moves_between_leaves() -> Result<()> {
        let mut t = ViewTree::new(&RootOptions::default());
        let g = t.create_group(Stack::new());
        let a = focusable(&mut t)?;
        let b = focusable(&mut t)?;
        t.add_view(g, a, None, None)?;
        t.add_view(g, b, None, None)?;

        assert!(t.focus(a)?);
        assert_eq!(t.focused_child(g), Some(a));
        assert!(t.focus(b)?);
        assert!(!t.is_focused(a));
        assert_eq!(t.focused_child(g), Some(b));
        assert_eq!(t.find_focus(g), Some(b));
        t.check_invariants()
    }

    #[test]
    fn group_policies() -> Result<()> {
        let mut t = ViewTree::new(&RootOptions::default());
        let g = t.create_group(Stack::new());
        let a = focusable(&mut t)?;
        t.add_view(g, a, None, None)?;
        t.set_focusable(g, true)?;

        assert!(t.focus(g)?);
        assert!(t.is_focused(g));

        t.set_descendant_focusability(g, DescendantFocusability::AfterDescendants)?;
        assert!(t.focus(g)?);
        assert!(t.is_focused(a));
        assert!(!t.is_focused(g));
        assert_eq!(t.focused_child(g), Some(a));

        t.set_descendant_focusability(g, DescendantFocusability::BlockDescendants)?;
        assert!(!t.has_focus(a));
        assert!(!t.has_focus(g));
        assert!(!t.focus(a)?);
        assert!(t.focus(g)?);
        assert!(t.is_focused(g));
        Ok(())
    }

    #[test]
    fn listeners_see_changes() -> Result<()> {
        let mut t = ViewTree::new(&RootOptions::default());
        let g = t.create_group(Stack::new());
        let a = focusable(&mut t)?;
        let b = focusable(&mut t)?;
        t.add_view(g, a, None, None)?;
        t.add_view(g, b, None, None)?;
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        t.add_focus_change_listener(Box::new(move |old, new| {
            s.lock().unwrap().push((old, new));
        }));
        t.focus(a)?;
        t.focus(b)?;
        t.clear_focus(b)?;
        assert_eq!(
            *seen.lock().unwrap(),
            vec![(None, Some(a)), (Some(a), Some(b)), (Some(b), None)]
        );
        Ok(())
    }

    #[test]
    fn touch_mode() -> Result<()> {
        let mut t = ViewTree::new(&RootOptions::default());
        let a = focusable(&mut t)?;
        t.set_in_touch_mode(true)?;
        assert!(!t.focus(a)?);
        t.set_focusable_in_touch_mode(a, true)?;
        assert!(t.focus(a)?);
        Ok(())
    }
}

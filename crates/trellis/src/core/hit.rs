use crate::{
    core::{
        flags::{DescendantFocusability, GroupFlags, Visibility},
        focus::FocusManager,
        id::NodeId,
        tree::ViewTree,
    },
    geom::Point,
};

impl ViewTree {
    /// The deepest focusable view under `point`, given in the coordinates of
    /// `id`'s parent. Later children are on top and are searched first, and
    /// each group's descendant focusability decides whether the group or its
    /// children win.
    pub fn find_focusable_at(&self, id: NodeId, point: Point) -> Option<NodeId> {
        let node = self.nodes.get(id)?;
        if node.visibility != Visibility::Visible || !node.frame.contains_point(point) {
            return None;
        }
        let local = point - node.frame.origin() + node.scroll;
        let me = self.can_take_focus(id).then_some(id);
        let Some(group) = node.group.as_ref() else {
            return me;
        };
        let blocks = group.flags.contains(GroupFlags::TOUCHSCREEN_BLOCKS_FOCUS)
            && self.attach.has_touchscreen;
        let in_children = || {
            group
                .children
                .iter()
                .rev()
                .find_map(|c| self.find_focusable_at(*c, local))
        };
        match group.descendant_focusability {
            _ if blocks => me,
            DescendantFocusability::BlockDescendants => me,
            DescendantFocusability::BeforeDescendants => me.or_else(in_children),
            DescendantFocusability::AfterDescendants => in_children().or(me),
        }
    }

    /// The topmost visible view under `point`, given in the coordinates of
    /// `id`'s parent.
    pub fn find_view_at(&self, id: NodeId, point: Point) -> Option<NodeId> {
        let node = self.nodes.get(id)?;
        if node.visibility != Visibility::Visible || !node.frame.contains_point(point) {
            return None;
        }
        let local = point - node.frame.origin() + node.scroll;
        node.children()
            .iter()
            .rev()
            .find_map(|c| self.find_view_at(*c, local))
            .or(Some(id))
    }
}

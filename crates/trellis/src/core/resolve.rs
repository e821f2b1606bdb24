use crate::{
    core::{
        direction::{LayoutDirection, ResolvedDirection},
        flags::PrivateFlags,
        id::NodeId,
        parent::ViewParent,
        tree::ViewTree,
    },
    error::Result,
    geom::Insets,
};

impl ViewTree {
    /// Set the requested layout direction. The view and the descendants that
    /// inherit from it are re-resolved and remeasured on the next pass.
    pub fn set_layout_direction(&mut self, id: NodeId, direction: LayoutDirection) -> Result<()> {
        if self.node(id)?.layout_direction == direction {
            return Ok(());
        }
        self.node_mut(id)?.layout_direction = direction;
        self.reset_rtl_properties(id)?;
        self.request_layout(id)?;
        self.invalidate(id)
    }

    /// Is the view laid out right to left? False until resolved.
    pub fn is_layout_rtl(&self, id: NodeId) -> bool {
        self.nodes
            .get(id)
            .is_some_and(|n| n.resolved_layout_direction().is_rtl())
    }

    /// Set absolute padding, discarding any relative padding.
    pub fn set_padding(&mut self, id: NodeId, padding: Insets) -> Result<()> {
        let node = self.node_mut(id)?;
        node.padding.user = padding;
        node.padding.start = None;
        node.padding.end = None;
        self.padding_changed(id)
    }

    /// Set direction-relative padding.
    pub fn set_padding_relative(
        &mut self,
        id: NodeId,
        start: u32,
        top: u32,
        end: u32,
        bottom: u32,
    ) -> Result<()> {
        let node = self.node_mut(id)?;
        node.padding.start = Some(start);
        node.padding.end = Some(end);
        node.padding.user.top = top;
        node.padding.user.bottom = bottom;
        self.padding_changed(id)
    }

    /// Re-resolve padding and schedule a layout.
    fn padding_changed(&mut self, id: NodeId) -> Result<()> {
        let node = self.node_mut(id)?;
        node.private.remove(PrivateFlags::PADDING_RESOLVED);
        let direction = node.resolved_layout_direction();
        node.padding.resolve(direction);
        node.private.insert(PrivateFlags::PADDING_RESOLVED);
        self.request_layout(id)?;
        self.invalidate(id)
    }

    /// Resolve direction, padding and margins if any of them are stale. A
    /// view that resolves its direction here also resolves the children that
    /// inherit it.
    pub(crate) fn resolve_rtl_properties_if_needed(&mut self, id: NodeId) -> Result<()> {
        let mut resolved_now = false;
        if !self.node(id)?.is_layout_direction_resolved() {
            resolved_now = self.resolve_layout_direction(id)?;
            self.node_mut(id)?
                .private
                .remove(PrivateFlags::PADDING_RESOLVED);
        }
        let node = self.node_mut(id)?;
        let direction = node.resolved_layout_direction();
        if !node.private.contains(PrivateFlags::PADDING_RESOLVED) {
            node.padding.resolve(direction);
            node.private.insert(PrivateFlags::PADDING_RESOLVED);
        }
        if let Some(lp) = node.layout_params.as_mut() {
            lp.margins.resolve(direction);
        }
        if resolved_now {
            for child in self.children(id).to_vec() {
                let c = self.node(child)?;
                if c.layout_direction == LayoutDirection::Inherit
                    && !c.is_layout_direction_resolved()
                {
                    self.resolve_rtl_properties_if_needed(child)?;
                }
            }
        }
        Ok(())
    }

    /// Compute the resolved direction. Returns false if the view inherits
    /// from a parent that cannot answer yet; the view is then treated as
    /// left to right and retried on the next pass.
    fn resolve_layout_direction(&mut self, id: NodeId) -> Result<bool> {
        let requested = self.node(id)?.layout_direction;
        let resolved = match requested {
            LayoutDirection::Ltr => Some(ResolvedDirection::Ltr),
            LayoutDirection::Rtl => Some(ResolvedDirection::Rtl),
            LayoutDirection::Locale => Some(self.attach.locale_direction),
            LayoutDirection::Inherit => match self.parent_of(id) {
                Some(parent) if self.can_resolve_layout_direction(parent) => {
                    Some(self.parent_layout_direction(parent))
                }
                _ => None,
            },
        };
        let node = self.node_mut(id)?;
        match resolved {
            Some(direction) => {
                node.private.set(
                    PrivateFlags::LAYOUT_DIRECTION_RTL,
                    direction == ResolvedDirection::Rtl,
                );
                node.private.insert(PrivateFlags::LAYOUT_DIRECTION_RESOLVED);
                Ok(true)
            }
            None => {
                node.private.remove(PrivateFlags::LAYOUT_DIRECTION_RTL);
                Ok(false)
            }
        }
    }

    /// Forget resolved properties for `id` and every inheriting descendant,
    /// and force each of them through measure again so cached sizes computed
    /// for the old direction are not reused.
    pub(crate) fn reset_rtl_properties(&mut self, id: NodeId) -> Result<()> {
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            let node = self.node_mut(n)?;
            node.private.remove(
                PrivateFlags::LAYOUT_DIRECTION_RESOLVED | PrivateFlags::PADDING_RESOLVED,
            );
            node.private.insert(PrivateFlags::FORCE_LAYOUT);
            node.measure_cache.clear();
            if let Some(lp) = node.layout_params.as_mut() {
                lp.margins.reset_resolution();
            }
            for child in self.children(n) {
                if self.node(*child)?.layout_direction == LayoutDirection::Inherit {
                    stack.push(*child);
                }
            }
        }
        Ok(())
    }
}

use crate::{
    core::{
        flags::Visibility,
        id::NodeId,
        tree::ViewTree,
    },
    error::Result,
    geom::{Insets, Rect},
    measure_spec::MeasureSpec,
    params::{LayoutParams, Margins},
};

/// A view's handle on the tree while one of its hooks runs.
///
/// Operations default to the context's own node; the `*_child` family acts
/// on a direct child.
pub struct ViewContext<'a> {
    /// The tree.
    tree: &'a mut ViewTree,
    /// The node whose hook is running.
    node: NodeId,
}

impl<'a> ViewContext<'a> {
    /// Scope a context to `node`.
    pub(crate) fn new(tree: &'a mut ViewTree, node: NodeId) -> Self {
        Self { tree, node }
    }

    /// The node this context is scoped to.
    pub fn node_id(&self) -> NodeId {
        self.node
    }

    /// Read access to the whole tree.
    pub fn tree(&self) -> &ViewTree {
        self.tree
    }

    /// Write access to the whole tree.
    pub fn tree_mut(&mut self) -> &mut ViewTree {
        self.tree
    }

    /// Children of this node.
    pub fn children(&self) -> Vec<NodeId> {
        self.tree.children(self.node).to_vec()
    }

    /// Effective padding of this node.
    pub fn padding(&self) -> Result<Insets> {
        Ok(self.tree.node(self.node)?.padding())
    }

    /// Is this node laid out right to left?
    pub fn is_rtl(&self) -> bool {
        self.tree.is_layout_rtl(self.node)
    }

    /// Larger of the minimum width and the background's minimum width.
    pub fn suggested_minimum_width(&self) -> Result<u32> {
        self.tree.suggested_minimum_width(self.node)
    }

    /// Larger of the minimum height and the background's minimum height.
    pub fn suggested_minimum_height(&self) -> Result<u32> {
        self.tree.suggested_minimum_height(self.node)
    }

    /// Record this node's measured size. Sizes may carry state bits.
    pub fn set_measured_dimension(&mut self, width: u32, height: u32) -> Result<()> {
        self.tree.set_measured_dimension(self.node, width, height)
    }

    /// Measure a child against this node's specs, minus padding.
    pub fn measure_child(
        &mut self,
        child: NodeId,
        width: MeasureSpec,
        height: MeasureSpec,
    ) -> Result<()> {
        self.tree.measure_child(self.node, child, width, height)
    }

    /// Measure a child against this node's specs, minus padding, the child's
    /// margins, and space already used.
    pub fn measure_child_with_margins(
        &mut self,
        child: NodeId,
        width: MeasureSpec,
        width_used: u32,
        height: MeasureSpec,
        height_used: u32,
    ) -> Result<()> {
        self.tree
            .measure_child_with_margins(self.node, child, width, width_used, height, height_used)
    }

    /// Measure every child that is not gone.
    pub fn measure_children(&mut self, width: MeasureSpec, height: MeasureSpec) -> Result<()> {
        self.tree.measure_children(self.node, width, height)
    }

    /// Measure a child directly with the given specs.
    pub fn measure(&mut self, child: NodeId, width: MeasureSpec, height: MeasureSpec) -> Result<()> {
        self.tree.measure(child, width, height)
    }

    /// Measured width of a child, without state.
    pub fn measured_width(&self, child: NodeId) -> Result<u32> {
        Ok(self.tree.node(child)?.measured_width())
    }

    /// Measured height of a child, without state.
    pub fn measured_height(&self, child: NodeId) -> Result<u32> {
        Ok(self.tree.node(child)?.measured_height())
    }

    /// Combined measured state of a child.
    pub fn measured_state(&self, child: NodeId) -> Result<u32> {
        Ok(self.tree.node(child)?.measured_state())
    }

    /// Layout parameters of a child, or the defaults.
    pub fn layout_params(&self, child: NodeId) -> Result<LayoutParams> {
        Ok(self.tree.node(child)?.layout_params.unwrap_or_default())
    }

    /// Direction-resolved margins of a child.
    pub fn margins(&self, child: NodeId) -> Result<Margins> {
        Ok(self.layout_params(child)?.margins)
    }

    /// Visibility of a child.
    pub fn visibility(&self, child: NodeId) -> Result<Visibility> {
        Ok(self.tree.node(child)?.visibility())
    }

    /// Place a child at `frame` in this node's coordinates.
    pub fn layout_child(&mut self, child: NodeId, frame: Rect) -> Result<()> {
        self.tree.layout(child, frame)
    }

    /// Request a layout of this node.
    pub fn request_layout(&mut self) -> Result<()> {
        self.tree.request_layout(self.node)
    }

    /// Invalidate all of this node.
    pub fn invalidate(&mut self) -> Result<()> {
        self.tree.invalidate(self.node)
    }
}

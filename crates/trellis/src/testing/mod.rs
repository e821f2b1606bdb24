//! Test support: a canvas that records what it was asked to draw, a
//! stateful drawable, and a behaviour that counts its hook calls.

mod canvas;
mod drawable;
mod probe;

pub use canvas::{CanvasOp, RecordingCanvas};
pub use drawable::{DrawableLog, TestDrawable};
pub use probe::{Probe, ProbeHandle, ProbeLog};

use crate::{
    NodeId, RootOptions, ViewManager, ViewRoot, error::Result, params::LayoutParams,
    widgets::Stack,
};

/// A root of the given size with a [`Stack`] installed as its root view.
pub fn stack_root(w: u32, h: u32) -> Result<(ViewRoot, NodeId)> {
    let mut root = ViewRoot::new(RootOptions::default().with_size(w, h));
    let tree = root.tree_mut()?;
    let stack = tree.create_group(Stack::new());
    tree.set_layout_params(stack, LayoutParams::fill())?;
    root.set_view(stack)?;
    Ok((root, stack))
}

/// Add `child` to `parent` with the given parameters.
pub fn add(root: &mut ViewRoot, parent: NodeId, child: NodeId, params: LayoutParams) -> Result<()> {
    root.tree_mut()?.add_view(parent, child, None, Some(params))
}

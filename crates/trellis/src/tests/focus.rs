use std::sync::{Arc, Mutex};

use crate::{
    DescendantFocusability, FocusManager, NodeId, RootOptions, ViewManager, ViewRoot, Visibility,
    error::Result,
    geom::Point,
    params::{LayoutParams, Margins},
    testing::{Probe, ProbeHandle, RecordingCanvas, add, stack_root},
    widgets::Stack,
};

/// Two side-by-side columns, each holding one focusable probe.
struct Columns {
    /// The root.
    root: ViewRoot,
    /// Root view.
    stack: NodeId,
    /// Left column.
    left: NodeId,
    /// Right column.
    right: NodeId,
    /// Probe in the left column.
    a: NodeId,
    /// Probe in the right column.
    b: NodeId,
    /// Log of `a`.
    a_log: ProbeHandle,
}

fn columns(mut root: ViewRoot, stack: NodeId) -> Result<Columns> {
    let tree = root.tree_mut()?;
    let left = tree.create_group(Stack::new());
    let right = tree.create_group(Stack::new());
    let probe = Probe::new();
    let a_log = probe.handle();
    let a = tree.create_view(probe);
    let b = tree.create_view(Probe::new());
    tree.set_focusable(a, true)?;
    tree.set_focusable(b, true)?;
    add(&mut root, stack, left, LayoutParams::px(50, 100))?;
    add(
        &mut root,
        stack,
        right,
        LayoutParams::px(50, 100).with_margins(Margins::new(50, 0, 0, 0)),
    )?;
    add(&mut root, left, a, LayoutParams::fill())?;
    add(&mut root, right, b, LayoutParams::fill())?;
    root.draw(&mut RecordingCanvas::new(100, 100))?;
    Ok(Columns {
        root,
        stack,
        left,
        right,
        a,
        b,
        a_log,
    })
}

fn setup() -> Result<Columns> {
    let (root, stack) = stack_root(100, 100)?;
    columns(root, stack)
}

#[test]
fn focus_is_exclusive() -> Result<()> {
    let mut c = setup()?;
    let tree = c.root.tree_mut()?;

    assert!(tree.focus(c.a)?);
    assert!(tree.is_focused(c.a));
    assert_eq!(tree.focused_child(c.stack), Some(c.left));
    assert_eq!(tree.focused_child(c.left), Some(c.a));
    assert_eq!(tree.find_focus(c.stack), Some(c.a));

    assert!(tree.focus(c.b)?);
    assert!(!tree.is_focused(c.a));
    assert!(!tree.has_focus(c.left));
    assert_eq!(tree.focused_child(c.left), None);
    assert_eq!(tree.focused_child(c.stack), Some(c.right));
    assert_eq!(tree.find_focus(c.stack), Some(c.b));
    assert_eq!(c.a_log.get().focus_changes, vec![true, false]);
    tree.check_invariants()
}

#[test]
fn focus_listeners_see_every_change() -> Result<()> {
    let mut c = setup()?;
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let tree = c.root.tree_mut()?;
    tree.add_focus_change_listener(Box::new(move |old, new| {
        sink.lock().unwrap().push((old, new));
    }));

    tree.focus(c.a)?;
    tree.focus(c.b)?;
    tree.clear_focus(c.b)?;
    assert_eq!(
        *seen.lock().unwrap(),
        vec![(None, Some(c.a)), (Some(c.a), Some(c.b)), (Some(c.b), None)]
    );
    assert_eq!(tree.find_focus(c.stack), None);
    Ok(())
}

#[test]
fn removing_focused_subtree_clears_the_path() -> Result<()> {
    let mut c = setup()?;
    let tree = c.root.tree_mut()?;
    tree.focus(c.a)?;

    tree.remove_view(c.stack, c.left)?;
    assert!(!tree.contains(c.a));
    assert!(!tree.has_focus(c.stack));
    assert_eq!(tree.focused_child(c.stack), None);
    assert_eq!(c.a_log.get().detached, 1);
    assert_eq!(c.a_log.get().focus_changes, vec![true, false]);
    tree.check_invariants()
}

#[test]
fn hiding_or_disabling_blocks_focus() -> Result<()> {
    let mut c = setup()?;
    let tree = c.root.tree_mut()?;

    tree.set_visibility(c.a, Visibility::Invisible)?;
    assert!(!tree.focus(c.a)?);
    tree.set_visibility(c.a, Visibility::Visible)?;
    tree.set_enabled(c.a, false)?;
    assert!(!tree.focus(c.a)?);
    tree.set_enabled(c.a, true)?;
    assert!(tree.focus(c.a)?);

    tree.set_focusable(c.a, false)?;
    assert!(!tree.is_focused(c.a));
    assert_eq!(tree.focused_child(c.stack), None);
    Ok(())
}

#[test]
fn group_policies() -> Result<()> {
    let mut c = setup()?;
    let tree = c.root.tree_mut()?;
    tree.set_focusable(c.left, true)?;

    // Before: the group takes focus itself.
    assert!(tree.focus(c.left)?);
    assert!(tree.is_focused(c.left));

    // After: a focusable descendant wins.
    tree.set_descendant_focusability(c.left, DescendantFocusability::AfterDescendants)?;
    assert!(tree.focus(c.left)?);
    assert!(tree.is_focused(c.a));
    assert!(!tree.is_focused(c.left));

    // Block: descendants cannot hold focus at all.
    tree.set_descendant_focusability(c.left, DescendantFocusability::BlockDescendants)?;
    assert!(tree.has_ancestor_that_blocks_descendant_focus(c.a));
    assert!(!tree.focus(c.a)?);
    Ok(())
}

#[test]
fn hit_test_finds_deepest_focusable() -> Result<()> {
    let c = setup()?;
    assert_eq!(c.root.hit_deepest_focusable_view(Point::new(10, 10))?, Some(c.a));
    assert_eq!(c.root.hit_deepest_focusable_view(Point::new(60, 90))?, Some(c.b));
    assert_eq!(c.root.hit_deepest_focusable_view(Point::new(100, 10))?, None);
    Ok(())
}

#[test]
fn later_siblings_are_hit_first() -> Result<()> {
    let mut c = setup()?;
    let cover = c.root.tree_mut()?.create_view(Probe::new());
    c.root.tree_mut()?.set_focusable(cover, true)?;
    add(&mut c.root, c.stack, cover, LayoutParams::px(20, 20))?;
    c.root.draw(&mut RecordingCanvas::new(100, 100))?;

    assert_eq!(c.root.hit_deepest_focusable_view(Point::new(5, 5))?, Some(cover));
    assert_eq!(c.root.hit_deepest_focusable_view(Point::new(30, 30))?, Some(c.a));
    Ok(())
}

#[test]
fn touch_mode_requires_focusable_in_touch_mode() -> Result<()> {
    let mut root = ViewRoot::new(
        RootOptions::default()
            .with_size(100, 100)
            .with_touchscreen(true),
    );
    let tree = root.tree_mut()?;
    let stack = tree.create_group(Stack::new());
    tree.set_layout_params(stack, LayoutParams::fill())?;
    root.set_view(stack)?;
    let mut c = columns(root, stack)?;

    c.root.tree_mut()?.focus(c.a)?;
    assert_eq!(c.root.dispatch_pointer_down(Point::new(60, 10))?, None);
    assert!(c.root.tree()?.attach_info().in_touch_mode());
    // Entering touch mode dropped focus from a view that cannot keep it.
    assert!(!c.root.tree()?.is_focused(c.a));

    c.root.tree_mut()?.set_focusable_in_touch_mode(c.b, true)?;
    assert_eq!(c.root.dispatch_pointer_down(Point::new(60, 10))?, Some(c.b));
    assert!(c.root.tree()?.is_focused(c.b));
    Ok(())
}

#[test]
fn pointer_down_focuses_without_touchscreen() -> Result<()> {
    let mut c = setup()?;
    assert_eq!(c.root.dispatch_pointer_down(Point::new(10, 10))?, Some(c.a));
    assert!(c.root.tree()?.is_focused(c.a));
    assert!(!c.root.tree()?.attach_info().in_touch_mode());
    Ok(())
}

#[test]
fn pointer_motion_moves_hover() -> Result<()> {
    let mut c = setup()?;
    assert_eq!(c.root.dispatch_pointer_move(Point::new(10, 10))?, Some(c.a));
    assert!(c.root.tree()?.node(c.a)?.is_hovered());

    assert_eq!(c.root.dispatch_pointer_move(Point::new(60, 10))?, Some(c.b));
    let tree = c.root.tree()?;
    assert!(!tree.node(c.a)?.is_hovered());
    assert!(tree.node(c.b)?.is_hovered());
    Ok(())
}

use crate::{
    NodeId, ViewRoot, Visibility,
    canvas::Color,
    error::Result,
    geom::Rect,
    params::{LayoutParams, Margins},
    testing::{CanvasOp, Probe, ProbeHandle, RecordingCanvas, add, stack_root},
};

/// A drawn 100x100 stack holding two 20x20 probes at (10, 10) and (50, 60).
fn setup() -> Result<(ViewRoot, NodeId, [(NodeId, ProbeHandle); 2])> {
    let (mut root, stack) = stack_root(100, 100)?;
    let mut probes = Vec::new();
    for (color, (x, y)) in [(Color::rgb(255, 0, 0), (10, 10)), (Color::rgb(0, 0, 255), (50, 60))] {
        let probe = Probe::new().with_color(color);
        let h = probe.handle();
        let id = root.tree_mut()?.create_view(probe);
        add(
            &mut root,
            stack,
            id,
            LayoutParams::px(20, 20).with_margins(Margins::new(x, y, 0, 0)),
        )?;
        probes.push((id, h));
    }
    root.draw(&mut RecordingCanvas::new(100, 100))?;
    let [a, b]: [(NodeId, ProbeHandle); 2] = probes
        .try_into()
        .map_err(|_| crate::Error::Invalid("probe count".into()))?;
    Ok((root, stack, [a, b]))
}

#[test]
fn clean_frame_draws_nothing() -> Result<()> {
    let (mut root, _, [(_, a), _]) = setup()?;
    assert!(!root.needs_frame()?);
    assert_eq!(root.dirty_region()?, None);

    let mut canvas = RecordingCanvas::new(100, 100);
    let stats = root.draw(&mut canvas)?;
    assert!(!stats.drew);
    assert_eq!(canvas.frames(), 0);
    assert_eq!(a.draws(), 1);
    Ok(())
}

#[test]
fn partial_damage_clips_the_frame() -> Result<()> {
    let (mut root, _, [(a, _), (_, b_log)]) = setup()?;
    root.tree_mut()?.invalidate_rect(a, Rect::sized(5, 5))?;
    let damage = Rect::new(10, 10, 15, 15)?;
    assert_eq!(root.dirty_region()?, Some(damage));
    assert!(root.needs_frame()?);

    let mut canvas = RecordingCanvas::new(100, 100);
    let stats = root.draw(&mut canvas)?;
    assert_eq!(stats.damage, Some(damage));
    assert!(canvas.ops().contains(&CanvasOp::Clip(damage)));
    // Everything is traversed, but only pixels inside the damage survive.
    assert_eq!(canvas.fills(), vec![(damage, Color::rgb(255, 0, 0))]);
    assert_eq!(b_log.draws(), 2);
    assert_eq!(root.dirty_region()?, None);
    Ok(())
}

#[test]
fn damage_unions_at_the_root() -> Result<()> {
    let (mut root, stack, [(a, _), (b, _)]) = setup()?;
    let tree = root.tree_mut()?;
    tree.invalidate(a)?;
    assert_eq!(tree.node(stack)?.dirty_region(), Some(Rect::new(10, 10, 30, 30)?));
    assert!(!tree.attach_info().ignore_dirty_state());

    tree.invalidate(b)?;
    assert!(tree.attach_info().ignore_dirty_state());
    assert_eq!(root.dirty_region()?, Some(Rect::new(10, 10, 70, 80)?));

    // A union that had to grow is redrawn in full.
    let stats = root.draw(&mut RecordingCanvas::new(100, 100))?;
    assert_eq!(stats.damage, None);
    assert!(stats.drew);
    assert_eq!(root.tree()?.node(stack)?.dirty_region(), None);
    Ok(())
}

#[test]
fn rects_on_one_leaf_union_at_the_root() -> Result<()> {
    let (mut root, stack) = stack_root(100, 100)?;
    let id = root.tree_mut()?.create_view(Probe::new());
    add(&mut root, stack, id, LayoutParams::px(40, 40))?;
    root.draw(&mut RecordingCanvas::new(100, 100))?;

    let tree = root.tree_mut()?;
    tree.invalidate_rect(id, Rect::new(0, 0, 10, 10)?)?;
    tree.invalidate_rect(id, Rect::new(20, 20, 30, 30)?)?;
    assert_eq!(root.dirty_region()?, Some(Rect::new(0, 0, 30, 30)?));
    Ok(())
}

#[test]
fn repeated_invalidation_before_draw_is_absorbed() -> Result<()> {
    let (mut root, stack, [(a, _), _]) = setup()?;
    let tree = root.tree_mut()?;
    tree.invalidate(a)?;
    assert!(tree.node(a)?.is_dirty());
    tree.invalidate(a)?;
    tree.invalidate_rect(a, Rect::sized(3, 3))?;
    assert!(!tree.attach_info().ignore_dirty_state());
    assert_eq!(tree.node(stack)?.dirty_region(), Some(Rect::new(10, 10, 30, 30)?));
    Ok(())
}

#[test]
fn damage_is_clipped_to_the_surface() -> Result<()> {
    let (mut root, stack) = stack_root(100, 100)?;
    let id = root.tree_mut()?.create_view(Probe::new());
    add(
        &mut root,
        stack,
        id,
        LayoutParams::px(20, 20).with_margins(Margins::new(90, 90, 0, 0)),
    )?;
    root.draw(&mut RecordingCanvas::new(100, 100))?;
    assert_eq!(root.tree()?.node(id)?.frame(), Rect::new(90, 90, 110, 110)?);

    root.tree_mut()?.invalidate(id)?;
    assert_eq!(root.dirty_region()?, Some(Rect::new(90, 90, 100, 100)?));
    Ok(())
}

#[test]
fn offsetting_damages_old_and_new_area() -> Result<()> {
    let (mut root, _, [(a, _), _]) = setup()?;
    root.tree_mut()?.offset_top_and_bottom(a, 5)?;
    assert_eq!(root.tree()?.node(a)?.frame(), Rect::new(10, 15, 30, 35)?);
    assert_eq!(root.dirty_region()?, Some(Rect::new(10, 10, 30, 35)?));
    Ok(())
}

#[test]
fn hidden_views_and_windows_skip_invalidation() -> Result<()> {
    let (mut root, _, [(a, a_log), (b, _)]) = setup()?;

    root.set_window_visible(false)?;
    root.tree_mut()?.invalidate(b)?;
    assert_eq!(root.dirty_region()?, None);
    let stats = root.draw(&mut RecordingCanvas::new(100, 100))?;
    assert!(!stats.drew);

    root.set_window_visible(true)?;
    assert!(root.needs_frame()?);
    let stats = root.draw(&mut RecordingCanvas::new(100, 100))?;
    assert!(stats.drew);
    assert_eq!(stats.damage, None);
    assert_eq!(a_log.draws(), 2);

    // Hiding damages the area the view covered, then it stops drawing.
    root.tree_mut()?.set_visibility(a, Visibility::Invisible)?;
    assert_eq!(root.dirty_region()?, Some(Rect::new(10, 10, 30, 30)?));
    root.tree_mut()?.invalidate(a)?;
    assert_eq!(root.dirty_region()?, Some(Rect::new(10, 10, 30, 30)?));
    root.draw(&mut RecordingCanvas::new(100, 100))?;
    assert_eq!(a_log.draws(), 2);
    Ok(())
}

#[test]
fn draw_again_schedules_another_frame() -> Result<()> {
    let (mut root, stack) = stack_root(50, 50)?;
    let probe = Probe::new().draw_again(1);
    let h = probe.handle();
    let id = root.tree_mut()?.create_view(probe);
    add(&mut root, stack, id, LayoutParams::px(10, 10))?;

    let mut canvas = RecordingCanvas::new(50, 50);
    root.draw(&mut canvas)?;
    assert!(root.needs_frame()?);
    assert_eq!(root.dirty_region()?, Some(Rect::sized(50, 50)));

    root.draw(&mut canvas)?;
    assert_eq!(h.draws(), 2);
    assert!(!root.needs_frame()?);
    Ok(())
}

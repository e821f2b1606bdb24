//! Integration tests for building, laying out and editing a view hierarchy
//! through the public API.

#[cfg(test)]
mod tests {
    use trellis::{
        DrawOutcome, Error, LayoutDirection, NodeId, ResolvedDirection, RootOptions,
        ViewBehavior, ViewContext, ViewManager, ViewRoot, Visibility,
        canvas::{Canvas, ClipStack, Color},
        error::Result,
        geom::{Insets, Rect},
        measure_spec::{MeasureSpec, resolve_size},
        params::{LayoutParams, Margins},
        widgets::{Leaf, Linear, Stack},
    };

    /// A canvas that only counts fills.
    struct CountingCanvas {
        /// Clip state.
        clips: ClipStack,
        /// Full surface.
        surface: Rect,
        /// Fills that survived the clip.
        fills: usize,
    }

    impl CountingCanvas {
        fn new(w: u32, h: u32) -> Self {
            let surface = Rect::sized(w, h);
            Self {
                clips: ClipStack::new(surface),
                surface,
                fills: 0,
            }
        }
    }

    impl Canvas for CountingCanvas {
        fn begin(&mut self) -> Result<()> {
            self.clips.reset(self.surface);
            Ok(())
        }

        fn end(&mut self) -> Result<()> {
            Ok(())
        }

        fn save(&mut self) -> usize {
            self.clips.save()
        }

        fn restore_to_count(&mut self, count: usize) -> Result<()> {
            self.clips.restore_to_count(count)
        }

        fn clip_rect(&mut self, rect: Rect) -> bool {
            self.clips.clip(rect)
        }

        fn clip_bounds(&self) -> Rect {
            self.clips.current()
        }

        fn fill_rect(&mut self, rect: Rect, _color: Color) -> Result<()> {
            if rect.intersect(&self.clips.current()).is_some() {
                self.fills += 1;
            }
            Ok(())
        }
    }

    /// One line of text, a cell per character.
    struct Label {
        /// Displayed text.
        text: String,
    }

    impl Label {
        fn new(text: &str) -> Self {
            Self {
                text: text.to_string(),
            }
        }
    }

    impl ViewBehavior for Label {
        fn on_measure(
            &mut self,
            ctx: &mut ViewContext<'_>,
            width: MeasureSpec,
            height: MeasureSpec,
        ) -> Result<()> {
            let pad = ctx.padding()?;
            let w = self.text.chars().count() as u32 + pad.horizontal();
            let h = 1 + pad.vertical();
            ctx.set_measured_dimension(resolve_size(w, width), resolve_size(h, height))
        }

        fn on_draw(&mut self, canvas: &mut dyn Canvas, bounds: Rect) -> Result<DrawOutcome> {
            canvas.fill_rect(bounds, Color::WHITE)?;
            Ok(DrawOutcome::Done)
        }
    }

    fn logging() {
        // Several tests share the binary; only the first install wins.
        tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::TRACE)
            .try_init()
            .ok();
    }

    /// A root whose root view is a filling group with the given behaviour.
    fn root_with(
        behavior: impl ViewBehavior,
        options: RootOptions,
    ) -> Result<(ViewRoot, NodeId)> {
        logging();
        let mut root = ViewRoot::new(options);
        let tree = root.tree_mut()?;
        let group = tree.create_group(behavior);
        tree.set_layout_params(group, LayoutParams::fill())?;
        root.set_view(group)?;
        Ok((root, group))
    }

    fn label(root: &mut ViewRoot, parent: NodeId, text: &str, params: LayoutParams) -> Result<NodeId> {
        let tree = root.tree_mut()?;
        let id = tree.create_view(Label::new(text));
        tree.add_view(parent, id, None, Some(params))?;
        Ok(id)
    }

    #[test]
    fn linear_places_children_in_sequence() -> Result<()> {
        let (mut root, col) =
            root_with(Linear::vertical(), RootOptions::default().with_size(40, 30))?;
        let a = label(&mut root, col, "abc", LayoutParams::wrap())?;
        let gone = label(&mut root, col, "gone", LayoutParams::wrap())?;
        let b = label(
            &mut root,
            col,
            "hello",
            LayoutParams::wrap().with_margins(Margins::new(1, 2, 0, 0)),
        )?;
        root.tree_mut()?.set_visibility(gone, Visibility::Gone)?;

        let mut canvas = CountingCanvas::new(40, 30);
        root.draw(&mut canvas)?;
        let tree = root.tree()?;
        assert_eq!(tree.node(a)?.frame(), Rect::new(0, 0, 3, 1)?);
        assert_eq!(tree.node(b)?.frame(), Rect::new(1, 3, 6, 4)?);
        assert!(!tree.node(gone)?.is_laid_out());
        assert_eq!(canvas.fills, 2);
        tree.check_invariants()
    }

    #[test]
    fn horizontal_linear_follows_direction() -> Result<()> {
        let (mut root, row) = root_with(
            Linear::horizontal(),
            RootOptions::default()
                .with_size(40, 10)
                .with_locale_direction(ResolvedDirection::Rtl),
        )?;
        let a = label(&mut root, row, "ab", LayoutParams::wrap())?;
        let b = label(&mut root, row, "cde", LayoutParams::wrap())?;

        let mut canvas = CountingCanvas::new(40, 10);
        root.draw(&mut canvas)?;
        {
            let tree = root.tree()?;
            assert!(tree.is_layout_rtl(row));
            assert_eq!(tree.node(a)?.frame(), Rect::new(38, 0, 40, 1)?);
            assert_eq!(tree.node(b)?.frame(), Rect::new(35, 0, 38, 1)?);
        }

        root.tree_mut()?.set_layout_direction(row, LayoutDirection::Ltr)?;
        root.draw(&mut canvas)?;
        let tree = root.tree()?;
        assert!(!tree.is_layout_rtl(row));
        assert_eq!(tree.node(a)?.frame(), Rect::new(0, 0, 2, 1)?);
        assert_eq!(tree.node(b)?.frame(), Rect::new(2, 0, 5, 1)?);
        Ok(())
    }

    #[test]
    fn padding_relative_resolves_with_direction() -> Result<()> {
        let (mut root, stack) = root_with(
            Stack::new(),
            RootOptions::default()
                .with_size(20, 20)
                .with_locale_direction(ResolvedDirection::Rtl),
        )?;
        root.tree_mut()?.set_padding_relative(stack, 3, 0, 1, 0)?;
        let a = label(&mut root, stack, "x", LayoutParams::wrap())?;
        root.draw(&mut CountingCanvas::new(20, 20))?;

        let tree = root.tree()?;
        assert_eq!(tree.node(stack)?.padding(), Insets::new(1, 0, 3, 0));
        // Start is the right edge.
        assert_eq!(tree.node(a)?.frame(), Rect::new(16, 0, 17, 1)?);
        Ok(())
    }

    #[test]
    fn structural_errors_leave_the_tree_untouched() -> Result<()> {
        let (mut root, stack) = root_with(Stack::new(), RootOptions::default().with_size(10, 10))?;
        let tree = root.tree_mut()?;
        let g1 = tree.create_group(Stack::new());
        let g2 = tree.create_group(Stack::new());
        let leaf = tree.create_view(Leaf);
        tree.add_view(stack, g1, None, None)?;
        tree.add_view(g1, leaf, None, None)?;

        assert!(matches!(
            tree.add_view(g2, leaf, None, None),
            Err(Error::AlreadyHasParent { .. })
        ));
        assert_eq!(tree.child_count(g2), 0);
        assert_eq!(tree.parent(leaf), Some(g1));

        assert!(matches!(
            tree.add_view(g1, stack, None, None),
            Err(Error::AlreadyHasParent { .. })
        ));
        let g3 = tree.create_group(Stack::new());
        tree.add_view(g2, g3, None, None)?;
        assert!(matches!(
            tree.add_view(g3, g2, None, None),
            Err(Error::WouldCreateCycle { .. })
        ));
        assert!(matches!(
            tree.add_view(leaf, g2, None, None),
            Err(Error::NotAGroup(_))
        ));
        assert!(matches!(
            tree.add_view(stack, g2, Some(5), None),
            Err(Error::Invalid(_))
        ));
        assert!(matches!(
            tree.detach_view(g2, leaf),
            Err(Error::NotAChild { .. })
        ));
        assert!(matches!(tree.remove_view_at(g1, 3), Err(Error::Invalid(_))));
        assert_eq!(tree.children(stack), &[g1]);
        tree.check_invariants()
    }

    #[test]
    fn detached_views_can_be_reattached() -> Result<()> {
        let (mut root, stack) = root_with(Stack::new(), RootOptions::default().with_size(10, 10))?;
        let a = label(&mut root, stack, "abc", LayoutParams::wrap())?;
        let tree = root.tree_mut()?;
        let other = tree.create_group(Stack::new());
        tree.add_view(stack, other, None, None)?;

        tree.detach_view(stack, a)?;
        assert!(tree.contains(a));
        assert!(!tree.is_attached(a));
        assert_eq!(tree.parent(a), None);

        tree.add_view(other, a, Some(0), None)?;
        assert!(tree.is_attached(a));
        assert_eq!(tree.index_of_child(other, a), Some(0));
        assert!(tree.is_ancestor(stack, a));

        tree.remove_all_views(stack)?;
        assert!(!tree.contains(a));
        assert!(!tree.contains(other));
        assert_eq!(tree.len(), 1);
        Ok(())
    }

    #[test]
    fn replacing_the_root_view_detaches_the_old_one() -> Result<()> {
        let (mut root, old) = root_with(Stack::new(), RootOptions::default().with_size(10, 10))?;
        let a = label(&mut root, old, "a", LayoutParams::wrap())?;
        root.draw(&mut CountingCanvas::new(10, 10))?;

        let new = root.tree_mut()?.create_group(Linear::vertical());
        root.set_view(new)?;
        assert_eq!(root.view()?, Some(new));
        let tree = root.tree()?;
        assert!(!tree.is_attached(old));
        assert!(!tree.is_attached(a));
        assert!(tree.is_attached(new));
        assert!(matches!(root.set_view(a), Err(Error::AlreadyHasParent { .. })));
        Ok(())
    }

    #[test]
    fn behaviours_are_reachable_by_type() -> Result<()> {
        let (mut root, stack) = root_with(Stack::new(), RootOptions::default().with_size(20, 5))?;
        let a = label(&mut root, stack, "abc", LayoutParams::wrap())?;
        root.tree_mut()?.set_id(a, 42)?;
        root.draw(&mut CountingCanvas::new(20, 5))?;

        let tree = root.tree_mut()?;
        assert_eq!(tree.find_view_by_id(stack, 42), Some(a));
        assert!(tree.behavior::<Stack>(a).is_none());
        assert_eq!(tree.node(a)?.name(), "Label");
        if let Some(l) = tree.behavior_mut::<Label>(a) {
            l.text = "abcdefg".into();
        }
        tree.request_layout(a)?;
        root.draw(&mut CountingCanvas::new(20, 5))?;
        assert_eq!(root.tree()?.node(a)?.frame(), Rect::new(0, 0, 7, 1)?);
        Ok(())
    }
}

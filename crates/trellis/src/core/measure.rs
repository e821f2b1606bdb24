use crate::{
    core::{
        flags::{PrivateFlags, Visibility},
        id::NodeId,
        tree::ViewTree,
    },
    error::{Error, Result},
    measure_spec::{MeasureSpec, Mode, get_child_measure_spec},
};

impl ViewTree {
    /// Measure a view against the given constraints.
    ///
    /// `on_measure` runs when a layout was forced, the view was invalidated,
    /// or the constraints changed in a way that could change the result.
    /// Otherwise the previous result stands, or a cached result for the same
    /// constraints is reused.
    pub fn measure(&mut self, id: NodeId, width: MeasureSpec, height: MeasureSpec) -> Result<()> {
        let node = self.node(id)?;
        let force = node
            .private
            .intersects(PrivateFlags::FORCE_LAYOUT | PrivateFlags::REMEASURE);
        let spec_changed =
            node.old_width_spec != Some(width) || node.old_height_spec != Some(height);
        let exactly = width.mode() == Mode::Exactly && height.mode() == Mode::Exactly;
        let matches_size =
            node.measured_width() == width.size() && node.measured_height() == height.size();
        let needs_layout = spec_changed && (!exactly || !matches_size);
        let key = (width, height);

        if force || needs_layout {
            self.node_mut(id)?
                .private
                .remove(PrivateFlags::MEASURED_DIMENSION_SET | PrivateFlags::REMEASURE);
            self.resolve_rtl_properties_if_needed(id)?;

            let node = self.node_mut(id)?;
            let cached = if force {
                node.measure_cache.clear();
                None
            } else {
                node.measure_cache.get(&key).copied()
            };
            match cached {
                Some((w, h)) => {
                    tracing::trace!("measure cache hit for {id:?} at {width} x {height}");
                    node.measured_width = w;
                    node.measured_height = h;
                    node.private.insert(
                        PrivateFlags::MEASURED_DIMENSION_SET
                            | PrivateFlags::MEASURE_NEEDED_BEFORE_LAYOUT,
                    );
                }
                None => {
                    self.on_measure(id, width, height)?;
                    self.node_mut(id)?
                        .private
                        .remove(PrivateFlags::MEASURE_NEEDED_BEFORE_LAYOUT);
                }
            }

            let node = self.node_mut(id)?;
            if !node.private.contains(PrivateFlags::MEASURED_DIMENSION_SET) {
                return Err(Error::MeasuredDimensionNotSet(id));
            }
            node.private.insert(PrivateFlags::LAYOUT_REQUIRED);
        }

        let node = self.node_mut(id)?;
        node.old_width_spec = Some(width);
        node.old_height_spec = Some(height);
        let measured = (node.measured_width, node.measured_height);
        node.measure_cache.insert(key, measured);
        Ok(())
    }

    /// Run the behaviour's measure hook.
    pub(crate) fn on_measure(&mut self, id: NodeId, width: MeasureSpec, height: MeasureSpec) -> Result<()> {
        tracing::trace!("on_measure {id:?} {width} x {height}");
        self.with_behavior(id, |b, ctx| b.on_measure(ctx, width, height))?
    }

    /// Record a view's measured size. Sizes may carry state bits.
    pub fn set_measured_dimension(&mut self, id: NodeId, width: u32, height: u32) -> Result<()> {
        let node = self.node_mut(id)?;
        node.measured_width = width;
        node.measured_height = height;
        node.private.insert(PrivateFlags::MEASURED_DIMENSION_SET);
        Ok(())
    }

    /// The larger of a view's minimum width and its background's.
    pub fn suggested_minimum_width(&self, id: NodeId) -> Result<u32> {
        let node = self.node(id)?;
        let bg = node.background.as_ref().map_or(0, |b| b.minimum_width());
        Ok(node.min_width.max(bg))
    }

    /// The larger of a view's minimum height and its background's.
    pub fn suggested_minimum_height(&self, id: NodeId) -> Result<u32> {
        let node = self.node(id)?;
        let bg = node.background.as_ref().map_or(0, |b| b.minimum_height());
        Ok(node.min_height.max(bg))
    }

    /// Measure `child` against `parent`'s constraints minus its padding.
    pub fn measure_child(
        &mut self,
        parent: NodeId,
        child: NodeId,
        width: MeasureSpec,
        height: MeasureSpec,
    ) -> Result<()> {
        let padding = self.node(parent)?.padding();
        let lp = self.node(child)?.layout_params.unwrap_or_default();
        let w = get_child_measure_spec(width, padding.horizontal() as i32, lp.width);
        let h = get_child_measure_spec(height, padding.vertical() as i32, lp.height);
        self.measure(child, w, h)
    }

    /// Measure `child` against `parent`'s constraints minus padding, the
    /// child's margins, and space already used along each axis.
    pub fn measure_child_with_margins(
        &mut self,
        parent: NodeId,
        child: NodeId,
        width: MeasureSpec,
        width_used: u32,
        height: MeasureSpec,
        height_used: u32,
    ) -> Result<()> {
        let padding = self.node(parent)?.padding();
        self.resolve_rtl_properties_if_needed(child)?;
        let lp = self.node(child)?.layout_params.unwrap_or_default();
        let m = lp.margins;
        let w = get_child_measure_spec(
            width,
            padding.horizontal() as i32 + m.horizontal() + width_used as i32,
            lp.width,
        );
        let h = get_child_measure_spec(
            height,
            padding.vertical() as i32 + m.vertical() + height_used as i32,
            lp.height,
        );
        self.measure(child, w, h)
    }

    /// Measure every child of `parent` that is not gone.
    pub fn measure_children(
        &mut self,
        parent: NodeId,
        width: MeasureSpec,
        height: MeasureSpec,
    ) -> Result<()> {
        for child in self.group(parent)?.children.clone() {
            if self.node(child)?.visibility != Visibility::Gone {
                self.measure_child(parent, child, width, height)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;
    use crate::{
        core::{behavior::ViewBehavior, context::ViewContext, root::RootOptions},
        measure_spec::MEASURED_STATE_TOO_SMALL,
    };

    struct Counting {
        calls: Arc<AtomicUsize>,
    }

    impl ViewBehavior for Counting {
        fn on_measure(
            &mut self,
            ctx: &mut ViewContext<'_>,
            width: MeasureSpec,
            height: MeasureSpec,
        ) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            ctx.set_measured_dimension(width.size(), height.size())
        }
    }

    struct Forgetful;

    impl ViewBehavior for Forgetful {
        fn on_measure(
            &mut self,
            _ctx: &mut ViewContext<'_>,
            _width: MeasureSpec,
            _height: MeasureSpec,
        ) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn cache_and_reuse() -> Result<()> {
        let mut t = ViewTree::new(&RootOptions::default());
        let calls = Arc::new(AtomicUsize::new(0));
        let v = t.create_view(Counting {
            calls: calls.clone(),
        });
        let (w, h) = (MeasureSpec::exactly(400), MeasureSpec::exactly(300));
        t.measure(v, w, h)?;
        t.measure(v, w, h)?;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let small = MeasureSpec::at_most(100);
        t.measure(v, small, small)?;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        // Back to a cached pair: served without a call.
        t.measure(v, w, h)?;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(t.node(v)?.measured_width(), 400);

        t.request_layout(v)?;
        t.measure(v, w, h)?;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        Ok(())
    }

    #[test]
    fn invalidate_defeats_the_cache() -> Result<()> {
        let mut t = ViewTree::new(&RootOptions::default());
        let calls = Arc::new(AtomicUsize::new(0));
        let v = t.create_view(Counting {
            calls: calls.clone(),
        });
        let (w, h) = (MeasureSpec::exactly(400), MeasureSpec::exactly(300));
        t.measure(v, w, h)?;
        t.measure(v, w, h)?;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        t.invalidate(v)?;
        t.measure(v, w, h)?;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        t.measure(v, w, h)?;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        Ok(())
    }

    #[test]
    fn missing_dimension_is_an_error() {
        let mut t = ViewTree::new(&RootOptions::default());
        let v = t.create_view(Forgetful);
        let s = MeasureSpec::exactly(10);
        assert_eq!(t.measure(v, s, s), Err(Error::MeasuredDimensionNotSet(v)));
    }

    #[test]
    fn default_measure_uses_minimums() -> Result<()> {
        let mut t = ViewTree::new(&RootOptions::default());
        let v = t.create_view(crate::widgets::Leaf);
        t.set_minimum_width(v, 30)?;
        t.set_minimum_height(v, 12)?;
        t.measure(v, MeasureSpec::unspecified(), MeasureSpec::at_most(5))?;
        let n = t.node(v)?;
        assert_eq!((n.measured_width(), n.measured_height()), (30, 5));
        assert_eq!(n.measured_height_and_state() & MEASURED_STATE_TOO_SMALL, 0);
        Ok(())
    }
}

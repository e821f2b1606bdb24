use super::span;
use crate::{
    core::{ViewBehavior, ViewContext, Visibility},
    error::Result,
    geom::{Expanse, Point, Rect},
    measure_spec::{
        MEASURED_HEIGHT_STATE_SHIFT, MEASURED_SIZE_MASK, MeasureSpec, Mode,
        combine_measured_states, get_child_measure_spec, resolve_size_and_state,
    },
    params::Dimension,
};

/// A group that stacks its children on top of each other, each placed at the
/// start and top edges of the padded content area. Later children draw over
/// earlier ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stack {
    /// Measure gone children too, so the stack keeps their size.
    measure_all: bool,
}

impl Stack {
    /// Construct a stack that skips gone children.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: include gone children when measuring.
    pub fn measure_all_children(mut self, measure_all: bool) -> Self {
        self.measure_all = measure_all;
        self
    }
}

impl ViewBehavior for Stack {
    fn on_measure(
        &mut self,
        ctx: &mut ViewContext<'_>,
        width: MeasureSpec,
        height: MeasureSpec,
    ) -> Result<()> {
        let exact = width.mode() == Mode::Exactly && height.mode() == Mode::Exactly;
        let (mut max_w, mut max_h, mut state) = (0, 0, 0);
        let mut match_parent = Vec::new();

        for child in ctx.children() {
            if !self.measure_all && ctx.visibility(child)? == Visibility::Gone {
                continue;
            }
            ctx.measure_child_with_margins(child, width, 0, height, 0)?;
            let m = ctx.margins(child)?;
            max_w = max_w.max(span(ctx.measured_width(child)?, m.horizontal()));
            max_h = max_h.max(span(ctx.measured_height(child)?, m.vertical()));
            state = combine_measured_states(state, ctx.measured_state(child)?);
            let lp = ctx.layout_params(child)?;
            if !exact && (lp.width == Dimension::MatchParent || lp.height == Dimension::MatchParent)
            {
                match_parent.push(child);
            }
        }

        let pad = ctx.padding()?;
        let max_w = (max_w + pad.horizontal()).max(ctx.suggested_minimum_width()?);
        let max_h = (max_h + pad.vertical()).max(ctx.suggested_minimum_height()?);
        let mw = resolve_size_and_state(max_w, width, state);
        let mh = resolve_size_and_state(max_h, height, state << MEASURED_HEIGHT_STATE_SHIFT);
        ctx.set_measured_dimension(mw, mh)?;

        // Children that match an inexact parent were measured against the
        // parent's bound; now that our size is known, give them exactly it.
        if match_parent.len() > 1 {
            let (own_w, own_h) = (mw & MEASURED_SIZE_MASK, mh & MEASURED_SIZE_MASK);
            for child in match_parent {
                let lp = ctx.layout_params(child)?;
                let m = lp.margins;
                let cw = match lp.width {
                    Dimension::MatchParent => MeasureSpec::exactly(span(
                        own_w,
                        -(pad.horizontal() as i32) - m.horizontal(),
                    )),
                    other => {
                        get_child_measure_spec(width, pad.horizontal() as i32 + m.horizontal(), other)
                    }
                };
                let ch = match lp.height {
                    Dimension::MatchParent => MeasureSpec::exactly(span(
                        own_h,
                        -(pad.vertical() as i32) - m.vertical(),
                    )),
                    other => {
                        get_child_measure_spec(height, pad.vertical() as i32 + m.vertical(), other)
                    }
                };
                ctx.measure(child, cw, ch)?;
            }
        }
        Ok(())
    }

    fn on_layout(&mut self, ctx: &mut ViewContext<'_>, _changed: bool, frame: Rect) -> Result<()> {
        let pad = ctx.padding()?;
        let rtl = ctx.is_rtl();
        let width = frame.width() as i32;
        for child in ctx.children() {
            if ctx.visibility(child)? == Visibility::Gone {
                continue;
            }
            let size = Expanse::new(ctx.measured_width(child)?, ctx.measured_height(child)?);
            let m = ctx.margins(child)?;
            let left = if rtl {
                width - pad.right as i32 - m.right() - size.w as i32
            } else {
                pad.left as i32 + m.left()
            };
            let top = pad.top as i32 + m.top();
            ctx.layout_child(child, Rect::at(Point::new(left, top), size))?;
        }
        Ok(())
    }
}

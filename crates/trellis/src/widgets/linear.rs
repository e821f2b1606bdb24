use super::span;
use crate::{
    core::{ViewBehavior, ViewContext, Visibility},
    error::Result,
    geom::{Expanse, Point, Rect},
    measure_spec::{
        MEASURED_HEIGHT_STATE_SHIFT, MeasureSpec, combine_measured_states,
        resolve_size_and_state,
    },
};

/// Axis along which a [`Linear`] group places its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Children side by side, from the start edge.
    Horizontal,
    /// Children top to bottom.
    #[default]
    Vertical,
}

/// A group that places its children one after another along an axis. Each
/// child is measured against the space its predecessors left over.
#[derive(Debug, Clone, Copy, Default)]
pub struct Linear {
    /// Main axis.
    orientation: Orientation,
}

impl Linear {
    /// A vertical group.
    pub fn vertical() -> Self {
        Self {
            orientation: Orientation::Vertical,
        }
    }

    /// A horizontal group.
    pub fn horizontal() -> Self {
        Self {
            orientation: Orientation::Horizontal,
        }
    }

    /// Main axis.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }
}

impl ViewBehavior for Linear {
    fn on_measure(
        &mut self,
        ctx: &mut ViewContext<'_>,
        width: MeasureSpec,
        height: MeasureSpec,
    ) -> Result<()> {
        let (mut main, mut cross, mut state) = (0u32, 0u32, 0u32);
        for child in ctx.children() {
            if ctx.visibility(child)? == Visibility::Gone {
                continue;
            }
            match self.orientation {
                Orientation::Vertical => {
                    ctx.measure_child_with_margins(child, width, 0, height, main)?;
                    let m = ctx.margins(child)?;
                    main = main.saturating_add(span(ctx.measured_height(child)?, m.vertical()));
                    cross = cross.max(span(ctx.measured_width(child)?, m.horizontal()));
                }
                Orientation::Horizontal => {
                    ctx.measure_child_with_margins(child, width, main, height, 0)?;
                    let m = ctx.margins(child)?;
                    main = main.saturating_add(span(ctx.measured_width(child)?, m.horizontal()));
                    cross = cross.max(span(ctx.measured_height(child)?, m.vertical()));
                }
            }
            state = combine_measured_states(state, ctx.measured_state(child)?);
        }

        let pad = ctx.padding()?;
        let (w, h) = match self.orientation {
            Orientation::Vertical => (cross, main),
            Orientation::Horizontal => (main, cross),
        };
        let w = (w + pad.horizontal()).max(ctx.suggested_minimum_width()?);
        let h = (h + pad.vertical()).max(ctx.suggested_minimum_height()?);
        ctx.set_measured_dimension(
            resolve_size_and_state(w, width, state),
            resolve_size_and_state(h, height, state << MEASURED_HEIGHT_STATE_SHIFT),
        )
    }

    fn on_layout(&mut self, ctx: &mut ViewContext<'_>, _changed: bool, frame: Rect) -> Result<()> {
        let pad = ctx.padding()?;
        let rtl = ctx.is_rtl();
        let width = frame.width() as i32;
        // Running edge along the main axis: top for vertical, and for
        // horizontal the start edge, which is the right edge in RTL.
        let mut cursor = match (self.orientation, rtl) {
            (Orientation::Vertical, _) => pad.top as i32,
            (Orientation::Horizontal, false) => pad.left as i32,
            (Orientation::Horizontal, true) => width - pad.right as i32,
        };
        for child in ctx.children() {
            if ctx.visibility(child)? == Visibility::Gone {
                continue;
            }
            let size = Expanse::new(ctx.measured_width(child)?, ctx.measured_height(child)?);
            let m = ctx.margins(child)?;
            let origin = match (self.orientation, rtl) {
                (Orientation::Vertical, _) => {
                    let top = cursor + m.top();
                    cursor = top + size.h as i32 + m.bottom();
                    let left = if rtl {
                        width - pad.right as i32 - m.right() - size.w as i32
                    } else {
                        pad.left as i32 + m.left()
                    };
                    Point::new(left, top)
                }
                (Orientation::Horizontal, false) => {
                    let left = cursor + m.left();
                    cursor = left + size.w as i32 + m.right();
                    Point::new(left, pad.top as i32 + m.top())
                }
                (Orientation::Horizontal, true) => {
                    let left = cursor - m.right() - size.w as i32;
                    cursor = left - m.left();
                    Point::new(left, pad.top as i32 + m.top())
                }
            };
            ctx.layout_child(child, Rect::at(origin, size))?;
        }
        Ok(())
    }
}

use crate::{
    canvas::{Canvas, ClipStack, Color},
    error::Result,
    geom::Rect,
};

/// One call made on a [`RecordingCanvas`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasOp {
    /// A frame started.
    Begin,
    /// A frame ended.
    End,
    /// Save, with the count it returned.
    Save(usize),
    /// Restore to a count.
    Restore(usize),
    /// Clip request.
    Clip(Rect),
    /// A fill, recorded as the part that survived the clip.
    Fill(Rect, Color),
}

/// A canvas that records every call instead of drawing.
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    /// Full surface.
    surface: Rect,
    /// Clip state.
    clips: ClipStack,
    /// Calls since the last [`RecordingCanvas::clear`].
    ops: Vec<CanvasOp>,
    /// Frames begun.
    frames: usize,
}

impl RecordingCanvas {
    /// A canvas for a surface of the given size.
    pub fn new(w: u32, h: u32) -> Self {
        let surface = Rect::sized(w, h);
        Self {
            surface,
            clips: ClipStack::new(surface),
            ops: Vec::new(),
            frames: 0,
        }
    }

    /// Calls recorded so far.
    pub fn ops(&self) -> &[CanvasOp] {
        &self.ops
    }

    /// Visible fills recorded so far.
    pub fn fills(&self) -> Vec<(Rect, Color)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                CanvasOp::Fill(r, c) => Some((*r, *c)),
                _ => None,
            })
            .collect()
    }

    /// Number of frames begun.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Current save count.
    pub fn save_count(&self) -> usize {
        self.clips.count()
    }

    /// Forget recorded calls.
    pub fn clear(&mut self) {
        self.ops.clear();
    }
}

impl Canvas for RecordingCanvas {
    fn begin(&mut self) -> Result<()> {
        self.clips.reset(self.surface);
        self.frames += 1;
        self.ops.push(CanvasOp::Begin);
        Ok(())
    }

    fn end(&mut self) -> Result<()> {
        self.ops.push(CanvasOp::End);
        Ok(())
    }

    fn save(&mut self) -> usize {
        let count = self.clips.save();
        self.ops.push(CanvasOp::Save(count));
        count
    }

    fn restore_to_count(&mut self, count: usize) -> Result<()> {
        self.clips.restore_to_count(count)?;
        self.ops.push(CanvasOp::Restore(count));
        Ok(())
    }

    fn clip_rect(&mut self, rect: Rect) -> bool {
        self.ops.push(CanvasOp::Clip(rect));
        self.clips.clip(rect)
    }

    fn clip_bounds(&self) -> Rect {
        self.clips.current()
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<()> {
        if let Some(visible) = rect.intersect(&self.clips.current()) {
            self.ops.push(CanvasOp::Fill(visible, color));
        }
        Ok(())
    }
}

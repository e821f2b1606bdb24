//! The drawing surface the tree renders into.
//!
//! All coordinates passed to a canvas are absolute surface coordinates; the
//! tree resolves view offsets and scroll before calling in.

use crate::{
    error::{Error, Result},
    geom::Rect,
};

/// An ARGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color(pub u32);

impl Color {
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self(0);
    /// Opaque black.
    pub const BLACK: Self = Self(0xff00_0000);
    /// Opaque white.
    pub const WHITE: Self = Self(0xffff_ffff);

    /// Build an opaque colour from components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self(0xff00_0000 | ((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Alpha channel.
    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }
}

/// A surface with a save/restore clip stack.
pub trait Canvas {
    /// Start a frame.
    fn begin(&mut self) -> Result<()>;

    /// Finish a frame and present it.
    fn end(&mut self) -> Result<()>;

    /// Push the current clip. Returns the save count before the push, to be
    /// handed back to [`Canvas::restore_to_count`].
    fn save(&mut self) -> usize;

    /// Pop saved states until the save count equals `count`. Fails if `count`
    /// was never reached.
    fn restore_to_count(&mut self, count: usize) -> Result<()>;

    /// Intersect the current clip with `rect`. Returns false when the
    /// resulting clip is empty.
    fn clip_rect(&mut self, rect: Rect) -> bool;

    /// The current clip.
    fn clip_bounds(&self) -> Rect;

    /// Fill a rectangle, honouring the current clip.
    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<()>;
}

/// A save/restore stack of clip rectangles, for canvas implementations to
/// embed.
///
/// The stack is never empty: the base entry is the full surface. Save counts
/// start at 1, so the first `save` returns 1.
#[derive(Debug, Clone)]
pub struct ClipStack {
    /// Saved clips; the last entry is the current clip.
    stack: Vec<Rect>,
}

impl ClipStack {
    /// A stack whose base clip is `surface`.
    pub fn new(surface: Rect) -> Self {
        Self {
            stack: vec![surface],
        }
    }

    /// Reset to a single base clip.
    pub fn reset(&mut self, surface: Rect) {
        self.stack.clear();
        self.stack.push(surface);
    }

    /// Current save count.
    pub fn count(&self) -> usize {
        self.stack.len()
    }

    /// The current clip.
    pub fn current(&self) -> Rect {
        self.stack.last().copied().unwrap_or_default()
    }

    /// Push a copy of the current clip.
    pub fn save(&mut self) -> usize {
        let count = self.count();
        self.stack.push(self.current());
        count
    }

    /// Pop until the count equals `count`.
    pub fn restore_to_count(&mut self, count: usize) -> Result<()> {
        let depth = self.count();
        if count < 1 || count > depth {
            return Err(Error::InvalidSaveCount {
                requested: count,
                depth,
            });
        }
        self.stack.truncate(count);
        Ok(())
    }

    /// Narrow the current clip. Returns false if nothing is left.
    pub fn clip(&mut self, rect: Rect) -> bool {
        let next = self.current().intersect(&rect).unwrap_or_default();
        if let Some(top) = self.stack.last_mut() {
            *top = next;
        }
        !next.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_restore() -> Result<()> {
        let mut s = ClipStack::new(Rect::sized(100, 100));
        assert_eq!(s.save(), 1);
        assert!(s.clip(Rect::sized(10, 10)));
        assert_eq!(s.save(), 2);
        assert!(!s.clip(Rect::new(50, 50, 60, 60)?));
        s.restore_to_count(2)?;
        assert_eq!(s.current(), Rect::sized(10, 10));
        s.restore_to_count(1)?;
        assert_eq!(s.current(), Rect::sized(100, 100));
        Ok(())
    }

    #[test]
    fn invalid_restore() {
        let mut s = ClipStack::new(Rect::sized(1, 1));
        assert_eq!(
            s.restore_to_count(0),
            Err(Error::InvalidSaveCount {
                requested: 0,
                depth: 1
            })
        );
        assert!(s.restore_to_count(3).is_err());
        assert_eq!(s.count(), 1);
    }

    #[test]
    fn colors() {
        assert_eq!(Color::rgb(1, 2, 3), Color(0xff01_0203));
        assert_eq!(Color::BLACK.alpha(), 0xff);
    }
}

//! Frame-level scenarios, driven through a [`ViewRoot`](crate::ViewRoot)
//! and a recording canvas.

mod focus;
mod invalidate;

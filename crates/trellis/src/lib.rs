//! Trellis: a retained-mode view hierarchy.
//!
//! Trellis keeps a tree of views in an arena and runs the machinery a UI
//! toolkit needs over it: constraint-based measurement, layout, damage
//! tracking and invalidation, input focus, and frame scheduling.
//!
//! # Quick Start
//!
//! The main entry points are:
//! - [`ViewRoot`] - Owns a tree, drives frames, and guards thread access
//! - [`ViewTree`] - The arena of views and the operations on them
//! - [`ViewBehavior`] - The trait implemented by every view's logic
//!
//! # Module Organization
//!
//! - [`measure_spec`] - The packed measurement constraint and its arithmetic
//! - [`params`] - Per-child layout parameters
//! - [`canvas`] and [`drawable`] - The drawing collaborators
//! - [`widgets`] - Stock layouts

#![warn(missing_docs)]

// Internal core module - re-export specific items below
mod core;

// Public modules
pub mod canvas;
pub mod drawable;
pub mod geom;
pub mod measure_spec;
pub mod params;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod widgets;

#[cfg(test)]
mod tests;

pub use core::{
    AttachInfo, Callback, DescendantFocusability, DrawOutcome, FocusDirection, FocusListener,
    FocusManager, FrameStats, GroupFlags, LayoutDirection, MAX_LAYOUT_PASSES_PER_FRAME, NO_ID,
    Node, NodeId, Parent, ResolvedDirection, RootOptions, TaskId, ViewBehavior, ViewContext,
    ViewFlags, ViewManager, ViewParent, ViewRoot, ViewTree, Visibility, default_measure,
};
pub use core::error;
pub use error::{Error, Result};

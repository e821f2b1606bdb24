#![allow(clippy::multiple_inherent_impl)]
//! Core types: the view arena and the measure, layout, invalidation, focus
//! and draw machinery that runs over it.

/// Shared attach state.
pub mod attach;
/// View behaviour hooks.
pub mod behavior;
/// Hook context.
pub mod context;
/// Layout direction types.
pub mod direction;
/// Drawing and drawable hosting.
mod draw;
/// Core error types.
pub mod error;
/// View flags.
pub mod flags;
/// Focus management.
pub mod focus;
/// Hit testing.
mod hit;
/// Node ID types.
pub mod id;
/// Invalidation.
mod invalidate;
/// Layout and layout requests.
mod layout;
/// Measurement.
mod measure;
/// Node data.
pub mod node;
/// Parent protocol and structural edits.
pub mod parent;
/// Direction, padding and margin resolution.
mod resolve;
/// The view root.
pub mod root;
/// Deferred tasks.
pub mod tasks;
/// The view tree.
pub mod tree;

pub use attach::AttachInfo;
pub use behavior::{DrawOutcome, ViewBehavior, default_measure};
pub use context::ViewContext;
pub use direction::{LayoutDirection, ResolvedDirection};
pub use flags::{DescendantFocusability, GroupFlags, ViewFlags, Visibility};
pub use focus::{FocusDirection, FocusListener, FocusManager};
pub use id::{NO_ID, NodeId};
pub use node::Node;
pub use parent::{Parent, ViewManager, ViewParent};
pub use root::{FrameStats, MAX_LAYOUT_PASSES_PER_FRAME, RootOptions, ViewRoot};
pub use tasks::{Callback, TaskId};
pub use tree::ViewTree;

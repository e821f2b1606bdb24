use std::result::Result as StdResult;

use thiserror::Error;

use crate::core::id::NodeId;

/// Result type for trellis operations.
pub type Result<T> = StdResult<T, Error>;

/// Core error type.
///
/// Every variant signals a programmer error: the tree was driven in a way
/// that violates one of its invariants. Operations that fail return before
/// mutating anything, and nothing is retried.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    /// The node is not present in the arena.
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// The child already has a parent (or is installed as a root view).
    #[error("{child:?} already has a parent; detach it first")]
    AlreadyHasParent {
        /// Node being added.
        child: NodeId,
    },

    /// The operation needs a group node.
    #[error("{0:?} is not a view group")]
    NotAGroup(NodeId),

    /// The node is not a direct child of the given parent.
    #[error("{child:?} is not a child of {parent:?}")]
    NotAChild {
        /// Supposed parent.
        parent: NodeId,
        /// Node that was expected under the parent.
        child: NodeId,
    },

    /// Attaching the child would create a cycle.
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    WouldCreateCycle {
        /// Requested parent.
        parent: NodeId,
        /// Requested child.
        child: NodeId,
    },

    /// The tree was touched from a thread other than the one that created its root.
    #[error("only the thread that created the view root may touch its views")]
    WrongThread,

    /// `on_measure` returned without setting the measured dimension.
    #[error("on_measure of {0:?} did not set the measured dimension")]
    MeasuredDimensionNotSet(NodeId),

    /// A canvas was restored to a save count it never reached.
    #[error("invalid save count {requested} (current depth {depth})")]
    InvalidSaveCount {
        /// Count passed to `restore_to_count`.
        requested: usize,
        /// Save depth at the time of the call.
        depth: usize,
    },

    /// A node's behaviour was re-entered while it was already running.
    #[error("behavior of {0:?} re-entered")]
    ReentrantBehavior(NodeId),

    /// Geometry failure.
    #[error("geometry: {0}")]
    Geometry(String),

    /// Invalid argument.
    #[error("invalid: {0}")]
    Invalid(String),
}

impl From<geom::Error> for Error {
    fn from(e: geom::Error) -> Self {
        Self::Geometry(e.to_string())
    }
}

use slotmap::new_key_type;

new_key_type! {
    /// Opaque handle for a view stored in the tree's arena.
    ///
    /// Handles are non-owning: holding one does not keep a view alive, and a
    /// handle to a removed view simply stops resolving.
    pub struct NodeId;
}

/// Sentinel user-assigned identity for views that have none.
pub const NO_ID: i32 = -1;

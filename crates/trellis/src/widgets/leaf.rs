use crate::core::ViewBehavior;

/// A view with no content of its own. Measures to its suggested minimum, or
/// to the constraint when one is given.
#[derive(Debug, Clone, Copy, Default)]
pub struct Leaf;

impl ViewBehavior for Leaf {}

use std::{collections::VecDeque, fmt, time::Instant};

use crate::{
    core::{id::NodeId, tree::ViewTree},
    error::Result,
};

/// Handle for a posted task, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

/// A closure run against the tree on the UI thread.
pub type Callback = Box<dyn FnOnce(&mut ViewTree) -> Result<()> + Send>;

/// Work deferred to the start of a later frame.
pub(crate) enum Task {
    /// A user closure.
    Callback(Callback),
    /// A drawable action scheduled through its host.
    Drawable {
        /// Host view.
        node: NodeId,
        /// Drawable-defined action code.
        what: u64,
    },
    /// Layout requests deferred from a frame that ran out of passes.
    RequestLayout(Vec<NodeId>),
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Callback(_) => f.write_str("Callback"),
            Self::Drawable { node, what } => write!(f, "Drawable({node:?}, {what})"),
            Self::RequestLayout(ids) => write!(f, "RequestLayout({ids:?})"),
        }
    }
}

/// A queued task.
#[derive(Debug)]
struct Pending {
    /// Handle.
    id: TaskId,
    /// Earliest time the task may run.
    due: Instant,
    /// The work.
    task: Task,
}

/// Tasks waiting for a frame. Due tasks run in the order they were posted.
#[derive(Debug, Default)]
pub(crate) struct TaskQueue {
    /// Pending tasks in posting order.
    pending: VecDeque<Pending>,
    /// Next handle value.
    next_id: u64,
}

impl TaskQueue {
    /// Queue a task to run no earlier than `due`.
    pub(crate) fn post(&mut self, task: Task, due: Instant) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.pending.push_back(Pending { id, due, task });
        id
    }

    /// Cancel a task. Returns false if it already ran or never existed.
    pub(crate) fn remove(&mut self, id: TaskId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    /// Cancel a drawable action.
    pub(crate) fn remove_drawable(&mut self, node: NodeId, what: u64) {
        self.pending.retain(|p| {
            !matches!(p.task, Task::Drawable { node: n, what: w } if n == node && w == what)
        });
    }

    /// Cancel every drawable action hosted by `node`.
    pub(crate) fn remove_node(&mut self, node: NodeId) {
        self.pending
            .retain(|p| !matches!(p.task, Task::Drawable { node: n, .. } if n == node));
    }

    /// Remove and return every task due at `now`, in posting order.
    pub(crate) fn take_due(&mut self, now: Instant) -> Vec<(TaskId, Task)> {
        let mut due = Vec::new();
        let mut rest = VecDeque::with_capacity(self.pending.len());
        for p in self.pending.drain(..) {
            if p.due <= now {
                due.push((p.id, p.task));
            } else {
                rest.push_back(p);
            }
        }
        self.pending = rest;
        due
    }

    /// Earliest due time of any pending task.
    pub(crate) fn next_due(&self) -> Option<Instant> {
        self.pending.iter().map(|p| p.due).min()
    }

    /// Number of pending tasks.
    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use slotmap::SlotMap;

    use super::*;

    fn noop() -> Task {
        Task::Callback(Box::new(|_| Ok(())))
    }

    #[test]
    fn due_in_posting_order() {
        let mut q = TaskQueue::default();
        let now = Instant::now();
        let a = q.post(noop(), now);
        let later = q.post(noop(), now + Duration::from_secs(10));
        let b = q.post(noop(), now);

        let ids: Vec<TaskId> = q.take_due(now).into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![a, b]);
        assert_eq!(q.len(), 1);
        assert_eq!(q.next_due(), Some(now + Duration::from_secs(10)));
        assert!(q.remove(later));
        assert!(!q.remove(later));
        assert_eq!(q.next_due(), None);
    }

    #[test]
    fn drawable_tasks() {
        let mut arena: SlotMap<NodeId, ()> = SlotMap::with_key();
        let n1 = arena.insert(());
        let n2 = arena.insert(());
        let mut q = TaskQueue::default();
        let now = Instant::now();
        q.post(Task::Drawable { node: n1, what: 1 }, now);
        q.post(Task::Drawable { node: n1, what: 2 }, now);
        q.post(Task::Drawable { node: n2, what: 1 }, now);
        q.remove_drawable(n1, 1);
        assert_eq!(q.len(), 2);
        q.remove_node(n1);
        assert_eq!(q.len(), 1);
    }
}

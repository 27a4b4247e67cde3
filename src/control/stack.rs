//! LIFO stack of live checkpoints.

use std::fmt;

/// Identity of one checkpoint within its context.
///
/// Ids are handed out by [`ControlFlowStack::next_id`] and never reused within a context, so a
/// transfer aimed at a checkpoint that already completed can never be mistaken for a newer one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CheckpointId(u64);

impl CheckpointId {
    /// The raw id value.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CheckpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The recovery chain of one context.
///
/// The stack only references checkpoints by id; the checkpoints themselves belong to the frames
/// running the corresponding try blocks. Pushes and pops are normally strictly nested;
/// [`remove`](Self::remove) covers a checkpoint released out of order.
///
/// # Example
///
/// ```rust
/// use trycatch::control::ControlFlowStack;
///
/// let mut stack = ControlFlowStack::new();
/// let outer = stack.next_id();
/// let inner = stack.next_id();
/// stack.push(outer);
/// stack.push(inner);
///
/// assert_eq!(stack.head(), Some(inner));
/// assert_eq!(stack.pop(), Some(inner));
/// assert_eq!(stack.pop(), Some(outer));
/// assert_eq!(stack.pop(), None);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ControlFlowStack {
    nodes: Vec<CheckpointId>,
    next: u64,
}

impl ControlFlowStack {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh checkpoint id without pushing it.
    pub fn next_id(&mut self) -> CheckpointId {
        self.next += 1;
        CheckpointId(self.next)
    }

    /// Makes `checkpoint` the new top.
    pub fn push(&mut self, checkpoint: CheckpointId) {
        self.nodes.push(checkpoint);
    }

    /// Removes and returns the top, or `None` if the stack is empty.
    pub fn pop(&mut self) -> Option<CheckpointId> {
        self.nodes.pop()
    }

    /// Removes `checkpoint` wherever it sits, keeping the order of the others.
    ///
    /// Returns `false` if it was not on the stack.
    pub fn remove(&mut self, checkpoint: CheckpointId) -> bool {
        match self.nodes.iter().rposition(|&id| id == checkpoint) {
            Some(index) => {
                self.nodes.remove(index);
                true
            }
            None => false,
        }
    }

    /// The nearest recovery target, if any.
    pub fn head(&self) -> Option<CheckpointId> {
        self.nodes.last().copied()
    }

    /// Number of live checkpoints.
    pub fn depth(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if no checkpoint is live.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stack() {
        let mut stack = ControlFlowStack::new();
        assert!(stack.is_empty());
        assert_eq!(stack.head(), None);
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut stack = ControlFlowStack::new();
        let first = stack.next_id();
        let second = stack.next_id();
        assert_ne!(first, second);
        assert!(second > first);
        assert_eq!(first.to_string(), format!("#{}", first.value()));
    }

    #[test]
    fn test_lifo_order() {
        let mut stack = ControlFlowStack::new();
        let ids: Vec<_> = (0..4).map(|_| stack.next_id()).collect();
        for id in &ids {
            stack.push(*id);
        }
        assert_eq!(stack.depth(), 4);

        for id in ids.iter().rev() {
            assert_eq!(stack.head(), Some(*id));
            assert_eq!(stack.pop(), Some(*id));
        }
        assert!(stack.is_empty());
    }

    #[test]
    fn test_remove_below_head() {
        let mut stack = ControlFlowStack::new();
        let ids: Vec<_> = (0..3).map(|_| stack.next_id()).collect();
        for id in &ids {
            stack.push(*id);
        }

        assert!(stack.remove(ids[1]));
        assert!(!stack.remove(ids[1]));
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.pop(), Some(ids[2]));
        assert_eq!(stack.pop(), Some(ids[0]));
    }
}

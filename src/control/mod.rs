//! Control-flow stack and non-local transfer.
//!
//! # Key Components
//!
//! - [`ControlFlowStack`] - LIFO chain of live checkpoint ids for one context
//! - [`Checkpoint`] - Frame-owned recovery point, pushed on establish and popped exactly once
//! - [`depth`] - Number of live checkpoints in the current context
//!
//! The stack never owns checkpoints; it only names them. A transfer always targets the stack's
//! head, which is the dynamically nearest enclosing try block.

mod checkpoint;
mod stack;

pub(crate) use checkpoint::{is_transfer, transfer};
pub use checkpoint::{depth, Checkpoint};
pub use stack::{CheckpointId, ControlFlowStack};

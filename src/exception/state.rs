//! Per-context exception state.
//!
//! This module holds the record of the currently active error for a single execution context.
//! Each context (one per OS thread) owns exactly one [`ExceptionState`]; nothing in it is shared
//! with any other context.
//!
//! # Overview
//!
//! The state tracks:
//!
//! - The active exception: its code and its owned message
//! - The landing code of the innermost try block that was entered or landed on most recently
//!
//! # State Transitions
//!
//! 1. **Empty** - code `0`, no message (initial state, and the state after cleanup)
//! 2. **Thrown** - [`ExceptionState::set`] installed a code and message, releasing the old message
//! 3. **Landed** - a try block recorded the thrown code through [`ExceptionState::record_try`]
//! 4. **Handled** - a matching clause ran to completion and [`ExceptionState::cleanup`] reset the state
//!
//! # Thread Safety
//!
//! This state is designed for single-threaded access. It lives inside the thread-local
//! [`crate::context::Context`] and is never handed to another thread.

use crate::exception::types::{Exception, EXCEPTION_ALL};

/// Exception state of one execution context.
///
/// # Responsibilities
///
/// - Owning the message of the active exception (at most one live message per context)
/// - Recording which code the current try block landed with
/// - Deciding whether a catch clause matches the active exception
///
/// # Example
///
/// ```rust
/// use trycatch::exception::ExceptionState;
///
/// let mut state = ExceptionState::new();
/// state.set(3, Some("first".to_string()));
/// state.set(4, Some("second".to_string()));
///
/// assert_eq!(state.exception().code, 4);
/// assert_eq!(state.exception().message(), Some("second"));
/// assert!(state.catches(4));
/// assert!(!state.catches(3));
///
/// state.cleanup();
/// assert!(!state.has_exception());
/// ```
#[derive(Clone, Debug, Default)]
pub struct ExceptionState {
    /// The currently active exception; code `0` when none.
    exception: Exception,

    /// Landing code of the most recent try entry.
    ///
    /// `0` after a try block was entered normally, the thrown code after a transfer
    /// landed on it.
    try_code: i32,
}

impl ExceptionState {
    /// Creates a new exception state with no active exception.
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks if there is an active exception.
    pub fn has_exception(&self) -> bool {
        self.exception.is_active()
    }

    /// Gets a reference to the active exception record.
    pub fn exception(&self) -> &Exception {
        &self.exception
    }

    /// Installs a thrown exception.
    ///
    /// The previous message is released before the new one is installed. An empty message is
    /// stored as `None`.
    ///
    /// # Arguments
    ///
    /// * `code` - The thrown code, must not be `0`
    /// * `message` - The formatted message, if any
    pub fn set(&mut self, code: i32, message: Option<String>) {
        debug_assert_ne!(code, 0, "the reserved code reached the exception state");

        drop(self.exception.message.take());
        self.exception.message = message.filter(|m| !m.is_empty());
        self.exception.code = code;
    }

    /// Records the landing code of a try block and returns it unchanged.
    pub fn record_try(&mut self, code: i32) -> i32 {
        self.try_code = code;
        code
    }

    /// Landing code of the most recently entered or landed try block.
    pub fn try_code(&self) -> i32 {
        self.try_code
    }

    /// Checks whether a catch clause declared with `code` handles the active exception.
    ///
    /// [`EXCEPTION_ALL`] matches anything; any other value matches only an equal active code.
    pub fn catches(&self, code: i32) -> bool {
        code == EXCEPTION_ALL || self.exception.code == code
    }

    /// Releases the owned message and resets to the initial empty state.
    pub fn cleanup(&mut self) {
        self.exception = Exception::default();
        self.try_code = 0;
    }
}

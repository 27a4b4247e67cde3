//! Value types shared by the exception state, the protocol and the termination handler.

use std::{fmt, num::NonZeroI32, panic::Location};

use crate::{Error, Result};

/// Catch-clause code that matches every thrown code.
///
/// Numerically this is the same value as the "no active exception" sentinel; in a catch clause
/// it means "any", and it is never accepted as a thrown code.
pub const EXCEPTION_ALL: i32 = 0;

/// The currently recorded error of one context.
///
/// A `code` of `0` means no exception is active. The message is owned by the exception state
/// that holds it; values handed out by [`crate::protocol::exception`] are snapshots.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Exception {
    /// The formatted message, `None` when thrown without one (or with an empty one)
    pub message: Option<String>,
    /// The thrown code, `0` when no exception is active
    pub code: i32,
}

impl Exception {
    /// Creates an exception record from a code and an optional message.
    pub fn new(code: i32, message: Option<String>) -> Self {
        Self { message, code }
    }

    /// Returns `true` if this record holds a thrown exception.
    pub fn is_active(&self) -> bool {
        self.code != 0
    }

    /// The message, or `None` if there is none.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (code {})",
            self.message.as_deref().unwrap_or("(null)"),
            self.code
        )
    }
}

/// Source location of a `throw`/`rethrow`, reported by the termination handler.
///
/// The macros fill in all three fields; the plain functions only know file and line (through
/// `#[track_caller]`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Site {
    /// Source file of the throw site
    pub file: &'static str,
    /// Source line of the throw site
    pub line: u32,
    /// Name of the enclosing function, when known
    pub function: Option<&'static str>,
}

impl Site {
    /// Creates a site from explicit values. Used by [`site!`](crate::site).
    pub const fn new(file: &'static str, line: u32, function: Option<&'static str>) -> Self {
        Self {
            file,
            line,
            function,
        }
    }

    /// Captures the location of the caller.
    #[track_caller]
    pub fn caller() -> Self {
        let location = Location::caller();
        Self {
            file: location.file(),
            line: location.line(),
            function: None,
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}()",
            self.file,
            self.line,
            self.function.unwrap_or("<unknown>")
        )
    }
}

/// Validates a code for use with `throw`.
///
/// # Errors
///
/// Returns [`Error::ReservedCode`] for `0`.
///
/// # Examples
///
/// ```rust
/// use trycatch::{exception::check_code, Error};
///
/// assert_eq!(check_code(5).map(|c| c.get()), Ok(5));
/// assert_eq!(check_code(0), Err(Error::ReservedCode));
/// ```
pub fn check_code(code: i32) -> Result<NonZeroI32> {
    NonZeroI32::new(code).ok_or(Error::ReservedCode)
}

//! # trycatch Prelude
//!
//! Commonly used types, functions and macros, for glob imports.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all trycatch operations
pub use crate::Error;

/// The result type used throughout trycatch
pub use crate::Result;

// ================================================================================================
// Protocol
// ================================================================================================

/// Try block builder
pub use crate::protocol::Try;

/// Exception record and the wildcard catch code
pub use crate::exception::{Exception, EXCEPTION_ALL};

/// Read access, cleanup and the non-macro forms of throw/rethrow
pub use crate::protocol::{cleanup, exception, rethrow, throw, with_exception};

/// Macro forms of throw/rethrow
pub use crate::{rethrow, throw};

// ================================================================================================
// Context Lifecycle
// ================================================================================================

/// Runtime configuration
pub use crate::context::{Config, Diagnostics, PrimaryContext};

// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]

//! # trycatch
//!
//! Structured error signaling with integer exception codes: try blocks, ordered catch
//! clauses, `throw`, `rethrow` and a deterministic outcome for exceptions nobody catches.
//!
//! ## Features
//!
//! - **Non-local transfer** - `throw!` aborts any number of intervening frames and lands in the
//!   nearest enclosing try block, no per-frame error checks needed
//! - **Ordered clauses** - First matching `catch(code)` wins, [`EXCEPTION_ALL`] matches anything,
//!   unmatched exceptions propagate outward on their own
//! - **Per-thread isolation** - Every thread owns its own exception state and checkpoint chain
//! - **Bounded blast radius** - An uncaught exception ends only its own thread, unless that thread
//!   is the designated primary context, in which case the process exits with the thrown code
//! - **No leaks** - At most one exception message is alive per thread; a new throw releases the
//!   previous one
//!
//! ## Quick Start
//!
//! ```rust
//! use trycatch::{throw, Try};
//!
//! fn read_config(path: &str) -> String {
//!     if path.is_empty() {
//!         throw!(2, "no configuration path given");
//!     }
//!     path.to_uppercase()
//! }
//!
//! let loaded = Try::new(|| read_config(""))
//!     .catch(2, |ex| format!("fallback ({})", ex.message().unwrap_or_default()))
//!     .run();
//! assert_eq!(loaded, "fallback (no configuration path given)");
//! ```
//!
//! ## Architecture
//!
//! - [`exception`] - The exception record and the per-context exception state
//! - [`control`] - The control-flow stack of checkpoints and the transfer primitive
//! - [`context`] - Per-thread contexts, process-wide initialization and configuration
//! - [`protocol`] - Try blocks, throw, rethrow, cleanup and the termination handler
//! - [`Error`] and [`Result`] - Errors of the fallible library calls
//!
//! ### Process Lifecycle
//!
//! ```rust,no_run
//! use trycatch::{context, throw};
//!
//! fn main() -> trycatch::Result<()> {
//!     // The calling thread becomes the primary context.
//!     context::init()?;
//!
//!     let worker = std::thread::spawn(|| context::run(|| -> () { throw!(50, "worker failed") }));
//!     assert!(worker.join().unwrap().is_err());
//!
//!     // Uncaught on the primary context: prints a diagnostic and exits with status 22.
//!     throw!(22, "giving up");
//! }
//! ```
//!
//! ## Unwinding
//!
//! Transfers travel through the unwinder, so the crate requires `panic = "unwind"`. Destructors
//! of the frames being discarded do run. Ordinary panics are never treated as exceptions: they
//! pass through try blocks untouched.

#[macro_use]
mod macros;

mod error;

/// Convenient re-exports of the most commonly used types, functions and macros.
///
/// # Example
///
/// ```rust
/// use trycatch::prelude::*;
///
/// let code = Try::new(|| -> i32 { throw!(5) }).catch_all(|ex| ex.code).run();
/// assert_eq!(code, 5);
/// ```
pub mod prelude;

/// Per-thread execution contexts, initialization, teardown and configuration.
pub mod context;

/// Control-flow stack and checkpoints.
pub mod control;

/// Exception records and the per-context exception state.
pub mod exception;

/// The try/catch/throw/rethrow/cleanup protocol.
pub mod protocol;

/// `trycatch` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `trycatch` Error type
///
/// Failures of initialization, configuration, code validation and context boundaries.
/// Thrown exceptions are not errors of this type; they are observed through
/// [`protocol::exception`].
pub use error::Error;

/// The exception record observed by catch clauses.
pub use exception::{Exception, EXCEPTION_ALL};

/// Try block builder.
pub use protocol::Try;

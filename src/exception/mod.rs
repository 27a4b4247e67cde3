//! Exception records and the per-context exception state.
//!
//! # Key Components
//!
//! - [`Exception`] - Code and owned message of the active error
//! - [`ExceptionState`] - The per-context record mutated by throw, try entry and cleanup
//! - [`Site`] - Source location of a throw, used by the termination diagnostic
//! - [`EXCEPTION_ALL`] - Wildcard catch code
//! - [`check_code`] - Rejects the reserved code `0`

mod state;
mod types;

pub use state::ExceptionState;
pub use types::{check_code, Exception, Site, EXCEPTION_ALL};

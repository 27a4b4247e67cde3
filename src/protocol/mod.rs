//! The try/catch/throw/rethrow/cleanup protocol.
//!
//! # Key Components
//!
//! - [`Try`] - A try block: body plus ordered catch clauses
//! - [`throw_at`] / [`throw`] - Install an exception and transfer to the nearest try block
//! - [`rethrow_at`] / [`rethrow`] - Transfer the recorded exception again
//! - [`catches`] - Catch-clause matching against the recorded exception
//! - [`exception`] / [`with_exception`] - Read access to the recorded exception
//! - [`cleanup`] - Release the message and reset the exception state
//!
//! The [`throw!`](crate::throw) and [`rethrow!`](crate::rethrow) macros are the usual entry
//! points; they also record the enclosing function for the uncaught-exception diagnostic.
//!
//! # Propagation
//!
//! A throw transfers to the dynamically nearest try block, discarding every frame in between.
//! If none of its clauses match, the exception moves on to the next enclosing try block. When
//! there is no try block left the termination handler takes over (see
//! [`crate::context::PrimaryContext`]).

mod terminate;
mod try_block;

pub use try_block::Try;

use crate::{
    context,
    control::transfer,
    exception::{check_code, Exception, Site},
};

/// Throws `code` with an optional message from `site`.
///
/// The previous message of this context is released before the new one is installed. Control
/// continues at the nearest enclosing try block, or in the termination handler if there is
/// none.
///
/// # Panics
///
/// Panics if `code` is `0`. The reserved code is a contract violation, rejected before the
/// exception state is touched.
#[cold]
pub fn throw_at(code: i32, message: Option<String>, site: Site) -> ! {
    if let Err(err) = check_code(code) {
        panic!("{site}: {err}");
    }

    let target = context::with(|ctx| {
        ctx.state.set(code, message);
        ctx.stack.head()
    });
    log::debug!("throw of code {code} at {site}");

    match target {
        Some(checkpoint) => transfer(checkpoint, code),
        None => terminate::terminate(site),
    }
}

/// Throws `code` with an optional message, reporting the caller's location.
///
/// # Panics
///
/// Panics if `code` is `0`.
#[track_caller]
pub fn throw(code: i32, message: Option<String>) -> ! {
    throw_at(code, message, Site::caller())
}

/// Transfers the recorded exception, unchanged, to the nearest enclosing try block.
///
/// # Panics
///
/// Panics if there is no recorded exception to propagate.
#[cold]
pub fn rethrow_at(site: Site) -> ! {
    let (code, target) = context::with(|ctx| (ctx.state.exception().code, ctx.stack.head()));
    assert_ne!(code, 0, "{site}: rethrow without an active exception");
    log::debug!("rethrow of code {code} at {site}");

    match target {
        Some(checkpoint) => transfer(checkpoint, code),
        None => terminate::terminate(site),
    }
}

/// Transfers the recorded exception, reporting the caller's location.
///
/// # Panics
///
/// Panics if there is no recorded exception to propagate.
#[track_caller]
pub fn rethrow() -> ! {
    rethrow_at(Site::caller())
}

/// Returns `true` if a clause declared with `code` handles the recorded exception.
pub fn catches(code: i32) -> bool {
    context::with(|ctx| ctx.state.catches(code))
}

/// Snapshot of the current context's exception.
pub fn exception() -> Exception {
    with_exception(Exception::clone)
}

/// Runs `f` with the current context's exception, without cloning the message.
///
/// `f` must not call back into this crate.
pub fn with_exception<R>(f: impl FnOnce(&Exception) -> R) -> R {
    context::inspect(|ctx| f(ctx.state.exception()))
}

/// Releases the message and resets the current context's exception state.
pub fn cleanup() {
    context::with(|ctx| ctx.state.cleanup());
    log::trace!("exception state cleaned up");
}

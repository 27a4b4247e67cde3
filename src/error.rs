use thiserror::Error;

/// The generic Error type, which covers every recoverable failure this library can report.
///
/// Exceptions thrown with [`throw!`](crate::throw) are not represented here: they travel through
/// the checkpoint machinery and are observed through [`crate::protocol::exception`]. This enum is
/// only for the fallible library calls around that machinery (initialization, code validation,
/// context boundaries).
///
/// # Error Categories
///
/// ## Contract Errors
/// - [`Error::ReservedCode`] - Attempted to use the reserved code `0` as a thrown code
///
/// ## Lifecycle Errors
/// - [`Error::AlreadyInitialized`] - The process-wide runtime was already set up
/// - [`Error::Terminated`] - A context ended through the termination handler
///
/// ## Configuration Errors
/// - [`Error::InvalidConfig`] - An environment override could not be parsed
///
/// # Examples
///
/// ```rust
/// use std::thread;
/// use trycatch::{context, throw, Error};
///
/// let worker = thread::spawn(|| context::run(|| -> () { throw!(22, "disk {} is gone", "sdb") }));
/// match worker.join().unwrap() {
///     Err(Error::Terminated { code }) => assert_eq!(code, 22),
///     other => panic!("unexpected outcome: {other:?}"),
/// }
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The code `0` was used where a thrown code was expected.
    ///
    /// `0` is the sentinel for "no active exception" and doubles as the wildcard in catch
    /// clauses, so it can never be thrown.
    #[error("exception code 0 is invalid: it is reserved for \"no active exception\"")]
    ReservedCode,

    /// [`crate::context::init`] was called after the runtime had already been initialized.
    ///
    /// This also happens when an uncaught exception forced lazy initialization before the
    /// explicit call was made.
    #[error("exception runtime is already initialized")]
    AlreadyInitialized,

    /// The context ended because an exception found no checkpoint to land on.
    ///
    /// The associated code is the thrown code, which is the context's exit status.
    #[error("context terminated by uncaught exception (code {code})")]
    Terminated {
        /// The thrown code that ended the context
        code: i32,
    },

    /// A configuration value could not be parsed.
    #[error("invalid value for {key}: {value:?}")]
    InvalidConfig {
        /// The configuration key (environment variable) that was rejected
        key: &'static str,
        /// The rejected raw value
        value: String,
    },
}

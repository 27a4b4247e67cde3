//! The try/catch construct.

use std::panic::{self, AssertUnwindSafe};

use crate::{
    context,
    control::{is_transfer, Checkpoint},
    exception::{Exception, Site, EXCEPTION_ALL},
    protocol::{self, rethrow_at},
};

type Handler<'a, T> = Box<dyn FnOnce(&Exception) -> T + 'a>;

/// One `catch(code)` clause.
struct Clause<'a, T> {
    code: i32,
    handler: Handler<'a, T>,
}

/// A try block with its catch clauses.
///
/// The body runs under a fresh checkpoint. If it completes, its value is returned and no
/// clause runs. If an exception transfers into the checkpoint, the clauses are tried in the
/// order they were added and the first one whose code matches (or that was added with
/// [`EXCEPTION_ALL`]) handles it; its return value becomes the result of [`run`](Self::run) and
/// the exception state is cleaned up afterwards. If no clause matches, the exception is
/// rethrown toward the next enclosing try block.
///
/// The checkpoint is already popped when a clause runs, so throwing from inside a handler
/// targets the try block that encloses this one. A handler that panics still cleans up the
/// exception it was handling.
///
/// # Example
///
/// ```rust
/// use trycatch::{throw, Try, EXCEPTION_ALL};
///
/// fn parse_port(raw: &str) -> u16 {
///     raw.parse().unwrap_or_else(|_| throw!(22, "invalid port {raw:?}"))
/// }
///
/// let port = Try::new(|| parse_port("http"))
///     .catch(22, |ex| {
///         assert_eq!(ex.message(), Some("invalid port \"http\""));
///         8080
///     })
///     .catch(EXCEPTION_ALL, |_| 0)
///     .run();
///
/// assert_eq!(port, 8080);
/// ```
#[must_use = "a try block does nothing until `run` is called"]
pub struct Try<'a, T> {
    body: Box<dyn FnOnce() -> T + 'a>,
    clauses: Vec<Clause<'a, T>>,
}

impl<'a, T> Try<'a, T> {
    /// Creates a try block around `body`.
    pub fn new(body: impl FnOnce() -> T + 'a) -> Self {
        Self {
            body: Box::new(body),
            clauses: Vec::new(),
        }
    }

    /// Adds a clause handling `code`, or any code if `code` is [`EXCEPTION_ALL`].
    pub fn catch(mut self, code: i32, handler: impl FnOnce(&Exception) -> T + 'a) -> Self {
        self.clauses.push(Clause {
            code,
            handler: Box::new(handler),
        });
        self
    }

    /// Adds a clause handling any code. Shorthand for `catch(EXCEPTION_ALL, handler)`.
    pub fn catch_all(self, handler: impl FnOnce(&Exception) -> T + 'a) -> Self {
        self.catch(EXCEPTION_ALL, handler)
    }

    /// Number of clauses attached.
    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }

    /// Runs the body and, if an exception lands here, the first matching clause.
    ///
    /// Ordinary panics raised by the body are not exceptions; they pop the checkpoint and keep
    /// unwinding. If no clause matches, this call does not return: the exception continues to
    /// the next enclosing try block, or to the termination handler.
    #[track_caller]
    pub fn run(self) -> T {
        let site = Site::caller();
        let Self { body, clauses } = self;

        let checkpoint = Checkpoint::establish();
        let code = match panic::catch_unwind(AssertUnwindSafe(body)) {
            Ok(value) => {
                checkpoint.release();
                return value;
            }
            Err(payload) => match checkpoint.land(payload) {
                Ok(code) => code,
                Err(payload) => panic::resume_unwind(payload),
            },
        };

        let clause = clauses
            .into_iter()
            .find(|clause| protocol::catches(clause.code));

        match clause {
            Some(clause) => {
                log::debug!("code {code} handled by catch({})", clause.code);
                let snapshot = protocol::exception();
                let handler = clause.handler;
                match panic::catch_unwind(AssertUnwindSafe(|| handler(&snapshot))) {
                    Ok(value) => {
                        protocol::cleanup();
                        value
                    }
                    Err(payload) => {
                        // A throw or termination from the handler owns the state now.
                        if !is_transfer(&*payload) && context::exit_code(&*payload).is_none() {
                            protocol::cleanup();
                        }
                        panic::resume_unwind(payload)
                    }
                }
            }
            None => {
                log::debug!("no clause matched code {code}, rethrowing");
                rethrow_at(site)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::control;

    #[test]
    fn test_normal_exit_skips_clauses() {
        let handled = Cell::new(false);
        let value = Try::new(|| 5)
            .catch_all(|_| {
                handled.set(true);
                0
            })
            .run();

        assert_eq!(value, 5);
        assert!(!handled.get());
        assert_eq!(control::depth(), 0);
    }

    #[test]
    fn test_catch_specific_code() {
        let seen = Try::new(|| -> Exception { throw!(1, "Test exception") })
            .catch(1, Exception::clone)
            .run();

        assert_eq!(seen.code, 1);
        assert_eq!(seen.message(), Some("Test exception"));
        assert_eq!(control::depth(), 0);
        assert!(!protocol::exception().is_active());
    }

    #[test]
    fn test_first_match_wins() {
        let order = Try::new(|| -> &'static str { throw!(7, "x") })
            .catch(3, |_| "three")
            .catch(EXCEPTION_ALL, |_| "all")
            .catch(7, |_| "seven")
            .run();

        assert_eq!(order, "all");
    }

    #[test]
    fn test_unmatched_propagates_outward() {
        let outer = Try::new(|| {
            Try::new(|| -> i32 { throw!(9, "deep") })
                .catch(1, |_| 1)
                .catch(2, |_| 2)
                .run()
        })
        .catch(9, |ex| {
            assert_eq!(ex.message(), Some("deep"));
            90
        })
        .run();

        assert_eq!(outer, 90);
        assert_eq!(control::depth(), 0);
    }

    #[test]
    fn test_clause_count() {
        let block = Try::new(|| ()).catch(1, |_| ()).catch_all(|_| ());
        assert_eq!(block.clause_count(), 2);
        block.run();
    }

    #[test]
    fn test_foreign_panic_passes_through() {
        let payload = panic::catch_unwind(|| {
            Try::new(|| -> () { panic::resume_unwind(Box::new(17_u8)) })
                .catch_all(|_| ())
                .run()
        })
        .unwrap_err();

        assert_eq!(payload.downcast_ref::<u8>(), Some(&17));
        assert_eq!(control::depth(), 0);
    }

    #[test]
    fn test_panicking_handler_still_cleans_up() {
        let payload = panic::catch_unwind(|| {
            Try::new(|| -> () { throw!(4, "handled badly") })
                .catch(4, |_| panic::resume_unwind(Box::new("handler failed")))
                .run()
        })
        .unwrap_err();

        assert_eq!(payload.downcast_ref::<&str>(), Some(&"handler failed"));
        assert!(!protocol::exception().is_active());
        assert_eq!(protocol::exception().message(), None);
        assert_eq!(control::depth(), 0);
    }

    #[test]
    fn test_throw_from_handler_keeps_new_exception() {
        let seen = Try::new(|| {
            Try::new(|| -> Exception { throw!(4, "first") })
                .catch(4, |_| throw!(5, "second"))
                .run()
        })
        .catch(5, Exception::clone)
        .run();

        assert_eq!(seen, Exception::new(5, Some("second".to_string())));
    }
}

//! Per-thread execution contexts and the process-wide runtime.
//!
//! Every OS thread owns one [`Context`]: a private [`ExceptionState`] paired with a private
//! [`ControlFlowStack`]. Contexts are created lazily on first use and dropped (releasing any
//! owned message) when their thread exits. Nothing is shared between contexts, so no locking
//! is involved and an exception thrown on one thread is invisible to all others.
//!
//! # Lifecycle
//!
//! 1. Call [`init`] (or [`init_with`]) once at process start. This installs the [`Config`] and,
//!    under [`PrimaryContext::Initializer`], marks the calling thread as primary. Without an
//!    explicit call the runtime is detected lazily, using [`PrimaryContext::MainThread`].
//! 2. Run each secondary context's work inside [`run`], which turns an uncaught exception into
//!    [`Error::Terminated`] instead of a dead thread.
//! 3. Call [`teardown`] at the end of a context that does not go through [`run`] (for example
//!    the primary context right before the process returns from `main`).
//!
//! # Primary Context
//!
//! An uncaught exception on the primary context terminates the whole process with the thrown
//! code as exit status. On any other context it only ends that context. See [`PrimaryContext`]
//! for the available designation rules.
//!
//! # Example
//!
//! ```rust
//! use std::thread;
//! use trycatch::{context, throw, Error};
//!
//! let worker = thread::spawn(|| context::run(|| -> u32 { throw!(50, "worker gave up") }));
//! assert_eq!(worker.join().unwrap(), Err(Error::Terminated { code: 50 }));
//! ```

mod config;

use std::{
    any::Any,
    cell::RefCell,
    panic::{self, AssertUnwindSafe},
    sync::OnceLock,
    thread::{self, ThreadId},
};

pub use config::{Config, Diagnostics, PrimaryContext};

use crate::{control::ControlFlowStack, exception::ExceptionState, Error, Result};

thread_local! {
    static CONTEXT: RefCell<Context> = RefCell::new(Context::new());
}

static RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Process-wide settings fixed at initialization.
#[derive(Debug)]
struct Runtime {
    config: Config,
    initializer: Option<ThreadId>,
}

impl Runtime {
    fn detect() -> Self {
        let mut config = Config::from_env().unwrap_or_else(|err| {
            log::warn!("{err}, using the default configuration");
            Config::default()
        });
        // Nobody called init, so there is no initializer to designate.
        if config.primary == PrimaryContext::Initializer {
            config.primary = PrimaryContext::MainThread;
        }

        Self {
            config,
            initializer: None,
        }
    }

    fn designates(&self, thread: &thread::Thread) -> bool {
        match self.config.primary {
            PrimaryContext::Initializer => self.initializer == Some(thread.id()),
            PrimaryContext::MainThread => thread.name() == Some("main"),
            PrimaryContext::Disabled => false,
        }
    }
}

fn runtime() -> &'static Runtime {
    RUNTIME.get_or_init(Runtime::detect)
}

/// The exception state and control-flow stack of one execution context.
///
/// Obtained read-only through [`inspect`]; all mutation goes through the protocol operations.
#[derive(Debug, Default)]
pub struct Context {
    pub(crate) state: ExceptionState,
    pub(crate) stack: ControlFlowStack,
}

impl Context {
    fn new() -> Self {
        Self::default()
    }

    /// The exception state of this context.
    pub fn state(&self) -> &ExceptionState {
        &self.state
    }

    /// The control-flow stack of this context.
    pub fn stack(&self) -> &ControlFlowStack {
        &self.stack
    }
}

/// Runs `f` with the current thread's context.
///
/// The borrow must never span user code or an unwind.
pub(crate) fn with<R>(f: impl FnOnce(&mut Context) -> R) -> R {
    CONTEXT.with(|cell| f(&mut cell.borrow_mut()))
}

/// Like [`with`], but returns `None` once the thread-local has been destroyed.
pub(crate) fn try_with<R>(f: impl FnOnce(&mut Context) -> R) -> Option<R> {
    CONTEXT
        .try_with(|cell| cell.try_borrow_mut().ok().map(|mut ctx| f(&mut ctx)))
        .ok()
        .flatten()
}

/// Runs `f` with read-only access to the current thread's context.
///
/// `f` must not call back into this crate.
///
/// # Panics
///
/// Panics if `f` throws, rethrows or opens a try block: those need the context mutably while
/// it is still borrowed here.
///
/// # Examples
///
/// ```rust
/// use trycatch::context;
///
/// let depth = context::inspect(|ctx| ctx.stack().depth());
/// assert_eq!(depth, 0);
/// ```
pub fn inspect<R>(f: impl FnOnce(&Context) -> R) -> R {
    CONTEXT.with(|cell| f(&cell.borrow()))
}

/// Initializes the runtime from the environment, marking the calling thread as initializer.
///
/// # Errors
///
/// Returns [`Error::InvalidConfig`] for unparseable overrides and [`Error::AlreadyInitialized`]
/// if the runtime was already set up.
pub fn init() -> Result<()> {
    init_with(Config::from_env()?)
}

/// Initializes the runtime with an explicit configuration, marking the calling thread as
/// initializer.
///
/// # Errors
///
/// Returns [`Error::AlreadyInitialized`] if the runtime was already set up, explicitly or
/// lazily.
pub fn init_with(config: Config) -> Result<()> {
    let current = thread::current();
    RUNTIME
        .set(Runtime {
            config,
            initializer: Some(current.id()),
        })
        .map_err(|_| Error::AlreadyInitialized)?;

    log::debug!(
        "exception runtime initialized by {} (primary: {}, diagnostics: {})",
        label_of(&current),
        config.primary,
        config.diagnostics
    );
    Ok(())
}

/// The active configuration.
pub fn config() -> Config {
    runtime().config
}

/// Returns `true` if the current context is the primary context.
pub fn is_primary() -> bool {
    runtime().designates(&thread::current())
}

/// Human-readable identity of the current context: the thread name, or its id.
pub fn label() -> String {
    label_of(&thread::current())
}

fn label_of(thread: &thread::Thread) -> String {
    thread
        .name()
        .map_or_else(|| format!("{:?}", thread.id()), str::to_owned)
}

/// Ends the current context, releasing the owned message.
pub fn teardown() {
    let live = with(|ctx| {
        ctx.state.cleanup();
        ctx.stack.depth()
    });
    if live > 0 {
        log::warn!("context {} torn down with {live} live checkpoints", label());
    }
    log::trace!("context {} torn down", label());
}

/// Unwind payload carrying the status of a context ended by the termination handler.
#[derive(Clone, Copy, Debug)]
struct ContextExit {
    code: i32,
}

/// Ends the current context by unwinding to its boundary.
#[cold]
pub(crate) fn exit(code: i32) -> ! {
    panic::resume_unwind(Box::new(ContextExit { code }))
}

/// Recovers the status of a context that ended through the termination handler.
///
/// Pass the payload of a failed [`JoinHandle::join`](std::thread::JoinHandle::join) (as
/// `&*payload`). Returns `None` for ordinary panics.
///
/// # Examples
///
/// ```rust
/// use std::thread;
/// use trycatch::{context, throw};
///
/// let payload = thread::spawn(|| -> () { throw!(9, "lost") }).join().unwrap_err();
/// assert_eq!(context::exit_code(&*payload), Some(9));
/// ```
pub fn exit_code(payload: &(dyn Any + Send)) -> Option<i32> {
    payload.downcast_ref::<ContextExit>().map(|exit| exit.code)
}

/// Runs `body` as a context boundary.
///
/// The context is torn down when `body` returns. An ordinary panic keeps unwinding.
///
/// # Errors
///
/// Returns [`Error::Terminated`] with the thrown code if an exception escaped every checkpoint
/// and the current context is not primary.
pub fn run<T>(body: impl FnOnce() -> T) -> Result<T> {
    match panic::catch_unwind(AssertUnwindSafe(body)) {
        Ok(value) => {
            teardown();
            Ok(value)
        }
        Err(payload) => match exit_code(&*payload) {
            Some(code) => {
                log::debug!("context {} ended with code {code}", label());
                Err(Error::Terminated { code })
            }
            None => panic::resume_unwind(payload),
        },
    }
}

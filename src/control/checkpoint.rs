//! Frame-owned checkpoints and the non-local transfer primitive.
//!
//! A transfer is carried by the unwinder: [`transfer`] resumes unwinding with a private
//! payload naming the target checkpoint, and the try block that owns that checkpoint catches
//! the unwind and turns it back into a landing code through [`Checkpoint::land`]. Every frame
//! between the throw site and the checkpoint is discarded on the way.

use std::{any::Any, panic};

use crate::{context, control::CheckpointId};

/// Unwind payload of a transfer in flight.
#[derive(Debug)]
struct Transfer {
    target: CheckpointId,
    code: i32,
}

/// Aborts every frame up to the try block owning `target`, which lands with `code`.
///
/// `resume_unwind` bypasses the panic hook, so nothing is printed.
#[cold]
pub(crate) fn transfer(target: CheckpointId, code: i32) -> ! {
    log::debug!("transferring code {code} to checkpoint {target}");
    panic::resume_unwind(Box::new(Transfer { target, code }))
}

/// Returns `true` if `payload` is a transfer in flight.
pub(crate) fn is_transfer(payload: &(dyn Any + Send)) -> bool {
    payload.is::<Transfer>()
}

/// A recovery point owned by the frame running a try block.
///
/// Establishing a checkpoint pushes it onto the current context's control-flow stack. It is
/// popped exactly once: by [`release`](Self::release) on normal exit, by [`land`](Self::land)
/// when a transfer arrives, or on drop when an unrelated panic unwinds through the frame.
///
/// # Example
///
/// ```rust
/// use std::panic;
/// use trycatch::{control::{self, Checkpoint}, throw};
///
/// let checkpoint = Checkpoint::establish();
/// assert_eq!(control::depth(), 1);
///
/// let payload = panic::catch_unwind(|| -> () { throw!(8, "out") }).unwrap_err();
/// assert_eq!(checkpoint.land(payload).ok(), Some(8));
/// assert_eq!(control::depth(), 0);
/// ```
#[derive(Debug)]
pub struct Checkpoint {
    id: CheckpointId,
    live: bool,
}

impl Checkpoint {
    /// Pushes a new checkpoint and records the normal-entry landing code `0`.
    pub fn establish() -> Self {
        let id = context::with(|ctx| {
            let id = ctx.stack.next_id();
            ctx.stack.push(id);
            ctx.state.record_try(0);
            id
        });
        log::trace!("pushed checkpoint {id}");

        Self { id, live: true }
    }

    /// The id of this checkpoint.
    pub fn id(&self) -> CheckpointId {
        self.id
    }

    /// Pops the checkpoint after the try body completed normally.
    pub fn release(mut self) {
        self.pop();
    }

    /// Pops the checkpoint after an unwind reached its frame.
    ///
    /// If the payload is a transfer aimed at this checkpoint, the thrown code is recorded as
    /// the landing code and returned. Anything else (an ordinary panic, a context exit) is
    /// handed back so the caller can resume unwinding with it.
    ///
    /// # Errors
    ///
    /// Returns the untouched payload when it is not a transfer to this checkpoint.
    pub fn land(mut self, payload: Box<dyn Any + Send>) -> Result<i32, Box<dyn Any + Send>> {
        self.pop();

        let landed = payload
            .downcast_ref::<Transfer>()
            .map(|transfer| (transfer.target, transfer.code));

        match landed {
            Some((target, code)) if target == self.id => {
                context::with(|ctx| ctx.state.record_try(code));
                log::debug!("landed on checkpoint {} with code {code}", self.id);
                Ok(code)
            }
            Some((target, code)) => {
                log::warn!(
                    "checkpoint {} intercepted a transfer of code {code} aimed at {target}",
                    self.id
                );
                Err(payload)
            }
            None => Err(payload),
        }
    }

    fn pop(&mut self) {
        if !self.live {
            return;
        }
        self.live = false;

        let id = self.id;
        let popped = context::try_with(|ctx| {
            if ctx.stack.head() == Some(id) {
                ctx.stack.pop();
                Some(true)
            } else if ctx.stack.remove(id) {
                Some(false)
            } else {
                None
            }
        });

        match popped {
            Some(Some(true)) => log::trace!("popped checkpoint {id}"),
            Some(Some(false)) => {
                log::warn!("checkpoint {id} released below the top of the control-flow stack");
            }
            Some(None) => log::warn!("checkpoint {id} is missing from the control-flow stack"),
            // Context already torn down during thread exit.
            None => {}
        }
    }
}

impl Drop for Checkpoint {
    fn drop(&mut self) {
        self.pop();
    }
}

/// Number of live checkpoints in the current context.
pub fn depth() -> usize {
    context::with(|ctx| ctx.stack.depth())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_establish_and_release() {
        assert_eq!(depth(), 0);

        let outer = Checkpoint::establish();
        let inner = Checkpoint::establish();
        assert_eq!(depth(), 2);
        assert_ne!(outer.id(), inner.id());

        inner.release();
        assert_eq!(depth(), 1);
        outer.release();
        assert_eq!(depth(), 0);
    }

    #[test]
    fn test_drop_pops() {
        {
            let _checkpoint = Checkpoint::establish();
            assert_eq!(depth(), 1);
        }
        assert_eq!(depth(), 0);
    }

    #[test]
    fn test_land_on_own_transfer() {
        let checkpoint = Checkpoint::establish();
        let id = checkpoint.id();

        let payload = panic::catch_unwind(|| transfer(id, 12)).unwrap_err();
        assert_eq!(checkpoint.land(payload).ok(), Some(12));
        assert_eq!(depth(), 0);
        assert_eq!(context::with(|ctx| ctx.state.try_code()), 12);
    }

    #[test]
    fn test_land_rejects_foreign_payload() {
        let checkpoint = Checkpoint::establish();

        let payload: Box<dyn Any + Send> = Box::new("not a transfer");
        let payload = checkpoint.land(payload).unwrap_err();
        assert_eq!(payload.downcast_ref::<&str>(), Some(&"not a transfer"));
        assert_eq!(depth(), 0);
    }

    #[test]
    fn test_land_rejects_transfer_for_other_checkpoint() {
        let outer = Checkpoint::establish();
        let inner = Checkpoint::establish();
        let outer_id = outer.id();

        let payload = panic::catch_unwind(|| transfer(outer_id, 4)).unwrap_err();
        let payload = inner.land(payload).unwrap_err();
        assert_eq!(outer.land(payload).ok(), Some(4));
        assert_eq!(depth(), 0);
    }

    #[test]
    fn test_out_of_order_release_leaves_no_stale_checkpoint() {
        let status = std::thread::spawn(|| {
            let outer = Checkpoint::establish();
            let inner = Checkpoint::establish();
            let inner_id = inner.id();

            outer.release();
            assert_eq!(depth(), 1);
            assert_eq!(context::with(|ctx| ctx.stack.head()), Some(inner_id));
            inner.release();
            assert_eq!(depth(), 0);

            context::run(|| -> () { throw!(5, "nothing left to catch") })
        })
        .join()
        .unwrap();

        assert_eq!(status, Err(crate::Error::Terminated { code: 5 }));
    }
}

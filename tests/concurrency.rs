//! Context isolation tests.
//!
//! Every thread owns a private exception state and checkpoint chain. These tests verify that:
//! 1. Concurrent throw/catch cycles never observe another thread's exception
//! 2. An uncaught exception ends only the thread that raised it
//! 3. The thrown code is surfaced as the ended context's status

use std::{
    sync::{Arc, Barrier},
    thread,
};

use trycatch::{context, protocol::exception, throw, Error, Exception, Try};

const NUM_THREADS: usize = 4;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn code_for(id: usize) -> i32 {
    100 + i32::try_from(id).unwrap()
}

#[test]
fn multithreaded_exceptions() {
    init_logging();

    let handles: Vec<_> = (0..NUM_THREADS)
        .map(|id| {
            thread::spawn(move || {
                Try::new(|| -> Option<Exception> {
                    if id % 2 == 1 {
                        throw!(100, "Thread {id} exception");
                    }
                    None
                })
                .catch(100, |ex| {
                    assert_eq!(ex.message, Some(format!("Thread {id} exception")));
                    assert_eq!(ex.code, 100);
                    Some(ex.clone())
                })
                .run()
            })
        })
        .collect();

    for (id, handle) in handles.into_iter().enumerate() {
        let caught = handle.join().unwrap();
        assert_eq!(caught.is_some(), id % 2 == 1);
    }
}

#[test]
fn concurrent_contexts_never_see_each_other() {
    init_logging();

    let barrier = Arc::new(Barrier::new(NUM_THREADS));
    let handles: Vec<_> = (0..NUM_THREADS)
        .map(|id| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let code = code_for(id);
                for round in 0..200 {
                    let seen = Try::new(|| -> Exception {
                        if round == 0 {
                            barrier.wait();
                        }
                        throw!(code, "context {id} round {round}")
                    })
                    .catch(code, Exception::clone)
                    .run();

                    assert_eq!(seen.code, code);
                    assert_eq!(seen.message, Some(format!("context {id} round {round}")));
                    assert!(!exception().is_active());
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn multithreaded_exceptions_uncaught() {
    init_logging();

    let handles: Vec<_> = (0..NUM_THREADS)
        .map(|id| {
            thread::spawn(move || {
                context::run(|| {
                    if id % 2 == 0 {
                        Try::new(|| -> () { throw!(50, "Thread {id} uncaught exception") })
                            .catch(51, |_| ())
                            .run();
                        unreachable!("thread {id} should have terminated");
                    }
                    0
                })
            })
        })
        .collect();

    for (id, handle) in handles.into_iter().enumerate() {
        let status = handle.join().unwrap();
        if id % 2 == 0 {
            assert_eq!(status, Err(Error::Terminated { code: 50 }));
        } else {
            assert_eq!(status, Ok(0));
        }
    }
}

#[test]
fn uncaught_without_try_ends_only_the_thread() {
    init_logging();

    let failing = thread::spawn(|| -> () { throw!(22, "Uncaught exception") });
    let sibling = thread::spawn(|| {
        Try::new(|| -> i32 { throw!(7, "caught") })
            .catch(7, |ex| ex.code)
            .run()
    });

    let payload = failing.join().unwrap_err();
    assert_eq!(context::exit_code(&*payload), Some(22));
    assert_eq!(sibling.join().unwrap(), 7);
}

#[test]
fn uncaught_in_one_context_leaves_parent_state_alone() {
    init_logging();

    let parent_view = Try::new(|| -> Exception {
        let child = thread::spawn(|| context::run(|| -> () { throw!(60, "child failure") }));
        assert_eq!(
            child.join().unwrap(),
            Err(Error::Terminated { code: 60 })
        );
        assert!(!exception().is_active());
        throw!(61, "parent failure")
    })
    .catch(61, Exception::clone)
    .run();

    assert_eq!(parent_view, Exception::new(61, Some("parent failure".to_string())));
}

#[test]
fn terminated_context_releases_its_message() {
    init_logging();

    let after = thread::spawn(|| {
        let status = context::run(|| -> () { throw!(70, "released on exit") });
        (status, exception())
    })
    .join()
    .unwrap();

    assert_eq!(after.0, Err(Error::Terminated { code: 70 }));
    assert_eq!(after.1, Exception::default());
}

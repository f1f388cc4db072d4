//! Bookkeeping for threads spawned by `go`.
//!
//! Every spawned thread gets a registry slot with its join handle and a
//! close flag. Failures travel through an unbounded channel that the run
//! drains, without blocking, once its entry function returns.

use crossbeam::channel::{unbounded, Receiver, Sender};
use gt_diagnostic::Error;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

struct ThreadSlot {
    close: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

pub(crate) struct ThreadHub {
    live: AtomicUsize,
    sender: Sender<Error>,
    receiver: Receiver<Error>,
    threads: Mutex<Vec<ThreadSlot>>,
}

impl ThreadHub {
    pub(crate) fn new() -> Self {
        let (sender, receiver) = unbounded();
        ThreadHub {
            live: AtomicUsize::new(0),
            sender,
            receiver,
            threads: Mutex::new(Vec::new()),
        }
    }

    /// Reserve a slot for a thread about to start; returns its id.
    pub(crate) fn register(&self, close: Arc<AtomicBool>) -> usize {
        let mut threads = self.threads.lock();
        threads.push(ThreadSlot {
            close,
            handle: None,
        });
        self.live.fetch_add(1, Ordering::SeqCst);
        threads.len()
    }

    pub(crate) fn attach(&self, id: usize, handle: JoinHandle<()>) {
        if let Some(slot) = self.threads.lock().get_mut(id.wrapping_sub(1)) {
            slot.handle = Some(handle);
        }
    }

    /// Called by a thread as its last action.
    pub(crate) fn finish(&self, id: usize, error: Option<Error>) {
        if let Some(source) = error {
            tracing::debug!(thread = id, error = %source, "thread failed");
            // The receiver lives as long as the hub.
            let _ = self.sender.send(Error::Thread {
                thread: id,
                source: Box::new(source),
            });
        } else {
            tracing::debug!(thread = id, "thread finished");
        }
        self.live.fetch_sub(1, Ordering::SeqCst);
    }

    /// Block until thread `id` ends. Its failure, if any, stays queued.
    pub(crate) fn wait(&self, id: usize) {
        let handle = self
            .threads
            .lock()
            .get_mut(id.wrapping_sub(1))
            .and_then(|slot| slot.handle.take());
        if let Some(handle) = handle {
            if handle.join().is_err() {
                tracing::warn!(thread = id, "thread panicked");
            }
        }
    }

    pub(crate) fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Ask every registered thread to stop at its next safe point.
    pub(crate) fn close_all(&self) {
        for slot in self.threads.lock().iter() {
            slot.close.store(true, Ordering::SeqCst);
        }
    }

    /// Combine the entry function's outcome with queued thread failures.
    ///
    /// Drains without blocking. Any failure closes the threads still
    /// running; none of them is joined. The entry's own error wins.
    pub(crate) fn settle<T>(&self, result: Result<T, Error>) -> Result<T, Error> {
        let drained: Vec<Error> = self.receiver.try_iter().collect();
        if result.is_err() || !drained.is_empty() {
            tracing::debug!(
                drained = drained.len(),
                live = self.live(),
                "closing outstanding threads"
            );
            self.close_all();
        }
        match result {
            Err(err) => Err(err),
            Ok(value) => match drained.into_iter().next() {
                Some(err) => Err(err),
                None => Ok(value),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use gt_diagnostic::RuntimeErrorKind;
    use pretty_assertions::assert_eq;

    fn custom(message: &str) -> Error {
        Error::runtime(RuntimeErrorKind::Custom {
            message: message.to_string(),
        })
    }

    #[test]
    fn finished_threads_leave_the_live_count() {
        let hub = ThreadHub::new();
        let a = hub.register(Arc::new(AtomicBool::new(false)));
        let b = hub.register(Arc::new(AtomicBool::new(false)));
        assert_eq!((a, b, hub.live()), (1, 2, 2));
        hub.finish(a, None);
        assert_eq!(hub.live(), 1);
    }

    #[test]
    fn queued_failure_is_reported_and_closes_the_rest() {
        let hub = ThreadHub::new();
        let flag = Arc::new(AtomicBool::new(false));
        let failed = hub.register(Arc::new(AtomicBool::new(false)));
        hub.register(Arc::clone(&flag));
        hub.finish(failed, Some(custom("boom")));

        let err = hub.settle(Ok(())).unwrap_err();
        assert!(matches!(err, Error::Thread { thread: 1, .. }));
        assert!(flag.load(Ordering::SeqCst));
    }

    #[test]
    fn entry_error_wins() {
        let hub = ThreadHub::new();
        let id = hub.register(Arc::new(AtomicBool::new(false)));
        hub.finish(id, Some(custom("thread")));
        let err = hub.settle::<()>(Err(custom("entry"))).unwrap_err();
        assert_eq!(err.to_string(), custom("entry").to_string());
    }

    #[test]
    fn clean_run_closes_nothing() {
        let hub = ThreadHub::new();
        let flag = Arc::new(AtomicBool::new(false));
        hub.register(Arc::clone(&flag));
        assert_eq!(hub.settle(Ok(7)).unwrap(), 7);
        assert!(!flag.load(Ordering::SeqCst));
    }

    #[test]
    fn waiting_on_an_unknown_thread_returns() {
        let hub = ThreadHub::new();
        hub.wait(0);
        hub.wait(9);
    }
}

//! Quiet-interval debouncing
//!
//! [`Debouncer`] forwards only the last value of a burst, once `delay` has
//! elapsed without another [`Debouncer::emit`]. Each emit restarts the wait.
//! Dropping the debouncer (or calling [`Debouncer::shutdown`]) cancels a
//! pending delivery; the callback never runs after teardown.
//!
//! A tokio runtime must be running when the debouncer is created.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub struct Debouncer<T> {
    delay: Duration,
    sender: mpsc::UnboundedSender<T>,
    task: JoinHandle<()>,
    closed: AtomicBool,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Start a debouncer that hands settled values to `callback`
    pub fn new<F>(delay: Duration, mut callback: F) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        let (sender, mut receiver) = mpsc::unbounded_channel::<T>();

        let task = tokio::spawn(async move {
            while let Some(mut latest) = receiver.recv().await {
                loop {
                    tokio::select! {
                        // A value arriving on the deadline still supersedes the pending one
                        biased;
                        next = receiver.recv() => match next {
                            Some(value) => latest = value,
                            None => return,
                        },
                        _ = tokio::time::sleep(delay) => {
                            callback(latest);
                            break;
                        }
                    }
                }
            }
        });

        Self {
            delay,
            sender,
            task,
            closed: AtomicBool::new(false),
        }
    }

    /// Schedule `value`, replacing any value still waiting for its quiet interval
    pub fn emit(&self, value: T) {
        if self.sender.send(value).is_err() {
            log::debug!(target: "dashweb::debounce", "emit after shutdown ignored");
        }
    }
}

impl<T> Debouncer<T> {
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancel any pending delivery and stop accepting values
    pub fn shutdown(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.task.abort();
    }

    /// True as soon as `shutdown` has been called, before the task winds down
    pub fn is_shut_down(&self) -> bool {
        self.closed.load(Ordering::SeqCst) || self.task.is_finished()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl<T> std::fmt::Debug for Debouncer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay", &self.delay)
            .field("finished", &self.task.is_finished())
            .finish()
    }
}

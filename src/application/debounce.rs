use std::future::pending;
use tokio::time::{sleep_until, Duration, Instant};

/// Holds back the latest value until no new value has arrived for `delay`.
///
/// `settled` is cancel-safe: the pending value and its deadline live in the
/// debouncer, so it can sit in a `tokio::select!` next to other events.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<T>,
    deadline: Option<Instant>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            deadline: None,
        }
    }

    /// Replace the pending value and restart the quiet period.
    pub fn push(&mut self, value: T) {
        self.pending = Some(value);
        self.deadline = Some(Instant::now() + self.delay);
    }

    /// Drop the pending value without emitting it.
    pub fn cancel(&mut self) {
        self.pending = None;
        self.deadline = None;
    }

    /// Take the pending value right away, e.g. when input has ended.
    pub fn flush(&mut self) -> Option<T> {
        self.deadline = None;
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Resolves once the quiet period after the last `push` has elapsed.
    /// Never resolves while nothing is pending.
    pub async fn settled(&mut self) -> T {
        loop {
            match self.deadline {
                Some(deadline) => {
                    sleep_until(deadline).await;
                    if let Some(value) = self.flush() {
                        return value;
                    }
                }
                None => pending::<()>().await,
            }
        }
    }
}

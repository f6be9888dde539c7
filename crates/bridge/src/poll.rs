//! Cancellable polling of chain state.

use std::{future::Future, time::Duration};

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// The default interval between two polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// The default maximum duration of a poll.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// The outcome of a [`Poll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polled<T> {
    /// The polled value became ready.
    Ready(T),
    /// The deadline was reached. Holds the last polled value.
    TimedOut(T),
    /// The poll was cancelled. Holds the last polled value.
    Cancelled(T),
}

impl<T> Polled<T> {
    /// Returns the last polled value.
    pub fn into_inner(self) -> T {
        match self {
            Self::Ready(value) | Self::TimedOut(value) | Self::Cancelled(value) => value,
        }
    }
}

/// A type used for polling an operation until its output is ready, a deadline is reached or the
/// poll is cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Poll {
    /// The interval between two polls.
    pub interval: Duration,
    /// The maximum duration of the poll.
    pub timeout: Duration,
}

impl Default for Poll {
    fn default() -> Self {
        Self { interval: DEFAULT_POLL_INTERVAL, timeout: DEFAULT_POLL_TIMEOUT }
    }
}

impl Poll {
    /// Creates a new [`Poll`] with the specified parameters.
    pub const fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }

    /// Polls the operation until `is_ready` returns true for its output.
    ///
    /// The operation is always polled at least once. Errors are returned immediately.
    pub async fn poll<F, Fut, T, E, R>(
        &self,
        operation_name: &str,
        cancel: &CancellationToken,
        operation: F,
        is_ready: R,
    ) -> Result<Polled<T>, E>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        R: Fn(&T) -> bool,
    {
        let deadline = Instant::now() + self.timeout;
        let mut attempt: usize = 0;

        loop {
            let value = operation().await?;
            attempt += 1;
            if is_ready(&value) {
                return Ok(Polled::Ready(value));
            }

            let now = Instant::now();
            if now >= deadline {
                tracing::debug!(target: "router::bridge", operation = operation_name, attempt, "Poll timed out");
                return Ok(Polled::TimedOut(value));
            }

            tracing::trace!(target: "router::bridge", operation = operation_name, attempt, "Polling operation");

            let delay = self.interval.min(deadline - now);
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Ok(Polled::Cancelled(value)),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Poll, Polled};
    use std::{cell::RefCell, time::Duration};
    use tokio_util::sync::CancellationToken;

    #[tokio::test(start_paused = true)]
    async fn test_poll_ready_on_first_attempt() {
        let attempt = RefCell::new(0);
        let poll = Poll::new(Duration::from_secs(10), Duration::from_secs(60));
        let result = poll
            .poll(
                "test_operation",
                &CancellationToken::new(),
                || {
                    *attempt.borrow_mut() += 1;
                    async move { Ok::<i32, &str>(42) }
                },
                |v| *v == 42,
            )
            .await;

        assert_eq!(result, Ok(Polled::Ready(42)));
        assert_eq!(*attempt.borrow(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_ready_after_attempts() {
        let attempt = RefCell::new(0);
        let poll = Poll::new(Duration::from_secs(10), Duration::from_secs(60));
        let result = poll
            .poll(
                "test_operation",
                &CancellationToken::new(),
                || {
                    *attempt.borrow_mut() += 1;
                    let current_attempt = *attempt.borrow();
                    async move { Ok::<i32, &str>(current_attempt) }
                },
                |v| *v >= 3,
            )
            .await;

        assert_eq!(result, Ok(Polled::Ready(3)));
        assert_eq!(*attempt.borrow(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_timed_out() {
        let attempt = RefCell::new(0);
        let poll = Poll::new(Duration::from_secs(10), Duration::from_secs(25));
        let result = poll
            .poll(
                "test_operation",
                &CancellationToken::new(),
                || {
                    *attempt.borrow_mut() += 1;
                    async move { Ok::<i32, &str>(0) }
                },
                |v| *v == 42,
            )
            .await;

        assert_eq!(result, Ok(Polled::TimedOut(0)));
        // polls at 0s, 10s, 20s and 25s.
        assert_eq!(*attempt.borrow(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_cancelled() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let poll = Poll::default();
        let result = poll
            .poll("test_operation", &cancel, || async move { Ok::<i32, &str>(1) }, |v| *v == 42)
            .await;

        assert_eq!(result, Ok(Polled::Cancelled(1)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_error_is_returned() {
        let poll = Poll::default();
        let result = poll
            .poll(
                "test_operation",
                &CancellationToken::new(),
                || async move { Err::<i32, &str>("failed") },
                |_| true,
            )
            .await;

        assert_eq!(result, Err("failed"));
    }
}

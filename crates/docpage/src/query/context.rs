//! Cancellation and deadline scope for a query.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::{Error, Result};

/// Cancellation and deadline scope attached to a terminal call.
///
/// A context with neither a token nor a deadline never interrupts the call.
#[derive(Debug, Clone, Default)]
pub struct QueryContext {
    cancellation: Option<CancellationToken>,
    deadline: Option<Instant>,
}

impl QueryContext {
    /// Creates a context that never interrupts the call.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Sets an absolute deadline.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets a deadline relative to now.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Returns the attached cancellation token, if any.
    pub fn cancellation(&self) -> Option<&CancellationToken> {
        self.cancellation.as_ref()
    }

    /// Returns the deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns the time left before the deadline, if one is set.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Returns whether the attached token has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    /// Returns whether the deadline has passed.
    pub fn is_expired(&self) -> bool {
        self.deadline
            .is_some_and(|deadline| deadline <= Instant::now())
    }

    /// Fails if the scope has already ended.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(Error::cancelled().with_message("query cancelled before execution"));
        }

        if self.is_expired() {
            return Err(Error::timeout().with_message("query deadline elapsed before execution"));
        }

        Ok(())
    }

    /// Runs `future` within this scope.
    ///
    /// Fails without polling `future` when the scope already ended; otherwise
    /// the first of cancellation, deadline or completion wins.
    pub async fn run<F, T>(&self, future: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.check()?;

        let cancelled = async {
            match &self.cancellation {
                Some(token) => token.cancelled().await,
                None => std::future::pending().await,
            }
        };

        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            biased;

            () = cancelled => Err(Error::cancelled().with_message("query cancelled during execution")),
            () = expired => Err(Error::timeout().with_message("query deadline elapsed during execution")),
            result = future => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[tokio::test]
    async fn empty_context_runs_to_completion() {
        let context = QueryContext::new();
        let value = context.run(async { Ok(7) }).await.unwrap();
        assert_eq!(value, 7);
        assert_eq!(context.remaining(), None);
    }

    #[tokio::test]
    async fn cancelled_token_fails_before_polling() {
        let token = CancellationToken::new();
        token.cancel();
        let context = QueryContext::new().with_cancellation(token);

        let error = context
            .run(async { Err::<(), _>(Error::internal()) })
            .await
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn elapsed_deadline_fails_before_polling() {
        let context = QueryContext::new().with_deadline(Instant::now());
        assert!(context.is_expired());

        let error = context.run(async { Ok(()) }).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Timeout);
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_interrupts_slow_future() {
        let context = QueryContext::new().with_timeout(Duration::from_millis(50));

        let error = context
            .run(async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            })
            .await
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Timeout);
    }

    #[tokio::test]
    async fn cancellation_interrupts_pending_future() {
        let token = CancellationToken::new();
        let context = QueryContext::new().with_cancellation(token.clone());

        let canceller = tokio::spawn(async move { token.cancel() });
        let error = context
            .run(std::future::pending::<Result<()>>())
            .await
            .unwrap_err();
        canceller.await.unwrap();

        assert_eq!(error.kind(), ErrorKind::Cancelled);
    }
}

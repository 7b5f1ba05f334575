//! Per-call cancellation and deadlines.
//!
//! A [`RequestContext`] is handed to every handler method. The transport
//! refuses to start a call whose context is already done and aborts an
//! in-flight call as soon as the context is cancelled or its deadline passes.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::ContextError;

/// Cancellation token plus optional deadline for a single call.
///
/// Cloning a context shares its cancellation token, so cancelling any clone
/// cancels all of them.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// A context that is never cancelled and has no deadline.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// A context that expires `timeout` from now.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::background().timeout(timeout)
    }

    /// A context that expires at `deadline`.
    #[must_use]
    pub fn with_deadline(deadline: Instant) -> Self {
        Self::background().deadline_at(deadline)
    }

    /// A context driven by an existing cancellation token.
    #[must_use]
    pub fn with_cancellation(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Set or tighten the deadline to `timeout` from now.
    #[must_use]
    pub fn timeout(self, timeout: Duration) -> Self {
        self.deadline_at(Instant::now() + timeout)
    }

    /// Set or tighten the deadline. An earlier existing deadline is kept.
    #[must_use]
    pub fn deadline_at(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) if existing < deadline => existing,
            _ => deadline,
        });
        self
    }

    /// Derive a context that is cancelled with this one but can also be
    /// cancelled on its own.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    /// Cancel this context and every clone and child of it.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// The token backing this context.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// The deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Why the context is done, or `None` while it is still live.
    ///
    /// Cancellation takes precedence over an expired deadline.
    #[must_use]
    pub fn err(&self) -> Option<ContextError> {
        if self.token.is_cancelled() {
            return Some(ContextError::Canceled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(ContextError::DeadlineExceeded),
            _ => None,
        }
    }

    /// Drive `future` to completion unless the context finishes first.
    ///
    /// The context is polled before the future, so a response that becomes
    /// ready at the same moment the context is cancelled is discarded.
    ///
    /// # Errors
    ///
    /// Returns the [`ContextError`] if the context is done before or while
    /// the future runs.
    pub async fn run<F>(&self, future: F) -> Result<F::Output, ContextError>
    where
        F: Future,
    {
        if let Some(err) = self.err() {
            return Err(err);
        }

        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            () = self.token.cancelled() => Err(ContextError::Canceled),
            () = expired => Err(ContextError::DeadlineExceeded),
            output = future => Ok(output),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_is_live() {
        let ctx = RequestContext::background();
        assert!(ctx.err().is_none());
        assert!(ctx.deadline().is_none());
    }

    #[tokio::test]
    async fn cancel_is_visible_through_clones() {
        let ctx = RequestContext::background();
        let clone = ctx.clone();
        ctx.cancel();
        assert_eq!(clone.err(), Some(ContextError::Canceled));
    }

    #[tokio::test]
    async fn child_follows_parent_but_not_the_reverse() {
        let parent = RequestContext::background();
        let child = parent.child();
        child.cancel();
        assert!(parent.err().is_none());

        let second = parent.child();
        parent.cancel();
        assert_eq!(second.err(), Some(ContextError::Canceled));
    }

    #[tokio::test]
    async fn expired_deadline_reports_deadline_exceeded() {
        let ctx = RequestContext::with_timeout(Duration::from_micros(1));
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(ctx.err(), Some(ContextError::DeadlineExceeded));
    }

    #[tokio::test]
    async fn cancellation_wins_over_deadline() {
        let ctx = RequestContext::with_timeout(Duration::from_micros(1));
        ctx.cancel();
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(ctx.err(), Some(ContextError::Canceled));
    }

    #[test]
    fn deadline_at_keeps_earliest() {
        let now = Instant::now();
        let early = now + Duration::from_secs(1);
        let late = now + Duration::from_secs(10);
        let ctx = RequestContext::with_deadline(early).deadline_at(late);
        assert_eq!(ctx.deadline(), Some(early));
    }

    #[tokio::test]
    async fn run_returns_output_when_live() {
        let ctx = RequestContext::background();
        let value = ctx.run(async { 7 }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn run_refuses_to_start_when_cancelled() {
        let ctx = RequestContext::background();
        ctx.cancel();
        let result = ctx.run(async { 7 }).await;
        assert_eq!(result, Err(ContextError::Canceled));
    }

    #[tokio::test]
    async fn run_aborts_slow_future_at_deadline() {
        let ctx = RequestContext::with_timeout(Duration::from_millis(20));
        let result = ctx
            .run(tokio::time::sleep(Duration::from_secs(5)))
            .await;
        assert_eq!(result, Err(ContextError::DeadlineExceeded));
    }

    #[tokio::test]
    async fn run_aborts_on_cancel_from_another_task() {
        let ctx = RequestContext::background();
        let canceller = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });
        let result = ctx
            .run(tokio::time::sleep(Duration::from_secs(5)))
            .await;
        assert_eq!(result, Err(ContextError::Canceled));
    }
}

//! Per-request cancellation and deadline
//!
//! Every service call takes a [`RequestContext`]. The repository future is
//! raced against the context's cancellation token and deadline; whichever
//! finishes first decides the outcome.

use std::future::Future;
use std::time::Duration;

use makoto_domain::errors::DomainResult;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::errors::{ApplicationError, ApplicationResult};

/// Cancellation token plus an optional deadline
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// A context that is never cancelled and has no deadline
    pub fn background() -> Self {
        Self::default()
    }

    /// A context whose deadline is `timeout` from now
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::background().deadline_at(Instant::now() + timeout)
    }

    /// A context cancelled through `token`
    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Replace the deadline; an earlier existing deadline is kept
    pub fn deadline_at(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) if current < deadline => current,
            _ => deadline,
        });
        self
    }

    /// A context cancelled with this one, sharing its deadline
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Drive `fut` to completion unless the context ends first
    pub async fn run<T, F>(&self, fut: F) -> ApplicationResult<T>
    where
        F: Future<Output = DomainResult<T>>,
    {
        if self.token.is_cancelled() {
            return Err(ApplicationError::Cancelled);
        }
        if self.deadline.is_some_and(|d| d <= Instant::now()) {
            return Err(ApplicationError::DeadlineExceeded);
        }

        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(ApplicationError::Cancelled),
            _ = expired => Err(ApplicationError::DeadlineExceeded),
            result = fut => result.map_err(ApplicationError::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use makoto_domain::errors::DomainError;

    #[tokio::test]
    async fn test_background_runs_to_completion() {
        let ctx = RequestContext::background();
        assert_eq!(ctx.run(async { Ok(7) }).await, Ok(7));
    }

    #[tokio::test]
    async fn test_domain_error_is_mapped() {
        let ctx = RequestContext::background();
        let result: ApplicationResult<()> =
            ctx.run(async { Err(DomainError::storage("memory", "gone")) }).await;
        assert!(matches!(result, Err(ApplicationError::Repository(_))));
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let ctx = RequestContext::background();
        ctx.cancel();
        assert_eq!(ctx.run(async { Ok(1) }).await, Err(ApplicationError::Cancelled));
    }

    #[tokio::test]
    async fn test_cancel_while_pending() {
        let ctx = RequestContext::background();
        let handle = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            handle.cancel();
        });
        let result: ApplicationResult<()> = ctx.run(std::future::pending()).await;
        assert_eq!(result, Err(ApplicationError::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_exceeded() {
        let ctx = RequestContext::with_timeout(Duration::from_secs(10));
        let result: ApplicationResult<()> = ctx.run(std::future::pending()).await;
        assert_eq!(result, Err(ApplicationError::DeadlineExceeded));
    }

    #[test]
    fn test_child_follows_parent_cancellation() {
        let parent = RequestContext::background();
        let child = parent.child();
        parent.cancel();
        assert!(child.is_cancelled());
    }

    #[test]
    fn test_earlier_deadline_wins() {
        let now = Instant::now();
        let ctx = RequestContext::background()
            .deadline_at(now + Duration::from_secs(1))
            .deadline_at(now + Duration::from_secs(5));
        assert_eq!(ctx.deadline(), Some(now + Duration::from_secs(1)));
    }
}

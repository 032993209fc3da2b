//! Retry with exponential backoff
//!
//! Not used by the feed controller itself: a failed round surfaces its error
//! and the user retries. Sources can be wrapped in `RetryingSource` when the
//! deployment wants transient upstream failures absorbed below the feed.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use crate::domain::ports::{Page, PageRequest, PagedSource};
use crate::error::DomainError;

/// Upper bound for a single backoff sleep
const MAX_BACKOFF: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Delay before retry number `attempt` (0-based): `base * 2^attempt`
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay
            .checked_mul(2_u32.saturating_pow(attempt))
            .unwrap_or(MAX_BACKOFF)
            .min(MAX_BACKOFF)
    }
}

/// Run `op` until it succeeds, fails permanently, or retries run out.
///
/// Only errors for which `DomainError::is_transient` holds are retried.
pub async fn retry_with_backoff<T, F, Fut>(policy: RetryPolicy, mut op: F) -> Result<T, DomainError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DomainError>>,
{
    let mut retries = 0;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                if retries >= policy.max_retries || !e.is_transient() {
                    return Err(e);
                }

                let delay = policy.backoff(retries);
                tracing::warn!(
                    "Source call failed, retrying after {}ms (attempt {}/{}): {}",
                    delay.as_millis(),
                    retries + 1,
                    policy.max_retries,
                    e
                );

                sleep(delay).await;
                retries += 1;
            }
        }
    }
}

/// A `PagedSource` that retries transient failures of the wrapped source
pub struct RetryingSource<S> {
    inner: S,
    policy: RetryPolicy,
}

impl<S> RetryingSource<S> {
    pub fn new(inner: S, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl<S> PagedSource for RetryingSource<S>
where
    S: PagedSource,
{
    type Item = S::Item;

    fn name(&self) -> &'static str {
        self.inner.name()
    }

    async fn fetch_page(&self, request: &PageRequest) -> Result<Page<Self::Item>, DomainError> {
        retry_with_backoff(self.policy, || self.inner.fetch_page(request)).await
    }
}

use crate::core::{Result, TagError};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Caller-supplied cancellation and timeout for one mutation call.
///
/// Checked before a transaction opens and raced against every awaited step
/// inside it, so a cancelled call rolls back instead of committing.
#[derive(Debug, Clone, Default)]
pub struct OperationContext {
    token: CancellationToken,
    timeout: Option<Duration>,
}

impl OperationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            timeout: None,
        }
    }

    /// Bound a whole call by `timeout`. A transaction scope takes one
    /// deadline when it starts and shares it between begin and the work.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn check(&self) -> Result<()> {
        if self.token.is_cancelled() {
            return Err(TagError::Cancelled("operation cancelled".into()));
        }
        Ok(())
    }

    /// Instant by which a call starting now must finish
    pub fn deadline(&self) -> Option<Instant> {
        self.timeout.map(|limit| Instant::now() + limit)
    }

    /// Run `fut` unless the context is cancelled or times out first.
    pub async fn run<F, T>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.run_until(self.deadline(), fut).await
    }

    /// Like [`OperationContext::run`], against a deadline fixed earlier.
    pub async fn run_until<F, T>(&self, deadline: Option<Instant>, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let guarded = async {
            tokio::select! {
                biased;
                _ = self.token.cancelled() => Err(TagError::Cancelled("operation cancelled".into())),
                result = fut => result,
            }
        };

        match deadline {
            Some(at) => tokio::time::timeout_at(at, guarded).await.map_err(|_| {
                TagError::Cancelled(format!(
                    "operation timed out after {:?}",
                    self.timeout.unwrap_or_default()
                ))
            })?,
            None => guarded.await,
        }
    }
}

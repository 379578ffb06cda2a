use crate::database::DbError;
use std::future::Future;
use std::time::Duration;
use tokio_retry::RetryIf;
use tokio_retry::strategy::FixedInterval;
use tracing::warn;

/// Bounded retry for idempotent reads that hit a transient connection error.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    #[must_use]
    pub const fn none() -> Self {
        Self {
            max_retries: 0,
            delay: Duration::ZERO,
        }
    }

    /// Run `op`, retrying at a fixed interval while the error is transient.
    pub async fn run<T, F, Fut>(&self, op_name: &str, op: F) -> Result<T, DbError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, DbError>>,
    {
        let strategy = FixedInterval::new(self.delay).take(self.max_retries as usize);
        RetryIf::spawn(strategy, op, |err: &DbError| {
            let transient = err.is_transient();
            if transient {
                warn!("Transient error in {}: {}", op_name, err);
            }
            transient
        })
        .await
    }
}

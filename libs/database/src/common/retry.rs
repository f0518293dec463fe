use std::future::Future;
use std::time::Duration;
use tracing::{error, warn};

/// Doubling backoff used while MongoDB is still coming up
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt; zero means a single attempt
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    /// Shorten each wait to a random 50-100% of the nominal delay
    pub jitter: bool,
}

impl RetryConfig {
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// Wait before retry number `retry` (counted from 1)
    pub fn delay_for(&self, retry: u32) -> Duration {
        let doublings = retry.saturating_sub(1).min(16);
        let nominal = self
            .initial_delay
            .saturating_mul(1 << doublings)
            .min(self.max_delay);

        if self.jitter {
            nominal.mul_f64(jitter_factor())
        } else {
            nominal
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
            jitter: true,
        }
    }
}

/// Run `operation` until it succeeds or the policy's retries are spent.
///
/// `what` names the operation in the logs. The error of the final attempt is
/// returned unchanged.
///
/// # Example
/// ```ignore
/// use database::common::{retry_with_backoff, RetryConfig};
///
/// let client = retry_with_backoff(
///     "mongodb connect",
///     || database::mongodb::connect("mongodb://localhost:27017"),
///     &RetryConfig::with_max_retries(10),
/// )
/// .await?;
/// ```
pub async fn retry_with_backoff<F, Fut, T, E>(
    what: &str,
    mut operation: F,
    policy: &RetryConfig,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    for retry in 1..=policy.max_retries {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                let wait = policy.delay_for(retry);
                warn!(
                    operation = what,
                    retry,
                    of = policy.max_retries,
                    wait_ms = wait.as_millis() as u64,
                    error = %e,
                    "Attempt failed, waiting before the next one"
                );
                tokio::time::sleep(wait).await;
            }
        }
    }

    operation().await.inspect_err(|e| {
        error!(operation = what, attempts = policy.max_retries + 1, error = %e, "Giving up");
    })
}

/// Random factor in `[0.5, 1.0)`
fn jitter_factor() -> f64 {
    use std::collections::hash_map::RandomState;
    use std::hash::BuildHasher;

    let bucket = RandomState::new().hash_one(std::time::SystemTime::now()) % 500;
    0.5 + bucket as f64 / 1000.0
}

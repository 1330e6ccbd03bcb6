use std::time::Duration;

use domain::errors::StoreError;
use tokio::time::sleep;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub backoff_multiplier: f64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 100,
            backoff_multiplier: 2.0,
            max_delay_ms: 5000,
        }
    }
}

/// Runs `operation` with exponential backoff. Only errors accepted by
/// `is_retryable` are retried.
pub async fn retry_with_backoff<F, Fut, T, E>(
    operation: F,
    config: &RetryConfig,
    is_retryable: impl Fn(&E) -> bool,
) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 0;
    let mut delay = config.initial_delay_ms;

    loop {
        attempt += 1;

        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    debug!("Operation succeeded on attempt {}", attempt);
                }
                return Ok(result);
            }
            Err(error) => {
                if attempt >= config.max_attempts {
                    warn!(
                        "Giving up after {} attempts. Error: {}",
                        config.max_attempts, error
                    );
                    return Err(error);
                }

                if !is_retryable(&error) {
                    debug!("Not retryable: {}", error);
                    return Err(error);
                }

                warn!("Retryable error, waiting {}ms. Error: {}", delay, error);

                sleep(Duration::from_millis(delay)).await;

                delay = ((delay as f64) * config.backoff_multiplier) as u64;
                delay = delay.min(config.max_delay_ms);
            }
        }
    }
}

/// Retry helper for DynamoDB calls: throttling and transient availability
/// errors are retried, everything else fails fast.
pub async fn retry_dynamodb_operation<F, Fut, T>(
    operation: F,
    config: Option<&RetryConfig>,
) -> Result<T, StoreError>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T, StoreError>>,
{
    let default_config = RetryConfig::default();
    let config = config.unwrap_or(&default_config);

    retry_with_backoff(operation, config, |error| {
        matches!(error,
            StoreError::DynamoDb(msg) if msg.contains("ThrottlingException")
                || msg.contains("ProvisionedThroughputExceeded")
                || msg.contains("ServiceUnavailable")
        )
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn succeeds_on_second_attempt() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let config = RetryConfig {
            max_attempts: 3,
            initial_delay_ms: 10,
            backoff_multiplier: 2.0,
            max_delay_ms: 100,
        };

        let result = retry_with_backoff(
            || {
                let counter = counter_clone.clone();
                async move {
                    let count = counter.fetch_add(1, Ordering::SeqCst);
                    if count == 0 {
                        Err("transient error")
                    } else {
                        Ok("done")
                    }
                }
            },
            &config,
            |_| true,
        )
        .await;

        assert_eq!(result, Ok("done"));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn fails_after_max_attempts() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let config = RetryConfig {
            max_attempts: 2,
            initial_delay_ms: 10,
            backoff_multiplier: 2.0,
            max_delay_ms: 100,
        };

        let result: Result<&str, &str> = retry_with_backoff(
            || {
                let counter = counter_clone.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err("always fails")
                }
            },
            &config,
            |_| true,
        )
        .await;

        assert_eq!(result, Err("always fails"));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn non_retryable_error_fails_fast() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let config = RetryConfig::default();

        let result: Result<&str, &str> = retry_with_backoff(
            || {
                let counter = counter_clone.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err("bad request")
                }
            },
            &config,
            |_| false,
        )
        .await;

        assert_eq!(result, Err("bad request"));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn dynamodb_helper_retries_throttling_only() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result: Result<(), StoreError> = retry_dynamodb_operation(
            || {
                let counter = counter_clone.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(StoreError::NotFound)
                }
            },
            None,
        )
        .await;

        assert!(matches!(result, Err(StoreError::NotFound)));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}

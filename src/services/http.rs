/// Shared outbound HTTP client with retry
///
/// One pooled `reqwest::Client` is built at startup and reused for every TMDB call. Each
/// attempt is bounded by connect and total timeouts; failed attempts are retried with
/// exponential backoff according to [`RetryPolicy`].
use std::time::Duration;

use reqwest::{Client as HttpClient, Response, StatusCode};

use crate::error::{AppError, AppResult};

const MAX_BACKOFF_SECS: u64 = 120;

/// When and how often to retry a request
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Attempts allowed after the first one
    pub max_retries: u32,
    /// Sleep before retry n is `backoff_factor * 2^(n-1)`
    pub backoff_factor: Duration,
    pub max_backoff: Duration,
    /// Response statuses that trigger a retry
    pub retry_statuses: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            backoff_factor: Duration::from_secs(1),
            max_backoff: Duration::from_secs(MAX_BACKOFF_SECS),
            retry_statuses: vec![500, 502, 504],
        }
    }
}

impl RetryPolicy {
    /// Delay before the given 1-based retry
    pub fn backoff(&self, retry: u32) -> Duration {
        if retry == 0 {
            return Duration::ZERO;
        }
        let multiplier = 2u32.saturating_pow(retry - 1);
        self.backoff_factor
            .saturating_mul(multiplier)
            .min(self.max_backoff)
    }

    pub fn is_retryable_status(&self, status: StatusCode) -> bool {
        self.retry_statuses.contains(&status.as_u16())
    }

    /// Connect failures, timeouts and failures while reading the response head
    pub fn is_retryable_error(err: &reqwest::Error) -> bool {
        err.is_connect() || err.is_timeout() || err.is_request()
    }
}

#[derive(Clone)]
pub struct RetryingClient {
    http_client: HttpClient,
    policy: RetryPolicy,
}

impl RetryingClient {
    /// Builds the pooled client with per-attempt timeouts
    pub fn new(
        policy: RetryPolicy,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(http_client, policy))
    }

    pub fn with_client(http_client: HttpClient, policy: RetryPolicy) -> Self {
        Self {
            http_client,
            policy,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// GET with retry
    ///
    /// Returns the first response whose status is not retryable. Once retries are exhausted
    /// the last response (or transport error) is returned as-is.
    pub async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<Response, reqwest::Error> {
        let mut retry = 0;

        loop {
            let result = self.http_client.get(url).query(query).send().await;
            let exhausted = retry >= self.policy.max_retries;

            // Hand back anything final; fall through only for retryable outcomes
            match result {
                Ok(response) if !exhausted && self.policy.is_retryable_status(response.status()) => {
                    tracing::warn!(
                        url = %url,
                        status = %response.status(),
                        retry = retry + 1,
                        max_retries = self.policy.max_retries,
                        "Retryable status, retrying"
                    );
                }
                Ok(response) => return Ok(response),
                Err(e) if !exhausted && RetryPolicy::is_retryable_error(&e) => {
                    tracing::warn!(
                        url = %url,
                        error = %e,
                        retry = retry + 1,
                        max_retries = self.policy.max_retries,
                        "Request failed, retrying"
                    );
                }
                Err(e) => return Err(e),
            }

            // Back off before the next attempt
            retry += 1;
            let delay = self.policy.backoff(retry);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 5);
        assert_eq!(policy.backoff_factor, Duration::from_secs(1));
        assert_eq!(policy.retry_statuses, vec![500, 502, 504]);
    }

    #[test]
    fn test_backoff_doubles_from_factor() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(0), Duration::ZERO);
        assert_eq!(policy.backoff(1), Duration::from_secs(1));
        assert_eq!(policy.backoff(2), Duration::from_secs(2));
        assert_eq!(policy.backoff(3), Duration::from_secs(4));
        assert_eq!(policy.backoff(5), Duration::from_secs(16));
    }

    #[test]
    fn test_backoff_is_capped() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(8), Duration::from_secs(MAX_BACKOFF_SECS));
        assert_eq!(policy.backoff(u32::MAX), Duration::from_secs(MAX_BACKOFF_SECS));
    }

    #[test]
    fn test_retryable_statuses() {
        let policy = RetryPolicy::default();
        assert!(policy.is_retryable_status(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(policy.is_retryable_status(StatusCode::BAD_GATEWAY));
        assert!(policy.is_retryable_status(StatusCode::GATEWAY_TIMEOUT));
        assert!(!policy.is_retryable_status(StatusCode::SERVICE_UNAVAILABLE));
        assert!(!policy.is_retryable_status(StatusCode::NOT_FOUND));
        assert!(!policy.is_retryable_status(StatusCode::OK));
    }
}

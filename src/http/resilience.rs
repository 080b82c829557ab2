// Timeout and retry settings for backend requests

use crate::config::ApiConfig;
use std::time::Duration;

/// How long an attempt may take and which responses earn a resend
#[derive(Debug, Clone, PartialEq)]
pub struct RequestPolicy {
    /// Armed separately for every attempt
    pub timeout: Duration,
    pub max_retries: usize,
    /// Fixed wait before each resend, no backoff
    pub retry_delay: Duration,
    pub retryable_statuses: Vec<u16>,
}

impl Default for RequestPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(30_000),
            max_retries: 1,
            retry_delay: Duration::from_millis(1_000),
            retryable_statuses: vec![502, 503, 504],
        }
    }
}

impl RequestPolicy {
    pub fn new(timeout: Duration, max_retries: usize, retry_delay: Duration) -> Self {
        Self {
            timeout,
            max_retries,
            retry_delay,
            ..Self::default()
        }
    }

    pub fn from_config(api: &ApiConfig) -> Self {
        Self {
            timeout: api.timeout(),
            max_retries: api.max_retries,
            retry_delay: api.retry_delay(),
            retryable_statuses: api.retryable_statuses.clone(),
        }
    }

    pub fn is_retryable(&self, status: u16) -> bool {
        self.retryable_statuses.contains(&status)
    }

    /// Whether a response with `status` should be resent, given how many
    /// retries this call has already made
    pub fn should_retry(&self, status: u16, retries_done: usize) -> bool {
        retries_done < self.max_retries && self.is_retryable(status)
    }
}

//! Wait configuration and its invariants.

use std::time::{Duration, Instant};

use crate::state::{ErrorCode, StateValue};

/// Configuration for one wait operation.
///
/// Two independent policies live here and compose in one wait:
/// fixed-interval polling toward `target` (bounded by `deadline`), and
/// exponential backoff applied only to probe failures whose code is listed
/// in `retry_on` (bounded by `max_retries`).
///
/// A config is built immediately before a wait and owns no external
/// resources.
#[derive(Debug, Clone)]
pub struct WaitConfig {
    /// State that satisfies the wait.
    pub target: StateValue,
    /// Fixed delay between probes on the polling path.
    pub poll_interval: Duration,
    /// Absolute cutoff for the polling path. `None` waits indefinitely.
    pub deadline: Option<Instant>,
    /// Error codes retried with backoff instead of failing the wait.
    /// Empty means every probe failure is fatal.
    pub retry_on: Vec<ErrorCode>,
    /// First backoff delay.
    pub backoff_initial: Duration,
    /// Growth factor applied to the backoff delay after each retry.
    pub backoff_multiplier: f64,
    /// Cap on the backoff delay.
    pub backoff_ceiling: Duration,
    /// Number of backoff retries before giving up.
    pub max_retries: u32,
}

impl WaitConfig {
    pub fn new(target: impl Into<StateValue>) -> Self {
        Self {
            target: target.into(),
            poll_interval: Duration::from_secs(1),
            deadline: None,
            retry_on: Vec::new(),
            backoff_initial: Duration::from_secs(3),
            backoff_multiplier: 3.0,
            backoff_ceiling: Duration::from_secs(20),
            max_retries: 5,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Set the deadline relative to now.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    /// Add an error code to retry with backoff.
    pub fn with_retry_on(mut self, code: impl Into<ErrorCode>) -> Self {
        self.retry_on.push(code.into());
        self
    }

    pub fn with_backoff(mut self, initial: Duration, multiplier: f64, ceiling: Duration) -> Self {
        self.backoff_initial = initial;
        self.backoff_multiplier = multiplier;
        self.backoff_ceiling = ceiling;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn is_retryable(&self, code: &ErrorCode) -> bool {
        self.retry_on.contains(code)
    }

    /// Check the config invariants. Called by `StatusWaiter` construction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval.is_zero() {
            return Err(ConfigError::ZeroPollInterval);
        }
        if !self.retry_on.is_empty() {
            if self.backoff_initial.is_zero() {
                return Err(ConfigError::ZeroBackoffInitial);
            }
            if !self.backoff_multiplier.is_finite() {
                return Err(ConfigError::NonFiniteMultiplier(self.backoff_multiplier));
            }
            if self.backoff_multiplier <= 1.0 {
                return Err(ConfigError::MultiplierTooSmall(self.backoff_multiplier));
            }
            if self.max_retries == 0 {
                return Err(ConfigError::ZeroRetryBudget);
            }
        }
        Ok(())
    }
}

/// Invalid wait configuration, rejected before any probe is issued.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("poll_interval must be greater than zero")]
    ZeroPollInterval,
    #[error("backoff_initial must be greater than zero when retryable codes are set")]
    ZeroBackoffInitial,
    #[error("backoff_multiplier must be greater than 1.0 when retryable codes are set, got {0}")]
    MultiplierTooSmall(f64),
    #[error("backoff_multiplier must be finite when retryable codes are set, got {0}")]
    NonFiniteMultiplier(f64),
    #[error("max_retries must be greater than zero when retryable codes are set")]
    ZeroRetryBudget,
}

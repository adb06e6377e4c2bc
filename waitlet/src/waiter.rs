//! The polling wait loop.
//!
//! One `wait_for` call bridges an asynchronous provisioning operation to a
//! synchronous caller expectation: probe, compare against the target state,
//! sleep, repeat. Probe failures whose code is whitelisted in the config are
//! retried on their own backoff schedule instead of failing the wait.

use std::future::Future;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use crate::backoff::BackoffSchedule;
use crate::config::{ConfigError, WaitConfig};
use crate::error::WaitError;
use crate::outcome::PollOutcome;
use crate::state::{ProbeError, StateValue};

/// Blocks a caller until a probed resource reaches the configured target
/// state.
///
/// The waiter keeps no state across invocations: each `wait_for` call is an
/// independent wait, and independent waits may run concurrently on separate
/// tasks. Probes within one wait are strictly sequential.
#[derive(Debug)]
pub struct StatusWaiter {
    config: WaitConfig,
    cancel_token: CancellationToken,
}

impl StatusWaiter {
    /// Create a waiter with its own cancellation token.
    ///
    /// Rejects configs that violate the wait invariants (zero poll interval,
    /// non-growing backoff with retryable codes set).
    pub fn new(config: WaitConfig) -> Result<Self, ConfigError> {
        Self::with_cancel_token(config, CancellationToken::new())
    }

    /// Create a waiter sharing an externally owned cancellation token.
    pub fn with_cancel_token(
        config: WaitConfig,
        cancel_token: CancellationToken,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            cancel_token,
        })
    }

    pub fn config(&self) -> &WaitConfig {
        &self.config
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Probe until the target state is reached, the deadline passes, the
    /// backoff budget is spent, or the wait is cancelled.
    ///
    /// The probe is invoked repeatedly; each invocation is one external
    /// status query. Success returns as soon as a probe reports the target,
    /// with no confirmation round.
    pub async fn wait_for<P, Fut>(&self, mut probe: P) -> Result<(), WaitError>
    where
        P: FnMut() -> Fut,
        Fut: Future<Output = Result<StateValue, ProbeError>>,
    {
        let mut backoff = BackoffSchedule::from_config(&self.config);

        loop {
            if self.cancel_token.is_cancelled() {
                return Err(WaitError::Cancelled);
            }

            match PollOutcome::evaluate(probe().await, &self.config.target) {
                PollOutcome::Reached(state) => {
                    tracing::debug!(state = %state, "target state reached");
                    return Ok(());
                }
                PollOutcome::NotYet(state) => {
                    if self.deadline_passed() {
                        return Err(WaitError::Timeout {
                            target: self.config.target.clone(),
                            last_state: Some(state),
                        });
                    }
                    tracing::debug!(
                        state = %state,
                        target = %self.config.target,
                        "target state not yet reached, polling"
                    );
                    self.sleep(self.config.poll_interval).await?;
                }
                PollOutcome::Failed(err) if self.config.is_retryable(&err.code) => {
                    match backoff.next_delay() {
                        Some(delay) => {
                            tracing::warn!(
                                error = %err,
                                delay_ms = delay.as_millis() as u64,
                                "retryable probe failure, backing off"
                            );
                            self.sleep(delay).await?;
                        }
                        None => {
                            return Err(WaitError::RetriesExhausted {
                                attempts: backoff.attempts(),
                                cause: err,
                            });
                        }
                    }
                }
                PollOutcome::Failed(err) => {
                    return Err(WaitError::ProbeFailed(err));
                }
            }
        }
    }

    /// Blocking variant of [`wait_for`](Self::wait_for) for callers outside
    /// an async runtime. Same state machine with thread sleeps; cancellation
    /// is observed between sleep slices.
    pub fn wait_for_blocking<P>(&self, mut probe: P) -> Result<(), WaitError>
    where
        P: FnMut() -> Result<StateValue, ProbeError>,
    {
        let mut backoff = BackoffSchedule::from_config(&self.config);

        loop {
            if self.cancel_token.is_cancelled() {
                return Err(WaitError::Cancelled);
            }

            match PollOutcome::evaluate(probe(), &self.config.target) {
                PollOutcome::Reached(state) => {
                    tracing::debug!(state = %state, "target state reached");
                    return Ok(());
                }
                PollOutcome::NotYet(state) => {
                    if self.deadline_passed() {
                        return Err(WaitError::Timeout {
                            target: self.config.target.clone(),
                            last_state: Some(state),
                        });
                    }
                    tracing::debug!(
                        state = %state,
                        target = %self.config.target,
                        "target state not yet reached, polling"
                    );
                    self.sleep_blocking(self.config.poll_interval)?;
                }
                PollOutcome::Failed(err) if self.config.is_retryable(&err.code) => {
                    match backoff.next_delay() {
                        Some(delay) => {
                            tracing::warn!(
                                error = %err,
                                delay_ms = delay.as_millis() as u64,
                                "retryable probe failure, backing off"
                            );
                            self.sleep_blocking(delay)?;
                        }
                        None => {
                            return Err(WaitError::RetriesExhausted {
                                attempts: backoff.attempts(),
                                cause: err,
                            });
                        }
                    }
                }
                PollOutcome::Failed(err) => {
                    return Err(WaitError::ProbeFailed(err));
                }
            }
        }
    }

    fn deadline_passed(&self) -> bool {
        self.config
            .deadline
            .is_some_and(|deadline| Instant::now() >= deadline)
    }

    async fn sleep(&self, duration: Duration) -> Result<(), WaitError> {
        tokio::select! {
            () = self.cancel_token.cancelled() => Err(WaitError::Cancelled),
            () = tokio::time::sleep(duration) => Ok(()),
        }
    }

    fn sleep_blocking(&self, duration: Duration) -> Result<(), WaitError> {
        // Sleep in slices so an external cancel is noticed without waiting
        // out the full interval.
        const SLICE: Duration = Duration::from_millis(100);

        let wake_at = Instant::now() + duration;
        loop {
            if self.cancel_token.is_cancelled() {
                return Err(WaitError::Cancelled);
            }
            let now = Instant::now();
            if now >= wake_at {
                return Ok(());
            }
            std::thread::sleep(SLICE.min(wake_at - now));
        }
    }
}

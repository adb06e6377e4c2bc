//! Wait failure taxonomy.

use crate::state::{ProbeError, StateValue};

/// Terminal failure of a wait.
///
/// Every variant is returned to the caller; the waiter never retries past
/// what the config allows and never escalates to a panic, so cleanup code
/// can decide per variant whether to continue.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WaitError {
    /// The deadline passed before the target state was observed.
    #[error("timed out waiting for state \"{target}\"")]
    Timeout {
        target: StateValue,
        /// State reported by the probe that detected the timeout.
        last_state: Option<StateValue>,
    },

    /// The backoff budget was spent on a retryable failure.
    ///
    /// Whether this is fatal or a "proceed without the resource" signal is
    /// the caller's decision; the causing failure is carried rather than
    /// discarded.
    #[error("retries exhausted after {attempts} attempts: {cause}")]
    RetriesExhausted { attempts: u32, cause: ProbeError },

    /// The wait was cancelled through its token.
    #[error("wait cancelled")]
    Cancelled,

    /// The probe failed with an error outside the retryable set.
    #[error("probe failed: {0}")]
    ProbeFailed(#[from] ProbeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_display_names_target() {
        let err = WaitError::Timeout {
            target: StateValue::new("ACTIVE"),
            last_state: Some(StateValue::new("CREATING")),
        };
        assert_eq!(err.to_string(), "timed out waiting for state \"ACTIVE\"");
    }

    #[test]
    fn retries_exhausted_display_carries_cause() {
        let err = WaitError::RetriesExhausted {
            attempts: 3,
            cause: ProbeError::new("AccessDenied", "role not yet assumable"),
        };
        assert_eq!(
            err.to_string(),
            "retries exhausted after 3 attempts: AccessDenied: role not yet assumable"
        );
    }

    #[test]
    fn probe_error_converts_to_probe_failed() {
        let err: WaitError = ProbeError::new("ValidationError", "no such table").into();
        assert!(matches!(err, WaitError::ProbeFailed(_)));
    }
}

//! One probe's result, evaluated against the wait target.

use serde::{Deserialize, Serialize};

use crate::state::{ProbeError, StateValue};

/// Result of a single status probe relative to a target state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollOutcome {
    /// The probe reported the target state; the wait is satisfied.
    Reached(StateValue),
    /// The probe reported a well-formed state other than the target.
    NotYet(StateValue),
    /// The probe failed.
    Failed(ProbeError),
}

impl PollOutcome {
    /// Classify a raw probe result against the target the wait is after.
    pub fn evaluate(result: Result<StateValue, ProbeError>, target: &StateValue) -> Self {
        match result {
            Ok(state) if state == *target => Self::Reached(state),
            Ok(state) => Self::NotYet(state),
            Err(err) => Self::Failed(err),
        }
    }

    pub fn is_reached(&self) -> bool {
        matches!(self, Self::Reached(_))
    }
}

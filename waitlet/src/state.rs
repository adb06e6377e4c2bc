//! Probe-facing value types: discrete resource states and classified failures.

use serde::{Deserialize, Serialize};

/// Discrete state of a polled resource, as reported by a probe.
///
/// Callers map their service's status strings into this type ("ACTIVE",
/// "CREATING", or a sentinel like "NOTFOUND" for a resource that no longer
/// exists). The waiter only ever compares states for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateValue(String);

impl StateValue {
    pub fn new(state: impl Into<String>) -> Self {
        Self(state.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StateValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StateValue {
    fn from(state: &str) -> Self {
        Self(state.to_string())
    }
}

impl From<String> for StateValue {
    fn from(state: String) -> Self {
        Self(state)
    }
}

/// Opaque error class attached to a probe failure (e.g. "AccessDenied").
///
/// The waiter compares codes against the configured retryable set; it never
/// interprets them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorCode(String);

impl ErrorCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ErrorCode {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

impl From<String> for ErrorCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

/// Failure reported by a probe.
///
/// Callers map their service's exception shapes into this, putting the
/// class that identifies the failure (and nothing else) into `code`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{code}: {message}")]
pub struct ProbeError {
    pub code: ErrorCode,
    pub message: String,
}

impl ProbeError {
    pub fn new(code: impl Into<ErrorCode>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_value_compares_by_content() {
        assert_eq!(StateValue::new("ACTIVE"), StateValue::from("ACTIVE"));
        assert_ne!(StateValue::new("ACTIVE"), StateValue::new("CREATING"));
    }

    #[test]
    fn state_value_displays_raw() {
        assert_eq!(StateValue::new("NOTFOUND").to_string(), "NOTFOUND");
    }

    #[test]
    fn state_value_serializes_transparent() {
        let state = StateValue::new("ACTIVE");
        assert_eq!(serde_json::to_string(&state).unwrap(), "\"ACTIVE\"");
        assert_eq!(
            serde_json::from_str::<StateValue>("\"ACTIVE\"").unwrap(),
            state
        );
    }

    #[test]
    fn probe_error_display_includes_code_and_message() {
        let err = ProbeError::new("AccessDenied", "not authorized to perform sts:AssumeRole");
        assert_eq!(
            err.to_string(),
            "AccessDenied: not authorized to perform sts:AssumeRole"
        );
    }

    #[test]
    fn error_code_compares_by_content() {
        let err = ProbeError::new("AccessDenied", "whatever");
        assert_eq!(err.code, ErrorCode::new("AccessDenied"));
        assert_ne!(err.code, ErrorCode::new("Throttled"));
    }
}

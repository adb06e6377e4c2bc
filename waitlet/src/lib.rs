//! waitlet: polling waiter for eventually-consistent resources.
//!
//! Bridges asynchronous provisioning operations (a table becoming ACTIVE, a
//! deleted resource disappearing, a role permission propagating) to callers
//! that need to block until the resource reaches a target state. One
//! primitive covers both observed shapes: fixed-interval polling with an
//! optional deadline, and exponential backoff on a whitelisted transient
//! failure class with a fixed retry budget.

mod backoff;
mod config;
mod error;
mod outcome;
mod state;
mod waiter;

pub use tokio_util::sync::CancellationToken;

pub use backoff::BackoffSchedule;
pub use config::{ConfigError, WaitConfig};
pub use error::WaitError;
pub use outcome::PollOutcome;
pub use state::{ErrorCode, ProbeError, StateValue};
pub use waiter::StatusWaiter;

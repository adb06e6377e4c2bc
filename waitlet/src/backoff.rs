//! Retry delay schedule for transient probe failures.

use std::time::Duration;

use crate::config::WaitConfig;

/// Growing delay schedule: `initial, initial * multiplier, ...`, capped at
/// `ceiling`, exhausted after `max_retries` delays have been handed out.
///
/// One schedule lives for one wait invocation; the polling cadence never
/// touches it.
#[derive(Debug)]
pub struct BackoffSchedule {
    next: Duration,
    multiplier: f64,
    ceiling: Duration,
    remaining: u32,
    attempts: u32,
}

impl BackoffSchedule {
    pub fn new(initial: Duration, multiplier: f64, ceiling: Duration, max_retries: u32) -> Self {
        Self {
            next: initial.min(ceiling),
            multiplier,
            ceiling,
            remaining: max_retries,
            attempts: 0,
        }
    }

    pub fn from_config(config: &WaitConfig) -> Self {
        Self::new(
            config.backoff_initial,
            config.backoff_multiplier,
            config.backoff_ceiling,
            config.max_retries,
        )
    }

    /// Hand out the next retry delay, or `None` once the budget is spent.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.attempts += 1;
        let delay = self.next;
        // Grow in f64 seconds and clamp before converting back, so a large
        // multiplier saturates at the ceiling instead of overflowing
        // `Duration`.
        let scaled = delay.as_secs_f64() * self.multiplier;
        self.next = if scaled.is_finite() {
            Duration::from_secs_f64(scaled.clamp(0.0, self.ceiling.as_secs_f64()))
        } else {
            self.ceiling
        };
        Some(delay)
    }

    /// Number of retry delays handed out so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn delays_grow_geometrically_and_cap_at_ceiling() {
        let mut schedule = BackoffSchedule::new(secs(3), 3.0, secs(20), 5);
        assert_eq!(schedule.next_delay(), Some(secs(3)));
        assert_eq!(schedule.next_delay(), Some(secs(9)));
        assert_eq!(schedule.next_delay(), Some(secs(20)));
        assert_eq!(schedule.next_delay(), Some(secs(20)));
        assert_eq!(schedule.next_delay(), Some(secs(20)));
        assert_eq!(schedule.next_delay(), None);
    }

    #[test]
    fn budget_bounds_delay_count() {
        let mut schedule = BackoffSchedule::new(secs(1), 2.0, secs(60), 2);
        assert!(schedule.next_delay().is_some());
        assert!(schedule.next_delay().is_some());
        assert_eq!(schedule.next_delay(), None);
        // Exhaustion is stable.
        assert_eq!(schedule.next_delay(), None);
        assert_eq!(schedule.attempts(), 2);
    }

    #[test]
    fn initial_above_ceiling_is_capped() {
        let mut schedule = BackoffSchedule::new(secs(30), 2.0, secs(20), 3);
        assert_eq!(schedule.next_delay(), Some(secs(20)));
        assert_eq!(schedule.next_delay(), Some(secs(20)));
    }

    #[test]
    fn attempts_counts_only_handed_out_delays() {
        let mut schedule = BackoffSchedule::new(secs(1), 2.0, secs(8), 4);
        assert_eq!(schedule.attempts(), 0);
        schedule.next_delay();
        assert_eq!(schedule.attempts(), 1);
        schedule.next_delay();
        schedule.next_delay();
        assert_eq!(schedule.attempts(), 3);
    }

    #[test]
    fn huge_multiplier_saturates_at_ceiling() {
        let mut schedule = BackoffSchedule::new(secs(3), f64::MAX, secs(20), 3);
        assert_eq!(schedule.next_delay(), Some(secs(3)));
        assert_eq!(schedule.next_delay(), Some(secs(20)));
        assert_eq!(schedule.next_delay(), Some(secs(20)));
        assert_eq!(schedule.next_delay(), None);
    }

    #[test]
    fn non_finite_growth_falls_back_to_ceiling() {
        // Config validation rejects these multipliers, but a directly built
        // schedule must still never overflow `Duration`.
        let mut schedule = BackoffSchedule::new(secs(3), f64::NAN, secs(20), 2);
        assert_eq!(schedule.next_delay(), Some(secs(3)));
        assert_eq!(schedule.next_delay(), Some(secs(20)));

        let mut schedule = BackoffSchedule::new(secs(3), f64::INFINITY, secs(20), 2);
        assert_eq!(schedule.next_delay(), Some(secs(3)));
        assert_eq!(schedule.next_delay(), Some(secs(20)));
    }

    #[test]
    fn fractional_multiplier_growth() {
        let mut schedule = BackoffSchedule::new(Duration::from_millis(100), 1.5, secs(1), 3);
        assert_eq!(schedule.next_delay(), Some(Duration::from_millis(100)));
        assert_eq!(schedule.next_delay(), Some(Duration::from_millis(150)));
        assert_eq!(schedule.next_delay(), Some(Duration::from_millis(225)));
    }
}

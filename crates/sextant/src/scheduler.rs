//! Externally clocked repeating tasks.
//!
//! Nothing here reads a clock. The owner reports elapsed time through
//! [`RepeatingTask::advance`] and receives the number of intervals that
//! completed, so playback is reproducible in tests and hosts decide how time
//! flows.

use std::time::Duration;

use log::{debug, trace};

/// A task that fires once per `interval` until cancelled.
///
/// # Examples
///
/// ```
/// # use std::time::Duration;
/// # use sextant::scheduler::RepeatingTask;
/// let mut task = RepeatingTask::new(Duration::from_millis(220));
/// assert_eq!(task.advance(Duration::from_millis(500)), 2);
/// assert_eq!(task.advance(Duration::from_millis(160)), 1);
///
/// task.cancel();
/// assert_eq!(task.advance(Duration::from_secs(10)), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatingTask {
    interval: Duration,
    /// Time accumulated since the last tick
    pending: Duration,
    fired: u64,
    cancelled: bool,
}

impl RepeatingTask {
    /// Creates a running task. A zero interval never fires.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            pending: Duration::ZERO,
            fired: 0,
            cancelled: false,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Total number of ticks fired so far
    pub fn fired(&self) -> u64 {
        self.fired
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Accounts for `elapsed` time and returns how many ticks became due.
    ///
    /// The count saturates at `u32::MAX`; ticks beyond that are dropped.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if self.cancelled || self.interval.is_zero() {
            return 0;
        }

        self.pending = self.pending.saturating_add(elapsed);
        let interval = self.interval.as_nanos();
        let pending = self.pending.as_nanos();
        if pending < interval {
            return 0;
        }

        let due = u32::try_from(pending / interval).unwrap_or(u32::MAX);
        self.pending = duration_from_nanos(pending % interval);
        self.fired = self.fired.saturating_add(u64::from(due));
        trace!(due, fired = self.fired; "Repeating task ticked");
        due
    }

    /// Stops the task; further calls are no-ops.
    pub fn cancel(&mut self) {
        if !self.cancelled {
            debug!(fired = self.fired; "Repeating task cancelled");
        }
        self.cancelled = true;
        self.pending = Duration::ZERO;
    }
}

/// Rebuilds a duration shorter than some existing `Duration`
fn duration_from_nanos(nanos: u128) -> Duration {
    const NANOS_PER_SEC: u128 = 1_000_000_000;
    let secs = u64::try_from(nanos / NANOS_PER_SEC).unwrap_or(u64::MAX);
    // The remainder is below one second, so it fits in u32
    Duration::new(secs, (nanos % NANOS_PER_SEC) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(220);

    #[test]
    fn test_partial_intervals_accumulate() {
        let mut task = RepeatingTask::new(INTERVAL);
        assert_eq!(task.advance(Duration::from_millis(100)), 0);
        assert_eq!(task.advance(Duration::from_millis(100)), 0);
        assert_eq!(task.advance(Duration::from_millis(20)), 1);
        assert_eq!(task.fired(), 1);
    }

    #[test]
    fn test_large_step_fires_every_due_tick() {
        let mut task = RepeatingTask::new(INTERVAL);
        assert_eq!(task.advance(Duration::from_millis(1_000)), 4);
        // 1000 - 4 * 220 = 120 carried over
        assert_eq!(task.advance(Duration::from_millis(100)), 1);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut task = RepeatingTask::new(INTERVAL);
        task.advance(Duration::from_millis(200));
        task.cancel();
        task.cancel();
        assert!(task.is_cancelled());
        assert_eq!(task.advance(Duration::from_millis(400)), 0);
        assert_eq!(task.fired(), 0);
    }

    #[test]
    fn test_zero_interval_never_fires() {
        let mut task = RepeatingTask::new(Duration::ZERO);
        assert_eq!(task.advance(Duration::from_secs(1)), 0);
    }

    #[test]
    fn test_huge_elapsed_saturates() {
        let mut task = RepeatingTask::new(Duration::from_secs(u64::MAX));
        assert_eq!(task.advance(Duration::from_secs(1)), 0);
        assert_eq!(task.advance(Duration::MAX), 1);

        let mut fast = RepeatingTask::new(Duration::from_nanos(1));
        assert_eq!(fast.advance(Duration::MAX), u32::MAX);
        assert_eq!(fast.advance(Duration::MAX), u32::MAX);
        assert_eq!(fast.fired(), 2 * u64::from(u32::MAX));
    }

    #[test]
    fn test_remainder_keeps_sub_second_precision() {
        let mut task = RepeatingTask::new(Duration::from_millis(1_500));
        assert_eq!(task.advance(Duration::from_millis(3_700)), 2);
        assert_eq!(task.advance(Duration::from_millis(799)), 0);
        assert_eq!(task.advance(Duration::from_millis(1)), 1);
    }
}

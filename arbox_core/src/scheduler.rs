// arbox_core/src/scheduler.rs

//! A virtual-time scheduler for cancellable periodic tasks.
//!
//! Time only moves when the owner calls [`IntervalScheduler::advance`], so the
//! host decides where the clock comes from (a frame delta, a test, a replay).

use std::collections::BTreeMap;
use std::time::Duration;

use crate::error::SchedulerError;

/// Identifies one started interval. Handles are never reused, so a handle
/// that has been cancelled stays dead forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn id(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone)]
struct IntervalTask {
    period: Duration,
    // Absolute virtual time of the next firing.
    next_due: Duration,
}

#[derive(Debug, Clone, Default)]
pub struct IntervalScheduler {
    tasks: BTreeMap<TimerHandle, IntervalTask>,
    next_handle: u64,
    now: Duration,
}

impl IntervalScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time since the scheduler was created.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Starts a repeating task. The first firing happens one full `period`
    /// after the current virtual time.
    pub fn start_interval(&mut self, period: Duration) -> Result<TimerHandle, SchedulerError> {
        if period.is_zero() {
            return Err(SchedulerError::ZeroPeriod);
        }

        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.tasks.insert(
            handle,
            IntervalTask {
                period,
                next_due: self.now + period,
            },
        );
        Ok(handle)
    }

    /// Cancels a task. Returns `false` if the handle was not active.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.tasks.remove(&handle).is_some()
    }

    /// Cancels every task and returns how many were active.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.tasks.len();
        self.tasks.clear();
        count
    }

    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.tasks.contains_key(&handle)
    }

    pub fn active_count(&self) -> usize {
        self.tasks.len()
    }

    /// Moves virtual time forward by `dt` and returns every firing that falls
    /// inside `(now, now + dt]`, in chronological order. Simultaneous firings
    /// are ordered by handle.
    pub fn advance(&mut self, dt: Duration) -> Vec<TimerHandle> {
        let target = self.now + dt;
        let mut fired: Vec<(Duration, TimerHandle)> = Vec::new();

        for (&handle, task) in self.tasks.iter_mut() {
            while task.next_due <= target {
                fired.push((task.next_due, handle));
                task.next_due += task.period;
            }
        }

        self.now = target;
        fired.sort();
        fired.into_iter().map(|(_, handle)| handle).collect()
    }
}

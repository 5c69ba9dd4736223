//! Periodic re-check timer owned by the controller.
//!
//! The timer is logical: it only records when the next tick is due. The
//! session's event loop sleeps until that instant and then calls
//! `ThrottleController::check_expiration`. Ticks are rescheduled from the time
//! they actually ran, so a late tick shifts the schedule instead of bunching up.

use std::time::Duration;

use crate::clock::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodicTimer {
    period: Duration,
    next_due: Timestamp,
}

impl PeriodicTimer {
    pub(super) fn start(period: Duration, now: Timestamp) -> Self {
        Self {
            period,
            next_due: now.saturating_add(period),
        }
    }

    pub(super) fn reschedule(&mut self, now: Timestamp) {
        self.next_due = now.saturating_add(self.period);
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn next_due(&self) -> Timestamp {
        self.next_due
    }
}

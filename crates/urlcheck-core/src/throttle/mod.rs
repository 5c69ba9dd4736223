//! Request throttle state machine.
//!
//! The controller admits up to `request_limit` submissions, then persists an
//! absolute expiration (`now + throttle_period`) and rejects everything until
//! that instant has passed. Quota state is split in two:
//!
//! - an in-memory counter (cheap, lost on restart unless counter persistence
//!   is enabled)
//! - the persisted expiration, which is authoritative for whether throttling
//!   is active and survives restarts
//!
//! An expired throttle is cleared on two independent paths: the next
//! submission reconciles a stale expiration, and a periodic timer armed while
//! throttled re-checks it without user input. Storage is re-read before every
//! decision because other sessions may share it.

mod notice;
mod timer;

use std::sync::Arc;
use std::time::Duration;

use crate::clock::{Clock, Timestamp};
use crate::config::ThrottleConfig;
use crate::gate::InputGate;
use crate::result::{CheckResult, ResultSink};
use crate::storage::ThrottleStore;

pub use notice::{throttled_result, wait_message, wait_message_in, THROTTLED_MESSAGE};
pub use timer::PeriodicTimer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleState {
    Admitting,
    Throttled,
}

/// What to do with a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Within quota: send this input to the transport.
    Forward(String),
    /// Rejected; the notice has already been sent to the sink.
    Throttled(CheckResult),
}

/// Outcome of one timer tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not throttled; nothing to do.
    Idle,
    /// Expiration still in the future; timer rescheduled.
    StillThrottled,
    /// Throttle cleared, input re-enabled.
    Released,
}

/// Point-in-time view for status output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleStatus {
    pub state: ThrottleState,
    pub request_count: u32,
    pub request_limit: u32,
    pub expiration: Option<Timestamp>,
    pub remaining: Option<Duration>,
}

/// Read-only view of persisted throttle state, for callers that must not
/// reconcile it. A stale expiration is reported as not throttled but left in
/// storage for the next session to clear.
pub fn inspect(cfg: &ThrottleConfig, store: &ThrottleStore, now: Timestamp) -> ThrottleStatus {
    let expiration = store.expiration();
    let pending = expiration.filter(|e| now < *e);
    let request_count = if cfg.persist_request_count {
        store.request_count().unwrap_or(0)
    } else {
        0
    };
    ThrottleStatus {
        state: if pending.is_some() {
            ThrottleState::Throttled
        } else {
            ThrottleState::Admitting
        },
        request_count,
        request_limit: cfg.request_limit,
        expiration,
        remaining: pending.map(|e| now.until(e)),
    }
}

pub struct ThrottleController {
    cfg: ThrottleConfig,
    clock: Arc<dyn Clock>,
    store: ThrottleStore,
    counter: u32,
    state: ThrottleState,
    gate: InputGate,
    timer: Option<PeriodicTimer>,
}

impl ThrottleController {
    /// Build a controller and recover from persisted state: a pending
    /// expiration starts the controller throttled, a stale one is cleared.
    pub fn new(cfg: ThrottleConfig, clock: impl Clock + 'static, store: ThrottleStore) -> Self {
        let mut controller = Self {
            cfg,
            clock: Arc::new(clock),
            store,
            counter: 0,
            state: ThrottleState::Admitting,
            gate: InputGate::default(),
            timer: None,
        };
        if cfg.persist_request_count {
            controller.counter = controller.store.request_count().unwrap_or(0);
        }

        let now = controller.clock.now();
        match controller.store.expiration() {
            Some(expiration) if now < expiration => {
                tracing::info!(%expiration, "persisted throttle still active, starting throttled");
                controller.state = ThrottleState::Throttled;
                controller.gate.disable();
                controller.arm_timer(now);
            }
            Some(expiration) => {
                tracing::debug!(%expiration, "clearing stale throttle expiration at startup");
                controller.store.clear_expiration();
                controller.reset_counter();
            }
            None => {}
        }
        controller
    }

    pub fn state(&self) -> ThrottleState {
        self.state
    }

    pub fn request_count(&self) -> u32 {
        self.counter
    }

    pub fn config(&self) -> &ThrottleConfig {
        &self.cfg
    }

    pub fn gate(&self) -> &InputGate {
        &self.gate
    }

    pub fn input_enabled(&self) -> bool {
        self.gate.is_enabled()
    }

    pub fn timer(&self) -> Option<&PeriodicTimer> {
        self.timer.as_ref()
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Time until the armed timer is due (zero if overdue); `None` when no
    /// timer is armed.
    pub fn until_next_tick(&self) -> Option<Duration> {
        let timer = self.timer.as_ref()?;
        Some(self.clock.now().until(timer.next_due()))
    }

    pub fn status(&self) -> ThrottleStatus {
        let now = self.clock.now();
        let expiration = self.store.expiration();
        ThrottleStatus {
            state: self.state,
            request_count: self.counter,
            request_limit: self.cfg.request_limit,
            expiration,
            remaining: expiration.filter(|e| now < *e).map(|e| now.until(e)),
        }
    }

    /// Re-show the throttle notice, e.g. when a session starts throttled.
    pub fn show_pending_notice(&self, sink: &mut dyn ResultSink) {
        if self.state != ThrottleState::Throttled {
            return;
        }
        if let Some(expiration) = self.store.expiration() {
            sink.notify(THROTTLED_MESSAGE);
            sink.render(&throttled_result("", expiration));
        }
    }

    /// Handle one submission of input that already passed URL validation.
    pub fn submit(&mut self, input: &str, sink: &mut dyn ResultSink) -> Admission {
        let now = self.clock.now();
        let mut pending = self.store.expiration();

        match pending {
            Some(expiration) if now >= expiration => {
                tracing::debug!(%expiration, "reconciling stale throttle expiration on submit");
                self.release(sink);
                pending = None;
            }
            None if self.state == ThrottleState::Throttled => {
                // Another session sharing the store cleared it.
                tracing::debug!("throttle expiration vanished from storage, releasing");
                self.release(sink);
            }
            _ => {}
        }

        self.counter = self.counter.saturating_add(1);
        self.persist_counter();

        match pending {
            None if self.counter <= self.cfg.request_limit => {
                tracing::debug!(count = self.counter, limit = self.cfg.request_limit, "submission admitted");
                Admission::Forward(input.to_string())
            }
            None => {
                let expiration = now.saturating_add(self.cfg.throttle_period);
                self.store.set_expiration(expiration);
                tracing::info!(
                    count = self.counter,
                    limit = self.cfg.request_limit,
                    %expiration,
                    "request limit exceeded, throttling"
                );
                self.enter_throttled(input, expiration, now, sink)
            }
            Some(expiration) => {
                tracing::debug!(%expiration, "submission rejected while throttled");
                self.enter_throttled(input, expiration, now, sink)
            }
        }
    }

    /// Timer callback: release the throttle once the persisted expiration has
    /// passed (or vanished). Safe to call any number of times.
    pub fn check_expiration(&mut self, sink: &mut dyn ResultSink) -> TickOutcome {
        if self.state == ThrottleState::Admitting {
            return TickOutcome::Idle;
        }
        let now = self.clock.now();
        match self.store.expiration() {
            Some(expiration) if now < expiration => {
                match self.timer.as_mut() {
                    Some(timer) => timer.reschedule(now),
                    None => self.arm_timer(now),
                }
                TickOutcome::StillThrottled
            }
            _ => {
                self.release(sink);
                TickOutcome::Released
            }
        }
    }

    fn enter_throttled(
        &mut self,
        input: &str,
        expiration: Timestamp,
        now: Timestamp,
        sink: &mut dyn ResultSink,
    ) -> Admission {
        self.state = ThrottleState::Throttled;
        if self.gate.disable() {
            tracing::info!(%expiration, "input disabled");
        }
        let notice = throttled_result(input, expiration);
        sink.notify(THROTTLED_MESSAGE);
        sink.render(&notice);
        self.arm_timer(now);
        Admission::Throttled(notice)
    }

    /// Back to admitting: clear the expiration, reset the counter, re-enable
    /// input and drop the timer.
    fn release(&mut self, sink: &mut dyn ResultSink) {
        self.store.clear_expiration();
        self.reset_counter();
        self.timer = None;
        self.gate.enable();
        if self.state == ThrottleState::Throttled {
            self.state = ThrottleState::Admitting;
            sink.clear_notice();
            tracing::info!("throttle released, input enabled");
        }
    }

    fn arm_timer(&mut self, now: Timestamp) {
        if self.timer.is_none() {
            self.timer = Some(PeriodicTimer::start(self.cfg.poll_interval, now));
        }
    }

    fn reset_counter(&mut self) {
        self.counter = 0;
        if self.cfg.persist_request_count {
            self.store.clear_request_count();
        }
    }

    fn persist_counter(&self) {
        if self.cfg.persist_request_count {
            self.store.set_request_count(self.counter);
        }
    }
}

//! Timers behind an injectable scheduler.
//!
//! The engine never sleeps or registers callbacks. It asks a [`Scheduler`] for
//! a token, and the host advances time through `EngineCore::tick`, which pops
//! whatever came due and dispatches on its [`TimerKind`].

#[cfg(test)]
#[path = "schedule_test.rs"]
mod schedule_test;

/// What a timer is for. At most one timer of each kind is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Quiet period after the last pointer move has elapsed.
    HoverNotify,
    /// Apply the latest pan sample to the view box.
    PanTick,
    /// No double click arrived in time; report the single click.
    ButtonSingle,
}

/// Handle returned by [`Scheduler::schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

/// A timer that came due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub token: TimerToken,
    pub kind: TimerKind,
}

pub trait Scheduler {
    /// Arm a timer `delay_ms` after the scheduler's current time.
    fn schedule(&mut self, delay_ms: f64, kind: TimerKind) -> TimerToken;

    /// Disarm a timer. Unknown or already-fired tokens are ignored.
    fn cancel(&mut self, token: TimerToken) -> bool;

    /// Advance to `now_ms` and return every timer due by then, earliest first.
    fn pop_due(&mut self, now_ms: f64) -> Vec<Fired>;

    /// The scheduler's notion of the current time.
    fn now(&self) -> f64;
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    token: TimerToken,
    kind: TimerKind,
    due: f64,
}

/// Virtual-clock scheduler. Time only moves when `pop_due` is called.
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    now: f64,
    next_token: u64,
    pending: Vec<Pending>,
}

impl TimerQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of armed timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Whether `token` is still armed.
    #[must_use]
    pub fn is_pending(&self, token: TimerToken) -> bool {
        self.pending.iter().any(|p| p.token == token)
    }

    /// Due time of the earliest armed timer.
    #[must_use]
    pub fn next_due(&self) -> Option<f64> {
        self.pending.iter().map(|p| p.due).reduce(f64::min)
    }
}

impl Scheduler for TimerQueue {
    fn schedule(&mut self, delay_ms: f64, kind: TimerKind) -> TimerToken {
        self.next_token += 1;
        let token = TimerToken(self.next_token);
        let delay = if delay_ms.is_finite() { delay_ms.max(0.0) } else { 0.0 };
        self.pending.push(Pending { token, kind, due: self.now + delay });
        token
    }

    fn cancel(&mut self, token: TimerToken) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.token != token);
        self.pending.len() != before
    }

    fn pop_due(&mut self, now_ms: f64) -> Vec<Fired> {
        if now_ms > self.now {
            self.now = now_ms;
        }
        let now = self.now;
        let (mut due, rest): (Vec<Pending>, Vec<Pending>) = self.pending.iter().partition(|p| p.due <= now);
        self.pending = rest;
        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.token.cmp(&b.token)));
        due.into_iter().map(|p| Fired { token: p.token, kind: p.kind }).collect()
    }

    fn now(&self) -> f64 {
        self.now
    }
}

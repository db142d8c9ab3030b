//!  src/util/debounce.rs
//!  ===================================================================
//!  Debounce primitive driven by an explicit clock
//!
//!  • No timers or tasks of its own: the caller feeds `Instant`s and asks
//!    for the next deadline, so the event loop decides when to wake.
//!  • At most one pending value; every submit restarts the quiet window.
//!  • A value equal to the last settled one is swallowed when it settles.
//!  -------------------------------------------------------------------

use std::time::{Duration, Instant};

use tracing::trace;

/* ======================== DebounceConfig ============================ */

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceConfig {
    /// Quiet time required before a value settles.
    pub delay: Duration,
    /// Upper bound on how long a burst may postpone settling.
    pub max_delay: Option<Duration>,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self::search_input()
    }
}

impl DebounceConfig {
    /// Search box: settle 400ms after the last keystroke, never earlier.
    #[must_use]
    pub const fn search_input() -> Self {
        Self {
            delay: Duration::from_millis(400),
            max_delay: None,
        }
    }

    #[must_use]
    pub const fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            max_delay: None,
        }
    }
}

/* ============================ Debounced ============================ */

#[derive(Debug, Clone)]
struct Pending<T> {
    value: T,
    deadline: Instant,
    first_seen: Instant,
}

/// A settled value plus at most one pending replacement.
#[derive(Debug, Clone)]
pub struct Debounced<T> {
    cfg: DebounceConfig,
    settled: T,
    pending: Option<Pending<T>>,
}

impl<T: Clone + PartialEq> Debounced<T> {
    #[must_use]
    pub const fn new(initial: T, cfg: DebounceConfig) -> Self {
        Self {
            cfg,
            settled: initial,
            pending: None,
        }
    }

    pub const fn settled(&self) -> &T {
        &self.settled
    }

    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Replace the pending value and restart the quiet window.
    pub fn submit(&mut self, value: T, now: Instant) {
        let first_seen = self.pending.as_ref().map_or(now, |p| p.first_seen);
        let mut deadline = now + self.cfg.delay;
        if let Some(max) = self.cfg.max_delay {
            deadline = deadline.min(first_seen + max);
        }
        trace!(?deadline, "debounce window restarted");
        self.pending = Some(Pending {
            value,
            deadline,
            first_seen,
        });
    }

    /// When the pending value will settle, if there is one.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Settle the pending value once its window has elapsed.
    ///
    /// Returns the new settled value only when it differs from the previous
    /// one.
    pub fn poll(&mut self, now: Instant) -> Option<&T> {
        let due = self.pending.as_ref().is_some_and(|p| p.deadline <= now);
        if !due {
            return None;
        }
        let pending = self.pending.take()?;
        if pending.value == self.settled {
            trace!("debounced value unchanged; suppressed");
            return None;
        }
        self.settled = pending.value;
        Some(&self.settled)
    }

    /// Drop anything pending and force the settled value.
    pub fn reset(&mut self, value: T) {
        self.pending = None;
        self.settled = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn burst_settles_once_on_final_value() {
        let t0 = Instant::now();
        let mut d = Debounced::new(String::new(), DebounceConfig::with_delay(MS * 100));

        d.submit("m".into(), t0);
        d.submit("ma".into(), t0 + MS * 50);
        assert_eq!(d.poll(t0 + MS * 120), None);
        d.submit("mat".into(), t0 + MS * 130);

        assert_eq!(d.poll(t0 + MS * 229), None);
        assert_eq!(d.poll(t0 + MS * 230).map(String::as_str), Some("mat"));
        assert_eq!(d.poll(t0 + MS * 500), None);
        assert!(!d.is_pending());
    }

    #[test]
    fn returning_to_settled_value_is_suppressed() {
        let t0 = Instant::now();
        let mut d = Debounced::new(1, DebounceConfig::with_delay(MS * 10));
        d.submit(2, t0);
        d.submit(1, t0 + MS);
        assert_eq!(d.poll(t0 + MS * 20), None);
        assert_eq!(*d.settled(), 1);
    }

    #[test]
    fn max_delay_caps_a_long_burst() {
        let t0 = Instant::now();
        let cfg = DebounceConfig {
            delay: MS * 10,
            max_delay: Some(MS * 25),
        };
        let mut d = Debounced::new(0, cfg);
        for i in 0..5 {
            d.submit(i + 1, t0 + MS * (i * 8));
        }
        assert_eq!(d.deadline(), Some(t0 + MS * 25));
    }

    #[test]
    fn reset_cancels_pending() {
        let t0 = Instant::now();
        let mut d = Debounced::new(0, DebounceConfig::search_input());
        d.submit(5, t0);
        d.reset(0);
        assert_eq!(d.deadline(), None);
        assert_eq!(d.poll(t0 + Duration::from_secs(5)), None);
    }
}

//! Debounced triggers.
//!
//! A call runs at once when the last invocation is more than `wait` old.
//! Otherwise it becomes the single pending trailing call, due `wait` after
//! the call that scheduled it; a newer call replaces it. Nothing fires on
//! its own: the owner polls, which keeps the debouncer single-threaded and
//! free of timers.

use std::time::{Duration, Instant};

/// Default trailing delay.
pub const DEFAULT_WAIT: Duration = Duration::from_millis(250);

#[derive(Debug, Clone)]
struct Pending<T> {
    due: Instant,
    called_at: Instant,
    args: T,
}

/// Timing core of a debounced callback.
///
/// `call` and `poll` hand back the arguments that should be invoked now,
/// so the owner can run the callback with whatever access it needs.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    wait: Duration,
    last_invocation: Option<Instant>,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            last_invocation: None,
            pending: None,
        }
    }

    pub fn wait(&self) -> Duration {
        self.wait
    }

    /// Whether a trailing call is scheduled.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the scheduled trailing call becomes due.
    pub fn due_at(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }

    pub fn call(&mut self, args: T) -> Option<T> {
        self.call_at(Instant::now(), args)
    }

    /// Record a call made at `now`.
    ///
    /// Returns the arguments when the call should run immediately. Any
    /// scheduled trailing call is dropped either way.
    pub fn call_at(&mut self, now: Instant, args: T) -> Option<T> {
        self.pending = None;

        let idle = self
            .last_invocation
            .is_none_or(|last| now.saturating_duration_since(last) > self.wait);

        if idle {
            self.last_invocation = Some(now);
            Some(args)
        } else {
            self.pending = Some(Pending {
                due: now + self.wait,
                called_at: now,
                args,
            });
            None
        }
    }

    pub fn poll(&mut self) -> Option<T> {
        self.poll_at(Instant::now())
    }

    /// Take the trailing call if it is due at `now`.
    pub fn poll_at(&mut self, now: Instant) -> Option<T> {
        if self.pending.as_ref().is_some_and(|p| p.due <= now) {
            self.flush()
        } else {
            None
        }
    }

    /// Take the trailing call now, due or not.
    pub fn flush(&mut self) -> Option<T> {
        let pending = self.pending.take()?;
        // Timed from the call that scheduled it, not from when it fired.
        self.last_invocation = Some(pending.called_at);
        Some(pending.args)
    }

    /// Drop the trailing call without running it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

/// A callback wrapped with a [`Debouncer`].
pub struct Debounced<T, F>
where
    F: FnMut(T),
{
    debouncer: Debouncer<T>,
    callback: F,
}

impl<T, F> Debounced<T, F>
where
    F: FnMut(T),
{
    pub fn new(wait: Duration, callback: F) -> Self {
        Self {
            debouncer: Debouncer::new(wait),
            callback,
        }
    }

    pub fn call(&mut self, args: T) {
        self.call_at(Instant::now(), args);
    }

    pub fn call_at(&mut self, now: Instant, args: T) {
        if let Some(args) = self.debouncer.call_at(now, args) {
            (self.callback)(args);
        }
    }

    /// Run the trailing call if due. Returns whether it ran.
    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> bool {
        match self.debouncer.poll_at(now) {
            Some(args) => {
                (self.callback)(args);
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::RefCell;

    const WAIT: Duration = Duration::from_millis(250);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_first_call_runs_immediately() {
        let mut debouncer = Debouncer::new(WAIT);
        assert_eq!(debouncer.call_at(Instant::now(), 1), Some(1));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_call_within_wait_is_deferred() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(WAIT);
        debouncer.call_at(t0, 1);

        assert_eq!(debouncer.call_at(t0 + ms(100), 2), None);
        assert_eq!(debouncer.due_at(), Some(t0 + ms(350)));
        assert_eq!(debouncer.poll_at(t0 + ms(349)), None);
        assert_eq!(debouncer.poll_at(t0 + ms(350)), Some(2));
        assert_eq!(debouncer.poll_at(t0 + ms(1000)), None);
    }

    #[test]
    fn test_newer_call_replaces_pending() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(WAIT);
        debouncer.call_at(t0, "a");
        debouncer.call_at(t0 + ms(10), "b");
        debouncer.call_at(t0 + ms(20), "c");

        assert_eq!(debouncer.due_at(), Some(t0 + ms(270)));
        assert_eq!(debouncer.poll_at(t0 + ms(270)), Some("c"));
    }

    #[test]
    fn test_call_after_wait_runs_and_drops_pending() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(WAIT);
        debouncer.call_at(t0, 1);
        debouncer.call_at(t0 + ms(200), 2);

        // More than `wait` since the last invocation: runs now, pending is gone.
        assert_eq!(debouncer.call_at(t0 + ms(251), 3), Some(3));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_trailing_call_times_from_its_trigger() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(WAIT);
        debouncer.call_at(t0, 1);
        debouncer.call_at(t0 + ms(100), 2);
        assert_eq!(debouncer.poll_at(t0 + ms(400)), Some(2));

        // Last invocation is t0+100, so t0+300 is still inside the window.
        assert_eq!(debouncer.call_at(t0 + ms(300), 3), None);
        assert_eq!(debouncer.call_at(t0 + ms(600), 4), Some(4));
    }

    #[test]
    fn test_cancel_and_flush() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(WAIT);
        debouncer.call_at(t0, 1);
        debouncer.call_at(t0 + ms(1), 2);
        debouncer.cancel();
        assert_eq!(debouncer.flush(), None);

        debouncer.call_at(t0 + ms(2), 3);
        assert_eq!(debouncer.flush(), Some(3));
    }

    #[test]
    fn test_debounced_invokes_callback() {
        let t0 = Instant::now();
        let seen = RefCell::new(Vec::new());
        let mut debounced = Debounced::new(WAIT, |n: u32| seen.borrow_mut().push(n));

        debounced.call_at(t0, 1);
        debounced.call_at(t0 + ms(50), 2);
        debounced.call_at(t0 + ms(60), 3);
        assert!(debounced.is_pending());
        assert!(!debounced.tick_at(t0 + ms(100)));
        assert!(debounced.tick_at(t0 + ms(310)));
        drop(debounced);

        assert_eq!(seen.into_inner(), vec![1, 3]);
    }

    proptest! {
        /// A burst of calls inside one window after an invocation yields
        /// exactly one further invocation, with the last call's arguments.
        #[test]
        fn burst_coalesces_to_last_call(mut offsets in prop::collection::vec(0u64..250, 1..20)) {
            offsets.sort_unstable();
            let t0 = Instant::now();
            let mut debouncer = Debouncer::new(WAIT);
            prop_assert_eq!(debouncer.call_at(t0, usize::MAX), Some(usize::MAX));

            let mut fired = Vec::new();
            for (i, offset) in offsets.iter().enumerate() {
                let now = t0 + ms(*offset);
                fired.extend(debouncer.poll_at(now));
                fired.extend(debouncer.call_at(now, i));
            }
            fired.extend(debouncer.poll_at(t0 + ms(10_000)));

            prop_assert_eq!(fired, vec![offsets.len() - 1]);
        }
    }
}

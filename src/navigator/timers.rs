//! Cancellable one-shot timers on a caller-driven clock
//!
//! Nothing here reads the system clock. Owners schedule timers against a
//! `Duration` since their view was created and ask for due timers whenever
//! the host reports the current time, which keeps every wait deterministic
//! under test.

use std::time::Duration;

#[derive(Debug, Clone)]
struct Timer<K> {
    key: K,
    due: Duration,
    seq: u64,
}

/// A set of pending timers, at most one per key.
#[derive(Debug, Clone)]
pub struct TimerQueue<K> {
    timers: Vec<Timer<K>>,
    next_seq: u64,
}

impl<K> Default for TimerQueue<K> {
    fn default() -> Self {
        Self {
            timers: Vec::new(),
            next_seq: 0,
        }
    }
}

impl<K: Clone + PartialEq> TimerQueue<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `key` to fire at `due`, replacing any pending timer with the
    /// same key.
    pub fn schedule(&mut self, key: K, due: Duration) {
        self.cancel(&key);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.push(Timer { key, due, seq });
    }

    /// Cancel the pending timer for `key`. Returns whether one was pending.
    pub fn cancel(&mut self, key: &K) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.key != *key);
        self.timers.len() != before
    }

    /// Cancel every pending timer.
    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    pub fn is_scheduled(&self, key: &K) -> bool {
        self.timers.iter().any(|t| t.key == *key)
    }

    /// When the earliest pending timer is due.
    pub fn next_due(&self) -> Option<Duration> {
        self.timers.iter().map(|t| t.due).min()
    }

    /// Remove and return the earliest timer due at or before `now`.
    ///
    /// Timers due at the same instant come out in scheduling order.
    pub fn pop_due(&mut self, now: Duration) -> Option<K> {
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= now)
            .min_by_key(|(_, t)| (t.due, t.seq))
            .map(|(i, _)| i)?;
        Some(self.timers.swap_remove(index).key)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_pop_due_in_order() {
        let mut timers = TimerQueue::new();
        timers.schedule("late", ms(300));
        timers.schedule("early", ms(100));
        timers.schedule("same-as-early", ms(100));

        assert_eq!(timers.pop_due(ms(50)), None);
        assert_eq!(timers.pop_due(ms(500)), Some("early"));
        assert_eq!(timers.pop_due(ms(500)), Some("same-as-early"));
        assert_eq!(timers.pop_due(ms(500)), Some("late"));
        assert!(timers.is_empty());
    }

    #[test]
    fn test_reschedule_replaces() {
        let mut timers = TimerQueue::new();
        timers.schedule(1, ms(100));
        timers.schedule(1, ms(900));
        assert_eq!(timers.len(), 1);
        assert_eq!(timers.pop_due(ms(500)), None);
        assert_eq!(timers.next_due(), Some(ms(900)));
    }

    #[test]
    fn test_cancel() {
        let mut timers = TimerQueue::new();
        timers.schedule('a', ms(10));
        timers.schedule('b', ms(20));
        assert!(timers.cancel(&'a'));
        assert!(!timers.cancel(&'a'));
        assert!(!timers.is_scheduled(&'a'));
        assert!(timers.is_scheduled(&'b'));

        timers.cancel_all();
        assert_eq!(timers.pop_due(ms(1_000)), None);
    }
}

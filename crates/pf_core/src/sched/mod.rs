//! Cooperative tick scheduling.
//!
//! The host drives one logical tick thread; the only timing primitives are
//! a one-shot delayed command and a fixed-period repeating timer. Deferred
//! work is data (a command enum), not a closure, so it is executed with
//! fresh state and can re-validate its preconditions at fire time. There is
//! no cancellation; a command whose preconditions no longer hold is a no-op.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

#[derive(Debug)]
struct Entry<C> {
    due_ms: u64,
    seq: u64,
    command: C,
}

// Ordering ignores the payload; (due, seq) makes equal-delay commands fire
// in scheduling order.
impl<C> PartialEq for Entry<C> {
    fn eq(&self, other: &Self) -> bool {
        self.due_ms == other.due_ms && self.seq == other.seq
    }
}

impl<C> Eq for Entry<C> {}

impl<C> PartialOrd for Entry<C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<C> Ord for Entry<C> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due_ms, self.seq).cmp(&(other.due_ms, other.seq))
    }
}

/// One-shot delayed command queue, drained by the host tick.
#[derive(Debug)]
pub struct TickScheduler<C> {
    queue: BinaryHeap<Reverse<Entry<C>>>,
    seq: u64,
}

impl<C> Default for TickScheduler<C> {
    fn default() -> Self {
        Self { queue: BinaryHeap::new(), seq: 0 }
    }
}

impl<C> TickScheduler<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `command` to fire `delay_ms` after `now_ms`.
    pub fn schedule_in(&mut self, now_ms: u64, delay_ms: u64, command: C) {
        self.seq += 1;
        self.queue.push(Reverse(Entry { due_ms: now_ms + delay_ms, seq: self.seq, command }));
    }

    /// Pop the next command due at or before `now_ms`.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<C> {
        if self.queue.peek().map(|Reverse(e)| e.due_ms <= now_ms).unwrap_or(false) {
            self.queue.pop().map(|Reverse(e)| e.command)
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

/// Fixed-period repeating timer with an explicit lifecycle: started once at
/// startup, stopped and cleared at shutdown or hot-reload.
#[derive(Debug)]
pub struct RepeatingTimer {
    period_ms: u64,
    next_due_ms: Option<u64>,
}

impl RepeatingTimer {
    pub fn new(period_ms: u64) -> Self {
        Self { period_ms, next_due_ms: None }
    }

    pub fn start(&mut self, now_ms: u64) {
        if self.next_due_ms.is_none() {
            self.next_due_ms = Some(now_ms + self.period_ms);
        }
    }

    pub fn stop(&mut self) {
        self.next_due_ms = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due_ms.is_some()
    }

    /// Whether the period elapsed; advances past `now_ms` when it did.
    pub fn fire_due(&mut self, now_ms: u64) -> bool {
        match self.next_due_ms {
            Some(due) if due <= now_ms => {
                let mut next = due;
                while next <= now_ms {
                    next += self.period_ms;
                }
                self.next_due_ms = Some(next);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands_fire_at_due_time() {
        let mut sched = TickScheduler::new();
        sched.schedule_in(0, 500, "a");

        assert_eq!(sched.pop_due(499), None);
        assert_eq!(sched.pop_due(500), Some("a"));
        assert_eq!(sched.pop_due(500), None);
    }

    #[test]
    fn test_equal_delay_fires_in_scheduling_order() {
        let mut sched = TickScheduler::new();
        sched.schedule_in(0, 100, "first");
        sched.schedule_in(0, 100, "second");
        sched.schedule_in(0, 100, "third");

        assert_eq!(sched.pop_due(100), Some("first"));
        assert_eq!(sched.pop_due(100), Some("second"));
        assert_eq!(sched.pop_due(100), Some("third"));
    }

    #[test]
    fn test_shorter_delay_fires_first_regardless_of_order() {
        let mut sched = TickScheduler::new();
        sched.schedule_in(0, 550, "late");
        sched.schedule_in(0, 500, "early");

        assert_eq!(sched.pop_due(1000), Some("early"));
        assert_eq!(sched.pop_due(1000), Some("late"));
    }

    #[test]
    fn test_repeating_timer_fires_every_period() {
        let mut timer = RepeatingTimer::new(3000);
        timer.start(0);

        assert!(!timer.fire_due(2999));
        assert!(timer.fire_due(3000));
        assert!(!timer.fire_due(3001));
        assert!(timer.fire_due(6000));
    }

    #[test]
    fn test_repeating_timer_catches_up_without_bursting() {
        let mut timer = RepeatingTimer::new(3000);
        timer.start(0);

        // A long stall yields one firing, then resumes the cadence.
        assert!(timer.fire_due(10_000));
        assert!(!timer.fire_due(10_001));
        assert!(timer.fire_due(12_000));
    }

    #[test]
    fn test_stopped_timer_never_fires() {
        let mut timer = RepeatingTimer::new(3000);
        timer.start(0);
        timer.stop();
        assert!(!timer.fire_due(100_000));
        assert!(!timer.is_running());
    }
}

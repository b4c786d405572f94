use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use enhancer_core::TimerId;
use enhancer_logging::enhancer_trace;

/// Deterministic timer queue driven by explicit time advances.
///
/// Timers due at the same instant fire in scheduling order.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Duration,
    seq: u64,
    queue: BTreeMap<(Duration, u64), TimerId>,
    slots: HashMap<TimerId, (Duration, u64)>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Arms `timer_id` to fire `delay` from now. Re-arming an id replaces its old deadline.
    pub fn schedule(&mut self, timer_id: TimerId, delay: Duration) {
        self.cancel(timer_id);
        self.seq += 1;
        let key = (self.now + delay, self.seq);
        self.queue.insert(key, timer_id);
        self.slots.insert(timer_id, key);
        enhancer_trace!("[timer] schedule {:?} due_at={:?}", timer_id, key.0);
    }

    /// Returns whether the timer was still pending.
    pub fn cancel(&mut self, timer_id: TimerId) -> bool {
        match self.slots.remove(&timer_id) {
            Some(key) => {
                self.queue.remove(&key);
                true
            }
            None => false,
        }
    }

    /// Removes the earliest timer due at or before `deadline` and moves the clock to its due time.
    pub fn pop_due(&mut self, deadline: Duration) -> Option<TimerId> {
        let (&key, _) = self.queue.iter().next().filter(|(key, _)| key.0 <= deadline)?;
        let timer_id = self.queue.remove(&key)?;
        self.slots.remove(&timer_id);
        self.now = self.now.max(key.0);
        Some(timer_id)
    }

    /// Moves the clock forward to `deadline` once every due timer has been popped.
    pub fn settle(&mut self, deadline: Duration) {
        self.now = self.now.max(deadline);
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.queue.keys().next().map(|(due, _)| *due)
    }
}

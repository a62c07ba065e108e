use serde::{Deserialize, Serialize};

/// Monotonic simulated clock advanced by the host's frame delta.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PlaybackClock {
    pub time_seconds: f32,
}

impl PlaybackClock {
    pub fn advance(&mut self, delta: f32) {
        self.time_seconds = (self.time_seconds + delta).max(0.0);
    }
}

/// Handle returned by [`Scheduler::schedule_at`], used to cancel a pending timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
pub struct ScheduledEvent<E> {
    pub id: TimerId,
    pub time_seconds: f32,
    pub event: E,
}

/// One-shot timer queue. Events fire in deadline order; ties fire in the
/// order they were scheduled.
#[derive(Debug)]
pub struct Scheduler<E> {
    events: Vec<ScheduledEvent<E>>,
    next_id: u64,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self {
            events: Vec::new(),
            next_id: 0,
        }
    }
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule_at(&mut self, time_seconds: f32, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;

        // Keep the queue sorted so draining is a prefix split.
        let position = self
            .events
            .partition_point(|pending| pending.time_seconds <= time_seconds);
        self.events.insert(
            position,
            ScheduledEvent {
                id,
                time_seconds,
                event,
            },
        );
        id
    }

    pub fn schedule_after(&mut self, clock: &PlaybackClock, delay: f32, event: E) -> TimerId {
        self.schedule_at(clock.time_seconds + delay.max(0.0), event)
    }

    /// Removes a pending timer. Returns `false` when it already fired or was
    /// cancelled before.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.events.len();
        self.events.retain(|pending| pending.id != id);
        self.events.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.events.clear();
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.events.iter().any(|pending| pending.id == id)
    }

    pub fn pending(&self) -> usize {
        self.events.len()
    }

    /// Pops every event whose deadline is at or before the clock, in
    /// deadline order.
    pub fn drain_due(&mut self, clock: &PlaybackClock) -> Vec<ScheduledEvent<E>> {
        let due = self
            .events
            .partition_point(|pending| pending.time_seconds <= clock.time_seconds);
        self.events.drain(..due).collect()
    }
}

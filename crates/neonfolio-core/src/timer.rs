//! Cancelable one-shot and repeating timers on a virtual clock.
//!
//! Time is a `Duration` measured from page load. Nothing here sleeps: the
//! owner asks for the next deadline and pops due timers as its clock advances.

use std::time::Duration;

/// Handle returned by [`TimerQueue::schedule`]; used to cancel the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct TimerEntry<T> {
    id: TimerId,
    fire_at: Duration,
    /// Insertion sequence, breaks ties between equal deadlines
    seq: u64,
    interval: Option<Duration>,
    task: T,
}

/// A timer that has come due
#[derive(Debug, Clone, PartialEq)]
pub struct Fired<T> {
    pub id: TimerId,
    pub at: Duration,
    pub task: T,
}

#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    timers: Vec<TimerEntry<T>>,
    now: Duration,
    next_id: u64,
    next_seq: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            timers: Vec::new(),
            now: Duration::ZERO,
            next_id: 1,
            next_seq: 0,
        }
    }
}

impl<T: Clone> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    #[inline]
    pub fn now(&self) -> Duration {
        self.now
    }

    fn push(&mut self, delay: Duration, interval: Option<Duration>, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.push(TimerEntry {
            id,
            fire_at: self.now + delay,
            seq,
            interval,
            task,
        });
        id
    }

    /// Fire `task` once after `delay`
    pub fn schedule(&mut self, delay: Duration, task: T) -> TimerId {
        self.push(delay, None, task)
    }

    /// Fire `task` every `interval`, first after one interval.
    /// A zero interval is bumped to 1ms so the queue always makes progress.
    pub fn schedule_repeating(&mut self, interval: Duration, task: T) -> TimerId {
        let interval = interval.max(Duration::from_millis(1));
        self.push(interval, Some(interval), task)
    }

    /// Cancel a pending timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    /// Number of live timers
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.iter().map(|t| t.fire_at).min()
    }

    /// Remove and return the earliest timer due at or before `now`.
    ///
    /// The clock moves to the timer's deadline, so anything the task schedules
    /// is relative to when it fired. Repeating timers are re-armed. When
    /// nothing is due the clock moves to `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<Fired<T>> {
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.fire_at <= now)
            .min_by_key(|(_, t)| (t.fire_at, t.seq))
            .map(|(i, _)| i);

        let Some(index) = index else {
            if now > self.now {
                self.now = now;
            }
            return None;
        };

        let fire_at = self.timers[index].fire_at;
        if fire_at > self.now {
            self.now = fire_at;
        }

        let fired = match self.timers[index].interval {
            Some(interval) => {
                let seq = self.next_seq;
                self.next_seq += 1;
                let entry = &mut self.timers[index];
                entry.fire_at += interval;
                entry.seq = seq;
                Fired {
                    id: entry.id,
                    at: fire_at,
                    task: entry.task.clone(),
                }
            }
            None => {
                let entry = self.timers.swap_remove(index);
                Fired {
                    id: entry.id,
                    at: fire_at,
                    task: entry.task,
                }
            }
        };
        Some(fired)
    }

    /// Move the clock forward without firing anything.
    /// Used by hosts that deliver events between timer deadlines.
    pub fn set_now(&mut self, now: Duration) {
        if now > self.now {
            self.now = now;
        }
    }
}

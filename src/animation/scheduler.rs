//! Delayed task queue driven by an injectable clock.
//!
//! Animation steps are queued here instead of sleeping or arming an OS timer.
//! The control asks the scheduler for due tasks on every `update()`, so a test
//! can substitute [`ManualClock`] and step time deterministically.

use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
    sync::{Arc, Mutex},
    time::Duration,
};

/// Monotonic time source measured from an arbitrary epoch
pub trait Clock: Send {
    fn now(&self) -> Duration;
}

/// Wall clock backed by `instant`, so it also works on wasm
#[derive(Debug, Clone)]
pub struct SystemClock {
    epoch: instant::Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            epoch: instant::Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }
}

/// Virtual clock shared between a test and the control it drives
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<Mutex<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += by;
        }
    }

    pub fn set(&self, to: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now = to;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.lock().map(|now| *now).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTask {
    AnimationTick,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ScheduledTask {
    due: Duration,
    seq: u64,
    task: TimerTask,
}

impl PartialOrd for ScheduledTask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledTask {
    fn cmp(&self, other: &Self) -> Ordering {
        // Earlier due time first, then submission order
        self.due
            .cmp(&other.due)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

#[derive(Debug, Default)]
pub struct Scheduler {
    queue: BinaryHeap<Reverse<ScheduledTask>>,
    now: Duration,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scheduler time; while running due tasks this is the due time of the task
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule(&mut self, delay: Duration, task: TimerTask) {
        let entry = ScheduledTask {
            due: self.now + delay,
            seq: self.next_seq,
            task,
        };
        self.next_seq += 1;
        self.queue.push(Reverse(entry));
    }

    /// Pops the earliest task due at or before `until`
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerTask> {
        let due = self.queue.peek().map(|Reverse(entry)| entry.due)?;
        if due > until {
            return None;
        }
        let Reverse(entry) = self.queue.pop()?;
        self.now = self.now.max(entry.due);
        Some(entry.task)
    }

    /// Moves scheduler time forward once all due tasks ran
    pub fn advance(&mut self, to: Duration) {
        self.now = self.now.max(to);
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

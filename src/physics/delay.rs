//! Neuromuscular delay - re-emit poses after a fixed latency
//!
//! A FIFO of poses tagged with the time they become due. Reads return the
//! first matured entry in queue order, not the one closest to the delay.

use std::collections::VecDeque;

use crate::pose::Pose;

struct DelayedPose {
    /// Session time (seconds) at which the pose may be emitted
    due: f64,
    pose: Pose,
}

/// Bounded FIFO that simulates signal-transmission latency
pub struct NeuromuscularDelay {
    delay_s: f64,
    capacity: usize,
    queue: VecDeque<DelayedPose>,
}

impl NeuromuscularDelay {
    pub fn new(delay_ms: f32, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            delay_s: f64::from(delay_ms.max(0.0)) / 1000.0,
            capacity,
            queue: VecDeque::with_capacity(capacity),
        }
    }

    /// Queue `pose`, due `delay` after `now` (seconds). The oldest entry is
    /// dropped when the buffer is full.
    pub fn add_value(&mut self, now: f64, pose: Pose) {
        if self.queue.len() >= self.capacity {
            self.queue.pop_front();
        }
        self.queue.push_back(DelayedPose {
            due: now + self.delay_s,
            pose,
        });
    }

    /// Remove and return the first entry that has matured by `now`
    ///
    /// `None` when empty or nothing is due yet; callers fall back to the
    /// undelayed pose.
    pub fn get_value(&mut self, now: f64) -> Option<Pose> {
        let idx = self.queue.iter().position(|entry| entry.due <= now)?;
        self.queue.remove(idx).map(|entry| entry.pose)
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

impl Default for NeuromuscularDelay {
    fn default() -> Self {
        Self::new(80.0, 10)
    }
}

//! Level-of-detail scheduling
//!
//! Two proposals, one from camera distance and one from the rolling average
//! frame time; the lower wins. The decision is re-evaluated at most once per
//! throttle interval. The level then gates which frames run the pipeline and
//! which joints the spring filter advances.

use std::collections::VecDeque;

use serde::Serialize;
use tracing::debug;

use crate::config::LodConfig;
use crate::skeleton::JointImportance;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LodLevel {
    Low,
    Medium,
    High,
}

impl LodLevel {
    pub fn from_distance(distance: f32, config: &LodConfig) -> Self {
        if distance < config.high_distance {
            LodLevel::High
        } else if distance < config.medium_distance {
            LodLevel::Medium
        } else {
            LodLevel::Low
        }
    }

    pub fn from_frame_time(avg_ms: f32, config: &LodConfig) -> Self {
        if avg_ms < config.high_frame_ms {
            LodLevel::High
        } else if avg_ms < config.medium_frame_ms {
            LodLevel::Medium
        } else {
            LodLevel::Low
        }
    }

    /// Process one frame in every `update_interval`
    pub fn update_interval(self) -> u32 {
        match self {
            LodLevel::High => 1,
            LodLevel::Medium => 2,
            LodLevel::Low => 4,
        }
    }

    /// Whether joints of this importance are advanced at this level
    pub fn updates(self, importance: JointImportance) -> bool {
        match importance {
            JointImportance::Critical => true,
            JointImportance::Important => self >= LodLevel::Medium,
            JointImportance::Peripheral => self == LodLevel::High,
        }
    }

    pub fn shows_overlays(self) -> bool {
        self != LodLevel::Low
    }

    pub fn name(self) -> &'static str {
        match self {
            LodLevel::Low => "low",
            LodLevel::Medium => "medium",
            LodLevel::High => "high",
        }
    }
}

/// Outcome of one scheduler tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameGate {
    pub level: LodLevel,
    /// False when this frame should be skipped
    pub process: bool,
}

pub struct LodScheduler {
    config: LodConfig,
    /// Recent frame times (ms)
    frame_times: VecDeque<f32>,
    level: LodLevel,
    since_eval_ms: f32,
    evaluated: bool,
    frame_counter: u32,
}

impl LodScheduler {
    pub fn new(config: LodConfig) -> Self {
        Self {
            frame_times: VecDeque::with_capacity(config.window),
            config,
            level: LodLevel::High,
            since_eval_ms: 0.0,
            evaluated: false,
            frame_counter: 0,
        }
    }

    /// Record a frame and decide whether it runs
    pub fn tick(&mut self, frame_delta_s: f32, camera_distance: f32) -> FrameGate {
        let frame_ms = frame_delta_s * 1000.0;
        if frame_ms.is_finite() && frame_ms >= 0.0 {
            if self.frame_times.len() >= self.config.window.max(1) {
                self.frame_times.pop_front();
            }
            self.frame_times.push_back(frame_ms);
            self.since_eval_ms += frame_ms;
        }

        if !self.evaluated || self.since_eval_ms >= self.config.throttle_ms {
            self.evaluate(camera_distance);
        }

        let process = self.frame_counter % self.level.update_interval() == 0;
        self.frame_counter = self.frame_counter.wrapping_add(1);

        FrameGate {
            level: self.level,
            process,
        }
    }

    fn evaluate(&mut self, camera_distance: f32) {
        let by_distance = LodLevel::from_distance(camera_distance, &self.config);
        let by_performance = LodLevel::from_frame_time(self.average_frame_ms(), &self.config);
        let level = by_distance.min(by_performance);

        if level != self.level {
            debug!(
                from = self.level.name(),
                to = level.name(),
                distance = camera_distance,
                "LOD changed"
            );
            self.level = level;
            self.frame_counter = 0;
        }
        self.evaluated = true;
        self.since_eval_ms = 0.0;
    }

    /// Rolling average frame time (ms), 0 before any frame
    pub fn average_frame_ms(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32
    }

    pub fn level(&self) -> LodLevel {
        self.level
    }

    pub fn reset(&mut self) {
        self.frame_times.clear();
        self.level = LodLevel::High;
        self.since_eval_ms = 0.0;
        self.evaluated = false;
        self.frame_counter = 0;
    }
}

impl Default for LodScheduler {
    fn default() -> Self {
        Self::new(LodConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conservative_pick() {
        let mut scheduler = LodScheduler::default();
        let gate = scheduler.tick(0.015, 8.0);
        assert_eq!(gate.level, LodLevel::Low);

        let config = LodConfig::default();
        assert_eq!(LodLevel::from_distance(8.0, &config), LodLevel::Low);
        assert_eq!(LodLevel::from_frame_time(15.0, &config), LodLevel::High);
    }

    #[test]
    fn test_distance_monotonicity() {
        let mut previous = LodLevel::High;
        for step in 0..40 {
            let distance = step as f32 * 0.25;
            let mut scheduler = LodScheduler::default();
            let level = scheduler.tick(0.025, distance).level;
            assert!(level <= previous, "distance {} raised LOD", distance);
            previous = level;
        }
        assert_eq!(previous, LodLevel::Low);
    }

    #[test]
    fn test_throttled_reevaluation() {
        let mut scheduler = LodScheduler::default();
        assert_eq!(scheduler.tick(0.016, 1.0).level, LodLevel::High);

        // Camera jumps away; level holds until 200 ms have elapsed
        assert_eq!(scheduler.tick(0.016, 10.0).level, LodLevel::High);
        let mut ticks = 1;
        while scheduler.tick(0.016, 10.0).level == LodLevel::High {
            ticks += 1;
            assert!(ticks < 20);
        }
        assert!(ticks >= 10);
        assert_eq!(scheduler.level(), LodLevel::Low);
    }

    #[test]
    fn test_update_interval_gates_frames() {
        let mut scheduler = LodScheduler::default();
        let processed = (0..8).filter(|_| scheduler.tick(0.016, 10.0).process).count();
        assert_eq!(processed, 2);

        let mut scheduler = LodScheduler::default();
        let processed = (0..8).filter(|_| scheduler.tick(0.016, 1.0).process).count();
        assert_eq!(processed, 8);
    }

    #[test]
    fn test_joint_filter_by_level() {
        assert!(LodLevel::Low.updates(JointImportance::Critical));
        assert!(!LodLevel::Low.updates(JointImportance::Important));
        assert!(LodLevel::Medium.updates(JointImportance::Important));
        assert!(!LodLevel::Medium.updates(JointImportance::Peripheral));
        assert!(LodLevel::High.updates(JointImportance::Peripheral));
        assert!(!LodLevel::Low.shows_overlays());
    }

    #[test]
    fn test_slow_frames_lower_level() {
        let mut scheduler = LodScheduler::default();
        for _ in 0..30 {
            scheduler.tick(0.040, 1.0);
        }
        assert_eq!(scheduler.level(), LodLevel::Low);
        assert!(scheduler.average_frame_ms() > 33.0);
    }
}

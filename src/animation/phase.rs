//! Exercise phase resolution and transition tracking
//!
//! A clip either carries named phase windows or falls back to fixed time
//! thresholds (eccentric < 0.6 ≤ hold < 0.8 ≤ concentric).

use serde::{Deserialize, Serialize};

use super::easing::Easing;

/// Threshold-rule boundary between eccentric and hold
pub const HOLD_START: f32 = 0.6;
/// Threshold-rule boundary between hold and concentric
pub const CONCENTRIC_START: f32 = 0.8;

const IDLE_WORDS: &[&str] = &[
    "idle", "rest", "recovery", "setup", "warm", "warmup", "warm-up", "cool", "cooldown",
    "cool-down",
];
const ECCENTRIC_WORDS: &[&str] = &[
    "eccentric", "lower", "lowering", "descent", "descend", "descending", "down",
];
const HOLD_WORDS: &[&str] = &["hold", "holding", "pause", "isometric"];
const CONCENTRIC_WORDS: &[&str] = &[
    "concentric", "raise", "raising", "ascent", "ascend", "ascending", "drive", "up", "lift",
    "lifting",
];

/// Muscle action during a portion of the exercise cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExercisePhase {
    /// Lengthening under load
    Eccentric,
    /// Static isometric hold
    Hold,
    /// Shortening under load
    Concentric,
    /// Not exercising
    Idle,
}

impl ExercisePhase {
    pub fn name(self) -> &'static str {
        match self {
            ExercisePhase::Eccentric => "eccentric",
            ExercisePhase::Hold => "hold",
            ExercisePhase::Concentric => "concentric",
            ExercisePhase::Idle => "idle",
        }
    }

    /// Eccentric and concentric phases accumulate fatigue; hold and idle recover
    pub fn is_exerting(self) -> bool {
        matches!(self, ExercisePhase::Eccentric | ExercisePhase::Concentric)
    }

    pub fn easing(self) -> Easing {
        match self {
            ExercisePhase::Eccentric => Easing::Smootherstep,
            ExercisePhase::Hold | ExercisePhase::Idle => Easing::Smoothstep,
            ExercisePhase::Concentric => Easing::QuarticInOut,
        }
    }

    /// Classify a named phase window by its words
    ///
    /// Words split on whitespace and underscores and must match whole.
    /// Rest, warm-up and cool-down words win over motion words.
    pub fn from_window_name(name: &str) -> Self {
        let name = name.to_ascii_lowercase();
        let words: Vec<&str> = name
            .split(|c: char| c.is_whitespace() || c == '_')
            .filter(|w| !w.is_empty())
            .collect();
        let has = |keys: &[&str]| words.iter().any(|w| keys.contains(w));

        if has(IDLE_WORDS) {
            ExercisePhase::Idle
        } else if has(ECCENTRIC_WORDS) {
            ExercisePhase::Eccentric
        } else if has(HOLD_WORDS) {
            ExercisePhase::Hold
        } else if has(CONCENTRIC_WORDS) {
            ExercisePhase::Concentric
        } else {
            ExercisePhase::Idle
        }
    }

    /// Threshold rule used when a clip has no phase windows
    pub fn from_threshold(t: f32) -> Self {
        if t < HOLD_START {
            ExercisePhase::Eccentric
        } else if t < CONCENTRIC_START {
            ExercisePhase::Hold
        } else {
            ExercisePhase::Concentric
        }
    }
}

/// Named span of normalized clip time
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseWindow {
    pub name: String,
    pub start_time: f32,
    pub end_time: f32,
}

impl PhaseWindow {
    pub fn new(name: impl Into<String>, start_time: f32, end_time: f32) -> Self {
        Self {
            name: name.into(),
            start_time,
            end_time,
        }
    }

    /// Half-open `[start, end)`, except a window ending at the clip end also
    /// owns the final instant.
    pub fn contains(&self, t: f32) -> bool {
        t >= self.start_time && (t < self.end_time || (self.end_time >= 1.0 && t <= self.end_time))
    }
}

/// Phase label for one tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedPhase<'a> {
    pub kind: ExercisePhase,
    /// Window name, or the kind's name under the threshold rule
    pub name: &'a str,
}

/// Chooses how a clip's phase is derived from normalized time
#[derive(Clone, Copy, Debug)]
pub enum PhaseResolver<'a> {
    Windows(&'a [PhaseWindow]),
    Threshold,
}

impl<'a> PhaseResolver<'a> {
    pub fn for_windows(windows: &'a [PhaseWindow]) -> Self {
        if windows.is_empty() {
            PhaseResolver::Threshold
        } else {
            PhaseResolver::Windows(windows)
        }
    }

    pub fn resolve(&self, t: f32) -> ResolvedPhase<'a> {
        match self {
            PhaseResolver::Windows(windows) => windows
                .iter()
                .find(|w| w.contains(t))
                .map(|w| ResolvedPhase {
                    kind: ExercisePhase::from_window_name(&w.name),
                    name: w.name.as_str(),
                })
                .unwrap_or(ResolvedPhase {
                    kind: ExercisePhase::Idle,
                    name: ExercisePhase::Idle.name(),
                }),
            PhaseResolver::Threshold => {
                let kind = ExercisePhase::from_threshold(t);
                ResolvedPhase { kind, name: kind.name() }
            }
        }
    }
}

/// Notification that the exercise entered a new phase
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseChange {
    pub phase_name: String,
    pub normalized_time: f32,
}

/// Fires a `PhaseChange` only when the phase name differs from the last one
#[derive(Clone, Debug, Default)]
pub struct PhaseTracker {
    current: Option<String>,
}

impl PhaseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, phase: &ResolvedPhase<'_>, t: f32) -> Option<PhaseChange> {
        if self.current.as_deref() == Some(phase.name) {
            return None;
        }
        self.current = Some(phase.name.to_string());
        Some(PhaseChange {
            phase_name: phase.name.to_string(),
            normalized_time: t,
        })
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn reset(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_boundaries() {
        let resolver = PhaseResolver::Threshold;
        assert_eq!(resolver.resolve(0.0).kind, ExercisePhase::Eccentric);
        assert_eq!(resolver.resolve(0.59).kind, ExercisePhase::Eccentric);
        assert_eq!(resolver.resolve(0.6).kind, ExercisePhase::Hold);
        assert_eq!(resolver.resolve(0.79).kind, ExercisePhase::Hold);
        assert_eq!(resolver.resolve(0.8).kind, ExercisePhase::Concentric);
        assert_eq!(resolver.resolve(0.99).name, "concentric");
    }

    #[test]
    fn test_windows_take_precedence() {
        let windows = vec![
            PhaseWindow::new("lowering", 0.0, 0.4),
            PhaseWindow::new("pause", 0.4, 0.5),
            PhaseWindow::new("drive", 0.5, 1.0),
        ];
        let resolver = PhaseResolver::for_windows(&windows);
        let phase = resolver.resolve(0.45);
        assert_eq!(phase.kind, ExercisePhase::Hold);
        assert_eq!(phase.name, "pause");
        assert_eq!(resolver.resolve(0.2).kind, ExercisePhase::Eccentric);
        assert_eq!(resolver.resolve(1.0).name, "drive");
    }

    #[test]
    fn test_window_names_match_whole_words() {
        let kind = ExercisePhase::from_window_name;
        assert_eq!(kind("Eccentric Phase"), ExercisePhase::Eccentric);
        assert_eq!(kind("slow_lowering"), ExercisePhase::Eccentric);
        assert_eq!(kind("PAUSE"), ExercisePhase::Hold);
        assert_eq!(kind("drive up"), ExercisePhase::Concentric);

        for name in ["setup", "warm-up", "warm up", "cooldown", "cool down", "backup", "update"] {
            assert_eq!(kind(name), ExercisePhase::Idle, "{}", name);
        }
    }

    #[test]
    fn test_gap_between_windows_is_idle() {
        let windows = vec![PhaseWindow::new("eccentric", 0.0, 0.3)];
        let phase = PhaseResolver::for_windows(&windows).resolve(0.5);
        assert_eq!(phase.kind, ExercisePhase::Idle);
    }

    #[test]
    fn test_tracker_fires_on_transitions_only() {
        let mut tracker = PhaseTracker::new();
        let resolver = PhaseResolver::Threshold;

        let first = tracker.observe(&resolver.resolve(0.1), 0.1);
        assert_eq!(first.unwrap().phase_name, "eccentric");
        assert!(tracker.observe(&resolver.resolve(0.2), 0.2).is_none());

        let hold = tracker.observe(&resolver.resolve(0.65), 0.65).unwrap();
        assert_eq!(hold.phase_name, "hold");
        assert_eq!(hold.normalized_time, 0.65);

        tracker.reset();
        assert!(tracker.observe(&resolver.resolve(0.7), 0.7).is_some());
    }
}

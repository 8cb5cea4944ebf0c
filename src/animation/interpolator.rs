//! Keyframe interpolation with phase-aware easing
//!
//! Finds the keyframe pair bracketing the normalized time, eases the local
//! factor with the curve of the current phase, and blends the two poses.

use super::clip::{AnimationClip, Keyframe};
use super::phase::ResolvedPhase;
use crate::pose::Pose;

/// Brackets narrower than this are treated as zero width
const MIN_BRACKET: f32 = 1e-6;

/// Result of sampling a clip
#[derive(Clone, Debug, PartialEq)]
pub struct Interpolated<'a> {
    pub pose: Pose,
    pub root_y: Option<f32>,
    pub phase: ResolvedPhase<'a>,
    /// Local factor inside the bracket, before easing
    pub factor: f32,
    /// Factor after easing
    pub eased: f32,
}

/// Sample `clip` at normalized time `t`
///
/// Empty clips yield the neutral (empty) pose; single-keyframe clips yield
/// that keyframe. Times before the first or after the last keyframe hold the
/// boundary keyframe, and a non-finite time holds the first.
pub fn interpolate(clip: &AnimationClip, t: f32) -> Interpolated<'_> {
    let phase = clip.phase_resolver().resolve(t);
    let keyframes = &clip.keyframes;

    let (first, last) = match (keyframes.first(), keyframes.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => {
            return Interpolated {
                pose: Pose::new(),
                root_y: None,
                phase,
                factor: 0.0,
                eased: 0.0,
            }
        }
    };

    if keyframes.len() == 1 || !t.is_finite() || t <= first.time {
        return hold(first, phase);
    }
    if t >= last.time {
        return hold(last, phase);
    }

    // Last keyframe at or before t; the one after it closes the bracket
    let start_idx = keyframes
        .iter()
        .rposition(|kf| kf.time <= t)
        .unwrap_or(0)
        .min(keyframes.len() - 2);
    let start = &keyframes[start_idx];
    let end = &keyframes[start_idx + 1];

    let width = end.time - start.time;
    let factor = if width > MIN_BRACKET {
        ((t - start.time) / width).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let eased = phase.kind.easing().apply(factor);

    let root_y = match (start.root_y, end.root_y) {
        (None, None) => None,
        (a, b) => {
            let (a, b) = (a.unwrap_or(0.0), b.unwrap_or(0.0));
            Some(a * (1.0 - eased) + b * eased)
        }
    };

    Interpolated {
        pose: Pose::blend(&start.pose, &end.pose, eased),
        root_y,
        phase,
        factor,
        eased,
    }
}

fn hold<'a>(kf: &Keyframe, phase: ResolvedPhase<'a>) -> Interpolated<'a> {
    Interpolated {
        pose: kf.pose.clone(),
        root_y: kf.root_y,
        phase,
        factor: 0.0,
        eased: 0.0,
    }
}

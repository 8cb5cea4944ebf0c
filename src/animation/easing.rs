//! Easing curves used between keyframes
//!
//! All curves map [0, 1] onto [0, 1] with e(0) = 0 and e(1) = 1 exactly.

/// Curve applied to the local keyframe factor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Easing {
    /// f²(3 − 2f)
    Smoothstep,
    /// Zero velocity and acceleration at both ends; slow, controlled motion
    Smootherstep,
    /// Quartic in-out; explosive through the middle
    QuarticInOut,
}

impl Easing {
    pub fn apply(self, f: f32) -> f32 {
        let f = f.clamp(0.0, 1.0);
        match self {
            Easing::Smoothstep => smoothstep(f),
            Easing::Smootherstep => smootherstep(f),
            Easing::QuarticInOut => quartic_in_out(f),
        }
    }
}

pub fn smoothstep(f: f32) -> f32 {
    f * f * (3.0 - 2.0 * f)
}

pub fn smootherstep(f: f32) -> f32 {
    f * f * f * (f * (f * 6.0 - 15.0) + 10.0)
}

pub fn quartic_in_out(f: f32) -> f32 {
    if f < 0.5 {
        8.0 * f * f * f * f
    } else {
        let g = -2.0 * f + 2.0;
        1.0 - g * g * g * g / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const ALL: [Easing; 3] = [
        Easing::Smoothstep,
        Easing::Smootherstep,
        Easing::QuarticInOut,
    ];

    #[test]
    fn test_endpoints_exact() {
        for easing in ALL {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
        }
    }

    #[test]
    fn test_midpoint_symmetry() {
        for easing in ALL {
            assert_relative_eq!(easing.apply(0.5), 0.5);
        }
    }

    #[test]
    fn test_monotone() {
        for easing in ALL {
            let mut prev = 0.0;
            for i in 1..=100 {
                let v = easing.apply(i as f32 / 100.0);
                assert!(v >= prev, "{:?} not monotone at {}", easing, i);
                prev = v;
            }
        }
    }

    #[test]
    fn test_smootherstep_flat_at_ends() {
        assert!(smootherstep(0.01) < 0.0001);
        assert!(1.0 - smootherstep(0.99) < 0.0001);
    }
}

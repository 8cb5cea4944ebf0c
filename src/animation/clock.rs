//! Clip clock - wall-clock time to normalized clip time
//!
//! Playback speed is where the fatigue slowdown factor is applied upstream
//! of interpolation.

/// Accumulates playback time and wraps it into [0, 1)
#[derive(Clone, Debug, Default)]
pub struct ClipClock {
    normalized: f32,
    cycles: u32,
}

impl ClipClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `dt` seconds at `speed` (1.0 = authored tempo) through a
    /// clip of `duration` seconds. Returns the new normalized time.
    pub fn advance(&mut self, dt: f32, duration: f32, speed: f32) -> f32 {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(duration) || !valid(dt) || !speed.is_finite() {
            return self.normalized;
        }

        let next = self.normalized + dt * speed.max(0.0) / duration;
        if !next.is_finite() {
            return self.normalized;
        }
        let wraps = next.floor();
        if wraps >= 1.0 {
            self.cycles += wraps as u32;
        }
        self.normalized = next - wraps;
        self.normalized
    }

    pub fn normalized(&self) -> f32 {
        self.normalized
    }

    /// Completed repetitions since the last reset
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    pub fn reset(&mut self) {
        self.normalized = 0.0;
        self.cycles = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_wraps_and_counts_cycles() {
        let mut clock = ClipClock::new();
        clock.advance(3.0, 2.0, 1.0);
        assert_relative_eq!(clock.normalized(), 0.5);
        assert_eq!(clock.cycles(), 1);
    }

    #[test]
    fn test_speed_scales_progress() {
        let mut clock = ClipClock::new();
        clock.advance(1.0, 4.0, 0.5);
        assert_relative_eq!(clock.normalized(), 0.125);
    }

    #[test]
    fn test_ignores_degenerate_input() {
        let mut clock = ClipClock::new();
        clock.advance(1.0, 0.0, 1.0);
        clock.advance(-1.0, 2.0, 1.0);
        assert_eq!(clock.normalized(), 0.0);
    }

    #[test]
    fn test_non_finite_input_leaves_clock_usable() {
        let mut clock = ClipClock::new();
        clock.advance(0.5, 2.0, 1.0);
        clock.advance(f32::NAN, 2.0, 1.0);
        clock.advance(f32::INFINITY, 2.0, 1.0);
        clock.advance(0.5, 2.0, f32::NAN);
        clock.advance(0.5, f32::INFINITY, 1.0);
        assert_relative_eq!(clock.normalized(), 0.25);

        clock.advance(0.5, 2.0, 1.0);
        assert_relative_eq!(clock.normalized(), 0.5);
        assert_eq!(clock.cycles(), 0);
    }
}

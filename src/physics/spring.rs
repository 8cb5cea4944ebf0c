//! Spring physics filter - per-joint damped spring toward the target pose
//!
//! Per axis:
//!
//! ```text
//! F_spring = -k (x - target)
//! c_eff    = c (1 + 2|v|)          speed-dependent eddy damping
//! v'       = (v + F_spring/m · dt) / (1 + c_eff/m · dt)
//! x'       = x + v' · dt
//! ```
//!
//! The damping term is taken implicitly in v' so the speed-dependent
//! coefficient cannot flip the velocity sign on a large step.

use nalgebra::Vector3;

use crate::pose::Pose;
use crate::skeleton::{physics_table, JointId, JointPhysics, JOINT_COUNT};

/// Clamp a frame delta into `[0, max_dt]`
pub fn clamp_dt(dt: f32, max_dt: f32) -> f32 {
    if dt.is_finite() {
        dt.clamp(0.0, max_dt)
    } else {
        0.0
    }
}

/// Split `elapsed` into the fewest equal steps no longer than `max_dt`
///
/// Returns `(0, 0.0)` for a non-positive or non-finite span.
pub fn substeps(elapsed: f32, max_dt: f32) -> (u32, f32) {
    if !elapsed.is_finite() || elapsed <= 0.0 || !(max_dt > 0.0) {
        return (0, 0.0);
    }
    let steps = (elapsed / max_dt).ceil().max(1.0) as u32;
    (steps, elapsed / steps as f32)
}

/// Spring state of one joint in rotation space
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SpringState {
    pub position: Vector3<f32>,
    pub velocity: Vector3<f32>,
    pub target: Vector3<f32>,
}

impl SpringState {
    /// Settled at `position`
    pub fn at_rest(position: Vector3<f32>) -> Self {
        Self {
            position,
            velocity: Vector3::zeros(),
            target: position,
        }
    }

    /// One semi-implicit Euler step toward `target`
    pub fn step(self, target: Vector3<f32>, params: &JointPhysics, dt: f32) -> Self {
        let mut position = self.position;
        let mut velocity = self.velocity;

        for axis in 0..3 {
            let x = position[axis];
            let v = velocity[axis];

            let spring = -params.stiffness * (x - target[axis]);
            let damping = params.damping * (1.0 + 2.0 * v.abs());

            let v_next = (v + spring / params.mass * dt) / (1.0 + damping / params.mass * dt);
            velocity[axis] = v_next;
            position[axis] = x + v_next * dt;
        }

        Self {
            position,
            velocity,
            target,
        }
    }

    pub fn speed(&self) -> f32 {
        self.velocity.norm()
    }
}

/// Spring states for every joint of the rig
pub struct SpringFilter {
    params: [JointPhysics; JOINT_COUNT],
    states: [Option<SpringState>; JOINT_COUNT],
    max_dt: f32,
}

impl SpringFilter {
    pub fn new(max_dt: f32) -> Self {
        Self {
            params: physics_table(),
            states: [None; JOINT_COUNT],
            max_dt,
        }
    }

    /// Advance every joint of `target` for which `should_update` holds
    ///
    /// `elapsed` may span several frames; it is integrated in equal steps no
    /// longer than `max_dt`. A joint seen for the first time starts at rest on
    /// its target. Joints filtered out this tick hold their last position. The
    /// output contains exactly the joints of `target`.
    pub fn update<F>(&mut self, target: &Pose, elapsed: f32, should_update: F) -> Pose
    where
        F: Fn(JointId) -> bool,
    {
        let (steps, dt) = substeps(elapsed, self.max_dt);
        let mut out = Pose::new();

        for (joint, goal) in target.iter() {
            let idx = joint.index();
            let next = match self.states[idx] {
                None => SpringState::at_rest(goal),
                Some(state) if should_update(joint) && steps > 0 => (0..steps)
                    .fold(state, |s, _| s.step(goal, &self.params[idx], dt)),
                Some(state) => SpringState { target: goal, ..state },
            };
            self.states[idx] = Some(next);
            out.set(joint, next.position);
        }

        out
    }

    pub fn state(&self, joint: JointId) -> Option<&SpringState> {
        self.states[joint.index()].as_ref()
    }

    /// Angular speed of a joint (rad/s), zero if never updated
    pub fn speed(&self, joint: JointId) -> f32 {
        self.state(joint).map_or(0.0, SpringState::speed)
    }

    /// Fastest joint angular speed
    pub fn peak_speed(&self) -> f32 {
        self.states
            .iter()
            .flatten()
            .map(SpringState::speed)
            .fold(0.0, f32::max)
    }

    pub fn reset(&mut self) {
        self.states = [None; JOINT_COUNT];
    }
}

impl Default for SpringFilter {
    fn default() -> Self {
        Self::new(0.05)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn run(params: JointPhysics, target: f32, ticks: usize, dt: f32) -> SpringState {
        let goal = Vector3::new(target, target, target);
        let mut state = SpringState::default();
        for _ in 0..ticks {
            state = state.step(goal, &params, dt);
        }
        state
    }

    #[test]
    fn test_step_response_after_one_second() {
        let state = run(JointPhysics::new(1.0, 26.0, 170.0), 1.0, 60, 1.0 / 60.0);
        assert!(state.position.x > 0.9 && state.position.x < 1.05, "x = {}", state.position.x);
    }

    #[test]
    fn test_converges_to_target() {
        for joint in JointId::ALL {
            let params = crate::skeleton::joint_physics(joint);
            let state = run(params, 0.8, 1200, 1.0 / 60.0);
            assert_abs_diff_eq!(state.position.x, 0.8, epsilon = 1e-3);
            assert_abs_diff_eq!(state.velocity.x, 0.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_overshoot_is_bounded() {
        for joint in JointId::ALL {
            let params = crate::skeleton::joint_physics(joint);
            let goal = Vector3::new(1.0, 0.0, 0.0);
            let mut state = SpringState::default();
            let mut peak: f32 = 0.0;
            for _ in 0..600 {
                state = state.step(goal, &params, 1.0 / 60.0);
                peak = peak.max(state.position.x);
            }
            assert!(peak < 1.05, "{} overshoots to {}", joint.name(), peak);
        }
    }

    #[test]
    fn test_stable_at_dt_ceiling() {
        let params = crate::skeleton::joint_physics(JointId::LeftHand);
        let state = run(params, 1.0, 200, 0.05);
        assert!(state.position.x.is_finite());
        assert_abs_diff_eq!(state.position.x, 1.0, epsilon = 1e-2);
    }

    #[test]
    fn test_clamp_dt() {
        assert_eq!(clamp_dt(3.0, 0.05), 0.05);
        assert_eq!(clamp_dt(-1.0, 0.05), 0.0);
        assert_eq!(clamp_dt(f32::NAN, 0.05), 0.0);
        assert_eq!(clamp_dt(0.016, 0.05), 0.016);
    }

    #[test]
    fn test_substeps_cover_elapsed() {
        assert_eq!(substeps(0.016, 0.05), (1, 0.016));
        let (steps, dt) = substeps(4.0 / 60.0, 0.05);
        assert_eq!(steps, 2);
        assert_abs_diff_eq!(dt * steps as f32, 4.0 / 60.0, epsilon = 1e-6);
        assert_eq!(substeps(f32::NAN, 0.05), (0, 0.0));
        assert_eq!(substeps(-1.0, 0.05), (0, 0.0));
    }

    #[test]
    fn test_filter_long_span_matches_frame_steps() {
        let start = Pose::from_pairs([(JointId::Chest, Vector3::zeros())]);
        let goal = Pose::from_pairs([(JointId::Chest, Vector3::new(0.6, 0.0, 0.0))]);

        let mut per_frame = SpringFilter::default();
        per_frame.update(&start, 1.0 / 60.0, |_| true);
        let mut batched = SpringFilter::default();
        batched.update(&start, 1.0 / 60.0, |_| true);

        let mut a = Pose::new();
        for _ in 0..4 {
            a = per_frame.update(&goal, 1.0 / 60.0, |_| true);
        }
        let b = batched.update(&goal, 4.0 / 60.0, |_| true);
        // Same span of time; only the step size differs
        assert_abs_diff_eq!(a.rotation(JointId::Chest).x, b.rotation(JointId::Chest).x, epsilon = 0.03);
        assert!(b.rotation(JointId::Chest).x > 0.05);
    }

    #[test]
    fn test_filter_first_sight_starts_on_target() {
        let mut filter = SpringFilter::default();
        let target = Pose::from_pairs([(JointId::Chest, Vector3::new(0.3, 0.0, 0.0))]);
        let out = filter.update(&target, 1.0 / 60.0, |_| true);
        assert_eq!(out, target);
    }

    #[test]
    fn test_filter_skips_masked_joints() {
        let mut filter = SpringFilter::default();
        let start = Pose::from_pairs([
            (JointId::Chest, Vector3::zeros()),
            (JointId::LeftHand, Vector3::zeros()),
        ]);
        filter.update(&start, 1.0 / 60.0, |_| true);

        let moved = Pose::from_pairs([
            (JointId::Chest, Vector3::new(0.5, 0.0, 0.0)),
            (JointId::LeftHand, Vector3::new(0.5, 0.0, 0.0)),
        ]);
        let out = filter.update(&moved, 1.0 / 60.0, |j| j != JointId::LeftHand);
        assert!(out.rotation(JointId::Chest).x > 0.0);
        assert_eq!(out.rotation(JointId::LeftHand).x, 0.0);
        assert!(filter.peak_speed() > 0.0);
    }
}

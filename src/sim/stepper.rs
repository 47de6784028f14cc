use crate::dynamics::kinematics::{advance_position, apply_friction, clamp_magnitude};
use crate::dynamics::state::Body;
use crate::gnc::{track_velocity, Branch, Controller, PidState};
use crate::params::Params;

// ---------------------------------------------------------------------------
// One fixed-timestep update of the cart
// ---------------------------------------------------------------------------

/// What happened during a single step, for snapshots and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    pub error: f64,
    pub target: f64,
    pub branch: Branch,
    /// Velocity had to be clamped to `±max_vel` this tick.
    pub saturated: bool,
}

/// Advance `body` by one `dt` using the PID controller.
pub fn step(body: &mut Body, pid: &mut PidState, params: &Params) -> StepReport {
    step_with(body, pid, params)
}

/// Advance `body` by one `dt` with an arbitrary controller.
///
/// Order matters and matches the physical model:
///   1. move with last tick's velocity and acceleration
///   2. error against the goal from the new position
///   3. controller turns error into a target velocity
///   4. jerk/acceleration-limited velocity tracking
///   5. velocity clamp to `±max_vel`
///   6. linear friction (may overshoot zero for large factors)
///
/// Total for every numeric input: nothing here can panic, non-finite values
/// just propagate.
pub fn step_with(body: &mut Body, controller: &mut dyn Controller, params: &Params) -> StepReport {
    let dt = params.constants.dt;

    advance_position(body, dt);
    let error = params.goal_position() - body.position;

    let target = controller.target_velocity(error, &params.pid, dt);
    let branch = track_velocity(body, target, &params.body, dt);

    let saturated = body.velocity.abs() > params.body.max_vel;
    body.velocity = clamp_magnitude(body.velocity, params.body.max_vel);
    let friction = params.constants.friction_factor(params.body.mass);
    body.velocity = apply_friction(body.velocity, friction);

    StepReport { error, target, branch, saturated }
}

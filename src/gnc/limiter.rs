use serde::Serialize;

use crate::dynamics::state::Body;
use crate::params::BodyParams;

// ---------------------------------------------------------------------------
// Acceleration-constrained velocity tracking
// ---------------------------------------------------------------------------

/// Which path [`track_velocity`] took on a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Branch {
    /// Current acceleration already covers the gap; velocity jumps to target.
    Snap,
    /// Acceleration ramped by at most `max_jerk*dt` and velocity integrated.
    Ramp,
}

/// Pull `body.velocity` toward `target`.
///
/// If `target - v <= a*dt` the velocity is set to the target directly and
/// the acceleration is left as is. Otherwise the acceleration moves toward
/// the sign of the gap by `max_jerk*dt` and the velocity is integrated with
/// it. An acceleration whose magnitude exceeds `max_acc` is replaced by
/// `max_acc` carrying the sign of the gap, whatever its own sign was.
pub fn track_velocity(body: &mut Body, target: f64, limits: &BodyParams, dt: f64) -> Branch {
    let diff = target - body.velocity;
    if diff <= body.acceleration * dt {
        body.velocity = target;
        return Branch::Snap;
    }

    let jerk_step = limits.max_jerk * dt;
    if diff < 0.0 {
        body.acceleration -= jerk_step;
        if body.acceleration.abs() > limits.max_acc {
            body.acceleration = -limits.max_acc;
        }
    } else {
        body.acceleration += jerk_step;
        if body.acceleration.abs() > limits.max_acc {
            body.acceleration = limits.max_acc;
        }
    }
    body.velocity += body.acceleration * dt;
    Branch::Ramp
}

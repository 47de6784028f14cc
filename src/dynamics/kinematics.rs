use super::state::Body;

// ---------------------------------------------------------------------------
// Kinematic helpers used by the stepper
// ---------------------------------------------------------------------------

/// Move the body with the velocity and acceleration carried over from the
/// previous tick: `x += v*dt + a*dt^2/2`.
pub fn advance_position(body: &mut Body, dt: f64) {
    body.position += body.velocity * dt + 0.5 * body.acceleration * dt * dt;
}

/// Limit `value` to `±limit`, keeping its sign.
///
/// Never panics; a negative or NaN limit gives a meaningless result.
pub fn clamp_magnitude(value: f64, limit: f64) -> f64 {
    if value < 0.0 && value.abs() > limit {
        -limit
    } else if value > 0.0 && value.abs() > limit {
        limit
    } else {
        value
    }
}

/// Linear ground drag: `v -= v * factor`, where `factor = m*g*mu`.
///
/// Not clamped at zero. A factor above 1 flips the sign of the velocity and
/// one above 2 grows its magnitude.
pub fn apply_friction(velocity: f64, factor: f64) -> f64 {
    if velocity != 0.0 {
        velocity - velocity * factor
    } else {
        velocity
    }
}

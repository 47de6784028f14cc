use crate::params::PidGains;

/// Trait for velocity controllers.
///
/// Implement this to plug a different control law into the stepper. The
/// stepper still applies the jerk/acceleration limits, the velocity clamp
/// and friction to whatever target velocity the controller asks for.
pub trait Controller {
    /// Target velocity for the current position error.
    fn target_velocity(&mut self, error: f64, gains: &PidGains, dt: f64) -> f64;

    /// Reset internal state (e.g., PID integrators).
    fn reset(&mut self) {}

    /// Human-readable name for logging/display.
    fn name(&self) -> &str {
        "unnamed"
    }
}

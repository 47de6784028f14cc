use crate::params::PidGains;

// ---------------------------------------------------------------------------
// PID controller state (gains live in the parameter store)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PidState {
    accumulated_error: f64,
    /// `None` until the first update.
    prev_error: Option<f64>,
}

/// Individual contributions of one update, summed into `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidOutput {
    pub p: f64,
    pub i: f64,
    pub d: f64,
    pub target: f64,
}

impl PidState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold `error` into the controller and return the target velocity.
    ///
    /// The integral only accumulates while `|error| < integral_threshold`.
    /// The derivative is zero on the first update and whenever `dt == 0`.
    pub fn update(&mut self, gains: &PidGains, error: f64, dt: f64) -> PidOutput {
        if error.abs() < gains.integral_threshold {
            self.accumulated_error += error;
        }

        let d = match self.prev_error {
            Some(prev) if dt != 0.0 => gains.kd * ((error - prev) / dt),
            _ => 0.0,
        };
        self.prev_error = Some(error);

        let p = gains.kp * error;
        let i = gains.ki * self.accumulated_error;
        PidOutput { p, i, d, target: p + i + d }
    }

    pub fn accumulated_error(&self) -> f64 {
        self.accumulated_error
    }

    pub fn prev_error(&self) -> Option<f64> {
        self.prev_error
    }

    pub fn reset(&mut self) {
        self.accumulated_error = 0.0;
        self.prev_error = None;
    }
}

impl super::Controller for PidState {
    fn target_velocity(&mut self, error: f64, gains: &PidGains, dt: f64) -> f64 {
        self.update(gains, error, dt).target
    }

    fn reset(&mut self) {
        PidState::reset(self);
    }

    fn name(&self) -> &str {
        "PID"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gains(kp: f64, ki: f64, kd: f64, threshold: f64) -> PidGains {
        PidGains { kp, ki, kd, integral_threshold: threshold }
    }

    #[test]
    fn pid_proportional() {
        let mut pid = PidState::new();
        let out = pid.update(&gains(0.1, 0.0, 0.0, 15.0), 450.0, 0.1);
        assert!((out.target - 45.0).abs() < 1e-10, "Pure P should output Kp * error");
    }

    #[test]
    fn pid_integral_accumulates_inside_threshold() {
        let mut pid = PidState::new();
        let g = gains(0.0, 1.0, 0.0, 15.0);
        pid.update(&g, 2.0, 0.1);
        let out = pid.update(&g, 3.0, 0.1);
        assert_eq!(pid.accumulated_error(), 5.0);
        assert_eq!(out.target, 5.0);
    }

    #[test]
    fn integral_gate_blocks_large_errors() {
        let mut pid = PidState::new();
        let g = gains(0.0, 1.0, 0.0, 15.0);
        for e in [450.0, -30.0, 15.0, -15.0, 100.0] {
            pid.update(&g, e, 0.1);
            assert_eq!(pid.accumulated_error(), 0.0, "error {e} must not accumulate");
        }
        pid.update(&g, 14.0, 0.1);
        assert_eq!(pid.accumulated_error(), 14.0);
    }

    #[test]
    fn infinite_threshold_disables_gate() {
        let mut pid = PidState::new();
        pid.update(&gains(0.0, 1.0, 0.0, f64::INFINITY), 450.0, 0.1);
        assert_eq!(pid.accumulated_error(), 450.0);
    }

    #[test]
    fn derivative_is_zero_on_first_update() {
        let mut pid = PidState::new();
        assert_eq!(pid.prev_error(), None);
        let out = pid.update(&gains(0.0, 0.0, 1e9, 15.0), 450.0, 0.1);
        assert_eq!(out.d, 0.0);
        assert_eq!(pid.prev_error(), Some(450.0));

        // even an infinite gain contributes nothing on the bootstrap update
        let mut pid = PidState::new();
        let out = pid.update(&gains(0.0, 0.0, f64::INFINITY, 15.0), 450.0, 0.1);
        assert_eq!(out.d, 0.0);
    }

    #[test]
    fn derivative_tracks_error_change() {
        let mut pid = PidState::new();
        let g = gains(0.0, 0.0, 2.0, 15.0);
        pid.update(&g, 10.0, 0.5);
        let out = pid.update(&g, 9.0, 0.5);
        assert_eq!(out.d, -4.0);
        assert_eq!(pid.prev_error(), Some(9.0));
    }

    #[test]
    fn zero_dt_skips_derivative() {
        let mut pid = PidState::new();
        let g = gains(0.0, 0.0, 1.0, 15.0);
        pid.update(&g, 10.0, 0.1);
        let out = pid.update(&g, 8.0, 0.0);
        assert_eq!(out.d, 0.0);
        assert!(out.target.is_finite());
        assert_eq!(pid.prev_error(), Some(8.0));
    }

    #[test]
    fn reset_clears_state() {
        let mut pid = PidState::new();
        let g = gains(1.0, 1.0, 1.0, f64::INFINITY);
        pid.update(&g, 3.0, 0.1);
        pid.reset();
        assert_eq!(pid, PidState::new());
    }
}

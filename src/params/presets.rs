//! Named controller variants. All share the same body, track and constants;
//! they differ only in which PID terms are active and whether the integral
//! is gated.

use super::{Params, PidGains};
use crate::error::{Result, SimError};

pub const NAMES: [&str; 4] = ["pid", "pi", "pid-ungated", "p"];

/// Full PID with the anti-windup gate at 15 units.
pub fn pid() -> Params {
    Params::default()
}

/// Derivative term disabled.
pub fn pi() -> Params {
    with_gains(PidGains { kd: 0.0, ..PidGains::default() })
}

/// Integral accumulates at any distance from the goal.
pub fn pid_ungated() -> Params {
    with_gains(PidGains { integral_threshold: f64::INFINITY, ..PidGains::default() })
}

/// Proportional only.
pub fn p() -> Params {
    with_gains(PidGains { kp: 0.1, ki: 0.0, kd: 0.0, integral_threshold: f64::INFINITY })
}

pub fn by_name(name: &str) -> Result<Params> {
    match name {
        "pid" => Ok(pid()),
        "pi" => Ok(pi()),
        "pid-ungated" => Ok(pid_ungated()),
        "p" => Ok(p()),
        other => Err(SimError::UnknownPreset(other.to_string())),
    }
}

fn with_gains(pid: PidGains) -> Params {
    Params { pid, ..Params::default() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_name_resolves() {
        for name in NAMES {
            assert!(by_name(name).is_ok(), "{name} should resolve");
        }
    }

    #[test]
    fn variants_differ_only_in_gains() {
        let base = pid();
        for name in NAMES {
            let p = by_name(name).unwrap();
            assert_eq!(p.body, base.body);
            assert_eq!(p.constants, base.constants);
            assert_eq!(p.goal, base.goal);
        }
        assert_eq!(pi().pid.kd, 0.0);
        assert!(pid_ungated().pid.integral_threshold.is_infinite());
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert!(matches!(by_name("pd"), Err(SimError::UnknownPreset(n)) if n == "pd"));
    }
}

pub mod file;
pub mod presets;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Parameter store: everything a UI or config file may tune between ticks
// ---------------------------------------------------------------------------

/// Complete set of tunable quantities read by the stepper every tick.
///
/// No validation happens here. Zero or negative gains, a zero timestep or
/// negative limits are all accepted; the stepper produces defined (if
/// physically meaningless) numbers for them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    pub pid: PidGains,
    pub body: BodyParams,
    pub constants: SimConstants,
    pub goal: GoalParams,
    pub track: TrackParams,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PidGains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    /// Error magnitude below which the integral accumulates.
    /// `f64::INFINITY` turns the gate off.
    pub integral_threshold: f64,
}

impl Default for PidGains {
    fn default() -> Self {
        Self { kp: 0.1, ki: 0.00001, kd: 0.00001, integral_threshold: 15.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyParams {
    pub mass: f64,       // kg
    pub size: f64,       // edge length of the square body
    pub max_vel: f64,    // units/s
    pub max_acc: f64,    // units/s^2
    pub max_jerk: f64,   // units/s^3
}

impl Default for BodyParams {
    fn default() -> Self {
        Self { mass: 60.0, size: 20.0, max_vel: 35.0, max_acc: 5.0, max_jerk: 1.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConstants {
    pub dt: f64,         // s per tick
    pub gravity: f64,
    pub friction: f64,   // ground friction coefficient
}

impl Default for SimConstants {
    fn default() -> Self {
        Self { dt: 0.1, gravity: 9.8, friction: 0.000001 }
    }
}

impl SimConstants {
    /// Fraction of velocity removed by friction each tick for a body of `mass`.
    pub fn friction_factor(&self, mass: f64) -> f64 {
        mass * self.gravity * self.friction
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalParams {
    /// Distance of the goal's near edge from the far end of the track.
    pub offset: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for GoalParams {
    fn default() -> Self {
        Self { offset: 50.0, width: 5.0, height: 20.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackParams {
    pub length: f64,
    /// Height of the running surface above the bottom of the scene.
    pub surface: f64,
    pub thickness: f64,
}

impl Default for TrackParams {
    fn default() -> Self {
        Self { length: 500.0, surface: 100.0, thickness: 20.0 }
    }
}

impl Params {
    /// Target position the controller drives the body toward.
    pub fn goal_position(&self) -> f64 {
        self.track.length - self.goal.offset
    }

    /// Bulk-set every field present in `update`. Returns how many values changed.
    pub fn apply(&mut self, update: &ParamUpdate) -> usize {
        [
            set(&mut self.pid.kp, update.kp, "kp"),
            set(&mut self.pid.ki, update.ki, "ki"),
            set(&mut self.pid.kd, update.kd, "kd"),
            set(&mut self.pid.integral_threshold, update.integral_threshold, "integral_threshold"),
            set(&mut self.body.max_vel, update.max_vel, "max_vel"),
            set(&mut self.body.max_acc, update.max_acc, "max_acc"),
            set(&mut self.body.max_jerk, update.max_jerk, "max_jerk"),
            set(&mut self.body.mass, update.mass, "mass"),
            set(&mut self.constants.friction, update.friction, "friction"),
            set(&mut self.constants.dt, update.dt, "dt"),
            set(&mut self.constants.gravity, update.gravity, "gravity"),
        ]
        .into_iter()
        .filter(|changed| *changed)
        .count()
    }
}

fn set(field: &mut f64, value: Option<f64>, name: &str) -> bool {
    match value {
        // total_cmp so that NaN -> NaN is not reported as a change
        Some(v) if v.total_cmp(field).is_ne() => {
            tracing::debug!(param = name, old = *field, new = v, "parameter updated");
            *field = v;
            true
        }
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Partial update (what a tuning widget or CLI override sends)
// ---------------------------------------------------------------------------

/// A subset of tunable values. `None` leaves the current value alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParamUpdate {
    pub kp: Option<f64>,
    pub ki: Option<f64>,
    pub kd: Option<f64>,
    pub integral_threshold: Option<f64>,
    pub max_vel: Option<f64>,
    pub max_acc: Option<f64>,
    pub max_jerk: Option<f64>,
    pub friction: Option<f64>,
    pub dt: Option<f64>,
    pub gravity: Option<f64>,
    pub mass: Option<f64>,
}

impl ParamUpdate {
    /// Every tunable of `params`, as an update. Goal and track are not tunable.
    pub fn tunables(params: &Params) -> Self {
        Self {
            kp: Some(params.pid.kp),
            ki: Some(params.pid.ki),
            kd: Some(params.pid.kd),
            integral_threshold: Some(params.pid.integral_threshold),
            max_vel: Some(params.body.max_vel),
            max_acc: Some(params.body.max_acc),
            max_jerk: Some(params.body.max_jerk),
            friction: Some(params.constants.friction),
            dt: Some(params.constants.dt),
            gravity: Some(params.constants.gravity),
            mass: Some(params.body.mass),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

pub struct ParamsBuilder {
    params: Params,
}

impl ParamsBuilder {
    pub fn new() -> Self {
        Self { params: Params::default() }
    }

    pub fn gains(mut self, kp: f64, ki: f64, kd: f64) -> Self {
        self.params.pid.kp = kp;
        self.params.pid.ki = ki;
        self.params.pid.kd = kd;
        self
    }

    pub fn integral_threshold(mut self, v: f64) -> Self { self.params.pid.integral_threshold = v; self }
    pub fn mass(mut self, v: f64) -> Self { self.params.body.mass = v; self }
    pub fn max_vel(mut self, v: f64) -> Self { self.params.body.max_vel = v; self }
    pub fn max_acc(mut self, v: f64) -> Self { self.params.body.max_acc = v; self }
    pub fn max_jerk(mut self, v: f64) -> Self { self.params.body.max_jerk = v; self }
    pub fn dt(mut self, v: f64) -> Self { self.params.constants.dt = v; self }
    pub fn gravity(mut self, v: f64) -> Self { self.params.constants.gravity = v; self }
    pub fn friction(mut self, v: f64) -> Self { self.params.constants.friction = v; self }
    pub fn goal_offset(mut self, v: f64) -> Self { self.params.goal.offset = v; self }

    pub fn build(self) -> Params {
        self.params
    }
}

impl Default for ParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

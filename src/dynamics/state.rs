use serde::Serialize;

// ---------------------------------------------------------------------------
// Body kinematic state (1D, along the track)
// ---------------------------------------------------------------------------

/// Mutable kinematic state of the cart. Physical description (mass, size,
/// limits) lives in [`crate::params::BodyParams`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Body {
    pub position: f64,       // distance travelled from the start line
    pub velocity: f64,
    pub acceleration: f64,
}

impl Body {
    pub fn at_rest() -> Self {
        Self::default()
    }
}

// ---------------------------------------------------------------------------
// Snapshot handed to renderers and reporters after each tick
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BodySnapshot {
    pub tick: u64,
    pub time: f64,            // s, sum of dt over all ticks so far
    pub position: f64,
    pub velocity: f64,
    pub acceleration: f64,
    pub error: f64,           // goal - position after this tick's move
    pub target: f64,          // controller output (target velocity)
    pub saturated: bool,      // velocity clamp engaged this tick
    pub at_goal: bool,
}

impl BodySnapshot {
    /// Snapshot of a body that has not been stepped yet.
    pub fn initial(body: &Body, error: f64, at_goal: bool) -> Self {
        Self {
            tick: 0,
            time: 0.0,
            position: body.position,
            velocity: body.velocity,
            acceleration: body.acceleration,
            error,
            target: 0.0,
            saturated: false,
            at_goal,
        }
    }
}

// ---------------------------------------------------------------------------
// Run state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum RunState {
    #[default]
    Stopped,
    Running,
}

impl RunState {
    pub fn is_running(self) -> bool {
        self == RunState::Running
    }
}

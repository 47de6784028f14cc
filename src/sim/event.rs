use serde::Serialize;

use crate::dynamics::state::BodySnapshot;

// ---------------------------------------------------------------------------
// Run events
// ---------------------------------------------------------------------------

/// Kinds of run events.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EventKind {
    GoalReached,
    VelocityLimit,
    Reversal,
    Custom(String),
}

/// A discrete event that occurred during a run.
#[derive(Debug, Clone, Serialize)]
pub struct SimEvent {
    pub tick: u64,
    pub time: f64,
    pub kind: EventKind,
    pub snapshot: BodySnapshot,
}

/// Trait for passive event detectors.
/// Implementations inspect consecutive snapshots and report events.
pub trait EventDetector {
    fn check(&mut self, prev: &BodySnapshot, current: &BodySnapshot) -> Option<EventKind>;
}

/// Fires each time the body enters the goal marker.
pub struct GoalReachedDetector;

impl EventDetector for GoalReachedDetector {
    fn check(&mut self, prev: &BodySnapshot, current: &BodySnapshot) -> Option<EventKind> {
        (!prev.at_goal && current.at_goal).then_some(EventKind::GoalReached)
    }
}

/// Fires once, the first time the velocity clamp engages.
#[derive(Default)]
pub struct VelocityLimitDetector {
    fired: bool,
}

impl VelocityLimitDetector {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventDetector for VelocityLimitDetector {
    fn check(&mut self, _prev: &BodySnapshot, current: &BodySnapshot) -> Option<EventKind> {
        if self.fired || !current.saturated {
            return None;
        }
        self.fired = true;
        Some(EventKind::VelocityLimit)
    }
}

/// Detects a change of direction (velocity sign flip).
pub struct ReversalDetector;

impl EventDetector for ReversalDetector {
    fn check(&mut self, prev: &BodySnapshot, current: &BodySnapshot) -> Option<EventKind> {
        let flipped = (prev.velocity > 0.0 && current.velocity < 0.0)
            || (prev.velocity < 0.0 && current.velocity > 0.0);
        flipped.then_some(EventKind::Reversal)
    }
}

/// Fires once when the tracking error first drops below `tolerance`.
pub struct ErrorBandDetector {
    pub tolerance: f64,
    fired: bool,
}

impl ErrorBandDetector {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance, fired: false }
    }
}

impl EventDetector for ErrorBandDetector {
    fn check(&mut self, _prev: &BodySnapshot, current: &BodySnapshot) -> Option<EventKind> {
        if self.fired || current.error.abs() >= self.tolerance {
            return None;
        }
        self.fired = true;
        Some(EventKind::Custom(format!("Error within {:.1}", self.tolerance)))
    }
}

use crate::dynamics::state::{Body, BodySnapshot, RunState};
use crate::dynamics::track;
use crate::gnc::{Controller, PidState};
use crate::params::{ParamUpdate, Params};
use super::event::{
    EventDetector, GoalReachedDetector, ReversalDetector, SimEvent, VelocityLimitDetector,
};
use super::stepper::step_with;

// ---------------------------------------------------------------------------
// Simulation context: owns parameters, body, controller and run state
// ---------------------------------------------------------------------------

/// Everything a driver needs to run the cart: it is the single owner of the
/// parameter store and the body/controller state. UI collaborators talk to
/// it through `configure`, `start`, `restart` and `tick`.
#[derive(Debug, Clone)]
pub struct Simulation<C = PidState> {
    params: Params,
    body: Body,
    controller: C,
    run_state: RunState,
    last: BodySnapshot,
}

impl Simulation<PidState> {
    pub fn new(params: Params) -> Self {
        Self::with_controller(params, PidState::new())
    }

    pub fn pid(&self) -> &PidState {
        &self.controller
    }
}

impl Default for Simulation<PidState> {
    fn default() -> Self {
        Self::new(Params::default())
    }
}

impl<C: Controller> Simulation<C> {
    pub fn with_controller(params: Params, controller: C) -> Self {
        let body = Body::at_rest();
        let last = initial_snapshot(&params, &body);
        Self { params, body, controller, run_state: RunState::Stopped, last }
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn controller(&self) -> &C {
        &self.controller
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    /// Most recent snapshot (the initial one before the first tick).
    pub fn snapshot(&self) -> BodySnapshot {
        self.last
    }

    /// Bulk-set tunables; takes effect on the next tick. Returns the number of
    /// values that changed. Goal and track only change through `reconfigure`.
    pub fn configure(&mut self, update: &ParamUpdate) -> usize {
        let changed = self.params.apply(update);
        if changed > 0 {
            tracing::debug!(changed, "parameters reconfigured between ticks");
        }
        changed
    }

    /// Replace the whole parameter set (including goal and track) and restart.
    pub fn reconfigure(&mut self, params: Params) {
        tracing::info!(goal = params.goal_position(), "full reconfiguration");
        self.params = params;
        self.restart();
    }

    pub fn start(&mut self) {
        if !self.run_state.is_running() {
            tracing::info!(controller = self.controller.name(), "simulation started");
            self.run_state = RunState::Running;
        }
    }

    /// Put the body back at rest at the start line, clear the controller, and stop.
    pub fn restart(&mut self) {
        self.body = Body::at_rest();
        self.controller.reset();
        self.run_state = RunState::Stopped;
        self.last = initial_snapshot(&self.params, &self.body);
        tracing::info!("simulation restarted");
    }

    /// Advance one tick if running. Returns `None` while stopped.
    pub fn tick(&mut self) -> Option<BodySnapshot> {
        if !self.run_state.is_running() {
            return None;
        }

        let report = step_with(&mut self.body, &mut self.controller, &self.params);
        let snapshot = BodySnapshot {
            tick: self.last.tick + 1,
            time: self.last.time + self.params.constants.dt,
            position: self.body.position,
            velocity: self.body.velocity,
            acceleration: self.body.acceleration,
            error: report.error,
            target: report.target,
            saturated: report.saturated,
            at_goal: self.reached_goal(),
        };
        tracing::trace!(
            tick = snapshot.tick,
            position = snapshot.position,
            velocity = snapshot.velocity,
            acceleration = snapshot.acceleration,
            branch = ?report.branch,
            "tick"
        );
        self.last = snapshot;
        Some(snapshot)
    }

    pub fn reached_goal(&self) -> bool {
        track::reached_goal(&self.params, self.body.position)
    }

    /// Headless run: start if needed, then tick up to `max_ticks` times.
    /// The returned trajectory begins with the pre-run snapshot.
    pub fn run(&mut self, max_ticks: u64, stop_at_goal: bool) -> RunLog {
        let mut detectors: Vec<Box<dyn EventDetector>> = vec![
            Box::new(GoalReachedDetector),
            Box::new(VelocityLimitDetector::new()),
            Box::new(ReversalDetector),
        ];
        self.run_with(max_ticks, stop_at_goal, &mut detectors)
    }

    pub fn run_with(
        &mut self,
        max_ticks: u64,
        stop_at_goal: bool,
        detectors: &mut [Box<dyn EventDetector>],
    ) -> RunLog {
        self.start();

        let cap = usize::try_from(max_ticks).unwrap_or(usize::MAX).min(200_000);
        let mut trajectory = Vec::with_capacity(cap + 1);
        let mut events = Vec::new();
        trajectory.push(self.last);

        for _ in 0..max_ticks {
            let prev = self.last;
            let Some(current) = self.tick() else { break };

            for det in detectors.iter_mut() {
                if let Some(kind) = det.check(&prev, &current) {
                    tracing::info!(tick = current.tick, time = current.time, event = ?kind, "run event");
                    events.push(SimEvent { tick: current.tick, time: current.time, kind, snapshot: current });
                }
            }
            trajectory.push(current);

            if stop_at_goal && current.at_goal {
                break;
            }
        }

        RunLog { trajectory, events }
    }
}

fn initial_snapshot(params: &Params, body: &Body) -> BodySnapshot {
    BodySnapshot::initial(
        body,
        params.goal_position() - body.position,
        track::reached_goal(params, body.position),
    )
}

/// Output of a headless run.
#[derive(Debug, Clone, Default)]
pub struct RunLog {
    pub trajectory: Vec<BodySnapshot>,
    pub events: Vec<SimEvent>,
}

impl RunLog {
    /// First tick at which the body touched the goal marker.
    pub fn goal_tick(&self) -> Option<u64> {
        self.trajectory.iter().find(|s| s.at_goal).map(|s| s.tick)
    }
}

/// Run the PID simulation from rest with the given parameters.
pub fn simulate(params: &Params, max_ticks: u64, stop_at_goal: bool) -> RunLog {
    Simulation::new(params.clone()).run(max_ticks, stop_at_goal)
}

/// Run from rest with a custom controller.
pub fn simulate_with<C: Controller>(
    params: &Params,
    controller: C,
    max_ticks: u64,
    stop_at_goal: bool,
) -> RunLog {
    Simulation::with_controller(params.clone(), controller).run(max_ticks, stop_at_goal)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::params::Params;
use crate::sim::event::{EventKind, SimEvent};
use crate::sim::RunLog;

/// Summary statistics computed from a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub elapsed_s: f64,
    pub final_position: f64,
    pub final_velocity: f64,
    pub final_error: f64,
    pub peak_speed: f64,
    pub peak_acceleration: f64,
    pub goal_tick: Option<u64>,
    /// How far the body travelled past the goal position (0 if it never did).
    pub overshoot: f64,
    pub reversals: usize,
    /// Integral term state of the PID controller when the run ended.
    pub accumulated_error: f64,
}

impl RunSummary {
    pub fn from_run(log: &RunLog, params: &Params, accumulated_error: f64) -> Self {
        let (ticks, elapsed_s, final_position, final_velocity, final_error) = log
            .trajectory
            .last()
            .map(|s| (s.tick, s.time, s.position, s.velocity, s.error))
            .unwrap_or((0, 0.0, 0.0, 0.0, params.goal_position()));

        let peak_speed = log.trajectory.iter().map(|s| s.velocity.abs()).fold(0.0_f64, f64::max);
        let peak_acceleration = log
            .trajectory
            .iter()
            .map(|s| s.acceleration.abs())
            .fold(0.0_f64, f64::max);
        let furthest = log.trajectory.iter().map(|s| s.position).fold(f64::NEG_INFINITY, f64::max);

        RunSummary {
            ticks,
            elapsed_s,
            final_position,
            final_velocity,
            final_error,
            peak_speed,
            peak_acceleration,
            goal_tick: log.goal_tick(),
            overshoot: (furthest - params.goal_position()).max(0.0),
            reversals: log.events.iter().filter(|e| e.kind == EventKind::Reversal).count(),
            accumulated_error,
        }
    }
}

#[derive(Serialize)]
struct Report<'a> {
    params: &'a Params,
    performance: &'a RunSummary,
    events: &'a [SimEvent],
}

/// Write parameters, summary and events as pretty-printed JSON.
pub fn write_summary<W: Write>(
    writer: &mut W,
    params: &Params,
    summary: &RunSummary,
    events: &[SimEvent],
) -> Result<()> {
    let report = Report { params, performance: summary, events };
    serde_json::to_writer_pretty(&mut *writer, &report)?;
    writeln!(writer)?;
    Ok(())
}

/// Write the JSON report to a file.
pub fn write_summary_file(
    path: impl AsRef<Path>,
    params: &Params,
    summary: &RunSummary,
    events: &[SimEvent],
) -> Result<()> {
    let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
    write_summary(&mut file, params, summary, events)?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::presets;
    use crate::sim::Simulation;

    fn pid_run(max_ticks: u64, stop_at_goal: bool) -> (Params, RunLog, RunSummary) {
        let params = presets::pid();
        let mut sim = Simulation::new(params.clone());
        let log = sim.run(max_ticks, stop_at_goal);
        let summary = RunSummary::from_run(&log, &params, sim.pid().accumulated_error());
        (params, log, summary)
    }

    #[test]
    fn summary_of_goal_run() {
        let (params, _, s) = pid_run(5_000, true);
        assert_eq!(s.goal_tick, Some(s.ticks));
        assert!(s.peak_speed <= params.body.max_vel);
        assert!(s.peak_acceleration <= params.body.max_acc);
        assert_eq!(s.overshoot, 0.0);
        assert!((s.elapsed_s - s.ticks as f64 * params.constants.dt).abs() < 1e-6);
    }

    #[test]
    fn empty_log_summarises_to_start() {
        let params = Params::default();
        let s = RunSummary::from_run(&RunLog::default(), &params, 0.0);
        assert_eq!(s.ticks, 0);
        assert_eq!(s.accumulated_error, 0.0);
        assert_eq!(s.final_error, 450.0);
        assert_eq!(s.goal_tick, None);
    }

    #[test]
    fn json_output_is_valid() {
        let (params, log, summary) = pid_run(600, false);
        // settling near the goal opens the integral gate
        assert!(summary.accumulated_error > 0.0);

        let mut buf = Vec::new();
        write_summary(&mut buf, &params, &summary, &log.events).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["params"]["pid"]["kp"], 0.1);
        assert!(value["performance"]["goal_tick"].is_u64());
        let written = value["performance"]["accumulated_error"].as_f64().unwrap();
        assert!((written - summary.accumulated_error).abs() < 1e-9);
        assert_eq!(value["events"][0]["kind"], "GoalReached");
    }
}

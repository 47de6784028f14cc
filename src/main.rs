use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pid_cart_sim::io::{self, RunSummary};
use pid_cart_sim::params::presets;
use pid_cart_sim::sim::event::{
    ErrorBandDetector, EventDetector, GoalReachedDetector, ReversalDetector, VelocityLimitDetector,
};
use pid_cart_sim::{ParamUpdate, Params, Simulation};

/// Headless run of the PID cart: drive from rest toward the goal and report.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// TOML parameter file (defaults: $PID_CART_SIM_CONFIG, then config/cart.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start from a named preset instead of a file: pid, pi, pid-ungated, p
    #[arg(short, long, conflicts_with = "config")]
    preset: Option<String>,

    #[arg(long, default_value_t = 5_000)]
    max_ticks: u64,

    /// Keep ticking after the body touches the goal
    #[arg(long)]
    no_stop: bool,

    #[arg(long)]
    kp: Option<f64>,
    #[arg(long)]
    ki: Option<f64>,
    #[arg(long)]
    kd: Option<f64>,
    #[arg(long)]
    i_thresh: Option<f64>,
    #[arg(long)]
    max_vel: Option<f64>,
    #[arg(long)]
    max_acc: Option<f64>,
    #[arg(long)]
    max_jerk: Option<f64>,
    #[arg(long)]
    friction: Option<f64>,
    #[arg(long)]
    dt: Option<f64>,

    /// Write the trajectory as CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write parameters, summary and events as JSON
    #[arg(long)]
    json: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> ParamUpdate {
        ParamUpdate {
            kp: self.kp,
            ki: self.ki,
            kd: self.kd,
            integral_threshold: self.i_thresh,
            max_vel: self.max_vel,
            max_acc: self.max_acc,
            max_jerk: self.max_jerk,
            friction: self.friction,
            dt: self.dt,
            ..Default::default()
        }
    }

    fn base_params(&self) -> Result<Params> {
        if let Some(path) = &self.config {
            return Params::load(path).with_context(|| format!("loading {}", path.display()));
        }
        if let Some(name) = &self.preset {
            return Ok(presets::by_name(name)?);
        }
        Ok(Params::load_or_default())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut sim = Simulation::new(args.base_params()?);
    let overrides = args.overrides();
    if !overrides.is_empty() {
        sim.configure(&overrides);
    }

    let threshold = sim.params().pid.integral_threshold;
    let mut detectors: Vec<Box<dyn EventDetector>> = vec![
        Box::new(GoalReachedDetector),
        Box::new(VelocityLimitDetector::new()),
        Box::new(ReversalDetector),
    ];
    if threshold.is_finite() {
        detectors.push(Box::new(ErrorBandDetector::new(threshold)));
    }

    let log = sim.run_with(args.max_ticks, !args.no_stop, &mut detectors);
    let params = sim.params().clone();
    let summary = RunSummary::from_run(&log, &params, sim.pid().accumulated_error());

    print_report(&params, &summary, &log);
    println!("====================================================================");
    println!();

    if let Some(path) = &args.csv {
        io::write_trajectory_file(path, &log.trajectory)
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), "trajectory written");
    }
    if let Some(path) = &args.json {
        io::write_summary_file(path, &params, &summary, &log.events)
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), "summary written");
    }

    Ok(())
}

fn print_report(params: &Params, summary: &RunSummary, log: &pid_cart_sim::sim::RunLog) {
    let pid = &params.pid;
    let body = &params.body;

    println!();
    println!("====================================================================");
    println!("  PID CART SIMULATION");
    println!("====================================================================");
    println!();
    println!("  Controller");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  kP: {:>10.5}   kI: {:>10.5}   kD: {:>10.5}   I-thresh: {:>6.1}",
        pid.kp, pid.ki, pid.kd, pid.integral_threshold
    );
    println!(
        "  max vel: {:>6.1}   max acc: {:>6.1}   max jerk: {:>6.1}   mass: {:>6.1}",
        body.max_vel, body.max_acc, body.max_jerk, body.mass
    );
    println!(
        "  dt: {:>6.3} s   friction: {:.2e}   goal at {:.1}",
        params.constants.dt,
        params.constants.friction,
        params.goal_position()
    );
    println!();

    println!("  Events");
    println!("  ──────────────────────────────────────────────────────────────────");
    if log.events.is_empty() {
        println!("  (none)");
    }
    for e in &log.events {
        println!(
            "  t={:>7.2}s  tick {:>5}  x={:>8.2}  v={:>7.2}  {:?}",
            e.time, e.tick, e.snapshot.position, e.snapshot.velocity, e.kind
        );
    }
    println!();

    println!("  Trajectory");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>6}  {:>8}  {:>9}  {:>8}  {:>7}  {:>8}",
        "tick", "t (s)", "position", "velocity", "accel", "error"
    );
    println!("  {}", "─".repeat(56));
    let sample_interval = (log.trajectory.len() / 25).max(1);
    for (i, s) in log.trajectory.iter().enumerate() {
        if i % sample_interval != 0 && i != log.trajectory.len() - 1 {
            continue;
        }
        println!(
            "  {:>6}  {:>8.2}  {:>9.2}  {:>8.3}  {:>7.3}  {:>8.2}",
            s.tick, s.time, s.position, s.velocity, s.acceleration, s.error
        );
    }
    println!();

    println!("  Summary");
    println!("  ──────────────────────────────────────────────────────────────────");
    match summary.goal_tick {
        Some(tick) => println!("  Goal reached at tick {tick}"),
        None => println!("  Goal not reached in {} ticks", summary.ticks),
    }
    println!("  Final position:    {:>9.3}   error {:.3}", summary.final_position, summary.final_error);
    println!("  Peak speed:        {:>9.3}", summary.peak_speed);
    println!("  Peak acceleration: {:>9.3}", summary.peak_acceleration);
    println!("  Overshoot:         {:>9.3}", summary.overshoot);
    println!("  Reversals:         {:>9}", summary.reversals);
    println!("  Accumulated error: {:>9.3}", summary.accumulated_error);
}

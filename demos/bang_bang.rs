use pid_cart_sim::gnc::Controller;
use pid_cart_sim::params::{PidGains, Params};
use pid_cart_sim::sim;

/// Full speed ahead until inside `brake_distance`, then ask for a stop.
/// The stepper's jerk and acceleration limits still shape the motion.
struct BangBangController {
    cruise: f64,
    brake_distance: f64,
}

impl Controller for BangBangController {
    fn target_velocity(&mut self, error: f64, _gains: &PidGains, _dt: f64) -> f64 {
        if error > self.brake_distance {
            self.cruise
        } else {
            0.0
        }
    }

    fn name(&self) -> &str {
        "BangBang"
    }
}

fn main() {
    let params = Params::default();
    let controller = BangBangController { cruise: 30.0, brake_distance: 40.0 };

    println!("Simulating with {} controller...", controller.name());
    let log = sim::simulate_with(&params, controller, 3_000, false);

    let last = log.trajectory.last().map(|s| s.position).unwrap_or(0.0);
    let peak = log.trajectory.iter().map(|s| s.velocity.abs()).fold(0.0_f64, f64::max);

    match log.goal_tick() {
        Some(tick) => println!("Reached goal at tick {tick}"),
        None => println!("Never reached the goal"),
    }
    println!("Final position: {:.1} (goal {:.1})", last, params.goal_position());
    println!("Peak speed: {:.2}", peak);
    println!("Events: {}", log.events.len());
}

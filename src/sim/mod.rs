pub mod event;
pub mod runner;
pub mod stepper;

pub use runner::{simulate, simulate_with, RunLog, Simulation};
pub use stepper::{step, step_with, StepReport};

//! One-dimensional cart driven toward a goal by a PID velocity controller,
//! with jerk, acceleration and velocity limits and linear ground friction.
//!
//! [`sim::Simulation`] is the entry point: it owns the parameter store and
//! the body/controller state, and advances one fixed timestep per
//! [`tick`](sim::Simulation::tick) while running.

pub mod dynamics;
pub mod error;
pub mod gnc;
pub mod io;
pub mod params;
pub mod sim;

pub use error::{Result, SimError};
pub use params::{ParamUpdate, Params, ParamsBuilder};
pub use sim::Simulation;

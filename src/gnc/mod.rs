pub mod controller;
pub mod limiter;
pub mod pid;

pub use controller::Controller;
pub use limiter::{track_velocity, Branch};
pub use pid::{PidOutput, PidState};

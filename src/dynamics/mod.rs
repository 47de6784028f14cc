pub mod kinematics;
pub mod state;
pub mod track;

pub use state::{Body, BodySnapshot, RunState};
pub use track::reached_goal;

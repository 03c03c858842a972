pub mod clock;
pub mod controller;
pub mod pace;
pub mod state;

pub use controller::{RunController, RunSnapshot};
pub use state::{RunSessionState, RunStatus};

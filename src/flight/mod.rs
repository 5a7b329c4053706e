//! Drone flight model: state, controls, integrator and autopilot

pub mod state;
pub mod controls;
pub mod dynamics;
pub mod autopilot;

pub use state::{DroneParams, DroneState};
pub use controls::ControlInput;
pub use dynamics::{FlightDynamics, FlightParams, MAX_TILT_ANGLE};
pub use autopilot::{Autopilot, AutopilotParams};

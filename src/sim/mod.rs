//! Headless simulation session

pub mod config;
pub mod session;

pub use config::{CostmapConfig, CostmapSource, SimConfig};
pub use session::{Simulation, TelemetrySample};

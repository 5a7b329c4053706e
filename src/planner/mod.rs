//! Route planning through the voxel costmap

pub mod astar;

pub use astar::{PathPlanner, PlanOutcome};

use serde::{Deserialize, Serialize};

/// Planner configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Maximum nodes dequeued before a search gives up
    pub max_iterations: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self { max_iterations: 50_000 }
    }
}

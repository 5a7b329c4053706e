//! Agrodrone - drone flight simulation over procedurally generated farmland
//!
//! Four engines coupled only through plain data:
//! - [`costmap`]: layered voxel cost grid
//! - [`planner`]: 3D A* over the costmap
//! - [`flight`]: per-tick rigid-body flight model and waypoint autopilot
//! - [`terrain`]: seeded height field and surface features
//!
//! [`sim`] wires them into a steppable session.

pub mod core;
pub mod math;
pub mod terrain;
pub mod costmap;
pub mod planner;
pub mod flight;
pub mod sim;

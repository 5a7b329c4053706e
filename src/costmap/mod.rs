//! Voxel cost grid used by the route planner

pub mod grid;
pub mod builder;

pub use grid::{
    is_blocked, Cost, GridCoord, VoxelCostmap, COST_BLOCKED, COST_CAUTION_HIGH,
    COST_CAUTION_LOW, COST_CROP, COST_FREE,
};
pub use builder::{FARM_COLS, FARM_LAYERS, FARM_ROWS};

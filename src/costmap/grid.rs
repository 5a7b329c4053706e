//! Dense 3D voxel cost grid

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::{Result, Vec3};

/// Traversal cost of a single voxel
pub type Cost = u8;

/// Free space
pub const COST_FREE: Cost = 0;
/// Light caution, e.g. over a crop field
pub const COST_CROP: Cost = 2;
/// Caution left above a ground obstacle two layers up
pub const COST_CAUTION_LOW: Cost = 3;
/// Caution left above a ground obstacle one layer up
pub const COST_CAUTION_HIGH: Cost = 7;
/// Blocked sentinel. Any cost at or above this value is impassable.
pub const COST_BLOCKED: Cost = 10;

/// Whether a cost value is impassable
#[inline]
pub fn is_blocked(cost: Cost) -> bool {
    cost >= COST_BLOCKED
}

/// Integer voxel coordinate: `x` column, `y` row, `z` altitude layer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl GridCoord {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

/// Dense grid of voxel costs with fixed dimensions
///
/// Reads outside the grid return [`COST_BLOCKED`]; writes outside the grid are
/// ignored. Cell values may change between planner runs (dynamic obstacles);
/// the grid does no locking of its own, so a host that mutates it while a
/// search runs elsewhere must serialize access.
#[derive(Clone, Debug, PartialEq)]
pub struct VoxelCostmap {
    cols: usize,
    rows: usize,
    layers: usize,
    altitude_step: f32,
    cells: Vec<Cost>,
}

impl VoxelCostmap {
    /// Create an all-free grid
    pub fn new(cols: usize, rows: usize, layers: usize, altitude_step: f32) -> Result<Self> {
        if cols == 0 || rows == 0 || layers == 0 {
            return Err(Error::InvalidGridShape(format!(
                "dimensions must be positive, got {}x{}x{}",
                cols, rows, layers
            )));
        }
        if !altitude_step.is_finite() || altitude_step <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "altitude step must be positive, got {}",
                altitude_step
            )));
        }
        let len = cols
            .checked_mul(rows)
            .and_then(|n| n.checked_mul(layers))
            .ok_or_else(|| {
                Error::InvalidGridShape(format!("{}x{}x{} overflows", cols, rows, layers))
            })?;

        Ok(Self {
            cols,
            rows,
            layers,
            altitude_step,
            cells: vec![COST_FREE; len],
        })
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn layers(&self) -> usize {
        self.layers
    }

    /// Metres per grid step on every axis
    pub fn altitude_step(&self) -> f32 {
        self.altitude_step
    }

    /// `(cols, rows, layers)`
    pub fn dims(&self) -> (usize, usize, usize) {
        (self.cols, self.rows, self.layers)
    }

    pub fn in_bounds(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0
            && y >= 0
            && z >= 0
            && (x as usize) < self.cols
            && (y as usize) < self.rows
            && (z as usize) < self.layers
    }

    #[inline]
    fn index(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        if !self.in_bounds(x, y, z) {
            return None;
        }
        Some(x as usize + y as usize * self.cols + z as usize * self.cols * self.rows)
    }

    /// Cost at a voxel, [`COST_BLOCKED`] outside the grid
    pub fn get_cost(&self, x: i32, y: i32, z: i32) -> Cost {
        self.index(x, y, z).map_or(COST_BLOCKED, |i| self.cells[i])
    }

    /// Set the cost at a voxel. Out-of-range writes are ignored.
    pub fn set_cost(&mut self, x: i32, y: i32, z: i32, cost: Cost) {
        if let Some(i) = self.index(x, y, z) {
            self.cells[i] = cost;
        }
    }

    pub fn cost_at(&self, c: GridCoord) -> Cost {
        self.get_cost(c.x, c.y, c.z)
    }

    /// Map a world position to the nearest voxel, clamped into the grid.
    /// World x → column, world z → row, world y (altitude) → layer.
    pub fn world_to_grid(&self, world: Vec3) -> GridCoord {
        let step = self.altitude_step;
        let axis = |v: f32, len: usize| -> i32 {
            // NaN casts to 0; infinities saturate and are then clamped
            ((v / step).round() as i64).clamp(0, len as i64 - 1) as i32
        };
        GridCoord::new(
            axis(world.x, self.cols),
            axis(world.z, self.rows),
            axis(world.y, self.layers),
        )
    }

    /// World position of a voxel; inverse of [`VoxelCostmap::world_to_grid`]
    pub fn grid_to_world(&self, c: GridCoord) -> Vec3 {
        let step = self.altitude_step;
        Vec3::new(c.x as f32 * step, c.z as f32 * step, c.y as f32 * step)
    }

    /// Number of blocked voxels in one layer (0 for a missing layer)
    pub fn count_blocked(&self, layer: usize) -> usize {
        if layer >= self.layers {
            return 0;
        }
        let plane = self.cols * self.rows;
        self.cells[layer * plane..(layer + 1) * plane]
            .iter()
            .filter(|&&c| is_blocked(c))
            .count()
    }
}

//! Costmap construction: altitude layering of a ground grid, the procedural
//! farm layout, and ground grids derived from terrain features.

use super::grid::{
    is_blocked, Cost, VoxelCostmap, COST_BLOCKED, COST_CAUTION_HIGH, COST_CAUTION_LOW,
    COST_CROP, COST_FREE,
};
use crate::core::error::Error;
use crate::core::types::Result;
use crate::terrain::{SurfaceFeature, TerrainField};

/// Default procedural farm dimensions
pub const FARM_COLS: usize = 12;
pub const FARM_ROWS: usize = 8;
pub const FARM_LAYERS: usize = 5;

/// Tree canopies reach through this many layers from the ground
const TREE_LAYERS: usize = 3;
/// Side length of a tree cluster in cells
const TREE_CLUSTER: usize = 2;

/// Cost of a ground cell as seen from `layer`.
///
/// Obstacles matter less the higher the drone flies: one layer up a ground
/// obstacle is heavy caution and ground caution passes through, two layers up
/// an obstacle is light caution and caution clears, from three layers up
/// everything is free.
fn layered_cost(ground: Cost, layer: usize) -> Cost {
    match layer {
        0 => ground,
        1 if is_blocked(ground) => COST_CAUTION_HIGH,
        1 => ground,
        2 if is_blocked(ground) => COST_CAUTION_LOW,
        _ => COST_FREE,
    }
}

impl VoxelCostmap {
    /// Build a layered grid from a 2D ground grid indexed `ground[row][col]`.
    ///
    /// Fails with [`Error::InvalidGridShape`] for an empty grid or rows of
    /// unequal length.
    pub fn from_ground(ground: &[Vec<Cost>], layers: usize, altitude_step: f32) -> Result<Self> {
        let rows = ground.len();
        let cols = ground.first().map_or(0, |row| row.len());
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidGridShape("ground grid is empty".to_string()));
        }
        if let Some((i, row)) = ground.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(Error::InvalidGridShape(format!(
                "ground row {} has {} columns, expected {}",
                i,
                row.len(),
                cols
            )));
        }

        let mut grid = Self::new(cols, rows, layers, altitude_step)?;
        for (y, row) in ground.iter().enumerate() {
            for (x, &cost) in row.iter().enumerate() {
                for z in 0..layers {
                    grid.set_cost(x as i32, y as i32, z as i32, layered_cost(cost, z));
                }
            }
        }

        log::debug!(
            "Costmap from ground: {}x{}x{}, {} blocked at ground level",
            cols, rows, layers, grid.count_blocked(0)
        );
        Ok(grid)
    }

    /// Procedural farm: a fenced field with four tree clusters and a crop zone.
    ///
    /// - boundary ring blocked at layer 0 only
    /// - four 2x2 tree clusters blocked through the bottom three layers
    /// - a rectangular crop zone between the clusters at light caution, layer 0
    pub fn procedural_farm(
        cols: usize,
        rows: usize,
        layers: usize,
        altitude_step: f32,
    ) -> Result<Self> {
        let mut grid = Self::new(cols, rows, layers, altitude_step)?;
        let (c, r) = (cols as i32, rows as i32);

        for x in 0..c {
            grid.set_cost(x, 0, 0, COST_BLOCKED);
            grid.set_cost(x, r - 1, 0, COST_BLOCKED);
        }
        for y in 0..r {
            grid.set_cost(0, y, 0, COST_BLOCKED);
            grid.set_cost(c - 1, y, 0, COST_BLOCKED);
        }

        for (ax, ay) in Self::tree_anchors(cols, rows) {
            for dx in 0..TREE_CLUSTER as i32 {
                for dy in 0..TREE_CLUSTER as i32 {
                    for z in 0..TREE_LAYERS.min(layers) as i32 {
                        grid.set_cost(ax + dx, ay + dy, z, COST_BLOCKED);
                    }
                }
            }
        }

        let (left, right, top, bottom) = Self::farm_bounds(cols, rows);
        for x in left + TREE_CLUSTER as i32..right {
            for y in top..=bottom + 1 {
                if !is_blocked(grid.get_cost(x, y, 0)) {
                    grid.set_cost(x, y, 0, COST_CROP);
                }
            }
        }

        log::debug!(
            "Procedural farm {}x{}x{}: {} blocked at ground level",
            cols, rows, layers, grid.count_blocked(0)
        );
        Ok(grid)
    }

    /// Default 12x8x5 procedural farm
    pub fn default_farm(altitude_step: f32) -> Result<Self> {
        Self::procedural_farm(FARM_COLS, FARM_ROWS, FARM_LAYERS, altitude_step)
    }

    /// `(left, right, top, bottom)` cluster anchor lines of the farm layout
    fn farm_bounds(cols: usize, rows: usize) -> (i32, i32, i32, i32) {
        (
            (cols / 4) as i32,
            (cols * 2 / 3) as i32,
            (rows / 4) as i32,
            (rows * 5 / 8) as i32,
        )
    }

    /// Top-left corners of the four tree clusters
    pub fn tree_anchors(cols: usize, rows: usize) -> [(i32, i32); 4] {
        let (left, right, top, bottom) = Self::farm_bounds(cols, rows);
        [(left, top), (right, top), (left, bottom), (right, bottom)]
    }

    /// Build a layered grid from terrain surface features sampled at each
    /// cell position: villages are blocked, crop fields light caution, roads
    /// and plains free.
    pub fn from_terrain(
        terrain: &TerrainField,
        cols: usize,
        rows: usize,
        layers: usize,
        altitude_step: f32,
    ) -> Result<Self> {
        let ground: Vec<Vec<Cost>> = (0..rows)
            .map(|y| {
                (0..cols)
                    .map(|x| {
                        let wx = x as f32 * altitude_step;
                        let wz = y as f32 * altitude_step;
                        match terrain.feature_at(wx, wz) {
                            SurfaceFeature::Village => COST_BLOCKED,
                            SurfaceFeature::CropField => COST_CROP,
                            SurfaceFeature::Plain
                            | SurfaceFeature::RoadHorizontal
                            | SurfaceFeature::RoadVertical => COST_FREE,
                        }
                    })
                    .collect()
            })
            .collect();

        Self::from_ground(&ground, layers, altitude_step)
    }
}

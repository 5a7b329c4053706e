//! Simulation configuration, loadable from JSON

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::types::{Result, Vec3};
use crate::costmap::{FARM_COLS, FARM_LAYERS, FARM_ROWS};
use crate::flight::{AutopilotParams, DroneParams, FlightParams};
use crate::planner::PlannerConfig;
use crate::terrain::TerrainParams;

/// Where the planning costmap comes from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostmapSource {
    /// Boundary, tree clusters and crop zone laid out from the dimensions
    #[default]
    ProceduralFarm,
    /// Surface features sampled from the terrain field
    Terrain,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostmapConfig {
    pub source: CostmapSource,
    pub cols: usize,
    pub rows: usize,
    pub layers: usize,
    /// Edge length of a voxel in metres, horizontally and vertically
    pub altitude_step: f32,
}

impl Default for CostmapConfig {
    fn default() -> Self {
        Self {
            source: CostmapSource::ProceduralFarm,
            cols: FARM_COLS,
            rows: FARM_ROWS,
            layers: FARM_LAYERS,
            altitude_step: 4.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// World seed, overriding `terrain.seed`
    pub seed: u32,
    /// Horizontal start position; the drone starts landed on the terrain
    pub start: Vec3,
    /// Tick length in seconds
    pub tick_seconds: f32,
    pub drone: DroneParams,
    pub costmap: CostmapConfig,
    pub terrain: TerrainParams,
    pub planner: PlannerConfig,
    pub flight: FlightParams,
    pub autopilot: AutopilotParams,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            start: Vec3::new(4.0, 0.0, 4.0),
            tick_seconds: 1.0 / 60.0,
            drone: DroneParams::default(),
            costmap: CostmapConfig::default(),
            terrain: TerrainParams::default(),
            planner: PlannerConfig::default(),
            flight: FlightParams::default(),
            autopilot: AutopilotParams::default(),
        }
    }
}

impl SimConfig {
    /// Terrain parameters with the world seed applied
    pub fn terrain_params(&self) -> TerrainParams {
        TerrainParams {
            seed: self.seed,
            ..self.terrain.clone()
        }
    }

    /// Save as pretty-printed JSON, creating parent directories
    pub fn save_sync(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load from a JSON file. Missing fields take their defaults.
    pub fn load_sync(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

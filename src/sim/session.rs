//! Simulation session tying terrain, costmap, planner and flight together
//!
//! Planning happens in *map* coordinates, where `y` is height above the
//! flight floor (terrain plus ground clearance). Waypoints handed to the
//! autopilot are converted back to absolute world altitude by sampling the
//! terrain under each one.

use serde::{Deserialize, Serialize};

use super::config::{CostmapSource, SimConfig};
use crate::core::types::{Result, Vec3};
use crate::core::Error;
use crate::costmap::{Cost, GridCoord, VoxelCostmap};
use crate::flight::{Autopilot, ControlInput, DroneState, FlightDynamics};
use crate::planner::PathPlanner;
use crate::terrain::{SurfaceFeature, TerrainField};

/// One row of flight telemetry
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    pub tick: u64,
    pub time: f32,
    pub position: Vec3,
    pub velocity: Vec3,
    pub rotation: Vec3,
    pub thrust: f32,
    pub battery_level: f32,
    pub is_flying: bool,
    pub is_hovering: bool,
    pub ground_height: f32,
    pub surface: SurfaceFeature,
    /// Active autopilot waypoint in world coordinates
    pub target: Option<Vec3>,
    pub waypoints_remaining: usize,
}

pub struct Simulation {
    config: SimConfig,
    terrain: TerrainField,
    costmap: VoxelCostmap,
    planner: PathPlanner,
    dynamics: FlightDynamics,
    autopilot: Autopilot,
    drone: DroneState,
    goal: Option<Vec3>,
    tick: u64,
    elapsed: f32,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Result<Self> {
        if !config.tick_seconds.is_finite() || config.tick_seconds <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "tick length must be positive, got {}",
                config.tick_seconds
            )));
        }

        let terrain = TerrainField::with_params(config.terrain_params());

        let c = &config.costmap;
        let costmap = match c.source {
            CostmapSource::ProceduralFarm => {
                VoxelCostmap::procedural_farm(c.cols, c.rows, c.layers, c.altitude_step)?
            }
            CostmapSource::Terrain => {
                VoxelCostmap::from_terrain(&terrain, c.cols, c.rows, c.layers, c.altitude_step)?
            }
        };

        let planner = PathPlanner::with_config(config.planner.clone());
        let dynamics = FlightDynamics::new(config.flight.clone());
        let autopilot = Autopilot::new(config.autopilot.clone());

        let ground = terrain.height_at(config.start.x, config.start.z);
        let start = Vec3::new(config.start.x, dynamics.floor_height(ground), config.start.z);
        let drone = DroneState::landed(start, config.drone);

        log::info!(
            "Simulation ready: seed {}, {:?} costmap {}x{}x{}, drone at {:?}",
            config.seed,
            c.source,
            c.cols,
            c.rows,
            c.layers,
            start
        );

        Ok(Self {
            config,
            terrain,
            costmap,
            planner,
            dynamics,
            autopilot,
            drone,
            goal: None,
            tick: 0,
            elapsed: 0.0,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn terrain(&self) -> &TerrainField {
        &self.terrain
    }

    pub fn costmap(&self) -> &VoxelCostmap {
        &self.costmap
    }

    pub fn autopilot(&self) -> &Autopilot {
        &self.autopilot
    }

    pub fn drone(&self) -> &DroneState {
        &self.drone
    }

    /// Goal of the most recent plan, in map coordinates
    pub fn goal(&self) -> Option<Vec3> {
        self.goal
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    fn floor_at(&self, x: f32, z: f32) -> f32 {
        self.dynamics.floor_height(self.terrain.height_at(x, z))
    }

    /// World position to map coordinates
    pub fn world_to_map(&self, world: Vec3) -> Vec3 {
        let floor = self.floor_at(world.x, world.z);
        Vec3::new(world.x, (world.y - floor).max(0.0), world.z)
    }

    /// Map coordinates to world position
    pub fn map_to_world(&self, map: Vec3) -> Vec3 {
        Vec3::new(map.x, self.floor_at(map.x, map.z) + map.y, map.z)
    }

    /// Plan from the drone's current position to `goal` (map coordinates)
    /// and hand the route to the autopilot. Returns the number of waypoints;
    /// zero means no route was found and the drone holds position.
    pub fn plan_to(&mut self, goal: Vec3) -> usize {
        self.goal = Some(goal);
        let start = self.world_to_map(self.drone.position);
        let path = self.planner.find_path(&self.costmap, start, goal);

        if path.is_empty() {
            log::warn!("No route from {:?} to {:?}", start, goal);
            self.autopilot.clear();
            return 0;
        }

        let route: Vec<Vec3> = path.iter().map(|&w| self.map_to_world(w)).collect();
        log::info!("Planned {} waypoints to {:?}", route.len(), goal);
        self.autopilot.set_route(route);
        path.len()
    }

    /// Plan again to the last goal, e.g. after the costmap changed
    pub fn replan(&mut self) -> Option<usize> {
        let goal = self.goal?;
        Some(self.plan_to(goal))
    }

    /// Overwrite one voxel of the costmap. Takes effect on the next plan.
    pub fn set_obstacle(&mut self, coord: GridCoord, cost: Cost) {
        log::debug!("Costmap update at {:?}: {}", coord, cost);
        self.costmap.set_cost(coord.x, coord.y, coord.z, cost);
    }

    /// Advance one tick under autopilot control
    pub fn step(&mut self) -> &DroneState {
        let input = self.autopilot.control(&self.drone, self.dynamics.params());
        self.step_with(&input)
    }

    /// Advance one tick under manual control
    pub fn step_with(&mut self, input: &ControlInput) -> &DroneState {
        let dt = self.config.tick_seconds;
        let ground = self
            .terrain
            .height_at(self.drone.position.x, self.drone.position.z);
        let was_charged = !self.drone.is_battery_depleted();

        self.drone = self.dynamics.update(&self.drone, dt, input, ground);
        self.tick += 1;
        self.elapsed += dt;

        if was_charged && self.drone.is_battery_depleted() {
            log::warn!("Battery depleted at tick {}", self.tick);
        }
        &self.drone
    }

    /// Run `ticks` autopilot steps, sampling telemetry after each
    pub fn run(&mut self, ticks: usize) -> Vec<TelemetrySample> {
        let mut samples = Vec::with_capacity(ticks);
        for _ in 0..ticks {
            self.step();
            samples.push(self.telemetry());
        }
        samples
    }

    pub fn telemetry(&self) -> TelemetrySample {
        let p = self.drone.position;
        TelemetrySample {
            tick: self.tick,
            time: self.elapsed,
            position: p,
            velocity: self.drone.velocity,
            rotation: self.drone.rotation,
            thrust: self.drone.thrust,
            battery_level: self.drone.battery_level,
            is_flying: self.drone.is_flying,
            is_hovering: self.drone.is_hovering,
            ground_height: self.terrain.height_at(p.x, p.z),
            surface: self.terrain.feature_at(p.x, p.z),
            target: self.autopilot.target(),
            waypoints_remaining: self.autopilot.remaining(),
        }
    }
}

//! 3D A* over a [`VoxelCostmap`]
//!
//! Nodes expand into all 26 neighbours of their voxel. A step costs 1 (one
//! axis changes) or √2 (two or three axes change), plus half the target
//! voxel's cost, plus 0.1 per layer below layer 3 to favour flying above
//! ground clutter. The heuristic is Euclidean distance in grid units.
//!
//! Because caution and altitude penalties can make a step cost more than its
//! length, the heuristic is not guaranteed admissible and returned routes are
//! not guaranteed optimal. Equal-`f` entries are dequeued in insertion order,
//! which together with the fixed neighbour order makes every search
//! deterministic.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use rayon::prelude::*;

use super::PlannerConfig;
use crate::core::types::Vec3;
use crate::costmap::{is_blocked, Cost, GridCoord, VoxelCostmap};

/// Layers below this one pay an altitude penalty
const PREFERRED_LAYER: i32 = 3;
const ALTITUDE_PENALTY: f64 = 0.1;
const OCCUPANCY_WEIGHT: f64 = 0.5;

/// The 26 neighbour offsets, in fixed z-major order
const NEIGHBOUR_OFFSETS: [GridCoord; 26] = {
    let mut out = [GridCoord { x: 0, y: 0, z: 0 }; 26];
    let mut i = 0;
    let mut dz = -1;
    while dz <= 1 {
        let mut dy = -1;
        while dy <= 1 {
            let mut dx = -1;
            while dx <= 1 {
                if !(dx == 0 && dy == 0 && dz == 0) {
                    out[i] = GridCoord { x: dx, y: dy, z: dz };
                    i += 1;
                }
                dx += 1;
            }
            dy += 1;
        }
        dz += 1;
    }
    out
};

/// Cost of stepping by `offset` into a voxel on `layer` with cost `cost`
pub fn move_cost(offset: GridCoord, layer: i32, cost: Cost) -> f64 {
    let axes = [offset.x, offset.y, offset.z].iter().filter(|&&d| d != 0).count();
    let distance = if axes > 1 { std::f64::consts::SQRT_2 } else { 1.0 };
    let altitude = (PREFERRED_LAYER - layer).clamp(0, PREFERRED_LAYER) as f64;
    distance + cost as f64 * OCCUPANCY_WEIGHT + altitude * ALTITUDE_PENALTY
}

/// Euclidean distance in grid units
pub fn heuristic(a: GridCoord, b: GridCoord) -> f64 {
    let dx = (a.x - b.x) as f64;
    let dy = (a.y - b.y) as f64;
    let dz = (a.z - b.z) as f64;
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Search tree node; lives only for the duration of one search
#[derive(Clone, Copy, Debug)]
struct SearchNode {
    coord: GridCoord,
    g: f64,
    h: f64,
    parent: Option<usize>,
}

impl SearchNode {
    fn f(&self) -> f64 {
        self.g + self.h
    }
}

#[derive(Clone, Copy, Debug)]
struct QueueEntry {
    f: f64,
    seq: u64,
    node: usize,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap behaviour; earlier insertions win ties
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Result of a search, with statistics
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlanOutcome {
    /// World-space waypoints from start to goal; empty if no route was found
    pub path: Vec<Vec3>,
    /// Nodes dequeued from the open set
    pub iterations: usize,
    /// Distinct voxels expanded
    pub expanded: usize,
    /// Accumulated route cost, if a route was found
    pub cost: Option<f64>,
}

impl PlanOutcome {
    pub fn found(&self) -> bool {
        !self.path.is_empty()
    }
}

/// Grid-bound A* route planner with an iteration budget
#[derive(Clone, Debug, Default)]
pub struct PathPlanner {
    config: PlannerConfig,
}

impl PathPlanner {
    pub fn new(max_iterations: usize) -> Self {
        Self::with_config(PlannerConfig { max_iterations })
    }

    pub fn with_config(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan a route between two world positions.
    ///
    /// Returns an empty vector when either endpoint is blocked, the open set
    /// runs dry, or the iteration budget is spent.
    pub fn find_path(&self, grid: &VoxelCostmap, start: Vec3, goal: Vec3) -> Vec<Vec3> {
        self.search(grid, start, goal).path
    }

    /// Plan several routes in parallel against the same grid
    pub fn find_paths(&self, grid: &VoxelCostmap, requests: &[(Vec3, Vec3)]) -> Vec<Vec<Vec3>> {
        requests
            .par_iter()
            .map(|&(start, goal)| self.find_path(grid, start, goal))
            .collect()
    }

    /// Plan a route and report search statistics.
    ///
    /// A zero iteration budget never finds a route, not even the trivial
    /// one-voxel route.
    pub fn search(&self, grid: &VoxelCostmap, start: Vec3, goal: Vec3) -> PlanOutcome {
        if self.config.max_iterations == 0 {
            log::debug!("A*: zero iteration budget");
            return PlanOutcome::default();
        }

        let start_c = grid.world_to_grid(start);
        let goal_c = grid.world_to_grid(goal);

        if is_blocked(grid.cost_at(start_c)) || is_blocked(grid.cost_at(goal_c)) {
            log::debug!("A*: endpoint blocked (start {:?}, goal {:?})", start_c, goal_c);
            return PlanOutcome::default();
        }

        if start_c == goal_c {
            return PlanOutcome {
                path: vec![grid.grid_to_world(start_c)],
                iterations: 0,
                expanded: 0,
                cost: Some(0.0),
            };
        }

        let mut nodes = vec![SearchNode {
            coord: start_c,
            g: 0.0,
            h: heuristic(start_c, goal_c),
            parent: None,
        }];
        let mut open = BinaryHeap::new();
        let mut best_g: HashMap<GridCoord, f64> = HashMap::new();
        let mut closed: HashSet<GridCoord> = HashSet::new();
        let mut seq = 0u64;

        open.push(QueueEntry { f: nodes[0].f(), seq, node: 0 });
        best_g.insert(start_c, 0.0);

        let mut iterations = 0;
        while let Some(entry) = open.pop() {
            if iterations >= self.config.max_iterations {
                log::debug!(
                    "A*: iteration budget of {} exhausted ({} voxels expanded)",
                    self.config.max_iterations,
                    closed.len()
                );
                return PlanOutcome { iterations, expanded: closed.len(), ..Default::default() };
            }
            iterations += 1;

            let current = nodes[entry.node];
            if current.coord == goal_c {
                let path = Self::reconstruct_path(grid, &nodes, entry.node);
                log::debug!(
                    "A*: {} waypoints, cost {:.2}, {} iterations, {} expanded",
                    path.len(),
                    current.g,
                    iterations,
                    closed.len()
                );
                return PlanOutcome {
                    path,
                    iterations,
                    expanded: closed.len(),
                    cost: Some(current.g),
                };
            }

            if !closed.insert(current.coord) {
                continue;
            }

            for offset in NEIGHBOUR_OFFSETS {
                let nb = GridCoord::new(
                    current.coord.x + offset.x,
                    current.coord.y + offset.y,
                    current.coord.z + offset.z,
                );
                if !grid.in_bounds(nb.x, nb.y, nb.z) || closed.contains(&nb) {
                    continue;
                }
                let cost = grid.cost_at(nb);
                if is_blocked(cost) {
                    continue;
                }

                let g = current.g + move_cost(offset, nb.z, cost);
                if best_g.get(&nb).is_some_and(|&old| g >= old) {
                    continue;
                }
                best_g.insert(nb, g);

                let node = SearchNode {
                    coord: nb,
                    g,
                    h: heuristic(nb, goal_c),
                    parent: Some(entry.node),
                };
                seq += 1;
                open.push(QueueEntry { f: node.f(), seq, node: nodes.len() });
                nodes.push(node);
            }
        }

        log::debug!("A*: open set exhausted after {} iterations, goal unreachable", iterations);
        PlanOutcome { iterations, expanded: closed.len(), ..Default::default() }
    }

    fn reconstruct_path(grid: &VoxelCostmap, nodes: &[SearchNode], goal: usize) -> Vec<Vec3> {
        let mut path = Vec::new();
        let mut current = Some(goal);
        while let Some(i) = current {
            path.push(grid.grid_to_world(nodes[i].coord));
            current = nodes[i].parent;
        }
        path.reverse();
        path
    }
}

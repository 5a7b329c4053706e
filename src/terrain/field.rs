//! Precomputed terrain height field
//!
//! Heights are sampled once at construction onto a fixed
//! [`GRID_RESOLUTION`]² grid spanning `[0, WORLD_SPAN]` on X and Z, then
//! queried by bilinear interpolation. Positions outside the span clamp to the
//! nearest edge sample.

use serde::{Deserialize, Serialize};

use super::feature::{self, SurfaceFeature};
use super::noise::Fbm;

/// Number of height samples per side
pub const GRID_RESOLUTION: usize = 96;

/// World units covered by the height grid on each horizontal axis
pub const WORLD_SPAN: f32 = 320.0;

/// Distance between adjacent height samples
pub const CELL_SIZE: f32 = WORLD_SPAN / (GRID_RESOLUTION - 1) as f32;

/// Parameters controlling terrain generation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    pub seed: u32,
    pub max_height: f32,      // Clamp ceiling for raw noise heights
    pub base_offset: f32,     // Flat offset added to every query
    pub octaves: u32,         // FBM octaves
    pub frequency: f32,       // Lattice cells per world unit at octave 0
    pub lacunarity: f32,      // Frequency multiplier per octave
    pub gain: f32,            // Amplitude multiplier per octave
    pub plains_fraction: f32, // Share of max_height left to the linear plains term
    pub relief_start: f32,    // Normalized height where relief begins to rise
    pub edge_margin: usize,   // Grid cells faded toward zero at each edge
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            seed: 12345,
            max_height: 14.0,
            base_offset: 0.2,
            octaves: 5,
            frequency: 1.0 / 90.0,
            lacunarity: 2.0,
            gain: 0.5,
            plains_fraction: 0.18,
            relief_start: 0.55,
            edge_margin: 8,
        }
    }
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge1 <= edge0 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Deterministic terrain: height samples plus seeded surface features
#[derive(Clone, Debug)]
pub struct TerrainField {
    params: TerrainParams,
    heights: Vec<f32>,
}

impl TerrainField {
    /// Build a field from a seed with default parameters
    pub fn new(seed: u32) -> Self {
        Self::with_params(TerrainParams { seed, ..Default::default() })
    }

    /// Build a field, precomputing the full height grid
    pub fn with_params(params: TerrainParams) -> Self {
        let fbm = Fbm {
            seed: params.seed,
            octaves: params.octaves,
            frequency: params.frequency,
            lacunarity: params.lacunarity,
            gain: params.gain,
        };

        let max_height = params.max_height.max(0.0);
        let last = GRID_RESOLUTION - 1;
        let mut heights = Vec::with_capacity(GRID_RESOLUTION * GRID_RESOLUTION);

        for gz in 0..GRID_RESOLUTION {
            for gx in 0..GRID_RESOLUTION {
                let wx = gx as f32 * CELL_SIZE;
                let wz = gz as f32 * CELL_SIZE;

                let raw = (fbm.sample(wx, wz) * max_height).clamp(0.0, max_height);

                // Most of the map stays in a low plains band; only the upper
                // part of the noise range grows into hills.
                let t = if max_height > 0.0 { raw / max_height } else { 0.0 };
                let relief = smoothstep(params.relief_start, 1.0, t);
                let mut h = max_height
                    * (params.plains_fraction * t + (1.0 - params.plains_fraction) * relief);

                let edge = gx.min(gz).min(last - gx).min(last - gz);
                if edge < params.edge_margin {
                    let f = edge as f32 / params.edge_margin as f32;
                    h *= f * f;
                }

                heights.push(h);
            }
        }

        log::debug!(
            "Terrain field built: seed={} {}x{} samples over {}m",
            params.seed, GRID_RESOLUTION, GRID_RESOLUTION, WORLD_SPAN
        );

        Self { params, heights }
    }

    /// Get terrain parameters
    pub fn params(&self) -> &TerrainParams {
        &self.params
    }

    pub fn seed(&self) -> u32 {
        self.params.seed
    }

    #[inline]
    fn sample(&self, gx: usize, gz: usize) -> f32 {
        self.heights[gx + gz * GRID_RESOLUTION]
    }

    /// Terrain height at world position (x, z)
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        let last = (GRID_RESOLUTION - 1) as f32;
        let gx = if x.is_finite() { (x / CELL_SIZE).clamp(0.0, last) } else { 0.0 };
        let gz = if z.is_finite() { (z / CELL_SIZE).clamp(0.0, last) } else { 0.0 };

        let x0 = (gx.floor() as usize).min(GRID_RESOLUTION - 2);
        let z0 = (gz.floor() as usize).min(GRID_RESOLUTION - 2);
        let fx = gx - x0 as f32;
        let fz = gz - z0 as f32;

        let h00 = self.sample(x0, z0);
        let h10 = self.sample(x0 + 1, z0);
        let h01 = self.sample(x0, z0 + 1);
        let h11 = self.sample(x0 + 1, z0 + 1);

        let top = h00 + (h10 - h00) * fx;
        let bottom = h01 + (h11 - h01) * fx;
        top + (bottom - top) * fz + self.params.base_offset
    }

    /// Surface feature at world position (x, z). Non-finite coordinates
    /// classify as the origin.
    pub fn feature_at(&self, x: f32, z: f32) -> SurfaceFeature {
        feature::classify(x, z, self.params.seed)
    }

    /// Feature as its integer code
    pub fn feature_code_at(&self, x: f32, z: f32) -> u8 {
        self.feature_at(x, z).code()
    }

    /// Min/max height over the whole grid, including the base offset
    pub fn height_bounds(&self) -> (f32, f32) {
        let min_h = self.heights.iter().copied().fold(f32::INFINITY, f32::min);
        let max_h = self.heights.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        (min_h + self.params.base_offset, max_h + self.params.base_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Largest height difference between adjacent samples
    fn max_cell_delta(field: &TerrainField) -> f32 {
        let mut max_delta = 0.0f32;
        for gz in 0..GRID_RESOLUTION {
            for gx in 0..GRID_RESOLUTION {
                let h = field.sample(gx, gz);
                if gx + 1 < GRID_RESOLUTION {
                    max_delta = max_delta.max((field.sample(gx + 1, gz) - h).abs());
                }
                if gz + 1 < GRID_RESOLUTION {
                    max_delta = max_delta.max((field.sample(gx, gz + 1) - h).abs());
                }
            }
        }
        max_delta
    }

    #[test]
    fn test_terrain_params_default() {
        let params = TerrainParams::default();
        assert_eq!(params.seed, 12345);
        assert_eq!(params.octaves, 5);
        assert_eq!(params.lacunarity, 2.0);
        assert_eq!(params.gain, 0.5);
    }

    #[test]
    fn test_grid_size() {
        let field = TerrainField::new(1);
        assert_eq!(field.heights.len(), GRID_RESOLUTION * GRID_RESOLUTION);
    }

    #[test]
    fn test_height_range() {
        let field = TerrainField::new(12345);
        let params = field.params().clone();
        for i in 0..400 {
            let x = (i % 20) as f32 * 16.0;
            let z = (i / 20) as f32 * 16.0;
            let h = field.height_at(x, z);
            assert!(h >= params.base_offset - 1e-4);
            assert!(h <= params.max_height + params.base_offset + 1e-4);
        }
    }

    #[test]
    fn test_edges_fade_to_base() {
        let field = TerrainField::new(12345);
        let base = field.params().base_offset;
        assert!((field.height_at(0.0, 0.0) - base).abs() < 1e-5);
        assert!((field.height_at(WORLD_SPAN, 150.0) - base).abs() < 1e-5);
        assert!((field.height_at(150.0, WORLD_SPAN) - base).abs() < 1e-5);
    }

    #[test]
    fn test_clamps_outside_span() {
        let field = TerrainField::new(3);
        assert_eq!(field.height_at(-50.0, 100.0), field.height_at(0.0, 100.0));
        assert!((field.height_at(1000.0, 100.0) - field.height_at(WORLD_SPAN, 100.0)).abs() < 1e-4);
        assert!(field.height_at(f32::NAN, f32::INFINITY).is_finite());
    }

    #[test]
    fn test_interpolates_samples_exactly_on_grid() {
        let field = TerrainField::new(9);
        let base = field.params().base_offset;
        for (gx, gz) in [(10, 10), (40, 55), (80, 20)] {
            let h = field.height_at(gx as f32 * CELL_SIZE, gz as f32 * CELL_SIZE);
            assert!((h - (field.sample(gx, gz) + base)).abs() < 1e-4);
        }
    }

    #[test]
    fn test_continuity_under_small_perturbation() {
        let field = TerrainField::new(12345);
        let limit = max_cell_delta(&field) + 1e-4;
        for i in 0..2000 {
            let x = (i as f32 * 7.31) % WORLD_SPAN;
            let z = (i as f32 * 3.17) % WORLD_SPAN;
            let h = field.height_at(x, z);
            for (dx, dz) in [(0.01, 0.0), (0.0, 0.01), (-0.01, 0.01)] {
                let delta = (field.height_at(x + dx, z + dz) - h).abs();
                assert!(delta <= limit, "jump of {} at ({}, {})", delta, x, z);
            }
        }
    }

    #[test]
    fn test_reproducible_across_instances() {
        let a = TerrainField::new(2024);
        let b = TerrainField::new(2024);
        for i in 0..1000 {
            let x = i as f32 * 0.61 - 20.0;
            let z = i as f32 * 0.37 + 5.0;
            assert_eq!(a.height_at(x, z).to_bits(), b.height_at(x, z).to_bits());
            assert_eq!(a.feature_at(x, z), b.feature_at(x, z));
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = TerrainField::new(1);
        let b = TerrainField::new(2);
        let differs = (0..50).any(|i| {
            let p = 60.0 + i as f32 * 4.0;
            a.height_at(p, p) != b.height_at(p, p)
        });
        assert!(differs);
    }

    #[test]
    fn test_mostly_plains() {
        let field = TerrainField::new(12345);
        let params = field.params();
        let plains_ceiling = params.max_height * params.plains_fraction + params.base_offset;
        let mut low = 0;
        let total = 32 * 32;
        for gz in 0..32 {
            for gx in 0..32 {
                let h = field.height_at(gx as f32 * 10.0, gz as f32 * 10.0);
                if h <= plains_ceiling + 1.0 {
                    low += 1;
                }
            }
        }
        assert!(low * 2 > total, "only {} of {} samples in the plains band", low, total);
    }

    #[test]
    fn test_height_bounds() {
        let field = TerrainField::new(5);
        let (min_h, max_h) = field.height_bounds();
        assert!(min_h <= max_h);
        let h = field.height_at(160.0, 160.0);
        assert!(h >= min_h - 1e-4 && h <= max_h + 1e-4);
    }

    #[test]
    fn test_feature_code_matches_feature() {
        let field = TerrainField::new(12345);
        assert_eq!(field.feature_code_at(96.0, 96.0), SurfaceFeature::Village.code());
        assert_eq!(field.feature_code_at(10.0, 40.0), SurfaceFeature::RoadHorizontal.code());
    }
}

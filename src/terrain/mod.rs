//! Procedural farmland terrain: seeded height field and surface features

pub mod noise;

pub mod field;
pub use field::{TerrainField, TerrainParams, GRID_RESOLUTION, WORLD_SPAN};

pub mod feature;
pub use feature::SurfaceFeature;

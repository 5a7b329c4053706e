//! Surface feature classification for the farmland map
//!
//! Classification is a pure function of world position and seed, evaluated
//! in a fixed precedence order:
//!
//! 1. Dirt roads: a periodic grid of road lines every [`ROAD_SPACING`] units.
//!    A point within [`ROAD_HALF_WIDTH`] of a line of constant z is a
//!    horizontal road; otherwise within the band of a line of constant x it
//!    is a vertical road. Horizontal wins at intersections.
//! 2. Villages: the plane is cut into [`VILLAGE_CELL`]-unit cells; a cell
//!    whose hash exceeds [`VILLAGE_THRESHOLD`] holds a circular village of
//!    [`VILLAGE_RADIUS`] around its centre.
//! 3. Fields: alternating [`FIELD_STRIPE`]-unit stripes by parity of the
//!    floor-divided coordinates; even sums are crop fields, odd sums plain.
//!
//! Roads therefore cut straight through villages. Non-finite coordinates
//! classify as the origin.

use serde::{Deserialize, Serialize};

use crate::math::hash::hash2_unit;

pub const ROAD_SPACING: f32 = 40.0;
pub const ROAD_HALF_WIDTH: f32 = 1.5;
pub const VILLAGE_CELL: f32 = 64.0;
pub const VILLAGE_THRESHOLD: f32 = 0.82;
pub const VILLAGE_RADIUS: f32 = 14.0;
pub const FIELD_STRIPE: f32 = 18.0;

/// Mixed into the seed so village placement is independent of height noise
const VILLAGE_SALT: u32 = 0x5bd1_e995;

/// Surface class of a point on the map
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurfaceFeature {
    Plain,
    CropField,
    RoadHorizontal,
    RoadVertical,
    Village,
}

impl SurfaceFeature {
    /// Small integer code exchanged with collaborators
    pub fn code(&self) -> u8 {
        match self {
            SurfaceFeature::Plain => 0,
            SurfaceFeature::CropField => 1,
            SurfaceFeature::RoadHorizontal => 2,
            SurfaceFeature::RoadVertical => 3,
            SurfaceFeature::Village => 4,
        }
    }

    /// Inverse of [`SurfaceFeature::code`]
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(SurfaceFeature::Plain),
            1 => Some(SurfaceFeature::CropField),
            2 => Some(SurfaceFeature::RoadHorizontal),
            3 => Some(SurfaceFeature::RoadVertical),
            4 => Some(SurfaceFeature::Village),
            _ => None,
        }
    }
}

#[inline]
fn on_road_line(v: f32) -> bool {
    let m = v.rem_euclid(ROAD_SPACING);
    m < ROAD_HALF_WIDTH || m > ROAD_SPACING - ROAD_HALF_WIDTH
}

fn in_village(x: f32, z: f32, seed: u32) -> bool {
    let cx = (x / VILLAGE_CELL).floor();
    let cz = (z / VILLAGE_CELL).floor();
    if hash2_unit(cx as i32, cz as i32, seed ^ VILLAGE_SALT) <= VILLAGE_THRESHOLD {
        return false;
    }

    let center_x = (cx + 0.5) * VILLAGE_CELL;
    let center_z = (cz + 0.5) * VILLAGE_CELL;
    let dx = x - center_x;
    let dz = z - center_z;
    dx * dx + dz * dz <= VILLAGE_RADIUS * VILLAGE_RADIUS
}

/// Parity of the field stripe containing `v`. Saturating casts keep huge
/// coordinates in range; per-axis parity avoids overflowing the sum.
#[inline]
fn stripe_parity(v: f32) -> i64 {
    ((v / FIELD_STRIPE).floor() as i64).rem_euclid(2)
}

/// Classify a world position
pub fn classify(x: f32, z: f32, seed: u32) -> SurfaceFeature {
    let x = if x.is_finite() { x } else { 0.0 };
    let z = if z.is_finite() { z } else { 0.0 };

    if on_road_line(z) {
        return SurfaceFeature::RoadHorizontal;
    }
    if on_road_line(x) {
        return SurfaceFeature::RoadVertical;
    }

    if in_village(x, z, seed) {
        return SurfaceFeature::Village;
    }

    if (stripe_parity(x) + stripe_parity(z)) % 2 == 0 {
        SurfaceFeature::CropField
    } else {
        SurfaceFeature::Plain
    }
}

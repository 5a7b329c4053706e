//! Mathematical utilities: deterministic hashing and flight-frame rotations

pub mod hash;
pub mod rotation;

pub use hash::{hash2, hash2_unit};
pub use rotation::{body_to_world, horizontal, with_horizontal, world_to_body_horizontal};

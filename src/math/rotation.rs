//! Euler rotations and horizontal-plane helpers for the flight model
//!
//! World frame is Y-up. Body frame: +Y up, +Z longitudinal (nose), +X lateral.
//! Euler angles are stored as `Vec3(pitch, yaw, roll)`, i.e. rotation about
//! X, Y and Z respectively.

use crate::core::types::{Mat3, Vec2, Vec3};

/// Body-to-world rotation: yaw, then pitch, then roll
pub fn body_to_world(yaw: f32, pitch: f32, roll: f32) -> Mat3 {
    Mat3::from_rotation_y(yaw) * Mat3::from_rotation_x(pitch) * Mat3::from_rotation_z(roll)
}

/// Horizontal (XZ) component of a world vector
#[inline]
pub fn horizontal(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}

/// Replace the horizontal component of `v`, keeping its vertical part
#[inline]
pub fn with_horizontal(v: Vec3, h: Vec2) -> Vec3 {
    Vec3::new(h.x, v.y, h.y)
}

/// Rotate a world-frame horizontal vector into the body frame of a vehicle
/// with the given yaw. Inverse of the yaw part of [`body_to_world`].
pub fn world_to_body_horizontal(world: Vec2, yaw: f32) -> Vec2 {
    let (s, c) = yaw.sin_cos();
    Vec2::new(world.x * c - world.y * s, world.x * s + world.y * c)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_identity_keeps_up() {
        let up = body_to_world(0.0, 0.0, 0.0) * Vec3::Y;
        assert!((up - Vec3::Y).length() < EPS);
    }

    #[test]
    fn test_positive_pitch_tilts_toward_nose() {
        let up = body_to_world(0.0, 0.3, 0.0) * Vec3::Y;
        assert!(up.z > 0.0);
        assert!(up.x.abs() < EPS);
    }

    #[test]
    fn test_negative_roll_tilts_toward_positive_x() {
        let up = body_to_world(0.0, 0.0, -0.3) * Vec3::Y;
        assert!(up.x > 0.0);
        assert!(up.z.abs() < EPS);
    }

    #[test]
    fn test_yaw_rotates_nose() {
        // Nose (+Z) yawed by +90 degrees points along +X
        let nose = body_to_world(std::f32::consts::FRAC_PI_2, 0.0, 0.0) * Vec3::Z;
        assert!((nose - Vec3::X).length() < EPS);
    }

    #[test]
    fn test_world_to_body_inverts_yaw() {
        let yaw = 0.7;
        let body = Vec2::new(0.25, 1.0);
        let world = body_to_world(yaw, 0.0, 0.0) * Vec3::new(body.x, 0.0, body.y);
        let back = world_to_body_horizontal(horizontal(world), yaw);
        assert!((back - body).length() < EPS);
    }

    #[test]
    fn test_with_horizontal() {
        let v = with_horizontal(Vec3::new(1.0, 2.0, 3.0), Vec2::new(-4.0, 5.0));
        assert_eq!(v, Vec3::new(-4.0, 2.0, 5.0));
    }
}

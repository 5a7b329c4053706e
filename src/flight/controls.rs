//! Per-tick control inputs

use serde::{Deserialize, Serialize};

use crate::core::types::Vec2;

/// Pilot or autopilot command for one tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlInput {
    /// Collective throttle in `[0, 1]`
    pub throttle: f32,
    /// Stick tilt in `[-1, 1]²`: `x` lateral (toward body +X), `y`
    /// longitudinal (toward the nose, body +Z)
    pub tilt: Vec2,
    /// Yaw rate command in `[-1, 1]`
    pub yaw: f32,
}

fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() { v } else { 0.0 }
}

impl ControlInput {
    pub fn new(throttle: f32, tilt: Vec2, yaw: f32) -> Self {
        Self { throttle, tilt, yaw }
    }

    /// Throttle only, sticks centred
    pub fn throttle(throttle: f32) -> Self {
        Self { throttle, ..Default::default() }
    }

    /// Copy with every field clamped into range; NaN becomes 0
    pub fn sanitized(&self) -> Self {
        Self {
            throttle: finite_or_zero(self.throttle).clamp(0.0, 1.0),
            tilt: Vec2::new(
                finite_or_zero(self.tilt.x).clamp(-1.0, 1.0),
                finite_or_zero(self.tilt.y).clamp(-1.0, 1.0),
            ),
            yaw: finite_or_zero(self.yaw).clamp(-1.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitized_clamps() {
        let input = ControlInput::new(1.7, Vec2::new(-3.0, 0.4), -9.0).sanitized();
        assert_eq!(input.throttle, 1.0);
        assert_eq!(input.tilt, Vec2::new(-1.0, 0.4));
        assert_eq!(input.yaw, -1.0);
    }

    #[test]
    fn test_sanitized_replaces_nan() {
        let input = ControlInput::new(f32::NAN, Vec2::new(f32::INFINITY, f32::NAN), f32::NAN)
            .sanitized();
        assert_eq!(input, ControlInput::default());
    }
}

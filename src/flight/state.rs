//! Drone state values
//!
//! A [`DroneState`] is never mutated by the dynamics; each tick produces a
//! fresh value from the previous one.

use serde::{Deserialize, Serialize};

use crate::core::types::Vec3;
use crate::math::rotation::horizontal;

/// Physical constants of an airframe, fixed at creation
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DroneParams {
    /// Mass in kilograms
    pub mass: f32,
    /// Thrust at full throttle in newtons
    pub max_thrust: f32,
    /// Linear drag coefficient (N per m/s)
    pub drag: f32,
}

impl Default for DroneParams {
    fn default() -> Self {
        Self {
            mass: 1.5,
            max_thrust: 30.0,
            drag: 0.35,
        }
    }
}

impl DroneParams {
    /// Throttle fraction at which thrust balances gravity
    pub fn hover_throttle(&self, gravity: f32) -> f32 {
        if self.max_thrust <= 0.0 {
            return 1.0;
        }
        (self.mass * gravity / self.max_thrust).clamp(0.0, 1.0)
    }
}

/// Full kinematic and status snapshot of a drone
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DroneState {
    pub position: Vec3,
    /// Euler angles `(pitch, yaw, roll)` in radians
    pub rotation: Vec3,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    pub params: DroneParams,
    /// Current thrust magnitude in newtons
    pub thrust: f32,
    pub is_flying: bool,
    pub is_hovering: bool,
    /// Remaining charge in `[0, 1]`
    pub battery_level: f32,
}

impl DroneState {
    /// A drone resting on the ground with a full battery
    pub fn landed(position: Vec3, params: DroneParams) -> Self {
        Self {
            position,
            rotation: Vec3::ZERO,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            params,
            thrust: 0.0,
            is_flying: false,
            is_hovering: false,
            battery_level: 1.0,
        }
    }

    /// A drone holding still in the air with a full battery
    pub fn hovering(position: Vec3, params: DroneParams) -> Self {
        Self {
            is_flying: true,
            is_hovering: true,
            ..Self::landed(position, params)
        }
    }

    pub fn pitch(&self) -> f32 {
        self.rotation.x
    }

    pub fn yaw(&self) -> f32 {
        self.rotation.y
    }

    pub fn roll(&self) -> f32 {
        self.rotation.z
    }

    pub fn altitude(&self) -> f32 {
        self.position.y
    }

    pub fn horizontal_speed(&self) -> f32 {
        horizontal(self.velocity).length()
    }

    pub fn is_battery_depleted(&self) -> bool {
        self.battery_level <= 0.0
    }
}

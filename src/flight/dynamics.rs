//! Per-tick rigid-body integrator
//!
//! [`FlightDynamics::update`] is a pure function of the previous state, the
//! tick length, the control input and the terrain height under the drone.
//! The pipeline runs in a fixed order:
//!
//! 1. altitude hold near hover throttle
//! 2. thrust vector from attitude plus stick tilt
//! 3. gravity, thrust and drag (with auto-brake when the sticks are centred)
//! 4. semi-implicit Euler
//! 5. horizontal speed cap
//! 6. ground clamp and landing
//! 7. attitude smoothing and yaw integration
//! 8. battery drain
//! 9. hover detection

use serde::{Deserialize, Serialize};

use super::controls::ControlInput;
use super::state::DroneState;
use crate::core::types::Vec3;
use crate::math::rotation::{body_to_world, horizontal, with_horizontal};

/// Hard attitude limit for pitch and roll, in radians
pub const MAX_TILT_ANGLE: f32 = 0.60;

/// Flight model tuning
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightParams {
    /// Gravitational acceleration (m/s²)
    pub gravity: f32,
    /// Throttle band around hover throttle in which altitude hold engages
    pub hover_deadzone: f32,
    /// Throttle correction per m/s of vertical velocity while holding
    pub hold_gain: f32,
    /// Lower bound of the altitude-hold throttle band
    pub hold_min_throttle: f32,
    /// Upper bound of the altitude-hold throttle band
    pub hold_max_throttle: f32,
    /// Extra thrust-vector tilt per unit stick deflection (radians)
    pub tilt_thrust_gain: f32,
    /// Attitude target per unit stick deflection, capped at [`MAX_TILT_ANGLE`]
    pub max_tilt: f32,
    /// Attitude smoothing rate (1/s)
    pub attitude_rate: f32,
    /// Yaw rate at full yaw input (rad/s)
    pub yaw_rate: f32,
    /// Drag added while flying with centred sticks
    pub brake_drag: f32,
    /// Tilt magnitude below which the sticks count as centred
    pub brake_tilt_threshold: f32,
    /// Horizontal speed cap (m/s)
    pub max_horizontal_speed: f32,
    /// Minimum height above terrain
    pub ground_clearance: f32,
    /// Throttle below which a grounded drone is considered landed
    pub landing_throttle: f32,
    /// Battery fraction drained per second at full throttle
    pub battery_drain: f32,
    /// Battery fraction drained per second regardless of throttle
    pub idle_drain: f32,
    /// Speed below which a flying drone counts as hovering
    pub hover_speed: f32,
    /// Longest tick integrated in one `update`; longer ticks are cut to this
    pub max_dt: f32,
}

impl Default for FlightParams {
    fn default() -> Self {
        Self {
            gravity: 9.81,
            hover_deadzone: 0.05,
            hold_gain: 0.15,
            hold_min_throttle: 0.2,
            hold_max_throttle: 0.85,
            tilt_thrust_gain: 0.35,
            max_tilt: MAX_TILT_ANGLE,
            attitude_rate: 6.0,
            yaw_rate: 2.0,
            brake_drag: 1.2,
            brake_tilt_threshold: 0.05,
            max_horizontal_speed: 12.0,
            ground_clearance: 0.5,
            landing_throttle: 0.1,
            battery_drain: 0.004,
            idle_drain: 0.0004,
            hover_speed: 0.1,
            max_dt: 0.25,
        }
    }
}

/// Flight integrator. Holds only tuning, never drone state.
#[derive(Clone, Debug, Default)]
pub struct FlightDynamics {
    params: FlightParams,
}

impl FlightDynamics {
    pub fn new(params: FlightParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &FlightParams {
        &self.params
    }

    /// Hover throttle for the given airframe under this model's gravity
    pub fn hover_throttle(&self, state: &DroneState) -> f32 {
        state.params.hover_throttle(self.params.gravity)
    }

    /// Lowest altitude the drone may occupy above `terrain_height`
    pub fn floor_height(&self, terrain_height: f32) -> f32 {
        terrain_height + self.params.ground_clearance
    }

    /// Advance `state` by `dt` seconds.
    ///
    /// Inputs are clamped into range and a non-finite or negative `dt` is
    /// treated as zero, so the call never fails. `dt` is also capped at
    /// [`FlightParams::max_dt`]: a longer tick advances the drone by only
    /// `max_dt` seconds. Hosts with coarse ticks should raise `max_dt` or
    /// call `update` several times per tick.
    pub fn update(
        &self,
        state: &DroneState,
        dt: f32,
        input: &ControlInput,
        terrain_height: f32,
    ) -> DroneState {
        let p = &self.params;
        let input = input.sanitized();
        let dt = if dt.is_finite() { dt.max(0.0).min(p.max_dt.max(0.0)) } else { 0.0 };
        let terrain_height = if terrain_height.is_finite() { terrain_height } else { 0.0 };
        let mass = state.params.mass.max(1e-3);

        // Altitude hold
        let hover = self.hover_throttle(state);
        let mut throttle = input.throttle;
        if state.is_flying && (throttle - hover).abs() < p.hover_deadzone {
            // Band comes from config and may be misordered
            throttle = (hover - state.velocity.y * p.hold_gain)
                .max(p.hold_min_throttle)
                .min(p.hold_max_throttle);
        }
        if state.is_battery_depleted() {
            throttle = 0.0;
        }

        // Thrust vector: stick tilt leans the rotor disc beyond the current attitude
        let pitch = state.rotation.x + input.tilt.y * p.tilt_thrust_gain;
        let roll = state.rotation.z - input.tilt.x * p.tilt_thrust_gain;
        let thrust_mag = throttle * state.params.max_thrust.max(0.0);
        let thrust = body_to_world(state.rotation.y, pitch, roll) * Vec3::Y * thrust_mag;

        // Forces
        let mut drag_coeff = state.params.drag.max(0.0);
        if state.is_flying && input.tilt.length() < p.brake_tilt_threshold {
            drag_coeff += p.brake_drag;
        }
        let gravity = Vec3::new(0.0, -p.gravity * mass, 0.0);
        let drag = -state.velocity * drag_coeff;
        let accel = (gravity + thrust + drag) / mass;

        // Semi-implicit Euler
        let mut velocity = state.velocity + accel * dt;
        let mut position = state.position + velocity * dt;

        // Speed cap
        let h = horizontal(velocity);
        let speed = h.length();
        if speed > p.max_horizontal_speed {
            velocity = with_horizontal(velocity, h * (p.max_horizontal_speed / speed));
        }

        // Ground clamp. A landed drone only becomes airborne once it has
        // actually left the floor.
        let floor = self.floor_height(terrain_height);
        let mut is_flying = state.is_flying;
        if position.y <= floor {
            position.y = floor;
            if velocity.y < 0.0 {
                velocity.y = 0.0;
            }
            if input.throttle < p.landing_throttle {
                is_flying = false;
            }
        } else if input.throttle >= p.landing_throttle {
            is_flying = true;
        }

        // Attitude
        let max_tilt = p.max_tilt.clamp(0.0, MAX_TILT_ANGLE);
        let blend = (p.attitude_rate * dt).clamp(0.0, 1.0);
        let target_pitch = input.tilt.y * max_tilt;
        let target_roll = -input.tilt.x * max_tilt;
        let new_pitch = (state.rotation.x + (target_pitch - state.rotation.x) * blend)
            .clamp(-MAX_TILT_ANGLE, MAX_TILT_ANGLE);
        let new_roll = (state.rotation.z + (target_roll - state.rotation.z) * blend)
            .clamp(-MAX_TILT_ANGLE, MAX_TILT_ANGLE);
        let new_yaw = state.rotation.y + input.yaw * p.yaw_rate * dt;
        let rotation = Vec3::new(new_pitch, new_yaw, new_roll);
        let angular_velocity = if dt > 0.0 {
            (rotation - state.rotation) / dt
        } else {
            Vec3::ZERO
        };

        // Battery
        let drain = (input.throttle * p.battery_drain + p.idle_drain) * dt;
        let battery_level = (state.battery_level.min(1.0) - drain).max(0.0);

        let is_hovering = is_flying && velocity.length() < p.hover_speed;

        DroneState {
            position,
            rotation,
            velocity,
            angular_velocity,
            params: state.params,
            thrust: thrust_mag,
            is_flying,
            is_hovering,
            battery_level,
        }
    }
}

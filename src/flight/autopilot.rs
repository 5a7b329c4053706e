//! Waypoint-following autopilot
//!
//! Turns a queue of world-space waypoints into a [`ControlInput`] each tick.
//! Altitude is tracked with a throttle offset from hover; horizontal position
//! with a velocity command that is converted to stick tilt in the body frame.
//! With no active target the autopilot centres the sticks at hover throttle,
//! which lets altitude hold and auto-brake settle the drone in place.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::controls::ControlInput;
use super::dynamics::FlightParams;
use super::state::DroneState;
use crate::core::types::{Vec2, Vec3};
use crate::math::rotation::{horizontal, world_to_body_horizontal};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutopilotParams {
    /// Distance at which a waypoint counts as reached
    pub arrival_radius: f32,
    /// Horizontal cruise speed (m/s)
    pub cruise_speed: f32,
    /// Desired horizontal speed per metre of remaining distance
    pub position_gain: f32,
    /// Stick tilt per m/s of horizontal velocity error
    pub velocity_gain: f32,
    /// Throttle offset per metre of altitude error
    pub altitude_gain: f32,
    /// Throttle offset per m/s of vertical velocity
    pub climb_damping: f32,
}

impl Default for AutopilotParams {
    fn default() -> Self {
        Self {
            arrival_radius: 1.0,
            cruise_speed: 6.0,
            position_gain: 0.8,
            velocity_gain: 0.25,
            altitude_gain: 0.08,
            climb_damping: 0.12,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Autopilot {
    params: AutopilotParams,
    target: Option<Vec3>,
    route: VecDeque<Vec3>,
}

impl Autopilot {
    pub fn new(params: AutopilotParams) -> Self {
        Self {
            params,
            target: None,
            route: VecDeque::new(),
        }
    }

    pub fn params(&self) -> &AutopilotParams {
        &self.params
    }

    /// Replace the current route. The first waypoint becomes the target.
    pub fn set_route(&mut self, waypoints: impl IntoIterator<Item = Vec3>) {
        self.route = waypoints.into_iter().collect();
        self.target = self.route.pop_front();
    }

    pub fn clear(&mut self) {
        self.route.clear();
        self.target = None;
    }

    pub fn target(&self) -> Option<Vec3> {
        self.target
    }

    /// Waypoints left, including the active target
    pub fn remaining(&self) -> usize {
        self.route.len() + usize::from(self.target.is_some())
    }

    pub fn is_idle(&self) -> bool {
        self.target.is_none()
    }

    /// Skip every waypoint already within the arrival radius of `position`
    fn advance(&mut self, position: Vec3) {
        while let Some(target) = self.target {
            if target.distance(position) > self.params.arrival_radius {
                break;
            }
            log::trace!("Waypoint reached at {:?}", target);
            self.target = self.route.pop_front();
        }
    }

    /// Control input for this tick
    pub fn control(&mut self, state: &DroneState, flight: &FlightParams) -> ControlInput {
        self.advance(state.position);

        let hover = state.params.hover_throttle(flight.gravity);
        let Some(target) = self.target else {
            return ControlInput::throttle(hover);
        };
        let p = &self.params;

        let altitude_error = target.y - state.position.y;
        let throttle =
            hover + altitude_error * p.altitude_gain - state.velocity.y * p.climb_damping;

        let to_target = horizontal(target - state.position);
        let distance = to_target.length();
        let desired = if distance > f32::EPSILON {
            to_target / distance * (distance * p.position_gain).min(p.cruise_speed)
        } else {
            Vec2::ZERO
        };
        let velocity_error = desired - horizontal(state.velocity);
        let tilt = world_to_body_horizontal(velocity_error * p.velocity_gain, state.yaw());

        ControlInput::new(throttle, tilt, 0.0).sanitized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flight::dynamics::FlightDynamics;
    use crate::flight::state::DroneParams;

    fn hovering_at(position: Vec3) -> DroneState {
        DroneState::hovering(position, DroneParams::default())
    }

    #[test]
    fn test_idle_holds_hover() {
        let mut autopilot = Autopilot::default();
        let flight = FlightParams::default();
        let state = hovering_at(Vec3::new(0.0, 10.0, 0.0));

        let input = autopilot.control(&state, &flight);

        assert!(autopilot.is_idle());
        assert_eq!(input.tilt, Vec2::ZERO);
        assert!((input.throttle - state.params.hover_throttle(flight.gravity)).abs() < 1e-6);
    }

    #[test]
    fn test_route_bookkeeping() {
        let mut autopilot = Autopilot::default();
        autopilot.set_route(vec![Vec3::X, Vec3::Y, Vec3::Z]);
        assert_eq!(autopilot.target(), Some(Vec3::X));
        assert_eq!(autopilot.remaining(), 3);

        autopilot.clear();
        assert!(autopilot.is_idle());
        assert_eq!(autopilot.remaining(), 0);
    }

    #[test]
    fn test_advances_past_reached_waypoints() {
        let mut autopilot = Autopilot::default();
        let start = Vec3::new(0.0, 10.0, 0.0);
        autopilot.set_route(vec![start, start + Vec3::X * 0.5, Vec3::new(20.0, 10.0, 0.0)]);

        autopilot.control(&hovering_at(start), &FlightParams::default());

        assert_eq!(autopilot.target(), Some(Vec3::new(20.0, 10.0, 0.0)));
        assert_eq!(autopilot.remaining(), 1);
    }

    #[test]
    fn test_tilts_toward_target_in_body_frame() {
        let mut autopilot = Autopilot::default();
        let flight = FlightParams::default();
        autopilot.set_route(vec![Vec3::new(0.0, 10.0, 30.0)]);

        // Nose along +Z: target straight ahead
        let input = autopilot.control(&hovering_at(Vec3::new(0.0, 10.0, 0.0)), &flight);
        assert!(input.tilt.y > 0.5);
        assert!(input.tilt.x.abs() < 1e-5);

        // Yawed a quarter turn: the same world direction is now lateral
        let mut yawed = hovering_at(Vec3::new(0.0, 10.0, 0.0));
        yawed.rotation.y = std::f32::consts::FRAC_PI_2;
        let input = autopilot.control(&yawed, &flight);
        assert!(input.tilt.x.abs() > 0.5);
        assert!(input.tilt.y.abs() < 1e-5);
    }

    #[test]
    fn test_climbs_toward_higher_target() {
        let mut autopilot = Autopilot::default();
        let flight = FlightParams::default();
        let state = hovering_at(Vec3::new(0.0, 5.0, 0.0));
        autopilot.set_route(vec![Vec3::new(0.0, 15.0, 0.0)]);

        let input = autopilot.control(&state, &flight);
        assert!(input.throttle > state.params.hover_throttle(flight.gravity));
    }

    #[test]
    fn test_flies_route_to_completion() {
        let dynamics = FlightDynamics::default();
        let mut autopilot = Autopilot::default();
        let mut state = DroneState::landed(Vec3::new(0.0, 0.5, 0.0), DroneParams::default());
        let goal = Vec3::new(12.0, 6.0, 8.0);
        autopilot.set_route(vec![Vec3::new(0.0, 6.0, 0.0), Vec3::new(6.0, 6.0, 4.0), goal]);

        for _ in 0..60 * 60 {
            let input = autopilot.control(&state, dynamics.params());
            state = dynamics.update(&state, 1.0 / 60.0, &input, 0.0);
            if autopilot.is_idle() {
                break;
            }
        }

        assert!(autopilot.is_idle(), "stuck at {:?}", state.position);
        assert!(state.position.distance(goal) <= autopilot.params().arrival_radius + 0.5);
    }
}

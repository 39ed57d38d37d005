//! Orbit camera limits for viewing the room.
//!
//! The viewer orbits around the room center. Distance and polar angle are
//! bounded so the camera never looks straight down/up and never ends up
//! inside a wall.

use glam::{Mat4, Vec3};
use serde::Serialize;

use crate::room::RoomDimensions;

/// Minimum orbit distance relative to the longest room side.
pub const MIN_DISTANCE_FACTOR: f32 = 0.6;

/// Maximum orbit distance relative to the longest room side.
pub const MAX_DISTANCE_FACTOR: f32 = 2.0;

/// Smallest polar angle from the vertical, degrees.
pub const MIN_POLAR_DEG: f32 = 20.0;

/// Largest polar angle from the vertical, degrees.
pub const MAX_POLAR_DEG: f32 = 85.0;

/// Bounds the orbit controls must respect for one room.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrbitConstraints {
    pub target: Vec3,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Radians.
    pub min_polar: f32,
    /// Radians.
    pub max_polar: f32,
}

impl OrbitConstraints {
    pub fn for_room(room: &RoomDimensions) -> Self {
        let extent = room.max_extent();
        Self {
            target: Vec3::new(room.width / 2.0, room.height / 2.0, room.length / 2.0),
            min_distance: extent * MIN_DISTANCE_FACTOR,
            max_distance: extent * MAX_DISTANCE_FACTOR,
            min_polar: MIN_POLAR_DEG.to_radians(),
            max_polar: MAX_POLAR_DEG.to_radians(),
        }
    }

    /// A pleasant starting view: three-quarter angle, mid distance.
    pub fn initial_camera(&self) -> OrbitCamera {
        OrbitCamera {
            azimuth: std::f32::consts::FRAC_PI_4,
            polar: 55.0_f32.to_radians(),
            distance: (self.min_distance + self.max_distance) / 2.0,
        }
    }
}

/// Spherical camera position around a target.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct OrbitCamera {
    /// Rotation around the vertical axis, radians.
    pub azimuth: f32,
    /// Angle from the vertical (0 = looking straight down), radians.
    pub polar: f32,
    pub distance: f32,
}

impl OrbitCamera {
    /// Force distance and polar angle into the allowed range.
    pub fn clamp(&mut self, limits: &OrbitConstraints) {
        if !self.distance.is_finite() {
            self.distance = limits.max_distance;
        }
        if !self.polar.is_finite() {
            self.polar = limits.max_polar;
        }
        self.distance = self.distance.clamp(limits.min_distance, limits.max_distance);
        self.polar = self.polar.clamp(limits.min_polar, limits.max_polar);
        self.azimuth = self.azimuth.rem_euclid(std::f32::consts::TAU);
    }

    /// Apply a drag/zoom delta and re-clamp.
    pub fn orbit(&mut self, d_azimuth: f32, d_polar: f32, zoom: f32, limits: &OrbitConstraints) {
        self.azimuth += d_azimuth;
        self.polar += d_polar;
        self.distance *= zoom;
        self.clamp(limits);
    }

    /// World-space eye position.
    pub fn eye(&self, target: Vec3) -> Vec3 {
        let (sin_p, cos_p) = self.polar.sin_cos();
        let (sin_a, cos_a) = self.azimuth.sin_cos();
        target + Vec3::new(sin_p * cos_a, cos_p, sin_p * sin_a) * self.distance
    }

    pub fn view_matrix(&self, target: Vec3) -> Mat4 {
        Mat4::look_at_rh(self.eye(target), target, Vec3::Y)
    }
}

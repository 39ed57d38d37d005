//! Virtual light sources for the room.
//!
//! The room gets exactly two lights:
//! - a primary spot light just below the ceiling at the room center, tinted by
//!   the product's color temperature and scaled by its flux
//! - a weak fill light with the same tint, off-center, so the far side of the
//!   room never renders pitch black
//!
//! This is a visual stand-in for the product, not a photometric simulation.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::Serialize;

use crate::color_temperature::{kelvin_to_color, Rgb, DEFAULT_KELVIN};
use crate::product::LightSettings;
use crate::room::RoomDimensions;

/// Intensity used when the product has no flux value.
pub const DEFAULT_INTENSITY: f32 = 0.6;

/// Beam angle used when the product has no angle value (degrees).
pub const DEFAULT_BEAM_ANGLE: f32 = 50.0;

/// Fill light intensity.
pub const FILL_INTENSITY: f32 = 0.3;

/// Lumens that map to an intensity of 1.0.
const LUMENS_PER_UNIT_INTENSITY: f32 = 900.0;

/// Distance of the spot light below the ceiling.
const CEILING_GAP: f32 = 0.1;

/// Spot light falloff distance relative to the longest room side.
const FALLOFF_FACTOR: f32 = 1.4;

/// Renderer intensity for a given flux.
pub fn spot_intensity(lumen: Option<f32>) -> f32 {
    match lumen {
        Some(lm) if lm.is_finite() => (lm / LUMENS_PER_UNIT_INTENSITY).clamp(0.4, 3.0),
        _ => DEFAULT_INTENSITY,
    }
}

/// Cone half-angle in radians for a full beam angle in degrees.
pub fn cone_half_angle(angle: Option<f32>) -> f32 {
    let angle = match angle {
        Some(a) if a.is_finite() => a,
        _ => DEFAULT_BEAM_ANGLE,
    };
    (angle.clamp(20.0, 160.0) / 2.0).to_radians()
}

/// The primary light, pointing straight down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotLight {
    pub position: Vec3,
    pub direction: Vec3,
    pub color: Rgb,
    pub intensity: f32,
    /// Half of the cone angle, in radians.
    pub half_angle: f32,
    /// Distance at which the light has faded out.
    pub distance: f32,
}

impl SpotLight {
    pub fn for_room(room: &RoomDimensions, settings: Option<&LightSettings>) -> Self {
        let cct = settings.map(|s| s.cct).unwrap_or(DEFAULT_KELVIN);
        Self {
            position: Vec3::new(room.width / 2.0, room.height - CEILING_GAP, room.length / 2.0),
            direction: Vec3::NEG_Y,
            color: kelvin_to_color(cct),
            intensity: spot_intensity(settings.map(|s| s.lumen)),
            half_angle: cone_half_angle(settings.map(|s| s.angle)),
            distance: room.max_extent() * FALLOFF_FACTOR,
        }
    }

    /// Radius of the lit disc on the floor.
    pub fn floor_radius(&self) -> f32 {
        self.position.y * self.half_angle.tan()
    }
}

/// Secondary omnidirectional light.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FillLight {
    pub position: Vec3,
    pub color: Rgb,
    pub intensity: f32,
}

impl FillLight {
    pub fn for_room(room: &RoomDimensions, tint: Rgb) -> Self {
        Self {
            position: Vec3::new(room.width * 0.25, room.height * 0.8, room.length * 0.75),
            color: tint,
            intensity: FILL_INTENSITY,
        }
    }
}

// ============================================================================
// GPU Uniforms
// ============================================================================

/// GPU-ready light uniforms.
///
/// Laid out for direct upload to a uniform buffer.
/// Total size: 80 bytes (16-byte aligned).
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct LightingUniforms {
    /// Spot position (xyz), w = falloff distance.
    pub spot_position: [f32; 4], // 16 bytes

    /// Spot direction (xyz), w = cos(half angle).
    pub spot_direction: [f32; 4], // 16 bytes

    /// Spot color (rgb), a = intensity.
    pub spot_color: [f32; 4], // 16 bytes

    /// Fill position (xyz), w unused.
    pub fill_position: [f32; 4], // 16 bytes

    /// Fill color (rgb), a = intensity.
    pub fill_color: [f32; 4], // 16 bytes
} // Total: 80 bytes

impl LightingUniforms {
    pub fn new(spot: &SpotLight, fill: &FillLight) -> Self {
        let d = spot.direction.try_normalize().unwrap_or(Vec3::NEG_Y);
        Self {
            spot_position: spot.position.extend(spot.distance).to_array(),
            spot_direction: d.extend(spot.half_angle.cos()).to_array(),
            spot_color: [spot.color.r, spot.color.g, spot.color.b, spot.intensity],
            fill_position: fill.position.extend(0.0).to_array(),
            fill_color: [fill.color.r, fill.color.g, fill.color.b, fill.intensity],
        }
    }
}

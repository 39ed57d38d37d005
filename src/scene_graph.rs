//! Renderable scene description.
//!
//! The simulator does not render anything itself. It produces a flat
//! description made of axis-aligned boxes ([`Solid`]) plus light and camera
//! parameters, which any renderer can consume.

use glam::Vec3;
use serde::Serialize;

use crate::camera::OrbitConstraints;
use crate::color_temperature::Rgb;
use crate::lighting::{FillLight, SpotLight};
use crate::room::{ObstacleCategory, RoomDimensions};

/// What a box represents. Renderers can use it to pick a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SolidRole {
    Floor,
    Wall,
    Body,
    Leg,
    Accent,
    Trim,
    Glass,
}

/// An axis-aligned box.
///
/// `offset` is the box center. Inside an [`ObstacleGroup`] it is relative to
/// the group origin; in [`SceneDescription::solids`] it is in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Solid {
    pub size: Vec3,
    pub offset: Vec3,
    pub color: Rgb,
    pub opacity: f32,
    pub role: SolidRole,
}

impl Solid {
    pub fn new(size: Vec3, offset: Vec3, color: Rgb, role: SolidRole) -> Self {
        Self {
            size,
            offset,
            color,
            opacity: 1.0,
            role,
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn translated(mut self, by: Vec3) -> Self {
        self.offset += by;
        self
    }

    pub fn min(&self) -> Vec3 {
        self.offset - self.size * 0.5
    }

    pub fn max(&self) -> Vec3 {
        self.offset + self.size * 0.5
    }

    pub fn is_translucent(&self) -> bool {
        self.opacity < 1.0
    }
}

/// The parts of one obstacle, positioned in the room.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObstacleGroup {
    pub id: String,
    pub label: String,
    pub category: ObstacleCategory,
    /// World position of the group center.
    pub origin: Vec3,
    pub parts: Vec<Solid>,
}

impl ObstacleGroup {
    /// Parts in world space.
    pub fn world_parts(&self) -> impl Iterator<Item = Solid> + '_ {
        self.parts.iter().map(|p| p.translated(self.origin))
    }
}

/// Everything a renderer needs to draw the room.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDescription {
    pub dimensions: RoomDimensions,
    /// Floor and the four walls.
    pub shell: Vec<Solid>,
    pub obstacles: Vec<ObstacleGroup>,
    pub spot_light: SpotLight,
    pub fill_light: FillLight,
    pub camera: OrbitConstraints,
}

impl SceneDescription {
    /// Every box in world space: shell first, then obstacle parts.
    pub fn solids(&self) -> impl Iterator<Item = Solid> + '_ {
        self.shell
            .iter()
            .copied()
            .chain(self.obstacles.iter().flat_map(|g| g.world_parts()))
    }

    pub fn obstacle(&self, id: &str) -> Option<&ObstacleGroup> {
        self.obstacles.iter().find(|g| g.id == id)
    }

    pub fn solid_count(&self) -> usize {
        self.shell.len() + self.obstacles.iter().map(|g| g.parts.len()).sum::<usize>()
    }
}

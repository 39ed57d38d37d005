//! Room composition: shell, obstacles, lights and camera bounds.
//!
//! The room occupies x in [0, width], z in [0, length], with the floor top at
//! y = 0 and the ceiling at y = height.

use glam::Vec3;

use crate::camera::OrbitConstraints;
use crate::color_temperature::Rgb;
use crate::lighting::{FillLight, SpotLight};
use crate::obstacle::build_obstacle;
use crate::product::LightSettings;
use crate::room::{ObstacleDefinition, RoomDimensions};
use crate::scene_graph::{SceneDescription, Solid, SolidRole};

/// Shell appearance settings.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    pub wall_thickness: f32,
    pub floor_thickness: f32,
    pub floor_color: Rgb,
    pub wall_color: Rgb,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            wall_thickness: 0.08,
            floor_thickness: 0.08,
            floor_color: Rgb::from_hex(0xd7ccc8),
            wall_color: Rgb::from_hex(0xf5f5f5),
        }
    }
}

/// Floor slab plus front, back, left and right walls.
pub fn build_shell(room: &RoomDimensions, config: &SceneConfig) -> Vec<Solid> {
    let (w, l, h) = (room.width, room.length, room.height);
    let t = config.wall_thickness;
    let half_h = h / 2.0;

    let floor = Solid::new(
        Vec3::new(w, config.floor_thickness, l),
        Vec3::new(w / 2.0, -config.floor_thickness / 2.0, l / 2.0),
        config.floor_color,
        SolidRole::Floor,
    );
    let wall = |size: Vec3, center: Vec3| Solid::new(size, center, config.wall_color, SolidRole::Wall);

    vec![
        floor,
        // Front and back span the width
        wall(Vec3::new(w, h, t), Vec3::new(w / 2.0, half_h, l + t / 2.0)),
        wall(Vec3::new(w, h, t), Vec3::new(w / 2.0, half_h, -t / 2.0)),
        // Left and right span the length
        wall(Vec3::new(t, h, l), Vec3::new(-t / 2.0, half_h, l / 2.0)),
        wall(Vec3::new(t, h, l), Vec3::new(w + t / 2.0, half_h, l / 2.0)),
    ]
}

/// Compose the full scene.
///
/// Only obstacles whose id passes `is_active` are placed; they keep the order
/// of `obstacles`.
pub fn compose_scene<'a>(
    room: &RoomDimensions,
    obstacles: impl IntoIterator<Item = &'a ObstacleDefinition>,
    is_active: impl Fn(&str) -> bool,
    light: Option<&LightSettings>,
    config: &SceneConfig,
) -> SceneDescription {
    let spot_light = SpotLight::for_room(room, light);
    let fill_light = FillLight::for_room(room, spot_light.color);

    SceneDescription {
        dimensions: *room,
        shell: build_shell(room, config),
        obstacles: obstacles
            .into_iter()
            .filter(|def| is_active(&def.id))
            .map(|def| build_obstacle(def, room))
            .collect(),
        spot_light,
        fill_light,
        camera: OrbitConstraints::for_room(room),
    }
}

//! Procedural furniture and fixture geometry.
//!
//! Each obstacle id maps to a builder that decomposes the obstacle's bounding
//! box into a few parametric boxes, so a bed reads as a bed and not as a
//! crate. Builders are pure functions of the obstacle size and palette and
//! return parts relative to the obstacle center; [`build_obstacle`] then
//! places the group in the room.
//!
//! Axis convention inside a group: x is width, y is up, z is depth with the
//! back edge (against the wall) at -z.

use glam::Vec3;

use crate::color_temperature::Rgb;
use crate::room::{ObstacleCategory, ObstacleDefinition, RoomDimensions};
use crate::scene_graph::{ObstacleGroup, Solid, SolidRole};

/// Extent given to an axis whose size is non-positive or non-finite.
pub const MIN_EXTENT: f32 = 0.05;

// ============================================================================
// Palette
// ============================================================================

/// Colors used for one obstacle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub base: Rgb,
    pub accent: Rgb,
    pub trim: Rgb,
    pub glass: Rgb,
}

/// Opacity of glass parts.
pub const GLASS_OPACITY: f32 = 0.35;

impl Palette {
    pub fn for_category(category: ObstacleCategory) -> Self {
        let base = match category {
            ObstacleCategory::Furniture => Rgb::from_hex(0x8d6e63),
            ObstacleCategory::Opening => Rgb::from_hex(0xcfd8dc),
            ObstacleCategory::Fixture => Rgb::from_hex(0xeceff1),
        };
        Self {
            base,
            accent: Rgb::from_hex(0xffd54f),
            trim: Rgb::from_hex(0x5d4037),
            glass: Rgb::from_hex(0xb3e5fc),
        }
    }
}

// ============================================================================
// Builders
// ============================================================================

/// Obstacle bounding box after sanitizing, in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub width: f32,
    pub depth: f32,
    pub height: f32,
}

impl Extent {
    pub fn of(def: &ObstacleDefinition) -> Self {
        let axis = |v: f32| if v.is_finite() && v > 0.0 { v } else { MIN_EXTENT };
        Self {
            width: axis(def.width),
            depth: axis(def.depth),
            height: axis(def.height),
        }
    }

    fn as_vec3(&self) -> Vec3 {
        Vec3::new(self.width, self.height, self.depth)
    }

    /// Y of the floor relative to the group center.
    fn bottom(&self) -> f32 {
        -self.height / 2.0
    }

    /// Y of the top relative to the group center.
    fn top(&self) -> f32 {
        self.height / 2.0
    }

    /// Thickness for panels and slabs that should read as thin.
    fn thin_depth(&self) -> f32 {
        (self.depth * 0.1).clamp(0.02, 0.1)
    }
}

/// Builds the parts of an obstacle, relative to its center.
pub type Builder = fn(&Extent, &Palette) -> Vec<Solid>;

/// Obstacle id to builder. Ids not listed use [`build_default`].
pub const BUILDERS: &[(&str, Builder)] = &[
    ("bed", build_bed),
    ("sofa", build_sofa),
    ("coffee-table", build_table),
    ("table", build_table),
    ("tv-stand", build_tv_stand),
    ("kitchen-cabinets", build_kitchen_cabinets),
    ("closet", build_closet),
    ("vanity", build_vanity),
    ("shower", build_shower),
    ("mirror", build_mirror),
    ("window", build_window),
    ("wall-lamps", build_light_fixture),
    ("hidden-lights", build_light_fixture),
    ("ceiling-light", build_light_fixture),
];

/// Look up the builder for an obstacle id.
pub fn builder_for(id: &str) -> Builder {
    BUILDERS
        .iter()
        .find(|(key, _)| *key == id)
        .map(|(_, builder)| *builder)
        .unwrap_or(build_default)
}

fn body(size: Vec3, offset: Vec3, color: Rgb) -> Solid {
    Solid::new(size, offset, color, SolidRole::Body)
}

fn build_bed(e: &Extent, p: &Palette) -> Vec<Solid> {
    let base_h = e.height * 0.35;
    let head_h = e.height * 0.85;
    let head_d = e.thin_depth();
    vec![
        body(
            Vec3::new(e.width, base_h, e.depth),
            Vec3::new(0.0, e.bottom() + base_h / 2.0, 0.0),
            p.base,
        ),
        Solid::new(
            Vec3::new(e.width, head_h, head_d),
            Vec3::new(0.0, e.bottom() + head_h / 2.0, -e.depth / 2.0 + head_d / 2.0),
            p.trim,
            SolidRole::Trim,
        ),
    ]
}

fn build_sofa(e: &Extent, p: &Palette) -> Vec<Solid> {
    let seat_h = e.height * 0.35;
    let back_h = e.height * 0.45;
    let back_d = e.depth * 0.25;
    let arm_w = e.width * 0.15;
    let arm_h = seat_h + e.height * 0.15;
    let seat_w = e.width - 2.0 * arm_w;
    let seat_d = e.depth - back_d;

    let mut parts = vec![
        body(
            Vec3::new(seat_w, seat_h, seat_d),
            Vec3::new(0.0, e.bottom() + seat_h / 2.0, back_d / 2.0),
            p.base,
        ),
        body(
            Vec3::new(e.width, back_h, back_d),
            Vec3::new(0.0, e.bottom() + back_h / 2.0 + seat_h, -e.depth / 2.0 + back_d / 2.0),
            p.base,
        ),
    ];
    for side in [-1.0, 1.0] {
        parts.push(Solid::new(
            Vec3::new(arm_w, arm_h, seat_d),
            Vec3::new(
                side * (e.width - arm_w) / 2.0,
                e.bottom() + arm_h / 2.0,
                back_d / 2.0,
            ),
            p.trim,
            SolidRole::Trim,
        ));
    }
    parts
}

fn build_table(e: &Extent, p: &Palette) -> Vec<Solid> {
    let top_h = e.height * 0.15;
    let leg_h = e.height - top_h;
    let leg_w = e.width * 0.08;
    let leg_d = e.depth * 0.08;

    let mut parts = vec![body(
        Vec3::new(e.width, top_h, e.depth),
        Vec3::new(0.0, e.top() - top_h / 2.0, 0.0),
        p.base,
    )];
    for (sx, sz) in [(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)] {
        parts.push(Solid::new(
            Vec3::new(leg_w, leg_h, leg_d),
            Vec3::new(
                sx * (e.width - leg_w) / 2.0,
                e.bottom() + leg_h / 2.0,
                sz * (e.depth - leg_d) / 2.0,
            ),
            p.trim,
            SolidRole::Leg,
        ));
    }
    parts
}

fn build_tv_stand(e: &Extent, p: &Palette) -> Vec<Solid> {
    let shelf_h = e.height * 0.35;
    let accent_h = e.height - shelf_h;
    vec![
        body(
            Vec3::new(e.width, shelf_h, e.depth),
            Vec3::new(0.0, e.bottom() + shelf_h / 2.0, 0.0),
            p.base,
        ),
        Solid::new(
            Vec3::new(e.width * 0.7, accent_h, e.thin_depth()),
            Vec3::new(0.0, e.bottom() + shelf_h + accent_h / 2.0, -e.depth / 4.0),
            p.accent,
            SolidRole::Accent,
        ),
    ]
}

fn build_kitchen_cabinets(e: &Extent, p: &Palette) -> Vec<Solid> {
    let base_h = e.height * 0.55;
    let upper_h = e.height * 0.3;
    let upper_d = e.depth * 0.6;
    vec![
        body(
            Vec3::new(e.width, base_h, e.depth),
            Vec3::new(0.0, e.bottom() + base_h / 2.0, 0.0),
            p.base,
        ),
        body(
            Vec3::new(e.width, upper_h, upper_d),
            Vec3::new(0.0, e.top() - upper_h / 2.0, -e.depth / 2.0 + upper_d / 2.0),
            p.base,
        ),
    ]
}

fn build_closet(e: &Extent, p: &Palette) -> Vec<Solid> {
    let trim_h = (e.height * 0.04).max(0.02);
    vec![
        body(e.as_vec3(), Vec3::ZERO, p.base),
        Solid::new(
            Vec3::new(e.width * 1.02, trim_h, e.depth * 1.02),
            Vec3::new(0.0, e.top() - trim_h * 2.0, 0.0),
            p.trim,
            SolidRole::Trim,
        ),
    ]
}

fn build_vanity(e: &Extent, p: &Palette) -> Vec<Solid> {
    let base_h = e.height * 0.6;
    let counter_h = e.height * 0.2;
    vec![
        body(
            Vec3::new(e.width, base_h, e.depth),
            Vec3::new(0.0, e.bottom() + base_h / 2.0, 0.0),
            p.base,
        ),
        Solid::new(
            Vec3::new(e.width, counter_h, e.depth),
            Vec3::new(0.0, e.bottom() + base_h + counter_h / 2.0, 0.0),
            p.trim,
            SolidRole::Trim,
        ),
    ]
}

fn build_shower(e: &Extent, p: &Palette) -> Vec<Solid> {
    let glass_d = e.thin_depth();
    vec![
        body(e.as_vec3(), Vec3::ZERO, p.base).with_opacity(0.8),
        Solid::new(
            Vec3::new(e.width, e.height, glass_d),
            Vec3::new(0.0, 0.0, e.depth / 2.0 + glass_d / 2.0),
            p.glass,
            SolidRole::Glass,
        )
        .with_opacity(GLASS_OPACITY),
    ]
}

fn build_mirror(e: &Extent, p: &Palette) -> Vec<Solid> {
    vec![Solid::new(
        Vec3::new(e.width, e.height, e.thin_depth()),
        Vec3::ZERO,
        p.glass,
        SolidRole::Glass,
    )]
}

fn build_window(e: &Extent, p: &Palette) -> Vec<Solid> {
    let glass_d = e.depth * 0.5;
    vec![
        Solid::new(e.as_vec3(), Vec3::ZERO, p.base, SolidRole::Trim),
        Solid::new(
            Vec3::new(e.width * 0.8, e.height * 0.75, glass_d),
            Vec3::new(0.0, 0.0, e.depth / 2.0 - glass_d / 2.0 + 0.001),
            p.glass,
            SolidRole::Glass,
        )
        .with_opacity(GLASS_OPACITY),
    ]
}

fn build_light_fixture(e: &Extent, p: &Palette) -> Vec<Solid> {
    vec![Solid::new(e.as_vec3(), Vec3::ZERO, p.accent, SolidRole::Accent)]
}

/// Single box of the raw definition size.
pub fn build_default(e: &Extent, p: &Palette) -> Vec<Solid> {
    vec![body(e.as_vec3(), Vec3::ZERO, p.base)]
}

// ============================================================================
// Placement
// ============================================================================

/// Vertical center of an obstacle group.
///
/// Ceiling fixtures hang from the ceiling, wall-mounted items sit at roughly
/// eye level and everything else stands on the floor.
pub fn center_y(id: &str, height: f32, room_height: f32) -> f32 {
    match id {
        "hidden-lights" | "ceiling-light" => room_height - height / 2.0,
        "wall-lamps" => room_height * 0.6,
        "mirror" | "window" => room_height * 0.55,
        _ => height / 2.0,
    }
}

/// Build and place one obstacle in the room.
pub fn build_obstacle(def: &ObstacleDefinition, room: &RoomDimensions) -> ObstacleGroup {
    let extent = Extent::of(def);
    let palette = Palette::for_category(def.category);
    let placement = def.placement.clamped();

    let origin = Vec3::new(
        placement.x * room.width,
        center_y(&def.id, extent.height, room.height),
        placement.z * room.length,
    );

    ObstacleGroup {
        id: def.id.clone(),
        label: def.label.clone(),
        category: def.category,
        origin,
        parts: builder_for(&def.id)(&extent, &palette),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::Placement;

    const EPS: f32 = 1e-5;

    fn def(id: &str, category: ObstacleCategory, w: f32, d: f32, h: f32) -> ObstacleDefinition {
        ObstacleDefinition {
            id: id.to_string(),
            category,
            label: id.to_string(),
            width: w,
            depth: d,
            height: h,
            placement: Placement::new(0.5, 0.25),
        }
    }

    fn furniture(id: &str) -> ObstacleDefinition {
        def(id, ObstacleCategory::Furniture, 2.0, 1.0, 1.0)
    }

    fn room() -> RoomDimensions {
        RoomDimensions::new(4.0, 5.0, 2.7)
    }

    #[test]
    fn test_every_listed_builder_is_multi_part_or_panel() {
        let single_part = ["mirror", "wall-lamps", "hidden-lights", "ceiling-light"];
        for (id, builder) in BUILDERS {
            let parts = builder(&Extent::of(&furniture(id)), &Palette::for_category(ObstacleCategory::Furniture));
            if single_part.contains(id) {
                assert_eq!(parts.len(), 1, "{id}");
            } else {
                assert!(parts.len() >= 2, "{id} should be decomposed");
            }
        }
    }

    #[test]
    fn test_unknown_id_uses_raw_box() {
        let group = build_obstacle(&def("plant", ObstacleCategory::Furniture, 0.4, 0.3, 1.2), &room());
        assert_eq!(group.parts.len(), 1);
        assert_eq!(group.parts[0].size, Vec3::new(0.4, 1.2, 0.3));
        assert_eq!(group.parts[0].offset, Vec3::ZERO);
    }

    #[test]
    fn test_thin_but_valid_sizes_are_kept() {
        let group = build_obstacle(&def("plant", ObstacleCategory::Furniture, 0.4, 0.03, 1.2), &room());
        assert_eq!(group.parts[0].size, Vec3::new(0.4, 1.2, 0.03));

        let e = Extent::of(&def("mirror", ObstacleCategory::Fixture, 0.6, 0.03, 0.9));
        assert_eq!(e.depth, 0.03);
    }

    #[test]
    fn test_group_position_from_placement() {
        let group = build_obstacle(&furniture("bed"), &room());
        assert!((group.origin.x - 2.0).abs() < EPS);
        assert!((group.origin.z - 1.25).abs() < EPS);
        // Freestanding furniture rests on the floor
        assert!((group.origin.y - 0.5).abs() < EPS);
    }

    #[test]
    fn test_center_y_by_mounting() {
        assert!((center_y("ceiling-light", 0.2, 2.7) - 2.6).abs() < EPS);
        assert!((center_y("hidden-lights", 0.1, 3.0) - 2.95).abs() < EPS);
        assert!((center_y("wall-lamps", 0.3, 3.0) - 1.8).abs() < EPS);
        assert!((center_y("mirror", 0.9, 2.0) - 1.1).abs() < EPS);
        assert!((center_y("window", 1.2, 2.0) - 1.1).abs() < EPS);
        assert!((center_y("sofa", 0.8, 2.7) - 0.4).abs() < EPS);
    }

    #[test]
    fn test_bed_proportions() {
        let e = Extent::of(&furniture("bed"));
        let parts = build_bed(&e, &Palette::for_category(ObstacleCategory::Furniture));
        assert!((parts[0].size.y - 0.35).abs() < EPS);
        assert!((parts[1].size.y - 0.85).abs() < EPS);
        // Both rest on the floor
        assert!((parts[0].min().y - e.bottom()).abs() < EPS);
        assert!((parts[1].min().y - e.bottom()).abs() < EPS);
        // Headboard against the back edge
        assert!((parts[1].min().z + e.depth / 2.0).abs() < EPS);
    }

    #[test]
    fn test_sofa_armrests_flank_seat() {
        let e = Extent::of(&furniture("sofa"));
        let parts = build_sofa(&e, &Palette::for_category(ObstacleCategory::Furniture));
        assert_eq!(parts.len(), 4);
        let arms: Vec<_> = parts.iter().filter(|s| s.role == SolidRole::Trim).collect();
        assert_eq!(arms.len(), 2);
        for arm in &arms {
            assert!((arm.size.x - 0.3).abs() < EPS);
        }
        assert!((arms[0].min().x + 1.0).abs() < EPS);
        assert!((arms[1].max().x - 1.0).abs() < EPS);
    }

    #[test]
    fn test_table_legs_span_to_top() {
        let e = Extent::of(&furniture("table"));
        let parts = build_table(&e, &Palette::for_category(ObstacleCategory::Furniture));
        let top = parts[0];
        let legs: Vec<_> = parts.iter().filter(|s| s.role == SolidRole::Leg).collect();
        assert_eq!(legs.len(), 4);
        for leg in legs {
            assert!((leg.max().y - top.min().y).abs() < EPS);
            assert!((leg.min().y - e.bottom()).abs() < EPS);
            assert!((leg.size.x - 0.16).abs() < EPS);
        }
    }

    #[test]
    fn test_parts_stay_within_bounds() {
        let e = Extent::of(&furniture("x"));
        let palette = Palette::for_category(ObstacleCategory::Furniture);
        let half = e.as_vec3() * 0.5 + Vec3::splat(1e-4);
        for id in ["bed", "sofa", "table", "tv-stand", "kitchen-cabinets", "vanity"] {
            for part in builder_for(id)(&e, &palette) {
                assert!(part.min().cmpge(-half).all(), "{id} {:?}", part);
                assert!(part.max().cmple(half).all(), "{id} {:?}", part);
            }
        }
    }

    #[test]
    fn test_window_glass_is_inset_accent() {
        let window = def("window", ObstacleCategory::Opening, 1.0, 0.1, 1.2);
        let group = build_obstacle(&window, &room());
        let glass = group.parts.iter().find(|s| s.role == SolidRole::Glass).unwrap();
        assert!((glass.size.x - 0.8).abs() < EPS);
        assert!((glass.size.y - 0.9).abs() < EPS);
        assert!(glass.is_translucent());
        assert_ne!(glass.color, group.parts[0].color);
    }

    #[test]
    fn test_shower_has_translucent_panel() {
        let group = build_obstacle(&furniture("shower"), &room());
        assert!(group
            .parts
            .iter()
            .any(|s| s.role == SolidRole::Glass && s.opacity == GLASS_OPACITY));
    }

    #[test]
    fn test_degenerate_sizes_are_sanitized() {
        let broken = def("closet", ObstacleCategory::Furniture, 0.0, f32::NAN, -1.0);
        let group = build_obstacle(&broken, &room());
        for part in &group.parts {
            assert!(part.size.cmpgt(Vec3::ZERO).all());
            assert!(part.offset.is_finite());
        }
        let e = Extent::of(&broken);
        assert_eq!((e.width, e.depth, e.height), (MIN_EXTENT, MIN_EXTENT, MIN_EXTENT));
    }
}

//! Built-in room templates.
//!
//! Used whenever the backend cannot provide templates, so the simulator stays
//! usable offline.

use crate::room::{
    ObstacleCategory, ObstacleDefinition, Placement, RoomDimensions, RoomKey, RoomTemplate,
};

fn obstacle(
    id: &str,
    category: ObstacleCategory,
    label: &str,
    size: [f32; 3],
    placement: [f32; 2],
) -> ObstacleDefinition {
    let [width, depth, height] = size;
    ObstacleDefinition {
        id: id.to_string(),
        category,
        label: label.to_string(),
        width,
        depth,
        height,
        placement: Placement::new(placement[0], placement[1]),
    }
}

fn notes(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|s| s.to_string()).collect()
}

/// The fixed fallback template set.
pub fn fallback_templates() -> Vec<RoomTemplate> {
    use ObstacleCategory::{Fixture, Furniture, Opening};

    vec![
        RoomTemplate {
            key: RoomKey::LivingRoom,
            label: "Living room".to_string(),
            description: "Open seating area with a sofa, coffee table and TV wall.".to_string(),
            default_dimensions: RoomDimensions::new(5.0, 6.0, 2.8),
            obstacles: vec![
                obstacle("sofa", Furniture, "Sofa", [2.2, 0.9, 0.85], [0.5, 0.78]),
                obstacle("coffee-table", Furniture, "Coffee table", [1.1, 0.6, 0.45], [0.5, 0.55]),
                obstacle("tv-stand", Furniture, "TV stand", [1.6, 0.45, 0.55], [0.5, 0.08]),
                obstacle("window", Opening, "Window", [1.6, 0.1, 1.3], [0.02, 0.5]),
                obstacle("wall-lamps", Fixture, "Wall lamps", [0.2, 0.15, 0.3], [0.98, 0.5]),
                obstacle("ceiling-light", Fixture, "Ceiling light", [0.6, 0.6, 0.12], [0.5, 0.5]),
            ],
            safety_notes: notes(&[
                "Keep lamps at least 0.5 m away from curtains and upholstery.",
            ]),
        },
        RoomTemplate {
            key: RoomKey::Bedroom,
            label: "Bedroom".to_string(),
            description: "Double bed with a wardrobe and a window.".to_string(),
            default_dimensions: RoomDimensions::new(4.0, 5.0, 2.7),
            obstacles: vec![
                obstacle("bed", Furniture, "Double bed", [1.6, 2.0, 1.0], [0.5, 0.3]),
                obstacle("closet", Furniture, "Closet", [1.8, 0.6, 2.2], [0.85, 0.9]),
                obstacle("window", Opening, "Window", [1.4, 0.1, 1.2], [0.5, 0.98]),
                obstacle("hidden-lights", Fixture, "Hidden cove lights", [3.0, 0.1, 0.08], [0.5, 0.05]),
            ],
            safety_notes: notes(&["Prefer warm color temperatures (2700-3000 K) for sleeping areas."]),
        },
        RoomTemplate {
            key: RoomKey::Kitchen,
            label: "Kitchen".to_string(),
            description: "Wall-run cabinets with a dining table.".to_string(),
            default_dimensions: RoomDimensions::new(3.5, 4.0, 2.6),
            obstacles: vec![
                obstacle("kitchen-cabinets", Furniture, "Kitchen cabinets", [3.0, 0.6, 2.2], [0.5, 0.08]),
                obstacle("table", Furniture, "Dining table", [1.2, 0.8, 0.75], [0.5, 0.65]),
                obstacle("window", Opening, "Window", [1.0, 0.1, 1.0], [0.98, 0.5]),
                obstacle("ceiling-light", Fixture, "Ceiling light", [0.5, 0.5, 0.1], [0.5, 0.6]),
            ],
            safety_notes: notes(&[
                "Task areas over counters need 300-500 lx.",
                "Use fixtures rated for humidity and grease near the cooktop.",
            ]),
        },
        RoomTemplate {
            key: RoomKey::Bathroom,
            label: "Bathroom".to_string(),
            description: "Shower enclosure, vanity and mirror.".to_string(),
            default_dimensions: RoomDimensions::new(2.5, 3.0, 2.5),
            obstacles: vec![
                obstacle("shower", Furniture, "Shower", [0.9, 0.9, 2.1], [0.2, 0.2]),
                obstacle("vanity", Furniture, "Vanity", [1.0, 0.5, 0.85], [0.7, 0.1]),
                obstacle("mirror", Fixture, "Mirror", [0.8, 0.03, 0.9], [0.7, 0.02]),
                obstacle("ceiling-light", Fixture, "Ceiling light", [0.3, 0.3, 0.08], [0.5, 0.5]),
            ],
            safety_notes: notes(&[
                "Fixtures inside shower zones must be rated IP65 or higher.",
                "Keep switches outside wet zones.",
            ]),
        },
        RoomTemplate {
            key: RoomKey::Office,
            label: "Home office".to_string(),
            description: "Desk workspace with storage.".to_string(),
            default_dimensions: RoomDimensions::new(3.0, 3.5, 2.6),
            obstacles: vec![
                obstacle("table", Furniture, "Desk", [1.4, 0.7, 0.75], [0.5, 0.2]),
                obstacle("closet", Furniture, "Bookcase", [1.0, 0.35, 2.0], [0.9, 0.7]),
                obstacle("window", Opening, "Window", [1.2, 0.1, 1.2], [0.02, 0.4]),
            ],
            safety_notes: notes(&["Desk work needs around 500 lx with minimal glare."]),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_bedroom_defaults() {
        let templates = fallback_templates();
        let bedroom = templates.iter().find(|t| t.key == RoomKey::Bedroom).unwrap();
        let dims = bedroom.defaults();
        assert_eq!(dims.width, 4.0);
        assert_eq!(dims.length, 5.0);
        assert_eq!(dims.height, 2.7);
    }

    #[test]
    fn test_obstacle_ids_unique_per_template() {
        for template in fallback_templates() {
            let ids: HashSet<_> = template.obstacle_ids().collect();
            assert_eq!(ids.len(), template.obstacles.len(), "{}", template.key);
        }
    }

    #[test]
    fn test_placements_normalized() {
        for template in fallback_templates() {
            for o in &template.obstacles {
                assert!((0.0..=1.0).contains(&o.placement.x), "{}", o.id);
                assert!((0.0..=1.0).contains(&o.placement.z), "{}", o.id);
            }
        }
    }
}

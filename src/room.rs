//! Room reference data: dimensions, templates and obstacle definitions.
//!
//! Templates are read-only data that come either from the backend or from the
//! built-in table in [`crate::templates`]. The JSON shape matches the backend
//! payloads (camelCase field names).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Smallest allowed room dimension in meters.
pub const DIMENSION_MIN: f32 = 1.0;

/// Largest allowed room dimension in meters.
pub const DIMENSION_MAX: f32 = 15.0;

/// Clamp a user-entered dimension to the supported range.
///
/// NaN is treated as the minimum so a cleared input field never produces a
/// degenerate room.
pub fn clamp_dimension(value: f32) -> f32 {
    if value.is_nan() {
        return DIMENSION_MIN;
    }
    value.clamp(DIMENSION_MIN, DIMENSION_MAX)
}

/// Unit the dimensions are displayed in. Values are always stored in meters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionUnit {
    #[default]
    Meters,
    Feet,
}

impl DimensionUnit {
    pub fn suffix(&self) -> &'static str {
        match self {
            DimensionUnit::Meters => "m",
            DimensionUnit::Feet => "ft",
        }
    }

    /// Convert a value in meters to this unit for display.
    pub fn display_value(&self, meters: f32) -> f32 {
        match self {
            DimensionUnit::Meters => meters,
            DimensionUnit::Feet => meters * 3.280_84,
        }
    }
}

/// One of the three editable room axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Width,
    Length,
    Height,
}

/// Interior room size in meters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoomDimensions {
    pub width: f32,
    pub length: f32,
    pub height: f32,
    #[serde(default)]
    pub unit: DimensionUnit,
}

impl RoomDimensions {
    /// Create dimensions, clamping every axis to the supported range.
    pub fn new(width: f32, length: f32, height: f32) -> Self {
        Self {
            width: clamp_dimension(width),
            length: clamp_dimension(length),
            height: clamp_dimension(height),
            unit: DimensionUnit::Meters,
        }
    }

    /// Return a copy with every axis clamped.
    pub fn clamped(self) -> Self {
        Self {
            unit: self.unit,
            ..Self::new(self.width, self.length, self.height)
        }
    }

    pub fn get(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Width => self.width,
            Axis::Length => self.length,
            Axis::Height => self.height,
        }
    }

    /// Set one axis, clamping the value. Returns the stored value.
    pub fn set(&mut self, axis: Axis, value: f32) -> f32 {
        let value = clamp_dimension(value);
        match axis {
            Axis::Width => self.width = value,
            Axis::Length => self.length = value,
            Axis::Height => self.height = value,
        }
        value
    }

    /// Floor area in square meters.
    pub fn area(&self) -> f32 {
        self.width * self.length
    }

    /// Longest horizontal side, used to size the camera orbit and light falloff.
    pub fn max_extent(&self) -> f32 {
        self.width.max(self.length)
    }
}

impl Default for RoomDimensions {
    fn default() -> Self {
        Self::new(4.0, 5.0, 2.7)
    }
}

impl fmt::Display for RoomDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.unit.suffix();
        write!(
            f,
            "{:.2}{s} x {:.2}{s} x {:.2}{s}",
            self.unit.display_value(self.width),
            self.unit.display_value(self.length),
            self.unit.display_value(self.height),
        )
    }
}

/// Kind of room a template describes.
///
/// Unknown keys coming from the backend are kept as `Custom` so new room types
/// do not break deserialization.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RoomKey {
    LivingRoom,
    Bedroom,
    Kitchen,
    Bathroom,
    Office,
    Custom(String),
}

impl RoomKey {
    pub fn as_str(&self) -> &str {
        match self {
            RoomKey::LivingRoom => "living-room",
            RoomKey::Bedroom => "bedroom",
            RoomKey::Kitchen => "kitchen",
            RoomKey::Bathroom => "bathroom",
            RoomKey::Office => "office",
            RoomKey::Custom(key) => key,
        }
    }
}

impl From<String> for RoomKey {
    fn from(key: String) -> Self {
        RoomKey::from(key.as_str())
    }
}

impl From<&str> for RoomKey {
    fn from(key: &str) -> Self {
        match key {
            "living-room" => RoomKey::LivingRoom,
            "bedroom" => RoomKey::Bedroom,
            "kitchen" => RoomKey::Kitchen,
            "bathroom" => RoomKey::Bathroom,
            "office" => RoomKey::Office,
            other => RoomKey::Custom(other.to_string()),
        }
    }
}

impl From<RoomKey> for String {
    fn from(key: RoomKey) -> Self {
        key.as_str().to_string()
    }
}

impl fmt::Display for RoomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Broad obstacle class, used to pick the base color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleCategory {
    Furniture,
    Opening,
    Fixture,
}

/// Position of an obstacle's footprint center, normalized to the room floor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub x: f32,
    pub z: f32,
}

impl Placement {
    pub const fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    /// Placement with both coordinates forced into [0, 1].
    pub fn clamped(&self) -> Self {
        let unit = |v: f32| if v.is_nan() { 0.5 } else { v.clamp(0.0, 1.0) };
        Self::new(unit(self.x), unit(self.z))
    }
}

/// A piece of furniture, opening or fixture a template places in the room.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObstacleDefinition {
    pub id: String,
    pub category: ObstacleCategory,
    pub label: String,
    pub width: f32,
    pub depth: f32,
    pub height: f32,
    pub placement: Placement,
}

/// Reference description of a room type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomTemplate {
    pub key: RoomKey,
    pub label: String,
    #[serde(default)]
    pub description: String,
    pub default_dimensions: RoomDimensions,
    #[serde(default)]
    pub obstacles: Vec<ObstacleDefinition>,
    #[serde(default)]
    pub safety_notes: Vec<String>,
}

impl RoomTemplate {
    /// Ids of every obstacle the template defines, in definition order.
    pub fn obstacle_ids(&self) -> impl Iterator<Item = &str> {
        self.obstacles.iter().map(|o| o.id.as_str())
    }

    pub fn obstacle(&self, id: &str) -> Option<&ObstacleDefinition> {
        self.obstacles.iter().find(|o| o.id == id)
    }

    /// Default dimensions with the clamp applied, whatever the source data says.
    pub fn defaults(&self) -> RoomDimensions {
        self.default_dimensions.clamped()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_dimension() {
        assert_eq!(clamp_dimension(20.0), 15.0);
        assert_eq!(clamp_dimension(0.0), 1.0);
        assert_eq!(clamp_dimension(-3.0), 1.0);
        assert_eq!(clamp_dimension(4.5), 4.5);
        assert_eq!(clamp_dimension(f32::NAN), 1.0);
    }

    #[test]
    fn test_set_axis_clamps() {
        let mut dims = RoomDimensions::default();
        assert_eq!(dims.set(Axis::Width, 20.0), 15.0);
        assert_eq!(dims.width, 15.0);
        dims.set(Axis::Height, 0.0);
        assert_eq!(dims.height, 1.0);
        assert_eq!(dims.length, 5.0);
    }

    #[test]
    fn test_room_key_round_trip_names() {
        assert_eq!(RoomKey::from("bedroom"), RoomKey::Bedroom);
        assert_eq!(RoomKey::from("living-room"), RoomKey::LivingRoom);
        assert_eq!(
            RoomKey::from("garage"),
            RoomKey::Custom("garage".to_string())
        );
        assert_eq!(RoomKey::Bathroom.to_string(), "bathroom");
    }

    #[test]
    fn test_room_key_keeps_backend_spelling() {
        for key in ["living_room", "livingroom", "Bedroom"] {
            let parsed: RoomKey = serde_json::from_str(&format!("\"{key}\"")).unwrap();
            assert_eq!(parsed, RoomKey::Custom(key.to_string()));
            assert_eq!(serde_json::to_string(&parsed).unwrap(), format!("\"{key}\""));
        }
        let living: RoomKey = serde_json::from_str("\"living-room\"").unwrap();
        assert_eq!(living, RoomKey::LivingRoom);
        assert_eq!(serde_json::to_string(&living).unwrap(), "\"living-room\"");
    }

    #[test]
    fn test_template_deserializes_from_backend_json() {
        let json = r#"{
            "key": "office",
            "label": "Office",
            "defaultDimensions": { "width": 30, "length": 3.5, "height": 2.6 },
            "obstacles": [{
                "id": "table",
                "category": "furniture",
                "label": "Desk",
                "width": 1.4, "depth": 0.7, "height": 0.75,
                "placement": { "x": 0.5, "z": 0.2 }
            }]
        }"#;
        let template: RoomTemplate = serde_json::from_str(json).unwrap();
        assert_eq!(template.key, RoomKey::Office);
        assert!(template.safety_notes.is_empty());
        assert_eq!(template.default_dimensions.unit, DimensionUnit::Meters);
        // Out-of-range defaults are clamped on use
        assert_eq!(template.defaults().width, 15.0);
        assert_eq!(template.obstacle_ids().collect::<Vec<_>>(), vec!["table"]);
    }

    #[test]
    fn test_placement_clamped() {
        let p = Placement::new(1.4, -0.2).clamped();
        assert_eq!(p, Placement::new(1.0, 0.0));
    }

    #[test]
    fn test_display_in_feet() {
        let mut dims = RoomDimensions::new(1.0, 1.0, 1.0);
        dims.unit = DimensionUnit::Feet;
        assert_eq!(dims.to_string(), "3.28ft x 3.28ft x 3.28ft");
    }
}

//! Photometric estimates and result precedence.
//!
//! The backend owns the real simulation. When it is unavailable the
//! simulator falls back to three closed-form approximations:
//!
//! - illuminance: total flux spread evenly over the floor area
//! - beam diameter: a cone from a ceiling-mounted fixture down to the floor
//! - efficacy: lumens per Watt
//!
//! Every formula degrades to `None` instead of producing 0, NaN or infinity,
//! so the UI shows a dash for anything it cannot know.

use serde::{Deserialize, Serialize};

use crate::product::LightSettings;
use crate::room::RoomDimensions;

/// Placeholder shown for an unknown value.
pub const UNKNOWN_PLACEHOLDER: &str = "—";

fn finite(value: f32) -> Option<f32> {
    value.is_finite().then_some(value)
}

/// Average illuminance in lux for `lumen` spread over `width * length`.
pub fn estimated_lux(lumen: Option<f32>, width: f32, length: f32) -> Option<f32> {
    let lumen = lumen?;
    let area = width * length;
    if !(lumen > 0.0) || !(area > 0.0) {
        return None;
    }
    finite(lumen / area)
}

/// Diameter of the light cone where it meets the floor, in meters.
pub fn beam_diameter(angle: Option<f32>, height: f32) -> Option<f32> {
    let angle = angle?;
    if !(angle > 0.0 && angle < 180.0) || !(height > 0.0) {
        return None;
    }
    finite(2.0 * height * (angle / 2.0).to_radians().tan())
}

/// Luminous efficacy in lm/W.
pub fn efficacy(lumen: Option<f32>, power: Option<f32>) -> Option<f32> {
    let (lumen, power) = (lumen?, power?);
    if !(power > 0.0) {
        return None;
    }
    finite(lumen / power)
}

/// Inputs to the local estimator. All optional, matching partial product data.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PhotometricInput {
    pub lumen: Option<f32>,
    pub angle: Option<f32>,
    pub power: Option<f32>,
}

impl From<&LightSettings> for PhotometricInput {
    fn from(settings: &LightSettings) -> Self {
        Self {
            lumen: Some(settings.lumen),
            angle: Some(settings.angle),
            power: Some(settings.power),
        }
    }
}

/// Metrics computed locally from the closed-form approximations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalEstimate {
    pub estimated_lux: Option<f32>,
    pub beam_diameter: Option<f32>,
    pub efficacy: Option<f32>,
}

impl LocalEstimate {
    pub fn compute(input: PhotometricInput, room: &RoomDimensions) -> Self {
        Self {
            estimated_lux: estimated_lux(input.lumen, room.width, room.length),
            beam_diameter: beam_diameter(input.angle, room.height),
            efficacy: efficacy(input.lumen, input.power),
        }
    }
}

/// Result of a backend simulation. Numeric fields may be missing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    #[serde(default)]
    pub estimated_lux: Option<f32>,
    #[serde(default)]
    pub beam_diameter: Option<f32>,
    #[serde(default)]
    pub efficacy: Option<f32>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub safety_notes: Vec<String>,
}

/// Where a displayed value came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricSource {
    Server,
    Local,
}

/// A displayed value together with its origin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Metric {
    pub value: f32,
    pub source: MetricSource,
}

fn prefer(server: Option<f32>, local: Option<f32>) -> Option<Metric> {
    server
        .and_then(finite)
        .map(|value| Metric {
            value,
            source: MetricSource::Server,
        })
        .or_else(|| {
            local.and_then(finite).map(|value| Metric {
                value,
                source: MetricSource::Local,
            })
        })
}

/// The values the simulator shows, resolved field by field.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayedMetrics {
    pub estimated_lux: Option<Metric>,
    pub beam_diameter: Option<Metric>,
    pub efficacy: Option<Metric>,
    pub warnings: Vec<String>,
    pub safety_notes: Vec<String>,
    /// True when no server result backs the values (backend failed or absent).
    pub fallback: bool,
}

impl DisplayedMetrics {
    /// Resolve display values: a server value wins over the local estimate.
    ///
    /// Safety notes from the template are always kept and the server's notes
    /// are appended without duplicates.
    pub fn resolve(
        server: Option<&SimulationResult>,
        local: &LocalEstimate,
        template_notes: &[String],
    ) -> Self {
        let mut safety_notes = template_notes.to_vec();
        let mut warnings = Vec::new();
        if let Some(result) = server {
            warnings.extend(result.warnings.iter().cloned());
            for note in &result.safety_notes {
                if !safety_notes.contains(note) {
                    safety_notes.push(note.clone());
                }
            }
        }

        Self {
            estimated_lux: prefer(server.and_then(|r| r.estimated_lux), local.estimated_lux),
            beam_diameter: prefer(server.and_then(|r| r.beam_diameter), local.beam_diameter),
            efficacy: prefer(server.and_then(|r| r.efficacy), local.efficacy),
            warnings,
            safety_notes,
            fallback: server.is_none(),
        }
    }

    pub fn lux_value(&self) -> Option<f32> {
        self.estimated_lux.map(|m| m.value)
    }

    pub fn beam_value(&self) -> Option<f32> {
        self.beam_diameter.map(|m| m.value)
    }

    pub fn efficacy_value(&self) -> Option<f32> {
        self.efficacy.map(|m| m.value)
    }
}

/// Format an optional value with a unit, using a dash when unknown.
pub fn format_metric(value: Option<f32>, decimals: usize, unit: &str) -> String {
    match value {
        Some(v) => format!("{v:.decimals$} {unit}"),
        None => UNKNOWN_PLACEHOLDER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_lux_is_flux_over_area() {
        assert!((estimated_lux(Some(1200.0), 4.0, 5.0).unwrap() - 60.0).abs() < EPS);
    }

    #[test]
    fn test_lux_decreases_with_area() {
        let mut previous = f32::INFINITY;
        for side in 1..=15 {
            let lux = estimated_lux(Some(800.0), side as f32, 3.0).unwrap();
            assert!(lux < previous);
            previous = lux;
        }
    }

    #[test]
    fn test_lux_unknown_without_flux() {
        assert_eq!(estimated_lux(None, 4.0, 5.0), None);
        assert_eq!(estimated_lux(Some(0.0), 4.0, 5.0), None);
        assert_eq!(estimated_lux(Some(1000.0), 0.0, 5.0), None);
        assert_eq!(estimated_lux(Some(f32::NAN), 4.0, 5.0), None);
    }

    #[test]
    fn test_beam_diameter_cone() {
        let d = beam_diameter(Some(90.0), 2.7).unwrap();
        assert!((d - 5.4).abs() < 1e-3, "got {d}");
    }

    #[test]
    fn test_beam_diameter_strictly_increasing() {
        let mut previous = 0.0;
        for angle in 1..180 {
            let d = beam_diameter(Some(angle as f32), 2.5).unwrap();
            assert!(d > previous, "angle {angle}");
            previous = d;
        }
    }

    #[test]
    fn test_beam_diameter_degenerate_inputs() {
        assert_eq!(beam_diameter(None, 2.7), None);
        assert_eq!(beam_diameter(Some(0.0), 2.7), None);
        assert_eq!(beam_diameter(Some(180.0), 2.7), None);
        assert_eq!(beam_diameter(Some(60.0), 0.0), None);
    }

    #[test]
    fn test_efficacy() {
        assert_eq!(efficacy(Some(1200.0), Some(12.0)), Some(100.0));
        assert_eq!(efficacy(Some(1200.0), Some(0.0)), None);
        assert_eq!(efficacy(Some(1200.0), None), None);
        assert_eq!(efficacy(None, Some(10.0)), None);
        for power in [0.001_f32, 1.0, 1.0e6] {
            assert!(efficacy(Some(500.0), Some(power)).unwrap().is_finite());
        }
    }

    #[test]
    fn test_server_values_win_field_by_field() {
        let local = LocalEstimate {
            estimated_lux: Some(60.0),
            beam_diameter: Some(5.4),
            efficacy: Some(100.0),
        };
        let server = SimulationResult {
            estimated_lux: Some(75.0),
            beam_diameter: None,
            efficacy: Some(f32::NAN),
            warnings: vec!["Glare risk".to_string()],
            safety_notes: vec!["a".to_string()],
        };
        let shown = DisplayedMetrics::resolve(Some(&server), &local, &["a".to_string()]);

        assert_eq!(
            shown.estimated_lux,
            Some(Metric {
                value: 75.0,
                source: MetricSource::Server
            })
        );
        assert_eq!(shown.beam_diameter.unwrap().source, MetricSource::Local);
        assert_eq!(shown.efficacy.unwrap().value, 100.0);
        assert_eq!(shown.warnings, vec!["Glare risk"]);
        assert_eq!(shown.safety_notes, vec!["a"]);
        assert!(!shown.fallback);
    }

    #[test]
    fn test_no_server_result_is_fallback() {
        let shown = DisplayedMetrics::resolve(None, &LocalEstimate::default(), &[]);
        assert!(shown.fallback);
        assert_eq!(shown.lux_value(), None);
        assert_eq!(format_metric(shown.lux_value(), 0, "lx"), UNKNOWN_PLACEHOLDER);
    }

    #[test]
    fn test_format_metric() {
        assert_eq!(format_metric(Some(5.4), 2, "m"), "5.40 m");
    }
}

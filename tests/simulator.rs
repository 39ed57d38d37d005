//! End-to-end runs of the simulator against file-backed and offline backends.
//!
//! Run with: cargo test --test simulator

use std::fs;
use std::path::PathBuf;

use roomlight::backend::{JsonBackend, OfflineBackend, PRODUCTS_FILE, SIMULATION_FILE, TEMPLATES_FILE};
use roomlight::controller::{Notice, SceneController, SimulationStatus};
use roomlight::mesh::SceneMesh;
use roomlight::photometry::{format_metric, MetricSource};
use roomlight::room::{Axis, RoomKey};

const TEMPLATES: &str = r#"[
  {
    "key": "bedroom",
    "label": "Bedroom",
    "description": "Double bed with wardrobe",
    "defaultDimensions": { "width": 4, "length": 5, "height": 2.7 },
    "obstacles": [
      { "id": "bed", "category": "furniture", "label": "Bed",
        "width": 1.6, "depth": 2.0, "height": 0.5, "placement": { "x": 0.5, "z": 0.35 } },
      { "id": "closet", "category": "furniture", "label": "Closet",
        "width": 1.8, "depth": 0.6, "height": 2.2, "placement": { "x": 0.2, "z": 0.9 } }
    ],
    "safetyNotes": ["Keep reading lights away from bedding."]
  },
  {
    "key": "kitchen",
    "label": "Kitchen",
    "defaultDimensions": { "width": 3.5, "length": 4, "height": 2.6 },
    "obstacles": []
  }
]"#;

const PRODUCTS: &str = r#"[
  { "id": "cable-3m", "name": "Cable 3 m" },
  { "id": "spot-12", "name": "Spot 12 W", "sku": "SP-12",
    "lumen": 1200, "cct": 3000, "cri": 90, "power": 12, "angle": 90 },
  { "id": "strip", "name": "LED strip", "lumen": 800, "cct": 4000, "cri": 80 }
]"#;

/// Scratch directory under the system temp dir, unique per test.
struct Fixture {
    dir: PathBuf,
}

impl Fixture {
    fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("roomlight-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("create fixture dir");
        Self { dir }
    }

    fn write(&self, file: &str, contents: &str) -> &Self {
        fs::write(self.dir.join(file), contents).expect("write fixture");
        self
    }

    fn backend(&self) -> JsonBackend {
        JsonBackend::new(&self.dir)
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.dir);
    }
}

#[test]
fn test_bedroom_local_estimate_when_simulation_missing() {
    let fixture = Fixture::new("bedroom-local");
    fixture.write(TEMPLATES_FILE, TEMPLATES).write(PRODUCTS_FILE, PRODUCTS);
    let backend = fixture.backend();

    let mut controller = SceneController::new();
    controller.load(&backend);
    assert!(controller.notices().is_empty());
    assert_eq!(controller.templates().len(), 2);

    // Only the product with every photometric field is offered
    assert_eq!(controller.products().len(), 1);
    assert_eq!(controller.selected_product().map(|p| p.id.as_str()), Some("spot-12"));

    assert!(controller.select_template(&RoomKey::Bedroom));
    assert!(controller.run_simulation(&backend));
    assert!(matches!(controller.status(), SimulationStatus::Failed { .. }));
    assert!(controller.notices().contains(&Notice::SimulationFallback));

    let metrics = controller.metrics();
    assert!(metrics.fallback);
    assert_eq!(format_metric(metrics.lux_value(), 0, "lx"), "60 lx");
    assert_eq!(format_metric(metrics.beam_value(), 2, "m"), "5.40 m");
    assert_eq!(format_metric(metrics.efficacy_value(), 1, "lm/W"), "100.0 lm/W");
    assert_eq!(metrics.safety_notes, vec!["Keep reading lights away from bedding."]);
}

#[test]
fn test_server_values_take_precedence_per_field() {
    let fixture = Fixture::new("server-precedence");
    fixture
        .write(TEMPLATES_FILE, TEMPLATES)
        .write(PRODUCTS_FILE, PRODUCTS)
        .write(
            SIMULATION_FILE,
            r#"{ "estimatedLux": 72.5, "warnings": ["Glare near the bed"],
                 "safetyNotes": ["Keep reading lights away from bedding.", "Use IP44 near water."] }"#,
        );
    let backend = fixture.backend();

    let mut controller = SceneController::new();
    controller.load(&backend);
    controller.select_template(&RoomKey::Bedroom);
    assert!(controller.run_simulation(&backend));
    assert!(matches!(controller.status(), SimulationStatus::Resolved { .. }));

    let metrics = controller.metrics();
    assert!(!metrics.fallback);
    let lux = metrics.estimated_lux.unwrap();
    assert_eq!(lux.value, 72.5);
    assert_eq!(lux.source, MetricSource::Server);
    // Server left these out, local estimate fills in
    assert_eq!(metrics.beam_diameter.unwrap().source, MetricSource::Local);
    assert_eq!(metrics.efficacy.unwrap().source, MetricSource::Local);
    assert_eq!(metrics.warnings, vec!["Glare near the bed"]);
    assert_eq!(metrics.safety_notes.len(), 2);

    // Same inputs: nothing new to ask
    assert!(!controller.run_simulation(&backend));

    // Changed inputs drop the stale server values until the next run
    controller.set_dimension(Axis::Width, 8.0);
    assert_eq!(controller.metrics().estimated_lux.unwrap().source, MetricSource::Local);
    assert!(controller.run_simulation(&backend));
    assert_eq!(controller.metrics().estimated_lux.unwrap().source, MetricSource::Server);
}

#[test]
fn test_offline_backend_degrades_gracefully() {
    let mut controller = SceneController::new();
    controller.load(&OfflineBackend);

    assert!(controller.notices().contains(&Notice::TemplatesFallback));
    assert!(controller.notices().contains(&Notice::ProductsUnavailable));
    assert_eq!(controller.templates().len(), 5);
    assert!(controller.selected_product().is_none());

    assert!(controller.select_template(&RoomKey::Kitchen));
    controller.run_simulation(&OfflineBackend);

    let metrics = controller.metrics();
    assert!(metrics.fallback);
    assert_eq!(format_metric(metrics.lux_value(), 0, "lx"), "—");
    assert_eq!(format_metric(metrics.efficacy_value(), 1, "lm/W"), "—");

    // The scene still renders with the default light
    let scene = controller.scene();
    assert!(scene.obstacle("kitchen-cabinets").is_some());
    assert_eq!(scene.spot_light.intensity, roomlight::lighting::DEFAULT_INTENSITY);
}

#[test]
fn test_toggled_obstacles_leave_scene_and_request() {
    let fixture = Fixture::new("toggle");
    fixture.write(TEMPLATES_FILE, TEMPLATES).write(PRODUCTS_FILE, PRODUCTS);
    let backend = fixture.backend();

    let mut controller = SceneController::new();
    controller.load(&backend);
    controller.select_template(&RoomKey::Bedroom);
    let full = SceneMesh::from_scene(&controller.scene());

    assert_eq!(controller.toggle_obstacle("closet"), Some(false));
    let request = controller.take_simulation_request().unwrap();
    assert_eq!(request.inputs.obstacles, vec!["bed"]);

    let scene = controller.scene();
    assert!(scene.obstacle("closet").is_none());
    assert!(SceneMesh::from_scene(&scene).vertices.len() < full.vertices.len());

    assert_eq!(controller.toggle_obstacle("sofa"), None);
}

#[test]
fn test_malformed_payloads_fall_back() {
    let fixture = Fixture::new("malformed");
    fixture
        .write(TEMPLATES_FILE, "{ not json")
        .write(PRODUCTS_FILE, r#"[{ "id": "cable", "name": "Cable" }]"#);

    let mut controller = SceneController::new();
    controller.load(&fixture.backend());

    assert!(controller.notices().contains(&Notice::TemplatesFallback));
    assert!(controller.notices().contains(&Notice::NoEligibleProducts));
    assert!(controller.products().is_empty());
    assert!(controller.template().is_some());
}

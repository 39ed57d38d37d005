use std::cell::RefCell;
use std::rc::Rc;

use anyhow::anyhow;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::camera::OrbitCamera;
use crate::controller::SceneController;
use crate::lighting::LightingUniforms;
use crate::mesh::SceneMesh;
use crate::photometry::SimulationResult;
use crate::product::Product;
use crate::room::{Axis, RoomKey, RoomTemplate};

/// Serialize a value for the host, logging (rather than panicking on) failures.
fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        log::error!("Failed to serialize: {}", e);
        "null".to_string()
    })
}

fn parse_axis(axis: &str) -> Option<Axis> {
    match axis {
        "width" => Some(Axis::Width),
        "length" => Some(Axis::Length),
        "height" => Some(Axis::Height),
        _ => None,
    }
}

#[wasm_bindgen]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// The simulator as seen from the page.
///
/// The page performs the HTTP calls itself and feeds the raw JSON bodies in.
/// Every getter returns JSON.
#[wasm_bindgen]
pub struct WasmSimulator {
    inner: Rc<RefCell<SimulatorContext>>,
}

struct SimulatorContext {
    controller: SceneController,
    camera: OrbitCamera,
}

impl SimulatorContext {
    /// Re-fit the camera after the room changed size.
    fn reset_camera(&mut self) {
        let limits = self.controller.scene().camera;
        self.camera = limits.initial_camera();
    }
}

impl Default for WasmSimulator {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl WasmSimulator {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        let controller = SceneController::new();
        let camera = controller.scene().camera.initial_camera();
        Self {
            inner: Rc::new(RefCell::new(SimulatorContext { controller, camera })),
        }
    }

    // ========================================================================
    // Backend payloads
    // ========================================================================

    /// Feed the body of `GET room-templates`. Returns false if it did not
    /// parse, in which case built-in templates stay in use.
    pub fn set_templates_json(&self, json: &str) -> bool {
        let parsed = serde_json::from_str::<Vec<RoomTemplate>>(json);
        let ok = parsed.is_ok();
        let mut inner = self.inner.borrow_mut();
        inner.controller.set_templates(parsed.map_err(Into::into));
        inner.reset_camera();
        ok
    }

    pub fn templates_fetch_failed(&self, reason: &str) {
        let mut inner = self.inner.borrow_mut();
        inner.controller.set_templates(Err(anyhow!("{}", reason)));
        inner.reset_camera();
    }

    /// Feed the body of `GET products`.
    pub fn set_products_json(&self, json: &str) -> bool {
        let parsed = serde_json::from_str::<Vec<Product>>(json);
        let ok = parsed.is_ok();
        self.inner
            .borrow_mut()
            .controller
            .set_products(parsed.map_err(Into::into));
        ok
    }

    pub fn products_fetch_failed(&self, reason: &str) {
        self.inner
            .borrow_mut()
            .controller
            .set_products(Err(anyhow!("{}", reason)));
    }

    // ========================================================================
    // User edits
    // ========================================================================

    pub fn select_template(&self, key: &str) -> bool {
        let mut inner = self.inner.borrow_mut();
        let changed = inner.controller.select_template(&RoomKey::from(key));
        if changed {
            inner.reset_camera();
        }
        changed
    }

    /// Set one dimension ("width", "length" or "height"). Returns the clamped
    /// value actually stored, or NaN for an unknown axis.
    pub fn set_dimension(&self, axis: &str, value: f32) -> f32 {
        let Some(axis) = parse_axis(axis) else {
            log::warn!("Unknown axis '{}'", axis);
            return f32::NAN;
        };
        let mut inner = self.inner.borrow_mut();
        let stored = inner.controller.set_dimension(axis, value);
        let limits = inner.controller.scene().camera;
        inner.camera.clamp(&limits);
        stored
    }

    /// Returns the obstacle's new state, or undefined for an unknown id.
    pub fn toggle_obstacle(&self, id: &str) -> Option<bool> {
        self.inner.borrow_mut().controller.toggle_obstacle(id)
    }

    pub fn select_product(&self, id: &str) -> bool {
        self.inner.borrow_mut().controller.select_product(id)
    }

    pub fn clear_product(&self) {
        self.inner.borrow_mut().controller.clear_product();
    }

    // ========================================================================
    // Simulation round trip
    // ========================================================================

    /// The next request body to POST, or undefined if nothing changed.
    pub fn take_simulation_request_json(&self) -> Option<String> {
        self.inner
            .borrow_mut()
            .controller
            .take_simulation_request()
            .map(|request| to_json(&request))
    }

    /// Deliver a response body for `generation`. Returns false if the result
    /// was stale or did not parse.
    pub fn resolve_simulation_json(&self, generation: u64, json: &str) -> bool {
        let parsed = serde_json::from_str::<SimulationResult>(json);
        if let Err(e) = &parsed {
            log::error!("Failed to parse simulation result: {}", e);
        }
        let ok = parsed.is_ok();
        let accepted = self
            .inner
            .borrow_mut()
            .controller
            .resolve_simulation(generation, parsed.map_err(Into::into));
        ok && accepted
    }

    pub fn simulation_failed(&self, generation: u64, reason: &str) -> bool {
        self.inner
            .borrow_mut()
            .controller
            .resolve_simulation(generation, Err(anyhow!("{}", reason)))
    }

    // ========================================================================
    // Getters
    // ========================================================================

    pub fn templates_json(&self) -> String {
        to_json(&self.inner.borrow().controller.templates())
    }

    pub fn products_json(&self) -> String {
        to_json(&self.inner.borrow().controller.products())
    }

    pub fn dimensions_json(&self) -> String {
        to_json(self.inner.borrow().controller.dimensions())
    }

    pub fn active_obstacles_json(&self) -> String {
        let inner = self.inner.borrow();
        let ids: Vec<&str> = inner.controller.active_obstacles().collect();
        to_json(&ids)
    }

    pub fn metrics_json(&self) -> String {
        to_json(&self.inner.borrow().controller.metrics())
    }

    pub fn notices_json(&self) -> String {
        let inner = self.inner.borrow();
        let notices: Vec<_> = inner
            .controller
            .notices()
            .iter()
            .map(|n| serde_json::json!({ "kind": n, "message": n.message() }))
            .collect();
        to_json(&notices)
    }

    pub fn status_json(&self) -> String {
        to_json(&self.inner.borrow().controller.status())
    }

    pub fn scene_json(&self) -> String {
        to_json(&self.inner.borrow().controller.scene())
    }

    // ========================================================================
    // Render data
    // ========================================================================

    /// Interleaved vertices: position (3), normal (3), color (4).
    pub fn mesh_vertices(&self) -> Vec<f32> {
        let mesh = SceneMesh::from_scene(&self.inner.borrow().controller.scene());
        bytemuck::cast_slice(&mesh.vertices).to_vec()
    }

    pub fn mesh_indices(&self) -> Vec<u32> {
        SceneMesh::from_scene(&self.inner.borrow().controller.scene()).indices
    }

    /// Number of leading indices that draw opaque geometry.
    pub fn mesh_opaque_index_count(&self) -> usize {
        SceneMesh::from_scene(&self.inner.borrow().controller.scene()).opaque_index_count
    }

    pub fn lighting_uniforms(&self) -> Vec<f32> {
        let scene = self.inner.borrow().controller.scene();
        let uniforms = LightingUniforms::new(&scene.spot_light, &scene.fill_light);
        bytemuck::cast_slice(&[uniforms]).to_vec()
    }

    /// Apply a drag or wheel delta to the orbit camera.
    pub fn orbit(&self, d_azimuth: f32, d_polar: f32, zoom: f32) {
        let mut inner = self.inner.borrow_mut();
        let limits = inner.controller.scene().camera;
        inner.camera.orbit(d_azimuth, d_polar, zoom, &limits);
    }

    /// Column-major view matrix.
    pub fn view_matrix(&self) -> Vec<f32> {
        let inner = self.inner.borrow();
        let target = inner.controller.scene().camera.target;
        inner.camera.view_matrix(target).to_cols_array().to_vec()
    }
}

//! Scene controller: the simulator's session state and its transitions.
//!
//! The controller owns everything the user can change (room template,
//! dimensions, active obstacles, selected product) and derives the rest
//! (light settings, metrics, scene). It never blocks: simulation requests are
//! handed out with [`SceneController::take_simulation_request`] and results
//! come back through [`SceneController::resolve_simulation`], whenever the
//! host's event loop delivers them.
//!
//! ## Latest request wins
//!
//! Each issued request carries a generation number. A result for any
//! generation other than the latest is discarded, so a slow response for old
//! inputs can never overwrite the metrics of newer ones.
//!
//! ## Degraded mode
//!
//! Backend failures never surface as errors. They are turned into
//! [`Notice`]s and the controller keeps working from built-in templates and
//! local estimates.

use std::collections::HashSet;

use anyhow::Result;
use serde::Serialize;

use crate::backend::{RoomPayload, SimulationInputs, SimulationRequest, SimulatorBackend};
use crate::composition::{compose_scene, SceneConfig};
use crate::photometry::{DisplayedMetrics, LocalEstimate, PhotometricInput, SimulationResult};
use crate::product::{eligible_products, LightSettings, Product};
use crate::room::{Axis, RoomDimensions, RoomKey, RoomTemplate};
use crate::scene_graph::SceneDescription;
use crate::templates::fallback_templates;

/// Non-blocking warnings shown inline in the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Notice {
    /// Templates could not be fetched; built-in templates are in use.
    TemplatesFallback,
    /// Products could not be fetched; the light uses default settings.
    ProductsUnavailable,
    /// The catalog has no product with complete photometric data.
    NoEligibleProducts,
    /// The last simulation failed; metrics are local estimates.
    SimulationFallback,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::TemplatesFallback => "Room templates are unavailable. Showing built-in rooms.",
            Notice::ProductsUnavailable => {
                "Products could not be loaded. The light uses default settings."
            }
            Notice::NoEligibleProducts => "No product has complete photometric data.",
            Notice::SimulationFallback => {
                "Simulation service unavailable. Values are local estimates."
            }
        }
    }
}

/// State of the most recent simulation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SimulationStatus {
    /// Nothing requested yet.
    Idle,
    Pending { generation: u64 },
    Resolved { generation: u64 },
    Failed { generation: u64 },
}

impl SimulationStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, SimulationStatus::Pending { .. })
    }
}

/// A server result and the fingerprint of the inputs it was computed for.
#[derive(Debug, Clone)]
struct ServerResult {
    fingerprint: String,
    result: SimulationResult,
}

/// Session state of the lighting simulator.
#[derive(Debug, Clone)]
pub struct SceneController {
    config: SceneConfig,
    templates: Vec<RoomTemplate>,
    template_index: usize,
    dimensions: RoomDimensions,
    active: HashSet<String>,
    products: Vec<Product>,
    selected_product: Option<String>,
    light: Option<LightSettings>,
    generation: u64,
    issued_fingerprint: Option<String>,
    status: SimulationStatus,
    server: Option<ServerResult>,
    notices: Vec<Notice>,
}

impl Default for SceneController {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneController {
    /// A controller backed by the built-in templates, usable before (or
    /// without) any backend call.
    pub fn new() -> Self {
        Self::with_config(SceneConfig::default())
    }

    pub fn with_config(config: SceneConfig) -> Self {
        let mut controller = Self {
            config,
            templates: Vec::new(),
            template_index: 0,
            dimensions: RoomDimensions::default(),
            active: HashSet::new(),
            products: Vec::new(),
            selected_product: None,
            light: None,
            generation: 0,
            issued_fingerprint: None,
            status: SimulationStatus::Idle,
            server: None,
            notices: Vec::new(),
        };
        controller.install_templates(fallback_templates());
        controller
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Fetch templates and products from the backend, degrading on failure.
    pub fn load(&mut self, backend: &dyn SimulatorBackend) {
        self.set_templates(backend.room_templates());
        self.set_products(backend.products());
    }

    /// Apply the outcome of a template fetch.
    pub fn set_templates(&mut self, fetched: Result<Vec<RoomTemplate>>) {
        match fetched {
            Ok(templates) if !templates.is_empty() => {
                log::info!("Loaded {} room templates", templates.len());
                self.clear_notice(Notice::TemplatesFallback);
                self.install_templates(templates);
            }
            Ok(_) => {
                log::warn!("Backend returned no room templates, using built-in set");
                self.push_notice(Notice::TemplatesFallback);
                self.install_templates(fallback_templates());
            }
            Err(e) => {
                log::warn!("Failed to fetch room templates: {:#}", e);
                self.push_notice(Notice::TemplatesFallback);
                self.install_templates(fallback_templates());
            }
        }
    }

    fn install_templates(&mut self, templates: Vec<RoomTemplate>) {
        let previous = self.templates.get(self.template_index).map(|t| t.key.clone());
        self.templates = templates;
        let index = previous
            .and_then(|key| self.templates.iter().position(|t| t.key == key))
            .unwrap_or(0);
        self.apply_template(index);
    }

    /// Apply the outcome of a product fetch.
    pub fn set_products(&mut self, fetched: Result<Vec<Product>>) {
        self.clear_notice(Notice::ProductsUnavailable);
        self.clear_notice(Notice::NoEligibleProducts);

        let products = match fetched {
            Ok(products) => {
                let total = products.len();
                let eligible = eligible_products(products);
                log::info!("Loaded {} products, {} eligible", total, eligible.len());
                if eligible.is_empty() {
                    self.push_notice(Notice::NoEligibleProducts);
                }
                eligible
            }
            Err(e) => {
                log::warn!("Failed to fetch products: {:#}", e);
                self.push_notice(Notice::ProductsUnavailable);
                Vec::new()
            }
        };
        self.products = products;

        let keep = self
            .selected_product
            .clone()
            .filter(|id| self.products.iter().any(|p| &p.id == id));
        match keep.or_else(|| self.products.first().map(|p| p.id.clone())) {
            Some(id) => {
                self.select_product(&id);
            }
            None => {
                self.selected_product = None;
                self.light = None;
            }
        }
    }

    // ========================================================================
    // User transitions
    // ========================================================================

    /// Switch room template. Resets dimensions to the template defaults and
    /// activates every obstacle it defines. Returns false for an unknown key.
    pub fn select_template(&mut self, key: &RoomKey) -> bool {
        match self.templates.iter().position(|t| &t.key == key) {
            Some(index) => {
                self.apply_template(index);
                true
            }
            None => {
                log::warn!("Unknown room template '{}'", key);
                false
            }
        }
    }

    fn apply_template(&mut self, index: usize) {
        self.template_index = index;
        match self.templates.get(index) {
            Some(template) => {
                self.dimensions = template.defaults();
                self.active = template.obstacle_ids().map(str::to_string).collect();
            }
            None => {
                self.dimensions = RoomDimensions::default();
                self.active.clear();
            }
        }
    }

    /// Edit one dimension. The value is clamped to the supported range and
    /// the clamped value is returned.
    pub fn set_dimension(&mut self, axis: Axis, value: f32) -> f32 {
        self.dimensions.set(axis, value)
    }

    /// Flip one obstacle on or off.
    ///
    /// Returns the new membership, or `None` if the current template has no
    /// obstacle with that id.
    pub fn toggle_obstacle(&mut self, id: &str) -> Option<bool> {
        if self.template().and_then(|t| t.obstacle(id)).is_none() {
            log::warn!("Ignoring toggle of unknown obstacle '{}'", id);
            return None;
        }
        if self.active.remove(id) {
            Some(false)
        } else {
            self.active.insert(id.to_string());
            Some(true)
        }
    }

    /// Select an eligible product. Light settings follow immediately.
    pub fn select_product(&mut self, id: &str) -> bool {
        let Some(settings) = self
            .products
            .iter()
            .find(|p| p.id == id)
            .and_then(Product::light_settings)
        else {
            log::warn!("Product '{}' is not selectable", id);
            return false;
        };
        self.selected_product = Some(id.to_string());
        self.light = Some(settings);
        true
    }

    pub fn clear_product(&mut self) {
        self.selected_product = None;
        self.light = None;
    }

    // ========================================================================
    // Simulation requests
    // ========================================================================

    /// The inputs the current state would be simulated with.
    pub fn simulation_inputs(&self) -> SimulationInputs {
        SimulationInputs {
            room: RoomPayload::from(&self.dimensions),
            obstacles: self.active_obstacles().map(str::to_string).collect(),
            product: self.light,
        }
    }

    /// Issue a request if the inputs changed since the last one.
    ///
    /// The new request supersedes any request still in flight.
    pub fn take_simulation_request(&mut self) -> Option<SimulationRequest> {
        let inputs = self.simulation_inputs();
        let fingerprint = inputs.fingerprint();
        if self.issued_fingerprint.as_deref() == Some(fingerprint.as_str()) {
            return None;
        }

        self.generation += 1;
        self.issued_fingerprint = Some(fingerprint);
        self.status = SimulationStatus::Pending {
            generation: self.generation,
        };
        log::debug!("Issuing simulation request generation {}", self.generation);

        Some(SimulationRequest {
            generation: self.generation,
            inputs,
        })
    }

    /// Deliver a simulation outcome. Returns false if it was stale and
    /// discarded.
    pub fn resolve_simulation(&mut self, generation: u64, outcome: Result<SimulationResult>) -> bool {
        if generation != self.generation || !self.status.is_pending() {
            log::debug!(
                "Discarding stale simulation result (generation {}, latest {})",
                generation,
                self.generation
            );
            return false;
        }

        match outcome {
            Ok(result) => {
                self.server = self.issued_fingerprint.clone().map(|fingerprint| ServerResult {
                    fingerprint,
                    result,
                });
                self.status = SimulationStatus::Resolved { generation };
                self.clear_notice(Notice::SimulationFallback);
            }
            Err(e) => {
                log::warn!("Simulation failed, using local estimate: {:#}", e);
                // Allow the same inputs to be requested again
                self.issued_fingerprint = None;
                self.server = None;
                self.status = SimulationStatus::Failed { generation };
                self.push_notice(Notice::SimulationFallback);
            }
        }
        true
    }

    /// Issue a request (if needed) and resolve it synchronously.
    pub fn run_simulation(&mut self, backend: &dyn SimulatorBackend) -> bool {
        match self.take_simulation_request() {
            Some(request) => {
                let outcome = backend.simulate(&request);
                self.resolve_simulation(request.generation, outcome)
            }
            None => false,
        }
    }

    // ========================================================================
    // Derived state
    // ========================================================================

    /// Closed-form estimate for the current room and light.
    pub fn local_estimate(&self) -> LocalEstimate {
        let input = self.light.as_ref().map(PhotometricInput::from).unwrap_or_default();
        LocalEstimate::compute(input, &self.dimensions)
    }

    /// The server result that may be shown for the current inputs.
    ///
    /// A result for older inputs is still shown while a refresh is pending.
    fn usable_server_result(&self) -> Option<&SimulationResult> {
        let server = self.server.as_ref()?;
        let current = self.simulation_inputs().fingerprint();
        (server.fingerprint == current || self.status.is_pending()).then_some(&server.result)
    }

    /// Values to display, server first, local estimate otherwise.
    pub fn metrics(&self) -> DisplayedMetrics {
        let notes = self
            .template()
            .map(|t| t.safety_notes.as_slice())
            .unwrap_or_default();
        DisplayedMetrics::resolve(self.usable_server_result(), &self.local_estimate(), notes)
    }

    /// Renderable scene for the current state.
    pub fn scene(&self) -> SceneDescription {
        let obstacles = self.template().map(|t| t.obstacles.as_slice()).unwrap_or_default();
        compose_scene(
            &self.dimensions,
            obstacles,
            |id| self.active.contains(id),
            self.light.as_ref(),
            &self.config,
        )
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn templates(&self) -> &[RoomTemplate] {
        &self.templates
    }

    pub fn template(&self) -> Option<&RoomTemplate> {
        self.templates.get(self.template_index)
    }

    pub fn dimensions(&self) -> &RoomDimensions {
        &self.dimensions
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active.contains(id)
    }

    /// Active obstacle ids in template order.
    pub fn active_obstacles(&self) -> impl Iterator<Item = &str> {
        self.template()
            .into_iter()
            .flat_map(|t| t.obstacle_ids())
            .filter(move |id| self.active.contains(*id))
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn selected_product(&self) -> Option<&Product> {
        let id = self.selected_product.as_ref()?;
        self.products.iter().find(|p| &p.id == id)
    }

    pub fn light_settings(&self) -> Option<&LightSettings> {
        self.light.as_ref()
    }

    pub fn status(&self) -> SimulationStatus {
        self.status
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    fn push_notice(&mut self, notice: Notice) {
        if !self.notices.contains(&notice) {
            self.notices.push(notice);
        }
    }

    fn clear_notice(&mut self, notice: Notice) {
        self.notices.retain(|n| *n != notice);
    }
}

//! Access to the external simulation backend.
//!
//! The backend serves room templates, the product catalog and server-side
//! simulation results. The controller only talks to it through
//! [`SimulatorBackend`] and treats every error as a reason to fall back to
//! local data.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::photometry::SimulationResult;
use crate::product::{LightSettings, Product};
use crate::room::{RoomDimensions, RoomTemplate};

/// Room size as sent to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomPayload {
    pub width: f32,
    pub length: f32,
    pub height: f32,
}

impl From<&RoomDimensions> for RoomPayload {
    fn from(d: &RoomDimensions) -> Self {
        Self {
            width: d.width,
            length: d.length,
            height: d.height,
        }
    }
}

/// Everything a simulation depends on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationInputs {
    pub room: RoomPayload,
    /// Active obstacle ids in template order.
    pub obstacles: Vec<String>,
    pub product: Option<LightSettings>,
}

impl SimulationInputs {
    /// Stable hash of the inputs, used to skip re-issuing identical requests.
    pub fn fingerprint(&self) -> String {
        // Serializing plain structs of numbers, strings and vecs cannot fail
        let canonical = serde_json::to_vec(self).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(&canonical);
        format!("{:x}", hasher.finalize())
    }
}

/// A simulation request tagged with the generation that issued it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub generation: u64,
    #[serde(flatten)]
    pub inputs: SimulationInputs,
}

/// The external collaborator behind the simulator.
pub trait SimulatorBackend {
    /// `GET room-templates`
    fn room_templates(&self) -> Result<Vec<RoomTemplate>>;

    /// `GET products`
    fn products(&self) -> Result<Vec<Product>>;

    /// `POST simulate`
    fn simulate(&self, request: &SimulationRequest) -> Result<SimulationResult>;
}

/// A backend that is never reachable. Drives the simulator in pure fallback
/// mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineBackend;

impl SimulatorBackend for OfflineBackend {
    fn room_templates(&self) -> Result<Vec<RoomTemplate>> {
        Err(anyhow!("backend offline"))
    }

    fn products(&self) -> Result<Vec<Product>> {
        Err(anyhow!("backend offline"))
    }

    fn simulate(&self, _request: &SimulationRequest) -> Result<SimulationResult> {
        Err(anyhow!("backend offline"))
    }
}

/// Serves backend payloads from JSON files in a directory.
///
/// Expected files: `room-templates.json`, `products.json` and
/// `simulation.json`. A missing file behaves like a failed request.
#[derive(Debug, Clone)]
pub struct JsonBackend {
    dir: PathBuf,
}

pub const TEMPLATES_FILE: &str = "room-templates.json";
pub const PRODUCTS_FILE: &str = "products.json";
pub const SIMULATION_FILE: &str = "simulation.json";

impl JsonBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read<T: DeserializeOwned>(&self, file: &str) -> Result<T> {
        let path = self.dir.join(file);
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }
}

impl SimulatorBackend for JsonBackend {
    fn room_templates(&self) -> Result<Vec<RoomTemplate>> {
        self.read(TEMPLATES_FILE)
    }

    fn products(&self) -> Result<Vec<Product>> {
        self.read(PRODUCTS_FILE)
    }

    fn simulate(&self, request: &SimulationRequest) -> Result<SimulationResult> {
        log::debug!(
            "Simulating generation {} with {} obstacles",
            request.generation,
            request.inputs.obstacles.len()
        );
        self.read(SIMULATION_FILE)
    }
}

// Room model and catalog
pub mod room;
pub mod templates;
pub mod product;

// Light and photometric math
pub mod color_temperature;
pub mod photometry;
pub mod lighting;

// Scene construction
pub mod scene_graph;
pub mod obstacle;
pub mod composition;
pub mod camera;
pub mod mesh;

// Session state and backend access
pub mod backend;
pub mod controller;

#[cfg(not(target_arch = "wasm32"))]
pub mod cli;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

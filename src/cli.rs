use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::backend::{JsonBackend, OfflineBackend, SimulatorBackend};
use crate::controller::SceneController;
use crate::mesh::SceneMesh;
use crate::photometry::{format_metric, DisplayedMetrics, Metric, MetricSource};
use crate::room::{Axis, RoomKey};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory with backend JSON payloads (room-templates.json,
    /// products.json, simulation.json). Without it the simulator runs offline.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available room templates
    Templates {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Compute illumination metrics for a room and product
    Simulate {
        #[command(flatten)]
        selection: Selection,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write the renderable scene description as JSON
    Scene {
        #[command(flatten)]
        selection: Selection,

        /// Output file (stdout if omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

/// Room and product choices shared by the simulate and scene commands.
#[derive(Args)]
struct Selection {
    /// Room template key (e.g. bedroom, living-room)
    #[arg(long, default_value = "living-room")]
    room: String,

    /// Room width in meters (clamped to 1-15)
    #[arg(long)]
    width: Option<f32>,

    /// Room length in meters (clamped to 1-15)
    #[arg(long)]
    length: Option<f32>,

    /// Room height in meters (clamped to 1-15)
    #[arg(long)]
    height: Option<f32>,

    /// Product id to light the room with
    #[arg(long)]
    product: Option<String>,

    /// Obstacle id to switch off (repeatable)
    #[arg(long = "disable")]
    disabled: Vec<String>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let backend: Box<dyn SimulatorBackend> = match &cli.data_dir {
        Some(dir) => {
            let backend = JsonBackend::new(dir);
            log::info!("Reading backend data from {}", backend.dir().display());
            Box::new(backend)
        }
        None => {
            log::info!("No data directory given, running offline");
            Box::new(OfflineBackend)
        }
    };
    let mut controller = SceneController::new();
    controller.load(backend.as_ref());

    match cli.command {
        Commands::Templates { json } => print_templates(&controller, json)?,
        Commands::Simulate { selection, json } => {
            apply_selection(&mut controller, &selection)?;
            controller.run_simulation(backend.as_ref());
            let metrics = controller.metrics();
            if json {
                println!("{}", serde_json::to_string_pretty(&metrics)?);
            } else {
                print_report(&controller, &metrics);
            }
        }
        Commands::Scene { selection, out } => {
            apply_selection(&mut controller, &selection)?;
            let scene = controller.scene();
            let json = serde_json::to_string_pretty(&scene)?;
            match out {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    let mesh = SceneMesh::from_scene(&scene);
                    println!(
                        "Wrote {:?}: {} solids, {} vertices, {} triangles, lit floor radius {:.2} m",
                        path,
                        scene.solid_count(),
                        mesh.vertices.len(),
                        mesh.indices.len() / 3,
                        scene.spot_light.floor_radius()
                    );
                }
                None => println!("{}", json),
            }
        }
    }
    Ok(())
}

fn apply_selection(controller: &mut SceneController, selection: &Selection) -> Result<()> {
    let key = RoomKey::from(selection.room.as_str());
    if !controller.select_template(&key) {
        let known: Vec<_> = controller.templates().iter().map(|t| t.key.to_string()).collect();
        bail!("Unknown room '{}'. Available: {}", selection.room, known.join(", "));
    }

    for (axis, value) in [
        (Axis::Width, selection.width),
        (Axis::Length, selection.length),
        (Axis::Height, selection.height),
    ] {
        if let Some(value) = value {
            let stored = controller.set_dimension(axis, value);
            if stored != value {
                log::warn!("{:?} {} clamped to {}", axis, value, stored);
            }
        }
    }

    for id in &selection.disabled {
        match controller.toggle_obstacle(id) {
            Some(false) => {}
            Some(true) => {
                // Was already off, switch it back
                controller.toggle_obstacle(id);
            }
            None => bail!("Room '{}' has no obstacle '{}'", selection.room, id),
        }
    }

    if let Some(id) = &selection.product {
        if !controller.select_product(id) {
            bail!("Product '{}' not found or missing photometric data", id);
        }
    }
    Ok(())
}

fn print_templates(controller: &SceneController, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(controller.templates())?);
        return Ok(());
    }
    for template in controller.templates() {
        let ids: Vec<_> = template.obstacle_ids().collect();
        println!("{:<12} {} ({})", template.key.to_string(), template.label, template.defaults());
        println!("{:<12} obstacles: {}", "", ids.join(", "));
    }
    print_notices(controller);
    Ok(())
}

fn source_tag(metric: Option<Metric>) -> &'static str {
    match metric.map(|m| m.source) {
        Some(MetricSource::Server) => " (server)",
        Some(MetricSource::Local) => " (estimate)",
        None => "",
    }
}

fn print_report(controller: &SceneController, metrics: &DisplayedMetrics) {
    if let Some(template) = controller.template() {
        println!("Room:          {} ({})", template.label, controller.dimensions());
    }
    let active: Vec<_> = controller.active_obstacles().collect();
    println!("Obstacles:     {}", if active.is_empty() { "none".to_string() } else { active.join(", ") });

    match (controller.selected_product(), controller.light_settings()) {
        (Some(product), Some(light)) => println!(
            "Product:       {} ({:.0} lm, {:.0} K, {:.0}°, {:.1} W, CRI {:.0})",
            product.name, light.lumen, light.cct, light.angle, light.power, light.cri
        ),
        _ => println!("Product:       none (default light)"),
    }

    println!(
        "Illuminance:   {}{}",
        format_metric(metrics.lux_value(), 0, "lx"),
        source_tag(metrics.estimated_lux)
    );
    println!(
        "Beam diameter: {}{}",
        format_metric(metrics.beam_value(), 2, "m"),
        source_tag(metrics.beam_diameter)
    );
    println!(
        "Efficacy:      {}{}",
        format_metric(metrics.efficacy_value(), 1, "lm/W"),
        source_tag(metrics.efficacy)
    );

    for warning in &metrics.warnings {
        println!("Warning:       {}", warning);
    }
    for note in &metrics.safety_notes {
        println!("Safety:        {}", note);
    }
    print_notices(controller);
}

fn print_notices(controller: &SceneController) {
    for notice in controller.notices() {
        eprintln!("[!] {}", notice.message());
    }
}

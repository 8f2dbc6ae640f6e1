#![deny(unsafe_code)]
//! CLI binary for the node-field renderer.
//!
//! Subcommands:
//! - `render` - simulate a scene for N frames, write a PNG of the last one
//! - `frame` - print the draw calls of the last frame as JSON
//! - `params` - print parameter defaults and schema

mod error;

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use error::CliError;
use node_field_core::{DrawList, FieldConfig, Rgb, Scene};
use node_field_raster::Raster;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "node-field", about = "Animated node-field renderer")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Simulate a scene and write its last frame as a PNG.
    Render {
        #[command(flatten)]
        scene: SceneArgs,

        /// Page color behind the field, as hex.
        #[arg(short, long, default_value = "#0a0a0f")]
        background: String,

        /// Output file path.
        #[arg(short, long, default_value = "node-field.png")]
        output: PathBuf,
    },
    /// Simulate a scene and print the draw calls of its last frame.
    Frame {
        #[command(flatten)]
        scene: SceneArgs,
    },
    /// Print parameter defaults and schema.
    Params,
}

#[derive(Args)]
struct SceneArgs {
    /// Scene JSON file; replaces every other scene flag.
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Surface width in CSS pixels.
    #[arg(short = 'W', long, default_value_t = 1280)]
    width: usize,

    /// Surface height in CSS pixels.
    #[arg(short = 'H', long, default_value_t = 720)]
    height: usize,

    /// Device pixel ratio of the backing store.
    #[arg(long, default_value_t = 1.0)]
    dpr: f64,

    /// Frames to simulate before drawing.
    #[arg(short, long, default_value_t = 120)]
    frames: usize,

    /// PRNG seed for deterministic output.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Pointer position as "x,y" in CSS pixels.
    #[arg(long)]
    pointer: Option<String>,

    /// Field parameters as a JSON string.
    #[arg(long, default_value = "{}")]
    params: String,
}

impl SceneArgs {
    fn into_scene(self) -> Result<Scene, CliError> {
        if let Some(path) = self.scene {
            let text = fs::read_to_string(&path)
                .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
            return serde_json::from_str(&text)
                .map_err(|e| CliError::Input(format!("invalid scene {}: {e}", path.display())));
        }
        let mut scene = Scene::new(self.width, self.height, self.seed);
        scene.device_pixel_ratio = self.dpr;
        scene.frames = self.frames;
        scene.pointer = self.pointer.as_deref().map(parse_pointer).transpose()?;
        scene.params = serde_json::from_str(&self.params)
            .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
        Ok(scene)
    }
}

fn parse_pointer(text: &str) -> Result<[f64; 2], CliError> {
    let invalid = || CliError::Input(format!("invalid --pointer '{text}', expected x,y"));
    let (x, y) = text.split_once(',').ok_or_else(invalid)?;
    let x: f64 = x.trim().parse().map_err(|_| invalid())?;
    let y: f64 = y.trim().parse().map_err(|_| invalid())?;
    if !(x.is_finite() && y.is_finite()) {
        return Err(invalid());
    }
    Ok([x, y])
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Params => {
            let info = serde_json::json!({
                "defaults": FieldConfig::default().to_json(),
                "schema": FieldConfig::param_schema(),
            });
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                let schema = FieldConfig::param_schema();
                if let Some(entries) = schema.as_object() {
                    for (name, entry) in entries {
                        println!(
                            "{name:<22} {:<10} {}",
                            entry["default"].to_string(),
                            entry["description"].as_str().unwrap_or_default()
                        );
                    }
                }
            }
        }
        Command::Frame { scene } => {
            let scene = scene.into_scene()?;
            let field = scene.build()?;
            let mut list = DrawList::default();
            field.draw(&mut list);
            debug!(commands = list.commands().len(), "frame recorded");
            println!("{}", serde_json::to_string_pretty(&list)?);
        }
        Command::Render {
            scene,
            background,
            output,
        } => {
            let scene = scene.into_scene()?;
            let background = Rgb::from_hex(&background)
                .map_err(|e| CliError::Input(e.to_string()))?
                .with_alpha(1.0);
            let field = scene.build()?;
            let mut raster = Raster::new(scene.surface_size(), background)?;
            field.draw(&mut raster);
            node_field_raster::snapshot::write_png(&raster, &output)?;

            if cli.json {
                let info = serde_json::json!({
                    "width": raster.width(),
                    "height": raster.height(),
                    "nodes": field.nodes().len(),
                    "frames": scene.frames,
                    "seed": scene.seed,
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {} nodes ({}x{} px, {} frames, seed {}) -> {}",
                    field.nodes().len(),
                    raster.width(),
                    raster.height(),
                    scene.frames,
                    scene.seed,
                    output.display()
                );
            }
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}

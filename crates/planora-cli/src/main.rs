//! # Planora CLI
//!
//! Command-line front end for the Planora layout engine.
//!
//! ## Usage
//!
//! ```bash
//! # List paper presets and calendar templates
//! planora presets
//! planora templates
//!
//! # Identify the preset behind a canvas size
//! planora match-preset 744 1052
//!
//! # Print the layout of a template for one month
//! planora layout photo-top --year 2025 --month 3
//!
//! # Create a document from a template, then compile it to graphics
//! planora new photo-top --year 2025 --month 3 --out march.json
//! planora compile march.json --holidays holidays.json
//! ```

use chrono::Datelike;
use clap::{Parser, Subcommand};
use planora_core::{
    Canvas, CanvasDocument, HolidayTable, NoHolidays, PlannerConfig, Scene, build_layout,
    builtin_templates, find_template, match_preset,
    template::LayoutOptions,
    units::{PRESETS, PaperSize},
};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

/// Planora - printable calendar and planner layouts
#[derive(Parser, Debug)]
#[command(name = "planora")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List paper presets
    Presets,

    /// List built-in calendar templates
    Templates,

    /// Find the preset matching a canvas size in px
    MatchPreset { width: f64, height: f64 },

    /// Print the computed layout of a template as JSON
    Layout {
        /// Template id
        template: String,

        #[arg(long)]
        year: Option<i32>,

        #[arg(long)]
        month: Option<u32>,

        /// Canvas width override in px
        #[arg(long)]
        width: Option<f64>,

        /// Canvas height override in px
        #[arg(long)]
        height: Option<f64>,
    },

    /// Create a document from a template
    New {
        /// Template id
        template: String,

        #[arg(long)]
        year: Option<i32>,

        #[arg(long)]
        month: Option<u32>,

        /// Output file (defaults to stdout)
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// Compile a saved document into its graphics scene
    Compile {
        /// Document JSON file
        document: PathBuf,

        /// Holiday list as JSON
        #[arg(long, value_name = "FILE")]
        holidays: Option<PathBuf>,

        /// Print the full scene instead of a summary
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => PlannerConfig::load(path)?,
        None => PlannerConfig::default(),
    };

    match cli.command {
        Commands::Presets => {
            for preset in PRESETS {
                let px = preset.size.px_size();
                println!(
                    "{:<20} {:<20} {:>7.1} x {:>7.1} mm  {:>5} x {:>5} px",
                    preset.id, preset.name, preset.size.width_mm, preset.size.height_mm, px.width, px.height
                );
            }
        }
        Commands::Templates => {
            for template in builtin_templates() {
                println!("{:<16} {}", template.id, template.name);
            }
        }
        Commands::MatchPreset { width, height } => match match_preset(width, height) {
            Some(m) => println!("{} ({:?})", m.preset.name, m.orientation),
            None => println!("custom ({width} x {height} px)"),
        },
        Commands::Layout {
            template,
            year,
            month,
            width,
            height,
        } => {
            let template = find_template(&template).ok_or_else(|| format!("unknown template '{template}'"))?;
            let mut options = month_options(year, month);
            options.canvas_width = width;
            options.canvas_height = height;
            let layout = build_layout(&template, &options);
            println!("{}", serde_json::to_string_pretty(&layout)?);
        }
        Commands::New {
            template,
            year,
            month,
            out,
        } => {
            let template = find_template(&template).ok_or_else(|| format!("unknown template '{template}'"))?;
            let paper = config.default_paper().oriented(template.orientation);
            let px = paper.px_size();
            let options = month_options(year, month).with_canvas_size(px.width, px.height);
            let layout = build_layout(&template, &options);

            let mut document = CanvasDocument::new()
                .with_paper(PaperSize::from_px(layout.canvas.width, layout.canvas.height))
                .with_undo_depth(config.undo_depth);
            document.name = layout.header.text.clone();
            document.background = layout.background;
            document.add_all(layout.into_objects());
            log::info!("created '{}' with {} objects", document.name, document.len());

            let json = document.to_json()?;
            match out {
                Some(path) => fs::write(&path, json)?,
                None => println!("{json}"),
            }
        }
        Commands::Compile {
            document,
            holidays,
            json,
        } => {
            let document = CanvasDocument::from_json(&fs::read_to_string(&document)?)?;
            let canvas = Canvas::with_document(document, config);
            let scene = match holidays {
                Some(path) => canvas.scene(&load_holidays(&path)?),
                None => canvas.scene(&NoHolidays),
            };
            if json {
                println!("{}", scene.to_json()?);
            } else {
                print_summary(&canvas, &scene);
            }
        }
    }
    Ok(())
}

/// Target month, defaulting to the current one.
fn month_options(year: Option<i32>, month: Option<u32>) -> LayoutOptions {
    let today = chrono::Local::now().date_naive();
    LayoutOptions::new(year.unwrap_or(today.year()), month.unwrap_or(today.month()))
}

fn load_holidays(path: &Path) -> Result<HolidayTable, Box<dyn Error>> {
    let table: HolidayTable = serde_json::from_str(&fs::read_to_string(path)?)?;
    log::debug!("loaded {} holidays from {}", table.0.len(), path.display());
    Ok(table)
}

fn print_summary(canvas: &Canvas, scene: &Scene) {
    println!(
        "{}: {:.0} x {:.0} px, {} nodes, {} primitives",
        canvas.document.name,
        scene.size.width,
        scene.size.height,
        scene.nodes.len(),
        scene.primitive_count()
    );
    for node in &scene.nodes {
        let kind = match scene.metadata(node, &canvas.document) {
            Some(metadata) => metadata.kind().as_str().to_string(),
            None => canvas
                .document
                .get(scene.source(node))
                .map(|o| format!("{:?}", o.object_type()).to_lowercase())
                .unwrap_or_default(),
        };
        println!("  {:<14} {:<36} {}", kind, node.object_id, node.tree.len());
    }
}

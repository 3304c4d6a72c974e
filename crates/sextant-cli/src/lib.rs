//! Sextant CLI library
//!
//! This module contains the core CLI logic: it reads a backend JSON payload,
//! lays it out with the matching engine and writes the scene as SVG.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, InputKind};

use std::fs;

use log::{debug, info};

use sextant::{
    SextantError, Visualizer,
    config::AppConfig,
    geometry::Size,
    model::{diagram::DiagramSpec, graph::GraphModel, repo::RepositorySnapshot},
    scene::Scene,
};

const DEFAULT_WIDTH: f32 = 720.0;
const DEFAULT_HEIGHT: f32 = 420.0;

/// Run the Sextant CLI application
///
/// This function lays the input file out with the engine selected by
/// `args.kind` and writes the resulting SVG to the output file.
///
/// # Errors
///
/// Returns `SextantError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed JSON input
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), SextantError> {
    info!(
        input_path = args.input,
        output_path = args.output,
        kind:? = args.kind;
        "Processing input"
    );

    let app_config = apply_viewport(config::load_config(args.config.as_ref())?, args);
    let source = fs::read_to_string(&args.input)?;

    let visualizer = Visualizer::new(app_config)?;
    let scene = layout(&visualizer, args, &source)?;
    let svg = visualizer.render_svg(&scene)?;

    fs::write(&args.output, svg)?;

    info!(output_file = args.output; "SVG exported successfully");

    Ok(())
}

fn apply_viewport(config: AppConfig, args: &Args) -> AppConfig {
    if args.width.is_none() && args.height.is_none() {
        return config;
    }
    let viewport = Size::new(
        args.width.unwrap_or(DEFAULT_WIDTH),
        args.height.unwrap_or(DEFAULT_HEIGHT),
    );
    debug!(width = viewport.width(), height = viewport.height(); "Overriding viewport");
    config.with_viewport(viewport)
}

fn layout(visualizer: &Visualizer, args: &Args, source: &str) -> Result<Scene, SextantError> {
    let scene = match args.kind {
        InputKind::Diagram => {
            let spec = DiagramSpec::from_json(source)?;
            visualizer.layout_diagram(&spec)
        }
        InputKind::Graph => {
            let graph = GraphModel::from_json(source)?;
            let resolved = graph.resolve();
            for step in graph.steps() {
                let node = resolved.step_node(step).map(|node| node.short_label(24));
                debug!(description = step.description(), node:?; "Execution step");
            }
            visualizer.layout_graph(&graph, args.ticks)
        }
        InputKind::Repo => {
            let snapshot = RepositorySnapshot::from_json(source)?;
            let mut view = visualizer.repo_view(&snapshot);
            if let Some(path) = &args.select {
                view.select(path);
                // Finish the zoom so the file shows the settled view
                view.advance(visualizer.config().layout().navigation().transition());
            }
            for commit in view.commits() {
                debug!(sha = commit.sha(), author = commit.display_author(); "Commit");
            }
            view.scene()
        }
    };
    Ok(scene)
}

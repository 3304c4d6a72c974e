//! Command-line argument definitions for the Sextant CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the kind of input, the output path, the
//! configuration file, the viewport and logging verbosity.

use clap::{Parser, ValueEnum};

/// What the input file holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputKind {
    /// A UML diagram description (class, sequence, activity, use case or markup)
    Diagram,
    /// An execution graph with nodes and edges
    Graph,
    /// A repository listing, bare or wrapped in an analysis payload
    Repo,
}

/// Command-line arguments for the Sextant layout tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input JSON file
    #[arg(help = "Path to the input JSON file")]
    pub input: String,

    /// Kind of data held by the input file
    #[arg(short, long, value_enum, default_value_t = InputKind::Diagram)]
    pub kind: InputKind,

    /// Path to the output SVG file
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Viewport width, overriding every engine's configured width
    #[arg(long)]
    pub width: Option<f32>,

    /// Viewport height, overriding every engine's configured height
    #[arg(long)]
    pub height: Option<f32>,

    /// Repository path to zoom onto before rendering (repo input only)
    #[arg(long)]
    pub select: Option<String>,

    /// Maximum number of force simulation ticks (graph input only)
    #[arg(long)]
    pub ticks: Option<usize>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

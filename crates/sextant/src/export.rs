//! Render adapters.
//!
//! Layout engines never draw. A [`Renderer`] turns a finished
//! [`Scene`] into some output format; [`svg::SvgRenderer`] is the one
//! concrete adapter shipped with the crate.
//!
//! Markup scenes are handed to an optional [`MarkupEngine`]. Engine failures
//! never propagate: they become [`MarkupOutput::Fallback`] text that the
//! adapter shows in place of the diagram.

pub mod svg;

use log::{debug, warn};

use sextant_core::scene::Scene;

/// Message shown for markup scenes when no engine is configured
pub const MARKUP_ENGINE_MISSING: &str = "Mermaid not loaded.";

/// Turns scenes into an output format.
pub trait Renderer {
    type Output;

    fn render(&self, scene: &Scene) -> Result<Self::Output, Error>;
}

/// An external text-to-diagram engine.
///
/// Implementations return the rendered SVG markup, or a human-readable error
/// message when the source cannot be rendered.
pub trait MarkupEngine {
    fn render(&self, source: &str) -> Result<String, String>;
}

/// What became of a markup scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupOutput {
    /// SVG markup produced by the engine
    Rendered(String),
    /// Text to display instead of the diagram
    Fallback(String),
}

/// Runs `source` through `engine`, degrading every failure to a fallback.
///
/// # Examples
///
/// ```
/// # use sextant::export::{MarkupOutput, render_markup};
/// assert_eq!(
///     render_markup(None, "graph TD; A-->B"),
///     MarkupOutput::Fallback("Mermaid not loaded.".to_string()),
/// );
/// ```
pub fn render_markup(engine: Option<&dyn MarkupEngine>, source: &str) -> MarkupOutput {
    let Some(engine) = engine else {
        debug!("No markup engine configured");
        return MarkupOutput::Fallback(MARKUP_ENGINE_MISSING.to_string());
    };

    match engine.render(source) {
        Ok(markup) => MarkupOutput::Rendered(markup),
        Err(message) => {
            warn!(message; "Markup engine failed, showing fallback");
            MarkupOutput::Fallback(message)
        }
    }
}

#[derive(Debug)]
pub enum Error {
    Render(String),
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}

//! Sextant - layout core for diagram, execution-graph and repository views.
//!
//! Backend JSON goes in, immutable [`Scene`](sextant_core::scene::Scene)s come
//! out. Three families of data are supported:
//!
//! - UML-style diagrams (class, sequence, activity, use case, or raw markup
//!   for an external engine), laid out by [`layout::DiagramLayout`],
//! - execution graphs, laid out by the [`layout::ForceSimulation`],
//! - repository listings, circle-packed and navigated through a
//!   [`navigation::RepoView`].
//!
//! Drawing stays outside the layout code: scenes are handed to a
//! [`export::Renderer`] such as [`export::svg::SvgRenderer`].

pub mod config;
pub mod export;
pub mod layout;
pub mod model;
pub mod navigation;
pub mod scheduler;

mod error;

pub use sextant_core::{color, draw, geometry, scene};

pub use error::SextantError;

use log::debug;

use sextant_core::{color::Theme, scene::Scene};

use config::AppConfig;
use export::{Renderer, svg::SvgRenderer};
use layout::{DiagramLayout, ForceSimulation};
use model::{diagram::DiagramSpec, graph::GraphModel, repo::RepositorySnapshot};
use navigation::RepoView;

/// Entry point tying configuration, layout engines and the SVG adapter
/// together.
///
/// # Examples
///
/// ```
/// use sextant::{Visualizer, model::diagram::DiagramSpec};
///
/// let visualizer = Visualizer::default();
/// let spec = DiagramSpec::from_json(r#"{"type": "class", "classes": [{"name": "Order"}]}"#)
///     .expect("valid JSON");
///
/// let scene = visualizer.layout_diagram(&spec);
/// assert!(scene.label_texts().any(|text| text == "Order"));
///
/// let svg = visualizer.render_svg(&scene).expect("renderable scene");
/// assert!(svg.starts_with("<svg"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Visualizer {
    config: AppConfig,
    theme: Theme,
}

impl Visualizer {
    /// Creates a visualizer, resolving the configured colors.
    ///
    /// # Errors
    ///
    /// Returns [`SextantError::Config`] when a style color does not parse or
    /// a navigation scale range is unusable.
    pub fn new(config: AppConfig) -> Result<Self, SextantError> {
        let theme = config.style().theme().map_err(SextantError::Config)?;
        config
            .layout()
            .navigation()
            .validate()
            .map_err(SextantError::Config)?;
        Ok(Self { config, theme })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Lays a diagram out in the configured diagram viewport
    pub fn layout_diagram(&self, spec: &DiagramSpec) -> Scene {
        let diagram_config = self.config.layout().diagram();
        DiagramLayout::new(diagram_config, &self.theme).layout(spec, diagram_config.viewport())
    }

    /// Starts a force simulation for `graph` in the configured graph viewport.
    ///
    /// The simulation is returned unstarted; pull frames from it or call
    /// [`ForceSimulation::run`].
    pub fn simulate_graph(&self, graph: &GraphModel) -> ForceSimulation {
        let force = self.config.layout().force();
        ForceSimulation::new(graph, force.viewport(), force)
    }

    /// Runs the graph simulation to convergence, or for at most `tick_budget`
    /// ticks, and draws the final frame.
    pub fn layout_graph(&self, graph: &GraphModel, tick_budget: Option<usize>) -> Scene {
        let mut simulation = self.simulate_graph(graph);
        if let Some(ticks) = tick_budget {
            simulation = simulation.with_tick_budget(ticks);
        }
        let frame = simulation.run();
        debug!(ticks = frame.tick(), alpha = frame.alpha(); "Graph simulation finished");
        frame.to_scene(self.config.layout().force().node_radius(), &self.theme)
    }

    /// Builds a navigable repository view over a snapshot
    pub fn repo_view(&self, snapshot: &RepositorySnapshot) -> RepoView {
        let layout = self.config.layout();
        let mut view = RepoView::new(*layout.pack(), *layout.navigation(), self.theme.clone());
        view.set_snapshot(snapshot);
        view
    }

    /// Renders a scene as an SVG string with the configured background.
    ///
    /// # Errors
    ///
    /// Returns [`SextantError::Export`] when the scene cannot be rendered.
    pub fn render_svg(&self, scene: &Scene) -> Result<String, SextantError> {
        let renderer = SvgRenderer::new().with_background(self.theme.background);
        let document = renderer.render(scene)?;
        Ok(document.to_string())
    }
}

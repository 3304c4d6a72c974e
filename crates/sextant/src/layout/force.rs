//! Force-directed graph layout
//!
//! [`ForceSimulation`] runs a velocity-Verlet style physics simulation over a
//! resolved execution graph. Three forces act on the nodes every tick, in
//! this order:
//!
//! 1. link springs pulling connected nodes toward a rest length,
//! 2. pairwise many-body repulsion,
//! 3. a centring shift that moves the mean position onto the viewport centre.
//!
//! The simulation "cools": `alpha` decays geometrically from 1 and the run is
//! over once it drops below `alpha_min` (300 ticks with the defaults). Every
//! tick yields a [`GraphFrame`], so the simulation is an [`Iterator`] the
//! caller pulls at its own pace.

use std::{f32::consts::PI, rc::Rc};

use log::{debug, info, trace};
use rand::{Rng, SeedableRng, rngs::StdRng};

use sextant_core::{
    color::Theme,
    draw::{
        Arrowhead, Fill, Label, LayeredPrimitives, Primitive, RenderLayer, StrokeDefinition,
        TextAnchor,
    },
    geometry::{Circle, Point, Size},
    scene::Scene,
};

use crate::{config::ForceConfig, model::graph::GraphModel};

const INITIAL_RADIUS: f32 = 10.0;
/// Minimum squared distance used by the many-body force
const DISTANCE_MIN_SQUARED: f32 = 1.0;
const LABEL_FONT_SIZE: u16 = 10;
const LABEL_DROP: f32 = 4.0;
const LINK_WIDTH: f32 = 1.5;

/// A spring between two nodes with its precomputed strength and bias.
#[derive(Debug, Clone, Copy)]
struct Link {
    source: usize,
    target: usize,
    /// `1 / min(deg(source), deg(target))`
    strength: f32,
    /// Share of the correction applied to the target: `deg(s) / (deg(s) + deg(t))`
    bias: f32,
}

/// One snapshot of the simulation.
///
/// Edges are index pairs into this frame's own `positions`, so a frame is
/// always self-consistent.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphFrame {
    tick: usize,
    alpha: f32,
    viewport: Size,
    positions: Vec<Point>,
    labels: Rc<[String]>,
    edges: Rc<[(usize, usize)]>,
}

impl GraphFrame {
    /// Number of ticks run before this frame was taken
    pub fn tick(&self) -> usize {
        self.tick
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn positions(&self) -> &[Point] {
        &self.positions
    }

    /// Short node labels, parallel to [`positions`](Self::positions)
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Endpoint coordinates of every edge
    pub fn edge_segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.edges
            .iter()
            .filter_map(|&(source, target)| {
                Some((*self.positions.get(source)?, *self.positions.get(target)?))
            })
    }

    /// Draws the frame: connector lines under filled node circles with their
    /// labels on top.
    pub fn to_scene(&self, node_radius: f32, theme: &Theme) -> Scene {
        let mut output = LayeredPrimitives::new();

        for (from, to) in self.edge_segments() {
            output.add_to_layer(
                RenderLayer::Connector,
                Primitive::line(
                    from,
                    to,
                    StrokeDefinition::solid(theme.guide, LINK_WIDTH),
                    Arrowhead::None,
                ),
            );
        }

        for (position, label) in self.positions.iter().zip(self.labels.iter()) {
            output.add_to_layer(
                RenderLayer::Content,
                Primitive::circle(
                    Circle::new(*position, node_radius),
                    Fill::Solid(theme.accent),
                    None,
                ),
            );
            output.add_to_layer(
                RenderLayer::Text,
                Primitive::Label(
                    Label::new(position.with_y(position.y() + LABEL_DROP), label.as_str())
                        .with_anchor(TextAnchor::Middle)
                        .with_font_size(LABEL_FONT_SIZE)
                        .with_color(theme.on_accent),
                ),
            );
        }

        Scene::from_primitives(self.viewport, output)
    }
}

/// Iterative force simulation over a graph.
///
/// # Examples
///
/// ```
/// # use sextant::config::ForceConfig;
/// # use sextant::layout::ForceSimulation;
/// # use sextant::model::graph::GraphModel;
/// let graph = GraphModel::from_json(
///     r#"{"nodes": [{"id": "n1"}, {"id": "n2"}], "edges": [{"from": "n1", "to": "n2"}]}"#,
/// ).unwrap();
/// let config = ForceConfig::default();
///
/// let mut simulation = ForceSimulation::new(&graph, config.viewport(), &config)
///     .with_tick_budget(10);
/// assert_eq!(simulation.by_ref().count(), 10);
/// assert_eq!(simulation.frame().edges(), &[(0, 1)]);
/// ```
#[derive(Debug)]
pub struct ForceSimulation {
    positions: Vec<Point>,
    velocities: Vec<Point>,
    links: Vec<Link>,
    labels: Rc<[String]>,
    edges: Rc<[(usize, usize)]>,
    viewport: Size,

    link_distance: f32,
    charge_strength: f32,
    alpha: f32,
    alpha_min: f32,
    alpha_decay: f32,
    alpha_target: f32,
    velocity_decay: f32,

    rng: StdRng,
    ticks: usize,
    ticks_since_restart: usize,
    tick_budget: Option<usize>,
    stopped: bool,
}

impl ForceSimulation {
    /// Resolves `graph` and places its nodes on a phyllotaxis spiral around
    /// the viewport centre. Edges with unknown endpoints are excluded.
    pub fn new(graph: &GraphModel, viewport: Size, config: &ForceConfig) -> Self {
        let resolved = graph.resolve();
        let node_count = resolved.node_count();

        let labels: Rc<[String]> = resolved
            .nodes()
            .map(|node| node.short_label(config.label_chars()))
            .collect();
        let edges: Rc<[(usize, usize)]> = resolved.edges().collect();

        let links = edges
            .iter()
            .map(|&(source, target)| {
                let source_degree = resolved.degree(source) as f32;
                let target_degree = resolved.degree(target) as f32;
                Link {
                    source,
                    target,
                    strength: 1.0 / source_degree.min(target_degree),
                    bias: source_degree / (source_degree + target_degree),
                }
            })
            .collect();

        let center = viewport.center();
        let positions = (0..node_count)
            .map(|index| center.add_point(phyllotaxis(index)))
            .collect();

        info!(nodes = node_count, edges = edges.len(); "Force simulation created");

        Self {
            positions,
            velocities: vec![Point::default(); node_count],
            links,
            labels,
            edges,
            viewport,
            link_distance: config.link_distance(),
            charge_strength: config.charge_strength(),
            alpha: 1.0,
            alpha_min: config.alpha_min(),
            alpha_decay: config.alpha_decay(),
            alpha_target: 0.0,
            velocity_decay: 1.0 - config.velocity_decay(),
            rng: StdRng::seed_from_u64(config.seed()),
            ticks: 0,
            ticks_since_restart: 0,
            tick_budget: None,
            stopped: false,
        }
    }

    /// Limits the number of frames yielded after each (re)start
    pub fn with_tick_budget(mut self, ticks: usize) -> Self {
        self.tick_budget = Some(ticks);
        self
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Total ticks run so far
    pub fn ticks(&self) -> usize {
        self.ticks
    }

    /// Returns `true` once alpha has cooled below `alpha_min`
    pub fn is_converged(&self) -> bool {
        self.alpha < self.alpha_min
    }

    /// Returns `true` after [`stop`](Self::stop) until the next restart
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Reheats the simulation: alpha goes back to 1 and the tick budget
    /// starts over.
    pub fn restart(&mut self) {
        debug!(ticks = self.ticks; "Restarting force simulation");
        self.alpha = 1.0;
        self.ticks_since_restart = 0;
        self.stopped = false;
    }

    /// Stops yielding frames. Calling it again has no effect.
    pub fn stop(&mut self) {
        if !self.stopped {
            debug!(ticks = self.ticks; "Stopping force simulation");
            self.stopped = true;
        }
    }

    /// Snapshot of the current state
    pub fn frame(&self) -> GraphFrame {
        GraphFrame {
            tick: self.ticks,
            alpha: self.alpha,
            viewport: self.viewport,
            positions: self.positions.clone(),
            labels: Rc::clone(&self.labels),
            edges: Rc::clone(&self.edges),
        }
    }

    /// Runs until convergence, stop or budget exhaustion and returns the
    /// final frame.
    pub fn run(&mut self) -> GraphFrame {
        let frames = self.by_ref().count();
        info!(frames, alpha = self.alpha; "Force simulation finished");
        self.frame()
    }

    /// Advances the simulation by one tick regardless of its state
    pub fn tick(&mut self) {
        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;

        self.apply_link_force();
        self.apply_many_body_force();
        self.apply_center_force();

        for (position, velocity) in self.positions.iter_mut().zip(self.velocities.iter_mut()) {
            *velocity = velocity.scale(self.velocity_decay);
            *position = position.add_point(*velocity);
        }

        self.ticks += 1;
        self.ticks_since_restart += 1;
        trace!(tick = self.ticks, alpha = self.alpha; "Force tick");
    }

    fn apply_link_force(&mut self) {
        for link in &self.links {
            let source = self.positions[link.source].add_point(self.velocities[link.source]);
            let target = self.positions[link.target].add_point(self.velocities[link.target]);

            let mut delta = target.sub_point(source);
            if delta.x() == 0.0 {
                delta = delta.with_x(jiggle(&mut self.rng));
            }
            if delta.y() == 0.0 {
                delta = delta.with_y(jiggle(&mut self.rng));
            }

            let length = delta.hypot();
            let factor = (length - self.link_distance) / length * self.alpha * link.strength;
            let correction = delta.scale(factor);

            self.velocities[link.target] =
                self.velocities[link.target].sub_point(correction.scale(link.bias));
            self.velocities[link.source] =
                self.velocities[link.source].add_point(correction.scale(1.0 - link.bias));
        }
    }

    fn apply_many_body_force(&mut self) {
        let count = self.positions.len();
        for i in 0..count {
            let mut push = Point::default();
            for j in 0..count {
                if i == j {
                    continue;
                }
                let mut delta = self.positions[j].sub_point(self.positions[i]);
                let mut length_squared = delta.x() * delta.x() + delta.y() * delta.y();

                // Coincident nodes are nudged apart by a tiny random offset
                if delta.x() == 0.0 {
                    let x = jiggle(&mut self.rng);
                    length_squared += x * x;
                    delta = delta.with_x(x);
                }
                if delta.y() == 0.0 {
                    let y = jiggle(&mut self.rng);
                    length_squared += y * y;
                    delta = delta.with_y(y);
                }
                if length_squared < DISTANCE_MIN_SQUARED {
                    length_squared = (DISTANCE_MIN_SQUARED * length_squared).sqrt();
                }

                push = push.add_point(
                    delta.scale(self.charge_strength * self.alpha / length_squared),
                );
            }
            self.velocities[i] = self.velocities[i].add_point(push);
        }
    }

    fn apply_center_force(&mut self) {
        if self.positions.is_empty() {
            return;
        }
        let sum = self
            .positions
            .iter()
            .fold(Point::default(), |acc, position| acc.add_point(*position));
        let mean = sum.scale(1.0 / self.positions.len() as f32);
        let shift = mean.sub_point(self.viewport.center());
        for position in &mut self.positions {
            *position = position.sub_point(shift);
        }
    }
}

impl Iterator for ForceSimulation {
    type Item = GraphFrame;

    fn next(&mut self) -> Option<GraphFrame> {
        if self.stopped || self.positions.is_empty() || self.is_converged() {
            return None;
        }
        if self
            .tick_budget
            .is_some_and(|budget| self.ticks_since_restart >= budget)
        {
            return None;
        }
        self.tick();
        Some(self.frame())
    }
}

/// Offset of the `index`-th node on the initial spiral
fn phyllotaxis(index: usize) -> Point {
    let radius = INITIAL_RADIUS * (0.5 + index as f32).sqrt();
    let angle = index as f32 * PI * (3.0 - 5.0_f32.sqrt());
    Point::new(radius * angle.cos(), radius * angle.sin())
}

/// A tiny non-zero random offset in `[-5e-7, 5e-7]`
fn jiggle(rng: &mut StdRng) -> f32 {
    let offset = (rng.random::<f32>() - 0.5) * 1e-6;
    if offset == 0.0 { 1e-7 } else { offset }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::model::graph::{GraphEdge, GraphNode};

    fn graph(ids: &[&str], edges: &[(&str, &str)]) -> GraphModel {
        GraphModel::new(
            ids.iter().map(|id| GraphNode::new(*id)).collect(),
            edges
                .iter()
                .map(|(source, target)| GraphEdge::new(*source, *target))
                .collect(),
        )
    }

    fn simulation(model: &GraphModel) -> ForceSimulation {
        let config = ForceConfig::default();
        ForceSimulation::new(model, config.viewport(), &config)
    }

    #[test]
    fn test_unresolved_edge_is_excluded() {
        let model = graph(&["n1", "n2"], &[("n1", "n2"), ("n1", "missing")]);
        let sim = simulation(&model);
        assert_eq!(sim.frame().edges(), &[(0, 1)]);
    }

    #[test]
    fn test_converges_in_about_300_ticks() {
        let model = graph(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
        let mut sim = simulation(&model);
        let frames = sim.by_ref().count();

        assert!((295..=305).contains(&frames), "ran {frames} ticks");
        assert!(sim.is_converged());
        assert!(sim.next().is_none());
    }

    #[test]
    fn test_tick_budget_and_restart() {
        let model = graph(&["a", "b"], &[("a", "b")]);
        let mut sim = simulation(&model).with_tick_budget(5);
        assert_eq!(sim.by_ref().count(), 5);
        assert_eq!(sim.ticks(), 5);

        sim.restart();
        assert_approx_eq!(f32, sim.alpha(), 1.0);
        assert_eq!(sim.by_ref().count(), 5);
        assert_eq!(sim.ticks(), 10);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let model = graph(&["a", "b"], &[]);
        let mut sim = simulation(&model);
        assert!(sim.next().is_some());

        sim.stop();
        sim.stop();
        assert!(sim.is_stopped());
        assert!(sim.next().is_none());

        sim.restart();
        assert!(sim.next().is_some());
    }

    #[test]
    fn test_deterministic() {
        let model = graph(&["a", "b", "c", "d"], &[("a", "b"), ("a", "c"), ("c", "d")]);
        let first = simulation(&model).run();
        let second = simulation(&model).run();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unlinked_nodes_centre_on_viewport() {
        let model = graph(&["a", "b", "c"], &[]);
        let frame = simulation(&model).with_tick_budget(50).run();
        let center = Size::new(720.0, 280.0).center();

        let mean = frame
            .positions()
            .iter()
            .fold(Point::default(), |acc, p| acc.add_point(*p))
            .scale(1.0 / 3.0);
        assert_approx_eq!(f32, mean.x(), center.x(), epsilon = 0.5);
        assert_approx_eq!(f32, mean.y(), center.y(), epsilon = 0.5);
    }

    #[test]
    fn test_repulsion_separates_nodes() {
        let model = graph(&["a", "b"], &[]);
        let mut sim = simulation(&model);
        let start = sim.frame();
        let end = sim.run();

        let distance = |frame: &GraphFrame| frame.positions()[0].distance(frame.positions()[1]);
        assert!(distance(&end) > distance(&start));
    }

    #[test]
    fn test_empty_graph_yields_nothing() {
        let model = graph(&[], &[]);
        let mut sim = simulation(&model);
        assert!(sim.next().is_none());
        assert!(sim.frame().to_scene(18.0, &Theme::default()).is_empty());
    }

    #[test]
    fn test_frame_scene() {
        let model = GraphModel::new(
            vec![
                GraphNode::new("n1").with_label("assign total"),
                GraphNode::new("n2"),
            ],
            vec![GraphEdge::new("n1", "n2")],
        );
        let frame = simulation(&model).with_tick_budget(1).run();
        let scene = frame.to_scene(18.0, &Theme::default());

        assert_eq!(scene.layer(RenderLayer::Connector).count(), 1);
        assert_eq!(scene.layer(RenderLayer::Content).count(), 2);
        let labels: Vec<_> = scene.label_texts().collect();
        assert_eq!(labels, ["assign", "n2"]);
    }

    #[test]
    fn test_phyllotaxis_points_are_distinct() {
        let points: Vec<_> = (0..50).map(phyllotaxis).collect();
        for (i, a) in points.iter().enumerate() {
            for b in &points[i + 1..] {
                assert!(a.distance(*b) > 1.0);
            }
        }
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;
    use crate::model::graph::{GraphEdge, GraphNode};

    fn graph_strategy() -> impl Strategy<Value = GraphModel> {
        (1usize..10).prop_flat_map(|count| {
            prop::collection::vec((0..count + 2, 0..count + 2), 0..15).prop_map(move |edges| {
                GraphModel::new(
                    (0..count).map(|i| GraphNode::new(format!("n{i}"))).collect(),
                    edges
                        .into_iter()
                        .map(|(s, t)| GraphEdge::new(format!("n{s}"), format!("n{t}")))
                        .collect(),
                )
            })
        })
    }

    fn check_frames_are_self_consistent(model: &GraphModel) -> Result<(), TestCaseError> {
        let config = ForceConfig::default();
        let simulation =
            ForceSimulation::new(model, config.viewport(), &config).with_tick_budget(20);

        for frame in simulation {
            prop_assert_eq!(frame.positions().len(), frame.labels().len());
            for &(source, target) in frame.edges() {
                prop_assert!(source < frame.positions().len());
                prop_assert!(target < frame.positions().len());
            }
            for position in frame.positions() {
                prop_assert!(position.x().is_finite() && position.y().is_finite());
            }
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn frames_are_self_consistent(model in graph_strategy()) {
            check_frames_are_self_consistent(&model)?;
        }
    }
}

//! Code-execution graphs.
//!
//! [`GraphModel`] is the decoded backend payload. [`GraphModel::resolve`]
//! turns it into a [`ResolvedGraph`]: a `petgraph` topology holding only the
//! first node declared for every id and only the edges whose two endpoints
//! resolve.
//!
//! Payloads may also list the analyzer's [`ExecutionStep`]s. They are shown
//! as text next to the graph and take no part in the layout.

use indexmap::IndexMap;
use log::{debug, trace};
use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};
use serde::Deserialize;

use super::lenient;
use crate::SextantError;

/// A node of an execution graph.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GraphNode {
    #[serde(deserialize_with = "lenient::text")]
    id: String,
    #[serde(deserialize_with = "lenient::optional_text")]
    label: Option<String>,
    #[serde(rename = "type", deserialize_with = "lenient::optional_text")]
    kind: Option<String>,
}

impl GraphNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the label, `None` when absent or empty
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref().filter(|label| !label.is_empty())
    }

    /// Statement kind reported by the analyzer (call, assign, ...)
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    /// Short text drawn inside the node: the first `max_chars` characters of
    /// the label, or the id when there is no label.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sextant::model::graph::GraphNode;
    /// assert_eq!(GraphNode::new("n1").with_label("call print").short_label(6), "call p");
    /// assert_eq!(GraphNode::new("n2").short_label(6), "n2");
    /// ```
    pub fn short_label(&self, max_chars: usize) -> String {
        match self.label() {
            Some(label) => label.chars().take(max_chars).collect(),
            None => self.id.clone(),
        }
    }
}

/// An edge named either `{source, target}` or `{from, to}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GraphEdge {
    #[serde(alias = "from", deserialize_with = "lenient::optional_text")]
    source: Option<String>,
    #[serde(alias = "to", deserialize_with = "lenient::optional_text")]
    target: Option<String>,
}

impl GraphEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            target: Some(target.into()),
        }
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref().filter(|id| !id.is_empty())
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref().filter(|id| !id.is_empty())
    }
}

/// One entry of the analyzer's step list, optionally tied to a node.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExecutionStep {
    #[serde(deserialize_with = "lenient::text")]
    description: String,
    #[serde(deserialize_with = "lenient::optional_text")]
    node_id: Option<String>,
}

impl ExecutionStep {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            node_id: None,
        }
    }

    pub fn with_node(mut self, node_id: impl Into<String>) -> Self {
        self.node_id = Some(node_id.into());
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Id of the node the step belongs to, `None` when absent or empty
    pub fn node_id(&self) -> Option<&str> {
        self.node_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// A decoded execution graph, possibly with duplicate ids and dangling edges.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GraphModel {
    #[serde(deserialize_with = "lenient::list")]
    nodes: Vec<GraphNode>,
    #[serde(deserialize_with = "lenient::list")]
    edges: Vec<GraphEdge>,
    #[serde(deserialize_with = "lenient::list")]
    steps: Vec<ExecutionStep>,
}

impl GraphModel {
    pub fn new(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
        Self {
            nodes,
            edges,
            steps: Vec::new(),
        }
    }

    pub fn with_steps(mut self, steps: Vec<ExecutionStep>) -> Self {
        self.steps = steps;
        self
    }

    /// Decodes an execution graph from backend JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`SextantError::Json`] for malformed input.
    pub fn from_json(source: &str) -> Result<Self, SextantError> {
        let model: Self = serde_json::from_str(source)?;
        debug!(
            nodes = model.nodes.len(),
            edges = model.edges.len(),
            steps = model.steps.len();
            "Graph decoded"
        );
        Ok(model)
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    /// Analyzer steps in the order they were reported
    pub fn steps(&self) -> &[ExecutionStep] {
        &self.steps
    }

    /// Builds the simulation topology.
    ///
    /// Later nodes reusing an id are dropped; edges with a missing or unknown
    /// endpoint are excluded.
    pub fn resolve(&self) -> ResolvedGraph {
        let mut graph = DiGraph::new();
        let mut id_map: IndexMap<&str, NodeIndex> = IndexMap::new();

        for node in &self.nodes {
            if id_map.contains_key(node.id()) {
                trace!(id = node.id(); "Skipping duplicate node id");
                continue;
            }
            let idx = graph.add_node(node.clone());
            id_map.insert(node.id(), idx);
        }

        for edge in &self.edges {
            let endpoints = edge
                .source()
                .and_then(|source| id_map.get(source))
                .zip(edge.target().and_then(|target| id_map.get(target)));
            match endpoints {
                Some((&source, &target)) => {
                    graph.add_edge(source, target, ());
                }
                None => {
                    debug!(source:? = edge.source(), target:? = edge.target(); "Dropping unresolved edge");
                }
            }
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            dropped_edges = self.edges.len() - graph.edge_count();
            "Graph resolved"
        );

        ResolvedGraph { graph }
    }
}

/// Node and edge topology with every edge resolved.
///
/// Node indices are dense, `0..node_count()`, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct ResolvedGraph {
    graph: DiGraph<GraphNode, ()>,
}

impl ResolvedGraph {
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Nodes in index order
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.graph.node_weights()
    }

    pub fn node(&self, index: usize) -> Option<&GraphNode> {
        self.graph.node_weight(NodeIndex::new(index))
    }

    /// Index of the node with `id`
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.graph
            .node_indices()
            .find(|idx| self.graph[*idx].id() == id)
            .map(NodeIndex::index)
    }

    /// The node a step points at, if it resolves
    pub fn step_node(&self, step: &ExecutionStep) -> Option<&GraphNode> {
        step.node_id()
            .and_then(|id| self.index_of(id))
            .and_then(|index| self.node(index))
    }

    /// Edges as `(source, target)` node index pairs, in declaration order
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.graph
            .edge_references()
            .map(|edge| (edge.source().index(), edge.target().index()))
    }

    /// Number of edge endpoints touching the node; a self-loop counts twice.
    pub fn degree(&self, index: usize) -> usize {
        let idx = NodeIndex::new(index);
        self.graph.edges_directed(idx, Direction::Outgoing).count()
            + self.graph.edges_directed(idx, Direction::Incoming).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_aliases() {
        let model = GraphModel::from_json(
            r#"{"nodes": [{"id": "a"}, {"id": "b"}],
                "edges": [{"source": "a", "target": "b"}, {"from": "b", "to": "a"}]}"#,
        )
        .unwrap();
        let resolved = model.resolve();
        assert_eq!(resolved.edges().collect::<Vec<_>>(), [(0, 1), (1, 0)]);
    }

    #[test]
    fn test_unresolved_edges_are_dropped() {
        let model = GraphModel::new(
            vec![GraphNode::new("n1"), GraphNode::new("n2")],
            vec![
                GraphEdge::new("n1", "n2"),
                GraphEdge::new("n1", "missing"),
                GraphEdge::default(),
            ],
        );
        let resolved = model.resolve();
        assert_eq!(resolved.node_count(), 2);
        assert_eq!(resolved.edge_count(), 1);
    }

    #[test]
    fn test_duplicate_ids_first_wins() {
        let model = GraphModel::new(
            vec![
                GraphNode::new("a").with_label("first"),
                GraphNode::new("a").with_label("second"),
            ],
            vec![],
        );
        let resolved = model.resolve();
        assert_eq!(resolved.node_count(), 1);
        assert_eq!(resolved.node(0).and_then(GraphNode::label), Some("first"));
    }

    #[test]
    fn test_degree_counts_self_loops_twice() {
        let model = GraphModel::new(
            vec![GraphNode::new("a"), GraphNode::new("b")],
            vec![GraphEdge::new("a", "a"), GraphEdge::new("a", "b")],
        );
        let resolved = model.resolve();
        assert_eq!(resolved.degree(0), 3);
        assert_eq!(resolved.degree(1), 1);
    }

    #[test]
    fn test_steps_resolve_to_first_declared_node() {
        let model = GraphModel::from_json(
            r#"{"nodes": [{"id": "n1", "label": "assign result"}, {"id": "n1", "label": "dup"}, {"id": "n2"}],
                "edges": [],
                "steps": [{"description": "Assign to result", "node_id": "n1"},
                          {"description": "Return value", "node_id": "gone"},
                          {"description": "Module start", "node_id": null}]}"#,
        )
        .unwrap();
        let resolved = model.resolve();

        let descriptions: Vec<_> = model.steps().iter().map(ExecutionStep::description).collect();
        assert_eq!(descriptions, ["Assign to result", "Return value", "Module start"]);

        let labels: Vec<_> = model
            .steps()
            .iter()
            .map(|step| resolved.step_node(step).and_then(GraphNode::label))
            .collect();
        assert_eq!(labels, [Some("assign result"), None, None]);
        assert_eq!(resolved.index_of("n2"), Some(1));
    }

    #[test]
    fn test_numeric_ids_and_null_lists_are_tolerated() {
        let model = GraphModel::from_json(
            r#"{"nodes": [{"id": 1}, {"id": 2}], "edges": [{"from": 1, "to": 2}], "steps": null}"#,
        )
        .unwrap();
        assert!(model.steps().is_empty());
        assert_eq!(model.resolve().edges().collect::<Vec<_>>(), [(0, 1)]);
    }

    #[test]
    fn test_short_label_ignores_empty_label() {
        let node = GraphNode::new("n7").with_label("");
        assert_eq!(node.short_label(6), "n7");
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn model_strategy() -> impl Strategy<Value = GraphModel> {
        let ids = prop::collection::vec("[a-e]", 0..8);
        let edges = prop::collection::vec(("[a-g]", "[a-g]"), 0..12);
        (ids, edges).prop_map(|(ids, edges)| {
            GraphModel::new(
                ids.into_iter().map(GraphNode::new).collect(),
                edges
                    .into_iter()
                    .map(|(source, target)| GraphEdge::new(source, target))
                    .collect(),
            )
        })
    }

    fn check_resolved_edges_are_known_edges(model: &GraphModel) -> Result<(), TestCaseError> {
        let resolved = model.resolve();
        let known = |id: &str| model.nodes().iter().any(|node| node.id() == id);

        let expected = model
            .edges()
            .iter()
            .filter(|edge| {
                edge.source().is_some_and(known) && edge.target().is_some_and(known)
            })
            .count();
        prop_assert_eq!(resolved.edge_count(), expected);

        for (source, target) in resolved.edges() {
            let source_id = resolved.node(source).map(GraphNode::id);
            let target_id = resolved.node(target).map(GraphNode::id);
            let edge_is_known = model.edges().iter().any(|edge| {
                edge.source() == source_id && edge.target() == target_id
            });
            prop_assert!(edge_is_known);
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn resolved_edges_are_known_edges(model in model_strategy()) {
            check_resolved_edges_are_known_edges(&model)?;
        }
    }
}

//! Circle-packing layout for repository trees.
//!
//! Every node of a [`HierarchyTree`] becomes a circle whose area follows its
//! weight. Siblings are packed with [`siblings::pack_siblings`] (front-chain
//! placement plus a minimal enclosing circle), bottom-up, and the whole tree
//! is scaled so the root circle fits the viewport.
//!
//! Padding is applied the way a two-pass layout has to: the first pass packs
//! without padding to estimate the final scale, the second inflates every
//! sibling by half the padding expressed in that estimated scale.

mod enclose;
mod siblings;

use std::collections::HashMap;

use log::{debug, info, trace};

use sextant_core::{
    color::Theme,
    draw::{Fill, Label, LayeredPrimitives, Primitive, RenderLayer, StrokeDefinition, TextAnchor},
    geometry::{Circle, Point, Size},
    scene::{Scene, ViewTransform},
};

use crate::{
    config::PackConfig,
    layout::hierarchy::{HierarchyTree, NodeId},
    model::repo::EntryKind,
};

const LABEL_DROP: f32 = 4.0;
const LABEL_FONT_SIZE: u16 = 11;
const FOLDER_STROKE_WIDTH: f32 = 1.0;
const HIGHLIGHT_STROKE_WIDTH: f32 = 2.5;

/// A circle during packing, in unscaled coordinates relative to its parent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Disc {
    x: f64,
    y: f64,
    r: f64,
}

/// A node of the packed tree in viewport coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedNode {
    name: String,
    path: String,
    kind: EntryKind,
    size: u64,
    value: u64,
    depth: usize,
    circle: Circle,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl PackedNode {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full path; empty for the root
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Entry type as listed in the input
    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// `max(1, size)` for leaves, the sum of the children otherwise
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Distance from the root, which has depth 0
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn circle(&self) -> Circle {
        self.circle
    }

    pub fn center(&self) -> Point {
        self.circle.center()
    }

    pub fn radius(&self) -> f32 {
        self.circle.radius()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children by descending value
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// `"folder"` when the node has children, `"file"` otherwise.
    ///
    /// This follows the packed shape rather than the listed type, so an empty
    /// directory reads as a file.
    pub fn kind_label(&self) -> &'static str {
        if self.is_leaf() {
            EntryKind::File.display_name()
        } else {
            EntryKind::Tree.display_name()
        }
    }
}

/// The result of [`pack`]: a tree of circles sharing the ids of the
/// hierarchy it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedTree {
    viewport: Size,
    nodes: Vec<PackedNode>,
    by_path: HashMap<String, NodeId>,
    root: NodeId,
}

impl PackedTree {
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes including the root
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` when the tree holds nothing but its root
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn node(&self, id: NodeId) -> &PackedNode {
        &self.nodes[id.index()]
    }

    /// Looks a node up by its full path; `""` is the root
    pub fn find(&self, path: &str) -> Option<NodeId> {
        self.by_path.get(path).copied()
    }

    /// Depth-first pre-order walk in packed (descending value) child order
    pub fn iter_depth_first(&self) -> impl Iterator<Item = NodeId> + '_ {
        let mut stack = vec![self.root];
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            stack.extend(self.node(id).children.iter().rev().copied());
            Some(id)
        })
    }

    /// Paths of every leaf under `id`, left to right
    pub fn flatten_leaves(&self, id: NodeId) -> Vec<String> {
        let mut leaves = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = self.node(current);
            if node.is_leaf() {
                leaves.push(node.path.clone());
            } else {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        leaves
    }

    /// Leaf paths of the whole tree, in playback order.
    ///
    /// A tree without entries has no leaves: the lone root is not one.
    pub fn leaves(&self) -> Vec<String> {
        if self.is_empty() {
            return Vec::new();
        }
        self.flatten_leaves(self.root)
    }

    /// The deepest non-root node whose circle contains `point`.
    ///
    /// `point` is in layout coordinates; invert the view transform first when
    /// hit-testing surface positions.
    pub fn node_at(&self, point: Point) -> Option<NodeId> {
        let mut hit = None;
        let mut cursor = self.root;
        'descend: loop {
            for &child in &self.node(cursor).children {
                let circle = self.node(child).circle;
                if circle.center().distance(point) <= circle.radius() {
                    hit = Some(child);
                    cursor = child;
                    continue 'descend;
                }
            }
            return hit;
        }
    }

    /// Draws every non-root node as a circle, parents below children.
    ///
    /// Folders are translucent, files are coloured by extension, names are
    /// shown only on circles large enough to hold them, and `active_path`
    /// gets a highlight ring. The whole scene is wrapped in `transform`.
    pub fn to_scene(
        &self,
        active_path: Option<&str>,
        transform: ViewTransform,
        config: &PackConfig,
        theme: &Theme,
    ) -> Scene {
        let mut output = LayeredPrimitives::new();

        for id in self.iter_depth_first().skip(1) {
            let node = self.node(id);
            let (fill, stroke) = if node.is_leaf() {
                (theme.extension_color(&node.name), None)
            } else {
                (
                    theme.folder_fill,
                    Some(StrokeDefinition::solid(theme.guide, FOLDER_STROKE_WIDTH)),
                )
            };
            output.add_to_layer(
                RenderLayer::Content,
                Primitive::circle(node.circle, Fill::Solid(fill), stroke),
            );

            if node.radius() > config.label_min_radius() {
                let center = node.center();
                output.add_to_layer(
                    RenderLayer::Text,
                    Primitive::Label(
                        Label::new(
                            center.with_y(center.y() + LABEL_DROP),
                            Label::truncate(
                                &node.name,
                                config.label_max_chars(),
                                config.label_max_chars().saturating_sub(1),
                            ),
                        )
                        .with_anchor(TextAnchor::Middle)
                        .with_font_size(LABEL_FONT_SIZE)
                        .with_color(theme.text),
                    ),
                );
            }
        }

        if let Some(active) = active_path
            .and_then(|path| self.find(path))
            .filter(|&id| id != self.root)
        {
            output.add_to_layer(
                RenderLayer::Highlight,
                Primitive::circle(
                    self.node(active).circle,
                    Fill::None,
                    Some(StrokeDefinition::solid(theme.highlight, HIGHLIGHT_STROKE_WIDTH)),
                ),
            );
        }

        Scene::from_primitives(self.viewport, output).with_transform(transform)
    }
}

/// Packs `tree` into `viewport`.
///
/// # Examples
///
/// ```
/// # use sextant::config::PackConfig;
/// # use sextant::layout::{build_hierarchy, pack};
/// # use sextant::model::repo::FileEntry;
/// # use sextant_core::geometry::Size;
/// let tree = build_hierarchy(&[FileEntry::file("src/a.js", 10), FileEntry::file("src/b.js", 5)]);
/// let packed = pack(&tree, Size::new(720.0, 420.0), &PackConfig::default());
///
/// let src = packed.node(packed.find("src").unwrap());
/// assert_eq!(src.value(), 15);
/// assert_eq!(packed.leaves(), ["src/a.js", "src/b.js"]);
/// ```
pub fn pack(tree: &HierarchyTree, viewport: Size, config: &PackConfig) -> PackedTree {
    let order: Vec<NodeId> = tree.iter_depth_first().collect();
    let count = tree.len();
    let root = tree.root();

    let mut values = vec![0u64; count];
    for &id in order.iter().rev() {
        let node = tree.node(id);
        values[id.index()] = if node.is_leaf() {
            node.size().max(1)
        } else {
            node.children()
                .iter()
                .map(|child| values[child.index()])
                .fold(0, u64::saturating_add)
        };
    }

    // `sort_by` is stable, so equal weights keep their insertion order.
    let mut children: Vec<Vec<NodeId>> = vec![Vec::new(); count];
    for &id in &order {
        let mut sorted = tree.node(id).children().to_vec();
        sorted.sort_by(|a, b| values[b.index()].cmp(&values[a.index()]));
        children[id.index()] = sorted;
    }

    let mut discs = vec![Disc::default(); count];
    for &id in &order {
        if tree.node(id).is_leaf() {
            discs[id.index()].r = (values[id.index()] as f64).sqrt();
        }
    }

    let target = (f64::from(viewport.min_side()) / 2.0 - f64::from(config.margin())).max(0.0);
    pack_pass(&order, &children, &mut discs, 0.0);
    let estimate = discs[root.index()].r;
    if config.padding() > 0.0 && estimate > 0.0 && target > 0.0 {
        let inflate = f64::from(config.padding()) / 2.0 * estimate / target;
        debug!(estimate, inflate; "Repacking with padding");
        pack_pass(&order, &children, &mut discs, inflate);
    }

    let root_radius = discs[root.index()].r;
    let scale = if root_radius > 0.0 { target / root_radius } else { 0.0 };

    let center = viewport.center();
    let mut absolute = vec![(0.0f64, 0.0f64); count];
    let mut depths = vec![0usize; count];
    absolute[root.index()] = (f64::from(center.x()), f64::from(center.y()));
    for &id in &order {
        let (px, py) = absolute[id.index()];
        for &child in &children[id.index()] {
            let disc = discs[child.index()];
            absolute[child.index()] = (px + disc.x * scale, py + disc.y * scale);
            depths[child.index()] = depths[id.index()] + 1;
        }
    }

    let mut arena_order = order;
    arena_order.sort();

    let mut by_path = HashMap::with_capacity(count);
    let nodes: Vec<PackedNode> = arena_order
        .into_iter()
        .map(|id| {
            let index = id.index();
            let source = tree.node(id);
            let (x, y) = absolute[index];
            let radius = discs[index].r * scale;
            by_path.insert(source.path().to_string(), id);
            trace!(path = source.path(), x, y, radius; "Packed node");
            PackedNode {
                name: source.name().to_string(),
                path: source.path().to_string(),
                kind: source.kind(),
                size: source.size(),
                value: values[index],
                depth: depths[index],
                circle: Circle::new(Point::new(x as f32, y as f32), radius as f32),
                parent: source.parent(),
                children: std::mem::take(&mut children[index]),
            }
        })
        .collect();

    info!(nodes = nodes.len(), scale; "Circle pack finished");

    PackedTree {
        viewport,
        nodes,
        by_path,
        root,
    }
}

/// Packs every group of siblings bottom-up, growing each child by `inflate`
/// while it is placed.
fn pack_pass(order: &[NodeId], children: &[Vec<NodeId>], discs: &mut [Disc], inflate: f64) {
    for &id in order.iter().rev() {
        let group_ids = &children[id.index()];
        if group_ids.is_empty() {
            continue;
        }

        let mut group: Vec<Disc> = group_ids
            .iter()
            .map(|child| Disc {
                r: discs[child.index()].r + inflate,
                ..Disc::default()
            })
            .collect();
        let enclosing = siblings::pack_siblings(&mut group);

        for (child, placed) in group_ids.iter().zip(&group) {
            discs[child.index()].x = placed.x;
            discs[child.index()].y = placed.y;
        }
        discs[id.index()].r = enclosing + inflate;
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;
    use crate::{layout::hierarchy::build_hierarchy, model::repo::FileEntry};

    const CONTAINMENT_TOLERANCE: f32 = 0.01;

    fn entries_strategy() -> impl Strategy<Value = Vec<FileEntry>> {
        let segment = prop::sample::select(vec!["src", "lib", "ui", "a.rs", "b.js", "c.md"]);
        let path = prop::collection::vec(segment, 1..4).prop_map(|segments| segments.join("/"));
        prop::collection::vec((path, 0u64..5_000), 0..30).prop_map(|items| {
            items
                .into_iter()
                .map(|(path, size)| FileEntry::file(path, size))
                .collect()
        })
    }

    fn check_children_inside_parent(entries: &[FileEntry]) -> Result<(), TestCaseError> {
        let tree = pack(&build_hierarchy(entries), Size::new(720.0, 420.0), &PackConfig::default());
        for id in tree.iter_depth_first() {
            let node = tree.node(id);
            for &child in node.children() {
                let child = tree.node(child);
                prop_assert!(
                    node.circle().contains_circle(&child.circle(), CONTAINMENT_TOLERANCE),
                    "{} escapes {}",
                    child.path(),
                    node.path()
                );
            }
        }
        Ok(())
    }

    fn check_values_are_sums(entries: &[FileEntry]) -> Result<(), TestCaseError> {
        let tree = pack(&build_hierarchy(entries), Size::new(720.0, 420.0), &PackConfig::default());
        for id in tree.iter_depth_first() {
            let node = tree.node(id);
            if node.is_leaf() {
                prop_assert_eq!(node.value(), node.size().max(1));
            } else {
                let sum: u64 = node.children().iter().map(|&c| tree.node(c).value()).sum();
                prop_assert_eq!(node.value(), sum);
            }
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn children_inside_parent(entries in entries_strategy()) {
            check_children_inside_parent(&entries)?;
        }

        #[test]
        fn values_are_sums(entries in entries_strategy()) {
            check_values_are_sums(&entries)?;
        }
    }
}

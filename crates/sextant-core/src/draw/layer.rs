//! Layer-based ordering of scene primitives.
//!
//! # Overview
//!
//! - [`RenderLayer`]: An enum defining available rendering layers in order
//! - [`LayeredPrimitives`]: A list of primitives tagged with their layer
//!
//! # Example
//!
//! ```
//! # use sextant_core::draw::{LayeredPrimitives, Label, Primitive, RenderLayer};
//! # use sextant_core::geometry::Point;
//! let mut output = LayeredPrimitives::new();
//! output.add_to_layer(RenderLayer::Text, Primitive::Label(Label::new(Point::new(0.0, 0.0), "hi")));
//! assert_eq!(output.len(), 1);
//! ```

use crate::draw::Primitive;

/// Defines the rendering layers of a scene.
///
/// Layers are rendered from bottom to top in the order defined by variant
/// declaration. The `Ord` derive uses declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderLayer {
    /// Background fills - renders first
    Background,
    /// Lifelines and other guide strokes
    Guide,
    /// Connectors between shapes (edges, messages, relationships)
    Connector,
    /// Main content shapes - default layer
    Content,
    /// Emphasis drawn over content (active selection)
    Highlight,
    /// Text labels
    Text,
}

impl RenderLayer {
    /// Returns a human-readable name for this layer.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Guide => "guide",
            Self::Connector => "connector",
            Self::Content => "content",
            Self::Highlight => "highlight",
            Self::Text => "text",
        }
    }
}

/// Primitives grouped by rendering layer.
///
/// Items keep their insertion order within a layer, so an engine that emits
/// a box and then its label gets them back in that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayeredPrimitives {
    items: Vec<(RenderLayer, Primitive)>,
}

impl LayeredPrimitives {
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a single primitive to the specified layer.
    pub fn add_to_layer(&mut self, layer: RenderLayer, primitive: Primitive) {
        self.items.push((layer, primitive));
    }

    /// Merges all primitives from another list into this one.
    pub fn merge(&mut self, other: LayeredPrimitives) {
        self.items.extend(other.items);
    }

    /// Returns `true` if there are no primitives in any layer.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of primitives across all layers.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Iterates over the primitives of one layer, in insertion order.
    pub fn layer(&self, layer: RenderLayer) -> impl Iterator<Item = &Primitive> {
        self.items
            .iter()
            .filter(move |(item_layer, _)| *item_layer == layer)
            .map(|(_, primitive)| primitive)
    }

    /// Returns the primitives grouped per layer, bottom to top.
    ///
    /// Empty layers are skipped. Within a layer the insertion order is kept.
    pub fn in_render_order(&self) -> Vec<(RenderLayer, Vec<&Primitive>)> {
        let mut sorted: Vec<&(RenderLayer, Primitive)> = self.items.iter().collect();
        // Stable sort keeps insertion order inside a layer
        sorted.sort_by_key(|(layer, _)| *layer);

        let mut groups: Vec<(RenderLayer, Vec<&Primitive>)> = Vec::new();
        for (layer, primitive) in sorted {
            match groups.last_mut() {
                Some((current, group)) if current == layer => group.push(primitive),
                _ => groups.push((*layer, vec![primitive])),
            }
        }
        groups
    }

    /// Iterates over every `(layer, primitive)` pair in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (RenderLayer, &Primitive)> {
        self.items.iter().map(|(layer, primitive)| (*layer, primitive))
    }
}

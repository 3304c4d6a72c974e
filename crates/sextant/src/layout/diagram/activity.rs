//! Activity flow layout engine
//!
//! Nodes are stacked in a single column in declaration order; edges run
//! vertically through the column's centre from the bottom of the source box
//! to the top of the target box.

use log::debug;

use sextant_core::{
    color::Theme,
    draw::{
        Arrowhead, Fill, FontWeight, Label, LayeredPrimitives, Primitive, RenderLayer,
        StrokeDefinition,
    },
    geometry::{Bounds, Point, Size},
};

use crate::{config::ActivityConfig, layout::diagram::DiagramEngine, model::diagram::ActivityDiagram};

pub struct Engine<'a> {
    origin: Point,
    row_spacing: f32,
    box_size: Size,
    corner_radius: f32,
    theme: &'a Theme,
}

impl<'a> Engine<'a> {
    pub fn new(config: &ActivityConfig, theme: &'a Theme) -> Self {
        Self {
            origin: config.origin(),
            row_spacing: config.row_spacing(),
            box_size: config.box_size(),
            corner_radius: config.corner_radius(),
            theme,
        }
    }

    fn row_top(&self, index: usize) -> f32 {
        self.origin.y() + index as f32 * self.row_spacing
    }
}

impl DiagramEngine for Engine<'_> {
    type Diagram = ActivityDiagram;

    fn calculate(&self, diagram: &ActivityDiagram, _viewport: Size) -> LayeredPrimitives {
        let mut output = LayeredPrimitives::new();
        debug!(nodes = diagram.nodes().len(), edges = diagram.edges().len(); "Placing activity nodes");

        for (index, node) in diagram.nodes().iter().enumerate() {
            let top_left = self.origin.with_y(self.row_top(index));
            output.add_to_layer(
                RenderLayer::Content,
                Primitive::rect(
                    Bounds::new_from_top_left(top_left, self.box_size),
                    self.corner_radius,
                    Fill::Solid(self.theme.surface),
                    Some(StrokeDefinition::solid(self.theme.accent, 1.0)),
                ),
            );
            output.add_to_layer(
                RenderLayer::Text,
                Primitive::Label(
                    Label::new(
                        top_left.add_point(Point::new(12.0, 26.0)),
                        node.display_label(),
                    )
                    .with_weight(FontWeight::SemiBold),
                ),
            );
        }

        let x = self.origin.x() + self.box_size.width() / 2.0;
        for edge in diagram.edges() {
            let endpoints = edge
                .from()
                .and_then(|from| diagram.position_of(from))
                .zip(edge.to().and_then(|to| diagram.position_of(to)));
            let Some((from, to)) = endpoints else {
                debug!(from:? = edge.from(), to:? = edge.to(); "Skipping unresolved activity edge");
                continue;
            };

            output.add_to_layer(
                RenderLayer::Connector,
                Primitive::line(
                    Point::new(x, self.row_top(from) + self.box_size.height()),
                    Point::new(x, self.row_top(to)),
                    StrokeDefinition::solid(self.theme.guide, 1.0),
                    Arrowhead::End,
                ),
            );
        }

        output
    }
}

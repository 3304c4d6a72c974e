//! Use-case layout engine
//!
//! Actors form a left column, use cases a centre column. Both columns use the
//! same row spacing and are independent of each other's length.

use log::debug;

use sextant_core::{
    color::Theme,
    draw::{Fill, Label, LayeredPrimitives, Primitive, RenderLayer, StrokeDefinition, TextAnchor},
    geometry::{Circle, Point, Size},
};

use crate::{config::UseCaseConfig, layout::diagram::DiagramEngine, model::diagram::UseCaseDiagram};

const ACTOR_LABEL_DROP: f32 = 36.0;
const USE_CASE_LABEL_DROP: f32 = 4.0;

pub struct Engine<'a> {
    padding: f32,
    row_spacing: f32,
    actor_radius: f32,
    ellipse_radii: (f32, f32),
    theme: &'a Theme,
}

impl<'a> Engine<'a> {
    pub fn new(config: &UseCaseConfig, theme: &'a Theme) -> Self {
        Self {
            padding: config.padding(),
            row_spacing: config.row_spacing(),
            actor_radius: config.actor_radius(),
            ellipse_radii: config.ellipse_radii(),
            theme,
        }
    }

    fn row_y(&self, index: usize) -> f32 {
        self.padding + index as f32 * self.row_spacing
    }
}

impl DiagramEngine for Engine<'_> {
    type Diagram = UseCaseDiagram;

    fn calculate(&self, diagram: &UseCaseDiagram, viewport: Size) -> LayeredPrimitives {
        let mut output = LayeredPrimitives::new();
        debug!(actors = diagram.actors().len(), use_cases = diagram.use_cases().len(); "Placing use-case columns");

        for (index, actor) in diagram.actors().iter().enumerate() {
            let center = Point::new(self.padding, self.row_y(index));
            output.add_to_layer(
                RenderLayer::Content,
                Primitive::circle(
                    Circle::new(center, self.actor_radius),
                    Fill::Solid(self.theme.actor_fill),
                    None,
                ),
            );
            output.add_to_layer(
                RenderLayer::Text,
                Primitive::Label(
                    Label::new(center.with_y(center.y() + ACTOR_LABEL_DROP), actor.as_str())
                        .with_anchor(TextAnchor::Middle),
                ),
            );
        }

        let (radius_x, radius_y) = self.ellipse_radii;
        for (index, use_case) in diagram.use_cases().iter().enumerate() {
            let center = Point::new(viewport.width() / 2.0, self.row_y(index));
            output.add_to_layer(
                RenderLayer::Content,
                Primitive::ellipse(
                    center,
                    radius_x,
                    radius_y,
                    Fill::Solid(self.theme.surface),
                    Some(StrokeDefinition::solid(self.theme.accent, 1.0)),
                ),
            );
            output.add_to_layer(
                RenderLayer::Text,
                Primitive::Label(
                    Label::new(center.with_y(center.y() + USE_CASE_LABEL_DROP), use_case.as_str())
                        .with_anchor(TextAnchor::Middle),
                ),
            );
        }

        output
    }
}

//! Sequence lifeline layout engine
//!
//! Lifelines share the horizontal band `[padding, width - padding]` equally;
//! each one is drawn at the middle of its slot as a dashed guide under its
//! name. Messages become horizontal arrows, one row per message in sorted
//! order.

use indexmap::IndexMap;
use log::{debug, trace};

use sextant_core::{
    color::Theme,
    draw::{
        Arrowhead, FontWeight, Label, LayeredPrimitives, Primitive, RenderLayer,
        StrokeDefinition, TextAnchor,
    },
    geometry::{Point, Size},
};

use crate::{config::SequenceConfig, layout::diagram::DiagramEngine, model::diagram::SequenceDiagram};

const NAME_Y: f32 = 24.0;
const GUIDE_TOP: f32 = 36.0;
const GUIDE_BOTTOM_INSET: f32 = 20.0;
const MESSAGE_LABEL_RISE: f32 = 6.0;
const MESSAGE_FONT_SIZE: u16 = 11;

pub struct Engine<'a> {
    padding: f32,
    message_offset: f32,
    row_height: f32,
    theme: &'a Theme,
}

impl<'a> Engine<'a> {
    pub fn new(config: &SequenceConfig, theme: &'a Theme) -> Self {
        Self {
            padding: config.padding(),
            message_offset: config.message_offset(),
            row_height: config.row_height(),
            theme,
        }
    }

    /// Horizontal centre of every lifeline, keyed by name
    fn lifeline_positions<'d>(&self, lifelines: &'d [String], width: f32) -> IndexMap<&'d str, f32> {
        if lifelines.is_empty() {
            return IndexMap::new();
        }
        let spacing = (width - self.padding * 2.0) / lifelines.len() as f32;
        lifelines
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let x = self.padding + index as f32 * spacing + spacing / 2.0;
                (name.as_str(), x)
            })
            .collect()
    }
}

impl DiagramEngine for Engine<'_> {
    type Diagram = SequenceDiagram;

    fn calculate(&self, diagram: &SequenceDiagram, viewport: Size) -> LayeredPrimitives {
        let mut output = LayeredPrimitives::new();
        let positions = self.lifeline_positions(diagram.lifelines(), viewport.width());
        debug!(lifelines = positions.len(), messages = diagram.messages().len(); "Placing lifelines");

        for (name, &x) in &positions {
            output.add_to_layer(
                RenderLayer::Text,
                Primitive::Label(
                    Label::new(Point::new(x, NAME_Y), *name)
                        .with_anchor(TextAnchor::Middle)
                        .with_weight(FontWeight::SemiBold),
                ),
            );
            output.add_to_layer(
                RenderLayer::Guide,
                Primitive::line(
                    Point::new(x, GUIDE_TOP),
                    Point::new(x, viewport.height() - GUIDE_BOTTOM_INSET),
                    StrokeDefinition::dashed(self.theme.guide, 1.0),
                    Arrowhead::None,
                ),
            );
        }

        // Skipped messages keep their row so the remaining ones stay aligned
        // with their sorted position.
        for (row, message) in diagram.messages_in_order().into_iter().enumerate() {
            let endpoints = message
                .from()
                .and_then(|from| positions.get(from))
                .zip(message.to().and_then(|to| positions.get(to)));
            let Some((&x1, &x2)) = endpoints else {
                debug!(from:? = message.from(), to:? = message.to(), row; "Skipping unresolved message");
                continue;
            };

            let y = self.message_offset + row as f32 * self.row_height;
            trace!(row, x1, x2, y; "Message arrow");

            output.add_to_layer(
                RenderLayer::Connector,
                Primitive::line(
                    Point::new(x1, y),
                    Point::new(x2, y),
                    StrokeDefinition::solid(self.theme.accent, 1.0),
                    Arrowhead::End,
                ),
            );
            output.add_to_layer(
                RenderLayer::Text,
                Primitive::Label(
                    Label::new(
                        Point::new((x1 + x2) / 2.0, y - MESSAGE_LABEL_RISE),
                        message.label().unwrap_or("message"),
                    )
                    .with_anchor(TextAnchor::Middle)
                    .with_font_size(MESSAGE_FONT_SIZE),
                ),
            );
        }

        output
    }
}

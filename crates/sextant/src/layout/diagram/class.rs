//! Class grid layout engine
//!
//! Boxes are placed row-major on a fixed grid. The number of columns is the
//! number of `box + gap` cells that fit the viewport width, at least one.

use std::collections::HashMap;

use log::{debug, trace};

use sextant_core::{
    color::Theme,
    draw::{
        Arrowhead, Fill, FontWeight, Label, LayeredPrimitives, Primitive, RenderLayer,
        StrokeDefinition,
    },
    geometry::{Bounds, Point, Size},
};

use crate::{
    config::ClassConfig,
    layout::diagram::DiagramEngine,
    model::diagram::{ClassBox, ClassDiagram},
};

const MEMBER_FONT_SIZE: u16 = 12;
const MEMBERS_SHOWN: usize = 2;

/// Returns the `(column, row)` grid cell of the box at `index`.
///
/// # Examples
///
/// ```
/// # use sextant::layout::diagram::grid_cell;
/// assert_eq!(grid_cell(4, 3), (1, 1));
/// assert_eq!(grid_cell(2, 0), (0, 2));
/// ```
pub fn grid_cell(index: usize, columns: usize) -> (usize, usize) {
    let columns = columns.max(1);
    (index % columns, index / columns)
}

pub struct Engine<'a> {
    box_size: Size,
    padding: f32,
    corner_radius: f32,
    theme: &'a Theme,
}

impl<'a> Engine<'a> {
    pub fn new(config: &ClassConfig, theme: &'a Theme) -> Self {
        Self {
            box_size: config.box_size(),
            padding: config.padding(),
            corner_radius: config.corner_radius(),
            theme,
        }
    }

    /// Number of columns that fit `width`
    pub fn columns(&self, width: f32) -> usize {
        let cell = self.box_size.width() + self.padding;
        ((width / cell).floor() as usize).max(1)
    }

    /// Bounds of the box at `index`
    fn box_bounds(&self, index: usize, columns: usize) -> Bounds {
        let (column, row) = grid_cell(index, columns);
        let top_left = Point::new(
            self.padding + column as f32 * (self.box_size.width() + self.padding),
            self.padding + row as f32 * (self.box_size.height() + self.padding),
        );
        Bounds::new_from_top_left(top_left, self.box_size)
    }

    fn add_class_box(&self, output: &mut LayeredPrimitives, class: &ClassBox, bounds: Bounds) {
        let origin = bounds.min_point();

        output.add_to_layer(
            RenderLayer::Content,
            Primitive::rect(
                bounds,
                self.corner_radius,
                Fill::Solid(self.theme.surface),
                Some(StrokeDefinition::solid(self.theme.accent, 1.5)),
            ),
        );

        output.add_to_layer(
            RenderLayer::Text,
            Primitive::Label(
                Label::new(
                    origin.add_point(Point::new(12.0, 24.0)),
                    class.name().unwrap_or("Class"),
                )
                .with_weight(FontWeight::SemiBold),
            ),
        );

        let attributes = summarize_members(class.attributes(), "no attributes");
        let methods = summarize_members(class.methods(), "no methods");
        for (offset, text) in [(48.0, attributes), (66.0, methods)] {
            output.add_to_layer(
                RenderLayer::Text,
                Primitive::Label(
                    Label::new(origin.add_point(Point::new(12.0, offset)), text)
                        .with_font_size(MEMBER_FONT_SIZE)
                        .with_color(self.theme.muted_text),
                ),
            );
        }
    }
}

impl DiagramEngine for Engine<'_> {
    type Diagram = ClassDiagram;

    fn calculate(&self, diagram: &ClassDiagram, viewport: Size) -> LayeredPrimitives {
        let mut output = LayeredPrimitives::new();
        let columns = self.columns(viewport.width());
        debug!(classes = diagram.classes().len(), columns; "Placing class boxes");

        // First declaration wins for relationship lookups
        let mut boxes_by_name: HashMap<&str, Bounds> = HashMap::new();
        for (index, class) in diagram.classes().iter().enumerate() {
            let bounds = self.box_bounds(index, columns);
            trace!(index, name:? = class.name(), x = bounds.min_x(), y = bounds.min_y(); "Class box");
            if let Some(name) = class.name() {
                boxes_by_name.entry(name).or_insert(bounds);
            }
            self.add_class_box(&mut output, class, bounds);
        }

        for relationship in diagram.relationships() {
            let endpoints = relationship
                .from()
                .and_then(|from| boxes_by_name.get(from))
                .zip(relationship.to().and_then(|to| boxes_by_name.get(to)));
            let Some((source, target)) = endpoints else {
                debug!(from:? = relationship.from(), to:? = relationship.to(); "Skipping unresolved relationship");
                continue;
            };

            let start = source.boundary_point_toward(target.center());
            let end = target.boundary_point_toward(source.center());
            output.add_to_layer(
                RenderLayer::Connector,
                Primitive::line(
                    start,
                    end,
                    StrokeDefinition::solid(self.theme.guide, 1.5),
                    Arrowhead::End,
                ),
            );
        }

        output
    }
}

/// Joins the first members with `", "`, or returns the placeholder.
fn summarize_members(members: &[String], placeholder: &str) -> String {
    if members.is_empty() {
        placeholder.to_string()
    } else {
        members
            .iter()
            .take(MEMBERS_SHOWN)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

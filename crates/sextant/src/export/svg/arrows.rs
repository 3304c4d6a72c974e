use indexmap::IndexSet;
use svg::node::element::{Definitions, Marker, Path};

use sextant_core::{
    color::Color,
    draw::{Arrowhead, LayeredPrimitives, Primitive},
};

/// Creates one arrow marker per stroke color that carries an arrowhead
pub fn create_marker_definitions(primitives: &LayeredPrimitives) -> Definitions {
    let colors: IndexSet<Color> = primitives
        .iter()
        .filter_map(|(_, primitive)| match primitive {
            Primitive::Line {
                stroke,
                arrowhead: Arrowhead::End,
                ..
            } => Some(stroke.color()),
            _ => None,
        })
        .collect();

    colors.into_iter().fold(Definitions::new(), |defs, color| {
        let arrow_right = Marker::new()
            .set("id", marker_id(color))
            .set("viewBox", "0 0 10 10")
            .set("refX", 9)
            .set("refY", 5)
            .set("markerWidth", 6)
            .set("markerHeight", 6)
            .set("orient", "auto")
            .add(
                Path::new()
                    .set("d", "M 0 0 L 10 5 L 0 10 z")
                    .set("fill", color.to_string()),
            );
        defs.add(arrow_right)
    })
}

/// The `marker-end` value pointing at the marker of `color`
pub fn marker_reference(color: Color) -> String {
    format!("url(#{})", marker_id(color))
}

fn marker_id(color: Color) -> String {
    format!("arrow-right-{}", color.to_id_safe_string())
}

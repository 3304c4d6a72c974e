use svg::node::element::{self as svg_element, Circle, Ellipse, Line, Rectangle};

use sextant_core::draw::{Arrowhead, Fill, Label, Primitive, StrokeDefinition};

use super::{DEFAULT_FONT_FAMILY, arrows};

/// Converts one primitive into an SVG node
pub fn render_primitive(primitive: &Primitive) -> Box<dyn svg::Node> {
    match primitive {
        Primitive::Rect {
            bounds,
            corner_radius,
            fill,
            stroke,
        } => {
            let rect = Rectangle::new()
                .set("x", bounds.min_x())
                .set("y", bounds.min_y())
                .set("width", bounds.width())
                .set("height", bounds.height())
                .set("rx", *corner_radius);
            apply_stroke(apply_fill(rect, *fill), stroke.as_ref()).into()
        }
        Primitive::Circle {
            circle,
            fill,
            stroke,
        } => {
            let element = Circle::new()
                .set("cx", circle.center().x())
                .set("cy", circle.center().y())
                .set("r", circle.radius());
            apply_stroke(apply_fill(element, *fill), stroke.as_ref()).into()
        }
        Primitive::Ellipse {
            center,
            radius_x,
            radius_y,
            fill,
            stroke,
        } => {
            let element = Ellipse::new()
                .set("cx", center.x())
                .set("cy", center.y())
                .set("rx", *radius_x)
                .set("ry", *radius_y);
            apply_stroke(apply_fill(element, *fill), stroke.as_ref()).into()
        }
        Primitive::Line {
            from,
            to,
            stroke,
            arrowhead,
        } => {
            let mut line = Line::new()
                .set("x1", from.x())
                .set("y1", from.y())
                .set("x2", to.x())
                .set("y2", to.y());
            line = apply_stroke(line, Some(stroke));
            if *arrowhead == Arrowhead::End {
                line = line.set("marker-end", arrows::marker_reference(stroke.color()));
            }
            line.into()
        }
        Primitive::Label(label) => render_label(label),
    }
}

fn render_label(label: &Label) -> Box<dyn svg::Node> {
    let mut text = svg_element::Text::new(label.text())
        .set("x", label.position().x())
        .set("y", label.position().y())
        .set("text-anchor", label.anchor().to_svg_value())
        .set("font-family", DEFAULT_FONT_FAMILY)
        .set("font-size", f32::from(label.font_size()))
        .set("font-weight", f32::from(label.weight().to_css_value()));
    if let Some(color) = label.color() {
        text = text
            .set("fill", color.to_string())
            .set("fill-opacity", color.alpha());
    }
    text.into()
}

fn apply_fill<T: svg::Node>(mut element: T, fill: Fill) -> T {
    match fill.color() {
        Some(color) => {
            element.assign("fill", color.to_string());
            element.assign("fill-opacity", color.alpha());
        }
        None => element.assign("fill", "none"),
    }
    element
}

fn apply_stroke<T: svg::Node>(mut element: T, stroke: Option<&StrokeDefinition>) -> T {
    let Some(stroke) = stroke else {
        return element;
    };
    element.assign("stroke", stroke.color().to_string());
    element.assign("stroke-opacity", stroke.color().alpha());
    element.assign("stroke-width", stroke.width());
    if let Some(dasharray) = stroke.style().dasharray() {
        element.assign("stroke-dasharray", dasharray);
    }
    element
}

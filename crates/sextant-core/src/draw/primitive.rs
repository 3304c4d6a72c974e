//! Primitive shapes emitted by the layout engines.

use crate::{
    color::Color,
    draw::{Label, StrokeDefinition},
    geometry::{Bounds, Circle, Point},
};

/// Interior paint of a closed shape
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Fill {
    /// Unfilled (transparent interior)
    #[default]
    None,
    Solid(Color),
}

impl Fill {
    /// Returns the fill color, if any
    pub fn color(self) -> Option<Color> {
        match self {
            Self::None => None,
            Self::Solid(color) => Some(color),
        }
    }
}

/// Arrow decoration at the end of a line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Arrowhead {
    #[default]
    None,
    /// A filled triangle pointing at the line's end point
    End,
}

/// A single drawable element of a scene.
///
/// # Examples
///
/// ```
/// # use sextant_core::draw::{Fill, Primitive};
/// # use sextant_core::geometry::{Bounds, Point, Size};
/// let rect = Primitive::rect(
///     Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(160.0, 80.0)),
///     12.0,
///     Fill::None,
///     None,
/// );
/// assert!(matches!(rect, Primitive::Rect { .. }));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// Axis-aligned rectangle, optionally with rounded corners
    Rect {
        bounds: Bounds,
        corner_radius: f32,
        fill: Fill,
        stroke: Option<StrokeDefinition>,
    },
    Circle {
        circle: Circle,
        fill: Fill,
        stroke: Option<StrokeDefinition>,
    },
    Ellipse {
        center: Point,
        radius_x: f32,
        radius_y: f32,
        fill: Fill,
        stroke: Option<StrokeDefinition>,
    },
    /// Straight segment from `from` to `to`
    Line {
        from: Point,
        to: Point,
        stroke: StrokeDefinition,
        arrowhead: Arrowhead,
    },
    Label(Label),
}

impl Primitive {
    pub fn rect(
        bounds: Bounds,
        corner_radius: f32,
        fill: Fill,
        stroke: Option<StrokeDefinition>,
    ) -> Self {
        Self::Rect {
            bounds,
            corner_radius,
            fill,
            stroke,
        }
    }

    pub fn circle(circle: Circle, fill: Fill, stroke: Option<StrokeDefinition>) -> Self {
        Self::Circle {
            circle,
            fill,
            stroke,
        }
    }

    pub fn ellipse(
        center: Point,
        radius_x: f32,
        radius_y: f32,
        fill: Fill,
        stroke: Option<StrokeDefinition>,
    ) -> Self {
        Self::Ellipse {
            center,
            radius_x,
            radius_y,
            fill,
            stroke,
        }
    }

    pub fn line(from: Point, to: Point, stroke: StrokeDefinition, arrowhead: Arrowhead) -> Self {
        Self::Line {
            from,
            to,
            stroke,
            arrowhead,
        }
    }

    /// Returns the label if this primitive is one
    pub fn as_label(&self) -> Option<&Label> {
        match self {
            Self::Label(label) => Some(label),
            _ => None,
        }
    }

    /// Axis-aligned bounds covered by this primitive.
    ///
    /// Labels have no measured extent and report a zero-sized box at their
    /// anchor position.
    pub fn bounds(&self) -> Bounds {
        match self {
            Self::Rect { bounds, .. } => *bounds,
            Self::Circle { circle, .. } => circle.bounds(),
            Self::Ellipse {
                center,
                radius_x,
                radius_y,
                ..
            } => Bounds::new_from_center(
                *center,
                crate::geometry::Size::new(radius_x * 2.0, radius_y * 2.0),
            ),
            Self::Line { from, to, .. } => Bounds::new_from_center(*from, Default::default())
                .merge(&Bounds::new_from_center(*to, Default::default())),
            Self::Label(label) => Bounds::new_from_center(label.position(), Default::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::geometry::Size;

    #[test]
    fn test_fill_color() {
        let red = Color::new("red").unwrap();
        assert_eq!(Fill::Solid(red).color(), Some(red));
        assert_eq!(Fill::None.color(), None);
    }

    #[test]
    fn test_line_bounds_span_endpoints() {
        let line = Primitive::line(
            Point::new(10.0, 50.0),
            Point::new(110.0, 20.0),
            StrokeDefinition::default(),
            Arrowhead::End,
        );
        let bounds = line.bounds();
        assert_approx_eq!(f32, bounds.min_x(), 10.0);
        assert_approx_eq!(f32, bounds.max_x(), 110.0);
        assert_approx_eq!(f32, bounds.min_y(), 20.0);
        assert_approx_eq!(f32, bounds.max_y(), 50.0);
    }

    #[test]
    fn test_ellipse_bounds() {
        let ellipse = Primitive::ellipse(Point::new(360.0, 40.0), 90.0, 30.0, Fill::None, None);
        assert_eq!(
            ellipse.bounds(),
            Bounds::new_from_center(Point::new(360.0, 40.0), Size::new(180.0, 60.0))
        );
    }

    #[test]
    fn test_as_label() {
        let label = Primitive::Label(Label::new(Point::new(0.0, 0.0), "A"));
        assert_eq!(label.as_label().map(Label::text), Some("A"));
        assert!(
            Primitive::circle(Circle::new(Point::new(0.0, 0.0), 1.0), Fill::None, None)
                .as_label()
                .is_none()
        );
    }
}

//! Stroke and line-style definitions.
//!
//! - [`StrokeDefinition`]: color, width and pattern of a stroke
//! - [`StrokeStyle`]: solid or dashed line patterns
//!
//! The naming follows SVG/CSS terminology so adapters can map values
//! directly onto `stroke`, `stroke-width` and `stroke-dasharray`.

use crate::color::Color;

/// Defines the visual pattern of a stroke.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum StrokeStyle {
    /// Solid continuous line (default)
    #[default]
    Solid,
    /// Dashed line with equal dash and gap lengths (4 unit dash, 4 unit gap)
    Dashed,
}

impl StrokeStyle {
    /// Returns the dasharray value for this style, or None for solid lines
    pub fn dasharray(&self) -> Option<&'static str> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some("4 4"),
        }
    }
}

/// A stroke definition for rendering lines and borders.
///
/// # Examples
///
/// ```
/// use sextant_core::draw::{StrokeDefinition, StrokeStyle};
/// use sextant_core::color::Color;
///
/// let stroke = StrokeDefinition::solid(Color::new("red").unwrap(), 2.0);
/// assert_eq!(stroke.style(), &StrokeStyle::Solid);
///
/// let guide = StrokeDefinition::dashed(Color::new("gray").unwrap(), 1.0);
/// assert_eq!(guide.style().dasharray(), Some("4 4"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeDefinition {
    color: Color,
    width: f32,
    style: StrokeStyle,
}

impl Default for StrokeDefinition {
    fn default() -> Self {
        Self {
            color: Color::default(),
            width: 1.0,
            style: StrokeStyle::Solid,
        }
    }
}

impl StrokeDefinition {
    /// Creates a new solid stroke with the given color and width.
    pub fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            ..Self::default()
        }
    }

    /// Creates a solid stroke (convenience constructor).
    pub fn solid(color: Color, width: f32) -> Self {
        Self::new(color, width)
    }

    /// Creates a dashed stroke.
    pub fn dashed(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            style: StrokeStyle::Dashed,
        }
    }

    /// Returns the stroke color
    pub fn color(&self) -> Color {
        self.color
    }

    /// Returns the stroke width
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Returns the stroke pattern
    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stroke_style_dasharray() {
        assert_eq!(StrokeStyle::Solid.dasharray(), None);
        assert_eq!(StrokeStyle::Dashed.dasharray(), Some("4 4"));
    }

    #[test]
    fn test_stroke_definition_constructors() {
        let color = Color::new("blue").unwrap();
        let stroke = StrokeDefinition::solid(color, 1.5);
        assert_eq!(stroke.color(), color);
        assert!((stroke.width() - 1.5).abs() < f32::EPSILON);
        assert_eq!(stroke.style(), &StrokeStyle::Solid);

        let dashed = StrokeDefinition::dashed(color, 1.0);
        assert_eq!(dashed.style(), &StrokeStyle::Dashed);
    }
}

//! Text labels.
//!
//! A [`Label`] is positioned text with an anchor, a font size, a weight and
//! an optional color. Sextant does not measure text; labels are placed by the
//! fixed offsets each layout engine uses.

use crate::{color::Color, geometry::Point};

/// Horizontal alignment of a label relative to its position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextAnchor {
    /// Text starts at the position (default)
    #[default]
    Start,
    /// Text is centered on the position
    Middle,
    /// Text ends at the position
    End,
}

impl TextAnchor {
    /// Returns the SVG `text-anchor` value
    pub fn to_svg_value(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

/// Font weight of a label
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FontWeight {
    #[default]
    Normal,
    /// Semi-bold, used for titles
    SemiBold,
}

impl FontWeight {
    /// Returns the numeric CSS font weight
    pub fn to_css_value(self) -> u16 {
        match self {
            Self::Normal => 400,
            Self::SemiBold => 600,
        }
    }
}

/// Positioned text.
///
/// # Examples
///
/// ```
/// # use sextant_core::draw::{FontWeight, Label, TextAnchor};
/// # use sextant_core::geometry::Point;
/// let label = Label::new(Point::new(10.0, 20.0), "Order")
///     .with_anchor(TextAnchor::Middle)
///     .with_weight(FontWeight::SemiBold);
///
/// assert_eq!(label.text(), "Order");
/// assert_eq!(label.font_size(), Label::DEFAULT_FONT_SIZE);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    position: Point,
    text: String,
    anchor: TextAnchor,
    font_size: u16,
    weight: FontWeight,
    color: Option<Color>,
}

impl Label {
    /// Font size used when none is set explicitly
    pub const DEFAULT_FONT_SIZE: u16 = 14;

    /// Creates a new start-anchored label with the default font size
    pub fn new(position: Point, text: impl Into<String>) -> Self {
        Self {
            position,
            text: text.into(),
            anchor: TextAnchor::Start,
            font_size: Self::DEFAULT_FONT_SIZE,
            weight: FontWeight::Normal,
            color: None,
        }
    }

    pub fn with_anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn with_font_size(mut self, font_size: u16) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn with_weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Returns the anchor position of the label
    pub fn position(&self) -> Point {
        self.position
    }

    /// Returns the label content
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn anchor(&self) -> TextAnchor {
        self.anchor
    }

    pub fn font_size(&self) -> u16 {
        self.font_size
    }

    pub fn weight(&self) -> FontWeight {
        self.weight
    }

    /// Returns the text color, `None` means the surface default
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// Shortens `text` to `keep` characters followed by an ellipsis when it is
    /// longer than `max` characters.
    ///
    /// Works on characters, not bytes, so multi-byte names are cut safely.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sextant_core::draw::Label;
    /// assert_eq!(Label::truncate("component.tsx", 10, 9), "component…");
    /// assert_eq!(Label::truncate("main.rs", 10, 9), "main.rs");
    /// ```
    pub fn truncate(text: &str, max: usize, keep: usize) -> String {
        if text.chars().count() > max {
            let mut short: String = text.chars().take(keep).collect();
            short.push('…');
            short
        } else {
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_defaults() {
        let label = Label::new(Point::new(1.0, 2.0), "x");
        assert_eq!(label.anchor(), TextAnchor::Start);
        assert_eq!(label.weight(), FontWeight::Normal);
        assert_eq!(label.color(), None);
        assert_eq!(label.position(), Point::new(1.0, 2.0));
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(Label::truncate("ünïcødé_fïlé.rs", 10, 9), "ünïcødé_f…");
        assert_eq!(Label::truncate("exactly10!", 10, 9), "exactly10!");
        assert_eq!(Label::truncate("abcdef", 6, 6), "abcdef");
        assert_eq!(Label::truncate("abcdefg", 6, 6), "abcdef…");
    }

    #[test]
    fn test_anchor_and_weight_values() {
        assert_eq!(TextAnchor::Middle.to_svg_value(), "middle");
        assert_eq!(FontWeight::SemiBold.to_css_value(), 600);
    }
}

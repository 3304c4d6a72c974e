//! Color handling for Sextant scenes
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate, plus the [`Theme`] palette the layout engines paint
//! with.

use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::DynamicColor;

/// Wrapper around the `DynamicColor` type from the color crate
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl Color {
    /// Create a new `Color` from a string
    /// This will parse CSS color strings such as "#ff0000", "rgb(255, 0, 0)", "red", etc.
    ///
    /// # Examples
    ///
    /// ```
    /// use sextant_core::color::Color;
    ///
    /// let red = Color::new("#ff0000").unwrap();
    /// let blue = Color::new("blue").unwrap();
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Returns a sanitized, ID-safe string representation of this color.
    ///
    /// The result contains only alphanumeric characters and underscores and
    /// starts with a letter, so it can be embedded in marker ids.
    ///
    /// # Examples
    ///
    /// ```
    /// use sextant_core::color::Color;
    ///
    /// let id_str = Color::new("#ff8000").unwrap().to_id_safe_string();
    /// assert!(id_str.chars().all(|c| c.is_alphanumeric() || c == '_'));
    /// ```
    pub fn to_id_safe_string(self) -> String {
        let color_str = self.to_string();
        let mut sanitized: String = color_str
            .replace('#', "hex")
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect();

        if !sanitized.chars().next().is_some_and(|c| c.is_alphabetic()) {
            sanitized = format!("c_{sanitized}");
        }

        sanitized
    }

    /// Creates a new color with the specified alpha (transparency) value.
    pub fn with_alpha(self, alpha: f32) -> Self {
        Color {
            color: self.color.with_alpha(alpha),
        }
    }

    /// Returns the alpha (transparency) component of this color.
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("'black' is a valid CSS color")
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.color)
    }
}

/// Palette shared by all layout engines.
///
/// The default values are the workspace's slate/blue look. Individual colors
/// can be overridden through the style configuration of the library crate.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Page background, `None` leaves the surface transparent
    pub background: Option<Color>,
    /// Strokes of diagram boxes, arrows and graph nodes
    pub accent: Color,
    /// Fill of diagram boxes
    pub surface: Color,
    /// Lifelines, connectors and other guide strokes
    pub guide: Color,
    /// Secondary text (attribute and method lines)
    pub muted_text: Color,
    /// Primary text
    pub text: Color,
    /// Fill of use-case actors
    pub actor_fill: Color,
    /// Fill of folder circles in the pack view
    pub folder_fill: Color,
    /// Stroke of the active node in the pack view
    pub highlight: Color,
    /// Text drawn on top of accent-filled shapes
    pub on_accent: Color,
}

impl Default for Theme {
    fn default() -> Self {
        let parse = |value: &str| Color::new(value).expect("theme defaults are valid CSS colors");
        Self {
            background: None,
            accent: parse("#2563eb"),
            surface: parse("#f8fafc"),
            guide: parse("#94a3b8"),
            muted_text: parse("#475569"),
            text: parse("#0f172a"),
            actor_fill: parse("#e2e8f0"),
            folder_fill: parse("rgba(148, 163, 184, 0.2)"),
            highlight: parse("#f97316"),
            on_accent: parse("#ffffff"),
        }
    }
}

impl Theme {
    /// Fill color for a file leaf, chosen by its extension.
    ///
    /// # Examples
    ///
    /// ```
    /// use sextant_core::color::{Color, Theme};
    ///
    /// let theme = Theme::default();
    /// assert_eq!(theme.extension_color("lib.rs"), theme.extension_color("README"));
    /// assert_eq!(theme.extension_color("app.JS"), Color::new("#84cc16").unwrap());
    /// ```
    pub fn extension_color(&self, file_name: &str) -> Color {
        let hex = file_extension(file_name)
            .and_then(|ext| {
                EXTENSION_COLORS
                    .iter()
                    .find(|(known, _)| known.eq_ignore_ascii_case(ext))
            })
            .map_or(DEFAULT_EXTENSION_COLOR, |(_, hex)| *hex);
        Color::new(hex).unwrap_or(self.guide)
    }

    /// The extension legend as `(extension, color)` pairs, in display order.
    pub fn extension_legend(&self) -> impl Iterator<Item = (&'static str, Color)> + '_ {
        EXTENSION_COLORS
            .iter()
            .map(|(ext, hex)| (*ext, Color::new(hex).unwrap_or(self.guide)))
    }
}

const EXTENSION_COLORS: &[(&str, &str)] = &[
    ("js", "#84cc16"),
    ("jsx", "#22c55e"),
    ("ts", "#38bdf8"),
    ("tsx", "#0ea5e9"),
    ("json", "#a855f7"),
    ("css", "#6366f1"),
    ("md", "#f59e0b"),
];

const DEFAULT_EXTENSION_COLOR: &str = "#94a3b8";

fn file_extension(file_name: &str) -> Option<&str> {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_new() {
        assert!(Color::new("#ff0000").is_ok());
        assert!(Color::new("not-a-color").is_err());
    }

    #[test]
    fn test_color_with_alpha() {
        let red = Color::new("red").unwrap();
        let translucent = red.with_alpha(0.5);
        assert!((translucent.alpha() - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_id_safe_string_starts_with_letter() {
        let id = Color::new("rgba(148, 163, 184, 0.2)").unwrap().to_id_safe_string();
        assert!(id.chars().next().is_some_and(|c| c.is_alphabetic()));
        assert!(id.chars().all(|c| c.is_alphanumeric() || c == '_'));
    }

    #[test]
    fn test_theme_default_is_constructible() {
        let theme = Theme::default();
        assert!(theme.background.is_none());
        assert!(theme.folder_fill.alpha() < 1.0);
    }

    #[test]
    fn test_extension_color_lookup() {
        let theme = Theme::default();
        assert_eq!(theme.extension_color("main.ts"), Color::new("#38bdf8").unwrap());
        assert_eq!(theme.extension_color("a.tar.md"), Color::new("#f59e0b").unwrap());
        assert_eq!(theme.extension_color("Makefile"), Color::new("#94a3b8").unwrap());
        assert_eq!(theme.extension_color("trailing."), Color::new("#94a3b8").unwrap());
    }

    #[test]
    fn test_extension_legend_order() {
        let theme = Theme::default();
        let names: Vec<_> = theme.extension_legend().map(|(ext, _)| ext).collect();
        assert_eq!(names, ["js", "jsx", "ts", "tsx", "json", "css", "md"]);
    }
}

//! Configuration types for Sextant layouts.
//!
//! This module provides configuration structures that control how scenes are
//! laid out and styled. All types implement [`serde::Deserialize`] for
//! flexible loading from external sources; every field has a default, so an
//! empty document is a complete configuration.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and style settings.
//! - [`LayoutConfig`] - One section per layout engine plus the navigation controller.
//! - [`StyleConfig`] - Color overrides validated into a [`Theme`].
//!
//! # Example
//!
//! ```
//! # use sextant::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().pack().padding(), 4.0);
//! assert!(config.style().theme().is_ok());
//! ```

use std::time::Duration;

use serde::Deserialize;

use sextant_core::{
    color::{Color, Theme},
    geometry::Size,
};

/// Top-level application configuration combining layout and style settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified layout and style configurations.
    pub fn new(layout: LayoutConfig, style: StyleConfig) -> Self {
        Self { layout, style }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Lays every engine out into `viewport` instead of its own default.
    pub fn with_viewport(mut self, viewport: Size) -> Self {
        let layout = &mut self.layout;
        layout.diagram.viewport = viewport;
        layout.force = layout.force.with_viewport(viewport);
        layout.pack = layout.pack.with_viewport(viewport);
        self
    }
}

/// Per-engine layout settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LayoutConfig {
    #[serde(default)]
    diagram: DiagramConfig,

    #[serde(default)]
    force: ForceConfig,

    #[serde(default)]
    pack: PackConfig,

    #[serde(default)]
    navigation: NavigationConfig,
}

impl LayoutConfig {
    pub fn new(
        diagram: DiagramConfig,
        force: ForceConfig,
        pack: PackConfig,
        navigation: NavigationConfig,
    ) -> Self {
        Self {
            diagram,
            force,
            pack,
            navigation,
        }
    }

    /// Returns the UML diagram layout settings.
    pub fn diagram(&self) -> &DiagramConfig {
        &self.diagram
    }

    /// Returns the force simulation settings.
    pub fn force(&self) -> &ForceConfig {
        &self.force
    }

    /// Returns the circle packing settings.
    pub fn pack(&self) -> &PackConfig {
        &self.pack
    }

    /// Returns the navigation controller settings.
    pub fn navigation(&self) -> &NavigationConfig {
        &self.navigation
    }
}

/// Settings for the UML diagram engines.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    viewport: Size,
    class: ClassConfig,
    sequence: SequenceConfig,
    activity: ActivityConfig,
    usecase: UseCaseConfig,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            viewport: Size::new(720.0, 320.0),
            class: ClassConfig::default(),
            sequence: SequenceConfig::default(),
            activity: ActivityConfig::default(),
            usecase: UseCaseConfig::default(),
        }
    }
}

impl DiagramConfig {
    /// Returns the default viewport diagrams are laid out into.
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn class(&self) -> &ClassConfig {
        &self.class
    }

    pub fn sequence(&self) -> &SequenceConfig {
        &self.sequence
    }

    pub fn activity(&self) -> &ActivityConfig {
        &self.activity
    }

    pub fn usecase(&self) -> &UseCaseConfig {
        &self.usecase
    }
}

/// Class grid geometry.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ClassConfig {
    box_width: f32,
    box_height: f32,
    padding: f32,
    corner_radius: f32,
}

impl Default for ClassConfig {
    fn default() -> Self {
        Self {
            box_width: 160.0,
            box_height: 80.0,
            padding: 24.0,
            corner_radius: 12.0,
        }
    }
}

impl ClassConfig {
    pub fn box_size(&self) -> Size {
        Size::new(self.box_width, self.box_height)
    }

    /// Gap between boxes and around the grid
    pub fn padding(&self) -> f32 {
        self.padding
    }

    pub fn corner_radius(&self) -> f32 {
        self.corner_radius
    }
}

/// Sequence lifeline geometry.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct SequenceConfig {
    padding: f32,
    message_offset: f32,
    row_height: f32,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            padding: 40.0,
            message_offset: 60.0,
            row_height: 28.0,
        }
    }
}

impl SequenceConfig {
    /// Horizontal inset of the lifeline band
    pub fn padding(&self) -> f32 {
        self.padding
    }

    /// Vertical position of the first message row
    pub fn message_offset(&self) -> f32 {
        self.message_offset
    }

    pub fn row_height(&self) -> f32 {
        self.row_height
    }
}

/// Activity flow geometry.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ActivityConfig {
    origin_x: f32,
    origin_y: f32,
    row_spacing: f32,
    box_width: f32,
    box_height: f32,
    corner_radius: f32,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            origin_x: 60.0,
            origin_y: 40.0,
            row_spacing: 70.0,
            box_width: 240.0,
            box_height: 44.0,
            corner_radius: 10.0,
        }
    }
}

impl ActivityConfig {
    /// Top-left corner of the first node
    pub fn origin(&self) -> sextant_core::geometry::Point {
        sextant_core::geometry::Point::new(self.origin_x, self.origin_y)
    }

    pub fn row_spacing(&self) -> f32 {
        self.row_spacing
    }

    pub fn box_size(&self) -> Size {
        Size::new(self.box_width, self.box_height)
    }

    pub fn corner_radius(&self) -> f32 {
        self.corner_radius
    }
}

/// Use-case column geometry.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct UseCaseConfig {
    padding: f32,
    row_spacing: f32,
    actor_radius: f32,
    ellipse_radius_x: f32,
    ellipse_radius_y: f32,
}

impl Default for UseCaseConfig {
    fn default() -> Self {
        Self {
            padding: 40.0,
            row_spacing: 90.0,
            actor_radius: 20.0,
            ellipse_radius_x: 90.0,
            ellipse_radius_y: 30.0,
        }
    }
}

impl UseCaseConfig {
    pub fn padding(&self) -> f32 {
        self.padding
    }

    pub fn row_spacing(&self) -> f32 {
        self.row_spacing
    }

    pub fn actor_radius(&self) -> f32 {
        self.actor_radius
    }

    /// Returns `(rx, ry)` of the use-case ellipses
    pub fn ellipse_radii(&self) -> (f32, f32) {
        (self.ellipse_radius_x, self.ellipse_radius_y)
    }
}

/// Force simulation parameters.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ForceConfig {
    viewport: Size,
    link_distance: f32,
    charge_strength: f32,
    alpha_min: f32,
    velocity_decay: f32,
    seed: u64,
    node_radius: f32,
    label_chars: usize,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            viewport: Size::new(720.0, 280.0),
            link_distance: 100.0,
            charge_strength: -220.0,
            alpha_min: 0.001,
            velocity_decay: 0.4,
            seed: 0x5e47_a47d,
            node_radius: 18.0,
            label_chars: 6,
        }
    }
}

impl ForceConfig {
    /// Returns the default viewport graphs are simulated in.
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Rest length of the link springs
    pub fn link_distance(&self) -> f32 {
        self.link_distance
    }

    /// Many-body strength, negative values repel
    pub fn charge_strength(&self) -> f32 {
        self.charge_strength
    }

    /// The simulation stops once alpha falls below this value
    pub fn alpha_min(&self) -> f32 {
        self.alpha_min
    }

    /// Decay per tick applied to alpha so that it reaches `alpha_min` in 300 ticks
    pub fn alpha_decay(&self) -> f32 {
        1.0 - self.alpha_min.powf(1.0 / 300.0)
    }

    /// Fraction of velocity lost per tick
    pub fn velocity_decay(&self) -> f32 {
        self.velocity_decay
    }

    /// Seed for the jiggle applied to coincident nodes
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn node_radius(&self) -> f32 {
        self.node_radius
    }

    /// Number of label characters shown inside a node
    pub fn label_chars(&self) -> usize {
        self.label_chars
    }

    /// Returns a copy with a different viewport
    pub fn with_viewport(mut self, viewport: Size) -> Self {
        self.viewport = viewport;
        self
    }
}

/// Circle packing parameters.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct PackConfig {
    viewport: Size,
    padding: f32,
    margin: f32,
    label_min_radius: f32,
    label_max_chars: usize,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            viewport: Size::new(720.0, 420.0),
            padding: 4.0,
            margin: 4.0,
            label_min_radius: 18.0,
            label_max_chars: 10,
        }
    }
}

impl PackConfig {
    /// Returns the default viewport repository trees are packed into.
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Gap between sibling circles and between a parent and its children
    pub fn padding(&self) -> f32 {
        self.padding
    }

    /// Gap between the root circle and the viewport edge
    pub fn margin(&self) -> f32 {
        self.margin
    }

    /// Labels are drawn only on circles larger than this radius
    pub fn label_min_radius(&self) -> f32 {
        self.label_min_radius
    }

    /// Longer labels are truncated to one character less plus an ellipsis
    pub fn label_max_chars(&self) -> usize {
        self.label_max_chars
    }

    pub fn with_viewport(mut self, viewport: Size) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }
}

/// Navigation controller timings and zoom limits.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    play_interval_ms: u64,
    transition_ms: u64,
    min_scale: f32,
    max_scale: f32,
    focus_min_scale: f32,
    focus_max_scale: f32,
    focus_fit: f32,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            play_interval_ms: 220,
            transition_ms: 650,
            min_scale: 0.7,
            max_scale: 2.5,
            focus_min_scale: 0.9,
            focus_max_scale: 2.2,
            focus_fit: 2.2,
        }
    }
}

impl NavigationConfig {
    /// Period of the autoplay traversal
    pub fn play_interval(&self) -> Duration {
        Duration::from_millis(self.play_interval_ms)
    }

    /// Length of the zoom animation started by a selection
    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }

    /// Scale range allowed for direct pan and zoom
    pub fn scale_extent(&self) -> (f32, f32) {
        (self.min_scale, self.max_scale)
    }

    /// Scale range used when zooming onto a selected node
    pub fn focus_scale_extent(&self) -> (f32, f32) {
        (self.focus_min_scale, self.focus_max_scale)
    }

    /// Multiple of a node's radius that must fit the viewport width on selection
    pub fn focus_fit(&self) -> f32 {
        self.focus_fit
    }

    /// Checks that both scale ranges are positive and ordered and that the
    /// focus fit is positive.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first offending setting.
    pub fn validate(&self) -> Result<(), String> {
        for (min_name, min, max_name, max) in [
            ("min_scale", self.min_scale, "max_scale", self.max_scale),
            (
                "focus_min_scale",
                self.focus_min_scale,
                "focus_max_scale",
                self.focus_max_scale,
            ),
        ] {
            if !(min.is_finite() && max.is_finite() && min > 0.0) {
                return Err(format!(
                    "Invalid navigation {min_name}/{max_name} in config: \
                     scales must be finite and positive, got {min} and {max}"
                ));
            }
            if min > max {
                return Err(format!(
                    "Invalid navigation {min_name}/{max_name} in config: \
                     {min_name} {min} exceeds {max_name} {max}"
                ));
            }
        }
        if !(self.focus_fit.is_finite() && self.focus_fit > 0.0) {
            return Err(format!(
                "Invalid navigation focus_fit in config: expected a positive number, got {}",
                self.focus_fit
            ));
        }
        Ok(())
    }
}

/// Visual styling configuration.
///
/// Every field is an optional CSS color string; unset fields keep the
/// [`Theme`] default.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    #[serde(default)]
    background_color: Option<String>,
    #[serde(default)]
    accent_color: Option<String>,
    #[serde(default)]
    surface_color: Option<String>,
    #[serde(default)]
    guide_color: Option<String>,
    #[serde(default)]
    text_color: Option<String>,
    #[serde(default)]
    muted_text_color: Option<String>,
    #[serde(default)]
    folder_color: Option<String>,
    #[serde(default)]
    highlight_color: Option<String>,
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        parse_color("background_color", self.background_color.as_deref())
    }

    /// Builds the [`Theme`] with every configured override applied.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first field whose value is not a valid color.
    pub fn theme(&self) -> Result<Theme, String> {
        let mut theme = Theme::default();
        theme.background = self.background_color()?;

        let overrides = [
            ("accent_color", &self.accent_color, &mut theme.accent),
            ("surface_color", &self.surface_color, &mut theme.surface),
            ("guide_color", &self.guide_color, &mut theme.guide),
            ("text_color", &self.text_color, &mut theme.text),
            (
                "muted_text_color",
                &self.muted_text_color,
                &mut theme.muted_text,
            ),
            ("folder_color", &self.folder_color, &mut theme.folder_fill),
            ("highlight_color", &self.highlight_color, &mut theme.highlight),
        ];
        for (field, value, slot) in overrides {
            if let Some(color) = parse_color(field, value.as_deref())? {
                *slot = color;
            }
        }

        Ok(theme)
    }
}

fn parse_color(field: &str, value: Option<&str>) -> Result<Option<Color>, String> {
    value
        .map(Color::new)
        .transpose()
        .map_err(|err| format!("Invalid {field} in config: {err}"))
}

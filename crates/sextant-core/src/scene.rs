//! The immutable output of every layout engine.
//!
//! A [`Scene`] is either structured geometry ([`SceneContent::Primitives`])
//! or a pass-through of textual diagram markup ([`SceneContent::Markup`]) that
//! a render adapter hands to an external text-to-diagram engine. Scenes never
//! reference their inputs; they can be stored, compared and rendered any
//! number of times.

use crate::{
    draw::{LayeredPrimitives, Primitive, RenderLayer},
    geometry::{Point, Size},
};

/// Pan and zoom applied to the whole scene: `screen = point * scale + translate`.
///
/// # Examples
///
/// ```
/// # use sextant_core::{geometry::Point, scene::ViewTransform};
/// let transform = ViewTransform::new(Point::new(10.0, 20.0), 2.0);
/// assert_eq!(transform.apply(Point::new(5.0, 5.0)), Point::new(20.0, 30.0));
/// assert_eq!(transform.invert(Point::new(20.0, 30.0)), Point::new(5.0, 5.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    translate: Point,
    scale: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl ViewTransform {
    pub fn new(translate: Point, scale: f32) -> Self {
        Self { translate, scale }
    }

    /// The transform that leaves every point in place
    pub fn identity() -> Self {
        Self {
            translate: Point::default(),
            scale: 1.0,
        }
    }

    pub fn translate(self) -> Point {
        self.translate
    }

    pub fn x(self) -> f32 {
        self.translate.x()
    }

    pub fn y(self) -> f32 {
        self.translate.y()
    }

    pub fn scale(self) -> f32 {
        self.scale
    }

    /// Returns a copy whose scale is clamped into `[min, max]`.
    ///
    /// Unlike [`f32::clamp`] this never panics; a reversed range yields `max`.
    pub fn with_scale_clamped(mut self, min: f32, max: f32) -> Self {
        self.scale = self.scale.max(min).min(max);
        self
    }

    /// Maps a scene point onto the surface
    pub fn apply(self, point: Point) -> Point {
        point.scale(self.scale).add_point(self.translate)
    }

    /// Maps a surface point back into scene coordinates
    pub fn invert(self, point: Point) -> Point {
        point.sub_point(self.translate).scale(1.0 / self.scale)
    }

    /// Component-wise interpolation between two transforms
    pub fn interpolate(self, other: ViewTransform, t: f32) -> Self {
        Self {
            translate: self.translate.lerp(other.translate, t),
            scale: self.scale + (other.scale - self.scale) * t,
        }
    }

    /// Renders the transform as an SVG/CSS `transform` attribute value
    pub fn to_svg_value(self) -> String {
        format!(
            "translate({}, {}) scale({})",
            self.translate.x(),
            self.translate.y(),
            self.scale
        )
    }
}

/// What a scene carries
#[derive(Debug, Clone, PartialEq)]
pub enum SceneContent {
    /// Textual diagram markup to be rendered by an external engine
    Markup { source: String },
    /// Structured geometry
    Primitives(LayeredPrimitives),
}

/// Laid-out geometry for one viewport.
///
/// # Examples
///
/// ```
/// # use sextant_core::{geometry::Size, scene::Scene};
/// let scene = Scene::empty(Size::new(720.0, 320.0));
/// assert!(scene.is_empty());
/// assert!(scene.markup_source().is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    size: Size,
    transform: ViewTransform,
    content: SceneContent,
}

impl Scene {
    /// Creates a geometry scene with no primitives
    pub fn empty(size: Size) -> Self {
        Self::from_primitives(size, LayeredPrimitives::new())
    }

    pub fn from_primitives(size: Size, primitives: LayeredPrimitives) -> Self {
        Self {
            size,
            transform: ViewTransform::identity(),
            content: SceneContent::Primitives(primitives),
        }
    }

    /// Creates a markup pass-through scene
    pub fn markup(size: Size, source: impl Into<String>) -> Self {
        Self {
            size,
            transform: ViewTransform::identity(),
            content: SceneContent::Markup {
                source: source.into(),
            },
        }
    }

    /// Sets the view transform applied to every primitive
    pub fn with_transform(mut self, transform: ViewTransform) -> Self {
        self.transform = transform;
        self
    }

    /// Returns the viewport size the scene was laid out for
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    pub fn content(&self) -> &SceneContent {
        &self.content
    }

    /// Returns the markup source for pass-through scenes
    pub fn markup_source(&self) -> Option<&str> {
        match &self.content {
            SceneContent::Markup { source } => Some(source),
            SceneContent::Primitives(_) => None,
        }
    }

    /// Returns the primitives of a geometry scene
    pub fn primitives(&self) -> Option<&LayeredPrimitives> {
        match &self.content {
            SceneContent::Primitives(primitives) => Some(primitives),
            SceneContent::Markup { .. } => None,
        }
    }

    /// Returns `true` for a geometry scene without primitives.
    ///
    /// Markup scenes are never empty.
    pub fn is_empty(&self) -> bool {
        self.primitives().is_some_and(LayeredPrimitives::is_empty)
    }

    /// Iterates over the primitives of one layer. Markup scenes yield nothing.
    pub fn layer(&self, layer: RenderLayer) -> impl Iterator<Item = &Primitive> {
        self.primitives()
            .into_iter()
            .flat_map(move |primitives| primitives.layer(layer))
    }

    /// Iterates over the text of every label in the scene, in insertion order
    pub fn label_texts(&self) -> impl Iterator<Item = &str> {
        self.primitives()
            .into_iter()
            .flat_map(|primitives| primitives.iter())
            .filter_map(|(_, primitive)| primitive.as_label())
            .map(|label| label.text())
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::draw::Label;

    #[test]
    fn test_view_transform_roundtrip() {
        let transform = ViewTransform::new(Point::new(-40.0, 12.5), 1.75);
        let point = Point::new(123.0, -7.0);
        let back = transform.invert(transform.apply(point));
        assert_approx_eq!(f32, back.x(), point.x(), epsilon = 0.001);
        assert_approx_eq!(f32, back.y(), point.y(), epsilon = 0.001);
    }

    #[test]
    fn test_view_transform_clamp() {
        let transform = ViewTransform::new(Point::default(), 5.0).with_scale_clamped(0.7, 2.5);
        assert_approx_eq!(f32, transform.scale(), 2.5);
        let transform = ViewTransform::new(Point::default(), 0.1).with_scale_clamped(0.7, 2.5);
        assert_approx_eq!(f32, transform.scale(), 0.7);
        let transform = ViewTransform::new(Point::default(), 1.0).with_scale_clamped(3.0, 1.5);
        assert_approx_eq!(f32, transform.scale(), 1.5);
    }

    #[test]
    fn test_view_transform_interpolate_endpoints() {
        let from = ViewTransform::identity();
        let to = ViewTransform::new(Point::new(100.0, 50.0), 2.0);
        assert_eq!(from.interpolate(to, 0.0), from);
        assert_eq!(from.interpolate(to, 1.0), to);
        assert_approx_eq!(f32, from.interpolate(to, 0.5).scale(), 1.5);
    }

    #[test]
    fn test_markup_scene_is_not_empty() {
        let scene = Scene::markup(Size::new(10.0, 10.0), "graph TD; A-->B");
        assert!(!scene.is_empty());
        assert_eq!(scene.markup_source(), Some("graph TD; A-->B"));
        assert!(scene.primitives().is_none());
        assert_eq!(scene.layer(RenderLayer::Text).count(), 0);
    }

    #[test]
    fn test_label_texts() {
        let mut primitives = LayeredPrimitives::new();
        primitives.add_to_layer(
            RenderLayer::Text,
            Primitive::Label(Label::new(Point::new(0.0, 0.0), "first")),
        );
        primitives.add_to_layer(
            RenderLayer::Text,
            Primitive::Label(Label::new(Point::new(0.0, 0.0), "second")),
        );
        let scene = Scene::from_primitives(Size::new(10.0, 10.0), primitives);
        let texts: Vec<_> = scene.label_texts().collect();
        assert_eq!(texts, ["first", "second"]);
    }
}

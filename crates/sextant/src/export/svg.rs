//! SVG render adapter built on the `svg` crate.

mod arrows;
mod primitive;

use std::{fs::File, io::Write, path::Path};

use log::{debug, error, info};
use svg::{
    Document,
    node::{
        Blob,
        element::{Group, Rectangle, Text},
    },
};

use sextant_core::{
    color::Color,
    scene::{Scene, SceneContent, ViewTransform},
};

use crate::export::{self, MarkupEngine, MarkupOutput, Renderer, render_markup};

const DEFAULT_FONT_FAMILY: &str = "Inter, system-ui, sans-serif";
const FALLBACK_FONT_SIZE: u16 = 13;

/// Renders scenes as standalone SVG documents.
///
/// # Examples
///
/// ```
/// # use sextant::export::{Renderer, svg::SvgRenderer};
/// # use sextant_core::{geometry::Size, scene::Scene};
/// let document = SvgRenderer::new()
///     .render(&Scene::empty(Size::new(720.0, 320.0)))
///     .unwrap();
/// assert!(document.to_string().contains(r#"viewBox="0 0 720 320""#));
/// ```
#[derive(Default)]
pub struct SvgRenderer {
    background: Option<Color>,
    markup_engine: Option<Box<dyn MarkupEngine>>,
}

impl std::fmt::Debug for SvgRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SvgRenderer")
            .field("background", &self.background)
            .field("markup_engine", &self.markup_engine.is_some())
            .finish()
    }
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fills the whole surface with `color` before drawing
    pub fn with_background(mut self, color: Option<Color>) -> Self {
        self.background = color;
        self
    }

    /// Engine used for markup scenes; without one they show a fallback text
    pub fn with_markup_engine(mut self, engine: Box<dyn MarkupEngine>) -> Self {
        self.markup_engine = Some(engine);
        self
    }

    /// Renders `scene` and serializes the document
    pub fn render_to_string(&self, scene: &Scene) -> Result<String, export::Error> {
        Ok(self.render(scene)?.to_string())
    }

    /// Renders `scene` into the file at `path`
    pub fn export(&self, scene: &Scene, path: &Path) -> Result<(), export::Error> {
        let doc = self.render(scene)?;
        debug!("SVG document rendered");
        self.write_document(doc, path)
    }

    /// Writes an SVG document to the specified file
    pub fn write_document(&self, doc: Document, path: &Path) -> Result<(), export::Error> {
        info!(file_name:? = path; "Creating SVG file");
        let mut f = match File::create(path) {
            Ok(file) => file,
            Err(err) => {
                error!(file_name:? = path, err:err; "Failed to create SVG file");
                return Err(export::Error::Io(err));
            }
        };

        if let Err(err) = write!(f, "{doc}") {
            error!(file_name:? = path, err:err; "Failed to write SVG content");
            return Err(export::Error::Io(err));
        }

        Ok(())
    }

    fn markup_node(&self, source: &str, scene: &Scene) -> Box<dyn svg::Node> {
        let engine = self.markup_engine.as_deref();
        match render_markup(engine, source) {
            MarkupOutput::Rendered(markup) => Blob::new(markup).into(),
            MarkupOutput::Fallback(message) => {
                let size = scene.size();
                Text::new(message)
                    .set("x", size.width() / 2.0)
                    .set("y", size.height() / 2.0)
                    .set("text-anchor", "middle")
                    .set("font-family", DEFAULT_FONT_FAMILY)
                    .set("font-size", f32::from(FALLBACK_FONT_SIZE))
                    .into()
            }
        }
    }
}

impl Renderer for SvgRenderer {
    type Output = Document;

    fn render(&self, scene: &Scene) -> Result<Document, export::Error> {
        let size = scene.size();
        if !(size.width() > 0.0 && size.height() > 0.0)
            || !size.width().is_finite()
            || !size.height().is_finite()
        {
            return Err(export::Error::Render(format!(
                "cannot render a {}x{} scene",
                size.width(),
                size.height()
            )));
        }

        let mut doc = Document::new()
            .set("viewBox", format!("0 0 {} {}", size.width(), size.height()))
            .set("width", size.width())
            .set("height", size.height());

        if let Some(background) = self.background {
            doc = doc.add(
                Rectangle::new()
                    .set("x", 0)
                    .set("y", 0)
                    .set("width", size.width())
                    .set("height", size.height())
                    .set("fill", background.to_string())
                    .set("fill-opacity", background.alpha()),
            );
        }

        let mut content = Group::new().set("class", "scene");
        if scene.transform() != ViewTransform::identity() {
            content = content.set("transform", scene.transform().to_svg_value());
        }

        match scene.content() {
            SceneContent::Markup { source } => {
                content = content.add(self.markup_node(source, scene));
            }
            SceneContent::Primitives(primitives) => {
                let defs = arrows::create_marker_definitions(primitives);
                doc = doc.add(defs);

                for (layer, items) in primitives.in_render_order() {
                    let mut group = Group::new().set("class", format!("layer-{}", layer.name()));
                    for item in items {
                        group = group.add(primitive::render_primitive(item));
                    }
                    content = content.add(group);
                }
                debug!(primitives = primitives.len(); "Scene primitives rendered");
            }
        }

        Ok(doc.add(content))
    }
}

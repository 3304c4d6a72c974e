//! UML diagram layout.
//!
//! [`DiagramLayout`] dispatches a [`DiagramSpec`] to the engine for its
//! variant. Each engine implements [`DiagramEngine`] and places shapes on a
//! fixed grid, so identical inputs always give identical geometry. Markup
//! diagrams are not laid out; they become a pass-through scene.

mod activity;
mod class;
mod sequence;
mod usecase;

use log::{debug, info};

use sextant_core::{color::Theme, draw::LayeredPrimitives, geometry::Size, scene::Scene};

use crate::{config::DiagramConfig, model::diagram::DiagramSpec};

pub use class::grid_cell;

/// Interface shared by the structural diagram engines.
pub trait DiagramEngine {
    /// The diagram model this engine lays out
    type Diagram;

    /// Places every element of `diagram` inside `viewport`.
    ///
    /// Elements that reference unknown names are skipped.
    fn calculate(&self, diagram: &Self::Diagram, viewport: Size) -> LayeredPrimitives;
}

/// Lays out diagrams of every kind with one configuration and theme.
///
/// # Examples
///
/// ```
/// # use sextant::config::DiagramConfig;
/// # use sextant::layout::DiagramLayout;
/// # use sextant::model::diagram::DiagramSpec;
/// # use sextant_core::{color::Theme, geometry::Size};
/// let config = DiagramConfig::default();
/// let theme = Theme::default();
/// let layout = DiagramLayout::new(&config, &theme);
///
/// let spec = DiagramSpec::from_json(r#"{"classes": [{"name": "A"}]}"#).unwrap();
/// let scene = layout.layout(&spec, Size::new(720.0, 320.0));
/// assert!(scene.label_texts().any(|text| text == "A"));
/// ```
pub struct DiagramLayout<'a> {
    config: &'a DiagramConfig,
    theme: &'a Theme,
}

impl<'a> DiagramLayout<'a> {
    pub fn new(config: &'a DiagramConfig, theme: &'a Theme) -> Self {
        Self { config, theme }
    }

    /// Lays out `spec` into a scene of size `viewport`.
    pub fn layout(&self, spec: &DiagramSpec, viewport: Size) -> Scene {
        info!(kind = spec.kind_name(), width = viewport.width(), height = viewport.height(); "Laying out diagram");

        let primitives = match spec {
            DiagramSpec::Markup(source) => {
                debug!(chars = source.chars().count(); "Passing markup through");
                return Scene::markup(viewport, source.clone());
            }
            DiagramSpec::Class(diagram) => {
                class::Engine::new(self.config.class(), self.theme).calculate(diagram, viewport)
            }
            DiagramSpec::Sequence(diagram) => {
                sequence::Engine::new(self.config.sequence(), self.theme)
                    .calculate(diagram, viewport)
            }
            DiagramSpec::Activity(diagram) => {
                activity::Engine::new(self.config.activity(), self.theme)
                    .calculate(diagram, viewport)
            }
            DiagramSpec::UseCase(diagram) => {
                usecase::Engine::new(self.config.usecase(), self.theme)
                    .calculate(diagram, viewport)
            }
        };

        debug!(primitives = primitives.len(); "Diagram laid out");
        Scene::from_primitives(viewport, primitives)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::diagram::{ClassDiagram, SequenceDiagram, UseCaseDiagram};

    fn layout(spec: &DiagramSpec) -> Scene {
        let config = DiagramConfig::default();
        let theme = Theme::default();
        DiagramLayout::new(&config, &theme).layout(spec, config.viewport())
    }

    #[test]
    fn test_markup_passes_through() {
        let scene = layout(&DiagramSpec::Markup("graph TD; A-->B".to_string()));
        assert_eq!(scene.markup_source(), Some("graph TD; A-->B"));
        assert_eq!(scene.size(), Size::new(720.0, 320.0));
    }

    #[test]
    fn test_empty_collections_give_empty_scenes() {
        for spec in [
            DiagramSpec::Class(ClassDiagram::default()),
            DiagramSpec::Sequence(SequenceDiagram::default()),
            DiagramSpec::UseCase(UseCaseDiagram::default()),
            DiagramSpec::default(),
        ] {
            assert!(layout(&spec).is_empty(), "{} should be empty", spec.kind_name());
        }
    }

    #[test]
    fn test_layout_is_deterministic() {
        let spec = DiagramSpec::from_json(
            r#"{"type": "sequence", "lifelines": ["a", "b"],
                "messages": [{"from": "a", "to": "b", "label": "hi"}]}"#,
        )
        .unwrap();
        assert_eq!(layout(&spec), layout(&spec));
    }
}

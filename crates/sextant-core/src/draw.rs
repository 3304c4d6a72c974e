//! Drawing vocabulary for layout output.
//!
//! Layout engines never draw. They emit [`Primitive`] values tagged with a
//! [`RenderLayer`] and collect them in a [`LayeredPrimitives`] list. A render
//! adapter walks that list bottom-to-top and maps each primitive onto its
//! surface.

mod layer;
mod primitive;
mod stroke;
mod text;

pub use layer::{LayeredPrimitives, RenderLayer};
pub use primitive::{Arrowhead, Fill, Primitive};
pub use stroke::{StrokeDefinition, StrokeStyle};
pub use text::{FontWeight, Label, TextAnchor};

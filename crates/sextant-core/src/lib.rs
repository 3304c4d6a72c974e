//! Sextant Core Types and Definitions
//!
//! This crate provides the shared vocabulary every Sextant layout speaks. It
//! includes:
//!
//! - **Geometry**: Points, sizes, bounds, insets and circles ([`geometry`] module)
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Draw**: Primitive shapes, strokes, labels and render layers ([`draw`] module)
//! - **Scene**: The immutable layout output handed to render adapters ([`scene`] module)

pub mod color;
pub mod draw;
pub mod geometry;
pub mod scene;

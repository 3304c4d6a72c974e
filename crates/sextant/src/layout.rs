//! Layout engines.
//!
//! Every engine is a pure function of its input model, a viewport and its
//! configuration, and returns an immutable [`Scene`](sextant_core::scene::Scene)
//! (or, for the pack layout, a packed tree that converts into one).

pub mod diagram;
pub mod force;
pub mod hierarchy;
pub mod pack;

pub use diagram::DiagramLayout;
pub use force::{ForceSimulation, GraphFrame};
pub use hierarchy::{HierarchyTree, NodeId, build_hierarchy};
pub use pack::{PackedTree, pack};

//! Input models decoded from backend JSON.
//!
//! - [`diagram`]: UML diagram descriptions and saved diagram records
//! - [`graph`]: code-execution graphs
//! - [`repo`]: repository file listings and commits
//!
//! Decoding is lenient about content: missing or `null` collections default
//! to empty, non-string list members are shown by their name or JSON text,
//! unknown diagram types fall back to class diagrams and unresolved
//! references are dropped later by the layout engines. Only input that is
//! not JSON of the expected overall shape is reported as an error.

pub mod diagram;
pub mod graph;
pub mod repo;

mod lenient;

//! Graph construction and multi-document aggregation.
//!
//! The modules here go from one annotated sentence to the corpus-wide
//! structure: [spans] resolves overlapping entity annotations, [sentence]
//! builds and contracts the per-sentence dependency graph, [mentions]
//! renumbers all sentence graphs into one global mention space, [concepts]
//! groups mentions into concepts, and [multidoc] ties the stages together.
pub mod concepts;
pub mod digraph;
pub mod matrix;
pub mod mentions;
pub mod multidoc;
pub mod sentence;
pub mod spans;

pub use concepts::{Concept, Concepts};
pub use digraph::{DependencyEdge, DependencyGraph, NodeKey};
pub use mentions::{Mention, Mentions};
pub use multidoc::MultiDocGraph;
pub use sentence::{Sentence, SurfaceForms};
pub use spans::Span;

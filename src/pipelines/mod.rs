//! Pipelines.
//!
//! The module provides a light [pipeline::Pipeline] trait that enables easy
//! and flexible pipeline creation, and the T-REx graph-construction
//! pipeline itself.
#[allow(clippy::module_inception)]
pub mod pipeline;
pub mod trexgraph;

pub use pipeline::Pipeline;
pub use trexgraph::TrexGraph;

//! # trexgraph
//!
//! trexgraph turns entity-linked corpora (T-REx-style JSON) into per-sentence
//! dependency graphs, then aggregates those graphs into a single
//! multi-document structure linking mentions of the same real-world entity
//! across sentences and documents.
//!
//! This project can be used as a tool to process corpus dumps,
//! or as a lib to integrate graph construction into other projects.
//!
//! Processing goes through the following stages:
//! 1. Documents are read and entity-linked annotations collected into a
//!    corpus-wide surface-form lookup.
//! 1. Each sentence gets its annotated spans resolved (overlaps removed) and
//!    a directed token graph built from a dependency parse; token nodes
//!    covered by an entity span are contracted into a single entity node.
//! 1. Sentence graphs are renumbered into one global mention-id space and
//!    mentions are grouped into concepts, yielding a combined adjacency
//!    matrix over mentions and concepts.
pub mod cli;
pub mod error;
pub mod graph;
pub mod io;
pub mod parsing;
pub mod pipelines;
pub mod sources;

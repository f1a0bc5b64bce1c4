//! Corpus sources.
//!
//! Currently only T-REx-style JSON dumps are supported.
pub mod trex;

//! Combined multi-document structure.
use log::info;
use ndarray::Array2;
use serde::Serialize;

use crate::graph::concepts::Concepts;
use crate::graph::matrix;
use crate::graph::mentions::Mentions;
use crate::graph::sentence::Sentence;

/// The final product of corpus graph construction: the sentence list (graphs
/// relabeled to global mention ids), the mention and concept indices, and
/// the extended adjacency matrix over both.
#[derive(Debug, Serialize)]
pub struct MultiDocGraph {
    pub sentences: Vec<Sentence>,
    pub mentions: Mentions,
    pub concepts: Concepts,
    #[serde(serialize_with = "matrix::serialize_rows")]
    pub multidoc_adjacency_matrix: Array2<f32>,
}

impl MultiDocGraph {
    pub fn new(mut sentences: Vec<Sentence>) -> Self {
        let mentions = Mentions::new(&mut sentences);
        let concepts = Concepts::new(&mentions);
        let multidoc_adjacency_matrix = concepts.multidoc_adjacency_matrix(&mentions);
        info!(
            "multidoc graph: {} sentences, {} mentions, {} concepts",
            sentences.len(),
            mentions.number_of_mentions(),
            concepts.number_of_concepts()
        );

        MultiDocGraph {
            sentences,
            mentions,
            concepts,
            multidoc_adjacency_matrix,
        }
    }
}

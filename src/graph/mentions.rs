//! Corpus-wide mention assembly.
//!
//! Takes the ordered sentence list and renumbers every graph node into one
//! global, collision-free mention-id space, then lays each sentence's
//! adjacency matrix along the diagonal of a combined matrix.
use std::collections::{BTreeMap, HashMap};

use log::debug;
use ndarray::{s, Array2};
use serde::Serialize;

use crate::graph::digraph::NodeKey;
use crate::graph::sentence::Sentence;

/// One renumbered graph node: an occurrence of an entity or word in one
/// sentence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mention {
    pub global_id: usize,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wiki_id: Option<String>,
}

/// The global mention index and the combined adjacency matrix over all
/// sentence graphs. Sentences stay owned by the caller; their graphs are
/// relabeled in place to global ids.
#[derive(Debug, Serialize)]
pub struct Mentions {
    id2mention: BTreeMap<usize, Mention>,
    #[serde(skip)]
    multidoc_adjacency_matrix: Array2<f32>,
}

impl Mentions {
    pub fn new(sentences: &mut [Sentence]) -> Self {
        let id2mention = Self::renumber(sentences);
        let multidoc_adjacency_matrix = Self::combined_matrix(sentences);

        assert_eq!(
            multidoc_adjacency_matrix.nrows(),
            id2mention.len(),
            "adjacency matrix size must match the global mention count"
        );

        Mentions {
            id2mention,
            multidoc_adjacency_matrix,
        }
    }

    /// Assigns global ids sentence by sentence, in each graph's node
    /// enumeration order, and relabels the graphs to those ids. The offset
    /// advances past the last assigned id, so id spaces never overlap.
    fn renumber(sentences: &mut [Sentence]) -> BTreeMap<usize, Mention> {
        let mut id2mention = BTreeMap::new();
        let mut current_graph_id = 0usize;

        for sentence in sentences.iter_mut() {
            let locals: Vec<(NodeKey, String)> = sentence
                .graph
                .keys()
                .map(|key| {
                    let name = sentence
                        .graph
                        .node(key)
                        .map(|data| data.name.clone())
                        .unwrap_or_default();
                    (key.clone(), name)
                })
                .collect();

            let mut mapping = HashMap::new();
            for (local_index, (key, name)) in locals.into_iter().enumerate() {
                let global_id = local_index + current_graph_id;
                let wiki_id = key.uri().map(str::to_string);
                mapping.insert(key, NodeKey::Mention { id: global_id });
                id2mention.insert(
                    global_id,
                    Mention {
                        global_id,
                        name,
                        wiki_id,
                    },
                );
            }
            debug!(
                "sentence {}: {} mentions, ids {}..{}",
                sentence.id,
                mapping.len(),
                current_graph_id,
                current_graph_id + mapping.len()
            );
            sentence.graph.relabel(&mapping);
            current_graph_id += mapping.len();
        }

        id2mention
    }

    /// Block-diagonal combination of the per-sentence adjacency matrices,
    /// in sentence order.
    fn combined_matrix(sentences: &[Sentence]) -> Array2<f32> {
        let total: usize = sentences.iter().map(|s| s.graph.node_count()).sum();
        let mut matrix = Array2::<f32>::zeros((total, total));

        let mut current_matrix_row = 0;
        for sentence in sentences {
            let block = sentence.graph.adjacency_matrix();
            let n = block.nrows();
            matrix
                .slice_mut(s![
                    current_matrix_row..current_matrix_row + n,
                    current_matrix_row..current_matrix_row + n
                ])
                .assign(&block);
            current_matrix_row += n;
        }
        matrix
    }

    pub fn number_of_mentions(&self) -> usize {
        self.id2mention.len()
    }

    pub fn id2mention(&self) -> &BTreeMap<usize, Mention> {
        &self.id2mention
    }

    /// Mentions in global id order.
    pub fn mentions(&self) -> impl Iterator<Item = &Mention> {
        self.id2mention.values()
    }

    pub fn multidoc_adjacency_matrix(&self) -> &Array2<f32> {
        &self.multidoc_adjacency_matrix
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::graph::sentence::fixtures::{headline_tokens, FixtureParser};
    use crate::graph::sentence::SurfaceForms;
    use crate::sources::trex::DocInfo;

    fn build_sentences(texts: &[&str]) -> Vec<Sentence> {
        texts
            .iter()
            .enumerate()
            .map(|(id, text)| {
                let parser =
                    FixtureParser::default().with(text, headline_tokens(text));
                Sentence::build(
                    id,
                    text.to_string(),
                    BTreeMap::new(),
                    &SurfaceForms::new(),
                    DocInfo::default(),
                    &parser,
                )
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn global_ids_are_unique_across_sentences() {
        let mut sentences = build_sentences(&["a b c", "d e", "f g h"]);
        let mentions = Mentions::new(&mut sentences);

        let total: usize = sentences.iter().map(|s| s.graph.node_count()).sum();
        assert_eq!(mentions.number_of_mentions(), total);
        assert_eq!(mentions.number_of_mentions(), 8);

        let ids: Vec<usize> = mentions.mentions().map(|m| m.global_id).collect();
        assert_eq!(ids, (0..8).collect::<Vec<usize>>());
    }

    #[test]
    fn graphs_are_relabeled_to_global_ids() {
        let mut sentences = build_sentences(&["a b", "c d"]);
        Mentions::new(&mut sentences);

        let second: Vec<&NodeKey> = sentences[1].graph.keys().collect();
        assert_eq!(
            second,
            vec![&NodeKey::Mention { id: 2 }, &NodeKey::Mention { id: 3 }]
        );
    }

    #[test]
    fn matrix_is_block_diagonal_in_sentence_order() {
        let mut sentences = build_sentences(&["a b", "c d e"]);
        let mentions = Mentions::new(&mut sentences);
        let matrix = mentions.multidoc_adjacency_matrix();

        assert_eq!(matrix.shape(), &[5, 5]);
        // first sentence: a -> b
        assert_eq!(matrix[[0, 1]], 1.0);
        // second sentence: c -> d, c -> e, offset by 2
        assert_eq!(matrix[[2, 3]], 1.0);
        assert_eq!(matrix[[2, 4]], 1.0);
        // no cross-sentence edges
        assert_eq!(matrix[[1, 2]], 0.0);
        assert_eq!(matrix[[0, 2]], 0.0);
    }

    #[test]
    fn empty_graphs_do_not_shift_ids() {
        let mut sentences = build_sentences(&["a b", "c"]);
        // an empty sentence in between
        let parser = FixtureParser::default().with("", Vec::new());
        let empty = Sentence::build(
            9,
            String::new(),
            BTreeMap::new(),
            &SurfaceForms::new(),
            DocInfo::default(),
            &parser,
        )
        .unwrap();
        sentences.insert(1, empty);

        let mentions = Mentions::new(&mut sentences);
        assert_eq!(mentions.number_of_mentions(), 3);
        let ids: Vec<usize> = mentions.mentions().map(|m| m.global_id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn mention_names_preserve_surface_text() {
        let mut sentences = build_sentences(&["hello world"]);
        let mentions = Mentions::new(&mut sentences);

        let names: Vec<&str> = mentions.mentions().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["hello", "world"]);
    }
}

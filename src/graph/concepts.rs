//! Concept aggregation.
//!
//! Mentions referring to the same real-world entity (same identifier) are
//! grouped into one concept; mentions without an identifier group by their
//! surface text. Concept ids occupy the block immediately after the mention
//! ids, and the combined adjacency matrix is extended with concept-to-
//! mention membership edges.
use std::collections::{BTreeMap, HashMap};

use log::debug;
use ndarray::{s, Array2};
use serde::Serialize;

use crate::graph::mentions::{Mention, Mentions};

/// Grouping key for "the same thing": an entity identifier, or the literal
/// surface text when no identifier is known.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Concept {
    Entity { uri: String },
    Surface { text: String },
}

impl Concept {
    fn of(mention: &Mention) -> Self {
        match &mention.wiki_id {
            Some(uri) => Concept::Entity { uri: uri.clone() },
            None => Concept::Surface {
                text: mention.name.clone(),
            },
        }
    }
}

/// Concept groupings derived from a [Mentions] index.
#[derive(Debug, Serialize)]
pub struct Concepts {
    #[serde(skip)]
    concept2mention: HashMap<Concept, Vec<Mention>>,
    /// Identifiers observed per surface text. Kept for lookup; not consumed
    /// by the matrix construction.
    surface2concept: HashMap<String, Vec<String>>,
    id2concept: BTreeMap<usize, Concept>,
}

impl Concepts {
    /// Groups the mentions of `mentions` into concepts. Concepts are
    /// numbered in first-seen order (over mentions in global id order),
    /// starting right after the last mention id.
    pub fn new(mentions: &Mentions) -> Self {
        let mut concept2mention: HashMap<Concept, Vec<Mention>> = HashMap::new();
        let mut surface2concept: HashMap<String, Vec<String>> = HashMap::new();
        let mut order: Vec<Concept> = Vec::new();

        for mention in mentions.mentions() {
            let concept = Concept::of(mention);
            if let Some(uri) = &mention.wiki_id {
                surface2concept
                    .entry(mention.name.clone())
                    .or_default()
                    .push(uri.clone());
            }
            if !concept2mention.contains_key(&concept) {
                order.push(concept.clone());
            }
            concept2mention
                .entry(concept)
                .or_default()
                .push(mention.clone());
        }

        let concept_start_id = mentions.number_of_mentions();
        let id2concept: BTreeMap<usize, Concept> = order
            .into_iter()
            .enumerate()
            .map(|(index, concept)| (index + concept_start_id, concept))
            .collect();
        debug!(
            "{} concepts over {} mentions",
            id2concept.len(),
            mentions.number_of_mentions()
        );

        Concepts {
            concept2mention,
            surface2concept,
            id2concept,
        }
    }

    pub fn number_of_concepts(&self) -> usize {
        self.id2concept.len()
    }

    pub fn id2concept(&self) -> &BTreeMap<usize, Concept> {
        &self.id2concept
    }

    pub fn concept2mention(&self) -> &HashMap<Concept, Vec<Mention>> {
        &self.concept2mention
    }

    pub fn surface2concept(&self) -> &HashMap<String, Vec<String>> {
        &self.surface2concept
    }

    /// Extends the mentions' square matrix to cover concepts in both
    /// dimensions and writes a `1` at `[concept, mention]` for every
    /// mention belonging to the concept. Concept-concept entries stay 0.
    pub fn multidoc_adjacency_matrix(&self, mentions: &Mentions) -> Array2<f32> {
        let num_mentions = mentions.number_of_mentions();
        let size = num_mentions + self.number_of_concepts();

        let mut matrix = Array2::<f32>::zeros((size, size));
        matrix
            .slice_mut(s![..num_mentions, ..num_mentions])
            .assign(mentions.multidoc_adjacency_matrix());

        for (concept_id, concept) in &self.id2concept {
            for mention in &self.concept2mention[concept] {
                matrix[[*concept_id, mention.global_id]] = 1.0;
            }
        }

        assert_eq!(
            mentions.number_of_mentions() + self.id2concept.len(),
            matrix.ncols(),
            "mention and concept counts must add up to the matrix dimension"
        );
        matrix
    }
}

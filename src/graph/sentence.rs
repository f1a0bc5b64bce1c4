//! Per-sentence dependency graphs.
//!
//! A [Sentence] owns the graph built from its dependency parse. Token nodes
//! covered by a resolved entity span are contracted into a single node keyed
//! by the entity identifier; whatever is left keeps its surface text as key,
//! so repeated unlinked words inside the sentence end up as one node.
use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

use crate::error::Error;
use crate::graph::digraph::{DependencyGraph, NodeKey};
use crate::graph::spans::Span;
use crate::parsing::Parse;
use crate::sources::trex::{DocInfo, EntityMention};

/// Alias lookup built over the whole corpus: entity identifier to the
/// surface forms it was annotated with.
pub type SurfaceForms = HashMap<String, BTreeSet<String>>;

/// One sentence of a document, with its resolved entity spans and the
/// dependency graph built over it.
#[derive(Debug, Serialize)]
pub struct Sentence {
    pub id: usize,
    pub text: String,
    #[serde(serialize_with = "entities_as_list")]
    pub entities: BTreeMap<Span, EntityMention>,
    pub doc_info: DocInfo,
    pub graph: DependencyGraph,
}

impl Sentence {
    /// Builds the sentence and its graph in one go.
    ///
    /// `entities` must already be overlap-free (see
    /// [crate::graph::spans::remove_overlapping]). A parser failure is
    /// returned as-is; a parse with no tokens yields a sentence with an
    /// empty graph.
    pub fn build<P: Parse>(
        id: usize,
        text: String,
        entities: BTreeMap<Span, EntityMention>,
        surface_forms: &SurfaceForms,
        doc_info: DocInfo,
        parser: &P,
    ) -> Result<Self, Error> {
        let mut sentence = Sentence {
            id,
            text,
            entities,
            doc_info,
            graph: DependencyGraph::new(),
        };
        sentence.create_graph(surface_forms, parser)?;
        Ok(sentence)
    }

    fn create_graph<P: Parse>(
        &mut self,
        surface_forms: &SurfaceForms,
        parser: &P,
    ) -> Result<(), Error> {
        let tokens = parser.parse(&self.text)?;

        let mut graph = DependencyGraph::new();
        for token in &tokens {
            let node = NodeKey::token(&token.text, token.range());
            let head = NodeKey::token(&token.head_text, token.head_range());

            // the sentence root is its own head; no self-edge for it
            if head != node {
                graph.add_edge(&head, &node, &token.dep, &token.pos);
            }

            let data = graph.node_mut(&node);
            data.ranges.push(token.range());
            data.name = token.text.clone();
        }
        self.graph = graph;

        if !surface_forms.is_empty() {
            self.combine_linked_entity_nodes(surface_forms);
        }
        self.string_match_relabel();
        Ok(())
    }

    /// Contracts the token nodes covered by each entity span into one node
    /// keyed by the entity identifier, then attaches the known aliases to
    /// every linked node.
    fn combine_linked_entity_nodes(&mut self, surface_forms: &SurfaceForms) {
        // Collect merge groups against the pre-contraction graph: a node
        // belongs to a span when any of its covered ranges lies inside it.
        let mut groups: Vec<(String, Vec<NodeKey>)> = Vec::new();
        for (span, mention) in &self.entities {
            let members: Vec<NodeKey> = self
                .graph
                .keys()
                .filter(|key| {
                    self.graph.node(key).map_or(false, |data| {
                        data.ranges
                            .iter()
                            .any(|range| range.0 >= span.0 && range.1 <= span.1)
                    })
                })
                .cloned()
                .collect();
            groups.push((mention.uri.clone(), members));
        }
        assert_eq!(
            groups.len(),
            self.entities.len(),
            "every resolved span must produce a merge group"
        );

        for (uri, members) in groups {
            if members.is_empty() {
                continue;
            }
            for pair in members.windows(2) {
                self.graph.contract(&pair[1], &pair[0]);
            }
            let survivor = members[members.len() - 1].clone();
            let mapping = HashMap::from([(survivor, NodeKey::entity(&uri))]);
            self.graph.relabel(&mapping);
        }

        let linked: Vec<(NodeKey, BTreeSet<String>)> = self
            .graph
            .keys()
            .filter_map(|key| {
                let uri = key.uri()?;
                let aliases = surface_forms.get(uri).cloned().unwrap_or_default();
                Some((key.clone(), aliases))
            })
            .collect();
        for (key, aliases) in linked {
            self.graph.node_mut(&key).surfaceform = Some(aliases);
        }
    }

    /// Relabels every node without an alias set to its plain display name.
    /// Unlinked tokens with identical surface text collapse into one node.
    fn string_match_relabel(&mut self) {
        let mapping: HashMap<NodeKey, NodeKey> = self
            .graph
            .keys()
            .filter_map(|key| {
                let data = self.graph.node(key)?;
                if data.surfaceform.is_none() {
                    Some((key.clone(), NodeKey::word(&data.name)))
                } else {
                    None
                }
            })
            .collect();
        self.graph.relabel(&mapping);
    }

    /// Nodes carrying an alias set, i.e. the linked-entity nodes.
    pub fn linked_nodes(&self) -> Vec<&NodeKey> {
        self.graph
            .keys()
            .filter(|key| {
                self.graph
                    .node(key)
                    .map_or(false, |data| data.surfaceform.is_some())
            })
            .collect()
    }
}

fn entities_as_list<S>(
    entities: &BTreeMap<Span, EntityMention>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut seq = serializer.serialize_seq(Some(entities.len()))?;
    for mention in entities.values() {
        seq.serialize_element(mention)?;
    }
    seq.end()
}


#[cfg(test)]
mod tests {
    use super::fixtures::{headline_tokens, FixtureParser};
    use super::*;
    use crate::parsing::ParsedToken;

    fn mention(surfaceform: &str, uri: &str, boundaries: Span) -> EntityMention {
        EntityMention {
            surfaceform: surfaceform.to_string(),
            uri: uri.to_string(),
            boundaries,
            annotator: "Wikidata_Spotlight_Entity_Linker".to_string(),
        }
    }

    fn token(
        text: &str,
        start: usize,
        head: (&str, usize),
        dep: &str,
        pos: &str,
    ) -> ParsedToken {
        ParsedToken {
            text: text.to_string(),
            start,
            head_text: head.0.to_string(),
            head_start: head.1,
            dep: dep.to_string(),
            pos: pos.to_string(),
        }
    }

    /// "Paris is the capital of France." with "is" as root.
    fn paris_parse() -> Vec<ParsedToken> {
        vec![
            token("Paris", 0, ("is", 6), "nsubj", "PROPN"),
            token("is", 6, ("is", 6), "ROOT", "AUX"),
            token("the", 9, ("capital", 13), "det", "DET"),
            token("capital", 13, ("is", 6), "attr", "NOUN"),
            token("of", 21, ("capital", 13), "prep", "ADP"),
            token("France", 24, ("of", 21), "pobj", "PROPN"),
            token(".", 30, ("is", 6), "punct", "PUNCT"),
        ]
    }

    fn paris_sentence() -> Sentence {
        let text = "Paris is the capital of France.".to_string();
        let parser = FixtureParser::default().with(&text, paris_parse());
        let entities = BTreeMap::from([
            ((0, 5), mention("Paris", "Q90", (0, 5))),
            ((24, 30), mention("France", "Q142", (24, 30))),
        ]);
        let surface_forms = SurfaceForms::from([
            ("Q90".to_string(), BTreeSet::from(["Paris".to_string()])),
            ("Q142".to_string(), BTreeSet::from(["France".to_string()])),
        ]);
        Sentence::build(
            0,
            text,
            entities,
            &surface_forms,
            DocInfo::default(),
            &parser,
        )
        .unwrap()
    }

    #[test]
    fn exactly_linked_nodes_carry_aliases() {
        let sentence = paris_sentence();

        let linked = sentence.linked_nodes();
        assert_eq!(linked.len(), 2);
        assert!(linked.contains(&&NodeKey::entity("Q90")));
        assert!(linked.contains(&&NodeKey::entity("Q142")));

        for key in sentence.graph.keys() {
            let data = sentence.graph.node(key).unwrap();
            assert_eq!(data.surfaceform.is_some(), key.uri().is_some());
        }
    }

    #[test]
    fn root_has_no_self_edge() {
        let sentence = paris_sentence();
        assert!(sentence
            .graph
            .edges()
            .iter()
            .all(|e| e.head != e.dependent));
    }

    #[test]
    fn unlinked_nodes_are_keyed_by_surface_text() {
        let sentence = paris_sentence();
        assert!(sentence.graph.contains(&NodeKey::word("capital")));
        assert!(sentence.graph.contains(&NodeKey::word("the")));
        assert!(!sentence.graph.contains(&NodeKey::word("Paris")));
    }

    #[test]
    fn multi_token_entity_contracts_into_one_node() {
        let text = "New York sleeps.".to_string();
        let parse = vec![
            token("New", 0, ("York", 4), "compound", "PROPN"),
            token("York", 4, ("sleeps", 9), "nsubj", "PROPN"),
            token("sleeps", 9, ("sleeps", 9), "ROOT", "VERB"),
            token(".", 15, ("sleeps", 9), "punct", "PUNCT"),
        ];
        let parser = FixtureParser::default().with(&text, parse);
        let entities = BTreeMap::from([((0, 8), mention("New York", "Q60", (0, 8)))]);
        let surface_forms =
            SurfaceForms::from([("Q60".to_string(), BTreeSet::from(["New York".to_string()]))]);

        let sentence = Sentence::build(
            0,
            text,
            entities,
            &surface_forms,
            DocInfo::default(),
            &parser,
        )
        .unwrap();

        // 4 tokens, one 2-member merge group: 3 nodes remain.
        assert_eq!(sentence.graph.node_count(), 3);
        let city = sentence.graph.node(&NodeKey::entity("Q60")).unwrap();
        assert!(city.ranges.contains(&(0, 3)));
        assert!(city.ranges.contains(&(4, 8)));
    }

    #[test]
    fn repeated_words_collapse_into_one_node() {
        let text = "a b a".to_string();
        let parser = FixtureParser::default().with(&text, headline_tokens(&text));
        let sentence = Sentence::build(
            0,
            text,
            BTreeMap::new(),
            &SurfaceForms::new(),
            DocInfo::default(),
            &parser,
        )
        .unwrap();

        assert_eq!(sentence.graph.node_count(), 2);
        assert!(sentence.graph.contains(&NodeKey::word("a")));
        assert!(sentence.graph.contains(&NodeKey::word("b")));
    }

    #[test]
    fn empty_parse_yields_empty_graph() {
        let text = "???".to_string();
        let parser = FixtureParser::default().with(&text, Vec::new());
        let sentence = Sentence::build(
            0,
            text,
            BTreeMap::new(),
            &SurfaceForms::new(),
            DocInfo::default(),
            &parser,
        )
        .unwrap();

        assert_eq!(sentence.graph.node_count(), 0);
        assert_eq!(sentence.graph.edge_count(), 0);
    }

    #[test]
    fn parser_failure_surfaces() {
        let parser = FixtureParser::default();
        let result = Sentence::build(
            0,
            "unknown".to_string(),
            BTreeMap::new(),
            &SurfaceForms::new(),
            DocInfo::default(),
            &parser,
        );
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn span_without_covered_tokens_changes_nothing() {
        let text = "a b".to_string();
        let parser = FixtureParser::default().with(&text, headline_tokens(&text));
        // span covering only whitespace between the two tokens
        let entities = BTreeMap::from([((1, 2), mention(" ", "Q1", (1, 2)))]);
        let surface_forms =
            SurfaceForms::from([("Q1".to_string(), BTreeSet::from([" ".to_string()]))]);

        let sentence = Sentence::build(
            0,
            text,
            entities,
            &surface_forms,
            DocInfo::default(),
            &parser,
        )
        .unwrap();

        assert_eq!(sentence.graph.node_count(), 2);
        assert!(sentence.linked_nodes().is_empty());
    }

    #[test]
    fn sentence_serializes_with_node_and_edge_lists() {
        let sentence = paris_sentence();
        let value = serde_json::to_value(&sentence).unwrap();

        assert!(value["graph"]["nodes"].is_array());
        assert!(value["graph"]["edges"].is_array());
        assert_eq!(value["entities"].as_array().unwrap().len(), 2);
    }
}

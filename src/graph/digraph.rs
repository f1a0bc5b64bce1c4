//! Keyed directed graph over dependency-parse tokens.
//!
//! Nodes are addressed by a [NodeKey] rather than an index: graph
//! construction starts from `(text, range)` token keys, contracts the tokens
//! covered by an entity span into one entity node, and later relabels
//! everything again during corpus assembly. Relabeling two nodes onto the
//! same key merges them, which is how identical unlinked words inside a
//! sentence collapse into one node.
//!
//! Node enumeration follows insertion order, so adjacency matrices and
//! global id assignment are deterministic.
use std::collections::{BTreeSet, HashMap};

use itertools::Itertools;
use ndarray::Array2;
use serde::Serialize;

/// Node identity. Starts out as a token, may become an entity or a plain
/// word after contraction/relabeling, and ends up as a global mention id
/// once the corpus is assembled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum NodeKey {
    /// A parsed token at a character range within its sentence.
    Token { text: String, start: usize, end: usize },
    /// A linked entity, keyed by its external identifier.
    Entity { uri: String },
    /// An unlinked word, keyed by surface text alone.
    Word { text: String },
    /// A globally renumbered mention.
    Mention { id: usize },
}

impl NodeKey {
    pub fn token(text: &str, range: (usize, usize)) -> Self {
        NodeKey::Token {
            text: text.to_string(),
            start: range.0,
            end: range.1,
        }
    }

    pub fn entity(uri: &str) -> Self {
        NodeKey::Entity {
            uri: uri.to_string(),
        }
    }

    pub fn word(text: &str) -> Self {
        NodeKey::Word {
            text: text.to_string(),
        }
    }

    /// External entity identifier, if this node has one.
    pub fn uri(&self) -> Option<&str> {
        match self {
            NodeKey::Entity { uri } => Some(uri),
            _ => None,
        }
    }
}

/// Attributes accumulated on a node during construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NodeData {
    /// Display name (raw token text of the node, or of the contraction
    /// survivor).
    pub name: String,
    /// Character sub-ranges this node covers. Grows when nodes are merged.
    pub ranges: Vec<(usize, usize)>,
    /// Known aliases, present once the node has been linked to an entity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surfaceform: Option<BTreeSet<String>>,
}

/// Directed edge `head -> dependent` with its syntactic labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DependencyEdge {
    pub head: NodeKey,
    pub dependent: NodeKey,
    pub dep: String,
    pub pos: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct Node {
    key: NodeKey,
    #[serde(flatten)]
    data: NodeData,
}

/// Directed graph with keyed nodes, serialized as node/edge lists.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DependencyGraph {
    nodes: Vec<Node>,
    edges: Vec<DependencyEdge>,
    #[serde(skip)]
    index: HashMap<NodeKey, usize>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Node keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &NodeKey> {
        self.nodes.iter().map(|n| &n.key)
    }

    pub fn contains(&self, key: &NodeKey) -> bool {
        self.index.contains_key(key)
    }

    pub fn node(&self, key: &NodeKey) -> Option<&NodeData> {
        self.index.get(key).map(|i| &self.nodes[*i].data)
    }

    pub fn edges(&self) -> &[DependencyEdge] {
        &self.edges
    }

    /// Get-or-insert access to a node's attributes.
    pub fn node_mut(&mut self, key: &NodeKey) -> &mut NodeData {
        let idx = match self.index.get(key) {
            Some(idx) => *idx,
            None => {
                let idx = self.nodes.len();
                self.nodes.push(Node {
                    key: key.clone(),
                    data: NodeData::default(),
                });
                self.index.insert(key.clone(), idx);
                idx
            }
        };
        &mut self.nodes[idx].data
    }

    /// Adds a `head -> dependent` edge, creating missing endpoints.
    /// A second edge between the same endpoints replaces the labels of the
    /// first instead of duplicating it.
    pub fn add_edge(&mut self, head: &NodeKey, dependent: &NodeKey, dep: &str, pos: &str) {
        self.node_mut(head);
        self.node_mut(dependent);

        if let Some(edge) = self
            .edges
            .iter_mut()
            .find(|e| &e.head == head && &e.dependent == dependent)
        {
            edge.dep = dep.to_string();
            edge.pos = pos.to_string();
            return;
        }
        self.edges.push(DependencyEdge {
            head: head.clone(),
            dependent: dependent.clone(),
            dep: dep.to_string(),
            pos: pos.to_string(),
        });
    }

    /// Contracts `removed` into `kept`: attributes merge, every edge
    /// touching `removed` is re-pointed at `kept`, and edges that would
    /// become self-loops are dropped.
    pub fn contract(&mut self, kept: &NodeKey, removed: &NodeKey) {
        if kept == removed || !self.contains(removed) {
            return;
        }

        let removed_data = self.remove_node(removed);
        let data = self.node_mut(kept);
        data.ranges.extend(removed_data.ranges);
        if data.surfaceform.is_none() {
            data.surfaceform = removed_data.surfaceform;
        }
        if data.name.is_empty() {
            data.name = removed_data.name;
        }

        // edges between the two endpoints would turn into self-loops
        self.edges.retain(|e| {
            !(&e.head == kept && &e.dependent == removed)
                && !(&e.head == removed && &e.dependent == kept)
                && !(&e.head == removed && &e.dependent == removed)
        });
        for edge in &mut self.edges {
            if &edge.head == removed {
                edge.head = kept.clone();
            }
            if &edge.dependent == removed {
                edge.dependent = kept.clone();
            }
        }
        self.dedup_edges();
    }

    /// Renames nodes according to `mapping`; keys absent from the mapping
    /// are untouched. Nodes mapped onto the same key merge, keeping the
    /// position of the first of them; an edge between two merged nodes
    /// becomes a self-loop.
    pub fn relabel(&mut self, mapping: &HashMap<NodeKey, NodeKey>) {
        let relabeled: Vec<(NodeKey, NodeData)> = self
            .nodes
            .drain(..)
            .map(|node| {
                let key = mapping.get(&node.key).unwrap_or(&node.key).clone();
                (key, node.data)
            })
            .collect();

        let order: Vec<NodeKey> = relabeled.iter().map(|(k, _)| k.clone()).unique().collect();

        self.index.clear();
        for key in order {
            self.index.insert(key.clone(), self.nodes.len());
            self.nodes.push(Node {
                key,
                data: NodeData::default(),
            });
        }
        for (key, data) in relabeled {
            let idx = self.index[&key];
            let merged = &mut self.nodes[idx].data;
            merged.ranges.extend(data.ranges);
            if merged.name.is_empty() {
                merged.name = data.name;
            }
            if merged.surfaceform.is_none() {
                merged.surfaceform = data.surfaceform;
            }
        }

        for edge in &mut self.edges {
            if let Some(head) = mapping.get(&edge.head) {
                edge.head = head.clone();
            }
            if let Some(dependent) = mapping.get(&edge.dependent) {
                edge.dependent = dependent.clone();
            }
        }
        self.dedup_edges();
    }

    /// Adjacency matrix over nodes in enumeration order: `[i, j] = 1` iff
    /// an edge `i -> j` exists.
    pub fn adjacency_matrix(&self) -> Array2<f32> {
        let n = self.nodes.len();
        let mut matrix = Array2::<f32>::zeros((n, n));
        for edge in &self.edges {
            if let (Some(i), Some(j)) = (self.index.get(&edge.head), self.index.get(&edge.dependent))
            {
                matrix[[*i, *j]] = 1.0;
            }
        }
        matrix
    }

    fn remove_node(&mut self, key: &NodeKey) -> NodeData {
        let idx = self.index.remove(key).expect("node to remove exists");
        let node = self.nodes.remove(idx);
        for shifted in self.index.values_mut() {
            if *shifted > idx {
                *shifted -= 1;
            }
        }
        node.data
    }

    /// Keeps the first edge of every `(head, dependent)` pair.
    fn dedup_edges(&mut self) {
        let mut seen: Vec<(NodeKey, NodeKey)> = Vec::with_capacity(self.edges.len());
        self.edges.retain(|e| {
            let pair = (e.head.clone(), e.dependent.clone());
            if seen.contains(&pair) {
                false
            } else {
                seen.push(pair);
                true
            }
        });
    }
}

//! T-REx-style corpus documents.
//!
//! A corpus file is a JSON array of documents, each carrying raw text,
//! sentence boundaries and entity annotations from several annotators.
//! Only annotations whose annotator name contains `Entity` are considered
//! entity-linked; the others (dates, coreference, ...) are ignored here.
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::graph::spans::Span;

/// One annotated mention inside a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMention {
    pub surfaceform: String,
    pub uri: String,
    /// Character interval, document-relative until
    /// [Document::sentence_entities] translates it.
    pub boundaries: Span,
    pub annotator: String,
}

impl EntityMention {
    /// Whether this mention comes from an entity-linking annotator.
    pub fn is_entity_linked(&self) -> bool {
        self.annotator.contains("Entity")
    }
}

/// Opaque per-document information carried along with each sentence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

/// A corpus document.
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    pub text: String,
    #[serde(default)]
    pub entities: Vec<EntityMention>,
    #[serde(default)]
    pub sentences_boundaries: Vec<Span>,
    #[serde(default)]
    pub docid: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
}

impl Document {
    pub fn info(&self) -> DocInfo {
        DocInfo {
            docid: self.docid.clone(),
            title: self.title.clone(),
            uri: self.uri.clone(),
        }
    }

    /// Entity-linked mentions of this document.
    pub fn entity_linked(&self) -> impl Iterator<Item = &EntityMention> {
        self.entities.iter().filter(|e| e.is_entity_linked())
    }

    /// Text of the sentence at `boundary` (character offsets).
    pub fn sentence_text(&self, boundary: Span) -> Result<String, Error> {
        char_slice(&self.text, boundary)
    }

    /// Entity-linked mentions falling inside `boundary`, with their
    /// boundaries translated into sentence-local coordinates. Each call
    /// returns fresh copies, so per-sentence span resolution never touches
    /// the document's annotations.
    pub fn sentence_entities(&self, boundary: Span) -> Result<BTreeMap<Span, EntityMention>, Error> {
        let mut entities = BTreeMap::new();
        for mention in self.entity_linked() {
            let (start, end) = mention.boundaries;
            if start < boundary.0 || end > boundary.1 {
                continue;
            }
            if start >= end {
                return Err(Error::MalformedInput(format!(
                    "empty entity span {:?} for {}",
                    mention.boundaries, mention.surfaceform
                )));
            }
            let local = (start - boundary.0, end - boundary.0);
            let mut mention = mention.clone();
            mention.boundaries = local;
            entities.insert(local, mention);
        }
        Ok(entities)
    }
}

/// Reads a corpus file (JSON array of documents).
pub fn read_corpus(path: &Path) -> Result<Vec<Document>, Error> {
    let file = File::open(path)?;
    let documents = serde_json::from_reader(BufReader::new(file))?;
    Ok(documents)
}

/// Corpus-wide surface-form lookup: entity identifier to the set of surface
/// forms it was annotated with, across every document.
pub fn surface_forms(documents: &[Document]) -> HashMap<String, BTreeSet<String>> {
    let mut lookup: HashMap<String, BTreeSet<String>> = HashMap::new();
    for mention in documents.iter().flat_map(|d| d.entity_linked()) {
        lookup
            .entry(mention.uri.clone())
            .or_default()
            .insert(mention.surfaceform.clone());
    }
    lookup
}

/// Slices `text` by character offsets.
fn char_slice(text: &str, (start, end): Span) -> Result<String, Error> {
    let char_count = text.chars().count();
    if start > end || end > char_count {
        return Err(Error::MalformedInput(format!(
            "boundary ({}, {}) outside text of {} chars",
            start, end, char_count
        )));
    }
    Ok(text.chars().skip(start).take(end - start).collect())
}

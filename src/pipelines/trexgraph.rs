//! T-REx graph-construction pipeline.
//!
//! A corpus dump is composed of files,
//! Each file is composed of documents,
//! Each document is composed of sentences with entity annotations.
//!
//! # Processing
//! 1. Every document's entity-linked annotations are collected into a
//!    corpus-wide surface-form lookup.
//! 1. Sentences are produced lazily, one document at a time: annotations are
//!    restricted to the sentence, translated to sentence-local offsets, and
//!    overlapping spans removed.
//! 1. Each sentence gets its dependency graph built and its entity spans
//!    contracted; a sentence that cannot be parsed is skipped.
//! 1. Sentence graphs are assembled into a multi-document graph and written
//!    as one batch per corpus file.
use std::path::{Path, PathBuf};

use glob::glob;
use itertools::Itertools;
use log::{debug, error, info, warn};

use crate::error::Error;
use crate::graph::spans::{self, Span};
use crate::graph::{MultiDocGraph, Sentence, SurfaceForms};
use crate::io::BatchWriter;
use crate::parsing::{Parse, ParseStore};
use crate::pipelines::pipeline::Pipeline;
use crate::sources::trex::{self, Document};

pub struct TrexGraph {
    src: PathBuf,
    dst: PathBuf,
    parses: PathBuf,
}

impl TrexGraph {
    pub fn new(src: PathBuf, dst: PathBuf, parses: PathBuf) -> Self {
        Self { src, dst, parses }
    }

    /// Corpus files under the source directory, in stable name order.
    fn corpus_files(&self) -> Result<Vec<PathBuf>, Error> {
        let pattern = format!("{}/*.json", self.src.display());
        let files: Result<Vec<PathBuf>, glob::GlobError> = glob(&pattern)?.collect();
        Ok(files?.into_iter().sorted().collect())
    }

    /// Processes one corpus file into one written batch.
    fn process_file<P: Parse>(path: &Path, parser: &P, writer: &BatchWriter) -> Result<(), Error> {
        let documents = trex::read_corpus(path)?;
        info!("{:?}: {} documents", path, documents.len());

        let surface_forms = trex::surface_forms(&documents);
        debug!("{} distinct linked entities", surface_forms.len());

        let mut sentences = Vec::new();
        for result in SentenceIter::new(&documents, &surface_forms, parser) {
            match result {
                Ok(sentence) => sentences.push(sentence),
                Err(e) => error!("skipping sentence: {:?}", e),
            }
        }
        info!("{:?}: {} sentences with graphs", path, sentences.len());

        let graph = MultiDocGraph::new(sentences);

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| Error::Custom(format!("no file stem for {:?}", path)))?;
        writer.write(stem, &graph)?;
        Ok(())
    }
}

impl Pipeline<()> for TrexGraph {
    fn version() -> &'static str {
        "0.1.0"
    }

    fn run(&self) -> Result<(), Error> {
        let parser = ParseStore::from_path(&self.parses)?;
        if parser.is_empty() {
            warn!("parse store is empty, every sentence will be skipped");
        }

        let writer = BatchWriter::new(&self.dst)?;
        let files = self.corpus_files()?;
        info!("{} corpus files in {:?}", files.len(), self.src);

        for (index, path) in files.iter().enumerate() {
            info!("processing file {}/{}: {:?}", index + 1, files.len(), path);
            if let Err(e) = Self::process_file(path, &parser, &writer) {
                error!("error with corpus file {:?}: {:?}", path, e);
            }
        }
        Ok(())
    }
}

/// Lazy, forward-only producer of sentences over a document list.
///
/// Sentence ids increase monotonically across documents. Each item is the
/// result of building one sentence; failures (malformed boundaries, parser
/// errors) are yielded per sentence so the consumer decides whether to skip
/// or abort.
pub struct SentenceIter<'a, P: Parse> {
    documents: &'a [Document],
    surface_forms: &'a SurfaceForms,
    parser: &'a P,
    doc_index: usize,
    boundary_index: usize,
    sentence_id: usize,
}

impl<'a, P: Parse> SentenceIter<'a, P> {
    pub fn new(documents: &'a [Document], surface_forms: &'a SurfaceForms, parser: &'a P) -> Self {
        Self {
            documents,
            surface_forms,
            parser,
            doc_index: 0,
            boundary_index: 0,
            sentence_id: 0,
        }
    }

    fn build_sentence(&self, doc: &Document, boundary: Span, id: usize) -> Result<Sentence, Error> {
        let text = doc.sentence_text(boundary)?;
        let mut entities = doc.sentence_entities(boundary)?;
        spans::remove_overlapping(&mut entities);

        debug!("sentence {}: {}", id, text);
        Sentence::build(id, text, entities, self.surface_forms, doc.info(), self.parser)
    }
}

impl<'a, P: Parse> Iterator for SentenceIter<'a, P> {
    type Item = Result<Sentence, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let doc = self.documents.get(self.doc_index)?;
            match doc.sentences_boundaries.get(self.boundary_index) {
                None => {
                    self.doc_index += 1;
                    self.boundary_index = 0;
                }
                Some(boundary) => {
                    let id = self.sentence_id;
                    self.sentence_id += 1;
                    self.boundary_index += 1;
                    return Some(self.build_sentence(doc, *boundary, id));
                }
            }
        }
    }
}

//! Dependency-parse collaborator.
//!
//! Parsing itself happens outside this crate: an external parser is run over
//! the corpus beforehand and its output is consumed here through the [Parse]
//! trait. [ParseStore] is the shipped implementation, backed by a JSON file
//! mapping sentence text to its token list.
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A single token of a dependency parse: surface text, character start
/// offset, a pointer to its syntactic head (text + offset), and the
/// dependency/POS labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedToken {
    pub text: String,
    pub start: usize,
    pub head_text: String,
    pub head_start: usize,
    pub dep: String,
    pub pos: String,
}

impl ParsedToken {
    /// Character range covered by the token.
    pub fn range(&self) -> (usize, usize) {
        (self.start, self.start + self.text.chars().count())
    }

    /// Character range covered by the token's head.
    pub fn head_range(&self) -> (usize, usize) {
        (
            self.head_start,
            self.head_start + self.head_text.chars().count(),
        )
    }

    /// The sentence root points at itself.
    pub fn is_root(&self) -> bool {
        self.text == self.head_text && self.start == self.head_start
    }
}

/// Parsing trait.
///
/// Returns the ordered token sequence for one sentence. An empty token list
/// is a valid result (the sentence yields an empty graph); failure to parse
/// is an error for that sentence only.
pub trait Parse {
    fn parse(&self, sentence: &str) -> Result<Vec<ParsedToken>, Error>;
}

/// Precomputed parses, keyed by sentence text.
pub struct ParseStore {
    parses: HashMap<String, Vec<ParsedToken>>,
}

impl ParseStore {
    /// Loads a store from a JSON file of `{sentence text: [tokens]}`.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let file = File::open(path)?;
        let parses = serde_json::from_reader(BufReader::new(file))?;
        Ok(Self { parses })
    }

    pub fn len(&self) -> usize {
        self.parses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parses.is_empty()
    }
}

impl Parse for ParseStore {
    fn parse(&self, sentence: &str) -> Result<Vec<ParsedToken>, Error> {
        self.parses
            .get(sentence)
            .cloned()
            .ok_or_else(|| Error::Parse(format!("no parse available for sentence: {}", sentence)))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn store_roundtrip() {
        let token = ParsedToken {
            text: "Paris".to_string(),
            start: 0,
            head_text: "is".to_string(),
            head_start: 6,
            dep: "nsubj".to_string(),
            pos: "PROPN".to_string(),
        };
        let parses = HashMap::from([("Paris is.".to_string(), vec![token.clone()])]);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&parses).unwrap().as_bytes())
            .unwrap();

        let store = ParseStore::from_path(file.path()).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.parse("Paris is.").unwrap(), vec![token]);
    }

    #[test]
    fn missing_sentence_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{}").unwrap();

        let store = ParseStore::from_path(file.path()).unwrap();
        assert!(matches!(
            store.parse("never seen"),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn token_ranges_use_character_offsets() {
        let token = ParsedToken {
            text: "Mon–Khmer".to_string(),
            start: 4,
            head_text: "languages".to_string(),
            head_start: 14,
            dep: "compound".to_string(),
            pos: "PROPN".to_string(),
        };

        assert_eq!(token.range(), (4, 13));
        assert_eq!(token.head_range(), (14, 23));
    }
}

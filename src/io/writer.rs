//! Graph batch writer.
//!
//! One JSON file per processed corpus file, named after the input file stem.
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::Error;
use crate::graph::MultiDocGraph;

pub struct BatchWriter {
    dst: PathBuf,
}

impl BatchWriter {
    /// Creates a writer rooted at `dst`, creating the directory when
    /// missing.
    pub fn new(dst: &Path) -> Result<Self, Error> {
        if !dst.exists() {
            std::fs::create_dir_all(dst)?;
        }
        if !dst.is_dir() {
            return Err(Error::Custom(format!(
                "destination must be a directory: {:?}",
                dst
            )));
        }
        Ok(Self {
            dst: dst.to_path_buf(),
        })
    }

    /// Writes one batch to `<stem>.graphs.json`, returning the path.
    pub fn write(&self, stem: &str, batch: &MultiDocGraph) -> Result<PathBuf, Error> {
        let mut path = self.dst.clone();
        path.push(format!("{}.graphs.json", stem));
        debug!("writing batch to {:?}", path);

        let file = File::create(&path)?;
        serde_json::to_writer(BufWriter::new(file), batch)?;
        Ok(path)
    }
}

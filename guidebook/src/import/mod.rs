//! Markdown guides to block sequences.

pub mod error;
mod structural;

pub use error::ImportError;

use crate::block::ContentBlock;

/// A successful import: the blocks plus any warnings raised on the way.
#[derive(Debug, Clone)]
pub struct Imported {
    pub blocks: Vec<ContentBlock>,
    pub warnings: Vec<ImportError>,
}

/// Import entry point.
pub struct Importer {
    source: String,
    file_id: usize,
}

impl Importer {
    pub fn new(source: String, file_id: usize) -> Self {
        Importer { source, file_id }
    }

    /// Import the Markdown source. On failure every diagnostic is returned,
    /// warnings included, so they can be reported together.
    pub fn import(&self) -> Result<Imported, Vec<ImportError>> {
        structural::import_blocks(&self.source, self.file_id)
    }
}

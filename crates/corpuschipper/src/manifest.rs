//! # Vocabulary Manifest

use std::{fs::File, io::BufWriter, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    backends::TextTokenizer,
    errors::{CCResult, CorpusError},
    types::TokenType,
};

/// The sidecar record describing the vocabulary of a produced dataset.
///
/// `itos` / `stoi` are opaque tags identifying which decode/encode table
/// applies; downstream consumers treat them as metadata. The manifest is
/// written once per run, after the splits, and is never re-read by this
/// pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Number of distinct token ids in the vocabulary.
    pub vocab_size: usize,

    /// Decode-table tag.
    pub itos: String,

    /// Encode-table tag.
    pub stoi: String,
}

impl Manifest {
    /// Describe a mounted tokenizer backend.
    pub fn for_tokenizer<T: TokenType>(tokenizer: &dyn TextTokenizer<T>) -> Self {
        let identity = tokenizer.identity().to_string();
        Self {
            vocab_size: tokenizer.vocab_size(),
            itos: identity.clone(),
            stoi: identity,
        }
    }

    /// Write the manifest as JSON.
    pub fn write_to_path<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> CCResult<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self).map_err(|e| CorpusError::Parse(e.to_string()))
    }
}

//! # Subword Tokenizer Backend

use std::path::Path;

use crate::{
    backends::TextTokenizer,
    errors::{CCResult, CorpusError},
    types::TokenType,
};

/// Generic large-vocabulary subword backend.
///
/// Wraps a Hugging Face `tokenizers` tokenizer loaded from a
/// `tokenizer.json` file. Vocab sizes are in the tens of thousands;
/// token streams produced with this backend need a 32-bit element width.
pub struct SubwordTokenizer {
    inner: tokenizers::Tokenizer,
    identity: String,
}

impl SubwordTokenizer {
    /// Load a tokenizer from a `tokenizer.json` file.
    ///
    /// Backend load failures propagate as [`CorpusError::Backend`].
    pub fn from_file<P: AsRef<Path>>(path: P) -> CCResult<Self> {
        let path = path.as_ref();
        let inner = tokenizers::Tokenizer::from_file(path)
            .map_err(|e| CorpusError::Backend(e.to_string()))?;

        let tag = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            inner,
            identity: format!("tokenizers::Tokenizer::{tag}"),
        })
    }
}

impl<T: TokenType> TextTokenizer<T> for SubwordTokenizer {
    fn try_encode(
        &self,
        text: &str,
    ) -> CCResult<Vec<T>> {
        let encoding = self
            .inner
            .encode(text, false)
            .map_err(|e| CorpusError::Backend(e.to_string()))?;

        encoding
            .get_ids()
            .iter()
            .map(|&id| T::from_u32(id).ok_or(CorpusError::TokenOutOfRange))
            .collect()
    }

    fn try_decode(
        &self,
        tokens: &[T],
    ) -> CCResult<String> {
        let ids = tokens
            .iter()
            .map(|token| token.to_u32().ok_or(CorpusError::TokenOutOfRange))
            .collect::<CCResult<Vec<u32>>>()?;

        self.inner
            .decode(&ids, false)
            .map_err(|e| CorpusError::Backend(e.to_string()))
    }

    fn vocab_size(&self) -> usize {
        self.inner.get_vocab_size(true)
    }

    fn identity(&self) -> &str {
        &self.identity
    }
}

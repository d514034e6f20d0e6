//! # Script Character Tokenizer
//!
//! A bounded-vocabulary, script-aware character tokenizer. The
//! character/token table is loaded from a JSON vocabulary file built for a
//! single writing system; characters outside the table map to the table's
//! `unknown` token, which is what makes round-trip validation reject
//! out-of-script files instead of silently corrupting them.

use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    backends::TextTokenizer,
    errors::{CCResult, CorpusError},
    types::{CCHashMap, TokenType},
};

/// One character/token binding in a vocabulary table file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharBinding {
    /// The character.
    pub ch: char,

    /// Its token id.
    pub token: u32,
}

/// Serialized form of a script vocabulary table.
///
/// The table declares its own `maximum` id; the vocabulary size is
/// `maximum + 1` whether or not the ids are densely used. The `unknown`
/// and `end_of_text` characters must both be bound by `entries`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptVocabFile {
    /// The script this table covers (e.g. "telugu", "devanagari").
    pub script: String,

    /// Character/token bindings.
    pub entries: Vec<CharBinding>,

    /// The maximum token id in the table.
    pub maximum: u32,

    /// Substitute character for out-of-script input.
    pub unknown: char,

    /// File-framing marker character.
    pub end_of_text: char,
}

impl ScriptVocabFile {
    /// Read a vocabulary table from a JSON file.
    pub fn read_from_file<P: AsRef<Path>>(path: P) -> CCResult<Self> {
        let reader = BufReader::new(File::open(path)?);
        serde_json::from_reader(reader).map_err(|e| CorpusError::Parse(e.to_string()))
    }
}

/// Bounded-vocabulary script-aware character tokenizer.
///
/// Vocab sizes are in the thousands; token streams produced with this
/// backend fit a 16-bit element width.
pub struct ScriptTokenizer {
    char_tokens: CCHashMap<char, u32>,
    token_chars: Vec<char>,
    unknown_token: u32,
    end_of_text_token: u32,
    identity: String,
}

impl ScriptTokenizer {
    /// Load a tokenizer from a JSON vocabulary table file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> CCResult<Self> {
        Self::from_table(ScriptVocabFile::read_from_file(path)?)
    }

    /// Build a tokenizer from a vocabulary table.
    ///
    /// ## Arguments
    /// * `table` - The vocabulary table.
    ///
    /// ## Returns
    /// A new `ScriptTokenizer`, or a parse error if the table binds an id
    /// above its declared `maximum`, or leaves `unknown`/`end_of_text`
    /// unbound.
    pub fn from_table(table: ScriptVocabFile) -> CCResult<Self> {
        let mut char_tokens: CCHashMap<char, u32> = CCHashMap::default();
        let mut token_chars = vec![table.unknown; (table.maximum as usize) + 1];

        for binding in &table.entries {
            if binding.token > table.maximum {
                return Err(CorpusError::Parse(format!(
                    "table {:?} binds token {} above its maximum {}",
                    table.script, binding.token, table.maximum
                )));
            }
            char_tokens.insert(binding.ch, binding.token);
            token_chars[binding.token as usize] = binding.ch;
        }

        for marker in [table.unknown, table.end_of_text] {
            if !char_tokens.contains_key(&marker) {
                return Err(CorpusError::Parse(format!(
                    "table {:?} has no binding for marker {marker:?}",
                    table.script
                )));
            }
        }

        Ok(Self {
            unknown_token: char_tokens[&table.unknown],
            end_of_text_token: char_tokens[&table.end_of_text],
            char_tokens,
            token_chars,
            identity: format!("corpuschipper::ScriptTokenizer::{}", table.script),
        })
    }

    fn char_token(
        &self,
        ch: char,
    ) -> u32 {
        match self.char_tokens.get(&ch) {
            Some(&token) => token,
            None => self.unknown_token,
        }
    }
}

impl<T: TokenType> TextTokenizer<T> for ScriptTokenizer {
    fn try_encode(
        &self,
        text: &str,
    ) -> CCResult<Vec<T>> {
        text.chars()
            .map(|ch| T::from_u32(self.char_token(ch)).ok_or(CorpusError::TokenOutOfRange))
            .collect()
    }

    fn try_encode_file(
        &self,
        path: &Path,
    ) -> CCResult<Vec<T>> {
        let text = std::fs::read_to_string(path)?;

        // File encodings are framed with a leading end-of-text marker.
        let mut tokens =
            vec![T::from_u32(self.end_of_text_token).ok_or(CorpusError::TokenOutOfRange)?];
        tokens.extend(TextTokenizer::<T>::try_encode(self, &text)?);
        Ok(tokens)
    }

    fn try_decode(
        &self,
        tokens: &[T],
    ) -> CCResult<String> {
        let mut text = String::with_capacity(tokens.len());
        for &token in tokens {
            let id = token.to_usize().ok_or(CorpusError::TokenOutOfRange)?;
            match self.token_chars.get(id) {
                Some(&ch) => text.push(ch),
                None => {
                    return Err(CorpusError::VocabMismatch {
                        token: id as u64,
                        vocab_size: self.token_chars.len(),
                    });
                }
            }
        }
        Ok(text)
    }

    fn vocab_size(&self) -> usize {
        self.token_chars.len()
    }

    fn identity(&self) -> &str {
        &self.identity
    }

    fn decoded_prefix(&self) -> usize {
        1
    }
}

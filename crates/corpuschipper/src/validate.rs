//! # Acceptance Checks
//!
//! Two gates stand between a tokenizer's output and a split stream: the
//! vocabulary bound check, and the round-trip validator.

use crate::{
    backends::TextTokenizer,
    errors::{CCResult, CorpusError},
    types::TokenType,
};

/// Policy for out-of-range token ids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VocabPolicy {
    /// Report each offending id and continue.
    #[default]
    Warn,

    /// Abort the run on the first offending id.
    Fail,
}

/// Check every token id against `[0, vocab_size)`.
///
/// Out-of-range ids indicate a tokenizer/vocabulary mismatch; they are
/// never clamped. Under [`VocabPolicy::Warn`] each is logged and counted;
/// under [`VocabPolicy::Fail`] the first becomes an error.
///
/// ## Arguments
/// * `tokens` - The encoded token ids.
/// * `vocab_size` - The declared vocabulary size.
/// * `policy` - The mismatch policy.
///
/// ## Returns
/// The number of out-of-range ids observed.
pub fn check_vocab_bound<T: TokenType>(
    tokens: &[T],
    vocab_size: usize,
    policy: VocabPolicy,
) -> CCResult<usize> {
    let mut found = 0;
    for &token in tokens {
        let id = token.to_u64().ok_or(CorpusError::TokenOutOfRange)?;
        if id >= vocab_size as u64 {
            log::warn!("token {id} outside vocabulary range [0, {vocab_size})");
            if policy == VocabPolicy::Fail {
                return Err(CorpusError::VocabMismatch {
                    token: id,
                    vocab_size,
                });
            }
            found += 1;
        }
    }
    Ok(found)
}

/// Round-trip gate: accept a file only if decoding its own encoding
/// reproduces the original text.
///
/// Some backends frame file encodings with a marker token that decodes
/// back out as text; `prefix` is the per-backend count of leading
/// characters to strip before comparing. It is configuration, not a
/// constant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundTripValidator {
    prefix: usize,
}

impl RoundTripValidator {
    /// Build a validator with an explicit decoded prefix.
    pub fn with_prefix(prefix: usize) -> Self {
        Self { prefix }
    }

    /// Build a validator for a mounted backend.
    pub fn for_backend<T: TokenType>(tokenizer: &dyn TextTokenizer<T>) -> Self {
        Self {
            prefix: tokenizer.decoded_prefix(),
        }
    }

    /// Accept or reject a decoded rendition of `original`.
    pub fn accept(
        &self,
        original: &str,
        decoded: &str,
    ) -> bool {
        let mut chars = decoded.chars();
        for _ in 0..self.prefix {
            if chars.next().is_none() {
                return original.is_empty();
            }
        }
        chars.as_str() == original
    }
}

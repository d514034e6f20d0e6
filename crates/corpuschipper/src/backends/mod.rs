//! # Tokenizer Backends
//!
//! The compiler treats tokenization as an opaque capability: a backend
//! turns text into token ids and back, and declares the size of its
//! vocabulary. Nothing downstream of the adapter contract depends on the
//! backend's internal algorithm.

mod script;
#[cfg(feature = "subword")]
mod subword;

#[doc(inline)]
pub use script::*;
#[cfg(feature = "subword")]
#[doc(inline)]
pub use subword::*;

use std::path::Path;

use crate::{errors::CCResult, types::TokenType};

/// A pluggable text tokenizer backend.
///
/// Implementations are polymorphic over the output token width `T`;
/// an id that does not fit `T` is an error, never a truncation.
pub trait TextTokenizer<T: TokenType>: Send + Sync {
    /// Encode text into tokens.
    ///
    /// ## Arguments
    /// * `text` - The text to encode.
    ///
    /// ## Returns
    /// A `Result` containing the vector of tokens or an error.
    fn try_encode(
        &self,
        text: &str,
    ) -> CCResult<Vec<T>>;

    /// Encode a whole file into tokens.
    ///
    /// The default implementation reads the file as UTF-8 and delegates to
    /// [`Self::try_encode`]; backends may override it to add file-level
    /// framing. Backends that do must report the framing via
    /// [`Self::decoded_prefix`].
    ///
    /// ## Arguments
    /// * `path` - The file to encode.
    ///
    /// ## Returns
    /// A `Result` containing the vector of tokens or an error.
    fn try_encode_file(
        &self,
        path: &Path,
    ) -> CCResult<Vec<T>> {
        let text = std::fs::read_to_string(path)?;
        self.try_encode(&text)
    }

    /// Decode tokens back into text.
    ///
    /// ## Arguments
    /// * `tokens` - The tokens to decode.
    ///
    /// ## Returns
    /// A `Result` containing the decoded text or an error.
    fn try_decode(
        &self,
        tokens: &[T],
    ) -> CCResult<String>;

    /// The number of distinct token ids.
    ///
    /// Every id this backend produces is expected to be `< vocab_size()`;
    /// see [`crate::validate::check_vocab_bound`].
    fn vocab_size(&self) -> usize;

    /// Opaque tag identifying which encode/decode table applies.
    fn identity(&self) -> &str;

    /// Leading characters prepended to decodes of [`Self::try_encode_file`]
    /// encodings.
    ///
    /// Backends that frame file encodings with a marker token decode that
    /// marker back out as text; the round-trip validator strips this many
    /// characters before comparing. Defaults to 0.
    fn decoded_prefix(&self) -> usize {
        0
    }
}

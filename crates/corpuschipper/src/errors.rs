//! # Error Types

/// Errors from corpuschipper operations.
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    /// A token id outside `[0, vocab_size)` was observed.
    #[error("token {token} outside vocabulary range [0, {vocab_size})")]
    VocabMismatch {
        /// The offending token id.
        token: u64,

        /// The declared vocabulary size.
        vocab_size: usize,
    },

    /// Token value out of range for the target type.
    #[error("token out of range")]
    TokenOutOfRange,

    /// A split exhausted its corpus below the target size.
    #[error("split {name:?} exhausted the corpus at {len} tokens (target {target})")]
    TargetNotReached {
        /// The split name.
        name: String,

        /// The accumulated token count.
        len: usize,

        /// The configured target size.
        target: usize,
    },

    /// Error from a tokenizer backend.
    #[error("tokenizer backend: {0}")]
    Backend(String),

    /// Parse error (vocabulary table, manifest, etc.)
    #[error("parse error: {0}")]
    Parse(String),

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for corpuschipper operations.
pub type CCResult<T> = core::result::Result<T, CorpusError>;

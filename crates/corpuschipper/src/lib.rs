//! # `corpuschipper` Corpus-to-Dataset Compiler
//!
//! Compiles raw text corpora (poetry collections, wiki dumps) into
//! fixed-width integer token streams suitable for character/subword-level
//! LM training, plus a sidecar manifest describing the vocabulary.
//!
//! See:
//! * [`backends`] for the tokenizer adapter contract and backends.
//! * [`walker`] to consume a directory tree into size-bounded splits.
//! * [`accumulator`] for the split stream and its raw serialization.
//! * [`compiler`] for the end-to-end pipelines.
//!
//! ## Crate Features
//!
//! #### feature: ``ahash``
//!
//! This swaps all HashMap/HashSet implementations for ``ahash``; which is a
//! performance win on many/(most?) modern CPUs.
//!
//! This is done by the ``types::CCHash{*}`` type alias machinery.
//!
//! #### feature: ``subword``
//!
//! Enables the Hugging Face ``tokenizers`` subword backend;
//! see [`backends::SubwordTokenizer`].
//!
//! ## Compiling a Corpus
//!
//! ```rust,ignore
//! use corpuschipper::{compile_corpus, CompilerOptions, ScriptTokenizer};
//!
//! let tokenizer = ScriptTokenizer::from_file("telugu_vocab.json")?;
//! let report = compile_corpus::<u16>(
//!     "corpus/".as_ref(),
//!     &tokenizer,
//!     &CompilerOptions::default(),
//! )?;
//! ```
#![warn(missing_docs, unused)]

pub mod accumulator;
pub mod backends;
pub mod compiler;
pub mod errors;
pub mod manifest;
pub mod types;
pub mod validate;
pub mod walker;

#[doc(inline)]
pub use accumulator::{TokenAccumulator, tokens_from_le_bytes};
#[cfg(feature = "subword")]
#[doc(inline)]
pub use backends::SubwordTokenizer;
#[doc(inline)]
pub use backends::{ScriptTokenizer, TextTokenizer};
#[doc(inline)]
pub use compiler::{CompileReport, CompilerOptions, compile_corpus, compile_pair};
#[doc(inline)]
pub use errors::{CCResult, CorpusError};
#[doc(inline)]
pub use manifest::Manifest;
#[doc(inline)]
pub use types::TokenType;
#[doc(inline)]
pub use validate::{RoundTripValidator, VocabPolicy, check_vocab_bound};
#[doc(inline)]
pub use walker::{
    ExhaustPolicy,
    SplitReport,
    SplitSpec,
    VisitedSet,
    WalkOptions,
    build_split,
};

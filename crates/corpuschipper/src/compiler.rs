//! # Corpus Compiler Pipelines
//!
//! Two invocation surfaces: directory mode, which derives both splits from
//! one tree by size-bounded consumption; and file-pair mode, which encodes
//! a fixed training/validation file pair in full.

use std::path::{Path, PathBuf};

use crate::{
    accumulator::TokenAccumulator,
    backends::TextTokenizer,
    errors::CCResult,
    manifest::Manifest,
    types::TokenType,
    validate::{VocabPolicy, check_vocab_bound},
    walker::{SplitReport, SplitSpec, VisitedSet, WalkOptions, build_split},
};

/// The training split filename.
pub const TRAIN_BIN: &str = "train.bin";

/// The validation split filename.
pub const VAL_BIN: &str = "val.bin";

/// The manifest filename.
pub const META_JSON: &str = "meta.json";

/// Options for a compiler run.
#[derive(Debug, Clone)]
pub struct CompilerOptions {
    /// Directory the splits and manifest are written into.
    pub out_dir: PathBuf,

    /// Training-split target size, in tokens.
    pub train_target: usize,

    /// Validation-split target size, in tokens.
    pub val_target: usize,

    /// Walk options shared by both split builds.
    pub walk: WalkOptions,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("."),
            train_target: 110_000,
            val_target: 11_000,
            walk: WalkOptions::default(),
        }
    }
}

/// Reports from a full compiler run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileReport {
    /// Training-split report.
    pub train: SplitReport,

    /// Validation-split report.
    pub val: SplitReport,

    /// The emitted manifest.
    pub manifest: Manifest,
}

/// Compile a corpus tree into size-bounded train/validation splits.
///
/// The training split is built first, then validation; the two builds
/// share one [`VisitedSet`], so a file contributes to at most one split.
/// The manifest is emitted after both splits.
///
/// ## Arguments
/// * `root` - The corpus root directory.
/// * `tokenizer` - The mounted tokenizer backend.
/// * `options` - Targets, destinations and walk policies.
///
/// ## Returns
/// A [`CompileReport`] with both split reports and the manifest.
pub fn compile_corpus<T: TokenType>(
    root: &Path,
    tokenizer: &dyn TextTokenizer<T>,
    options: &CompilerOptions,
) -> CCResult<CompileReport> {
    let mut visited = VisitedSet::new();

    let train_spec = SplitSpec {
        name: "train".to_string(),
        target: options.train_target,
        destination: options.out_dir.join(TRAIN_BIN),
    };
    let train = build_split(root, tokenizer, &mut visited, &train_spec, options.walk)?;

    let val_spec = SplitSpec {
        name: "val".to_string(),
        target: options.val_target,
        destination: options.out_dir.join(VAL_BIN),
    };
    let val = build_split(root, tokenizer, &mut visited, &val_spec, options.walk)?;

    let manifest = Manifest::for_tokenizer(tokenizer);
    manifest.write_to_path(options.out_dir.join(META_JSON))?;

    Ok(CompileReport {
        train,
        val,
        manifest,
    })
}

/// Compile a fixed pair of source files into whole-file splits.
///
/// No walker and no round-trip gate: each file is consumed in full, the
/// way the single-file dataset variants are built. The vocabulary bound
/// check still applies.
///
/// ## Arguments
/// * `train_path` - The training source file.
/// * `val_path` - The validation source file.
/// * `tokenizer` - The mounted tokenizer backend.
/// * `options` - Destinations and the vocabulary policy; targets ignored.
///
/// ## Returns
/// A [`CompileReport`] with both split reports and the manifest.
pub fn compile_pair<T: TokenType>(
    train_path: &Path,
    val_path: &Path,
    tokenizer: &dyn TextTokenizer<T>,
    options: &CompilerOptions,
) -> CCResult<CompileReport> {
    let train = encode_whole_file(
        train_path,
        "train",
        &options.out_dir.join(TRAIN_BIN),
        tokenizer,
        options.walk.vocab,
    )?;
    let val = encode_whole_file(
        val_path,
        "val",
        &options.out_dir.join(VAL_BIN),
        tokenizer,
        options.walk.vocab,
    )?;

    let manifest = Manifest::for_tokenizer(tokenizer);
    manifest.write_to_path(options.out_dir.join(META_JSON))?;

    Ok(CompileReport {
        train,
        val,
        manifest,
    })
}

fn encode_whole_file<T: TokenType>(
    source: &Path,
    name: &str,
    destination: &Path,
    tokenizer: &dyn TextTokenizer<T>,
    vocab: VocabPolicy,
) -> CCResult<SplitReport> {
    let tokens = tokenizer.try_encode_file(source)?;
    let vocab_mismatches = check_vocab_bound(&tokens, tokenizer.vocab_size(), vocab)?;

    let mut stream = TokenAccumulator::new();
    stream.append(&tokens);
    stream.flush_to_path(destination)?;
    log::info!(
        "split {name:?}: {} tokens -> {}",
        stream.len(),
        destination.display(),
    );

    Ok(SplitReport {
        name: name.to_string(),
        tokens: stream.len(),
        files_consumed: 1,
        files_rejected: 0,
        files_skipped: 0,
        vocab_mismatches,
        reached_target: true,
    })
}

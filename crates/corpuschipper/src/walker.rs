//! # Directory Walker
//!
//! Depth-first consumption of a corpus tree into one size-bounded split.
//! Two invocations sharing a [`VisitedSet`] never consume the same file
//! twice, which is how the train/validation builds stay disjoint.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    accumulator::TokenAccumulator,
    backends::TextTokenizer,
    errors::{CCResult, CorpusError},
    types::{CCHashSet, TokenType},
    validate::{RoundTripValidator, VocabPolicy, check_vocab_bound},
};

/// Files already consumed by any split in the current run.
///
/// Identity is the absolute path: two paths with identical content are
/// distinct entries, and both may be consumed. The set is scoped to one
/// invocation and never persisted.
#[derive(Debug, Default)]
pub struct VisitedSet {
    paths: CCHashSet<PathBuf>,
}

impl VisitedSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a path visited.
    ///
    /// ## Returns
    /// `false` if the path was already visited.
    pub fn insert(
        &mut self,
        path: &Path,
    ) -> CCResult<bool> {
        Ok(self.paths.insert(std::path::absolute(path)?))
    }

    /// Number of visited files.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether no file has been visited.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Policy when a tree is exhausted below the target size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExhaustPolicy {
    /// Flush whatever was collected, warning with the shortfall.
    #[default]
    Flush,

    /// Fail the split build with [`CorpusError::TargetNotReached`].
    Fail,
}

/// Options governing a split build.
#[derive(Debug, Clone, Copy)]
pub struct WalkOptions {
    /// Sort each directory's entries by path before visiting.
    ///
    /// When unset, entries are visited in OS enumeration order and
    /// byte-for-byte reproducibility across runs is not guaranteed.
    pub deterministic: bool,

    /// Policy when the tree is exhausted below target.
    pub on_exhausted: ExhaustPolicy,

    /// Policy for out-of-range token ids.
    pub vocab: VocabPolicy,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            deterministic: true,
            on_exhausted: ExhaustPolicy::default(),
            vocab: VocabPolicy::default(),
        }
    }
}

/// Target and destination of one split build.
#[derive(Debug, Clone)]
pub struct SplitSpec {
    /// Split name, used in logs and reports.
    pub name: String,

    /// Target size, in tokens.
    ///
    /// A lower-bound trigger, not a hard cap: the first append that pushes
    /// the stream strictly past it ends the walk, and that file's tokens
    /// are kept in full.
    pub target: usize,

    /// Destination file for the flushed stream.
    pub destination: PathBuf,
}

/// Outcome summary of one split build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitReport {
    /// Split name.
    pub name: String,

    /// Tokens flushed to the destination.
    pub tokens: usize,

    /// Files whose tokens were accepted.
    pub files_consumed: usize,

    /// Files dropped by round-trip validation.
    pub files_rejected: usize,

    /// Files skipped as already visited.
    pub files_skipped: usize,

    /// Out-of-range token ids observed.
    pub vocab_mismatches: usize,

    /// Whether the target size was reached.
    pub reached_target: bool,
}

enum WalkState {
    Continue,
    TargetReached,
}

struct SplitBuild<'a, T: TokenType> {
    tokenizer: &'a dyn TextTokenizer<T>,
    validator: RoundTripValidator,
    visited: &'a mut VisitedSet,
    stream: TokenAccumulator<T>,
    options: WalkOptions,
    target: usize,

    files_consumed: usize,
    files_rejected: usize,
    files_skipped: usize,
    vocab_mismatches: usize,
}

impl<T: TokenType> SplitBuild<'_, T> {
    fn consume_file(
        &mut self,
        path: &Path,
    ) -> CCResult<WalkState> {
        // Mark visited before processing: a file that fails mid-way is
        // still consumed, and is never retried by a later split.
        if !self.visited.insert(path)? {
            log::debug!("skipping: {}", path.display());
            self.files_skipped += 1;
            return Ok(WalkState::Continue);
        }
        log::trace!("file: {}", path.display());

        let tokens = self.tokenizer.try_encode_file(path)?;
        self.vocab_mismatches +=
            check_vocab_bound(&tokens, self.tokenizer.vocab_size(), self.options.vocab)?;

        let original = fs::read_to_string(path)?;
        let decoded = self.tokenizer.try_decode(&tokens)?;
        if !self.validator.accept(&original, &decoded) {
            log::debug!("round-trip mismatch, dropping: {}", path.display());
            self.files_rejected += 1;
            return Ok(WalkState::Continue);
        }

        self.stream.append(&tokens);
        self.files_consumed += 1;

        if self.stream.len() > self.target {
            return Ok(WalkState::TargetReached);
        }
        Ok(WalkState::Continue)
    }

    fn walk_dir(
        &mut self,
        dir: &Path,
    ) -> CCResult<WalkState> {
        log::info!("entering directory: {}", dir.display());

        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            entries.push(entry?.path());
        }
        if self.options.deterministic {
            entries.sort();
        }

        for path in entries {
            let state = if path.is_dir() {
                self.walk_dir(&path)?
            } else if path.is_file() {
                self.consume_file(&path)?
            } else {
                WalkState::Continue
            };

            // The stop signal propagates out of every recursion level.
            if let WalkState::TargetReached = state {
                return Ok(WalkState::TargetReached);
            }
        }
        Ok(WalkState::Continue)
    }
}

/// Build one split by consuming files under `root` until the target size
/// is exceeded.
///
/// Shares `visited` with any other split built in the same run, so a file
/// contributes to at most one split. Rejected files are also marked
/// visited and are never retried.
///
/// ## Arguments
/// * `root` - The corpus root directory.
/// * `tokenizer` - The mounted tokenizer backend.
/// * `visited` - The run-wide visited set.
/// * `spec` - The split name, target size and destination.
/// * `options` - Traversal and policy options.
///
/// ## Returns
/// A [`SplitReport`] describing what was consumed and flushed.
pub fn build_split<T: TokenType>(
    root: &Path,
    tokenizer: &dyn TextTokenizer<T>,
    visited: &mut VisitedSet,
    spec: &SplitSpec,
    options: WalkOptions,
) -> CCResult<SplitReport> {
    let mut build = SplitBuild {
        tokenizer,
        validator: RoundTripValidator::for_backend(tokenizer),
        visited,
        stream: TokenAccumulator::new(),
        options,
        target: spec.target,
        files_consumed: 0,
        files_rejected: 0,
        files_skipped: 0,
        vocab_mismatches: 0,
    };

    let state = build.walk_dir(root)?;

    let reached_target = match state {
        WalkState::TargetReached => true,
        WalkState::Continue => false,
    };

    if !reached_target {
        match options.on_exhausted {
            ExhaustPolicy::Flush => {
                log::warn!(
                    "split {:?} exhausted the corpus at {} tokens (target {}); flushing short",
                    spec.name,
                    build.stream.len(),
                    spec.target,
                );
            }
            ExhaustPolicy::Fail => {
                return Err(CorpusError::TargetNotReached {
                    name: spec.name.clone(),
                    len: build.stream.len(),
                    target: spec.target,
                });
            }
        }
    }

    build.stream.flush_to_path(&spec.destination)?;
    log::info!(
        "split {:?}: {} tokens -> {}",
        spec.name,
        build.stream.len(),
        spec.destination.display(),
    );

    Ok(SplitReport {
        name: spec.name.clone(),
        tokens: build.stream.len(),
        files_consumed: build.files_consumed,
        files_rejected: build.files_rejected,
        files_skipped: build.files_skipped,
        vocab_mismatches: build.vocab_mismatches,
        reached_target,
    })
}

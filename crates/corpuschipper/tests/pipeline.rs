//! End-to-end pipeline tests against a stub character-code backend.

use std::fs;
use std::path::Path;

use anyhow::Result;
use tempdir::TempDir;

use corpuschipper::{
    CCResult,
    CompilerOptions,
    CorpusError,
    ExhaustPolicy,
    SplitSpec,
    TextTokenizer,
    VisitedSet,
    VocabPolicy,
    WalkOptions,
    build_split,
    compile_corpus,
    compile_pair,
    compiler::{META_JSON, TRAIN_BIN, VAL_BIN},
    tokens_from_le_bytes,
};

/// Stub backend: every character encodes to its code point.
///
/// Characters listed as poisoned decode to U+FFFD, so any file containing
/// one fails round-trip validation.
struct CharCodeTokenizer {
    vocab_size: usize,
    poison: Vec<char>,
}

impl CharCodeTokenizer {
    fn new(vocab_size: usize) -> Self {
        Self {
            vocab_size,
            poison: Vec::new(),
        }
    }

    fn with_poison(
        mut self,
        ch: char,
    ) -> Self {
        self.poison.push(ch);
        self
    }
}

impl TextTokenizer<u16> for CharCodeTokenizer {
    fn try_encode(
        &self,
        text: &str,
    ) -> CCResult<Vec<u16>> {
        text.chars()
            .map(|ch| u16::try_from(ch as u32).map_err(|_| CorpusError::TokenOutOfRange))
            .collect()
    }

    fn try_decode(
        &self,
        tokens: &[u16],
    ) -> CCResult<String> {
        Ok(tokens
            .iter()
            .map(|&token| {
                let ch = char::from_u32(token as u32).unwrap_or('\u{FFFD}');
                if self.poison.contains(&ch) { '\u{FFFD}' } else { ch }
            })
            .collect())
    }

    fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    fn identity(&self) -> &str {
        "test::CharCodeTokenizer"
    }
}

fn write_file(
    dir: &Path,
    name: &str,
    content: &str,
) -> Result<()> {
    fs::write(dir.join(name), content)?;
    Ok(())
}

fn read_split(path: &Path) -> Result<Vec<u16>> {
    Ok(tokens_from_le_bytes::<u16>(&fs::read(path)?)?)
}

#[test]
fn test_threshold_and_file_exclusivity() -> Result<()> {
    let corpus = TempDir::new("corpuschipper-corpus")?;
    let out = TempDir::new("corpuschipper-out")?;

    // In sorted listing order: 5000, 4000, 3000 tokens.
    write_file(corpus.path(), "a.txt", &"a".repeat(5000))?;
    write_file(corpus.path(), "b.txt", &"b".repeat(4000))?;
    write_file(corpus.path(), "c.txt", &"c".repeat(3000))?;

    let tokenizer = CharCodeTokenizer::new(128);
    let options = CompilerOptions {
        out_dir: out.path().to_path_buf(),
        train_target: 8000,
        val_target: 2000,
        walk: WalkOptions::default(),
    };

    let report = compile_corpus::<u16>(corpus.path(), &tokenizer, &options)?;

    // Train crosses 8000 at 5000 + 4000 = 9000 and stops; the third file
    // is left for the validation split.
    assert!(report.train.reached_target);
    assert_eq!(report.train.tokens, 9000);
    assert_eq!(report.train.files_consumed, 2);

    assert!(report.val.reached_target);
    assert_eq!(report.val.tokens, 3000);
    assert_eq!(report.val.files_consumed, 1);
    assert_eq!(report.val.files_skipped, 2);

    let train = read_split(&out.path().join(TRAIN_BIN))?;
    assert_eq!(train.len(), 9000);
    assert!(train[..5000].iter().all(|&t| t == 'a' as u16));
    assert!(train[5000..].iter().all(|&t| t == 'b' as u16));

    // No token from a train file appears in val, and vice versa.
    let val = read_split(&out.path().join(VAL_BIN))?;
    assert_eq!(val.len(), 3000);
    assert!(val.iter().all(|&t| t == 'c' as u16));

    let manifest: serde_json::Value =
        serde_json::from_reader(fs::File::open(out.path().join(META_JSON))?)?;
    assert_eq!(manifest["vocab_size"], 128);
    assert_eq!(manifest["itos"], "test::CharCodeTokenizer");
    assert_eq!(manifest["stoi"], "test::CharCodeTokenizer");

    Ok(())
}

#[test]
fn test_round_trip_gating() -> Result<()> {
    let corpus = TempDir::new("corpuschipper-corpus")?;
    let out = TempDir::new("corpuschipper-out")?;

    write_file(corpus.path(), "bad.txt", "ab!cd")?;
    write_file(corpus.path(), "good.txt", "hello")?;

    let tokenizer = CharCodeTokenizer::new(128).with_poison('!');
    let mut visited = VisitedSet::new();

    let spec = SplitSpec {
        name: "train".to_string(),
        target: 1_000_000,
        destination: out.path().join(TRAIN_BIN),
    };
    let report = build_split(
        corpus.path(),
        &tokenizer,
        &mut visited,
        &spec,
        WalkOptions::default(),
    )?;

    // The poisoned file contributes zero tokens but counts as visited.
    assert_eq!(report.files_rejected, 1);
    assert_eq!(report.files_consumed, 1);
    assert_eq!(report.tokens, 5);

    let train = read_split(&out.path().join(TRAIN_BIN))?;
    let expected: Vec<u16> = "hello".chars().map(|c| c as u16).collect();
    assert_eq!(train, expected);

    // A later split over the same tree retries nothing.
    let spec = SplitSpec {
        name: "val".to_string(),
        target: 1_000_000,
        destination: out.path().join(VAL_BIN),
    };
    let report = build_split(
        corpus.path(),
        &tokenizer,
        &mut visited,
        &spec,
        WalkOptions::default(),
    )?;

    assert_eq!(report.files_skipped, 2);
    assert_eq!(report.files_consumed, 0);
    assert_eq!(report.tokens, 0);

    Ok(())
}

#[test]
fn test_deep_tree_early_stop() -> Result<()> {
    let corpus = TempDir::new("corpuschipper-corpus")?;
    let out = TempDir::new("corpuschipper-out")?;

    // The crossing file sits two levels down; siblings after it must
    // never be visited.
    let nested = corpus.path().join("d0").join("d1");
    fs::create_dir_all(&nested)?;
    write_file(&nested, "a.txt", &"x".repeat(100))?;
    write_file(corpus.path(), "z.txt", &"z".repeat(100))?;

    let tokenizer = CharCodeTokenizer::new(256);
    let mut visited = VisitedSet::new();

    let spec = SplitSpec {
        name: "train".to_string(),
        target: 50,
        destination: out.path().join(TRAIN_BIN),
    };
    let report = build_split(
        corpus.path(),
        &tokenizer,
        &mut visited,
        &spec,
        WalkOptions::default(),
    )?;

    assert!(report.reached_target);
    assert_eq!(report.tokens, 100);
    assert_eq!(report.files_consumed, 1);
    assert_eq!(visited.len(), 1);

    Ok(())
}

#[test]
fn test_vocab_bound_diagnostic() -> Result<()> {
    let corpus = TempDir::new("corpuschipper-corpus")?;
    let out = TempDir::new("corpuschipper-out")?;

    // U+00E9 = 233, outside a 128-entry vocabulary.
    write_file(corpus.path(), "a.txt", "caf\u{e9}")?;

    let tokenizer = CharCodeTokenizer::new(128);

    let mut options = CompilerOptions {
        out_dir: out.path().to_path_buf(),
        train_target: 1,
        val_target: 0,
        walk: WalkOptions::default(),
    };

    let report = compile_corpus::<u16>(corpus.path(), &tokenizer, &options)?;
    assert_eq!(report.train.vocab_mismatches, 1);

    options.walk.vocab = VocabPolicy::Fail;
    let err = compile_corpus::<u16>(corpus.path(), &tokenizer, &options).unwrap_err();
    assert!(matches!(
        err,
        CorpusError::VocabMismatch {
            token: 233,
            vocab_size: 128
        }
    ));

    Ok(())
}

#[test]
fn test_exhaustion_policies() -> Result<()> {
    let corpus = TempDir::new("corpuschipper-corpus")?;
    let out = TempDir::new("corpuschipper-out")?;

    write_file(corpus.path(), "a.txt", "abcd")?;

    let tokenizer = CharCodeTokenizer::new(128);
    let destination = out.path().join(TRAIN_BIN);

    let spec = SplitSpec {
        name: "train".to_string(),
        target: 10_000,
        destination: destination.clone(),
    };

    // Default policy: flush short rather than discard.
    let mut visited = VisitedSet::new();
    let report = build_split(
        corpus.path(),
        &tokenizer,
        &mut visited,
        &spec,
        WalkOptions::default(),
    )?;
    assert!(!report.reached_target);
    assert_eq!(report.tokens, 4);
    assert_eq!(read_split(&destination)?.len(), 4);

    // Strict policy: exhaustion is an error.
    let mut visited = VisitedSet::new();
    let options = WalkOptions {
        on_exhausted: ExhaustPolicy::Fail,
        ..WalkOptions::default()
    };
    let err = build_split(corpus.path(), &tokenizer, &mut visited, &spec, options).unwrap_err();
    assert!(matches!(
        err,
        CorpusError::TargetNotReached { len: 4, target: 10_000, .. }
    ));

    Ok(())
}

#[test]
fn test_deterministic_listing_order() -> Result<()> {
    let corpus = TempDir::new("corpuschipper-corpus")?;
    let out = TempDir::new("corpuschipper-out")?;

    // Created out of order; sorted traversal must consume "a.txt" first.
    write_file(corpus.path(), "z.txt", &"z".repeat(10))?;
    write_file(corpus.path(), "a.txt", &"a".repeat(10))?;

    let tokenizer = CharCodeTokenizer::new(256);
    let mut visited = VisitedSet::new();

    let spec = SplitSpec {
        name: "train".to_string(),
        target: 5,
        destination: out.path().join(TRAIN_BIN),
    };
    build_split(
        corpus.path(),
        &tokenizer,
        &mut visited,
        &spec,
        WalkOptions::default(),
    )?;

    let train = read_split(&out.path().join(TRAIN_BIN))?;
    assert!(train.iter().all(|&t| t == 'a' as u16));

    Ok(())
}

#[test]
fn test_pair_mode() -> Result<()> {
    let sources = TempDir::new("corpuschipper-sources")?;
    let out = TempDir::new("corpuschipper-out")?;

    let train_path = sources.path().join("train.txt");
    let val_path = sources.path().join("val.txt");
    fs::write(&train_path, "abc")?;
    fs::write(&val_path, "de")?;

    let tokenizer = CharCodeTokenizer::new(128);
    let options = CompilerOptions {
        out_dir: out.path().to_path_buf(),
        ..CompilerOptions::default()
    };

    let report = compile_pair::<u16>(&train_path, &val_path, &tokenizer, &options)?;
    assert_eq!(report.train.tokens, 3);
    assert_eq!(report.val.tokens, 2);
    assert_eq!(report.manifest.vocab_size, 128);

    assert_eq!(
        read_split(&out.path().join(TRAIN_BIN))?,
        vec!['a' as u16, 'b' as u16, 'c' as u16]
    );
    assert_eq!(
        read_split(&out.path().join(VAL_BIN))?,
        vec!['d' as u16, 'e' as u16]
    );
    assert!(out.path().join(META_JSON).exists());

    Ok(())
}

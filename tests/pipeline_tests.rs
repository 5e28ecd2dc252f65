use std::fs;
use std::path::Path;
use std::sync::Arc;

use corpus_rag::embeddings::HashEmbedder;
use corpus_rag::error::Result;
use corpus_rag::generation::TextGenerator;
use corpus_rag::{Pipeline, RagConfig};
use tempfile::TempDir;

/// Deterministic stand-in for the model-backed generator.
struct CannedGenerator;

impl TextGenerator for CannedGenerator {
    fn generate(&self, prompt: &str) -> Result<String> {
        Ok(format!("answer derived from {} prompt chars", prompt.chars().count()))
    }

    fn name(&self) -> &str {
        "canned"
    }
}

fn test_config(source_dir: &Path) -> RagConfig {
    let mut config = RagConfig::default();
    config.corpus.source_dir = source_dir.to_path_buf();
    config.embeddings.dimensions = 64;
    config
}

fn build(source_dir: &Path) -> Result<Pipeline> {
    Pipeline::build_with(
        &test_config(source_dir),
        Arc::new(HashEmbedder::new(64)),
        Box::new(CannedGenerator),
    )
}

#[test]
fn end_to_end_answer_carries_the_matching_source() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("loans.txt"),
        "Total approved loans: 120. Total rejected: 30.",
    )
    .unwrap();

    let pipeline = build(tmp.path()).expect("pipeline builds");
    let answer = pipeline.ask("How many loans were approved?").expect("ask succeeds");

    assert!(!answer.text.is_empty());
    assert_eq!(answer.sources.len(), 1);
    assert!(answer.sources[0].content.contains("120"));
    assert_eq!(
        answer.sources[0].metadata.get("source").map(String::as_str),
        Some("loans.txt")
    );
}

#[test]
fn missing_corpus_directory_fails_construction_with_a_setup_error() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("nonexistent-dir");

    let err = build(&missing).unwrap_err();
    assert!(err.to_string().contains("no documents found"));
}

#[test]
fn directory_with_only_unsupported_files_fails_construction() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("image.png"), [0u8; 4]).unwrap();

    assert!(build(tmp.path()).is_err());
}

#[test]
fn invalid_chunk_settings_fail_construction() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("notes.txt"), "some content").unwrap();

    let mut config = test_config(tmp.path());
    config.chunking.chunk_overlap = config.chunking.chunk_size;

    let err = Pipeline::build_with(
        &config,
        Arc::new(HashEmbedder::new(64)),
        Box::new(CannedGenerator),
    )
    .unwrap_err();
    assert!(err.to_string().contains("chunk_overlap"));
}

#[test]
fn top_k_is_clamped_to_the_available_chunks() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("short.txt"), "a single small document").unwrap();

    let pipeline = build(tmp.path()).expect("pipeline builds");
    assert_eq!(pipeline.indexed_chunks(), 1);

    // top_k defaults to 3 but only one chunk exists.
    let answer = pipeline.ask("anything").unwrap();
    assert_eq!(answer.sources.len(), 1);
}

#[test]
fn repeated_questions_get_identical_answers_and_sources() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("a.txt"),
        "Loans in the north region were mostly approved in March.",
    )
    .unwrap();
    fs::write(
        tmp.path().join("b.txt"),
        "Rejected applications cluster around low income bands.",
    )
    .unwrap();

    let pipeline = build(tmp.path()).expect("pipeline builds");

    let first = pipeline.ask("Which region had approvals?").unwrap();
    let second = pipeline.ask("Which region had approvals?").unwrap();

    assert_eq!(first.text, second.text);
    assert_eq!(first.sources.len(), second.sources.len());
    for (a, b) in first.sources.iter().zip(second.sources.iter()) {
        assert_eq!(a.chunk_id, b.chunk_id);
        assert_eq!(a.similarity, b.similarity);
    }
}

#[test]
fn sources_preserve_retrieval_order_by_similarity() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("a.txt"), "alpha topic text").unwrap();
    fs::write(tmp.path().join("b.txt"), "unrelated filler words").unwrap();

    let pipeline = build(tmp.path()).expect("pipeline builds");
    let answer = pipeline.ask("alpha topic").unwrap();

    assert_eq!(answer.sources.len(), 2);
    assert!(answer.sources[0].similarity >= answer.sources[1].similarity);
    assert!(answer.sources[0].content.contains("alpha"));
}

#[test]
fn mixed_corpus_loads_csv_rows_and_text_files() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("loans.csv"),
        "id,status\n1,approved\n2,rejected\n",
    )
    .unwrap();
    fs::write(tmp.path().join("summary.txt"), "Two loans were processed.").unwrap();

    let pipeline = build(tmp.path()).expect("pipeline builds");
    assert_eq!(pipeline.indexed_chunks(), 3);
}

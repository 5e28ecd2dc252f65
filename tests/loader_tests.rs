use std::fs;
use std::path::Path;

use corpus_rag::ingestion::DocumentLoader;
use tempfile::TempDir;

#[test]
fn missing_directory_yields_empty_corpus() {
    let docs = DocumentLoader::load(Path::new("does-not-exist"));
    assert!(docs.is_empty());
}

#[test]
fn text_file_loads_as_single_document_with_source_metadata() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("notes.txt"), "Total approved loans: 120.").unwrap();

    let docs = DocumentLoader::load(tmp.path());

    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].content, "Total approved loans: 120.");
    assert_eq!(
        docs[0].metadata.get("source").map(String::as_str),
        Some("notes.txt")
    );
}

#[test]
fn csv_rows_become_documents_and_the_header_is_dropped() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("loans.csv"),
        "id,amount,status\n1,5000,approved\n2,3000,rejected\n",
    )
    .unwrap();

    let docs = DocumentLoader::load(tmp.path());

    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].content, "1, 5000, approved");
    assert_eq!(docs[1].content, "2, 3000, rejected");
    assert!(docs[0].metadata.is_empty());
}

#[test]
fn malformed_tabular_file_is_skipped_not_fatal() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("good.txt"), "well formed").unwrap();
    // Ragged row plus an unterminated quote: the csv parser rejects this file.
    fs::write(tmp.path().join("bad.csv"), "a,b\n1,2,3,4\n\"unterminated").unwrap();

    let docs = DocumentLoader::load(tmp.path());

    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].content, "well formed");
}

#[test]
fn invalid_utf8_text_file_is_skipped_not_fatal() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("binary.txt"), [0xffu8, 0xfe, 0x01]).unwrap();
    fs::write(tmp.path().join("clean.txt"), "readable").unwrap();

    let docs = DocumentLoader::load(tmp.path());

    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].content, "readable");
}

#[test]
fn unsupported_extensions_are_ignored() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("image.png"), [0x89u8, 0x50, 0x4e, 0x47]).unwrap();
    fs::write(tmp.path().join("data.json"), "{\"k\": 1}").unwrap();
    fs::write(tmp.path().join("notes.txt"), "kept").unwrap();

    let docs = DocumentLoader::load(tmp.path());

    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].content, "kept");
}

#[test]
fn files_load_in_name_order() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("b.txt"), "second").unwrap();
    fs::write(tmp.path().join("a.txt"), "first").unwrap();

    let docs = DocumentLoader::load(tmp.path());

    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].content, "first");
    assert_eq!(docs[1].content, "second");
}

use std::collections::BTreeMap;

use corpus_rag::config::ChunkingConfig;
use corpus_rag::ingestion::TextChunker;
use corpus_rag::types::Document;

fn doc(content: &str) -> Document {
    Document::new(content.to_string(), BTreeMap::new())
}

fn chunker(chunk_size: usize, chunk_overlap: usize) -> TextChunker {
    TextChunker::new(&ChunkingConfig {
        chunk_size,
        chunk_overlap,
    })
    .expect("valid chunking config")
}

fn sample_text(len: usize) -> String {
    (0..len).map(|i| char::from(b'a' + (i % 26) as u8)).collect()
}

#[test]
fn short_document_yields_one_whole_chunk() {
    let docs = vec![doc("tiny document")];
    let chunks = chunker(300, 50).split(&docs);

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].content, "tiny document");
    assert_eq!(chunks[0].offset, 0);
    assert_eq!(chunks[0].document_id, docs[0].id);
}

#[test]
fn empty_document_yields_no_chunks() {
    let chunks = chunker(300, 50).split(&[doc("")]);
    assert!(chunks.is_empty());
}

#[test]
fn windows_respect_size_and_stride() {
    let content = sample_text(1000);
    let chunks = chunker(300, 50).split(&[doc(&content)]);

    for chunk in &chunks {
        assert!(chunk.content.chars().count() <= 300);
    }
    for pair in chunks.windows(2) {
        assert_eq!(pair[1].offset - pair[0].offset, 250);
    }
    // Every chunk except the last spans the full window.
    for chunk in &chunks[..chunks.len() - 1] {
        assert_eq!(chunk.content.chars().count(), 300);
    }
}

#[test]
fn overlap_removed_concatenation_reconstructs_document() {
    for len in [1, 299, 300, 301, 550, 777, 1200] {
        let content = sample_text(len);
        let chunks = chunker(300, 50).split(&[doc(&content)]);

        let mut rebuilt: String = chunks[0].content.clone();
        for chunk in &chunks[1..] {
            rebuilt.extend(chunk.content.chars().skip(50));
        }
        assert_eq!(rebuilt, content, "length {len}");
    }
}

#[test]
fn document_order_and_per_document_indexes_are_preserved() {
    let docs = vec![doc(&sample_text(700)), doc(&sample_text(400))];
    let chunks = chunker(300, 50).split(&docs);

    let first_count = chunks
        .iter()
        .filter(|c| c.document_id == docs[0].id)
        .count();
    assert!(first_count > 0);

    // All chunks of the first document come before any chunk of the second.
    assert!(chunks[..first_count]
        .iter()
        .all(|c| c.document_id == docs[0].id));
    assert!(chunks[first_count..]
        .iter()
        .all(|c| c.document_id == docs[1].id));

    // Indexes restart per document and offsets ascend.
    assert_eq!(chunks[0].chunk_index, 0);
    assert_eq!(chunks[first_count].chunk_index, 0);
    for pair in chunks[..first_count].windows(2) {
        assert!(pair[1].offset > pair[0].offset);
    }
}

#[test]
fn chunks_inherit_document_metadata() {
    let mut metadata = BTreeMap::new();
    metadata.insert("source".to_string(), "notes.txt".to_string());
    let document = Document::new(sample_text(500), metadata);

    let chunks = chunker(300, 50).split(&[document]);
    assert!(chunks
        .iter()
        .all(|c| c.metadata.get("source").map(String::as_str) == Some("notes.txt")));
}

#[test]
fn overlap_equal_to_chunk_size_is_rejected() {
    let err = TextChunker::new(&ChunkingConfig {
        chunk_size: 100,
        chunk_overlap: 100,
    })
    .unwrap_err();
    assert!(err.to_string().contains("chunk_overlap"));
}

#[test]
fn zero_chunk_size_is_rejected() {
    assert!(TextChunker::new(&ChunkingConfig {
        chunk_size: 0,
        chunk_overlap: 0,
    })
    .is_err());
}

//! Corpus loading from a flat directory of source files

use std::collections::BTreeMap;
use std::path::Path;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::types::{Document, FileType};

/// Reads raw files from a source directory into normalized text records.
pub struct DocumentLoader;

impl DocumentLoader {
    /// Load every supported file under `source_dir`.
    ///
    /// A missing directory yields an empty corpus with a warning; a file that
    /// fails to parse is reported and skipped, and loading continues. Entries are
    /// visited in file-name order so a fixed corpus always produces the same
    /// document sequence.
    pub fn load(source_dir: &Path) -> Vec<Document> {
        if !source_dir.is_dir() {
            tracing::warn!("document directory '{}' not found", source_dir.display());
            return Vec::new();
        }

        let mut documents = Vec::new();

        for entry in WalkDir::new(source_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            let filename = entry.file_name().to_string_lossy().to_string();
            let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

            let parsed = match FileType::from_extension(extension) {
                FileType::Csv => Self::parse_csv(path, &filename),
                FileType::Txt => Self::parse_text(path, &filename),
                FileType::Unsupported => continue,
            };

            match parsed {
                Ok(mut docs) => {
                    tracing::debug!("loaded {} document(s) from '{}'", docs.len(), filename);
                    documents.append(&mut docs);
                }
                Err(e) => tracing::warn!("skipping '{}': {}", filename, e),
            }
        }

        documents
    }

    /// One Document per row, fields joined with ", ". The header row is consumed
    /// but not interpreted, and no column metadata is kept.
    fn parse_csv(path: &Path, filename: &str) -> Result<Vec<Document>> {
        let mut reader = csv::Reader::from_path(path)
            .map_err(|e| Error::file_parse(filename, e.to_string()))?;

        let mut documents = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| Error::file_parse(filename, e.to_string()))?;
            let content = record.iter().collect::<Vec<_>>().join(", ");
            documents.push(Document::new(content, BTreeMap::new()));
        }

        Ok(documents)
    }

    /// Whole file as a single Document, decoded as UTF-8.
    fn parse_text(path: &Path, filename: &str) -> Result<Vec<Document>> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::file_parse(filename, e.to_string()))?;

        let mut metadata = BTreeMap::new();
        metadata.insert("source".to_string(), filename.to_string());

        Ok(vec![Document::new(content, metadata)])
    }
}

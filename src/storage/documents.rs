use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use crate::models::Document;

/// Trait for loading the searchable document set
pub trait DocumentStorage {
    /// Load all documents
    fn load(&self) -> Result<Vec<Document>>;

    /// Get the storage file path
    fn path(&self) -> &PathBuf;
}

#[derive(Debug, Default, Deserialize)]
struct DocumentFile {
    #[serde(default)]
    documents: Vec<Document>,
}

/// TOML document file: one `[[documents]]` table per document
pub struct TomlDocumentStorage {
    path: PathBuf,
}

impl TomlDocumentStorage {
    pub fn new(path: PathBuf) -> Self {
        TomlDocumentStorage { path }
    }
}

impl DocumentStorage for TomlDocumentStorage {
    fn load(&self) -> Result<Vec<Document>> {
        // Missing file is not an error, just nothing to search
        if !self.path.exists() {
            log::warn!("Documents file not found at {:?}, starting empty", self.path);
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read documents from {:?}", self.path))?;

        let file: DocumentFile = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse documents file {:?}", self.path))?;

        log::info!(
            "Loaded {} documents from {:?}",
            file.documents.len(),
            self.path
        );
        Ok(file.documents)
    }

    fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty() {
        let storage = TomlDocumentStorage::new(PathBuf::from("/nonexistent/searchbox/documents.toml"));
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn test_demo_documents_parse() {
        let file: DocumentFile = toml::from_str(include_str!("../../demos/movies.toml")).unwrap();
        assert_eq!(file.documents.len(), 6);
        assert_eq!(file.documents[0].title(), "The Matrix");
        assert_eq!(file.documents[2].field("genre"), Some("Crime"));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = std::env::temp_dir().join(format!("searchbox-docs-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("documents.toml");
        fs::write(
            &path,
            "[[documents]]\nid = \"1\"\ntitle = \"Heat\"\n\n[[documents]]\nid = \"2\"\nname = \"Ronin\"\n",
        )
        .unwrap();

        let documents = TomlDocumentStorage::new(path).load().unwrap();
        assert_eq!(documents.len(), 2);
        assert_eq!(documents[1].title(), "Ronin");

        let _ = fs::remove_dir_all(dir);
    }
}

//! Directory-backed manuscript storage.
//!
//! Layout under the manuscript directory:
//!
//! ```text
//! outline.md
//! bible.md
//! chapters/ch01.md, ch02.md, ...
//! ```
//!
//! The store is the only component that writes manuscript documents.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::{ChapterNumber, DocumentKind};

pub const STARTER_OUTLINE: &str = "# Outline\n\n- TBD\n";
pub const STARTER_BIBLE: &str = "# Story Bible\n\n- Canon facts\n";
pub const STARTER_CHAPTER: &str = "# Chapter 1\n\nDraft here...\n";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Required file missing: {}", .0.display())]
    Missing(PathBuf),

    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            StoreError::Missing(path.to_path_buf())
        } else {
            StoreError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Clone)]
pub struct ManuscriptStore {
    dir: PathBuf,
}

impl ManuscriptStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn chapters_dir(&self) -> PathBuf {
        self.dir.join("chapters")
    }

    pub fn path_of(&self, doc: DocumentKind) -> PathBuf {
        self.dir.join(doc.relative_path())
    }

    pub fn exists(&self, doc: DocumentKind) -> bool {
        self.path_of(doc).is_file()
    }

    /// Fail with [`StoreError::Missing`] unless every listed document exists.
    pub fn require(&self, docs: &[DocumentKind]) -> Result<()> {
        for doc in docs {
            if !self.exists(*doc) {
                return Err(StoreError::Missing(self.path_of(*doc)));
            }
        }
        Ok(())
    }

    pub fn read(&self, doc: DocumentKind) -> Result<String> {
        let path = self.path_of(doc);
        fs::read_to_string(&path).map_err(|e| StoreError::io(&path, e))
    }

    /// Replace a document wholesale, creating parent directories as needed.
    pub fn write(&self, doc: DocumentKind, content: &str) -> Result<PathBuf> {
        let path = self.path_of(doc);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
        fs::write(&path, content).map_err(|e| StoreError::io(&path, e))?;
        tracing::info!(document = %doc, path = %path.display(), bytes = content.len(), "Wrote document");
        Ok(path)
    }

    /// Append a block to an existing document, separated by one blank line.
    ///
    /// The prior content is kept as a strict prefix of the result; only the
    /// newlines needed to reach a single blank line are inserted.
    pub fn append(&self, doc: DocumentKind, block: &str) -> Result<PathBuf> {
        let existing = self.read(doc)?;
        let separator = blank_line_after(&existing);
        self.write(doc, &format!("{}{}{}", existing, separator, block))
    }

    pub fn write_chapter(&self, chapter: ChapterNumber, content: &str) -> Result<PathBuf> {
        self.write(DocumentKind::Chapter(chapter), content)
    }

    /// Existing chapter numbers in ascending order.
    pub fn chapters(&self) -> Result<Vec<ChapterNumber>> {
        let dir = self.chapters_dir();
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&dir, e)),
        };

        let mut chapters = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(&dir, e))?;
            let name = entry.file_name();
            let parsed = name
                .to_str()
                .and_then(|n| n.strip_prefix("ch"))
                .and_then(|n| n.strip_suffix(".md"))
                .and_then(|n| n.parse::<ChapterNumber>().ok());
            if let Some(n) = parsed {
                chapters.push(n);
            }
        }
        chapters.sort();
        Ok(chapters)
    }

    /// Create the manuscript skeleton with starter documents.
    ///
    /// Starter documents overwrite any existing copies.
    pub fn init(&self) -> Result<()> {
        let chapters = self.chapters_dir();
        fs::create_dir_all(&chapters).map_err(|e| StoreError::io(&chapters, e))?;

        self.write(DocumentKind::Outline, STARTER_OUTLINE)?;
        self.write(DocumentKind::Bible, STARTER_BIBLE)?;
        self.write_chapter(ChapterNumber::FIRST, STARTER_CHAPTER)?;
        Ok(())
    }
}

fn blank_line_after(text: &str) -> &'static str {
    if text.is_empty() || text.ends_with("\n\n") {
        ""
    } else if text.ends_with('\n') {
        "\n"
    } else {
        "\n\n"
    }
}

#[cfg(test)]
mod tests {
    use super::blank_line_after;

    #[test]
    fn pads_to_a_single_blank_line() {
        assert_eq!(blank_line_after("facts"), "\n\n");
        assert_eq!(blank_line_after("facts\n"), "\n");
        assert_eq!(blank_line_after("facts\n\n"), "");
        assert_eq!(blank_line_after(""), "");
    }
}

use std::fmt;

use super::ChapterNumber;

/// A document inside the manuscript directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Structural plan produced by outline generation.
    Outline,
    /// Canon facts; only ever appended to.
    Bible,
    Chapter(ChapterNumber),
}

impl DocumentKind {
    /// Path of the document relative to the manuscript directory.
    pub fn relative_path(&self) -> String {
        match self {
            DocumentKind::Outline => "outline.md".to_string(),
            DocumentKind::Bible => "bible.md".to_string(),
            DocumentKind::Chapter(n) => format!("chapters/{}", n.file_name()),
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Outline => f.write_str("outline"),
            DocumentKind::Bible => f.write_str("bible"),
            DocumentKind::Chapter(n) => write!(f, "chapter {}", n),
        }
    }
}

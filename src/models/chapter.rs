use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use thiserror::Error;

/// Default advisory length for a drafted chapter.
pub const DEFAULT_TARGET_WORDS: u32 = 1200;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("chapter numbers start at 1, got {0:?}")]
pub struct InvalidChapterNumber(pub String);

/// A 1-based chapter index.
///
/// Chapter files are named from this number (`ch01.md`, `ch02.md`, ...) and the
/// drafted chapter heading is always stamped from it, never from model output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChapterNumber(NonZeroU32);

impl ChapterNumber {
    pub const FIRST: ChapterNumber = ChapterNumber(NonZeroU32::MIN);

    pub fn new(n: u32) -> Result<Self, InvalidChapterNumber> {
        NonZeroU32::new(n)
            .map(Self)
            .ok_or_else(|| InvalidChapterNumber(n.to_string()))
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// File name of the chapter document, zero-padded to two digits.
    pub fn file_name(self) -> String {
        format!("ch{:02}.md", self.get())
    }

    /// The heading that opens every drafted chapter.
    pub fn heading(self) -> String {
        format!("# Chapter {}", self.get())
    }
}

impl fmt::Display for ChapterNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl FromStr for ChapterNumber {
    type Err = InvalidChapterNumber;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n: u32 = s
            .trim()
            .parse()
            .map_err(|_| InvalidChapterNumber(s.to_string()))?;
        Self::new(n).map_err(|_| InvalidChapterNumber(s.to_string()))
    }
}

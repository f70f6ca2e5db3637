//! Generation pipeline: outline → chapter → continuity.
//!
//! Each operation builds a [`Prompt`] from manuscript text, calls a
//! [`Generator`], and returns Markdown. None of them write to disk; the caller
//! persists the result through the manuscript store.

mod continuity;

pub use continuity::{ConsistencyChecker, PlaceholderChecker, CONTINUITY_HEADING};

use thiserror::Error;

use crate::llm::{GenerationError, Generator};
use crate::models::{ChapterNumber, Prompt};
use crate::store::{ManuscriptStore, StoreError};

pub const OUTLINE_SYSTEM: &str =
    "You draft concise, well-structured non-fiction book outlines in Markdown.";
pub const CHAPTER_SYSTEM: &str =
    "You are a long-form book ghostwriter. Write in clean Markdown, no front-matter.";

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Synopsis must not be empty")]
    EmptySynopsis,

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Inputs for drafting one chapter.
#[derive(Debug, Clone, Copy)]
pub struct ChapterRequest<'a> {
    pub chapter: ChapterNumber,
    /// Advisory only; the draft length is never checked.
    pub target_words: u32,
    pub outline: &'a str,
    pub bible: &'a str,
    pub style_guide: &'a str,
}

pub fn outline_prompt(synopsis: &str, style_guide: &str) -> Prompt {
    Prompt::new(
        OUTLINE_SYSTEM,
        format!(
            "Synopsis: {synopsis}\n\nStyle Guide (optional):\n{style_guide}\n\n\
             Return a detailed outline in Markdown with sections and bullets."
        ),
    )
}

pub fn chapter_prompt(req: &ChapterRequest<'_>) -> Prompt {
    Prompt::new(
        CHAPTER_SYSTEM,
        format!(
            "Use the outline and story bible to write Chapter {}. Target length approx {} words.\n\n\
             === OUTLINE ===\n{}\n\n=== BIBLE ===\n{}\n\n=== STYLE GUIDE ===\n{}",
            req.chapter, req.target_words, req.outline, req.bible, req.style_guide
        ),
    )
}

/// Generate an outline from a synopsis.
///
/// Returns the model text exactly as received.
pub async fn generate_outline(
    generator: &dyn Generator,
    synopsis: &str,
    style_guide: &str,
) -> Result<String, PipelineError> {
    if synopsis.trim().is_empty() {
        return Err(PipelineError::EmptySynopsis);
    }
    let prompt = outline_prompt(synopsis, style_guide);
    tracing::debug!(synopsis_bytes = synopsis.len(), "Generating outline");
    Ok(generator.generate(&prompt).await?)
}

/// Draft a chapter body, prefixed with a `# Chapter N` heading.
pub async fn expand_chapter(
    generator: &dyn Generator,
    req: &ChapterRequest<'_>,
) -> Result<String, PipelineError> {
    let prompt = chapter_prompt(req);
    tracing::debug!(
        chapter = %req.chapter,
        target_words = req.target_words,
        prompt_bytes = prompt.user.len(),
        "Expanding chapter"
    );
    let body = generator.generate(&prompt).await?;
    Ok(format!("{}\n\n{}", req.chapter.heading(), body))
}

/// Produce continuity notes for the manuscript.
pub fn continuity_pass(
    checker: &dyn ConsistencyChecker,
    manuscript: &ManuscriptStore,
) -> Result<String, PipelineError> {
    checker.check(manuscript)
}

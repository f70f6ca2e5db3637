//! Command surface.
//!
//! Each function sequences store, pipeline and gateway calls for one CLI
//! subcommand and returns a [`Report`] for the user. Precondition checks run
//! before any generation call so a missing document never costs a request.

use std::fmt;
use std::io;
use std::path::Path;

use thiserror::Error;

use crate::config::{Config, HostingConfig};
use crate::llm::Generator;
use crate::models::{ChapterNumber, DocumentKind};
use crate::pipeline::{self, ChapterRequest, ConsistencyChecker, PipelineError};
use crate::store::{ManuscriptStore, StoreError};
use crate::templates::{Installed, TemplateStore};
use crate::vcs::{self, Hosting, VcsError, VersionControl};

const NOT_A_REPO: &str = "Git not available or not a repo; skipping.";

/// Outcome of a successful command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    Done(String),
    /// Nothing was done; the message explains why. Not an error.
    Skipped(String),
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Done(msg) | Report::Skipped(msg) => f.write_str(msg),
        }
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Failed to read or copy prompt templates: {0}")]
    Templates(#[source] io::Error),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("{0}")]
    Git(#[source] VcsError),

    #[error("Push failed, check remote: {0}")]
    Push(#[source] VcsError),

    #[error("Failed to open PR, check GITHUB_TOKEN/GITHUB_REPO: {0}")]
    PullRequest(#[source] VcsError),
}

impl CommandError {
    /// Generation failures end the process; everything else is reported.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CommandError::Pipeline(PipelineError::Generation(_)))
    }
}

/// The project's manuscript and prompt directories.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub manuscript: ManuscriptStore,
    pub templates: TemplateStore,
}

impl Workspace {
    pub fn new(config: &Config) -> Self {
        Self {
            manuscript: ManuscriptStore::new(config.manuscript_dir()),
            templates: TemplateStore::new(config.prompts_dir()),
        }
    }

    fn style_guide(&self) -> Result<String, CommandError> {
        self.templates.style_guide().map_err(CommandError::Templates)
    }
}

/// Create the manuscript skeleton and copy bundled templates.
pub fn init(ws: &Workspace) -> Result<Report, CommandError> {
    ws.manuscript.init()?;
    let installed = ws
        .templates
        .install_bundled()
        .map_err(CommandError::Templates)?;

    let copied = installed
        .iter()
        .filter(|i| matches!(i, Installed::Copied(_)))
        .count();
    let skipped = installed.len() - copied;

    Ok(Report::Done(format!(
        "Created manuscript skeleton. Copied {} prompt template(s) to {} ({} already present).",
        copied,
        display(ws.templates.dir()),
        skipped
    )))
}

/// Generate the outline from a synopsis; requires the bible.
pub async fn outline(
    ws: &Workspace,
    generator: &dyn Generator,
    synopsis: &str,
) -> Result<Report, CommandError> {
    ws.manuscript.require(&[DocumentKind::Bible])?;
    let style = ws.style_guide()?;

    let result = pipeline::generate_outline(generator, synopsis, &style).await?;
    let path = ws.manuscript.write(DocumentKind::Outline, &result)?;

    Ok(Report::Done(format!("Wrote {}", display(&path))))
}

/// Draft one chapter; requires the outline and the bible.
pub async fn expand(
    ws: &Workspace,
    generator: &dyn Generator,
    chapter: ChapterNumber,
    target_words: u32,
) -> Result<Report, CommandError> {
    ws.manuscript
        .require(&[DocumentKind::Outline, DocumentKind::Bible])?;
    let outline = ws.manuscript.read(DocumentKind::Outline)?;
    let bible = ws.manuscript.read(DocumentKind::Bible)?;
    let style = ws.style_guide()?;

    let draft = pipeline::expand_chapter(
        generator,
        &ChapterRequest {
            chapter,
            target_words,
            outline: &outline,
            bible: &bible,
            style_guide: &style,
        },
    )
    .await?;
    let path = ws.manuscript.write_chapter(chapter, &draft)?;

    Ok(Report::Done(format!("Wrote {}", display(&path))))
}

/// Append continuity notes to the bible.
pub fn continuity(
    ws: &Workspace,
    checker: &dyn ConsistencyChecker,
) -> Result<Report, CommandError> {
    ws.manuscript.require(&[DocumentKind::Bible])?;
    let chapters = ws.manuscript.chapters()?;
    tracing::debug!(chapters = chapters.len(), "Running continuity pass");

    let notes = pipeline::continuity_pass(checker, &ws.manuscript)?;
    let path = ws.manuscript.append(DocumentKind::Bible, &notes)?;

    Ok(Report::Done(format!(
        "Continuity notes appended to {}",
        display(&path)
    )))
}

pub fn branch(repo: Option<&dyn VersionControl>, name: &str) -> Result<Report, CommandError> {
    let Some(repo) = repo else {
        return Ok(skip());
    };
    repo.create_or_switch_branch(name)
        .map_err(CommandError::Git)?;
    Ok(Report::Done(format!("Switched to branch {}", name)))
}

pub fn commit(repo: Option<&dyn VersionControl>, message: &str) -> Result<Report, CommandError> {
    let Some(repo) = repo else {
        return Ok(skip());
    };
    match repo.stage_and_commit(message).map_err(CommandError::Git)? {
        Some(id) => Ok(Report::Done(format!("Committed changes ({})", short(&id)))),
        None => Ok(Report::Done("Nothing to commit.".to_string())),
    }
}

/// Push the active branch, then open a pull request for it.
///
/// A failed PR leaves the pushed branch in place.
pub async fn pull_request(
    config: &HostingConfig,
    repo: Option<&dyn VersionControl>,
    host: &dyn Hosting,
    title: &str,
    body: &str,
) -> Result<Report, CommandError> {
    let Some(repo) = repo else {
        return Ok(skip());
    };
    repo.push_current().map_err(CommandError::Push)?;

    let url = vcs::open_pull_request(config, repo, host, title, body)
        .await
        .map_err(CommandError::PullRequest)?;
    Ok(Report::Done(format!("Opened PR: {}", url)))
}

fn skip() -> Report {
    tracing::warn!("{}", NOT_A_REPO);
    Report::Skipped(NOT_A_REPO.to_string())
}

fn short(id: &str) -> &str {
    id.get(..7).unwrap_or(id)
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

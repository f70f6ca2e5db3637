//! Prompt templates.
//!
//! A set of Markdown templates ships inside the binary. `init` copies them into
//! the project's `prompts/` directory, where the writer may edit them. Only
//! `style_guide.md` is fed to the model; it is optional.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

pub const STYLE_GUIDE: &str = "style_guide.md";

/// Templates compiled into the binary, as `(file name, contents)`.
pub const BUNDLED: &[(&str, &str)] = &[
    (STYLE_GUIDE, include_str!("../prompts/style_guide.md")),
    ("chapter_brief.md", include_str!("../prompts/chapter_brief.md")),
    (
        "continuity_checklist.md",
        include_str!("../prompts/continuity_checklist.md"),
    ),
];

/// What `install_bundled` did with each template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Installed {
    Copied(PathBuf),
    /// A file of that name was already present and was left alone.
    Skipped(PathBuf),
}

#[derive(Debug, Clone)]
pub struct TemplateStore {
    dir: PathBuf,
}

impl TemplateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Read a template by file name; `None` when the file does not exist.
    pub fn read(&self, name: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.dir.join(name)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// The style guide, or an empty string when there is none.
    pub fn style_guide(&self) -> io::Result<String> {
        let style = self.read(STYLE_GUIDE)?.unwrap_or_default();
        debug!(bytes = style.len(), "Loaded style guide");
        Ok(style)
    }

    /// Copy the bundled templates into the directory, never overwriting.
    pub fn install_bundled(&self) -> io::Result<Vec<Installed>> {
        self.install(BUNDLED)
    }

    pub fn install(&self, templates: &[(&str, &str)]) -> io::Result<Vec<Installed>> {
        fs::create_dir_all(&self.dir)?;

        let mut report = Vec::with_capacity(templates.len());
        for (name, content) in templates {
            let target = self.dir.join(name);
            if target.exists() {
                debug!(path = %target.display(), "Template already present");
                report.push(Installed::Skipped(target));
            } else {
                fs::write(&target, content)?;
                info!(path = %target.display(), "Copied template");
                report.push(Installed::Copied(target));
            }
        }
        Ok(report)
    }
}

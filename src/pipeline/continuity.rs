use crate::store::ManuscriptStore;

use super::PipelineError;

pub const CONTINUITY_HEADING: &str = "## Continuity Notes";

/// Produces the notes block that the continuity pass appends to the bible.
pub trait ConsistencyChecker {
    fn check(&self, manuscript: &ManuscriptStore) -> Result<String, PipelineError>;
}

/// Emits a fixed checklist without inspecting the chapters.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderChecker;

impl ConsistencyChecker for PlaceholderChecker {
    fn check(&self, manuscript: &ManuscriptStore) -> Result<String, PipelineError> {
        tracing::debug!(dir = %manuscript.dir().display(), "Running placeholder continuity pass");
        Ok(format!(
            "{CONTINUITY_HEADING}\n\n\
             - [TODO] Add name/place consistency checks.\n\
             - [TODO] Flag time jumps or contradictions.\n"
        ))
    }
}

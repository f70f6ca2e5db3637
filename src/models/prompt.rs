/// A single system/user instruction pair for one model call.
///
/// Prompts are built per call and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// Role and output constraints for the model.
    pub system: String,
    /// Task description with any embedded context blocks.
    pub user: String,
}

impl Prompt {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }
}

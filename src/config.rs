//! Runtime configuration.
//!
//! Built once in `main` from environment variables (after `.env` loading) and
//! passed down by reference:
//! - `MODEL_NAME` - Model identifier (default: `gpt-4o`)
//! - `OPENAI_API_KEY` - LLM credential (required for generation commands)
//! - `OPENAI_BASE_URL` - OpenAI-compatible endpoint (default: `https://api.openai.com/v1`)
//! - `GITHUB_TOKEN` - Hosting access token (required for `pr`)
//! - `GITHUB_REPO` - Hosting repository, `owner/name` (required for `pr`)
//! - `DEFAULT_BRANCH` - Pull request target branch (default: `main`)
//! - `GITHUB_API_URL` - Hosting API base (default: `https://api.github.com`)

use std::path::PathBuf;

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_LLM_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

#[derive(Debug, Clone)]
pub struct Config {
    /// Project root holding `manuscript/` and `prompts/`.
    pub root: PathBuf,
    pub llm: LlmConfig,
    pub hosting: HostingConfig,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct HostingConfig {
    pub token: Option<String>,
    /// Repository identifier in `owner/name` form.
    pub repository: Option<String>,
    pub default_branch: String,
    pub api_url: String,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env(root: impl Into<PathBuf>) -> Self {
        Self::from_lookup(root, |key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(root: impl Into<PathBuf>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            root: root.into(),
            llm: LlmConfig {
                model: get("MODEL_NAME").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                api_key: get("OPENAI_API_KEY"),
                base_url: get("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_LLM_URL.to_string()),
            },
            hosting: HostingConfig {
                token: get("GITHUB_TOKEN"),
                repository: get("GITHUB_REPO"),
                default_branch: get("DEFAULT_BRANCH")
                    .unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
                api_url: get("GITHUB_API_URL")
                    .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string()),
            },
        }
    }

    pub fn manuscript_dir(&self) -> PathBuf {
        self.root.join("manuscript")
    }

    pub fn prompts_dir(&self) -> PathBuf {
        self.root.join("prompts")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup("/book", move |k| vars.get(k).cloned())
    }

    #[test]
    fn applies_defaults_when_unset() {
        let config = config_from(&[]);
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.llm.base_url, DEFAULT_LLM_URL);
        assert!(config.llm.api_key.is_none());
        assert_eq!(config.hosting.default_branch, "main");
        assert!(config.hosting.token.is_none());
        assert!(config.hosting.repository.is_none());
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("MODEL_NAME", "gpt-4o-mini"),
            ("OPENAI_API_KEY", "sk-test"),
            ("GITHUB_TOKEN", "ghp_x"),
            ("GITHUB_REPO", "me/book"),
            ("DEFAULT_BRANCH", "trunk"),
        ]);
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.hosting.repository.as_deref(), Some("me/book"));
        assert_eq!(config.hosting.default_branch, "trunk");
    }

    #[test]
    fn treats_empty_values_as_unset() {
        let config = config_from(&[("GITHUB_TOKEN", ""), ("DEFAULT_BRANCH", "  ")]);
        assert!(config.hosting.token.is_none());
        assert_eq!(config.hosting.default_branch, "main");
    }

    #[test]
    fn derives_manuscript_and_prompt_dirs() {
        let config = config_from(&[]);
        assert_eq!(config.manuscript_dir(), PathBuf::from("/book/manuscript"));
        assert_eq!(config.prompts_dir(), PathBuf::from("/book/prompts"));
    }
}

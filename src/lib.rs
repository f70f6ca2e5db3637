//! Manuscript drafting assistant.
//!
//! Drafts an outline and chapters through an LLM, keeps continuity notes in the
//! story bible, and publishes the manuscript through git and a hosting service.

pub mod commands;
pub mod config;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod store;
pub mod templates;
pub mod vcs;

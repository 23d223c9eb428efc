//! Prompt system for the ladle pipeline.
//!
//! This crate provides the literal prompt templates the pipeline sends to
//! the reasoning service, with:
//! - Built-in definitions for every pipeline call site
//! - Handlebars template rendering
//! - Per-workspace YAML overrides (`.ladle/prompts/<id>.yml`)
//!
//! The diet-filter and extraction templates demand a JSON array as output;
//! downstream parsing depends on that.

pub mod builder;
pub mod loader;
pub mod templates;
pub mod types;

// Re-export main types
pub use builder::build_prompt;
pub use loader::{list_prompts, load_prompt};
pub use templates::PromptSet;
pub use types::PromptDefinition;

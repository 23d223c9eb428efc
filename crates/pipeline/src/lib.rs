//! The ladle query pipeline.
//!
//! Composes intent classification, catalog search, corpus retrieval,
//! allergen/diet safety filtering, and origin tagging into the end-to-end
//! flow behind `RecipePipeline::run_query`.
//!
//! Degradation is the rule here: no reasoning-service or catalog failure is
//! fatal to a query. A query with zero results after full degradation is a
//! valid, non-error outcome.

pub mod classify;
pub mod orchestrator;
pub mod safety;

// Re-export main types
pub use classify::{classify, Classification, Intent};
pub use orchestrator::{PipelineConfig, RecipePipeline};
pub use safety::{AllergenCache, SafetyClassifier};

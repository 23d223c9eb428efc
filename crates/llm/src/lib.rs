//! Reasoning-service integration crate for ladle.
//!
//! This crate provides a provider-agnostic abstraction for the single-turn
//! completion calls the pipeline makes (intent classification, allergen
//! checks, diet filtering, recipe extraction). It supports multiple providers
//! through a unified trait-based interface.
//!
//! # Providers
//! - **Ollama**: Local LLM runtime (default)
//! - **OpenAI**: OpenAI-compatible chat completions endpoint
//! - **Mock**: Scripted responses for tests
//!
//! # Example
//! ```no_run
//! use ladle_llm::{LlmClient, LlmRequest, providers::OllamaClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::new();
//! let request = LlmRequest::new("Hello, world!", "llama3");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod json;
pub mod providers;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use json::clean_json;
pub use providers::{MockClient, OllamaClient, OpenAiClient};

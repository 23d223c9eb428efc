//! Scripted mock provider for tests.
//!
//! Plays back a fixed sequence of successes/failures and records every
//! prompt it receives, so callers can assert on call counts (cache-hit
//! observability) and on both the success and failure degradation paths.

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use ladle_core::{AppError, AppResult};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// One scripted reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Respond with this content
    Ok(String),
    /// Fail with this message
    Err(String),
}

/// Scripted reasoning-service client.
pub struct MockClient {
    script: Mutex<VecDeque<MockReply>>,
    /// When the script runs dry: repeat this reply (None = error out)
    fallback: Option<MockReply>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockClient {
    /// Create a client that plays back `replies` in order and errors once
    /// the script is exhausted.
    pub fn scripted(replies: Vec<MockReply>) -> Self {
        Self {
            script: Mutex::new(replies.into()),
            fallback: None,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Create a client that answers every call with `content`.
    pub fn always(content: impl Into<String>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Some(MockReply::Ok(content.into())),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Create a client where every call fails.
    pub fn failing() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Some(MockReply::Err("mock service unavailable".to_string())),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Number of completions requested so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts received so far, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl LlmClient for MockClient {
    fn provider_name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(request.prompt.clone());

        let reply = {
            let mut script = self.script.lock().unwrap();
            script.pop_front().or_else(|| self.fallback.clone())
        };

        match reply {
            Some(MockReply::Ok(content)) => Ok(LlmResponse {
                content,
                model: request.model.clone(),
                usage: LlmUsage::default(),
                done: true,
            }),
            Some(MockReply::Err(message)) => Err(AppError::Llm(message)),
            None => Err(AppError::Llm("mock script exhausted".to_string())),
        }
    }
}

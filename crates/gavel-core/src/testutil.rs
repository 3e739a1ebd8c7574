//! Scripted provider shared by unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::traits::{CompletionRequest, CompletionResponse, LlmProvider, TokenUsage};

/// Replays a fixed sequence of replies; the last reply repeats once the
/// script is exhausted. Can also be set up to always fail.
pub struct ScriptedProvider {
    script: Mutex<VecDeque<String>>,
    last_reply: Mutex<String>,
    error: Option<String>,
    call_count: AtomicU32,
    last_request: Mutex<Option<CompletionRequest>>,
}

impl ScriptedProvider {
    pub fn new(replies: &[&str]) -> Self {
        Self {
            script: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            last_reply: Mutex::new(replies.last().map(|r| r.to_string()).unwrap_or_default()),
            error: None,
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            last_reply: Mutex::new(String::new()),
            error: Some(message.to_string()),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &CompletionRequest) -> anyhow::Result<CompletionResponse> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_request.lock().unwrap() = Some(request.clone());

        if let Some(message) = &self.error {
            anyhow::bail!("{message}");
        }

        let content = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.last_reply.lock().unwrap().clone());

        Ok(CompletionResponse {
            content,
            model: request.model.clone(),
            token_usage: TokenUsage::default(),
            latency_ms: 1,
        })
    }
}

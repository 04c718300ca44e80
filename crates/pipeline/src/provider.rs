//! The oracle port: the only capability the pipeline needs from a hosted model.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{LlmError, Temperature};

/// A chat-style prompt: one system turn and one user turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Role and rules for the model.
    pub system: String,
    /// The task, with every input embedded.
    pub user: String,
    /// Sampling temperature for this call.
    pub temperature: Temperature,
}

impl CompletionRequest {
    /// Creates a request with the given system and user prompts.
    pub fn new(system: impl Into<String>, user: impl Into<String>, temperature: Temperature) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            temperature,
        }
    }
}

/// Text-completion oracle backed by a hosted model.
///
/// Implementations normalize whatever shape the provider returns (single
/// string, list of parts, ...) into one `String` before returning.
///
/// One provider instance is shared by every concurrent pipeline run, so
/// implementations must support many independent in-flight calls; they must
/// not keep per-call mutable state.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Short provider name for logs (e.g. `"gemini"`).
    fn name(&self) -> &str;

    /// Submits `request` and waits for the complete response text.
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError>;
}

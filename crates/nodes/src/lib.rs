//! Pipeline stage implementations and the sequential executor.
//!
//! Each stage module owns its prompt template, its sampling temperature, its
//! response parser and its fallback values. Parsers are plain functions so
//! they can be tested without a model; the `*Node` types wrap them around one
//! oracle call.
//!
//! | Module | Stage |
//! |--------|-------|
//! | [`planning`] | description → `Plan` |
//! | [`design`] | `Plan` → `Design` |
//! | [`codegen`] | `Plan` + `Design` → `GeneratedCode` |
//! | [`review`] | `GeneratedCode` → `ReviewReport` |
//! | [`executor`] | `PipelineExecutor`, runs all four in order |
//! | [`summary`] | text renderings for CLI and HTTP callers |
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** Nodes sequence calls between the business logic
//! in [`pipeline`] and the [`pipeline::LlmProvider`] port. Transport details
//! never reach this crate.

pub mod codegen;
pub mod design;
pub mod executor;
pub mod planning;
pub mod review;
pub mod summary;

pub use executor::{NoopObserver, PipelineExecutor, StageObserver};
pub use summary::StageSummaries;

use pipeline::TargetLanguage;

/// Renders items as `- item` lines.
pub(crate) fn bulleted(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Language name for prompts and fallback text; never empty.
pub(crate) fn language_label(language: &TargetLanguage) -> &str {
    if language.is_empty() {
        "the requested language"
    } else {
        language.as_str()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use pipeline::{CompletionRequest, LlmError, LlmProvider};

    /// Returns queued responses in order, then fails every further call.
    pub struct ScriptedProvider {
        responses: Mutex<VecDeque<String>>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedProvider {
        pub fn with_responses<I, S>(responses: I) -> Arc<Self>
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            Arc::new(Self {
                responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
                requests: Mutex::new(Vec::new()),
            })
        }

        pub fn failing() -> Arc<Self> {
            Self::with_responses(Vec::<String>::new())
        }

        pub fn requests(&self) -> Vec<CompletionRequest> {
            self.requests.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
            self.requests.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| LlmError::Transport {
                    message: "script exhausted".to_string(),
                })
        }
    }
}

//! Error types for the code generation pipeline domain.
//!
//! The pipeline distinguishes four kinds of failure, and only two of them are
//! errors in the Rust sense:
//!
//! | Kind | Representation |
//! |------|----------------|
//! | Missing credential / invalid configuration | [`PipelineError::Configuration`] (fatal at startup) |
//! | Oracle call failure (network, quota, model) | [`PipelineError::Llm`] wrapping [`LlmError`] (aborts the run) |
//! | Malformed or unstructured model output | never an error; stages substitute fallback values |
//! | Defects found in generated code | never an error; reported in [`crate::ReviewReport`] |

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::StageName;

// ---------------------------------------------------------------------------
// LLM provider errors
// ---------------------------------------------------------------------------

/// Failure of a single call to the hosted model.
///
/// Produced by [`crate::LlmProvider`] implementations. Variants carry rendered
/// strings rather than transport error types so this crate stays free of I/O
/// dependencies.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum LlmError {
    /// The request never produced an HTTP response (DNS, TLS, timeout, reset).
    #[error("LLM transport failure: {message}")]
    Transport {
        /// Rendered description of the transport failure.
        message: String,
    },

    /// The provider answered with a non-success status.
    #[error("LLM provider returned status {status}: {body}")]
    BadStatus {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned by the provider.
        body: String,
    },

    /// The response body could not be decoded into the provider's schema.
    #[error("Could not decode LLM response: {message}")]
    Decode {
        /// Description of the decoding problem.
        message: String,
    },

    /// The provider refused to answer (safety block, recitation, etc.).
    #[error("LLM provider blocked the request: {reason}")]
    Blocked {
        /// Block reason reported by the provider.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Pipeline-level errors
// ---------------------------------------------------------------------------

/// Errors that abort a pipeline run or prevent the pipeline from starting.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Required configuration is missing or invalid.
    ///
    /// Produced at startup; the pipeline never starts with an invalid config.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },

    /// The oracle call made by `stage` failed. No retry is attempted.
    #[error("{stage} stage failed: {source}")]
    Llm {
        /// Stage whose oracle call failed.
        stage: StageName,
        /// Underlying provider error.
        #[source]
        source: LlmError,
    },
}

impl PipelineError {
    /// Creates a [`PipelineError::Configuration`].
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Returns a closure that wraps an [`LlmError`] for `stage`, for use with
    /// `map_err`.
    pub fn llm(stage: StageName) -> impl FnOnce(LlmError) -> Self {
        move |source| Self::Llm { stage, source }
    }

    /// Returns the stage that failed, if the error came from an oracle call.
    pub fn stage(&self) -> Option<StageName> {
        match self {
            Self::Llm { stage, .. } => Some(*stage),
            Self::Configuration { .. } => None,
        }
    }
}

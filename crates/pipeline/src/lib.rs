//! Core domain for the code generation pipeline.
//!
//! This crate holds every record passed between stages, the error taxonomy,
//! the [`LlmProvider`] port, and the pure text heuristics the stages share:
//! section extraction, code-fence extraction, filename suggestion, and static
//! code checks. Stage orchestration lives in `nodes`; transport lives in `llm`
//! and `listener`.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; infrastructure crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | `PipelineRunId`, `StageName`, `TargetLanguage` |
//! | [`types`] | `Plan`, `Design`, `GeneratedCode`, `ReviewReport`, `PipelineRun`, `Temperature` |
//! | [`errors`] | `PipelineError`, `LlmError` |
//! | [`provider`] | `LlmProvider` trait and `CompletionRequest` |
//! | [`extraction`] | Header/bullet section parser shared by all stages |
//! | [`code`] | Code-fence extraction and language → filename mapping |
//! | [`static_checks`] | Empty-code, entry-point and infinite-loop checks |

pub mod code;
pub mod errors;
pub mod extraction;
pub mod identifiers;
pub mod provider;
pub mod static_checks;
pub mod types;

// Re-export the common types at the crate root for downstream crates.
pub use errors::{LlmError, PipelineError};
pub use identifiers::{PipelineRunId, StageName, TargetLanguage};
pub use provider::{CompletionRequest, LlmProvider};
pub use types::{
    Design, GeneratedCode, PipelineRun, Plan, ReviewCheck, ReviewReport, Temperature, Timestamp,
};

//! LLM provider infrastructure adapter.
//!
//! Implements the [`pipeline::LlmProvider`] trait for Google's Gemini
//! `generateContent` API. Other providers are added as new modules in this
//! crate without any changes to the `pipeline` crate.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** HTTP transport, request formatting, and response
//! normalization live here. The [`pipeline`] crate sees only
//! [`pipeline::LlmProvider`]. No retry or back-off is attempted: a failed call
//! surfaces immediately as a [`pipeline::LlmError`].

pub mod config;
pub mod gemini;
pub mod wire;

pub use config::{GeminiConfig, API_KEY_ENV, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT};
pub use gemini::GeminiProvider;

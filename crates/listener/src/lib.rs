//! HTTP front end for the code generation pipeline.
//!
//! | Route | Behaviour |
//! |-------|-----------|
//! | `POST /generate` | `{description, language}` → `{planning, design, code, testing}` |
//! | `GET /health` | `{"status":"ok"}` |
//!
//! A failed run answers `500` with `{"error": message}`. Any description,
//! including a blank one, is passed to the pipeline as given. Malformed JSON
//! is rejected by the `Json` extractor before the pipeline is touched.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Routing, CORS, and request tracing live here. Each
//! request is one [`nodes::PipelineExecutor::run`]; runs from concurrent
//! requests share the executor and never share state.

pub mod error;
pub mod routes;
pub mod server;

pub use error::{ErrorBody, ListenerError};
pub use routes::{create_app, GenerateRequest, HealthResponse};
pub use server::{bind, serve};

//! Newtype domain identifiers.
//!
//! Each concept with an identity gets its own type, so a run identifier can
//! never be confused with a language name even where both end up as strings in
//! logs and JSON.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Identifiers: UUID-backed, internally generated
// ---------------------------------------------------------------------------

/// Identifies a single pipeline execution (one Plan → Design → Code → Review pass).
///
/// Generated fresh for every run; recorded on the run span so all activity
/// from a single run can be correlated in logs and traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PipelineRunId(Uuid);

impl PipelineRunId {
    /// Generates a new random run identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for PipelineRunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

/// The four pipeline roles, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageName {
    /// Description → [`crate::Plan`].
    Planning,
    /// [`crate::Plan`] → [`crate::Design`].
    Design,
    /// [`crate::Design`] → [`crate::GeneratedCode`].
    CodeGeneration,
    /// [`crate::GeneratedCode`] → [`crate::ReviewReport`].
    Review,
}

impl StageName {
    /// All stages in the order the executor runs them.
    pub const ALL: [StageName; 4] = [
        StageName::Planning,
        StageName::Design,
        StageName::CodeGeneration,
        StageName::Review,
    ];
}

impl std::fmt::Display for StageName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Planning => "Planning",
            Self::Design => "Design",
            Self::CodeGeneration => "Code generation",
            Self::Review => "Review",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Target language
// ---------------------------------------------------------------------------

/// The programming language the user asked for, as typed.
///
/// Unlike most identifiers this one may be empty: an empty language yields
/// degraded (fallback-heavy) output rather than an error. Comparisons against
/// lookup tables go through [`TargetLanguage::key`], which is trimmed and
/// lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetLanguage(String);

impl TargetLanguage {
    /// Wraps a user-supplied language name, trimming surrounding whitespace.
    pub fn new(value: impl Into<String>) -> Self {
        let v = value.into();
        Self(v.trim().to_string())
    }

    /// Returns the language name as supplied (trimmed).
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the lowercase lookup key used by extension and check tables.
    pub fn key(&self) -> String {
        self.0.to_lowercase()
    }

    /// Returns `true` if no language was supplied.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TargetLanguage {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

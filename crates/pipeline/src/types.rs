//! Records exchanged between pipeline stages, plus small value types.
//!
//! Each record is produced exactly once by its stage and never mutated
//! afterwards: fields are private and exposed through accessors. Constructors
//! enforce the structural caps (list lengths, explanation length); the stages
//! enforce non-emptiness through their fallback values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{PipelineRunId, TargetLanguage};

// ---------------------------------------------------------------------------
// Sampling temperature
// ---------------------------------------------------------------------------

/// Sampling temperature passed to the model, in the range `[0.0, 2.0]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Temperature(f32);

impl Temperature {
    /// Upper bound accepted by the hosted model.
    pub const MAX: f32 = 2.0;

    /// Creates a [`Temperature`] from tenths (e.g. `4` → `0.4`), saturating at
    /// [`Temperature::MAX`]. Usable in `const` contexts.
    pub const fn from_tenths(tenths: u8) -> Self {
        let t = if tenths > 20 { 20 } else { tenths };
        Self(t as f32 / 10.0)
    }

    /// Returns the temperature as an `f32`.
    pub fn as_f32(self) -> f32 {
        self.0
    }
}

impl std::fmt::Display for Temperature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

/// Development plan produced by the planning stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    overview: String,
    features: Vec<String>,
    approach: String,
    considerations: String,
}

impl Plan {
    /// Maximum number of features kept; extra bullets are dropped.
    pub const MAX_FEATURES: usize = 8;

    /// Creates a plan, keeping at most [`Plan::MAX_FEATURES`] features.
    pub fn new(
        overview: impl Into<String>,
        mut features: Vec<String>,
        approach: impl Into<String>,
        considerations: impl Into<String>,
    ) -> Self {
        features.truncate(Self::MAX_FEATURES);
        Self {
            overview: overview.into(),
            features,
            approach: approach.into(),
            considerations: considerations.into(),
        }
    }

    /// One-paragraph summary of what will be built.
    pub fn overview(&self) -> &str {
        &self.overview
    }

    /// Feature bullets, at most [`Plan::MAX_FEATURES`].
    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn approach(&self) -> &str {
        &self.approach
    }

    /// Edge cases and risks; may be empty.
    pub fn considerations(&self) -> &str {
        &self.considerations
    }
}

// ---------------------------------------------------------------------------
// Design
// ---------------------------------------------------------------------------

/// Technical design produced by the design stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Design {
    architecture: String,
    components: Vec<String>,
    data_structures: String,
    function_signatures: String,
}

impl Design {
    /// Maximum number of components kept; extra bullets are dropped.
    pub const MAX_COMPONENTS: usize = 10;

    /// Creates a design, keeping at most [`Design::MAX_COMPONENTS`] components.
    pub fn new(
        architecture: impl Into<String>,
        mut components: Vec<String>,
        data_structures: impl Into<String>,
        function_signatures: impl Into<String>,
    ) -> Self {
        components.truncate(Self::MAX_COMPONENTS);
        Self {
            architecture: architecture.into(),
            components,
            data_structures: data_structures.into(),
            function_signatures: function_signatures.into(),
        }
    }

    /// High-level structure of the solution.
    pub fn architecture(&self) -> &str {
        &self.architecture
    }

    /// Component bullets, at most [`Design::MAX_COMPONENTS`].
    pub fn components(&self) -> &[String] {
        &self.components
    }

    pub fn data_structures(&self) -> &str {
        &self.data_structures
    }

    /// Signatures the code generation stage is asked to implement.
    pub fn function_signatures(&self) -> &str {
        &self.function_signatures
    }
}

// ---------------------------------------------------------------------------
// Generated code
// ---------------------------------------------------------------------------

/// Source file produced by the code generation stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedCode {
    source_text: String,
    filename: String,
    explanation: String,
}

impl GeneratedCode {
    /// Maximum explanation length, in characters.
    pub const MAX_EXPLANATION_CHARS: usize = 500;

    /// Creates a generated-code record, truncating `explanation` to
    /// [`GeneratedCode::MAX_EXPLANATION_CHARS`] characters.
    pub fn new(
        source_text: impl Into<String>,
        filename: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        let explanation: String = explanation
            .into()
            .chars()
            .take(Self::MAX_EXPLANATION_CHARS)
            .collect();
        Self {
            source_text: source_text.into(),
            filename: filename.into(),
            explanation,
        }
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    /// Suggested filename derived from the target language.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }
}

// ---------------------------------------------------------------------------
// Review
// ---------------------------------------------------------------------------

/// One named pass/fail check in a [`ReviewReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewCheck {
    pub name: String,
    pub passed: bool,
    pub details: String,
}

impl ReviewCheck {
    pub fn new(name: impl Into<String>, passed: bool, details: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed,
            details: details.into(),
        }
    }
}

/// Review of generated code produced by the review stage.
///
/// `production_ready` is derived, never supplied: it is `true` exactly when
/// `issues` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewReport {
    overall_quality: String,
    checks: Vec<ReviewCheck>,
    issues: Vec<String>,
    suggestions: Vec<String>,
    production_ready: bool,
}

impl ReviewReport {
    pub fn new(
        overall_quality: impl Into<String>,
        checks: Vec<ReviewCheck>,
        issues: Vec<String>,
        suggestions: Vec<String>,
    ) -> Self {
        let production_ready = issues.is_empty();
        Self {
            overall_quality: overall_quality.into(),
            checks,
            issues,
            suggestions,
            production_ready,
        }
    }

    pub fn overall_quality(&self) -> &str {
        &self.overall_quality
    }

    pub fn checks(&self) -> &[ReviewCheck] {
        &self.checks
    }

    /// Critical issues found by static checks and the model review combined.
    pub fn issues(&self) -> &[String] {
        &self.issues
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn is_production_ready(&self) -> bool {
        self.production_ready
    }
}

// ---------------------------------------------------------------------------
// Run bundle
// ---------------------------------------------------------------------------

/// Everything one pipeline run produced, in stage order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineRun {
    pub run_id: PipelineRunId,
    pub started_at: Timestamp,
    pub description: String,
    pub language: TargetLanguage,
    pub plan: Plan,
    pub design: Design,
    pub code: GeneratedCode,
    pub review: ReviewReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bullets(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("item {i}")).collect()
    }

    #[test]
    fn plan_caps_features() {
        let plan = Plan::new("o", bullets(12), "a", "c");
        assert_eq!(plan.features().len(), Plan::MAX_FEATURES);
        assert_eq!(plan.features()[7], "item 8");
    }

    #[test]
    fn design_caps_components() {
        let design = Design::new("a", bullets(15), "d", "f");
        assert_eq!(design.components().len(), Design::MAX_COMPONENTS);
    }

    #[test]
    fn explanation_is_truncated_on_char_boundaries() {
        let long = "é".repeat(700);
        let code = GeneratedCode::new("x", "generated_code.py", long);
        assert_eq!(code.explanation().chars().count(), 500);
    }

    #[test]
    fn readiness_follows_issue_list() {
        let clean = ReviewReport::new("ok", vec![], vec![], vec![]);
        assert!(clean.is_production_ready());

        let broken = ReviewReport::new("bad", vec![], vec!["syntax error".into()], vec![]);
        assert!(!broken.is_production_ready());
    }

    #[test]
    fn temperature_saturates_at_the_model_limit() {
        assert_eq!(Temperature::from_tenths(3).to_string(), "0.3");
        assert_eq!(Temperature::from_tenths(99).as_f32(), 2.0);
    }
}

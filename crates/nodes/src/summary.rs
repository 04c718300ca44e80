//! Human-readable renderings of stage outputs.
//!
//! These are what the CLI prints and what the HTTP endpoint returns. The
//! review summary is where the "no issues" fallback text lives: the report
//! itself keeps an empty issue list so readiness stays derivable from it.

use pipeline::{Design, GeneratedCode, PipelineRun, Plan, ReviewReport};
use serde::{Deserialize, Serialize};

use crate::bulleted;

/// Text shown in place of an empty issue list.
pub const NO_ISSUES_TEXT: &str = "No critical issues found";

pub fn plan_summary(plan: &Plan) -> String {
    format!(
        "Project Overview:\n{}\n\nKey Features:\n{}\n\nApproach:\n{}\n\nConsiderations:\n{}",
        plan.overview(),
        bulleted(plan.features()),
        plan.approach(),
        plan.considerations(),
    )
}

pub fn design_summary(design: &Design) -> String {
    format!(
        "Architecture:\n{}\n\nComponents:\n{}\n\nData Structures:\n{}\n\nFunction Signatures:\n{}",
        design.architecture(),
        bulleted(design.components()),
        design.data_structures(),
        design.function_signatures(),
    )
}

pub fn code_summary(code: &GeneratedCode) -> String {
    format!(
        "Filename: {}\nExplanation: {}\n\n--- Generated Code ---\n{}\n--- End of Code ---",
        code.filename(),
        code.explanation(),
        code.source_text(),
    )
}

pub fn review_summary(report: &ReviewReport) -> String {
    let checks = report
        .checks()
        .iter()
        .map(|c| {
            format!(
                "- {}: {} ({})",
                c.name,
                if c.passed { "PASS" } else { "FAIL" },
                c.details
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let issues = if report.issues().is_empty() {
        format!("- {NO_ISSUES_TEXT}")
    } else {
        bulleted(report.issues())
    };

    format!(
        "Overall Quality: {}\n\nTest Results:\n{}\n\nIssues Found:\n{}\n\nSuggestions:\n{}\n\nProduction Ready: {}",
        report.overall_quality(),
        checks,
        issues,
        bulleted(report.suggestions()),
        if report.is_production_ready() { "YES" } else { "NO" },
    )
}

/// The four text blobs returned to callers: three summaries plus raw code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageSummaries {
    pub planning: String,
    pub design: String,
    /// Raw generated source, not a summary.
    pub code: String,
    pub testing: String,
}

impl StageSummaries {
    pub fn from_run(run: &PipelineRun) -> Self {
        Self {
            planning: plan_summary(&run.plan),
            design: design_summary(&run.design),
            code: run.code.source_text().to_string(),
            testing: review_summary(&run.review),
        }
    }
}

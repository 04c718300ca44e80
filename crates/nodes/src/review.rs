//! Review stage: [`GeneratedCode`] → [`ReviewReport`].
//!
//! Two independent passes feed one report:
//!
//! 1. [`pipeline::static_checks`]: deterministic, no oracle call.
//! 2. A strict model review that reports only defects that stop the program
//!    from running, or the literal [`NO_CRITICAL_ISSUES`].
//!
//! The issue list is the ordered, de-duplicated union of both passes, and the
//! code is production-ready exactly when that list is empty.

use std::sync::Arc;

use pipeline::extraction::bullet_item;
use pipeline::static_checks::run_static_checks;
use pipeline::{
    CompletionRequest, GeneratedCode, LlmProvider, PipelineError, ReviewCheck, ReviewReport,
    StageName, TargetLanguage, Temperature,
};
use tracing::{debug, instrument};

pub const TEMPERATURE: Temperature = Temperature::from_tenths(4);

/// Sentinel the model returns when it finds nothing critical.
pub const NO_CRITICAL_ISSUES: &str = "NO_CRITICAL_ISSUES";

pub const SYNTAX_CHECK: &str = "Syntax & Structure";
pub const RUNTIME_CHECK: &str = "Runtime Safety";

const SYSTEM_PROMPT: &str = "You are a strict code reviewer.
Report ONLY critical defects that prevent the program from running correctly:
- syntax errors
- guaranteed crashes
- infinite loops
- a missing program entry point
Do not report style, naming, documentation or optional improvements as critical.";

/// Builds the review prompt: the original request, the language, and the code
/// in a fenced block, with the labeling rules the response parser relies on.
pub fn build_request(
    description: &str,
    code: &GeneratedCode,
    language: &TargetLanguage,
) -> CompletionRequest {
    let user = format!(
        "ORIGINAL REQUEST:
{description}

LANGUAGE: {language}

CODE:
```{language}
{source}
```

List each critical defect on its own line starting with \"CRITICAL:\".
You may add optional suggestions on lines starting with \"SUGGESTION:\".
If there are no critical defects, reply with exactly: {NO_CRITICAL_ISSUES}",
        source = code.source_text(),
    );
    CompletionRequest::new(SYSTEM_PROMPT, user, TEMPERATURE)
}

/// What the model review reported, split by severity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelFindings {
    pub critical: Vec<String>,
    pub suggestions: Vec<String>,
}

/// Buckets review response lines into critical issues and suggestions.
///
/// A line labeled `CRITICAL:` is always critical, however short it is and
/// even when the sentinel also appears. When such a line ends in `:`, the next
/// unlabeled line is taken as its detail and joined onto it. A line labeled
/// `SUGGESTION:` is always a suggestion.
///
/// Unlabeled lines are critical when they mention `critical` or `error`,
/// unless the sentinel appears anywhere in the response, in which case they
/// are suggestions. Header-like unlabeled lines (short, ending in `:`),
/// negations such as "No critical issues", and the sentinel itself are
/// dropped.
pub fn parse_review_response(response: &str) -> ModelFindings {
    let declared_clean = response.contains(NO_CRITICAL_ISSUES);
    let mut findings = ModelFindings::default();
    // Index of a labeled critical finding still waiting for its detail line.
    let mut open_critical: Option<usize> = None;

    for raw in response.lines() {
        let line = raw.trim();
        if line.is_empty() || line.contains(NO_CRITICAL_ISSUES) {
            continue;
        }
        let line = bullet_item(line).unwrap_or(line);

        match split_label(line) {
            (Some(Label::Critical), text) => {
                let finding = text.trim_end_matches(':').trim_end();
                if finding.is_empty() {
                    continue;
                }
                findings.critical.push(finding.to_string());
                open_critical = text.ends_with(':').then(|| findings.critical.len() - 1);
            }
            (Some(Label::Suggestion), text) => {
                open_critical = None;
                if !text.is_empty() {
                    findings.suggestions.push(text.to_string());
                }
            }
            (None, text) => {
                if is_header(text) {
                    open_critical = None;
                    continue;
                }
                let lower = text.to_lowercase();
                if is_negation(&lower) {
                    continue;
                }
                if let Some(index) = open_critical.take() {
                    let finding = &mut findings.critical[index];
                    finding.push_str(": ");
                    finding.push_str(text);
                } else if !declared_clean && (lower.contains("critical") || lower.contains("error")) {
                    findings.critical.push(text.to_string());
                } else {
                    findings.suggestions.push(text.to_string());
                }
            }
        }
    }
    findings
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Label {
    Critical,
    Suggestion,
}

fn is_header(line: &str) -> bool {
    line.ends_with(':') && line.split_whitespace().count() <= 4
}

fn is_negation(lower: &str) -> bool {
    lower.trim_end_matches('.') == "none"
        || ["no critical", "no errors", "no issues"]
            .iter()
            .any(|prefix| lower.starts_with(prefix))
}

/// Splits a leading `CRITICAL:` / `SUGGESTION:` label (any case) off `line`.
fn split_label(line: &str) -> (Option<Label>, &str) {
    for (label, kind) in [("CRITICAL:", Label::Critical), ("SUGGESTION:", Label::Suggestion)] {
        if let Some(prefix) = line.get(..label.len()) {
            if prefix.eq_ignore_ascii_case(label) {
                return (Some(kind), line[label.len()..].trim());
            }
        }
    }
    (None, line)
}

/// Combines static-check issues and model findings into the final report.
pub fn build_report(static_issues: Vec<String>, findings: ModelFindings) -> ReviewReport {
    let mut issues: Vec<String> = Vec::new();
    for issue in static_issues.into_iter().chain(findings.critical) {
        if !issues.contains(&issue) {
            issues.push(issue);
        }
    }

    let ready = issues.is_empty();
    let count = issues.len();

    let checks = vec![
        ReviewCheck::new(
            SYNTAX_CHECK,
            ready,
            if ready {
                "No syntax or structural defects detected".to_string()
            } else {
                format!("{count} critical issue(s) found")
            },
        ),
        ReviewCheck::new(
            RUNTIME_CHECK,
            ready,
            if ready {
                "No crash or infinite-loop risks detected"
            } else {
                "Critical issues must be fixed before running"
            },
        ),
    ];

    let overall_quality = if ready {
        "Code passes all critical checks and is ready to run.".to_string()
    } else {
        format!("{count} critical issue(s) found; the code needs fixes before use.")
    };

    let suggestions = if findings.suggestions.is_empty() {
        vec![
            "Code appears functional".to_string(),
            "Test with various inputs".to_string(),
        ]
    } else {
        findings.suggestions
    };

    ReviewReport::new(overall_quality, checks, issues, suggestions)
}

/// Reviews [`GeneratedCode`] with static checks plus one oracle call.
pub struct ReviewNode {
    provider: Arc<dyn LlmProvider>,
}

impl ReviewNode {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    #[instrument(skip_all, fields(stage = %StageName::Review))]
    pub async fn review(
        &self,
        description: &str,
        code: &GeneratedCode,
        language: &TargetLanguage,
    ) -> Result<ReviewReport, PipelineError> {
        let static_issues = run_static_checks(code.source_text(), language);
        debug!(static_issues = static_issues.len(), "static checks complete");

        let response = self
            .provider
            .complete(build_request(description, code, language))
            .await
            .map_err(PipelineError::llm(StageName::Review))?;

        let findings = parse_review_response(&response);
        let report = build_report(static_issues, findings);
        debug!(
            issues = report.issues().len(),
            production_ready = report.is_production_ready(),
            "review complete"
        );
        Ok(report)
    }
}

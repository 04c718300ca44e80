//! Planning stage: feature request → [`Plan`].

use std::sync::Arc;

use pipeline::extraction::{Section, SectionParser};
use pipeline::{
    CompletionRequest, LlmProvider, PipelineError, Plan, StageName, TargetLanguage, Temperature,
};
use tracing::{debug, instrument};

use crate::language_label;

/// Low temperature keeps plans short and deterministic.
pub const TEMPERATURE: Temperature = Temperature::from_tenths(4);

const SYSTEM_PROMPT: &str = "You are a senior software architect.

Rules:
- Be concise.
- Include only what is required to build the system.
- No optional extras, no repetition.
- Prefer practical decisions that translate directly into code.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlanField {
    Overview,
    Features,
    Approach,
    Considerations,
}

const SECTIONS: &[Section<PlanField>] = &[
    Section::text(PlanField::Overview, &["project overview", "overview", "summary"]),
    Section::list(PlanField::Features, &["key features", "features"]),
    Section::text(PlanField::Approach, &["implementation approach", "approach"]),
    Section::text(PlanField::Considerations, &["considerations", "constraints"]),
];

const PARSER: SectionParser<PlanField> = SectionParser::new(SECTIONS);

/// Builds the planning prompt for `description` in `language`.
pub fn build_request(description: &str, language: &TargetLanguage) -> CompletionRequest {
    let user = format!(
        "Create a SHORT, STRUCTURED development plan.

PROJECT DESCRIPTION:
{description}

LANGUAGE:
{language}

Answer in exactly this format:

Overview:
<one or two sentences>

Key Features:
- <feature>
- <feature>
- <feature>

Approach:
<short paragraph>

Considerations:
<critical constraints only>"
    );
    CompletionRequest::new(SYSTEM_PROMPT, user, TEMPERATURE)
}

/// Parses a planning response, substituting fallbacks for every empty field.
pub fn parse_plan(response: &str, language: &TargetLanguage) -> Plan {
    let sections = PARSER.parse(response);
    let label = language_label(language);

    Plan::new(
        sections.text_or_else(PlanField::Overview, || {
            format!("Build the requested system using {label}.")
        }),
        sections.items_or_else(PlanField::Features, || {
            vec![
                "Core functionality".to_string(),
                "Input handling".to_string(),
                "Output generation".to_string(),
            ]
        }),
        sections.text_or_else(PlanField::Approach, || {
            format!("Implement using clean, modular {label} code.")
        }),
        sections.text_or_else(PlanField::Considerations, || {
            "Ensure correctness, performance, and maintainability.".to_string()
        }),
    )
}

/// Turns a free-text feature request into a [`Plan`].
pub struct PlanningNode {
    provider: Arc<dyn LlmProvider>,
}

impl PlanningNode {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// Makes one oracle call. Provider failures propagate; parse shortfalls
    /// are covered by fallbacks.
    #[instrument(skip_all, fields(stage = %StageName::Planning))]
    pub async fn plan(
        &self,
        description: &str,
        language: &TargetLanguage,
    ) -> Result<Plan, PipelineError> {
        let response = self
            .provider
            .complete(build_request(description, language))
            .await
            .map_err(PipelineError::llm(StageName::Planning))?;

        let plan = parse_plan(&response, language);
        debug!(features = plan.features().len(), "plan parsed");
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedProvider;

    fn python() -> TargetLanguage {
        TargetLanguage::new("Python")
    }

    #[test]
    fn well_formed_response_fills_every_field() {
        let response = "Overview:\nAdds two integers.\n\nKey Features:\n- Read two numbers\n- Print the sum\n\nApproach:\nA single function.\n\nConsiderations:\nReject non-numeric input.";
        let plan = parse_plan(response, &python());

        assert_eq!(plan.overview(), "Adds two integers.");
        assert_eq!(plan.features(), ["Read two numbers", "Print the sum"]);
        assert_eq!(plan.approach(), "A single function.");
        assert_eq!(plan.considerations(), "Reject non-numeric input.");
    }

    #[test]
    fn unstructured_response_falls_back() {
        let plan = parse_plan("I cannot help with that.", &python());

        assert_eq!(plan.overview(), "Build the requested system using Python.");
        assert_eq!(plan.features().len(), 3);
        assert_eq!(plan.approach(), "Implement using clean, modular Python code.");
        assert!(!plan.considerations().is_empty());
    }

    #[test]
    fn empty_language_still_produces_readable_fallbacks() {
        let plan = parse_plan("", &TargetLanguage::new(""));
        assert_eq!(
            plan.overview(),
            "Build the requested system using the requested language."
        );
    }

    #[test]
    fn feature_list_is_capped() {
        let bullets: String = (1..=20).map(|i| format!("- feature {i}\n")).collect();
        let plan = parse_plan(&format!("Key Features:\n{bullets}"), &python());
        assert_eq!(plan.features().len(), Plan::MAX_FEATURES);
    }

    #[test]
    fn prompt_embeds_inputs() {
        let request = build_request("sum two integers", &python());
        assert!(request.user.contains("sum two integers"));
        assert!(request.user.contains("Python"));
        assert_eq!(request.temperature, TEMPERATURE);
    }

    #[tokio::test]
    async fn provider_failure_propagates_with_stage() {
        let provider = ScriptedProvider::failing();
        let node = PlanningNode::new(provider.clone());

        let err = node.plan("x", &python()).await.unwrap_err();
        assert_eq!(err.stage(), Some(StageName::Planning));
        assert_eq!(provider.call_count(), 1);
    }
}

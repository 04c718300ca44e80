//! Design stage: [`Plan`] → [`Design`].

use std::sync::Arc;

use pipeline::extraction::{Section, SectionParser};
use pipeline::{
    CompletionRequest, Design, LlmProvider, PipelineError, Plan, StageName, TargetLanguage,
    Temperature,
};
use tracing::{debug, instrument};

use crate::{bulleted, language_label};

pub const TEMPERATURE: Temperature = Temperature::from_tenths(5);

const SYSTEM_PROMPT: &str = "You are an expert software designer.
Turn high-level plans into technical designs: architecture, components,
key data structures and the main function signatures.
Keep the design minimal but complete.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DesignField {
    Architecture,
    Components,
    DataStructures,
    FunctionSignatures,
}

const SECTIONS: &[Section<DesignField>] = &[
    Section::text(DesignField::Architecture, &["system architecture", "architecture"]),
    Section::list(DesignField::Components, &["main components", "components", "modules"]),
    Section::text(
        DesignField::DataStructures,
        &["key data structures", "data structures", "data models", "data model"],
    ),
    Section::text(
        DesignField::FunctionSignatures,
        &["function signatures", "key functions", "functions", "methods"],
    ),
];

const PARSER: SectionParser<DesignField> = SectionParser::new(SECTIONS);

/// Canned signature set used when the model names no functions.
fn default_function_signatures(language: &TargetLanguage) -> String {
    let label = language_label(language);
    format!(
        "main() -> program entry point for the {label} implementation; \
         parse_input(raw) -> structured input; \
         validate(input) -> error on invalid input; \
         process(input) -> result; \
         format_output(result) -> printable text; \
         handle_error(error) -> user-facing message"
    )
}

/// Builds the design prompt from the approved plan.
pub fn build_request(plan: &Plan, language: &TargetLanguage) -> CompletionRequest {
    let user = format!(
        "Based on this development plan, create a technical design.

PROJECT OVERVIEW:
{overview}

KEY FEATURES:
{features}

APPROACH:
{approach}

LANGUAGE: {language}

Answer in exactly this format:

Architecture:
<short paragraph>

Components:
- <component>

Data Structures:
<short paragraph>

Function Signatures:
<one signature per line>",
        overview = plan.overview(),
        features = bulleted(plan.features()),
        approach = plan.approach(),
    );
    CompletionRequest::new(SYSTEM_PROMPT, user, TEMPERATURE)
}

/// Parses a design response, substituting fallbacks for every empty field.
pub fn parse_design(response: &str, language: &TargetLanguage) -> Design {
    let sections = PARSER.parse(response);
    let label = language_label(language);

    Design::new(
        sections.text_or_else(DesignField::Architecture, || {
            format!("Modular {label} application with clear separation of concerns.")
        }),
        sections.items_or_else(DesignField::Components, || {
            vec![
                "Main module".to_string(),
                "Helper functions".to_string(),
                "Data processing".to_string(),
            ]
        }),
        sections.text_or_else(DesignField::DataStructures, || {
            "Standard data structures appropriate for the task.".to_string()
        }),
        sections.text_or_else(DesignField::FunctionSignatures, || {
            default_function_signatures(language)
        }),
    )
}

/// Turns a [`Plan`] into a [`Design`].
pub struct DesignNode {
    provider: Arc<dyn LlmProvider>,
}

impl DesignNode {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    #[instrument(skip_all, fields(stage = %StageName::Design))]
    pub async fn design(
        &self,
        plan: &Plan,
        language: &TargetLanguage,
    ) -> Result<Design, PipelineError> {
        let response = self
            .provider
            .complete(build_request(plan, language))
            .await
            .map_err(PipelineError::llm(StageName::Design))?;

        let design = parse_design(&response, language);
        debug!(components = design.components().len(), "design parsed");
        Ok(design)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rust() -> TargetLanguage {
        TargetLanguage::new("Rust")
    }

    #[test]
    fn markdown_design_is_parsed() {
        let response = "# Technical Design\n\n## Architecture\nA single binary crate.\n\n## Components\n- `main`: reads stdin\n- `adder`: sums values\n\n## Data Structures\nTwo `i64` values.\n\n## Function Signatures\nfn add(a: i64, b: i64) -> i64\nfn main()";
        let design = parse_design(response, &rust());

        assert_eq!(design.architecture(), "A single binary crate.");
        assert_eq!(design.components(), ["`main`: reads stdin", "`adder`: sums values"]);
        assert_eq!(design.data_structures(), "Two `i64` values.");
        assert_eq!(
            design.function_signatures(),
            "fn add(a: i64, b: i64) -> i64 fn main()"
        );
    }

    #[test]
    fn component_list_is_capped() {
        let bullets: String = (1..=25).map(|i| format!("* component {i}\n")).collect();
        let design = parse_design(&format!("Components:\n{bullets}"), &rust());
        assert_eq!(design.components().len(), Design::MAX_COMPONENTS);
        assert_eq!(design.components()[0], "component 1");
    }

    #[test]
    fn empty_response_uses_six_function_default() {
        let design = parse_design("", &rust());

        assert_eq!(design.components().len(), 3);
        assert_eq!(design.function_signatures().matches("->").count(), 6);
        assert!(design.architecture().contains("Rust"));
    }

    #[test]
    fn prompt_lists_plan_features_as_bullets() {
        let plan = Plan::new("o", vec!["add".into(), "print".into()], "a", "c");
        let request = build_request(&plan, &rust());
        assert!(request.user.contains("- add\n- print"));
        assert_eq!(request.temperature, TEMPERATURE);
    }
}

//! Code generation stage: description + [`Plan`] + [`Design`] → [`GeneratedCode`].

use std::sync::Arc;

use pipeline::code::{extract_code, filename_for};
use pipeline::{
    CompletionRequest, Design, GeneratedCode, LlmProvider, PipelineError, Plan, StageName,
    TargetLanguage, Temperature,
};
use tracing::{debug, instrument};

use crate::{bulleted, language_label};

pub const TEMPERATURE: Temperature = Temperature::from_tenths(3);

const SYSTEM_PROMPT: &str = "You are an expert programmer.
You write complete, runnable programs from technical designs.
Output code only: no explanations, no alternatives, no prose outside the code block.";

/// Builds the code generation prompt. The description, every plan field and
/// every design field are embedded so the model sees the whole context.
pub fn build_request(
    description: &str,
    plan: &Plan,
    design: &Design,
    language: &TargetLanguage,
) -> CompletionRequest {
    let user = format!(
        "Write the complete program for this request.

DESCRIPTION: {description}

OVERVIEW:
{overview}

KEY FEATURES:
{features}

APPROACH:
{approach}

CONSIDERATIONS:
{considerations}

ARCHITECTURE:
{architecture}

COMPONENTS:
{components}

DATA STRUCTURES:
{data_structures}

FUNCTION SIGNATURES:
{function_signatures}

LANGUAGE: {language}

Requirements:
- Produce ONE self-contained, runnable {language} file.
- Include the language's normal program entry point.
- Return exactly one fenced code block and nothing else.",
        overview = plan.overview(),
        features = bulleted(plan.features()),
        approach = plan.approach(),
        considerations = plan.considerations(),
        architecture = design.architecture(),
        components = bulleted(design.components()),
        data_structures = design.data_structures(),
        function_signatures = design.function_signatures(),
    );
    CompletionRequest::new(SYSTEM_PROMPT, user, TEMPERATURE)
}

/// Turns a code generation response into [`GeneratedCode`].
///
/// The explanation is the prose before the first fence; when the model sent
/// none, a canned sentence takes its place.
pub fn parse_generated_code(response: &str, language: &TargetLanguage) -> GeneratedCode {
    let extracted = extract_code(response, language);
    let label = language_label(language);

    let explanation = extracted.preamble.unwrap_or_else(|| {
        if response.contains(pipeline::code::FENCE) {
            format!("Complete {label} implementation based on the requirements.")
        } else {
            format!("Generated {label} code as per requirements.")
        }
    });

    GeneratedCode::new(extracted.code, filename_for(language), explanation)
}

/// Turns a [`Design`] into [`GeneratedCode`].
pub struct CodeGenerationNode {
    provider: Arc<dyn LlmProvider>,
}

impl CodeGenerationNode {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    #[instrument(skip_all, fields(stage = %StageName::CodeGeneration))]
    pub async fn generate(
        &self,
        description: &str,
        plan: &Plan,
        design: &Design,
        language: &TargetLanguage,
    ) -> Result<GeneratedCode, PipelineError> {
        let response = self
            .provider
            .complete(build_request(description, plan, design, language))
            .await
            .map_err(PipelineError::llm(StageName::CodeGeneration))?;

        let code = parse_generated_code(&response, language);
        debug!(
            filename = code.filename(),
            bytes = code.source_text().len(),
            "code extracted"
        );
        Ok(code)
    }
}

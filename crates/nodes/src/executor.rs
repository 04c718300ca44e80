//! The pipeline coordinator.

use std::sync::Arc;

use pipeline::{
    LlmProvider, PipelineError, PipelineRun, PipelineRunId, StageName, TargetLanguage, Timestamp,
};
use tracing::{info, instrument, Span};

use crate::codegen::CodeGenerationNode;
use crate::design::DesignNode;
use crate::planning::PlanningNode;
use crate::review::ReviewNode;
use crate::summary::{code_summary, design_summary, plan_summary, review_summary};

/// Receives progress notifications while a run executes.
///
/// The CLI uses this to print stage transcripts as they complete. Both
/// methods default to doing nothing.
pub trait StageObserver: Send {
    fn stage_started(&mut self, _stage: StageName) {}

    /// `summary` is the human-readable rendering of the stage's output.
    fn stage_finished(&mut self, _stage: StageName, _summary: &str) {}
}

/// Observer that ignores every notification.
pub struct NoopObserver;

impl StageObserver for NoopObserver {}

/// Runs Plan → Design → Code → Review, feeding each output to the next stage.
///
/// Construct one executor per process and share it (e.g. behind an `Arc`);
/// it holds no per-run state, so concurrent runs are independent as long as
/// the provider supports concurrent calls, which [`LlmProvider`] requires.
pub struct PipelineExecutor {
    provider_name: String,
    planner: PlanningNode,
    designer: DesignNode,
    generator: CodeGenerationNode,
    reviewer: ReviewNode,
}

impl PipelineExecutor {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider_name: provider.name().to_string(),
            planner: PlanningNode::new(provider.clone()),
            designer: DesignNode::new(provider.clone()),
            generator: CodeGenerationNode::new(provider.clone()),
            reviewer: ReviewNode::new(provider),
        }
    }

    /// Executes one full run. The first oracle failure aborts the run; no
    /// stage is retried.
    pub async fn run(
        &self,
        description: &str,
        language: &str,
    ) -> Result<PipelineRun, PipelineError> {
        self.run_observed(description, language, &mut NoopObserver)
            .await
    }

    /// Like [`PipelineExecutor::run`], reporting progress to `observer`.
    #[instrument(
        name = "pipeline_run",
        skip_all,
        fields(
            run_id = tracing::field::Empty,
            language = language,
            provider = %self.provider_name
        )
    )]
    pub async fn run_observed(
        &self,
        description: &str,
        language: &str,
        observer: &mut dyn StageObserver,
    ) -> Result<PipelineRun, PipelineError> {
        let run_id = PipelineRunId::new_random();
        Span::current().record("run_id", tracing::field::display(run_id));
        let started_at = Timestamp::now();
        let language = TargetLanguage::new(language);
        info!("pipeline run started");

        observer.stage_started(StageName::Planning);
        let plan = self.planner.plan(description, &language).await?;
        observer.stage_finished(StageName::Planning, &plan_summary(&plan));

        observer.stage_started(StageName::Design);
        let design = self.designer.design(&plan, &language).await?;
        observer.stage_finished(StageName::Design, &design_summary(&design));

        observer.stage_started(StageName::CodeGeneration);
        let code = self
            .generator
            .generate(description, &plan, &design, &language)
            .await?;
        observer.stage_finished(StageName::CodeGeneration, &code_summary(&code));

        observer.stage_started(StageName::Review);
        let review = self.reviewer.review(description, &code, &language).await?;
        observer.stage_finished(StageName::Review, &review_summary(&review));

        info!(
            production_ready = review.is_production_ready(),
            filename = code.filename(),
            "pipeline run finished"
        );

        Ok(PipelineRun {
            run_id,
            started_at,
            description: description.to_string(),
            language,
            plan,
            design,
            code,
            review,
        })
    }
}

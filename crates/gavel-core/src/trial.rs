//! Multi-trial runner that tolerates LLM nondeterminism.
//!
//! Repeats the same prompt+judge cycle N times and aggregates per-run
//! pass/fail into a ratio-based overall verdict, so a single flaky run
//! does not fail the whole test case.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::judge::{EvaluationResult, RubricJudge};
use crate::model::TestCase;
use crate::traits::{CompletionRequest, LlmProvider};

/// Configuration for the trial runner.
#[derive(Debug, Clone)]
pub struct TrialConfig {
    /// How many times the prompt is sent and judged.
    pub num_trials: u32,
    /// Minimum fraction of passing runs for the overall verdict to pass.
    pub min_pass_ratio: f64,
    /// Model the chatbot under test runs on.
    pub chat_model: String,
    /// Sampling temperature for the chatbot call.
    pub temperature: f64,
    /// Max tokens for the chatbot reply.
    pub max_tokens: u32,
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            num_trials: 3,
            min_pass_ratio: 0.66,
            chat_model: "openai/gpt-4o-mini".to_string(),
            temperature: 0.1,
            max_tokens: 1024,
        }
    }
}

/// Progress reporting trait. The CLI supplies a console implementation.
pub trait ProgressReporter: Send + Sync {
    fn on_trial_start(&self, run_number: u32, total: u32);
    fn on_trial_complete(&self, run_number: u32, result: &EvaluationResult);
    fn on_run_complete(&self, report: &TrialReport);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_trial_start(&self, _: u32, _: u32) {}
    fn on_trial_complete(&self, _: u32, _: &EvaluationResult) {}
    fn on_run_complete(&self, _: &TrialReport) {}
}

/// Aggregated outcome of running one test case across all trials.
/// In-memory only; the CLI prints it and then it is discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialReport {
    /// Unique identifier for this run.
    pub run_id: Uuid,
    /// When the run started.
    pub created_at: DateTime<Utc>,
    /// Summary of the test case.
    pub test_case: TestCaseSummary,
    /// Per-trial evaluations, in run order.
    pub evaluations: Vec<EvaluationResult>,
    /// Number of trials whose evaluation passed.
    pub successful_runs: u32,
    /// Total trials executed.
    pub num_trials: u32,
    /// `successful_runs / num_trials`.
    pub pass_ratio: f64,
    /// Whether `pass_ratio >= min_pass_ratio`.
    pub passed: bool,
    /// Total wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

/// Summary of a test case (without the full prompt and rubric).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCaseSummary {
    pub name: String,
    pub criterion_count: usize,
}

/// Runs a test case end to end: chatbot call, judge call, aggregation.
pub struct TrialRunner {
    chatbot: Arc<dyn LlmProvider>,
    judge: RubricJudge,
    config: TrialConfig,
}

impl TrialRunner {
    pub fn new(chatbot: Arc<dyn LlmProvider>, judge: RubricJudge, config: TrialConfig) -> Self {
        Self {
            chatbot,
            judge,
            config,
        }
    }

    /// Run the same test case `num_trials` times, sequentially, and
    /// aggregate pass/fail into an overall verdict.
    pub async fn run(
        &self,
        case: &TestCase,
        progress: &dyn ProgressReporter,
    ) -> Result<TrialReport> {
        anyhow::ensure!(self.config.num_trials >= 1, "num_trials must be at least 1");
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.config.min_pass_ratio),
            "min_pass_ratio must be between 0.0 and 1.0"
        );

        let start = Instant::now();
        let created_at = Utc::now();
        let mut evaluations = Vec::with_capacity(self.config.num_trials as usize);
        let mut successful_runs = 0u32;

        for run_number in 1..=self.config.num_trials {
            progress.on_trial_start(run_number, self.config.num_trials);

            let evaluation = self.run_single(case).await?;
            progress.on_trial_complete(run_number, &evaluation);

            if evaluation.pass {
                successful_runs += 1;
            }
            evaluations.push(evaluation);
        }

        let pass_ratio = f64::from(successful_runs) / f64::from(self.config.num_trials);
        let passed = pass_ratio >= self.config.min_pass_ratio;

        let report = TrialReport {
            run_id: Uuid::new_v4(),
            created_at,
            test_case: TestCaseSummary {
                name: case.name.clone(),
                criterion_count: case.rubric.len(),
            },
            evaluations,
            successful_runs,
            num_trials: self.config.num_trials,
            pass_ratio,
            passed,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        progress.on_run_complete(&report);
        Ok(report)
    }

    /// Execute one chatbot call and judge its response.
    async fn run_single(&self, case: &TestCase) -> Result<EvaluationResult> {
        let request = CompletionRequest {
            model: self.config.chat_model.clone(),
            prompt: case.prompt.clone(),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };
        let response = self.chatbot.complete(&request).await?;

        self.judge
            .evaluate(
                &case.prompt,
                &response.content,
                &case.expected_behavior,
                &case.rubric,
                case.pass_threshold,
            )
            .await
    }
}

//! Rubric-based LLM-as-judge evaluation.
//!
//! A second model grades a chatbot response against a rubric and returns
//! per-criterion integer scores, which are normalized into a pass/fail
//! verdict. Malformed judge output is retried a bounded number of times.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::json::extract_json;
use crate::model::{rubric_text, RubricCriterion};
use crate::traits::{CompletionRequest, LlmProvider};

/// Each rubric criterion is scored on a 0..=10 scale.
pub const MAX_CRITERION_SCORE: u32 = 10;

/// Verdict used when the judge never produced parseable JSON.
pub const JUDGE_FAILED_VERDICT: &str = "Judge failed to return valid JSON";

/// Configuration for the rubric judge.
#[derive(Debug, Clone)]
pub struct JudgeConfig {
    /// Model used for judging.
    pub model: String,
    /// Extra LLM calls allowed when the judge returns malformed JSON.
    /// Total attempts = `max_retries + 1`.
    pub max_retries: u32,
    /// Sampling temperature for the judge call.
    pub temperature: f64,
    /// Max tokens for the judge reply.
    pub max_tokens: u32,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            model: "meta-llama/llama-3.1-8b-instruct".to_string(),
            max_retries: 2,
            temperature: 0.1,
            max_tokens: 1024,
        }
    }
}

/// Outcome of judging a single chatbot response.
///
/// Immutable after construction; logged, aggregated by the trial runner,
/// and then discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Raw 0..=10 score per rubric criterion.
    pub scores: BTreeMap<String, u32>,
    /// Normalized score in [0, 1], rounded to 3 decimal places.
    pub final_score: f64,
    /// Whether `final_score >= threshold`.
    pub pass: bool,
    /// The threshold this response was judged against.
    pub threshold: f64,
    /// The judge's summary of why the response passed or failed.
    pub verdict: String,
    /// The judge's step-by-step reasoning.
    pub reasoning: String,
}

/// The JSON shape the judge model is asked to return.
#[derive(Debug, Deserialize)]
struct JudgeOutput {
    #[serde(default)]
    reasoning: Option<String>,
    scores: BTreeMap<String, i64>,
    #[serde(default)]
    verdict: Option<String>,
}

/// Evaluates chatbot responses against a rubric using an LLM as the judge.
pub struct RubricJudge {
    provider: Arc<dyn LlmProvider>,
    config: JudgeConfig,
}

impl RubricJudge {
    pub fn new(provider: Arc<dyn LlmProvider>, config: JudgeConfig) -> Self {
        Self { provider, config }
    }

    /// Score one chatbot response against a rubric.
    ///
    /// Provider (transport) errors propagate as `Err`; the retry loop only
    /// covers replies that fail JSON extraction. If every attempt yields
    /// malformed output, the result is an all-zero failing evaluation with
    /// [`JUDGE_FAILED_VERDICT`] rather than an error.
    pub async fn evaluate(
        &self,
        prompt: &str,
        response: &str,
        expected: &str,
        rubric: &[RubricCriterion],
        threshold: f64,
    ) -> anyhow::Result<EvaluationResult> {
        let request = CompletionRequest {
            model: self.config.model.clone(),
            prompt: build_judge_prompt(prompt, response, expected, rubric),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let mut last_error = None;
        for attempt in 0..=self.config.max_retries {
            let reply = self.provider.complete(&request).await?;
            match parse_judge_output(&reply.content) {
                Ok(output) => return Ok(score_output(output, threshold)),
                Err(e) => {
                    tracing::warn!(attempt, "judge returned invalid JSON: {e}");
                    last_error = Some(e);
                }
            }
        }

        // The judge never produced valid JSON even after retries.
        let scores = rubric.iter().map(|c| (c.name.clone(), 0)).collect();
        Ok(EvaluationResult {
            scores,
            final_score: 0.0,
            pass: false,
            threshold,
            verdict: JUDGE_FAILED_VERDICT.to_string(),
            reasoning: last_error.map(|e| e.to_string()).unwrap_or_default(),
        })
    }
}

/// Build the evaluation prompt sent to the judge model.
fn build_judge_prompt(
    prompt: &str,
    response: &str,
    expected: &str,
    rubric: &[RubricCriterion],
) -> String {
    format!(
        r#"You are an expert AI evaluator.

Evaluate the assistant response according to the rubric below.

User Prompt:
{prompt}

Assistant Response:
{response}

Expected Behavior:
{expected}

Rubric:
{rubric}

Return ONLY valid JSON with this structure:
{{
  "reasoning": "...",
  "scores": {{
    "<rubric_name>": <int>
  }},
  "verdict": "Clearly explain summary why the response passed or failed."
}}
No markdown, no extra text outside JSON.
"#,
        prompt = prompt,
        response = response,
        expected = expected,
        rubric = rubric_text(rubric),
    )
}

fn parse_judge_output(content: &str) -> anyhow::Result<JudgeOutput> {
    let value = extract_json(content)?;
    Ok(serde_json::from_value(value)?)
}

/// Normalize a clamped score map to [0, 1]. An empty map scores 0.0.
pub fn normalize_scores(scores: &BTreeMap<String, u32>) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let total: u32 = scores.values().sum();
    let max_score = MAX_CRITERION_SCORE * scores.len() as u32;
    round3(total as f64 / max_score as f64)
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

fn score_output(output: JudgeOutput, threshold: f64) -> EvaluationResult {
    // Out-of-range scores are clamped so final_score stays within [0, 1].
    let scores: BTreeMap<String, u32> = output
        .scores
        .into_iter()
        .map(|(name, raw)| (name, raw.clamp(0, MAX_CRITERION_SCORE as i64) as u32))
        .collect();

    let final_score = normalize_scores(&scores);

    EvaluationResult {
        scores,
        final_score,
        pass: final_score >= threshold,
        threshold,
        verdict: output
            .verdict
            .unwrap_or_else(|| "No verdict provided".to_string()),
        reasoning: output
            .reasoning
            .unwrap_or_else(|| "No reasoning provided".to_string()),
    }
}

//! The `gavel run` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use gavel_core::judge::{EvaluationResult, JudgeConfig, RubricJudge};
use gavel_core::parser;
use gavel_core::trial::{ProgressReporter, TrialConfig, TrialReport, TrialRunner};
use gavel_providers::config::{create_provider, load_config_from};

/// Console progress reporter. Mirrors the per-run detail a developer wants
/// when watching a flaky chatbot get judged.
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_trial_start(&self, run_number: u32, total: u32) {
        eprintln!("\nRun {run_number}/{total}");
    }

    fn on_trial_complete(&self, _run_number: u32, result: &EvaluationResult) {
        eprintln!("Reasoning: {}", result.reasoning);
        eprintln!("Scores:");
        for (name, score) in &result.scores {
            eprintln!("  {name}: {score}");
        }
        eprintln!("Final Score: {}", result.final_score);
        eprintln!("Threshold: {}", result.threshold);
        eprintln!("Pass: {}", result.pass);
        eprintln!("Verdict: {}", result.verdict);
    }

    fn on_run_complete(&self, report: &TrialReport) {
        eprintln!("\n================ SUMMARY ================");
        eprintln!(
            "Final Pass Rate: {:.2}% ({}/{})",
            report.pass_ratio * 100.0,
            report.successful_runs,
            report.num_trials
        );
        eprintln!("========================================");
    }
}

pub async fn execute(
    testcase_path: PathBuf,
    trials: Option<u32>,
    min_pass_ratio: Option<f64>,
    model: Option<String>,
    judge_model: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    // Load config, then apply CLI overrides
    let mut config = load_config_from(config_path.as_deref())?;
    if let Some(t) = trials {
        config.num_trials = t;
    }
    if let Some(r) = min_pass_ratio {
        config.min_pass_ratio = r;
    }
    if let Some(m) = model {
        config.chat_model = m;
    }
    if let Some(j) = judge_model {
        config.judge_model = j;
    }

    anyhow::ensure!(config.num_trials >= 1, "trials must be at least 1");
    anyhow::ensure!(
        (0.0..=1.0).contains(&config.min_pass_ratio),
        "min-pass-ratio must be between 0.0 and 1.0"
    );

    // Load test cases
    let cases = if testcase_path.is_dir() {
        parser::load_testcase_directory(&testcase_path)?
    } else {
        vec![parser::parse_test_case(&testcase_path)?]
    };
    anyhow::ensure!(!cases.is_empty(), "no test cases found");

    // Surface validation warnings before spending API calls
    for case in &cases {
        for w in parser::validate_test_case(case) {
            tracing::warn!("[{}] {}", case.name, w.message);
        }
    }

    let provider: Arc<dyn gavel_core::traits::LlmProvider> =
        Arc::from(create_provider(&config)?);

    let judge = RubricJudge::new(
        Arc::clone(&provider),
        JudgeConfig {
            model: config.judge_model.clone(),
            max_retries: config.max_retries,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        },
    );
    let runner = TrialRunner::new(
        provider,
        judge,
        TrialConfig {
            num_trials: config.num_trials,
            min_pass_ratio: config.min_pass_ratio,
            chat_model: config.chat_model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        },
    );

    let reporter = ConsoleReporter;
    let mut reports = Vec::with_capacity(cases.len());

    for case in &cases {
        eprintln!(
            "\nRunning robustness test: {} ({} trials)",
            case.name, config.num_trials
        );
        reports.push(runner.run(case, &reporter).await?);
    }

    print_summary(&reports);

    let failing: Vec<&TrialReport> = reports.iter().filter(|r| !r.passed).collect();
    if let Some(worst) = failing.first() {
        anyhow::bail!(
            "flaky behavior detected: {} of {} test case(s) failed (e.g. '{}' passed {}/{} runs)",
            failing.len(),
            reports.len(),
            worst.test_case.name,
            worst.successful_runs,
            worst.num_trials
        );
    }

    Ok(())
}

fn print_summary(reports: &[TrialReport]) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Test Case", "Runs Passed", "Pass Ratio", "Overall"]);

    for report in reports {
        table.add_row(vec![
            Cell::new(&report.test_case.name),
            Cell::new(format!(
                "{}/{}",
                report.successful_runs, report.num_trials
            )),
            Cell::new(format!("{:.1}%", report.pass_ratio * 100.0)),
            Cell::new(if report.passed { "PASS" } else { "FAIL" }),
        ]);
    }

    eprintln!("\n{table}");
}

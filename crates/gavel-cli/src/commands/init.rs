//! The `gavel init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create gavel.toml
    if std::path::Path::new("gavel.toml").exists() {
        println!("gavel.toml already exists, skipping.");
    } else {
        std::fs::write("gavel.toml", SAMPLE_CONFIG)?;
        println!("Created gavel.toml");
    }

    // Create example test case
    std::fs::create_dir_all("testcases")?;
    let example_path = std::path::Path::new("testcases/example.yaml");
    if example_path.exists() {
        println!("testcases/example.yaml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_TESTCASE)?;
        println!("Created testcases/example.yaml");
    }

    println!("\nNext steps:");
    println!("  1. Set OPENROUTER_API_KEY or edit gavel.toml");
    println!("  2. Run: gavel validate --testcase testcases/example.yaml");
    println!("  3. Run: gavel run --testcase testcases/example.yaml");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# gavel configuration

# OpenRouter API key; ${...} placeholders are resolved from the environment.
api_key = "${OPENROUTER_API_KEY}"

# Chatbot under test and the model that judges it.
chat_model = "openai/gpt-4o-mini"
judge_model = "meta-llama/llama-3.1-8b-instruct"

temperature = 0.1
num_trials = 3
min_pass_ratio = 0.66
max_retries = 2
"#;

const EXAMPLE_TESTCASE: &str = r#"name: payment-issue
description: Customer reports being double-charged for a subscription
prompt: |
  I was charged twice for my subscription this month. What happened,
  and how do I get my money back?
expected_behavior: |
  Apologize, acknowledge the double charge, explain how refunds work,
  and offer to escalate to billing support.
rubric:
  - name: clarity
    description: The response is easy to follow and well organized
  - name: accuracy
    description: The response directly addresses the double charge
  - name: empathy
    description: The response acknowledges the customer's frustration
pass_threshold: 0.7
"#;

//! gavel CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "gavel", version, about = "LLM-as-judge chatbot eval harness")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run test cases through the chatbot and judge
    Run {
        /// Path to a .yaml test case or a directory of them
        #[arg(long)]
        testcase: PathBuf,

        /// How many trials per test case (overrides config)
        #[arg(long)]
        trials: Option<u32>,

        /// Minimum passing-run ratio (overrides config)
        #[arg(long)]
        min_pass_ratio: Option<f64>,

        /// Chatbot model (overrides config)
        #[arg(long)]
        model: Option<String>,

        /// Judge model (overrides config)
        #[arg(long)]
        judge_model: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate test case YAML files
    Validate {
        /// Path to a test case file or directory
        #[arg(long)]
        testcase: PathBuf,
    },

    /// Create starter config and example test case
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            testcase,
            trials,
            min_pass_ratio,
            model,
            judge_model,
            config,
        } => commands::run::execute(testcase, trials, min_pass_ratio, model, judge_model, config)
            .await,
        Commands::Validate { testcase } => commands::validate::execute(testcase),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

//! Configuration loading and provider construction.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use gavel_core::traits::LlmProvider;

use crate::openrouter::OpenRouterProvider;

/// Top-level gavel configuration.
///
/// Note: Custom Debug impl masks the API key to prevent accidental
/// exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
pub struct GavelConfig {
    /// OpenRouter API key. Supports `${ENV_VAR}` placeholders.
    #[serde(default)]
    pub api_key: String,
    /// Override for the OpenRouter base URL (used in tests).
    #[serde(default)]
    pub base_url: Option<String>,
    /// Model the chatbot under test runs on.
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    /// Model used for judging.
    #[serde(default = "default_judge_model")]
    pub judge_model: String,
    /// Sampling temperature for both calls.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Max tokens per completion.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Extra judge calls allowed when the judge returns malformed JSON.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// How many times each test case prompt is run and judged.
    #[serde(default = "default_num_trials")]
    pub num_trials: u32,
    /// Minimum fraction of passing runs for the overall verdict to pass.
    #[serde(default = "default_min_pass_ratio")]
    pub min_pass_ratio: f64,
}

impl std::fmt::Debug for GavelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GavelConfig")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("chat_model", &self.chat_model)
            .field("judge_model", &self.judge_model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("max_retries", &self.max_retries)
            .field("num_trials", &self.num_trials)
            .field("min_pass_ratio", &self.min_pass_ratio)
            .finish()
    }
}

fn default_chat_model() -> String {
    "openai/gpt-4o-mini".to_string()
}
fn default_judge_model() -> String {
    "meta-llama/llama-3.1-8b-instruct".to_string()
}
fn default_temperature() -> f64 {
    0.1
}
fn default_max_tokens() -> u32 {
    1024
}
fn default_max_retries() -> u32 {
    2
}
fn default_num_trials() -> u32 {
    3
}
fn default_min_pass_ratio() -> f64 {
    0.66
}

impl Default for GavelConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: None,
            chat_model: default_chat_model(),
            judge_model: default_judge_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            max_retries: default_max_retries(),
            num_trials: default_num_trials(),
            min_pass_ratio: default_min_pass_ratio(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `gavel.toml` in the current directory
/// 2. `~/.config/gavel/config.toml`
///
/// Environment variable override: `OPENROUTER_API_KEY`.
pub fn load_config() -> Result<GavelConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<GavelConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("gavel.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<GavelConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => GavelConfig::default(),
    };

    // Apply env var override, then resolve ${...} placeholders
    if let Ok(key) = std::env::var("OPENROUTER_API_KEY") {
        config.api_key = key;
    }
    config.api_key = resolve_env_vars(&config.api_key);
    config.base_url = config.base_url.as_ref().map(|u| resolve_env_vars(u));

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("gavel"))
}

/// Create the OpenRouter provider from configuration.
pub fn create_provider(config: &GavelConfig) -> Result<Box<dyn LlmProvider>> {
    anyhow::ensure!(
        !config.api_key.is_empty(),
        "no API key configured; set OPENROUTER_API_KEY or api_key in gavel.toml"
    );
    Ok(Box::new(OpenRouterProvider::new(
        &config.api_key,
        config.base_url.clone(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_GAVEL_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_GAVEL_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_GAVEL_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        std::env::remove_var("_GAVEL_TEST_VAR");
    }

    #[test]
    fn resolve_env_vars_missing_is_empty() {
        assert_eq!(resolve_env_vars("${_GAVEL_DEFINITELY_UNSET}"), "");
    }

    #[test]
    fn default_config() {
        let config = GavelConfig::default();
        assert_eq!(config.chat_model, "openai/gpt-4o-mini");
        assert_eq!(config.judge_model, "meta-llama/llama-3.1-8b-instruct");
        assert_eq!(config.num_trials, 3);
        assert_eq!(config.max_retries, 2);
        assert!((config.min_pass_ratio - 0.66).abs() < f64::EPSILON);
    }

    #[test]
    fn parse_config_toml() {
        let toml_str = r#"
api_key = "sk-or-test"
chat_model = "openai/gpt-4o-mini"
judge_model = "anthropic/claude-3-haiku"
num_trials = 5
min_pass_ratio = 0.8
"#;
        let config: GavelConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api_key, "sk-or-test");
        assert_eq!(config.judge_model, "anthropic/claude-3-haiku");
        assert_eq!(config.num_trials, 5);
        // Unspecified fields fall back to defaults
        assert_eq!(config.max_retries, 2);
    }

    #[test]
    fn debug_masks_api_key() {
        let config = GavelConfig {
            api_key: "sk-or-secret".into(),
            ..Default::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-or-secret"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn create_provider_requires_api_key() {
        let config = GavelConfig::default();
        let err = create_provider(&config).map(|_| ()).unwrap_err();
        assert!(err.to_string().contains("no API key"));
    }

    #[test]
    fn load_config_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gavel.toml");
        std::fs::write(&path, "api_key = \"sk-or-file\"\nnum_trials = 7\n").unwrap();

        std::env::remove_var("OPENROUTER_API_KEY");
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.api_key, "sk-or-file");
        assert_eq!(config.num_trials, 7);
    }

    #[test]
    fn load_config_missing_explicit_path_errors() {
        let result = load_config_from(Some(Path::new("/definitely/not/here.toml")));
        assert!(result.is_err());
    }
}

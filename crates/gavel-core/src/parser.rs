//! YAML test case loading and validation.

use std::path::Path;

use anyhow::{Context, Result};

use crate::model::TestCase;

/// Parse a single YAML file into a `TestCase`.
pub fn parse_test_case(path: &Path) -> Result<TestCase> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read test case file: {}", path.display()))?;

    parse_test_case_str(&content, path)
}

/// Parse a YAML string into a `TestCase` (useful for testing).
pub fn parse_test_case_str(content: &str, source_path: &Path) -> Result<TestCase> {
    let mut case: TestCase = serde_yaml::from_str(content)
        .with_context(|| format!("failed to parse YAML: {}", source_path.display()))?;

    if case.name.is_empty() {
        case.name = source_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
    }

    Ok(case)
}

/// Recursively load all `.yaml`/`.yml` test case files from a directory.
pub fn load_testcase_directory(dir: &Path) -> Result<Vec<TestCase>> {
    let mut cases = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            cases.extend(load_testcase_directory(&path)?);
        } else if path
            .extension()
            .is_some_and(|ext| ext == "yaml" || ext == "yml")
        {
            match parse_test_case(&path) {
                Ok(case) => cases.push(case),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(cases)
}

/// A warning from test case validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The criterion name, if the warning is about a single criterion.
    pub criterion: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a test case for common issues.
pub fn validate_test_case(case: &TestCase) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if case.prompt.trim().is_empty() {
        warnings.push(ValidationWarning {
            criterion: None,
            message: "prompt is empty".into(),
        });
    }

    if case.expected_behavior.trim().is_empty() {
        warnings.push(ValidationWarning {
            criterion: None,
            message: "expected_behavior is empty".into(),
        });
    }

    if case.rubric.is_empty() {
        warnings.push(ValidationWarning {
            criterion: None,
            message: "rubric has no criteria; every evaluation will score 0.0".into(),
        });
    }

    // Duplicate criterion names collapse into one score map key
    let mut seen_names = std::collections::HashSet::new();
    for criterion in &case.rubric {
        if !seen_names.insert(&criterion.name) {
            warnings.push(ValidationWarning {
                criterion: Some(criterion.name.clone()),
                message: format!("duplicate rubric criterion: {}", criterion.name),
            });
        }
    }

    for criterion in &case.rubric {
        if criterion.description.trim().is_empty() {
            warnings.push(ValidationWarning {
                criterion: Some(criterion.name.clone()),
                message: "criterion has no description".into(),
            });
        }
    }

    if !(0.0..=1.0).contains(&case.pass_threshold) {
        warnings.push(ValidationWarning {
            criterion: None,
            message: format!(
                "pass_threshold {} is outside [0.0, 1.0]",
                case.pass_threshold
            ),
        });
    }

    warnings
}

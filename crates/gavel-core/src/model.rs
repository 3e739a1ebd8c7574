//! Core data model types for gavel.
//!
//! These are the fundamental types the whole system uses to represent
//! test cases and the rubric a judge scores responses against.

use serde::{Deserialize, Serialize};

/// A single criterion the judge scores a response against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RubricCriterion {
    /// Short identifier (e.g. "clarity"). Used as the key in score maps.
    pub name: String,
    /// What the judge should look for when scoring this criterion.
    pub description: String,
}

/// A chatbot test case loaded from a YAML file. Read-only once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    /// Human-readable name. Defaults to the file stem when omitted.
    #[serde(default)]
    pub name: String,
    /// Description of what this test case exercises.
    #[serde(default)]
    pub description: String,
    /// The prompt sent to the chatbot under test.
    pub prompt: String,
    /// Plain-language description of what a good response looks like.
    pub expected_behavior: String,
    /// Criteria the judge scores the response against.
    pub rubric: Vec<RubricCriterion>,
    /// Minimum normalized score for a single run to pass.
    pub pass_threshold: f64,
}

impl TestCase {
    /// Render the rubric as bullet lines for inclusion in a judge prompt.
    pub fn rubric_text(&self) -> String {
        rubric_text(&self.rubric)
    }
}

/// Render rubric criteria as `- name: description` lines.
pub fn rubric_text(rubric: &[RubricCriterion]) -> String {
    rubric
        .iter()
        .map(|c| format!("- {}: {}", c.name, c.description))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_case() -> TestCase {
        TestCase {
            name: "payment-issue".into(),
            description: "Customer reports a double charge".into(),
            prompt: "I was charged twice for my subscription".into(),
            expected_behavior: "Apologize and offer a refund process".into(),
            rubric: vec![
                RubricCriterion {
                    name: "clarity".into(),
                    description: "Response is easy to follow".into(),
                },
                RubricCriterion {
                    name: "accuracy".into(),
                    description: "Response addresses the double charge".into(),
                },
            ],
            pass_threshold: 0.7,
        }
    }

    #[test]
    fn test_case_serde_roundtrip() {
        let case = sample_case();
        let json = serde_json::to_string(&case).unwrap();
        let deserialized: TestCase = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.name, "payment-issue");
        assert_eq!(deserialized.rubric.len(), 2);
        assert_eq!(deserialized.rubric[0].name, "clarity");
        assert!((deserialized.pass_threshold - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn rubric_text_format() {
        let case = sample_case();
        assert_eq!(
            case.rubric_text(),
            "- clarity: Response is easy to follow\n\
             - accuracy: Response addresses the double charge"
        );
    }

    #[test]
    fn rubric_text_empty() {
        assert_eq!(rubric_text(&[]), "");
    }
}

//! gavel-providers — LLM provider integrations.
//!
//! Implements the `LlmProvider` trait for OpenRouter (the chatbot backend
//! and the judge both speak OpenAI-shaped chat completions through it) and
//! a mock provider for tests.

pub mod config;
pub mod error;
pub mod mock;
pub mod openrouter;

pub use config::{create_provider, load_config, GavelConfig};
pub use error::ProviderError;
pub use mock::MockProvider;
pub use openrouter::OpenRouterProvider;

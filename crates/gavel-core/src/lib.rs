//! gavel-core — Rubric judge, trial runner, and core data model.
//!
//! This crate defines the fundamental types, the LLM-as-judge scoring
//! logic, and the multi-trial runner that the rest of gavel builds on.

pub mod json;
pub mod judge;
pub mod model;
pub mod parser;
pub mod traits;
pub mod trial;

#[cfg(test)]
pub(crate) mod testutil;

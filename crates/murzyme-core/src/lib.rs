//! # Murzyme Core Library
//!
//! Classifies Protein Data Bank records as Murzyme or Non-Murzyme with a
//! cascade of three tiers: a pre-trained statistical model, a registry of
//! known entries and a keyword heuristic over the header annotations.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`ParsedDocument`,
//!   `ClassificationResult`), the fixed-column record reader and feature
//!   construction (`FeatureVector50`, `SummaryStatistics7`, `FeatureVector28`).
//!
//! - **[`engine`]: The Logic Core.** Loaded model artifacts, registry
//!   providers, the keyword heuristic and the shared `ClassifierContext` that
//!   bundles them together with configuration.
//!
//! - **[`workflows`]: The Public API.** The classification cascade. Given a
//!   context and a document it runs the tiers in order and returns exactly one
//!   result, never an error.

pub mod core;
pub mod engine;
pub mod workflows;

//! # Engine Module
//!
//! The stateful parts of the classifier: loaded model artifacts, registry
//! providers, the keyword heuristic and the [`context::ClassifierContext`]
//! that bundles them for the cascade.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Artifact paths, keyword settings and their builder
//! - **Context** ([`context`]) - The immutable, shareable set of loaded tiers
//! - **Model Tier** ([`model`]) - Feature scaling and support vector decision functions
//! - **Registry Tier** ([`registry`]) - Registry snapshots, providers and the three-step matcher
//! - **Keyword Tier** ([`keywords`]) - Vocabulary scoring over header text
//! - **Tier Outcomes** ([`tier`]) - Per-tier results and the cascade trace
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress for batch runs
//! - **Error Handling** ([`error`]) - Recoverable tier failures

pub mod config;
pub mod context;
pub mod error;
pub mod keywords;
pub mod model;
pub mod progress;
pub mod registry;
pub mod tier;

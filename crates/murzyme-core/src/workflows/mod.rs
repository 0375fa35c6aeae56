//! # Workflows Module
//!
//! The public entry points of the library. Each workflow takes a shared
//! [`ClassifierContext`](crate::engine::context::ClassifierContext) and
//! document text and returns exactly one classification result.
//!
//! ## Architecture
//!
//! - **Classification Cascade** ([`classify`]) - Model, registry and keyword tiers for one document
//! - **Batch Classification** ([`batch`]) - Many documents with progress reporting, in parallel
//!   when the `parallel` feature is enabled

pub mod batch;
pub mod classify;

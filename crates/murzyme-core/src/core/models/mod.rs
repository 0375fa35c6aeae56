//! # Models Module
//!
//! Plain data produced and consumed by the classification pipeline.
//!
//! - [`record`] - What the reader recovers from a document: header
//!   annotations, atom records, secondary-structure segments and recovered
//!   parse anomalies.
//! - [`result`] - The caller-facing [`result::ClassificationResult`] together
//!   with its [`result::Category`] and [`result::Provenance`] tags.

pub mod record;
pub mod result;

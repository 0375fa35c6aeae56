//! # Core Module
//!
//! Stateless building blocks of the classifier: the data models a parsed
//! document is made of, the fixed-column record reader, numeric feature
//! construction and small shared utilities.
//!
//! ## Architecture
//!
//! - **Data Models** ([`models`]) - Parsed documents, header annotations and the classification result
//! - **File I/O** ([`io`]) - Column layouts and the total, line-oriented PDB reader
//! - **Features** ([`features`]) - Histograms, pairwise distance samples and summary statistics
//! - **Utilities** ([`utils`]) - Geometry helpers and identifier normalization
//!
//! Nothing in this layer holds state between calls; every function is a pure
//! transformation from its inputs.

pub mod features;
pub mod io;
pub mod models;
pub mod utils;

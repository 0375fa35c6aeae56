//! Provides input functionality for structural record documents.
//!
//! The reader is built on a table of named fixed-column field specifications
//! ([`fields`]) and never fails on malformed content: anomalies are recorded
//! on the parsed document instead.

pub mod fields;
pub mod pdb;
pub mod traits;

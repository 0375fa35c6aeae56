//! Small, stateless helpers shared by the parser, the feature builder and the
//! registry matcher.

pub mod geometry;
pub mod identifiers;

pub mod builder;
pub mod stats;
pub mod vector;

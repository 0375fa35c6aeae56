pub mod classify;
pub mod data;
pub mod inspect;
pub mod registry;

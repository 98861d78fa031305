//! CLI command implementations.

pub mod catalog;
pub mod complete;
pub mod events;
pub mod import;
pub mod register;
pub mod report;
pub mod students;

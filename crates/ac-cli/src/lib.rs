//! Complementary-activity credit tracker CLI library.
//!
//! This crate provides the CLI interface for the AC credit tracker.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, EventsAction, StudentsAction};
pub use config::Config;

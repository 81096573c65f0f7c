//! Recap CLI library.
//!
//! This crate provides the command-line interface and the run orchestration
//! for the recently added summary.

mod cli;
mod config;
pub mod summary;

pub use cli::{Cli, SummaryArgs};
pub use config::Config;

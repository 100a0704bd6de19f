//! Terminal helpers for the favmap command line
//!
//! Provides shared CLI functionality:
//! - Status lines and human-readable formatting
//! - Text/JSON output selection
//! - Spinners around network round trips

#![warn(missing_docs)]

pub mod output;
pub mod progress;

pub use output::{OutputFormat, Status};

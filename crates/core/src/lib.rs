//! Core utilities for the favmap tools
//!
//! This crate provides shared functionality used by the other favmap crates:
//!
//! - **Error handling**: Errors with codes, context, and recovery suggestions
//! - **Configuration**: TOML-based configuration with defaults for every section
//!
//! # Example
//!
//! ```rust,no_run
//! use favmap_core::config::Config;
//!
//! let config = Config::load(None).expect("Invalid configuration");
//! println!("Margin: {} km", config.schema.viewport.margin_km);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;

pub use error::{exit_codes, Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigSchema};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
}

//! Project configuration for agentwire.
//!
//! This module defines the Config struct that represents `agentwire.yaml` at
//! the project root. It supports forward-compatible YAML parsing (unknown
//! fields are ignored), sensible defaults for optional fields, and validation
//! of config values.

mod model;
mod operations;
pub mod types;


// Re-export public API
pub use model::Config;

//! Project structure validation.
//!
//! Checks that an entrypoint satisfies its framework's structural
//! invariants without changing it:
//! - The container class and its entry method exist
//! - At least one agent and one task are defined, and neither exists alone
//! - Every agent has a list-literal tool binding site
//! - Agent and task names are unique
//! - Explicit task -> agent references name a defined agent
//!
//! All violations are collected so a user sees every problem at once.

mod types;
mod validator;


// Re-export public API
pub use types::{ValidationReport, Violation, ViolationKind};
pub use validator::ProjectValidator;

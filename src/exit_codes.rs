//! Exit code constants for the agentwire CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, config, unsupported framework)
//! - 2: Validation failure (project structure invalid)
//! - 3: Parse failure (entrypoint is not valid Python)
//! - 4: Mutation failure (a rewrite would have produced invalid source)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, unreadable files, or an unsupported framework.
pub const USER_ERROR: i32 = 1;

/// Validation failure: orphan agents/tasks or missing scaffolding.
pub const VALIDATION_FAILURE: i32 = 2;

/// Parse failure: the entrypoint could not be parsed.
pub const PARSE_FAILURE: i32 = 3;

/// Mutation failure: a rewrite was rejected and nothing was written.
pub const MUTATION_FAILURE: i32 = 4;

//! Filesystem utilities for agentwire.
//!
//! Entrypoint writes go through `atomic_write_file` so a crash mid-write can
//! never leave a truncated source file behind.

pub mod atomic;

pub use atomic::atomic_write_file;

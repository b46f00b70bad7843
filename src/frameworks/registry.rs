//! Framework lookup by name.

use super::FrameworkAdapter;
use super::crewai::CrewAi;
use super::langgraph::LangGraph;
use super::openai_swarm::OpenAiSwarm;
use crate::error::{AgentwireError, Result};

/// Names accepted by [`get_framework_module`], in registry order.
pub const SUPPORTED_FRAMEWORKS: &[&str] = &["crewai", "langgraph", "openai_swarm"];

static ADAPTERS: &[&dyn FrameworkAdapter] = &[&CrewAi, &LangGraph, &OpenAiSwarm];

/// Resolve a framework name to its adapter.
///
/// # Returns
///
/// * `Err(AgentwireError::UnsupportedFramework)` - No adapter has that name
pub fn get_framework_module(name: &str) -> Result<&'static dyn FrameworkAdapter> {
    ADAPTERS
        .iter()
        .copied()
        .find(|adapter| adapter.name() == name)
        .ok_or_else(|| AgentwireError::UnsupportedFramework {
            name: name.to_string(),
            supported: SUPPORTED_FRAMEWORKS.join(", "),
        })
}

//! Project context resolution for agentwire.
//!
//! This module provides the "environment resolution" layer that finds the
//! project root (the directory holding `agentwire.yaml`) from any directory
//! inside the project, loads its config and resolves the paths commands
//! operate on. The process working directory is only read, never changed.

use crate::config::Config;
use crate::error::{AgentwireError, Result};
use crate::frameworks::{FrameworkAdapter, get_framework_module};
use std::env;
use std::path::{Path, PathBuf};

/// Resolved project paths and config.
///
/// All paths are absolute when the starting directory was.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    /// Directory containing `agentwire.yaml`.
    pub project_root: PathBuf,

    /// Parsed `agentwire.yaml`.
    pub config: Config,
}

impl ProjectContext {
    /// Resolve the project context from the current working directory.
    ///
    /// # Returns
    ///
    /// * `Ok(ProjectContext)` - Successfully resolved context
    /// * `Err(AgentwireError::UserError)` - Not inside a project (exit code 1)
    pub fn resolve() -> Result<Self> {
        let cwd = env::current_dir().map_err(|e| {
            AgentwireError::UserError(format!("failed to get current working directory: {}", e))
        })?;

        Self::resolve_from(&cwd)
    }

    /// Resolve the project context by walking up from `start`.
    pub fn resolve_from<P: AsRef<Path>>(start: P) -> Result<Self> {
        let start = start.as_ref();

        let project_root = start
            .ancestors()
            .find(|dir| dir.join(Config::FILE_NAME).is_file())
            .ok_or_else(|| {
                AgentwireError::UserError(format!(
                    "not inside an agentwire project: no {} found in '{}' or any parent directory",
                    Config::FILE_NAME,
                    start.display()
                ))
            })?;

        Self::open(project_root)
    }

    /// Open the project rooted exactly at `root`, without searching parents.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let project_root = root.as_ref().to_path_buf();
        let config_path = project_root.join(Config::FILE_NAME);
        if !config_path.is_file() {
            return Err(AgentwireError::UserError(format!(
                "'{}' is not an agentwire project: {} is missing",
                project_root.display(),
                Config::FILE_NAME
            )));
        }
        let config = Config::load(&config_path)?;

        Ok(Self {
            project_root,
            config,
        })
    }

    /// The adapter for the configured framework.
    pub fn adapter(&self) -> Result<&'static dyn FrameworkAdapter> {
        get_framework_module(&self.config.framework)
    }

    /// Get the path to the config file.
    pub fn config_path(&self) -> PathBuf {
        self.project_root.join(Config::FILE_NAME)
    }

    /// Get the path to the agent definitions.
    pub fn agents_path(&self) -> PathBuf {
        self.project_root.join(&self.config.agents_file)
    }

    /// Get the path to the task definitions.
    pub fn tasks_path(&self) -> PathBuf {
        self.project_root.join(&self.config.tasks_file)
    }

    /// Write the (possibly modified) config back to `agentwire.yaml`.
    pub fn save_config(&self) -> Result<()> {
        self.config.save(self.config_path())
    }
}

//! Core types for project validation results and violations.

use serde::Serialize;

/// What kind of structural problem a violation reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    MissingContainer,
    MissingEntry,
    NoDefinitions,
    AgentWithoutTask,
    TaskWithoutAgent,
    MissingToolSite,
    DuplicateName,
    UnknownAgentReference,
}

/// A single structural problem found in the entrypoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub kind: ViolationKind,
    /// 1-based line the problem is anchored to, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub message: String,
}

impl Violation {
    pub fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            line: None,
            message: message.into(),
        }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

/// Result of validating a project entrypoint.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// Whether validation passed (no violations).
    pub passed: bool,
    /// List of violations (empty if passed).
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Create a passing report.
    pub fn pass() -> Self {
        Self {
            passed: true,
            violations: Vec::new(),
        }
    }

    /// Create a failing report with violations.
    pub fn fail(violations: Vec<Violation>) -> Self {
        Self {
            passed: false,
            violations,
        }
    }

    /// Build a report from whatever violations were collected.
    pub fn from_violations(violations: Vec<Violation>) -> Self {
        if violations.is_empty() {
            Self::pass()
        } else {
            Self::fail(violations)
        }
    }

    #[cfg(test)]
    pub fn has(&self, kind: ViolationKind) -> bool {
        self.violations.iter().any(|v| v.kind == kind)
    }

    /// Format the report as a user-friendly error message.
    ///
    /// ```text
    /// entrypoint src/crew.py does not match the crewai project structure
    ///
    /// line 12: agent `researcher` has no `Agent(tools=[...])` call
    /// project defines agents but no tasks
    /// ```
    pub fn format_error(&self, entrypoint: &str, framework: &str) -> String {
        if self.passed {
            return String::new();
        }

        let mut msg = format!(
            "entrypoint {} does not match the {} project structure\n\n",
            entrypoint, framework
        );
        for violation in &self.violations {
            match violation.line {
                Some(line) => msg.push_str(&format!("line {}: {}\n", line, violation.message)),
                None => msg.push_str(&format!("{}\n", violation.message)),
            }
        }
        msg
    }
}

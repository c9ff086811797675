// Copyright (c) 2025 - Cowboy AI, Inc.
//! Convergence units
//!
//! A [`ConfigUnit`] describes one artifact as data: how to check it, how to
//! apply it and what the check must print. Generators return units instead
//! of touching the filesystem; applying them is the convergence engine's job.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfigUnit {
    pub label: String,
    /// Label of a unit that must pass first, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precondition: Option<String>,
    /// Shell command that brings the system into the expected state
    pub config: String,
    /// Shell command whose output is compared with `expected`
    pub audit: String,
    pub expected: String,
    pub fail_message: String,
}

impl ConfigUnit {
    pub fn new(
        label: impl Into<String>,
        config: impl Into<String>,
        audit: impl Into<String>,
        expected: impl Into<String>,
        fail_message: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            precondition: None,
            config: config.into(),
            audit: audit.into(),
            expected: expected.into(),
            fail_message: fail_message.into(),
        }
    }

    pub fn with_precondition(mut self, precondition: impl Into<String>) -> Self {
        self.precondition = Some(precondition.into());
        self
    }

    /// Whether an audit's output satisfies this unit
    pub fn is_satisfied_by(&self, audit_output: &str) -> bool {
        audit_output.trim_end() == self.expected.trim_end()
    }
}

impl fmt::Display for ConfigUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)?;
        if let Some(pre) = &self.precondition {
            write!(f, " (after {})", pre)?;
        }
        Ok(())
    }
}

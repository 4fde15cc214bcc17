//! Analysis results handed to the decorator by the host.
//!
//! Texts arrive already rendered (markdown); the decorator only places them.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Results of one analysis run for a pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResults {
    /// Pull request identifier on the server
    pub pull_request_id: String,

    /// Rendered summary comment
    pub summary: String,

    /// Issues found by the analysis, in report order
    #[serde(default)]
    pub issues: Vec<AnalysisIssue>,

    /// Analysed head commit; needed for the Code Insights report
    #[serde(default)]
    pub commit: Option<String>,

    /// Quality gate verdict, if the analysis has one
    #[serde(default)]
    pub quality_gate_passed: Option<bool>,
}

/// A single issue found by the analysis
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisIssue {
    /// Path relative to the repository root, in the post-change tree
    #[serde(default)]
    pub path: Option<String>,

    /// Line in the post-change file; absent or 0 for file-level issues
    #[serde(default)]
    pub line: Option<u32>,

    /// Issue status (e.g., "OPEN", "CLOSED")
    pub status: String,

    /// Rendered issue comment
    pub text: String,

    /// Issue severity (e.g., "BLOCKER", "MAJOR", "INFO")
    #[serde(default)]
    pub severity: Option<String>,

    /// Issue type (e.g., "BUG", "VULNERABILITY", "CODE_SMELL")
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl AnalysisResults {
    /// Read analysis results from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read analysis results: {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse analysis results: {:?}", path))
    }
}

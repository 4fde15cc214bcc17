//! Issue status policy
//!
//! An issue is "open" unless its status is one of the closed statuses.
//! Unknown statuses therefore count as open.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Issue statuses that are excluded from decoration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClosedStatuses(BTreeSet<String>);

impl Default for ClosedStatuses {
    fn default() -> Self {
        Self::new(["CLOSED", "RESOLVED"])
    }
}

impl ClosedStatuses {
    pub fn new<I, S>(statuses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(statuses.into_iter().map(Into::into).collect())
    }

    /// Whether an issue with `status` is closed (exact, case-sensitive match)
    pub fn is_closed(&self, status: &str) -> bool {
        self.0.contains(status)
    }

    pub fn is_open(&self, status: &str) -> bool {
        !self.is_closed(status)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

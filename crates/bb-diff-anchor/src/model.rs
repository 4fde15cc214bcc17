//! Diff data structures as returned by the pull request `diff` endpoint.

use serde::{Deserialize, Serialize};

/// The diff of one pull request comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffPage {
    /// Changed files, in server order.
    #[serde(default)]
    pub diffs: Vec<Diff>,
}

impl DiffPage {
    /// Create a diff page from a list of file diffs.
    pub fn new(diffs: Vec<Diff>) -> Self {
        Self { diffs }
    }
}

/// A single file's diff.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diff {
    /// Path before the change (absent for added files).
    #[serde(default)]
    pub source: Option<DiffPath>,
    /// Path after the change (absent for deleted files).
    #[serde(default)]
    pub destination: Option<DiffPath>,
    /// Change hunks.
    #[serde(default)]
    pub hunks: Vec<Hunk>,
}

impl Diff {
    /// Create a diff for a file that keeps its path.
    pub fn modified(path: impl Into<String>, hunks: Vec<Hunk>) -> Self {
        let path = path.into();
        Self {
            source: Some(DiffPath::new(path.clone())),
            destination: Some(DiffPath::new(path)),
            hunks,
        }
    }

    /// Create a diff for a deleted file (no destination).
    pub fn deleted(path: impl Into<String>, hunks: Vec<Hunk>) -> Self {
        Self {
            source: Some(DiffPath::new(path)),
            destination: None,
            hunks,
        }
    }

    /// Destination path, if the file still exists after the change.
    pub fn destination_path(&self) -> Option<&str> {
        self.destination.as_ref().map(|d| d.path.as_str())
    }
}

/// File descriptor of one side of a diff.
///
/// The server sends several representations; only the joined path matters here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffPath {
    #[serde(rename = "toString")]
    pub path: String,
}

impl DiffPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// A contiguous region of changes (hunk).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hunk {
    /// Old file starting line.
    #[serde(default)]
    pub source_line: u32,
    /// Number of lines in old version.
    #[serde(default)]
    pub source_span: u32,
    /// New file starting line.
    #[serde(default)]
    pub destination_line: u32,
    /// Number of lines in new version.
    #[serde(default)]
    pub destination_span: u32,
    /// Runs of lines sharing one change type.
    #[serde(default)]
    pub segments: Vec<Segment>,
}

impl Hunk {
    /// Create a hunk from its segments, leaving the header counts empty.
    pub fn new(segments: Vec<Segment>) -> Self {
        Self {
            segments,
            ..Self::default()
        }
    }
}

/// A run of lines within a hunk sharing one change type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    #[serde(rename = "type")]
    pub kind: SegmentType,
    #[serde(default)]
    pub lines: Vec<DiffLine>,
}

impl Segment {
    pub fn new(kind: SegmentType, lines: Vec<DiffLine>) -> Self {
        Self { kind, lines }
    }
}

/// Change type of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SegmentType {
    /// Unchanged line (for context).
    Context,
    /// Added line (+).
    Added,
    /// Removed line (-).
    Removed,
}

impl SegmentType {
    /// Wire name of the segment type.
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentType::Context => "CONTEXT",
            SegmentType::Added => "ADDED",
            SegmentType::Removed => "REMOVED",
        }
    }
}

/// A single line in the diff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffLine {
    /// Line number in old file.
    #[serde(default)]
    pub source: Option<u32>,
    /// Line number in new file.
    #[serde(default)]
    pub destination: Option<u32>,
}

impl DiffLine {
    /// Create a new context line.
    pub fn context(source: u32, destination: u32) -> Self {
        Self {
            source: Some(source),
            destination: Some(destination),
        }
    }

    /// Create a new addition line.
    pub fn added(destination: u32) -> Self {
        Self {
            source: None,
            destination: Some(destination),
        }
    }

    /// Create a new deletion line.
    pub fn removed(source: u32) -> Self {
        Self {
            source: Some(source),
            destination: None,
        }
    }
}

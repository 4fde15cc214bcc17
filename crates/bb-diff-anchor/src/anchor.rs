//! Mapping of analysis issues to comment anchors.

use serde::{Deserialize, Serialize};

use crate::index::DiffIndex;
use crate::model::{DiffPage, SegmentType};

/// Which version of the file a line anchor refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileSide {
    /// The file before the change.
    From,
    /// The file after the change.
    To,
}

/// Where a line comment attaches within the diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineAnchor {
    pub line: u32,
    pub line_type: SegmentType,
    pub path: String,
    pub file_side: FileSide,
}

/// Resolved position of a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anchor {
    /// Attached to a line of the diff.
    Line(LineAnchor),
    /// Attached to a file, but to no particular line.
    File { path: String },
    /// Not attached to the diff at all.
    Unanchored,
}

impl Anchor {
    /// File path the anchor refers to, if any.
    pub fn path(&self) -> Option<&str> {
        match self {
            Anchor::Line(anchor) => Some(&anchor.path),
            Anchor::File { path } => Some(path),
            Anchor::Unanchored => None,
        }
    }
}

/// Resolves issue positions against one pull request diff.
#[derive(Debug, Clone, Default)]
pub struct AnchorResolver {
    index: DiffIndex,
}

impl AnchorResolver {
    /// Create a resolver for a fetched diff page.
    pub fn new(page: &DiffPage) -> Self {
        Self::from_index(DiffIndex::new(page))
    }

    pub fn from_index(index: DiffIndex) -> Self {
        Self { index }
    }

    /// Compute the anchor for an issue at `line` of `path`.
    ///
    /// Never fails. A missing path gives [`Anchor::Unanchored`], a missing or
    /// zero line gives [`Anchor::File`]. Lines that are not part of any hunk
    /// fall back to a CONTEXT anchor on the TO side.
    pub fn resolve(&self, path: Option<&str>, line: Option<u32>) -> Anchor {
        let path = match path {
            Some(p) if !p.is_empty() => p,
            _ => return Anchor::Unanchored,
        };
        let line = match line {
            Some(l) if l > 0 => l,
            _ => {
                return Anchor::File {
                    path: path.to_string(),
                }
            }
        };

        let (line_type, file_side) = match self.index.locate(path, line) {
            Some(SegmentType::Context) => (SegmentType::Context, FileSide::From),
            Some(kind @ (SegmentType::Added | SegmentType::Removed)) => (kind, FileSide::To),
            None => (SegmentType::Context, FileSide::To),
        };

        Anchor::Line(LineAnchor {
            line,
            line_type,
            path: path.to_string(),
            file_side,
        })
    }
}

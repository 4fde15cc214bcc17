//! # bb-diff-anchor
//!
//! Diff model for a Bitbucket Server pull request and the logic that decides
//! where an analysis comment attaches inside that diff.
//!
//! ## Design Principles
//!
//! This crate does no I/O. It receives a [`DiffPage`] that somebody else
//! fetched and answers questions about it:
//!
//! - [`DiffIndex::locate`]: which segment type covers destination line `L` of file `F`?
//! - [`AnchorResolver::resolve`]: which [`Anchor`] should a comment for an issue use?
//!
//! ## Usage
//!
//! ```rust
//! use bb_diff_anchor::{Anchor, AnchorResolver, DiffPage, FileSide, SegmentType};
//!
//! let page: DiffPage = serde_json::from_str(r#"{"diffs": []}"#).unwrap();
//! let resolver = AnchorResolver::new(&page);
//!
//! // Lines outside of every hunk fall back to a CONTEXT anchor on the TO side
//! match resolver.resolve(Some("src/App.java"), Some(999)) {
//!     Anchor::Line(anchor) => {
//!         assert_eq!(anchor.line_type, SegmentType::Context);
//!         assert_eq!(anchor.file_side, FileSide::To);
//!     }
//!     other => panic!("unexpected anchor {:?}", other),
//! }
//! ```

pub mod anchor;
pub mod index;
pub mod model;

pub use anchor::{Anchor, AnchorResolver, FileSide, LineAnchor};
pub use index::DiffIndex;
pub use model::{Diff, DiffLine, DiffPage, DiffPath, Hunk, Segment, SegmentType};

//! Lookup of destination lines in a pull request diff.

use std::collections::HashMap;

use crate::model::{DiffPage, SegmentType};

/// Queryable view of a [`DiffPage`].
///
/// Built once per decoration run. For every destination path it maps each
/// destination line number to the type of the segment containing it, so the
/// per-issue lookups don't rescan the hunks.
#[derive(Debug, Clone, Default)]
pub struct DiffIndex {
    files: HashMap<String, HashMap<u32, SegmentType>>,
}

impl DiffIndex {
    /// Build the index from a diff page.
    ///
    /// Iteration order is diff, hunk, segment, line. When a destination line
    /// appears more than once for the same path the first occurrence wins.
    pub fn new(page: &DiffPage) -> Self {
        let mut files: HashMap<String, HashMap<u32, SegmentType>> = HashMap::new();

        for diff in &page.diffs {
            let Some(path) = diff.destination_path() else {
                continue;
            };
            let lines = files.entry(path.to_string()).or_default();
            for segment in diff.hunks.iter().flat_map(|h| &h.segments) {
                for destination in segment.lines.iter().filter_map(|l| l.destination) {
                    lines.entry(destination).or_insert(segment.kind);
                }
            }
        }

        Self { files }
    }

    /// Type of the segment that covers `destination_line` of `path`, if any.
    pub fn locate(&self, path: &str, destination_line: u32) -> Option<SegmentType> {
        self.files
            .get(path)
            .and_then(|lines| lines.get(&destination_line))
            .copied()
    }

    /// Whether any diff has `path` as its destination.
    pub fn contains_file(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// Number of destination files in the index.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Diff, DiffLine, Hunk, Segment};

    fn sample_page() -> DiffPage {
        DiffPage::new(vec![
            Diff::modified(
                "src/lib.rs",
                vec![
                    Hunk::new(vec![
                        Segment::new(
                            SegmentType::Context,
                            vec![DiffLine::context(1, 1), DiffLine::context(2, 2)],
                        ),
                        Segment::new(SegmentType::Removed, vec![DiffLine::removed(3)]),
                        Segment::new(SegmentType::Added, vec![DiffLine::added(3)]),
                    ]),
                    Hunk::new(vec![Segment::new(
                        SegmentType::Context,
                        vec![DiffLine::context(20, 20)],
                    )]),
                ],
            ),
            Diff::deleted(
                "src/old.rs",
                vec![Hunk::new(vec![Segment::new(
                    SegmentType::Removed,
                    vec![DiffLine::removed(1)],
                )])],
            ),
        ])
    }

    #[test]
    fn test_locate_by_segment() {
        let index = DiffIndex::new(&sample_page());

        assert_eq!(index.locate("src/lib.rs", 1), Some(SegmentType::Context));
        assert_eq!(index.locate("src/lib.rs", 3), Some(SegmentType::Added));
        assert_eq!(index.locate("src/lib.rs", 20), Some(SegmentType::Context));
    }

    #[test]
    fn test_locate_misses() {
        let index = DiffIndex::new(&sample_page());

        assert_eq!(index.locate("src/lib.rs", 10), None);
        assert_eq!(index.locate("src/other.rs", 1), None);
        // Deleted files have no destination and never match
        assert_eq!(index.locate("src/old.rs", 1), None);
        assert!(!index.contains_file("src/old.rs"));
        assert_eq!(index.file_count(), 1);
    }

    #[test]
    fn test_first_match_wins() {
        let page = DiffPage::new(vec![
            Diff::modified(
                "a.rs",
                vec![Hunk::new(vec![
                    Segment::new(SegmentType::Added, vec![DiffLine::added(5)]),
                    Segment::new(SegmentType::Context, vec![DiffLine::context(5, 5)]),
                ])],
            ),
            Diff::modified(
                "a.rs",
                vec![Hunk::new(vec![Segment::new(
                    SegmentType::Removed,
                    vec![DiffLine {
                        source: Some(5),
                        destination: Some(5),
                    }],
                )])],
            ),
        ]);

        let index = DiffIndex::new(&page);
        assert_eq!(index.locate("a.rs", 5), Some(SegmentType::Added));
    }

    #[test]
    fn test_empty_page() {
        let index = DiffIndex::new(&DiffPage::default());
        assert_eq!(index.locate("a.rs", 1), None);
        assert_eq!(index.file_count(), 0);
    }
}

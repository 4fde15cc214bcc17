//! Bitbucket Server API data transfer objects
//!
//! These types mirror the JSON of the activity and comment resources, the
//! application properties and the Code Insights reports. The diff model lives
//! in `bb-diff-anchor` and is re-exported from the crate root.

use bb_diff_anchor::{Anchor, FileSide, SegmentType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One page of the pull request activity feed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPage {
    /// Activities in feed order (newest first on the server)
    #[serde(default)]
    pub values: Vec<Activity>,

    /// Whether this is the last page of the feed
    #[serde(default = "default_is_last_page")]
    pub is_last_page: bool,

    /// Start index of the next page (absent on the last page)
    #[serde(default)]
    pub next_page_start: Option<u32>,

    /// Start index of this page
    #[serde(default)]
    pub start: u32,

    /// Page size limit applied by the server
    #[serde(default)]
    pub limit: u32,

    /// Number of activities in this page
    #[serde(default)]
    pub size: u32,
}

fn default_is_last_page() -> bool {
    true
}

/// A single entry of the activity feed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// Activity ID
    #[serde(default)]
    pub id: Option<u64>,

    /// Kind of activity (e.g., "COMMENTED", "OPENED")
    #[serde(default)]
    pub action: Option<String>,

    /// Comment attached to the activity, if it is a comment activity
    #[serde(default)]
    pub comment: Option<Comment>,
}

/// A pull request comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Comment ID
    pub id: u64,

    /// Optimistic locking version, required to delete the comment
    #[serde(default)]
    pub version: u32,

    /// Comment text
    #[serde(default)]
    pub text: Option<String>,

    /// Author of the comment
    #[serde(default)]
    pub author: Option<Author>,

    /// When the comment was created
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub created_date: Option<DateTime<Utc>>,
}

impl Comment {
    /// Slug of the author, if the comment has one
    pub fn author_slug(&self) -> Option<&str> {
        self.author.as_ref().map(|a| a.slug.as_str())
    }
}

/// A Bitbucket Server user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    /// URL-safe user identity
    #[serde(default)]
    pub slug: String,

    /// Login name
    #[serde(default)]
    pub name: Option<String>,

    /// Display name
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Request body for creating a comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateComment {
    /// Comment text (markdown)
    pub text: String,

    /// Where the comment attaches; absent for general comments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<CommentAnchor>,
}

impl CreateComment {
    /// A general pull request comment, not attached to the diff
    pub fn general(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            anchor: None,
        }
    }

    /// A comment placed at a resolved anchor
    pub fn anchored(text: impl Into<String>, anchor: &Anchor) -> Self {
        Self {
            text: text.into(),
            anchor: CommentAnchor::from_anchor(anchor),
        }
    }
}

/// Anchor section of a comment request
///
/// File comments only carry `path`; line comments carry all four fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentAnchor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_type: Option<SegmentType>,

    pub path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<FileSide>,
}

impl CommentAnchor {
    /// Convert a resolved anchor into its wire form
    ///
    /// Returns `None` for [`Anchor::Unanchored`].
    pub fn from_anchor(anchor: &Anchor) -> Option<Self> {
        match anchor {
            Anchor::Line(line) => Some(Self {
                line: Some(line.line),
                line_type: Some(line.line_type),
                path: line.path.clone(),
                file_type: Some(line.file_side),
            }),
            Anchor::File { path } => Some(Self {
                line: None,
                line_type: None,
                path: path.clone(),
                file_type: None,
            }),
            Anchor::Unanchored => None,
        }
    }
}

/// First server release that ships the Code Insights API
pub const CODE_INSIGHTS_VERSION: &str = "5.15";

/// `application-properties` of a Bitbucket Server instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerProperties {
    /// Release version (e.g., "7.21.0")
    pub version: String,

    #[serde(default)]
    pub build_number: Option<String>,

    #[serde(default)]
    pub display_name: Option<String>,
}

impl ServerProperties {
    /// Whether this release has the Code Insights API
    pub fn has_code_insights_api(&self) -> bool {
        version_parts(&self.version) >= version_parts(CODE_INSIGHTS_VERSION)
    }
}

/// Numeric components of a dotted version; "7.21.0-rc1" gives `[7, 21, 0]`
fn version_parts(version: &str) -> Vec<u32> {
    version
        .trim()
        .split('.')
        .map(|part| {
            part.chars()
                .take_while(char::is_ascii_digit)
                .collect::<String>()
                .parse()
                .unwrap_or(0)
        })
        .collect()
}

/// Overall verdict of a Code Insights report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportResult {
    Pass,
    Fail,
}

/// Request body for creating or replacing a Code Insights report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReport {
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ReportResult>,

    /// Name of the tool that produced the report
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporter: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    /// Key figures shown next to the report
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<ReportData>,
}

/// One key figure of a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportData {
    pub title: String,

    #[serde(flatten)]
    pub value: ReportValue,
}

/// Typed value of a report figure, sent as `{"type": ..., "value": ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportValue {
    Boolean(bool),
    Number(i64),
    Percentage(f64),
    Text(String),
    Link { linktext: String, href: String },
}

/// Severity of an annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnnotationSeverity {
    Low,
    Medium,
    High,
}

/// Category of an annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnnotationType {
    Vulnerability,
    CodeSmell,
    Bug,
}

/// A finding attached to a Code Insights report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    /// File the annotation belongs to; absent for report-level findings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Line in the post-change file; absent for file-level findings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,

    pub message: String,

    pub severity: AnnotationSeverity,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<AnnotationType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Request body for adding annotations to a report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAnnotations {
    pub annotations: Vec<Annotation>,
}

//! Bitbucket Server pull request API client
//!
//! This crate provides a trait-based client for the endpoints a decoration
//! run needs: the pull request diff, activity feed and comments, plus the
//! Code Insights report and annotations of the head commit.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │             BitbucketClient trait               │
//! │  - fetch_diff()                                 │
//! │  - fetch_activities()                           │
//! │  - post_comment() / delete_comment()            │
//! │  - supports_code_insights()                     │
//! │  - create_report()                              │
//! │  - create_annotations() / delete_annotations()  │
//! └─────────────────────────────────────────────────┘
//!                        │
//!                        ▼
//!              ┌─────────────────┐
//!              │  ReqwestClient  │
//!              │  (direct API)   │
//!              └─────────────────┘
//! ```
//!
//! Every call takes the [`PullRequestEndpoints`] of the run, so one client can
//! serve several pull requests without sharing mutable state.
//!
//! # Example
//!
//! ```rust,no_run
//! use bb_client::{BitbucketClient, PullRequestEndpoints, RepositoryOwner, ReqwestClient};
//! use std::time::Duration;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = ReqwestClient::new("token", Duration::from_secs(30))?;
//! let endpoints = PullRequestEndpoints::new(
//!     "https://bitbucket.example.com",
//!     &RepositoryOwner::Project("PROJ".to_string()),
//!     "repo",
//!     "42",
//! );
//!
//! let diff = client.fetch_diff(&endpoints).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod endpoints;
pub mod error;
pub mod reqwest_client;
pub mod types;

pub use client::BitbucketClient;
pub use endpoints::{
    application_properties, InsightsEndpoints, PullRequestEndpoints, RepositoryOwner,
    INSIGHTS_API, REST_API,
};
pub use error::ApiError;
pub use reqwest_client::ReqwestClient;
pub use types::{
    Activity, ActivityPage, Annotation, AnnotationSeverity, AnnotationType, Author, Comment,
    CommentAnchor, CreateAnnotations, CreateComment, CreateReport, ReportData, ReportResult,
    ReportValue, ServerProperties, CODE_INSIGHTS_VERSION,
};

// Re-export the diff model so consumers don't need to depend on it directly
pub use bb_diff_anchor::{DiffPage, FileSide, SegmentType};

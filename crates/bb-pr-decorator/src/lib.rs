//! Decorates a Bitbucket Server pull request with static-analysis results
//!
//! One decoration run:
//!
//! ```text
//! resolve endpoints ─▶ delete stale bot comments ─▶ post summary
//!                                                       │
//!        post one anchored comment per open issue ◀─ fetch diff once
//!                       │
//!                       ▼
//!        publish Code Insights report (optional)
//! ```
//!
//! Deleting old comments is best-effort: a failed deletion is logged and the
//! run goes on. Everything else (summary, diff, issue comments, the report)
//! is fatal and ends the run with the first error. A server too old for Code
//! Insights only skips the report.

pub mod analysis;
pub mod decorator;
pub mod insights;
pub mod lifecycle;
pub mod policy;

pub use analysis::{AnalysisIssue, AnalysisResults};
pub use decorator::{open_issues, DecorationReport, PullRequestDecorator, DECORATOR_NAME};
pub use insights::{build_annotations, build_report, InsightsPublisher};
pub use lifecycle::{list_bot_comments, CommentLifecycleManager, FeedPaging};

//! Pull request decoration workflow
//!
//! Drives one run for one pull request. The steps run strictly in order and
//! never go back:
//!
//! 1. resolve the endpoints (user or project repository)
//! 2. delete the bot's comments from the previous run
//! 3. post the summary comment
//! 4. fetch the diff, once
//! 5. post one anchored comment per open issue
//! 6. publish the Code Insights report of the analysed commit, if enabled
//!
//! A run is not transactional. When a fatal step fails, whatever was deleted
//! or posted before stays that way.

use anyhow::Context;
use bb_client::{
    BitbucketClient, CreateComment, InsightsEndpoints, PullRequestEndpoints, RepositoryOwner,
};
use bb_diff_anchor::AnchorResolver;
use bb_pr_config::{ClosedStatuses, ConfigError, DecoratorConfig};
use log::{debug, info};

use crate::analysis::{AnalysisIssue, AnalysisResults};
use crate::insights::{build_annotations, build_report, InsightsPublisher};
use crate::lifecycle::{CommentLifecycleManager, FeedPaging};
use crate::policy;

/// Name of the decorator, as shown in logs
pub const DECORATOR_NAME: &str = "BitbucketServer";

/// What a successful run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecorationReport {
    /// Old bot comments that were deleted
    pub deleted_comments: usize,
    /// Whether the summary comment was posted
    pub summary_posted: bool,
    /// Issue comments that were posted
    pub issue_comments_posted: usize,
    /// Issues that were candidates for a comment
    pub open_issues: usize,
    /// Issues skipped because of their status
    pub closed_issues_skipped: usize,
    /// Whether a Code Insights report was published
    pub insights_published: bool,
    /// Annotations sent with the Code Insights report
    pub annotations_posted: usize,
}

/// Decorates pull requests on one Bitbucket Server
///
/// Holds no per-run state; every call to [`decorate`](Self::decorate) builds
/// its own endpoints and fetches its own snapshots.
pub struct PullRequestDecorator<C: BitbucketClient> {
    client: C,
    config: DecoratorConfig,
}

impl<C: BitbucketClient> PullRequestDecorator<C> {
    pub fn new(client: C, config: DecoratorConfig) -> Self {
        Self { client, config }
    }

    pub fn name(&self) -> &'static str {
        DECORATOR_NAME
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    fn repository_owner(&self) -> Result<RepositoryOwner, ConfigError> {
        RepositoryOwner::from_settings(
            self.config.user_slug.as_deref(),
            self.config.project_key.as_deref(),
        )
        .ok_or(ConfigError::MissingRepositoryOwner)
    }

    /// Endpoints of a pull request in the configured repository
    ///
    /// Fails if neither `user_slug` nor `project_key` is set.
    pub fn resolve_endpoints(
        &self,
        pull_request_id: &str,
    ) -> Result<PullRequestEndpoints, ConfigError> {
        let owner = self.repository_owner()?;

        Ok(PullRequestEndpoints::new(
            &self.config.base_url,
            &owner,
            &self.config.repository_slug,
            pull_request_id,
        ))
    }

    /// Run one decoration for the pull request of `analysis`
    ///
    /// Returns the first fatal error, wrapped with the pull request id.
    pub async fn decorate(&self, analysis: &AnalysisResults) -> anyhow::Result<DecorationReport> {
        self.run(analysis).await.with_context(|| {
            format!(
                "could not decorate pull request {} on Bitbucket Server",
                analysis.pull_request_id
            )
        })
    }

    async fn run(&self, analysis: &AnalysisResults) -> anyhow::Result<DecorationReport> {
        let features = self.config.features;
        let endpoints = self.resolve_endpoints(&analysis.pull_request_id)?;

        info!(
            "Decorating pull request {} with {} ({} issues)",
            analysis.pull_request_id,
            self.name(),
            analysis.issues.len()
        );
        debug!("Comment URL is: {}", endpoints.comments());
        debug!(
            "Activity URL is: {}",
            endpoints.activities(0, self.config.activity_page_size)
        );
        debug!("Diff URL is: {}", endpoints.diff());

        let mut report = DecorationReport::default();

        let paging = FeedPaging {
            page_size: self.config.activity_page_size,
            max_pages: self.config.max_activity_pages,
        };
        report.deleted_comments = CommentLifecycleManager::new(&self.client, &endpoints)
            .delete_stale_comments(
                features.delete_old_comments,
                self.config.comment_author(),
                paging,
            )
            .await?;

        let summary = CreateComment::general(analysis.summary.as_str());
        report.summary_posted = self
            .post_comment(&endpoints, &summary, features.summary_comment, "post summary comment")
            .await?;

        let diff = policy::fatal(
            "fetch pull request diff",
            self.client.fetch_diff(&endpoints).await,
        )?;
        let resolver = AnchorResolver::new(&diff);

        let issues = open_issues(&analysis.issues, &self.config.closed_statuses);
        report.open_issues = issues.len();
        report.closed_issues_skipped = analysis.issues.len() - issues.len();

        for issue in &issues {
            let anchor = resolver.resolve(issue.path.as_deref(), issue.line);
            let comment = CreateComment::anchored(issue.text.as_str(), &anchor);
            if self
                .post_comment(&endpoints, &comment, features.file_comments, "post issue comment")
                .await?
            {
                report.issue_comments_posted += 1;
            }
        }

        if features.code_insights {
            if let Some(sent) = self.publish_insights(analysis, &issues).await? {
                report.insights_published = true;
                report.annotations_posted = sent;
            }
        }

        info!(
            "Pull request {} decorated: {} deleted, summary posted: {}, {} issue comments posted",
            analysis.pull_request_id,
            report.deleted_comments,
            report.summary_posted,
            report.issue_comments_posted
        );
        Ok(report)
    }

    /// Publish the Code Insights report of the analysed commit
    ///
    /// Skipped, returning `None`, when the analysis names no commit or the
    /// server predates Code Insights. Failures after the version check are
    /// fatal.
    async fn publish_insights(
        &self,
        analysis: &AnalysisResults,
        issues: &[&AnalysisIssue],
    ) -> anyhow::Result<Option<usize>> {
        let Some(commit) = analysis.commit.as_deref().filter(|c| !c.trim().is_empty()) else {
            info!("No Code Insights report because the analysis names no commit");
            return Ok(None);
        };
        if !self.client.supports_code_insights(&self.config.base_url).await {
            return Ok(None);
        }

        let endpoints = InsightsEndpoints::new(
            &self.config.base_url,
            &self.repository_owner()?,
            &self.config.repository_slug,
            commit,
            &self.config.insights_report_key,
        );
        let sent = InsightsPublisher::new(&self.client, &endpoints)
            .publish(&build_report(analysis, issues.len()), &build_annotations(issues))
            .await?;
        Ok(Some(sent))
    }

    /// Post `comment` if `enabled`; the body is logged either way
    ///
    /// A failed post is fatal.
    async fn post_comment(
        &self,
        endpoints: &PullRequestEndpoints,
        comment: &CreateComment,
        enabled: bool,
        operation: &str,
    ) -> anyhow::Result<bool> {
        debug!(
            "{}",
            serde_json::to_string(comment).context("Failed to serialize comment")?
        );
        if !enabled {
            return Ok(false);
        }

        let id = policy::fatal(operation, self.client.post_comment(endpoints, comment).await)?;
        debug!("Posted comment {}", id);
        Ok(true)
    }
}

/// Issues whose status is not closed, in report order
pub fn open_issues<'a>(
    issues: &'a [AnalysisIssue],
    closed: &ClosedStatuses,
) -> Vec<&'a AnalysisIssue> {
    issues
        .iter()
        .filter(|issue| closed.is_open(&issue.status))
        .collect()
}

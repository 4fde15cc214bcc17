//! Bitbucket client trait
//!
//! This module defines the core `BitbucketClient` trait that all client
//! implementations must satisfy.

use crate::endpoints::{InsightsEndpoints, PullRequestEndpoints};
use crate::types::{
    ActivityPage, CreateAnnotations, CreateComment, CreateReport, ServerProperties,
    CODE_INSIGHTS_VERSION,
};
use async_trait::async_trait;
use bb_diff_anchor::DiffPage;
use log::{debug, error, info};

/// Bitbucket Server pull request API client trait
///
/// Defines the interface for the pull request and Code Insights resources a
/// decoration run touches. Implementations report transport failures,
/// unexpected status codes and undecodable bodies as errors; callers decide
/// whether an error is fatal.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow sharing across
/// async tasks and threads.
///
/// # Example
///
/// ```rust,ignore
/// use bb_client::{BitbucketClient, PullRequestEndpoints};
///
/// async fn changed_files(client: &dyn BitbucketClient, pr: &PullRequestEndpoints) -> anyhow::Result<usize> {
///     Ok(client.fetch_diff(pr).await?.diffs.len())
/// }
/// ```
#[async_trait]
pub trait BitbucketClient: Send + Sync {
    /// Fetch the diff of a pull request
    ///
    /// Expects `200 OK`.
    async fn fetch_diff(&self, endpoints: &PullRequestEndpoints) -> anyhow::Result<DiffPage>;

    /// Fetch one page of the pull request activity feed
    ///
    /// # Arguments
    ///
    /// * `endpoints` - Endpoints of the pull request
    /// * `start` - Index of the first activity of the page
    /// * `limit` - Maximum number of activities in the page
    ///
    /// # Returns
    ///
    /// The page, including the paging markers needed to fetch the next one.
    async fn fetch_activities(
        &self,
        endpoints: &PullRequestEndpoints,
        start: u32,
        limit: u32,
    ) -> anyhow::Result<ActivityPage>;

    /// Post a comment on a pull request
    ///
    /// Expects `201 Created`.
    ///
    /// # Returns
    ///
    /// The ID of the created comment.
    async fn post_comment(
        &self,
        endpoints: &PullRequestEndpoints,
        comment: &CreateComment,
    ) -> anyhow::Result<u64>;

    /// Delete a comment
    ///
    /// `version` must be the last version observed from the server, otherwise
    /// the server rejects the deletion. Expects `204 No Content`.
    async fn delete_comment(
        &self,
        endpoints: &PullRequestEndpoints,
        comment_id: u64,
        version: u32,
    ) -> anyhow::Result<()>;

    /// Fetch the application properties of the server
    ///
    /// Expects `200 OK`.
    async fn server_properties(&self, base_url: &str) -> anyhow::Result<ServerProperties>;

    /// Create or replace the Code Insights report of a commit
    ///
    /// Expects `200 OK`.
    async fn create_report(
        &self,
        endpoints: &InsightsEndpoints,
        report: &CreateReport,
    ) -> anyhow::Result<()>;

    /// Send annotations to the report of a commit
    ///
    /// Use [`create_annotations`](Self::create_annotations), which skips the
    /// request for an empty list. Expects `204 No Content`.
    async fn post_annotations(
        &self,
        endpoints: &InsightsEndpoints,
        annotations: &CreateAnnotations,
    ) -> anyhow::Result<()>;

    /// Delete every annotation of the report of a commit
    ///
    /// Expects `204 No Content`.
    async fn delete_annotations(&self, endpoints: &InsightsEndpoints) -> anyhow::Result<()>;

    /// Add annotations to the report of a commit
    ///
    /// No request is sent when `annotations` is empty.
    ///
    /// # Returns
    ///
    /// The number of annotations sent.
    async fn create_annotations(
        &self,
        endpoints: &InsightsEndpoints,
        annotations: &CreateAnnotations,
    ) -> anyhow::Result<usize> {
        if annotations.annotations.is_empty() {
            debug!("No annotations to send");
            return Ok(0);
        }
        self.post_annotations(endpoints, annotations).await?;
        Ok(annotations.annotations.len())
    }

    /// Whether the server is recent enough for Code Insights
    ///
    /// Never fails: a server whose version cannot be read counts as not
    /// supporting Code Insights.
    async fn supports_code_insights(&self, base_url: &str) -> bool {
        match self.server_properties(base_url).await {
            Ok(server) => {
                debug!("Bitbucket Server is version {}", server.version);
                if server.has_code_insights_api() {
                    return true;
                }
                info!(
                    "Bitbucket Server {} is too old, {} is the minimum version that supports Code Insights",
                    server.version, CODE_INSIGHTS_VERSION
                );
                false
            }
            Err(err) => {
                error!("Could not determine Bitbucket Server version: {:#}", err);
                false
            }
        }
    }
}

//! Removal of comments left behind by a previous decoration run.
//!
//! Old comments are recognized by authorship: every comment in the activity
//! feed whose author slug equals the configured bot identity is deleted.
//! Without an identity there is no way to tell bot comments from human ones,
//! so nothing is deleted.

use bb_client::{Activity, BitbucketClient, Comment, PullRequestEndpoints};
use log::{debug, info, warn};

use crate::policy;

/// How the activity feed is paged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedPaging {
    /// Activities requested per page
    pub page_size: u32,
    /// Pages fetched at most; older activities are not scanned
    pub max_pages: u32,
}

impl Default for FeedPaging {
    fn default() -> Self {
        Self {
            page_size: 250,
            max_pages: 20,
        }
    }
}

/// Comments in `activities` authored by `author`, in feed order
pub fn list_bot_comments(activities: &[Activity], author: &str) -> Vec<Comment> {
    activities
        .iter()
        .filter_map(|activity| activity.comment.as_ref())
        .filter(|comment| comment.author_slug() == Some(author))
        .cloned()
        .collect()
}

/// Deletes the bot's comments on one pull request
pub struct CommentLifecycleManager<'a, C: BitbucketClient + ?Sized> {
    client: &'a C,
    endpoints: &'a PullRequestEndpoints,
}

impl<'a, C: BitbucketClient + ?Sized> CommentLifecycleManager<'a, C> {
    pub fn new(client: &'a C, endpoints: &'a PullRequestEndpoints) -> Self {
        Self { client, endpoints }
    }

    /// Delete every comment `author` left on the pull request
    ///
    /// Does nothing unless `enabled` is set and `author` is a non-empty
    /// identity. A failing feed fetch is fatal; failing deletions are not.
    ///
    /// # Returns
    ///
    /// The number of comments that were deleted.
    pub async fn delete_stale_comments(
        &self,
        enabled: bool,
        author: Option<&str>,
        paging: FeedPaging,
    ) -> anyhow::Result<usize> {
        if !enabled {
            return Ok(0);
        }
        let Some(author) = author.filter(|a| !a.is_empty()) else {
            info!("No comments deleted because comment_author_slug is not set");
            return Ok(0);
        };

        let activities = policy::fatal(
            "fetch pull request activities",
            self.fetch_activity_feed(paging).await,
        )?;
        let comments = list_bot_comments(&activities, author);
        debug!(
            "Deleting {} comments by {}: {:?}",
            comments.len(),
            author,
            comments.iter().map(|c| c.id).collect::<Vec<_>>()
        );

        Ok(self.delete_all(&comments).await)
    }

    /// Fetch the activity feed page by page
    ///
    /// Follows `nextPageStart` until the server reports the last page or
    /// `paging.max_pages` pages have been read.
    pub async fn fetch_activity_feed(&self, paging: FeedPaging) -> anyhow::Result<Vec<Activity>> {
        let mut activities = Vec::new();
        let mut start = 0;

        for _ in 0..paging.max_pages {
            let page = self
                .client
                .fetch_activities(self.endpoints, start, paging.page_size)
                .await?;
            activities.extend(page.values);

            match page.next_page_start {
                Some(next) if !page.is_last_page => start = next,
                _ => return Ok(activities),
            }
        }

        warn!(
            "Stopped reading the activity feed after {} pages; older comments are not deleted",
            paging.max_pages
        );
        Ok(activities)
    }

    /// Delete the given comments one by one
    ///
    /// Each deletion is independent: a failure is logged and the next
    /// comment is tried.
    ///
    /// # Returns
    ///
    /// The number of comments that were deleted.
    pub async fn delete_all(&self, comments: &[Comment]) -> usize {
        let mut deleted = 0;
        for comment in comments {
            debug!("delete {} {}", comment.id, comment.version);
            let result = self
                .client
                .delete_comment(self.endpoints, comment.id, comment.version)
                .await;
            if policy::isolated("delete comment from Bitbucket Server", result).is_some() {
                deleted += 1;
            }
        }
        deleted
    }
}

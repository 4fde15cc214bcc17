//! Shared test fixtures: a scripted, recording `BitbucketClient`.

#![allow(dead_code)]

use async_trait::async_trait;
use bb_client::{
    Activity, ActivityPage, ApiError, Author, BitbucketClient, Comment, CreateAnnotations,
    CreateComment, CreateReport, InsightsEndpoints, PullRequestEndpoints, ServerProperties,
};
use bb_diff_anchor::{Diff, DiffLine, DiffPage, Hunk, Segment, SegmentType};
use bb_pr_config::{DecoratorConfig, FeatureFlags};
use bb_pr_decorator::{AnalysisIssue, AnalysisResults};
use std::sync::Mutex;

pub const BOT: &str = "bot-slug";
pub const APP: &str = "src/App.java";

/// A request the client received
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    FetchDiff,
    FetchActivities { start: u32, limit: u32 },
    PostComment(CreateComment),
    DeleteComment { id: u64, version: u32 },
    ServerProperties,
    CreateReport { url: String, report: CreateReport },
    PostAnnotations(CreateAnnotations),
    DeleteAnnotations,
}

/// Mock client that records every call and fails on demand
#[derive(Debug, Default)]
pub struct RecordingClient {
    pub diff: DiffPage,
    /// Pages returned by consecutive activity fetches
    pub activity_pages: Vec<ActivityPage>,
    /// 1-based post attempt that fails
    pub fail_post_at: Option<usize>,
    pub fail_delete_ids: Vec<u64>,
    pub fail_diff: bool,
    pub fail_activities: bool,
    /// Version reported by the server; `None` makes the lookup fail
    pub server_version: Option<String>,
    pub fail_report: bool,
    calls: Mutex<Vec<Call>>,
}

impl RecordingClient {
    pub fn new(diff: DiffPage) -> Self {
        Self {
            diff,
            ..Self::default()
        }
    }

    pub fn with_activities(mut self, pages: Vec<ActivityPage>) -> Self {
        self.activity_pages = pages;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn posted(&self) -> Vec<CreateComment> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::PostComment(comment) => Some(comment),
                _ => None,
            })
            .collect()
    }

    pub fn deleted_ids(&self) -> Vec<u64> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::DeleteComment { id, .. } => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, matcher: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|call| matcher(call)).count()
    }

    fn record(&self, call: Call) -> usize {
        let mut calls = self.calls.lock().unwrap();
        calls.push(call);
        calls.len()
    }
}

#[async_trait]
impl BitbucketClient for RecordingClient {
    async fn fetch_diff(&self, _endpoints: &PullRequestEndpoints) -> anyhow::Result<DiffPage> {
        self.record(Call::FetchDiff);
        if self.fail_diff {
            return Err(anyhow::anyhow!("connection reset"));
        }
        Ok(self.diff.clone())
    }

    async fn fetch_activities(
        &self,
        _endpoints: &PullRequestEndpoints,
        start: u32,
        limit: u32,
    ) -> anyhow::Result<ActivityPage> {
        let fetched = self.count(|c| matches!(c, Call::FetchActivities { .. }));
        self.record(Call::FetchActivities { start, limit });
        if self.fail_activities {
            return Err(anyhow::anyhow!("activities unavailable"));
        }
        Ok(self
            .activity_pages
            .get(fetched)
            .cloned()
            .unwrap_or_else(|| activity_page(vec![], None)))
    }

    async fn post_comment(
        &self,
        endpoints: &PullRequestEndpoints,
        comment: &CreateComment,
    ) -> anyhow::Result<u64> {
        self.record(Call::PostComment(comment.clone()));
        let attempt = self.count(|c| matches!(c, Call::PostComment(_)));
        if self.fail_post_at == Some(attempt) {
            return Err(ApiError::UnexpectedStatus {
                url: endpoints.comments(),
                status: 400,
                expected: 201,
                body: "bad anchor".to_string(),
            }
            .into());
        }
        Ok(attempt as u64)
    }

    async fn delete_comment(
        &self,
        endpoints: &PullRequestEndpoints,
        comment_id: u64,
        version: u32,
    ) -> anyhow::Result<()> {
        self.record(Call::DeleteComment {
            id: comment_id,
            version,
        });
        if self.fail_delete_ids.contains(&comment_id) {
            return Err(ApiError::UnexpectedStatus {
                url: endpoints.comment(comment_id, version),
                status: 409,
                expected: 204,
                body: "stale version".to_string(),
            }
            .into());
        }
        Ok(())
    }

    async fn server_properties(&self, _base_url: &str) -> anyhow::Result<ServerProperties> {
        self.record(Call::ServerProperties);
        let version = self
            .server_version
            .clone()
            .ok_or_else(|| anyhow::anyhow!("application properties unavailable"))?;
        Ok(ServerProperties {
            version,
            build_number: None,
            display_name: None,
        })
    }

    async fn create_report(
        &self,
        endpoints: &InsightsEndpoints,
        report: &CreateReport,
    ) -> anyhow::Result<()> {
        self.record(Call::CreateReport {
            url: endpoints.report(),
            report: report.clone(),
        });
        if self.fail_report {
            return Err(ApiError::UnexpectedStatus {
                url: endpoints.report(),
                status: 403,
                expected: 200,
                body: "no permission".to_string(),
            }
            .into());
        }
        Ok(())
    }

    async fn post_annotations(
        &self,
        _endpoints: &InsightsEndpoints,
        annotations: &CreateAnnotations,
    ) -> anyhow::Result<()> {
        self.record(Call::PostAnnotations(annotations.clone()));
        Ok(())
    }

    async fn delete_annotations(&self, _endpoints: &InsightsEndpoints) -> anyhow::Result<()> {
        self.record(Call::DeleteAnnotations);
        Ok(())
    }
}

/// Diff of `src/App.java`: context 40-41, added 42, context 43
pub fn app_diff() -> DiffPage {
    DiffPage::new(vec![Diff::modified(
        APP,
        vec![Hunk::new(vec![
            Segment::new(
                SegmentType::Context,
                vec![DiffLine::context(40, 40), DiffLine::context(41, 41)],
            ),
            Segment::new(SegmentType::Added, vec![DiffLine::added(42)]),
            Segment::new(SegmentType::Context, vec![DiffLine::context(42, 43)]),
        ])],
    )])
}

pub fn activity_page(values: Vec<Activity>, next_page_start: Option<u32>) -> ActivityPage {
    ActivityPage {
        size: values.len() as u32,
        values,
        is_last_page: next_page_start.is_none(),
        next_page_start,
        start: 0,
        limit: 250,
    }
}

pub fn comment_activity(id: u64, version: u32, author: Option<&str>) -> Activity {
    Activity {
        id: Some(1000 + id),
        action: Some("COMMENTED".to_string()),
        comment: Some(Comment {
            id,
            version,
            text: Some(format!("comment {}", id)),
            author: author.map(|slug| Author {
                slug: slug.to_string(),
                ..Author::default()
            }),
            created_date: None,
        }),
    }
}

pub fn config() -> DecoratorConfig {
    DecoratorConfig {
        base_url: "https://bitbucket.example.com".to_string(),
        token: "secret".to_string(),
        repository_slug: "repo".to_string(),
        project_key: Some("PROJ".to_string()),
        comment_author_slug: Some(BOT.to_string()),
        features: FeatureFlags::default(),
        ..DecoratorConfig::default()
    }
}

pub fn issue(path: Option<&str>, line: Option<u32>, status: &str, text: &str) -> AnalysisIssue {
    AnalysisIssue {
        path: path.map(str::to_string),
        line,
        status: status.to_string(),
        text: text.to_string(),
        ..AnalysisIssue::default()
    }
}

pub fn analysis(issues: Vec<AnalysisIssue>) -> AnalysisResults {
    AnalysisResults {
        pull_request_id: "42".to_string(),
        summary: "Quality Gate passed".to_string(),
        issues,
        commit: None,
        quality_gate_passed: None,
    }
}

//! Reqwest-based Bitbucket Server API client
//!
//! Direct implementation of the `BitbucketClient` trait on top of a
//! `reqwest::Client`. Every call is a single request; there is no retry and
//! no caching.

use crate::client::BitbucketClient;
use crate::endpoints::{application_properties, InsightsEndpoints, PullRequestEndpoints};
use crate::error::ApiError;
use crate::types::{
    ActivityPage, Comment, CreateAnnotations, CreateComment, CreateReport, ServerProperties,
};
use anyhow::Context;
use async_trait::async_trait;
use bb_diff_anchor::DiffPage;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Direct Bitbucket Server API client using reqwest
///
/// Authenticates every request with a bearer token and asks for JSON.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    http: reqwest::Client,
}

impl ReqwestClient {
    /// Create a new client for the given access token
    ///
    /// # Arguments
    ///
    /// * `token` - Personal or HTTP access token
    /// * `timeout` - Timeout applied to every request
    pub fn new(token: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .default_headers(default_headers(token)?)
            .timeout(timeout)
            .build()
            .context("Failed to build Bitbucket HTTP client")?;
        Ok(Self { http })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, ApiError> {
        debug!("GET {}", url);
        let response = self.http.get(&url).send().await;
        let body = read_body(url.clone(), response, StatusCode::OK).await?;
        parse_body(url, &body)
    }

    /// Send `payload` as JSON and return the response body
    async fn send_json<T: Serialize + ?Sized>(
        &self,
        method: Method,
        url: String,
        payload: &T,
        expected: StatusCode,
    ) -> anyhow::Result<String> {
        let payload = serde_json::to_string(payload).context("Failed to serialize request body")?;
        debug!("{} {} {}", method, url, payload);

        let response = self
            .http
            .request(method, &url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await;
        Ok(read_body(url, response, expected).await?)
    }

    async fn delete(&self, url: String) -> Result<(), ApiError> {
        debug!("DELETE {}", url);
        let response = self.http.delete(&url).send().await;
        read_body(url, response, StatusCode::NO_CONTENT).await?;
        Ok(())
    }
}

/// Headers sent with every request
fn default_headers(token: &str) -> anyhow::Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    let auth = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
        .context("Invalid Bitbucket authorization header")?;
    headers.insert(AUTHORIZATION, auth);
    Ok(headers)
}

/// Check the status of a response and read its body
async fn read_body(
    url: String,
    response: reqwest::Result<reqwest::Response>,
    expected: StatusCode,
) -> Result<String, ApiError> {
    let response = match response {
        Ok(response) => response,
        Err(source) => return Err(ApiError::Transport { url, source }),
    };
    let status = response.status();
    let body = match response.text().await {
        Ok(body) => body,
        Err(source) => return Err(ApiError::Transport { url, source }),
    };
    check_status(url, status, expected, body)
}

fn check_status(
    url: String,
    status: StatusCode,
    expected: StatusCode,
    body: String,
) -> Result<String, ApiError> {
    if status == expected {
        Ok(body)
    } else {
        Err(ApiError::UnexpectedStatus {
            url,
            status: status.as_u16(),
            expected: expected.as_u16(),
            body,
        })
    }
}

fn parse_body<T: DeserializeOwned>(url: String, body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|source| ApiError::ResponseShape { url, source })
}

#[async_trait]
impl BitbucketClient for ReqwestClient {
    async fn fetch_diff(&self, endpoints: &PullRequestEndpoints) -> anyhow::Result<DiffPage> {
        let page: DiffPage = self.get_json(endpoints.diff()).await?;
        debug!("Fetched diff with {} files", page.diffs.len());
        Ok(page)
    }

    async fn fetch_activities(
        &self,
        endpoints: &PullRequestEndpoints,
        start: u32,
        limit: u32,
    ) -> anyhow::Result<ActivityPage> {
        let page: ActivityPage = self.get_json(endpoints.activities(start, limit)).await?;
        debug!(
            "Fetched {} activities starting at {} (last page: {})",
            page.values.len(),
            start,
            page.is_last_page
        );
        Ok(page)
    }

    async fn post_comment(
        &self,
        endpoints: &PullRequestEndpoints,
        comment: &CreateComment,
    ) -> anyhow::Result<u64> {
        let url = endpoints.comments();
        let body = self
            .send_json(Method::POST, url.clone(), comment, StatusCode::CREATED)
            .await?;
        debug!("{}", body);

        let created: Comment = parse_body(url, &body)?;
        Ok(created.id)
    }

    async fn delete_comment(
        &self,
        endpoints: &PullRequestEndpoints,
        comment_id: u64,
        version: u32,
    ) -> anyhow::Result<()> {
        self.delete(endpoints.comment(comment_id, version)).await?;
        debug!("Comment {} version {} deleted", comment_id, version);
        Ok(())
    }

    async fn server_properties(&self, base_url: &str) -> anyhow::Result<ServerProperties> {
        Ok(self.get_json(application_properties(base_url)).await?)
    }

    async fn create_report(
        &self,
        endpoints: &InsightsEndpoints,
        report: &CreateReport,
    ) -> anyhow::Result<()> {
        self.send_json(Method::PUT, endpoints.report(), report, StatusCode::OK)
            .await?;
        Ok(())
    }

    async fn post_annotations(
        &self,
        endpoints: &InsightsEndpoints,
        annotations: &CreateAnnotations,
    ) -> anyhow::Result<()> {
        self.send_json(
            Method::POST,
            endpoints.annotations(),
            annotations,
            StatusCode::NO_CONTENT,
        )
        .await?;
        Ok(())
    }

    async fn delete_annotations(&self, endpoints: &InsightsEndpoints) -> anyhow::Result<()> {
        Ok(self.delete(endpoints.annotations()).await?)
    }
}

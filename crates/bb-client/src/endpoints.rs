//! Pull request endpoint URLs
//!
//! Bitbucket Server addresses a repository either through its project
//! (`projects/{key}/repos/...`) or through a personal user space
//! (`users/{slug}/repos/...`). Both families share the same sub-resources.
//!
//! Code Insights reports are attached to commits and always live under
//! `projects/`; a personal repository of `jdoe` is addressed as project `~jdoe`.

/// Prefix of the core REST API
pub const REST_API: &str = "/rest/api/1.0/";

/// Prefix of the Code Insights REST API
pub const INSIGHTS_API: &str = "/rest/insights/1.0/";

/// Owner of the repository a pull request lives in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryOwner {
    /// Personal repository of a user (user slug)
    User(String),
    /// Repository of a project (project key)
    Project(String),
}

impl RepositoryOwner {
    /// Pick the owner from the two mutually exclusive settings
    ///
    /// A non-blank user slug takes precedence over the project key.
    /// Returns `None` if both are blank.
    pub fn from_settings(user_slug: Option<&str>, project_key: Option<&str>) -> Option<Self> {
        let non_blank = |value: Option<&str>| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        non_blank(user_slug)
            .map(RepositoryOwner::User)
            .or_else(|| non_blank(project_key).map(RepositoryOwner::Project))
    }

    fn path_segment(&self) -> String {
        match self {
            RepositoryOwner::User(slug) => format!("users/{}", slug),
            RepositoryOwner::Project(key) => format!("projects/{}", key),
        }
    }

    /// Key of the project that holds the repository
    ///
    /// Personal repositories belong to the `~{slug}` project.
    pub fn project_key(&self) -> String {
        match self {
            RepositoryOwner::User(slug) => format!("~{}", slug),
            RepositoryOwner::Project(key) => key.clone(),
        }
    }
}

/// Application properties (version, build number) of the server
pub fn application_properties(base_url: &str) -> String {
    format!(
        "{}{}application-properties",
        base_url.trim_end_matches('/'),
        REST_API
    )
}

/// URLs of one pull request's resources
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestEndpoints {
    /// `{base}/rest/api/1.0/{owner}/repos/{repo}/pull-requests/{id}/`
    pull_request_url: String,
}

impl PullRequestEndpoints {
    /// Build the endpoints for a pull request
    ///
    /// Trailing slashes on `base_url` are ignored.
    pub fn new(
        base_url: &str,
        owner: &RepositoryOwner,
        repository_slug: &str,
        pull_request_id: &str,
    ) -> Self {
        let pull_request_url = format!(
            "{}{}{}/repos/{}/pull-requests/{}/",
            base_url.trim_end_matches('/'),
            REST_API,
            owner.path_segment(),
            repository_slug,
            pull_request_id
        );
        Self { pull_request_url }
    }

    /// Comments collection (POST target)
    pub fn comments(&self) -> String {
        format!("{}comments", self.pull_request_url)
    }

    /// A single comment at a given version (DELETE target)
    pub fn comment(&self, comment_id: u64, version: u32) -> String {
        format!(
            "{}comments/{}?version={}",
            self.pull_request_url, comment_id, version
        )
    }

    /// Diff of the pull request
    pub fn diff(&self) -> String {
        format!("{}diff", self.pull_request_url)
    }

    /// One page of the activity feed
    pub fn activities(&self, start: u32, limit: u32) -> String {
        format!(
            "{}activities?limit={}&start={}",
            self.pull_request_url, limit, start
        )
    }
}

/// URLs of the Code Insights report the decorator keeps on one commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightsEndpoints {
    /// `{base}/rest/insights/1.0/projects/{key}/repos/{repo}/commits/{sha}/reports/{report}`
    report_url: String,
}

impl InsightsEndpoints {
    pub fn new(
        base_url: &str,
        owner: &RepositoryOwner,
        repository_slug: &str,
        commit: &str,
        report_key: &str,
    ) -> Self {
        let report_url = format!(
            "{}{}projects/{}/repos/{}/commits/{}/reports/{}",
            base_url.trim_end_matches('/'),
            INSIGHTS_API,
            owner.project_key(),
            repository_slug,
            commit,
            report_key
        );
        Self { report_url }
    }

    /// The report itself (PUT target)
    pub fn report(&self) -> String {
        self.report_url.clone()
    }

    /// Annotations of the report (POST and DELETE target)
    pub fn annotations(&self) -> String {
        format!("{}/annotations", self.report_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_owner_from_settings() {
        assert_eq!(
            RepositoryOwner::from_settings(Some("jdoe"), None),
            Some(RepositoryOwner::User("jdoe".to_string()))
        );
        assert_eq!(
            RepositoryOwner::from_settings(Some("  "), Some("PROJ")),
            Some(RepositoryOwner::Project("PROJ".to_string()))
        );
        assert_eq!(
            RepositoryOwner::from_settings(Some("jdoe"), Some("PROJ")),
            Some(RepositoryOwner::User("jdoe".to_string()))
        );
        assert_eq!(RepositoryOwner::from_settings(Some(""), Some(" ")), None);
        assert_eq!(RepositoryOwner::from_settings(None, None), None);
    }

    #[test]
    fn test_project_endpoints() {
        let endpoints = PullRequestEndpoints::new(
            "https://bitbucket.example.com",
            &RepositoryOwner::Project("PROJ".to_string()),
            "repo",
            "7",
        );

        assert_eq!(
            endpoints.comments(),
            "https://bitbucket.example.com/rest/api/1.0/projects/PROJ/repos/repo/pull-requests/7/comments"
        );
        assert_eq!(
            endpoints.diff(),
            "https://bitbucket.example.com/rest/api/1.0/projects/PROJ/repos/repo/pull-requests/7/diff"
        );
        assert_eq!(
            endpoints.activities(0, 250),
            "https://bitbucket.example.com/rest/api/1.0/projects/PROJ/repos/repo/pull-requests/7/activities?limit=250&start=0"
        );
        assert_eq!(
            endpoints.comment(12, 3),
            "https://bitbucket.example.com/rest/api/1.0/projects/PROJ/repos/repo/pull-requests/7/comments/12?version=3"
        );
    }

    #[test]
    fn test_user_endpoints_trim_base_url() {
        let endpoints = PullRequestEndpoints::new(
            "https://bitbucket.example.com/",
            &RepositoryOwner::User("jdoe".to_string()),
            "dotfiles",
            "1",
        );

        assert_eq!(
            endpoints.diff(),
            "https://bitbucket.example.com/rest/api/1.0/users/jdoe/repos/dotfiles/pull-requests/1/diff"
        );
    }

    #[test]
    fn test_application_properties() {
        assert_eq!(
            application_properties("https://bitbucket.example.com/"),
            "https://bitbucket.example.com/rest/api/1.0/application-properties"
        );
    }

    #[test]
    fn test_insights_endpoints() {
        let project = InsightsEndpoints::new(
            "https://bitbucket.example.com",
            &RepositoryOwner::Project("PROJ".to_string()),
            "repo",
            "abc123",
            "bb-pr-decorator",
        );
        assert_eq!(
            project.report(),
            "https://bitbucket.example.com/rest/insights/1.0/projects/PROJ/repos/repo/commits/abc123/reports/bb-pr-decorator"
        );
        assert_eq!(
            project.annotations(),
            "https://bitbucket.example.com/rest/insights/1.0/projects/PROJ/repos/repo/commits/abc123/reports/bb-pr-decorator/annotations"
        );

        let personal = InsightsEndpoints::new(
            "https://bitbucket.example.com",
            &RepositoryOwner::User("jdoe".to_string()),
            "dotfiles",
            "abc123",
            "key",
        );
        assert_eq!(
            personal.report(),
            "https://bitbucket.example.com/rest/insights/1.0/projects/~jdoe/repos/dotfiles/commits/abc123/reports/key"
        );
    }
}

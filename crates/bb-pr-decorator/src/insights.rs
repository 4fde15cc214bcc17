//! Code Insights report on the analysed commit.
//!
//! The decorator owns one report per commit, stored under the configured
//! report key. Publishing replaces the report, clears its annotations and
//! sends one annotation per open issue.

use bb_client::{
    Annotation, AnnotationSeverity, AnnotationType, BitbucketClient, CreateAnnotations,
    CreateReport, InsightsEndpoints, ReportData, ReportResult, ReportValue,
};
use log::{debug, warn};

use crate::analysis::{AnalysisIssue, AnalysisResults};
use crate::policy;

/// Title of the report
pub const REPORT_TITLE: &str = "Static analysis";

/// Reporter shown on the report
pub const REPORTER: &str = "bb-pr-decorator";

/// Longest annotation message the server accepts
pub const MAX_MESSAGE_CHARS: usize = 2000;

/// Most annotations the server keeps per report
pub const MAX_ANNOTATIONS: usize = 1000;

/// Report for `analysis`, carrying the number of open issues
pub fn build_report(analysis: &AnalysisResults, open_issues: usize) -> CreateReport {
    CreateReport {
        title: REPORT_TITLE.to_string(),
        details: Some(analysis.summary.clone()),
        result: analysis.quality_gate_passed.map(|passed| {
            if passed {
                ReportResult::Pass
            } else {
                ReportResult::Fail
            }
        }),
        reporter: Some(REPORTER.to_string()),
        link: None,
        data: vec![ReportData {
            title: "Open issues".to_string(),
            value: ReportValue::Number(open_issues as i64),
        }],
    }
}

/// One annotation per issue, in report order
///
/// Messages are cut to [`MAX_MESSAGE_CHARS`] and issues past
/// [`MAX_ANNOTATIONS`] are dropped.
pub fn build_annotations(issues: &[&AnalysisIssue]) -> CreateAnnotations {
    if issues.len() > MAX_ANNOTATIONS {
        warn!(
            "{} open issues but a report keeps at most {} annotations",
            issues.len(),
            MAX_ANNOTATIONS
        );
    }

    let annotations = issues
        .iter()
        .take(MAX_ANNOTATIONS)
        .map(|issue| annotation(issue))
        .collect();
    CreateAnnotations { annotations }
}

fn annotation(issue: &AnalysisIssue) -> Annotation {
    let path = issue.path.clone().filter(|p| !p.is_empty());
    let line = issue.line.filter(|l| *l > 0 && path.is_some());

    Annotation {
        path,
        line,
        message: issue.text.chars().take(MAX_MESSAGE_CHARS).collect(),
        severity: annotation_severity(issue.severity.as_deref()),
        kind: annotation_type(issue.kind.as_deref()),
        link: None,
    }
}

/// Map an analysis severity onto the three annotation levels
pub fn annotation_severity(severity: Option<&str>) -> AnnotationSeverity {
    match severity.map(str::to_uppercase).as_deref() {
        Some("BLOCKER" | "CRITICAL" | "HIGH") => AnnotationSeverity::High,
        Some("MAJOR" | "MEDIUM") => AnnotationSeverity::Medium,
        _ => AnnotationSeverity::Low,
    }
}

/// Map an analysis issue type onto an annotation type
pub fn annotation_type(kind: Option<&str>) -> Option<AnnotationType> {
    match kind?.to_uppercase().as_str() {
        "BUG" => Some(AnnotationType::Bug),
        "VULNERABILITY" | "SECURITY_HOTSPOT" => Some(AnnotationType::Vulnerability),
        "CODE_SMELL" => Some(AnnotationType::CodeSmell),
        _ => None,
    }
}

/// Publishes the report of one commit
pub struct InsightsPublisher<'a, C: BitbucketClient + ?Sized> {
    client: &'a C,
    endpoints: &'a InsightsEndpoints,
}

impl<'a, C: BitbucketClient + ?Sized> InsightsPublisher<'a, C> {
    pub fn new(client: &'a C, endpoints: &'a InsightsEndpoints) -> Self {
        Self { client, endpoints }
    }

    /// Replace the report and its annotations
    ///
    /// Every request is fatal.
    ///
    /// # Returns
    ///
    /// The number of annotations sent.
    pub async fn publish(
        &self,
        report: &CreateReport,
        annotations: &CreateAnnotations,
    ) -> anyhow::Result<usize> {
        debug!("Code Insights report URL is: {}", self.endpoints.report());

        policy::fatal(
            "create Code Insights report",
            self.client.create_report(self.endpoints, report).await,
        )?;
        policy::fatal(
            "delete Code Insights annotations",
            self.client.delete_annotations(self.endpoints).await,
        )?;
        policy::fatal(
            "create Code Insights annotations",
            self.client
                .create_annotations(self.endpoints, annotations)
                .await,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn issue(path: Option<&str>, line: Option<u32>, severity: Option<&str>) -> AnalysisIssue {
        AnalysisIssue {
            path: path.map(str::to_string),
            line,
            status: "OPEN".to_string(),
            text: "Remove this".to_string(),
            severity: severity.map(str::to_string),
            kind: Some("CODE_SMELL".to_string()),
        }
    }

    #[test]
    fn test_severity_mapping() {
        assert_eq!(annotation_severity(Some("BLOCKER")), AnnotationSeverity::High);
        assert_eq!(annotation_severity(Some("critical")), AnnotationSeverity::High);
        assert_eq!(annotation_severity(Some("MAJOR")), AnnotationSeverity::Medium);
        assert_eq!(annotation_severity(Some("MINOR")), AnnotationSeverity::Low);
        assert_eq!(annotation_severity(Some("INFO")), AnnotationSeverity::Low);
        assert_eq!(annotation_severity(None), AnnotationSeverity::Low);
    }

    #[test]
    fn test_type_mapping() {
        assert_eq!(annotation_type(Some("BUG")), Some(AnnotationType::Bug));
        assert_eq!(
            annotation_type(Some("SECURITY_HOTSPOT")),
            Some(AnnotationType::Vulnerability)
        );
        assert_eq!(
            annotation_type(Some("code_smell")),
            Some(AnnotationType::CodeSmell)
        );
        assert_eq!(annotation_type(Some("OTHER")), None);
        assert_eq!(annotation_type(None), None);
    }

    #[test]
    fn test_annotation_placement() {
        let line = issue(Some("src/App.java"), Some(42), Some("MAJOR"));
        let file = issue(Some("pom.xml"), Some(0), None);
        let project = issue(None, Some(7), Some("BLOCKER"));

        let annotations = build_annotations(&[&line, &file, &project]).annotations;

        assert_eq!(
            annotations[0],
            Annotation {
                path: Some("src/App.java".to_string()),
                line: Some(42),
                message: "Remove this".to_string(),
                severity: AnnotationSeverity::Medium,
                kind: Some(AnnotationType::CodeSmell),
                link: None,
            }
        );
        assert_eq!(annotations[1].path.as_deref(), Some("pom.xml"));
        assert_eq!(annotations[1].line, None);
        assert_eq!(annotations[2].path, None);
        assert_eq!(annotations[2].line, None);
        assert_eq!(annotations[2].severity, AnnotationSeverity::High);
    }

    #[test]
    fn test_long_messages_and_many_issues_are_cut() {
        let mut long = issue(Some("a.rs"), Some(1), None);
        long.text = "x".repeat(MAX_MESSAGE_CHARS + 10);
        let issues: Vec<&AnalysisIssue> = std::iter::repeat(&long)
            .take(MAX_ANNOTATIONS + 5)
            .collect();

        let annotations = build_annotations(&issues).annotations;

        assert_eq!(annotations.len(), MAX_ANNOTATIONS);
        assert_eq!(annotations[0].message.chars().count(), MAX_MESSAGE_CHARS);
    }

    #[test]
    fn test_report_verdict() {
        let mut analysis = AnalysisResults {
            pull_request_id: "1".to_string(),
            summary: "Quality Gate failed".to_string(),
            issues: vec![],
            commit: Some("abc123".to_string()),
            quality_gate_passed: Some(false),
        };

        let report = build_report(&analysis, 3);
        assert_eq!(report.result, Some(ReportResult::Fail));
        assert_eq!(report.details.as_deref(), Some("Quality Gate failed"));
        assert_eq!(
            report.data,
            vec![ReportData {
                title: "Open issues".to_string(),
                value: ReportValue::Number(3),
            }]
        );

        analysis.quality_gate_passed = None;
        assert_eq!(build_report(&analysis, 0).result, None);
    }
}

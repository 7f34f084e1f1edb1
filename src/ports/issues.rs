//! Issue tracker port and the read-only issue projection.
//!
//! The tracker client is an explicit facade: construction performs the
//! authentication bootstrap, and the only operation exposed is issue search.
//! Nothing is forwarded dynamically to the underlying API.

use serde::Deserialize;
use serde_json::Value;

use crate::error::Result;

/// Custom field id holding story points.
pub const STORY_POINTS_FIELD: &str = "customfield_10003";
/// Custom field id holding the reviewers list.
pub const REVIEWERS_FIELD: &str = "customfield_11400";
/// Custom field id holding the review texts.
pub const REVIEWS_FIELD: &str = "customfield_11402";

/// Page size used by bulk search, the tracker's hard per-call maximum.
pub const BULK_PAGE_SIZE: u64 = 1000;

/// Issue type descriptor (name plus icon).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssueType {
    /// Type name, e.g. "Story" or "Bug".
    pub name: String,
    /// URL of the type's inline icon image.
    #[serde(rename = "iconUrl", default)]
    pub icon_url: String,
}

/// Workflow status category, e.g. "Done" or "To Do".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusCategory {
    /// Category name.
    pub name: String,
}

/// Workflow status of an issue.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Status {
    /// Status name, e.g. "In Review".
    pub name: String,
    /// The status's category.
    #[serde(rename = "statusCategory", default)]
    pub category: StatusCategory,
}

/// Resolution of an issue, absent while unresolved.
#[derive(Debug, Clone, Deserialize)]
pub struct Resolution {
    /// Resolution name, e.g. "Fixed".
    pub name: String,
}

/// A user reference as the tracker reports it in custom fields.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedUser {
    /// Full display name.
    #[serde(rename = "displayName")]
    pub display_name: String,
    /// Account identifier.
    pub name: String,
}

/// A select-list option value in a custom field.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldOption {
    /// The option's text value.
    pub value: String,
}

/// The projection of tracker fields this system reads. Never written back.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssueFields {
    /// Issue type, when requested in the field list.
    #[serde(default)]
    pub issuetype: Option<IssueType>,
    /// One-line summary.
    #[serde(default)]
    pub summary: Option<String>,
    /// Workflow status.
    #[serde(default)]
    pub status: Option<Status>,
    /// Resolution; `None` while the issue is unresolved.
    #[serde(default)]
    pub resolution: Option<Resolution>,
    /// Story point estimate.
    #[serde(rename = "customfield_10003", default)]
    pub story_points: Option<f64>,
    /// Original time estimate in seconds.
    #[serde(rename = "timeoriginalestimate", default)]
    pub original_estimate: Option<i64>,
    /// Reviewer users.
    #[serde(rename = "customfield_11400", default)]
    pub reviewers: Option<Vec<NamedUser>>,
    /// Review text values.
    #[serde(rename = "customfield_11402", default)]
    pub reviews: Option<Vec<FieldOption>>,
    /// Remaining fields, kept raw; department sizing reads these by id.
    #[serde(flatten)]
    pub custom: serde_json::Map<String, Value>,
}

/// One issue as returned by search. Read-only projection.
#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    /// Issue key, e.g. "GEAR-1401".
    pub key: String,
    /// Requested fields.
    #[serde(default)]
    pub fields: IssueFields,
}

/// Parameters for one search call.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Query string in the tracker's query language.
    pub jql: String,
    /// Zero-based offset of the first result to return.
    pub start_at: u64,
    /// Maximum number of results for this call.
    pub max_results: u64,
    /// Comma-separated field list to fetch.
    pub fields: String,
    /// Comma-separated expansion list.
    pub expand: String,
    /// Ask the tracker to validate the query string.
    pub validate_query: bool,
}

impl SearchRequest {
    /// A full-page request for `jql` starting at `start_at`.
    #[must_use]
    pub fn page(jql: &str, fields: &str, expand: &str, start_at: u64) -> Self {
        Self {
            jql: jql.to_owned(),
            start_at,
            max_results: BULK_PAGE_SIZE,
            fields: fields.to_owned(),
            expand: expand.to_owned(),
            validate_query: true,
        }
    }
}

/// One page of search results.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchPage {
    /// Total matches for the query, across all pages.
    pub total: u64,
    /// The issues in this page, in query order.
    pub issues: Vec<Issue>,
}

/// Issue search against the tracker.
pub trait IssueTracker {
    /// Runs one bounded search call.
    ///
    /// # Errors
    ///
    /// [`crate::error::Error::Authentication`] on signature rejection,
    /// [`crate::error::Error::RemoteService`] on any other failure response.
    fn search_issues(&self, request: &SearchRequest) -> Result<SearchPage>;

    /// Fetches every match for `jql`, paging past the tracker's per-call
    /// cap. Issues `ceil(total / 1000)` requests (exactly one when the
    /// result fits in a single page) and returns all matches in order.
    ///
    /// # Errors
    ///
    /// Fails on the first failing page request.
    fn search_issues_all(&self, jql: &str, fields: &str, expand: &str) -> Result<Vec<Issue>> {
        let first = self.search_issues(&SearchRequest::page(jql, fields, expand, 0))?;
        let total = first.total;
        let mut issues = first.issues;
        while (issues.len() as u64) < total {
            let page = self.search_issues(&SearchRequest::page(
                jql,
                fields,
                expand,
                issues.len() as u64,
            ))?;
            if page.issues.is_empty() {
                // Total shrank under our feet; stop rather than loop forever.
                break;
            }
            issues.extend(page.issues);
        }
        Ok(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Fake tracker that serves a fixed corpus and counts requests.
    struct PagingTracker {
        corpus: Vec<Issue>,
        calls: RefCell<u64>,
    }

    impl PagingTracker {
        fn with_issues(n: u64) -> Self {
            let corpus = (0..n)
                .map(|i| Issue { key: format!("GEAR-{i}"), fields: IssueFields::default() })
                .collect();
            Self { corpus, calls: RefCell::new(0) }
        }
    }

    impl IssueTracker for PagingTracker {
        fn search_issues(&self, request: &SearchRequest) -> Result<SearchPage> {
            *self.calls.borrow_mut() += 1;
            let start = usize::try_from(request.start_at).unwrap();
            let end = (start + usize::try_from(request.max_results).unwrap())
                .min(self.corpus.len());
            Ok(SearchPage {
                total: self.corpus.len() as u64,
                issues: self.corpus[start.min(self.corpus.len())..end].to_vec(),
            })
        }
    }

    #[test]
    fn bulk_search_uses_one_request_when_under_the_cap() {
        let tracker = PagingTracker::with_issues(1000);
        let issues = tracker.search_issues_all("project=GEAR", "key", "").unwrap();
        assert_eq!(issues.len(), 1000);
        assert_eq!(*tracker.calls.borrow(), 1);
    }

    #[test]
    fn bulk_search_pages_in_order_without_gaps() {
        let tracker = PagingTracker::with_issues(2500);
        let issues = tracker.search_issues_all("project=GEAR", "key", "").unwrap();
        assert_eq!(*tracker.calls.borrow(), 3);
        assert_eq!(issues.len(), 2500);
        for (i, issue) in issues.iter().enumerate() {
            assert_eq!(issue.key, format!("GEAR-{i}"));
        }
    }

    #[test]
    fn bulk_search_on_empty_result_is_a_single_request() {
        let tracker = PagingTracker::with_issues(0);
        let issues = tracker.search_issues_all("project=GEAR", "key", "").unwrap();
        assert!(issues.is_empty());
        assert_eq!(*tracker.calls.borrow(), 1);
    }

    #[test]
    fn issue_projection_deserializes_tracker_shape() {
        let issue: Issue = serde_json::from_value(serde_json::json!({
            "key": "GEAR-7",
            "fields": {
                "issuetype": {"name": "Story", "iconUrl": "https://tracker/icons/story.svg"},
                "summary": "Gain scheduling",
                "status": {"name": "In Review", "statusCategory": {"name": "In Progress"}},
                "resolution": null,
                "customfield_10003": 5.0,
                "customfield_11400": [{"displayName": "Ada Lovelace", "name": "alovelace"}],
                "customfield_12003": 3.5
            }
        }))
        .unwrap();
        assert_eq!(issue.fields.issuetype.as_ref().unwrap().name, "Story");
        assert!(issue.fields.resolution.is_none());
        assert_eq!(issue.fields.story_points, Some(5.0));
        assert_eq!(issue.fields.custom["customfield_12003"], 3.5);
    }
}

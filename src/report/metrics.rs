//! Aggregations over issue lists: story points, estimates, and per-
//! department sizing sums.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::ports::issues::Issue;

/// Sums the story point field over all issues. Issues without a numeric
/// story point value are skipped.
#[must_use]
pub fn sum_story_points(issues: &[Issue]) -> f64 {
    issues.iter().filter_map(|issue| issue.fields.story_points).sum()
}

/// Sums story points, ignoring epics (their points roll up from children).
#[must_use]
pub fn sum_story_points_excluding_epics(issues: &[Issue]) -> f64 {
    issues
        .iter()
        .filter(|issue| {
            issue.fields.issuetype.as_ref().map_or(true, |t| t.name != "Epic")
        })
        .filter_map(|issue| issue.fields.story_points)
        .sum()
}

/// Sums the original time estimate (seconds) over all issues.
#[must_use]
pub fn sum_original_estimate(issues: &[Issue]) -> f64 {
    issues
        .iter()
        .filter_map(|issue| issue.fields.original_estimate)
        .map(|seconds| seconds as f64)
        .sum()
}

/// Departments with a sizing custom field on sized issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Department {
    /// Acoustics and electronics, both feature fields.
    Aes,
    /// Acoustics audio features only.
    AesAudFeature,
    /// Acoustics connectivity features only.
    AesConnFeature,
    /// Hardware.
    Hw,
    /// System test.
    Set,
    /// System integration and verification.
    Siv,
    /// Software.
    Sws,
    /// IT.
    It,
    /// Systems engineering.
    Se,
    /// Sum over every department's sizing field.
    Total,
}

impl Department {
    /// Parses a department key (case-insensitive). `total` and `hig` both
    /// name the all-departments sum.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InputValidation`] for an unknown key.
    pub fn parse(key: &str) -> Result<Self> {
        match key.to_lowercase().as_str() {
            "aes" => Ok(Self::Aes),
            "aes aud feature" => Ok(Self::AesAudFeature),
            "aes conn feature" => Ok(Self::AesConnFeature),
            "hw" => Ok(Self::Hw),
            "set" => Ok(Self::Set),
            "siv" => Ok(Self::Siv),
            "sws" => Ok(Self::Sws),
            "it" => Ok(Self::It),
            "se" => Ok(Self::Se),
            "total" | "hig" => Ok(Self::Total),
            other => Err(Error::InputValidation(format!("department '{other}' not found"))),
        }
    }

    /// The sizing custom field ids this department sums over.
    #[must_use]
    pub fn sizing_fields(self) -> &'static [&'static str] {
        match self {
            Self::Aes => &["customfield_12307", "customfield_12002"],
            Self::AesAudFeature => &["customfield_12002"],
            Self::AesConnFeature => &["customfield_12307"],
            Self::Hw => &["customfield_12304"],
            Self::Set => &["customfield_12502"],
            Self::Siv => &["customfield_12302"],
            Self::Sws => &["customfield_12003"],
            Self::It => &["customfield_13700"],
            Self::Se => &["customfield_12303"],
            Self::Total => &[
                "customfield_13700",
                "customfield_12307",
                "customfield_12002",
                "customfield_12304",
                "customfield_12502",
                "customfield_12302",
                "customfield_12003",
            ],
        }
    }
}

/// Sums a department's sizing fields over all issues. Returns NaN when no
/// issue carries a numeric value, so callers can distinguish "nothing
/// sized" from a genuine zero.
#[must_use]
pub fn sizing(issues: &[Issue], department: Department) -> f64 {
    let mut values = Vec::new();
    for issue in issues {
        for field in department.sizing_fields() {
            if let Some(value) = issue.fields.custom.get(*field).and_then(Value::as_f64) {
                values.push(value);
            }
        }
    }
    if values.is_empty() {
        f64::NAN
    } else {
        values.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::issues::{IssueFields, IssueType};
    use serde_json::json;

    fn issue_with_points(key: &str, points: Option<f64>, type_name: &str) -> Issue {
        Issue {
            key: key.to_owned(),
            fields: IssueFields {
                issuetype: Some(IssueType { name: type_name.into(), icon_url: String::new() }),
                story_points: points,
                ..IssueFields::default()
            },
        }
    }

    #[test]
    fn story_points_sum_skips_unestimated_issues() {
        let issues = vec![
            issue_with_points("GEAR-1", Some(3.0), "Story"),
            issue_with_points("GEAR-2", None, "Story"),
            issue_with_points("GEAR-3", Some(5.0), "Story"),
        ];
        assert!((sum_story_points(&issues) - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn epic_points_are_excluded_from_the_epic_free_sum() {
        let issues = vec![
            issue_with_points("GEAR-1", Some(3.0), "Story"),
            issue_with_points("GEAR-2", Some(40.0), "Epic"),
        ];
        assert!((sum_story_points_excluding_epics(&issues) - 3.0).abs() < f64::EPSILON);
        assert!((sum_story_points(&issues) - 43.0).abs() < f64::EPSILON);
    }

    #[test]
    fn original_estimate_sums_seconds() {
        let mut first = issue_with_points("GEAR-1", None, "Story");
        first.fields.original_estimate = Some(3600);
        let mut second = issue_with_points("GEAR-2", None, "Story");
        second.fields.original_estimate = Some(1800);
        assert!((sum_original_estimate(&[first, second]) - 5400.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_department_is_an_input_error() {
        assert!(matches!(Department::parse("marketing"), Err(Error::InputValidation(_))));
        assert_eq!(Department::parse("HIG").unwrap(), Department::Total);
    }

    #[test]
    fn sizing_sums_department_fields_and_nans_when_empty() {
        let mut sized = issue_with_points("GEAR-1", None, "Story");
        sized.fields.custom.insert("customfield_12003".into(), json!(2.5));
        let mut also_sized = issue_with_points("GEAR-2", None, "Story");
        also_sized.fields.custom.insert("customfield_12003".into(), json!(1.5));
        let issues = vec![sized, also_sized];

        assert!((sizing(&issues, Department::Sws) - 4.0).abs() < f64::EPSILON);
        assert!(sizing(&issues, Department::Hw).is_nan());
    }

    #[test]
    fn total_sizing_spans_departments() {
        let mut issue = issue_with_points("GEAR-1", None, "Story");
        issue.fields.custom.insert("customfield_12003".into(), json!(2.0));
        issue.fields.custom.insert("customfield_12304".into(), json!(3.0));
        assert!((sizing(&[issue], Department::Total) - 5.0).abs() < f64::EPSILON);
    }
}

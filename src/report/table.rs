//! Storage-format table rendering.
//!
//! Issue tables dispatch each requested field through a renderer registry;
//! unknown fields fall back to a placeholder cell and a warning so a typo in
//! a field list never aborts a report.

use std::collections::HashMap;

use serde_json::Value;
use tracing::warn;

use crate::error::{Error, Result};
use crate::ports::issues::{Issue, REVIEWERS_FIELD, REVIEWS_FIELD};

/// Renders one issue's cell for one field, returning inner cell markup.
pub type FieldRenderer = fn(browse_base: &str, issue: &Issue) -> String;

/// Escapes text for inclusion in storage-format markup.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn issue_link(browse_base: &str, key: &str, text: &str) -> String {
    format!("<a href=\"{}/{}\">{}</a>", browse_base, escape(key), escape(text))
}

fn render_type(browse_base: &str, issue: &Issue) -> String {
    let Some(issue_type) = issue.fields.issuetype.as_ref() else {
        return String::new();
    };
    format!(
        "<a href=\"{}/{}\"><ac:image ac:class=\"icon\" ac:alt=\"{}\"><ri:url ri:value=\"{}\"/></ac:image></a>",
        browse_base,
        escape(&issue.key),
        escape(&issue_type.name),
        escape(&issue_type.icon_url),
    )
}

fn render_key(browse_base: &str, issue: &Issue) -> String {
    issue_link(browse_base, &issue.key, &issue.key)
}

fn render_summary(browse_base: &str, issue: &Issue) -> String {
    let summary = issue.fields.summary.as_deref().unwrap_or_default();
    issue_link(browse_base, &issue.key, summary)
}

fn render_status(_browse_base: &str, issue: &Issue) -> String {
    let Some(status) = issue.fields.status.as_ref() else {
        return String::new();
    };
    let lozenge_class = match status.category.name.as_str() {
        "Done" => "aui-lozenge-success",
        "To Do" => "aui-lozenge-current",
        _ => "aui-lozenge-complete",
    };
    format!(
        "<span class=\"aui-lozenge aui-lozenge-subtle {lozenge_class}\">{}</span>",
        escape(&status.name.to_uppercase()),
    )
}

fn render_resolution(_browse_base: &str, issue: &Issue) -> String {
    match issue.fields.resolution.as_ref() {
        Some(resolution) => escape(&resolution.name),
        None => "unresolved".to_owned(),
    }
}

fn render_reviews(_browse_base: &str, issue: &Issue) -> String {
    issue
        .fields
        .reviews
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|review| escape(&review.value))
        .collect::<Vec<_>>()
        .join("<br/>")
}

fn render_reviewers(_browse_base: &str, issue: &Issue) -> String {
    issue
        .fields
        .reviewers
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|user| escape(&format!("{} ({})", user.display_name, user.name)))
        .collect::<Vec<_>>()
        .join("<br/>")
}

/// Maps field ids to cell renderers.
///
/// The default registry covers the fields the standard reports use;
/// [`FieldRegistry::register`] is the extension point for additional
/// renderers. An unregistered field renders a placeholder cell and logs a
/// warning.
pub struct FieldRegistry {
    renderers: HashMap<String, FieldRenderer>,
}

impl Default for FieldRegistry {
    fn default() -> Self {
        let mut registry = Self { renderers: HashMap::new() };
        registry.register("type", render_type);
        registry.register("key", render_key);
        registry.register("summary", render_summary);
        registry.register("status", render_status);
        registry.register("resolution", render_resolution);
        registry.register(REVIEWS_FIELD, render_reviews);
        registry.register(REVIEWERS_FIELD, render_reviewers);
        registry
    }
}

impl FieldRegistry {
    /// Registers (or replaces) the renderer for a field id.
    pub fn register(&mut self, field: &str, renderer: FieldRenderer) {
        self.renderers.insert(field.to_owned(), renderer);
    }

    fn render(&self, field: &str, browse_base: &str, issue: &Issue) -> String {
        if let Some(renderer) = self.renderers.get(field) {
            renderer(browse_base, issue)
        } else {
            warn!(field, "no renderer registered for field, emitting placeholder");
            "Unknown field type".to_owned()
        }
    }
}

/// Renders issue lists into storage-format tables.
pub struct IssueTableRenderer {
    browse_base: String,
    registry: FieldRegistry,
}

impl IssueTableRenderer {
    /// Creates a renderer linking issues under `browse_base`
    /// (e.g. `https://tracker.example.com/browse`).
    #[must_use]
    pub fn new(browse_base: &str) -> Self {
        Self {
            browse_base: browse_base.trim_end_matches('/').to_owned(),
            registry: FieldRegistry::default(),
        }
    }

    /// Registers an additional field renderer.
    pub fn register(&mut self, field: &str, renderer: FieldRenderer) {
        self.registry.register(field, renderer);
    }

    /// Renders one table: a header row from `titles`, then one row per
    /// issue with one cell per field. `fields` and `titles` are
    /// comma-separated and must have the same length.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InputValidation`] when the lists differ in length,
    /// before anything is rendered.
    pub fn render(&self, issues: &[Issue], fields: &str, titles: &str) -> Result<String> {
        let field_list: Vec<&str> = fields.split(',').collect();
        let title_list: Vec<&str> = titles.split(',').collect();
        if field_list.len() != title_list.len() {
            return Err(Error::InputValidation(format!(
                "field and title lists are not of equal length ({} vs {})",
                field_list.len(),
                title_list.len(),
            )));
        }

        let mut table = String::from("<table><colgroup>");
        for _ in &title_list {
            table.push_str("<col/>");
        }
        table.push_str("</colgroup><tbody><tr>");
        for title in &title_list {
            table.push_str(&format!(
                "<th style=\"text-align: left;\"><span class=\"jim-table-header-content\">{}</span></th>",
                escape(title),
            ));
        }
        table.push_str("</tr>");

        for issue in issues {
            table.push_str("<tr>");
            for field in &field_list {
                table.push_str("<td>");
                table.push_str(&self.registry.render(field, &self.browse_base, issue));
                table.push_str("</td>");
            }
            table.push_str("</tr>");
        }
        table.push_str("</tbody></table>");
        Ok(table)
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Renders a nested sequence as a storage-format table.
///
/// The first row is the header; the remaining rows are emitted most-recent
/// first (callers append chronologically), with the first column of each
/// data row styled as a row header.
///
/// # Errors
///
/// Returns [`Error::InputValidation`] when `rows` has no header row.
pub fn render_nested_table(rows: &[Vec<Value>]) -> Result<String> {
    let Some(header) = rows.first() else {
        return Err(Error::InputValidation("nested list needs a header row".into()));
    };

    let mut table = String::from("<table><colgroup>");
    for _ in header {
        table.push_str("<col/>");
    }
    table.push_str("</colgroup><tbody><tr>");
    for cell in header {
        table.push_str(&format!(
            "<th style=\"text-align: left;\"><span class=\"jim-table-header-content\">{}</span></th>",
            escape(&cell_text(cell)),
        ));
    }
    table.push_str("</tr>");

    for row in rows[1..].iter().rev() {
        table.push_str("<tr>");
        for (column, cell) in row.iter().enumerate() {
            let text = escape(&cell_text(cell));
            if column == 0 {
                table.push_str(&format!("<th>{text}</th>"));
            } else {
                table.push_str(&format!("<td>{text}</td>"));
            }
        }
        table.push_str("</tr>");
    }
    table.push_str("</tbody></table>");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::issues::{
        FieldOption, IssueFields, IssueType, NamedUser, Resolution, Status, StatusCategory,
    };
    use serde_json::json;

    fn issue(key: &str) -> Issue {
        Issue {
            key: key.to_owned(),
            fields: IssueFields {
                issuetype: Some(IssueType {
                    name: "Story".into(),
                    icon_url: "https://tracker/icons/story.svg".into(),
                }),
                summary: Some("Gain scheduling".into()),
                status: Some(Status {
                    name: "In Review".into(),
                    category: StatusCategory { name: "In Progress".into() },
                }),
                resolution: None,
                ..IssueFields::default()
            },
        }
    }

    fn renderer() -> IssueTableRenderer {
        IssueTableRenderer::new("https://tracker.example.com/browse")
    }

    #[test]
    fn table_has_title_columns_and_issue_plus_header_rows() {
        let issues = vec![issue("GEAR-1"), issue("GEAR-2"), issue("GEAR-3")];
        let table = renderer().render(&issues, "key,summary,status", "Key,Summary,Status").unwrap();
        assert_eq!(table.matches("<th style=").count(), 3);
        assert_eq!(table.matches("<col/>").count(), 3);
        assert_eq!(table.matches("<tr>").count(), 4);
    }

    #[test]
    fn mismatched_field_and_title_lists_fail_fast() {
        let result = renderer().render(&[], "key,summary", "Key");
        assert!(matches!(result, Err(Error::InputValidation(_))));
    }

    #[test]
    fn status_lozenge_class_follows_the_category() {
        let mut done = issue("GEAR-1");
        done.fields.status = Some(Status {
            name: "Closed".into(),
            category: StatusCategory { name: "Done".into() },
        });
        assert!(render_status("", &done).contains("aui-lozenge-success"));
        assert!(render_status("", &done).contains(">CLOSED<"));

        let mut todo = issue("GEAR-2");
        todo.fields.status = Some(Status {
            name: "Open".into(),
            category: StatusCategory { name: "To Do".into() },
        });
        assert!(render_status("", &todo).contains("aui-lozenge-current"));

        let in_progress = issue("GEAR-3");
        assert!(render_status("", &in_progress).contains("aui-lozenge-complete"));
        assert!(render_status("", &in_progress).contains(">IN REVIEW<"));
    }

    #[test]
    fn resolution_renders_unresolved_only_when_absent() {
        let open = issue("GEAR-1");
        assert_eq!(render_resolution("", &open), "unresolved");

        let mut fixed = issue("GEAR-2");
        fixed.fields.resolution = Some(Resolution { name: "Fixed".into() });
        assert_eq!(render_resolution("", &fixed), "Fixed");
    }

    #[test]
    fn type_cell_links_the_issue_and_embeds_the_icon() {
        let cell = render_type("https://tracker.example.com/browse", &issue("GEAR-9"));
        assert!(cell.contains("href=\"https://tracker.example.com/browse/GEAR-9\""));
        assert!(cell.contains("ac:class=\"icon\""));
        assert!(cell.contains("ri:value=\"https://tracker/icons/story.svg\""));
    }

    #[test]
    fn reviewers_render_display_name_with_identifier() {
        let mut reviewed = issue("GEAR-4");
        reviewed.fields.reviewers = Some(vec![
            NamedUser { display_name: "Ada Lovelace".into(), name: "alovelace".into() },
            NamedUser { display_name: "Alan Turing".into(), name: "aturing".into() },
        ]);
        reviewed.fields.reviews =
            Some(vec![FieldOption { value: "Design".into() }, FieldOption { value: "Code".into() }]);
        assert_eq!(
            render_reviewers("", &reviewed),
            "Ada Lovelace (alovelace)<br/>Alan Turing (aturing)"
        );
        assert_eq!(render_reviews("", &reviewed), "Design<br/>Code");
    }

    #[test]
    fn unknown_field_renders_placeholder_cell() {
        let table = renderer().render(&[issue("GEAR-1")], "nonsense", "Nonsense").unwrap();
        assert!(table.contains("<td>Unknown field type</td>"));
    }

    #[test]
    fn summary_text_is_escaped() {
        let mut tricky = issue("GEAR-5");
        tricky.fields.summary = Some("Filter <order> & phase".into());
        let cell = render_summary("https://t/browse", &tricky);
        assert!(cell.contains("Filter &lt;order&gt; &amp; phase"));
    }

    #[test]
    fn nested_table_reverses_data_rows_and_marks_row_headers() {
        let rows = vec![
            vec![json!("Sprint"), json!("Points")],
            vec![json!("24W01"), json!(13)],
            vec![json!("24W03"), json!(21)],
        ];
        let table = render_nested_table(&rows).unwrap();
        let newest = table.find("24W03").unwrap();
        let oldest = table.find("24W01").unwrap();
        assert!(newest < oldest, "most recent sprint should come first");
        assert!(table.contains("<th>24W03</th>"));
        assert!(table.contains("<td>21</td>"));
    }

    #[test]
    fn nested_table_without_header_is_an_input_error() {
        assert!(matches!(render_nested_table(&[]), Err(Error::InputValidation(_))));
    }
}

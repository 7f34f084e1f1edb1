//! `pagewright velocity` command: sprint velocity dashboard.

use std::path::Path;

use chrono::{Duration, Local, NaiveDate};
use serde_json::json;

use crate::cli::AuthArgs;
use crate::config::RunInput;
use crate::context::ServiceContext;
use crate::error::{Error, Result};
use crate::ports::content::{interpret_envelope, PageReceipt};
use crate::ports::issues::STORY_POINTS_FIELD;
use crate::report::metrics::sum_story_points_excluding_epics;
use crate::report::script::render_script_data;
use crate::report::snippet::append_force_update_callout;
use crate::report::sprint::two_week_sprint;
use crate::report::table::render_nested_table;
use crate::template::{created_page_id, substitute};

/// Sprints covered when the run input does not say otherwise.
const DEFAULT_SPRINT_COUNT: u32 = 6;
/// Label applied to every generated dashboard page.
const LABEL: &str = "velocity";

/// Execute the `velocity` command.
///
/// # Errors
///
/// Returns the first configuration, tracker, rendering, or publishing error.
pub fn run(input: &Path, auth: &AuthArgs) -> Result<()> {
    let run_input = RunInput::from_file(input)?;
    let ctx = super::live_context(auth, run_input.config.spacekey.as_deref())?;
    let receipt = create_velocity_dashboard(&ctx, &run_input, Local::now().date_naive())?;
    println!("{}", receipt.confirmation("Velocity dashboard"));
    Ok(())
}

/// Builds the per-sprint completed-points series for the last N two-week
/// sprints, renders it as a table and as script data, substitutes both into
/// the template page, publishes the dashboard, and labels it.
///
/// # Errors
///
/// Fails on missing configuration, any remote call, or an unresolved
/// template placeholder.
pub fn create_velocity_dashboard(
    ctx: &ServiceContext,
    input: &RunInput,
    today: NaiveDate,
) -> Result<PageReceipt> {
    let project = input.config.project.as_deref().ok_or_else(|| {
        Error::Configuration("run input must declare 'project' in config".into())
    })?;
    let sprint_count = input.config.sprint_count.unwrap_or(DEFAULT_SPRINT_COUNT);

    // Oldest sprint first; the nested-table renderer shows the most recent
    // row on top.
    let mut rows =
        vec![vec![json!("Sprint"), json!("Completed points"), json!("Issues resolved")]];
    for back in (0..sprint_count).rev() {
        let sprint = two_week_sprint(today - Duration::weeks(2 * i64::from(back)));
        let jql = format!(
            "project={project} AND resolution IS NOT EMPTY AND \
             resolutiondate >= \"{}\" AND resolutiondate < \"{}\"",
            sprint.start, sprint.end,
        );
        let issues = ctx.issues.search_issues_all(
            &jql,
            &format!("issuetype,{STORY_POINTS_FIELD}"),
            "",
        )?;
        let points = sum_story_points_excluding_epics(&issues);
        rows.push(vec![json!(sprint.name), json!(points), json!(issues.len())]);
    }

    let mut variables = input.variables.clone();
    variables.insert("VELOCITY_TABLE".to_owned(), render_nested_table(&rows)?);
    variables.insert("VELOCITY_DATA".to_owned(), render_script_data(&rows));
    variables.insert("GENERATED_DATE".to_owned(), today.format("%Y-%m-%d").to_string());

    let mut template = ctx.content.page_content(input.config.template_page_id)?;
    if let Some(job_url) = force_update_url(input) {
        template = append_force_update_callout(&template, &job_url);
    }
    let body = substitute(&template, &variables)?;

    let title = format!("Velocity - {}", two_week_sprint(today).name);
    let response =
        ctx.content.create_page(Some(input.config.parent_page_id), &title, &body)?;
    let receipt = interpret_envelope(&response)?;

    let page_id = created_page_id(&response)?;
    ctx.content.set_labels(page_id, &[LABEL.to_owned()])?;

    Ok(receipt)
}

/// URL of the build job that refreshes this dashboard, when configured.
fn force_update_url(input: &RunInput) -> Option<String> {
    let build_type_id = input.config.build_type_id.as_deref()?;
    let server = input.config.build_server.as_deref()?;
    Some(format!(
        "{}/viewType.html?buildTypeId={build_type_id}",
        server.trim_end_matches('/')
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunConfig;
    use std::collections::BTreeMap;

    #[test]
    fn force_update_url_needs_both_job_id_and_server() {
        let mut input = RunInput {
            config: RunConfig {
                template_page_id: 1,
                parent_page_id: 2,
                spacekey: None,
                test_mode: false,
                sprint_count: None,
                project: Some("GEAR".into()),
                build_type_id: Some("Agile_VelocityRefresh".into()),
                build_server: None,
            },
            variables: BTreeMap::new(),
        };
        assert!(force_update_url(&input).is_none());

        input.config.build_server = Some("https://builds/".to_owned());
        assert_eq!(
            force_update_url(&input).unwrap(),
            "https://builds/viewType.html?buildTypeId=Agile_VelocityRefresh"
        );
    }
}

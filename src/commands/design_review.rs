//! `pagewright design-review` command: the report driver.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::Local;

use crate::cli::AuthArgs;
use crate::config::RunInput;
use crate::context::ServiceContext;
use crate::error::{Error, Result};
use crate::ports::content::{interpret_envelope, PageReceipt};
use crate::report::table::IssueTableRenderer;
use crate::template::{created_page_id, publish_from_template};

/// Fields requested from the tracker and rendered as table columns.
const FIELDS: &str = "key,type,summary,status,resolution,customfield_11400,customfield_11402";
/// Column titles, parallel to [`FIELDS`].
const TITLES: &str = "Key,T,Summary,Status,Resolution,Reviewers,Reviews";
/// Label applied to every generated design review page.
const LABEL: &str = "design-review";

/// Execute the `design-review` command.
///
/// # Errors
///
/// Returns the first configuration, tracker, rendering, or publishing error.
pub fn run(input: &Path, auth: &AuthArgs) -> Result<()> {
    let mut run_input = RunInput::from_file(input)?;
    if run_input.config.test_mode {
        run_input.variables = test_variables();
    }
    let release = release_version(&run_input)?;
    println!("Creating a new design review page for release {release}");

    let ctx = super::live_context(auth, run_input.config.spacekey.as_deref())?;
    let receipt = create_design_review(&ctx, &run_input)?;
    println!("{}", receipt.confirmation("Design Review"));
    Ok(())
}

/// Queries stories and bugs for the release, renders both tables,
/// substitutes them into the template page, publishes the result under the
/// parent page, and labels it.
///
/// # Errors
///
/// Fails on missing configuration, any remote call, or an unresolved
/// template placeholder.
pub fn create_design_review(ctx: &ServiceContext, input: &RunInput) -> Result<PageReceipt> {
    let release = release_version(input)?;
    let project = input.config.project.as_deref().ok_or_else(|| {
        Error::Configuration("run input must declare 'project' in config".into())
    })?;

    let renderer = IssueTableRenderer::new(&ctx.browse_base);

    let story_jql = format!(
        "project={project} AND type=Story AND resolution NOT IN \
         (\"Won't Fix\", \"Won't Do\", \"Duplicate\") AND fixVersion={release}"
    );
    let stories = ctx.issues.search_issues_all(&story_jql, FIELDS, "renderedFields")?;
    let story_table = renderer.render(&stories, FIELDS, TITLES)?;

    let bug_jql = format!("project={project} AND type=Bug AND fixVersion={release}");
    let bugs = ctx.issues.search_issues_all(&bug_jql, FIELDS, "renderedFields")?;
    let bug_table = renderer.render(&bugs, FIELDS, TITLES)?;

    let mut variables = input.variables.clone();
    variables.insert("STORIES_DONE_TABLE".to_owned(), story_table);
    variables.insert("BUGS_DONE_TABLE".to_owned(), bug_table);

    let response = publish_from_template(
        ctx.content.as_ref(),
        input.config.parent_page_id,
        input.config.template_page_id,
        &format!("Design Review - Release {release}"),
        &variables,
    )?;
    let receipt = interpret_envelope(&response)?;

    // The template's label does not propagate to page instances, so the new
    // page is labeled explicitly.
    let page_id = created_page_id(&response)?;
    ctx.content.set_labels(page_id, &[LABEL.to_owned()])?;

    Ok(receipt)
}

fn release_version(input: &RunInput) -> Result<String> {
    input.variables.get("RELEASE_VERSION").cloned().ok_or_else(|| {
        Error::Configuration("run input must declare 'RELEASE_VERSION' in variables".into())
    })
}

fn test_variables() -> BTreeMap<String, String> {
    let mut variables = BTreeMap::new();
    variables
        .insert("REVIEW_DATE".to_owned(), Local::now().format("%Y-%m-%d %H:%M:%S").to_string());
    variables.insert("RELEASE_VERSION".to_owned(), "4.1.0".to_owned());
    variables
}

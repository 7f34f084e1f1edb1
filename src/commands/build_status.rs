//! `pagewright build-status` command.

use serde_json::Value;

use crate::adapters::live::LiveBuildService;
use crate::error::{Error, Result};
use crate::ports::builds::BuildService;

/// Execute the `build-status` command.
///
/// # Errors
///
/// Returns [`Error::Configuration`] when neither selector is given, or any
/// build service error.
pub fn run(server: &str, build_type: Option<&str>, project: Option<&str>) -> Result<()> {
    let service = LiveBuildService::new(server)?;
    let report = status_report(&service, build_type, project)?;
    println!("{report}");
    Ok(())
}

/// Fetches and formats the requested status: the latest build of one
/// configuration, or the latest builds across a project.
fn status_report(
    service: &dyn BuildService,
    build_type: Option<&str>,
    project: Option<&str>,
) -> Result<String> {
    let value: Value = match (build_type, project) {
        (Some(id), _) => service.latest_build(id)?,
        (None, Some(id)) => service.latest_project_builds(id)?,
        (None, None) => {
            return Err(Error::Configuration(
                "declare --build-type or --project to select what to show".into(),
            ))
        }
    };
    Ok(serde_json::to_string_pretty(&value)?)
}

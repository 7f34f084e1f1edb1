//! Command dispatch and handlers.

pub mod build_status;
pub mod design_review;
pub mod make_input;
pub mod velocity;

use crate::cli::{AuthArgs, Command};
use crate::config::{ContentOptions, CredentialBundle, TrackerOptions};
use crate::context::ServiceContext;
use crate::error::Result;

/// Dispatch a parsed command to its handler.
///
/// # Errors
///
/// Returns the first error the selected handler hits; nothing is retried.
pub fn dispatch(command: &Command) -> Result<()> {
    match command {
        Command::DesignReview { input, auth } => design_review::run(input, auth),
        Command::Velocity { input, auth } => velocity::run(input, auth),
        Command::MakeInput { output } => make_input::run(output),
        Command::BuildStatus { server, build_type, project } => {
            build_status::run(server, build_type.as_deref(), project.as_deref())
        }
    }
}

/// Loads all four configuration files and opens live clients.
///
/// A `spacekey` from the run input overrides the one in the wiki options.
pub(crate) fn live_context(
    auth: &AuthArgs,
    spacekey_override: Option<&str>,
) -> Result<ServiceContext> {
    let tracker_creds = CredentialBundle::from_file(&auth.tracker_auth)?;
    let tracker_options = TrackerOptions::from_file(&auth.tracker_options)?;
    let content_creds = CredentialBundle::from_file(&auth.wiki_auth)?;
    let mut content_options = ContentOptions::from_file(&auth.wiki_options)?;
    if let Some(spacekey) = spacekey_override {
        content_options.spacekey = spacekey.to_owned();
    }
    ServiceContext::live(tracker_creds, &tracker_options, content_creds, &content_options)
}

//! Service context bundling the port trait objects.

use crate::adapters::live::{LiveContentService, LiveIssueTracker};
use crate::config::{ContentOptions, CredentialBundle, TrackerOptions};
use crate::error::Result;
use crate::ports::{ContentService, IssueTracker};

/// The two authenticated clients a report run works against, plus the
/// browse URL issue links point at.
///
/// Commands receive this instead of concrete clients so tests can run the
/// drivers against in-memory fakes.
pub struct ServiceContext {
    /// Wiki content service client.
    pub content: Box<dyn ContentService>,
    /// Issue tracker client.
    pub issues: Box<dyn IssueTracker>,
    /// Base URL issue links are built from, e.g. `https://tracker/browse`.
    pub browse_base: String,
}

impl ServiceContext {
    /// Opens live clients for both services. The tracker connection doubles
    /// as the credential bootstrap, so bad tracker credentials fail here.
    ///
    /// # Errors
    ///
    /// Returns any client construction or authentication error.
    pub fn live(
        tracker_creds: CredentialBundle,
        tracker_options: &TrackerOptions,
        content_creds: CredentialBundle,
        content_options: &ContentOptions,
    ) -> Result<Self> {
        let issues = LiveIssueTracker::connect(tracker_creds, tracker_options)?;
        let content = LiveContentService::new(content_creds, content_options)?;
        Ok(Self {
            content: Box::new(content),
            issues: Box::new(issues),
            browse_base: format!("{}/browse", tracker_options.server.trim_end_matches('/')),
        })
    }
}

//! Live adapters speaking HTTP to the real services.

pub mod builds;
pub mod content;
pub mod issues;

pub use builds::LiveBuildService;
pub use content::LiveContentService;
pub use issues::LiveIssueTracker;

use reqwest::StatusCode;

use crate::error::{Error, Result};

/// Maps an unsuccessful HTTP status to the error taxonomy.
///
/// `context` names the resource for the not-found and auth cases; `body` is
/// the response text, embedded in remote-service errors.
pub(crate) fn error_for_status(status: StatusCode, context: &str, body: &str) -> Result<()> {
    match status {
        s if s.is_success() => Ok(()),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Err(Error::Authentication(context.to_owned()))
        }
        StatusCode::NOT_FOUND => Err(Error::NotFound(context.to_owned())),
        s => Err(Error::RemoteService { code: s.as_u16(), message: body.to_owned() }),
    }
}

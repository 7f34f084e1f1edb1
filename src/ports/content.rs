//! Content service port: pages, attachments, and labels.

use std::path::Path;

use serde_json::Value;

use crate::error::{Error, Result};

/// Prefix applied to every label this system sets.
pub const LABEL_PREFIX: &str = "global";

/// Wiki content service operations used by the report pipeline.
///
/// Page bodies are exchanged in the service's storage format. Mutating
/// operations re-derive the request signer internally because the signing
/// scheme embeds a single-use nonce per request.
pub trait ContentService {
    /// Returns the version number the next update of `page_id` must carry,
    /// i.e. the last observed version plus one.
    ///
    /// Versioning is optimistic: nothing guards against an edit landing
    /// between this call and the following update, so a concurrent editor's
    /// change can be lost. That hazard is inherited from the service's
    /// update model, not resolved here.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if the page does not exist,
    /// [`Error::Authentication`] if the signature is rejected.
    fn next_page_version(&self, page_id: u64) -> Result<u64>;

    /// Replaces the title and body of an existing page. Last write wins;
    /// concurrent edits are not merged.
    ///
    /// # Errors
    ///
    /// Fails if the page is absent or the service rejects the update.
    fn update_page(&self, page_id: u64, title: &str, body: &str) -> Result<Value>;

    /// Creates a new page, under `parent_page_id` when given, otherwise as a
    /// parentless page. Returns the raw creation response.
    ///
    /// # Errors
    ///
    /// Fails if the service rejects the creation (e.g. duplicate title).
    fn create_page(&self, parent_page_id: Option<u64>, title: &str, body: &str) -> Result<Value>;

    /// Fetches the storage-format body of a page.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if the page does not exist.
    fn page_content(&self, page_id: u64) -> Result<String>;

    /// Attaches a file to a page with an attachment comment.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or the upload is rejected.
    fn add_attachment(&self, page_id: u64, file: &Path, comment: &str) -> Result<Value>;

    /// Replaces the page's label set. Labels are normalized (spaces become
    /// underscores) and tagged with [`LABEL_PREFIX`]. An empty list is a
    /// no-op with a warning.
    ///
    /// # Errors
    ///
    /// Fails if the service rejects the label update.
    fn set_labels(&self, page_id: u64, labels: &[String]) -> Result<()>;

    /// Removes one named label from a page.
    ///
    /// # Errors
    ///
    /// Fails if the label update is rejected.
    fn delete_label(&self, page_id: u64, label: &str) -> Result<()>;
}

/// Normalizes a label for submission: internal spaces become underscores.
///
/// Normalization is idempotent; submitting the result again yields the same
/// string.
#[must_use]
pub fn normalize_label(label: &str) -> String {
    label.replace(' ', "_")
}

/// Identifying fields extracted from a successful page response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageReceipt {
    /// Identifier of the page, when present in the response.
    pub id: Option<String>,
    /// Title of the page, when present.
    pub title: Option<String>,
    /// Key of the space the page lives in, when present.
    pub space_key: Option<String>,
}

impl PageReceipt {
    /// Human-readable confirmation line for a terminal success message.
    #[must_use]
    pub fn confirmation(&self, what: &str) -> String {
        match (&self.title, &self.space_key) {
            (Some(title), Some(space)) => {
                format!("{what} created successfully with title {title} in space {space}")
            }
            _ => format!("{what} created successfully"),
        }
    }
}

/// Interprets a JSON response envelope from the content service.
///
/// A body carrying a `statusCode` is a failure and is raised with the code
/// and message embedded; otherwise the identifying fields are extracted.
///
/// # Errors
///
/// Returns [`Error::RemoteService`] for an error envelope.
pub fn interpret_envelope(value: &Value) -> Result<PageReceipt> {
    if let Some(code) = value.get("statusCode") {
        let code = u16::try_from(code.as_u64().unwrap_or(0)).unwrap_or(0);
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("no message supplied")
            .to_owned();
        return Err(Error::RemoteService { code, message });
    }
    Ok(PageReceipt {
        id: value.get("id").map(|id| match id {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }),
        title: value.get("title").and_then(Value::as_str).map(str::to_owned),
        space_key: value
            .pointer("/space/key")
            .and_then(Value::as_str)
            .map(str::to_owned),
    })
}

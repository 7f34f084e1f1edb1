//! Live adapter for the `ContentService` port.

use std::path::Path;

use reqwest::blocking::multipart::Form;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::error_for_status;
use crate::auth::Signer;
use crate::config::{ContentOptions, CredentialBundle};
use crate::error::{Error, Result};
use crate::ports::content::{normalize_label, ContentService, LABEL_PREFIX};

const ATLASSIAN_TOKEN_HEADER: &str = "X-Atlassian-Token";

/// Content service client issuing signed requests against the REST API.
pub struct LiveContentService {
    http: Client,
    creds: CredentialBundle,
    base_url: String,
    spacekey: String,
}

impl LiveContentService {
    /// Builds a client for the service at `options.server`, scoped to
    /// `options.spacekey`.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be constructed.
    pub fn new(creds: CredentialBundle, options: &ContentOptions) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(ATLASSIAN_TOKEN_HEADER, HeaderValue::from_static("no-check"));
        let http = Client::builder().default_headers(headers).build()?;
        Ok(Self {
            http,
            creds,
            base_url: format!("{}/rest/api/", options.server.trim_end_matches('/')),
            spacekey: options.spacekey.clone(),
        })
    }

    /// Derives a fresh signer. Called before every request because the
    /// signature embeds a single-use nonce; a reused signer would replay it.
    fn signer(&self) -> Signer {
        Signer::new(&self.creds)
    }

    fn get_json(&self, path: &str, query: &[(&str, &str)], context: &str) -> Result<Value> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "content service GET");
        let auth = self.signer().authorization_header("GET", &url, query);
        let response =
            self.http.get(&url).query(query).header("Authorization", auth).send()?;
        let status = response.status();
        let text = response.text()?;
        error_for_status(status, context, &text)?;
        Ok(serde_json::from_str(&text)?)
    }

    fn send_json(
        &self,
        method: reqwest::Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
        context: &str,
    ) -> Result<Value> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, %method, "content service mutating call");
        // Fresh signer per mutating call; see Self::signer.
        let auth = self.signer().authorization_header(method.as_str(), &url, query);
        let mut request =
            self.http.request(method, &url).query(query).header("Authorization", auth);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send()?;
        let status = response.status();
        let text = response.text()?;
        error_for_status(status, context, &text)?;
        if text.is_empty() {
            Ok(Value::Null)
        } else {
            Ok(serde_json::from_str(&text)?)
        }
    }
}

impl ContentService for LiveContentService {
    fn next_page_version(&self, page_id: u64) -> Result<u64> {
        let history = self.get_json(
            &format!("content/{page_id}/history"),
            &[("expand", "lastUpdated")],
            &format!("page {page_id}"),
        )?;
        let current = history
            .pointer("/lastUpdated/number")
            .and_then(Value::as_u64)
            .ok_or_else(|| Error::RemoteService {
                code: 200,
                message: format!("page {page_id} history has no lastUpdated.number"),
            })?;
        Ok(current + 1)
    }

    fn update_page(&self, page_id: u64, title: &str, body: &str) -> Result<Value> {
        let next_version = self.next_page_version(page_id)?;
        let payload = json!({
            "type": "page",
            "title": title,
            "space": {"key": self.spacekey},
            "body": {"storage": {"value": body, "representation": "storage"}},
            "version": {"number": next_version},
        });
        self.send_json(
            reqwest::Method::PUT,
            &format!("content/{page_id}"),
            &[],
            Some(&payload),
            &format!("page {page_id}"),
        )
    }

    fn create_page(&self, parent_page_id: Option<u64>, title: &str, body: &str) -> Result<Value> {
        let mut payload = json!({
            "type": "page",
            "title": title,
            "space": {"key": self.spacekey},
            "body": {"storage": {"value": body, "representation": "storage"}},
        });
        if let Some(parent) = parent_page_id {
            payload["ancestors"] = json!([{"type": "page", "id": parent.to_string()}]);
        }
        self.send_json(reqwest::Method::POST, "content/", &[], Some(&payload), "page creation")
    }

    fn page_content(&self, page_id: u64) -> Result<String> {
        let page = self.get_json(
            &format!("content/{page_id}"),
            &[("expand", "body.storage")],
            &format!("page {page_id}"),
        )?;
        page.pointer("/body/storage/value")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| Error::RemoteService {
                code: 200,
                message: format!("page {page_id} has no storage body"),
            })
    }

    fn add_attachment(&self, page_id: u64, file: &Path, comment: &str) -> Result<Value> {
        let url = format!("{}content/{page_id}/child/attachment", self.base_url);
        debug!(%url, "content service attachment upload");
        let form = Form::new().file("file", file)?.text("comment", comment.to_owned());
        let auth = self.signer().authorization_header("POST", &url, &[]);
        let response =
            self.http.post(&url).header("Authorization", auth).multipart(form).send()?;
        let status = response.status();
        let text = response.text()?;
        error_for_status(status, &format!("page {page_id}"), &text)?;
        Ok(serde_json::from_str(&text)?)
    }

    fn set_labels(&self, page_id: u64, labels: &[String]) -> Result<()> {
        if labels.is_empty() {
            warn!(page_id, "no labels to add specified");
            return Ok(());
        }
        let payload: Value = labels
            .iter()
            .map(|label| json!({"prefix": LABEL_PREFIX, "name": normalize_label(label)}))
            .collect();
        self.send_json(
            reqwest::Method::POST,
            &format!("content/{page_id}/label"),
            &[],
            Some(&payload),
            &format!("page {page_id}"),
        )?;
        Ok(())
    }

    fn delete_label(&self, page_id: u64, label: &str) -> Result<()> {
        self.send_json(
            reqwest::Method::DELETE,
            &format!("content/{page_id}/label"),
            &[("name", label)],
            None,
            &format!("page {page_id}"),
        )?;
        Ok(())
    }
}

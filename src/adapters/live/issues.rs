//! Live adapter for the `IssueTracker` port.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use tracing::debug;

use super::error_for_status;
use crate::auth::Signer;
use crate::config::{CredentialBundle, TrackerOptions};
use crate::error::Result;
use crate::ports::issues::{IssueTracker, SearchPage, SearchRequest};

/// Issue tracker client. Construction doubles as the authentication
/// bootstrap: credentials are validated against the server before the
/// client is handed out.
pub struct LiveIssueTracker {
    http: Client,
    creds: CredentialBundle,
    base_url: String,
}

impl LiveIssueTracker {
    /// Connects to the tracker at `options.server` and validates the
    /// credentials with a server-info probe.
    ///
    /// `options.timeout` is passed straight through to the transport;
    /// `options.verify = false` disables TLS verification for deployments
    /// with self-signed certificates.
    ///
    /// # Errors
    ///
    /// [`crate::error::Error::Authentication`] if the probe is rejected;
    /// any transport error otherwise.
    pub fn connect(creds: CredentialBundle, options: &TrackerOptions) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let mut builder = Client::builder()
            .default_headers(headers)
            .danger_accept_invalid_certs(!options.verify);
        if let Some(seconds) = options.timeout {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        let tracker = Self {
            http: builder.build()?,
            creds,
            base_url: format!("{}/rest/api/2/", options.server.trim_end_matches('/')),
        };
        tracker.bootstrap()?;
        Ok(tracker)
    }

    /// Round-trips a signed server-info request so bad credentials fail
    /// here, not in the middle of a report run.
    fn bootstrap(&self) -> Result<()> {
        let url = format!("{}serverInfo", self.base_url);
        debug!(%url, "tracker bootstrap");
        let auth = Signer::new(&self.creds).authorization_header("GET", &url, &[]);
        let response = self.http.get(&url).header("Authorization", auth).send()?;
        let status = response.status();
        let text = response.text()?;
        error_for_status(status, "tracker server info", &text)
    }
}

impl IssueTracker for LiveIssueTracker {
    fn search_issues(&self, request: &SearchRequest) -> Result<SearchPage> {
        let url = format!("{}search", self.base_url);
        let start_at = request.start_at.to_string();
        let max_results = request.max_results.to_string();
        let validate = request.validate_query.to_string();
        let query: Vec<(&str, &str)> = vec![
            ("jql", &request.jql),
            ("startAt", &start_at),
            ("maxResults", &max_results),
            ("fields", &request.fields),
            ("expand", &request.expand),
            ("validateQuery", &validate),
        ];
        debug!(%url, jql = %request.jql, start_at = request.start_at, "issue search");
        let auth = Signer::new(&self.creds).authorization_header("GET", &url, &query);
        let response =
            self.http.get(&url).query(&query).header("Authorization", auth).send()?;
        let status = response.status();
        let text = response.text()?;
        error_for_status(status, "issue search", &text)?;
        Ok(serde_json::from_str(&text)?)
    }
}

//! Live adapter for the `BuildService` port.

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use tracing::debug;

use super::error_for_status;
use crate::error::{Error, Result};
use crate::ports::builds::BuildService;

/// Build server client using the guest-authenticated REST surface.
pub struct LiveBuildService {
    http: Client,
    base_url: String,
}

impl LiveBuildService {
    /// Builds a client for the build server at `server`.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be constructed.
    pub fn new(server: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Ok(Self {
            http: Client::builder().default_headers(headers).build()?,
            base_url: format!("{}/guestAuth/app/rest/", server.trim_end_matches('/')),
        })
    }

    /// GETs `path` and returns the named sub-field of the JSON envelope.
    fn get_field(&self, path: &str, field: &str) -> Result<Value> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "build service GET");
        let response = self.http.get(&url).send()?;
        let status = response.status();
        let text = response.text()?;
        error_for_status(status, path, &text)?;
        let envelope: Value = serde_json::from_str(&text)?;
        envelope.get(field).cloned().ok_or_else(|| Error::RemoteService {
            code: 200,
            message: format!("build service response has no '{field}' field"),
        })
    }
}

impl BuildService for LiveBuildService {
    fn build_status(&self, build_type_id: &str) -> Result<Value> {
        self.get_field(
            &format!(
                "builds?locator=buildType:(id:{build_type_id}),running:any&fields=count,build(status)"
            ),
            "build",
        )
    }

    fn latest_project_builds(&self, project_id: &str) -> Result<Value> {
        self.get_field(
            &format!(
                "buildTypes?locator=affectedProject:(id:{project_id})&fields=buildType(id,name,builds($locator(running:false,canceled:false,count:1),build(number,status,statusText)))"
            ),
            "buildType",
        )
    }

    fn latest_build(&self, build_type_id: &str) -> Result<Value> {
        self.get_field(&format!("buildTypes/id:{build_type_id}/builds?count=1"), "build")
    }

    fn project_build_types(&self, project_id: &str) -> Result<Value> {
        let build_types = self.get_field(&format!("projects/id:{project_id}"), "buildTypes")?;
        build_types.get("buildType").cloned().ok_or_else(|| Error::RemoteService {
            code: 200,
            message: "project response has no 'buildTypes.buildType' field".to_owned(),
        })
    }
}

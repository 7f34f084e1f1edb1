//! Build server port: read-only status queries.

use serde_json::Value;

use crate::error::Result;

/// Read-only queries against the build server's guest-authenticated API.
///
/// Each call is a single GET returning one named sub-field of the JSON
/// envelope. No writes, no retries, no pagination.
pub trait BuildService {
    /// Status of builds for one build configuration, running builds included.
    ///
    /// # Errors
    ///
    /// Fails if the request fails or the envelope lacks the `build` field.
    fn build_status(&self, build_type_id: &str) -> Result<Value>;

    /// The most recent finished build per build configuration in a project.
    ///
    /// # Errors
    ///
    /// Fails if the request fails or the envelope lacks the `buildType` field.
    fn latest_project_builds(&self, project_id: &str) -> Result<Value>;

    /// The single most recent build of one build configuration.
    ///
    /// # Errors
    ///
    /// Fails if the request fails or the envelope lacks the `build` field.
    fn latest_build(&self, build_type_id: &str) -> Result<Value>;

    /// The build configurations defined in a project.
    ///
    /// # Errors
    ///
    /// Fails if the request fails or the envelope lacks the `buildTypes` field.
    fn project_build_types(&self, project_id: &str) -> Result<Value>;
}

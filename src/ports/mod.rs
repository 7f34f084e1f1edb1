//! Port traits defining the external service boundaries.
//!
//! Each trait represents one remote collaborator (wiki content service,
//! issue tracker, build server). Live implementations live in
//! `src/adapters/live/`; tests substitute in-memory fakes.

pub mod builds;
pub mod content;
pub mod issues;

pub use builds::BuildService;
pub use content::{interpret_envelope, normalize_label, ContentService, PageReceipt};
pub use issues::{Issue, IssueTracker, SearchPage, SearchRequest};

use super::status::ProjectStatus;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Fully resolved metadata for one project.
///
/// Every field follows a total resolution order: override value, then remote
/// value, then computed default, then hardcoded fallback. Counts default to
/// zero, so rendering code needs no null checks; a record is complete or the
/// aggregation has not yet finished.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectMetadata {
    /// Repository identifier; stable for the lifetime of the catalog.
    pub repo: String,

    /// URL-safe identifier used for project pages.
    pub slug: String,

    /// Display name.
    pub name: String,

    pub description: String,

    /// Canonical repository URL.
    pub repo_url: String,

    pub stars: u64,
    pub forks: u64,

    /// Primary language, when the remote lookup reported one.
    pub language: Option<String>,

    /// Last recorded activity; falls back to aggregation time when the
    /// remote lookup came back empty.
    pub last_updated: DateTime<Utc>,

    pub latest_release: Option<ReleaseSummary>,

    pub docs_url: Option<String>,
    pub crate_url: Option<String>,

    pub status: ProjectStatus,

    /// Short "why it exists" explanation, override-supplied only.
    pub purpose: Option<String>,

    pub features: Vec<String>,

    pub getting_started: String,
    pub contributing: String,
    pub license: String,
}

/// Condensed view of a repository's latest tagged release.
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseSummary {
    pub tag: String,
    pub url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

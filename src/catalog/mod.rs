//! Project metadata aggregation
//!
//! This module merges locally authored override records with best-effort
//! lookups against the GitHub API and the crates.io registry to produce one
//! fully resolved [`ProjectMetadata`] record per configured project.
//!
//! # Implementation Model
//!
//! Every field of the output record follows a total resolution order:
//! override value, then remote value, then computed default, then hardcoded
//! fallback. Each remote lookup returns a [`FetchResult`] which can be
//! `Found`, `NotFound`, or `Error`; the aggregation treats the latter two
//! identically, so a degraded remote dependency degrades output quality but
//! never blocks a build.
//!
//! The [`Aggregator`] fans out the per-project lookups concurrently and the
//! [`Catalog`] fans out across the full project list, memoizing the resulting
//! collection for the process lifetime. All remote responses are memoized
//! per identifier inside the clients, so a second aggregation of the same
//! project (list view, then detail view) triggers no duplicate network calls.

mod aggregator;
mod fetch_result;
pub mod github;
mod project;
mod projects;
pub mod readme;
pub mod registry;
pub mod status;

pub use aggregator::{Aggregator, Detail};
pub use fetch_result::FetchResult;
pub use project::{ProjectMetadata, ReleaseSummary};
pub use projects::Catalog;
pub use status::ProjectStatus;

//! Lifecycle status derivation
//!
//! Maps an explicit override, latest-release presence, and last-update
//! staleness to one of a small closed set of status labels.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Days of inactivity after which a released project reads as `Stable`
/// rather than `Active`.
const ACTIVE_WINDOW_DAYS: i64 = 180;

/// Coarse lifecycle label shown next to each project.
///
/// The heuristic only ever produces `Active`, `Stable`, or `Experimental`;
/// `Maintenance` and `Deprecated` are reachable through a configured
/// override only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProjectStatus {
    Active,
    Stable,
    Experimental,
    Maintenance,
    Deprecated,
}

/// Derive a status label. Pure and deterministic; `now` is passed in so
/// staleness is reproducible under test.
///
/// Rule order, first match wins:
/// 1. an explicit override wins unconditionally;
/// 2. a released project is `Active` when updated within the last 180 days,
///    `Stable` otherwise;
/// 3. a project with no tagged release is `Experimental` regardless of
///    staleness. A missing or unparseable timestamp counts as infinitely
///    stale.
#[must_use]
pub fn derive_status(
    override_status: Option<ProjectStatus>,
    has_release: bool,
    last_updated: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> ProjectStatus {
    if let Some(status) = override_status {
        return status;
    }

    if !has_release {
        return ProjectStatus::Experimental;
    }

    let days_since_update = last_updated.map_or(i64::MAX, |ts| now.signed_duration_since(ts).num_days());

    if days_since_update <= ACTIVE_WINDOW_DAYS {
        ProjectStatus::Active
    } else {
        ProjectStatus::Stable
    }
}

//! Metadata aggregation
//!
//! Orchestrates the override lookup, the GitHub and registry clients, the
//! README extractor, and the status deriver into one complete
//! [`ProjectMetadata`] record per project.

use super::FetchResult;
use super::github::{GithubClient, ReleaseInfo, RepoInfo};
use super::project::{ProjectMetadata, ReleaseSummary};
use super::readme;
use super::registry::RegistryClient;
use super::status;
use crate::Result;
use crate::config::{ProjectOverride, SiteConfig};
use chrono::{DateTime, Utc};
use std::sync::Arc;

const LOG_TARGET: &str = "aggregator";

const GETTING_STARTED_HEADINGS: &[&str] = &["Getting Started", "Quickstart", "Usage", "Installation"];
const CONTRIBUTING_HEADINGS: &[&str] = &["Contributing", "Contribution Guide"];
const LICENSE_HEADINGS: &[&str] = &["License"];

/// Controls whether the README fetch is part of the fan-out. List and
/// summary views skip it; the full project page resolves README-backed
/// sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detail {
    Summary,
    Full,
}

/// Produces one normalized metadata record per project, merging the static
/// override with best-effort remote lookups. Owns the memoizing clients, so
/// one instance serves the whole process.
#[derive(Debug)]
pub struct Aggregator {
    config: Arc<SiteConfig>,
    github: GithubClient,
    registry: RegistryClient,
}

impl Aggregator {
    pub fn new(config: Arc<SiteConfig>, token: Option<&str>) -> Result<Self> {
        let github = GithubClient::new(&config.org, token, &config.api_host)?;
        let registry = RegistryClient::new(&config.registry_host)?;

        Ok(Self { config, github, registry })
    }

    /// Aggregate one project into a complete metadata record.
    ///
    /// Never fails: every remote lookup that comes back empty degrades to
    /// the override value, a computed default, or a hardcoded fallback.
    pub async fn aggregate(&self, repo: &str, detail: Detail) -> ProjectMetadata {
        let overrides = self.config.override_for(repo);

        // The registry check only matters when a convention URL may need to
        // be synthesized; a fully overridden cross-reference skips it.
        let registry_needed = overrides.is_none_or(|o| o.docs_url.is_none() || o.crate_url.is_none());

        log::info!(target: LOG_TARGET, "Aggregating metadata for project '{repo}'");

        let (repo_res, release_res, registry_res, readme_res) = tokio::join!(
            self.github.repo_info(repo),
            self.github.latest_release(repo),
            self.registry_check(repo, registry_needed),
            self.readme_lookup(repo, detail),
        );

        log::debug!(
            target: LOG_TARGET,
            "Lookups for '{repo}': repo={}, release={}, registry={}, readme={}",
            repo_res.status_str(),
            release_res.status_str(),
            registry_res.status_str(),
            readme_res.status_str()
        );

        assemble(
            &self.config,
            repo,
            overrides,
            repo_res.ok(),
            release_res.ok(),
            registry_res.is_found(),
            readme_res.ok(),
            Utc::now(),
        )
    }

    async fn registry_check(&self, name: &str, needed: bool) -> FetchResult<()> {
        if needed {
            self.registry.crate_exists(name).await
        } else {
            FetchResult::NotFound
        }
    }

    async fn readme_lookup(&self, repo: &str, detail: Detail) -> FetchResult<String> {
        if detail == Detail::Full {
            self.github.readme(repo).await
        } else {
            FetchResult::NotFound
        }
    }
}

/// Assemble the output record from already-resolved inputs. Pure, so each
/// field's resolution order is testable without network access.
#[expect(clippy::too_many_arguments, reason = "one argument per independently resolved data source")]
fn assemble(
    config: &SiteConfig,
    repo: &str,
    overrides: Option<&ProjectOverride>,
    repo_info: Option<RepoInfo>,
    release: Option<ReleaseInfo>,
    crate_published: bool,
    readme_text: Option<String>,
    now: DateTime<Utc>,
) -> ProjectMetadata {
    let last_activity = repo_info.as_ref().and_then(|r| r.pushed_at.or(r.updated_at));

    let status = status::derive_status(overrides.and_then(|o| o.status), release.is_some(), last_activity, now);

    let latest_release = release.map(|r| ReleaseSummary {
        tag: r.tag_name,
        url: r.html_url,
        published_at: r.published_at,
    });

    let spdx = repo_info.as_ref().and_then(|r| r.license.as_ref()).and_then(|l| l.spdx_id.clone());

    ProjectMetadata {
        repo: repo.to_string(),
        slug: repo.to_lowercase(),
        name: overrides
            .and_then(|o| o.name.clone())
            .unwrap_or_else(|| repo.to_string()),
        description: overrides
            .and_then(|o| o.description.clone())
            .or_else(|| repo_info.as_ref().and_then(|r| r.description.clone()))
            .unwrap_or_else(|| format!("A {} project.", config.name)),
        repo_url: repo_info
            .as_ref()
            .and_then(|r| r.html_url.clone())
            .unwrap_or_else(|| format!("{}/{repo}", config.org_url())),
        stars: repo_info.as_ref().map_or(0, |r| r.stargazers_count),
        forks: repo_info.as_ref().map_or(0, |r| r.forks_count),
        language: repo_info.as_ref().and_then(|r| r.language.clone()),
        last_updated: last_activity.unwrap_or(now),
        latest_release,
        docs_url: resolve_convention_url(overrides.and_then(|o| o.docs_url.as_deref()), crate_published, || {
            format!("https://docs.rs/{repo}")
        }),
        crate_url: resolve_convention_url(overrides.and_then(|o| o.crate_url.as_deref()), crate_published, || {
            format!("https://crates.io/crates/{repo}")
        }),
        status,
        purpose: overrides.and_then(|o| o.purpose.clone()),
        features: overrides.map(|o| o.features.clone()).unwrap_or_default(),
        getting_started: resolve_section_text(
            overrides.and_then(|o| o.getting_started.as_deref()),
            readme_text.as_deref(),
            GETTING_STARTED_HEADINGS,
            &format!("See the {repo} repository on GitHub for setup instructions."),
        ),
        contributing: resolve_section_text(
            overrides.and_then(|o| o.contributing.as_deref()),
            readme_text.as_deref(),
            CONTRIBUTING_HEADINGS,
            "Contributions are welcome; open an issue or pull request on GitHub.",
        ),
        license: resolve_license(
            overrides.and_then(|o| o.license.as_deref()),
            spdx.as_deref(),
            readme_text.as_deref(),
        ),
    }
}

/// Resolve a prose field: override value, else the matching README section,
/// else the hardcoded fallback sentence.
fn resolve_section_text(override_value: Option<&str>, readme_text: Option<&str>, headings: &[&str], fallback: &str) -> String {
    if let Some(text) = override_value {
        return text.to_string();
    }

    if let Some(md) = readme_text {
        let section = readme::extract_section(md, headings);
        if !section.is_empty() {
            return section;
        }
    }

    fallback.to_string()
}

/// Resolve the license text: override, else the remote SPDX identifier, else
/// the README's License section, else a generic pointer.
fn resolve_license(override_value: Option<&str>, spdx: Option<&str>, readme_text: Option<&str>) -> String {
    if let Some(text) = override_value {
        return text.to_string();
    }

    if let Some(id) = spdx {
        return id.to_string();
    }

    resolve_section_text(None, readme_text, LICENSE_HEADINGS, "See the repository for license details.")
}

/// Resolve an external link: override value, else a convention-based URL
/// when the registry confirmed the package exists, else absent.
fn resolve_convention_url(override_value: Option<&str>, crate_published: bool, template: impl FnOnce() -> String) -> Option<String> {
    if let Some(url) = override_value {
        return Some(url.to_string());
    }

    crate_published.then(template)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::github::RepoLicense;
    use crate::catalog::status::ProjectStatus;
    use chrono::Duration;

    fn test_config() -> SiteConfig {
        toml::from_str(
            r#"
            name = "Acme"
            org = "acme"
            "#,
        )
        .unwrap()
    }

    fn repo_info(stars: u64, forks: u64, pushed_days_ago: i64, now: DateTime<Utc>) -> RepoInfo {
        serde_json::from_value(serde_json::json!({
            "name": "widget",
            "description": "Remote description.",
            "html_url": "https://github.com/acme/widget",
            "stargazers_count": stars,
            "forks_count": forks,
            "language": "Rust",
            "pushed_at": (now - Duration::days(pushed_days_ago)).to_rfc3339(),
            "license": { "spdx_id": "MIT" }
        }))
        .unwrap()
    }

    fn release(tag: &str) -> ReleaseInfo {
        ReleaseInfo {
            tag_name: tag.to_string(),
            html_url: None,
            published_at: None,
        }
    }

    #[test]
    fn test_override_only_round_trip() {
        // All remote sources absent: override fields come through exactly,
        // everything else is the documented default.
        let config = test_config();
        let now = Utc::now();
        let overrides = ProjectOverride {
            repo: "widget".to_string(),
            name: Some("Widget".to_string()),
            description: Some("Locally described.".to_string()),
            status: Some(ProjectStatus::Maintenance),
            purpose: Some("Because.".to_string()),
            features: vec!["fast".to_string()],
            docs_url: Some("https://example.com/docs".to_string()),
            crate_url: Some("https://example.com/crate".to_string()),
            getting_started: Some("cargo add widget".to_string()),
            contributing: Some("Send patches.".to_string()),
            license: Some("MIT OR Apache-2.0".to_string()),
        };

        let meta = assemble(&config, "widget", Some(&overrides), None, None, false, None, now);

        assert_eq!(meta.name, "Widget");
        assert_eq!(meta.description, "Locally described.");
        assert_eq!(meta.status, ProjectStatus::Maintenance);
        assert_eq!(meta.purpose.as_deref(), Some("Because."));
        assert_eq!(meta.features, vec!["fast".to_string()]);
        assert_eq!(meta.docs_url.as_deref(), Some("https://example.com/docs"));
        assert_eq!(meta.crate_url.as_deref(), Some("https://example.com/crate"));
        assert_eq!(meta.getting_started, "cargo add widget");
        assert_eq!(meta.contributing, "Send patches.");
        assert_eq!(meta.license, "MIT OR Apache-2.0");

        // Computed defaults for everything the override does not supply.
        assert_eq!(meta.slug, "widget");
        assert_eq!(meta.repo_url, "https://github.com/acme/widget");
        assert_eq!(meta.stars, 0);
        assert_eq!(meta.forks, 0);
        assert!(meta.language.is_none());
        assert!(meta.latest_release.is_none());
        assert_eq!(meta.last_updated, now);
    }

    #[test]
    fn test_override_status_with_all_remotes_absent() {
        // Scenario: override {repo: "x", status: "stable"}, remote repo info
        // absent, remote release absent.
        let config = test_config();
        let overrides = ProjectOverride {
            repo: "x".to_string(),
            status: Some(ProjectStatus::Stable),
            ..ProjectOverride::default()
        };

        let meta = assemble(&config, "x", Some(&overrides), None, None, false, None, Utc::now());

        assert_eq!(meta.status, ProjectStatus::Stable);
        assert_eq!(meta.stars, 0);
        assert_eq!(meta.forks, 0);
        assert_eq!(meta.description, "A Acme project.");
    }

    #[test]
    fn test_recent_release_with_remote_stats() {
        // Scenario: no override, 42 stars, 3 forks, pushed 10 days ago, a
        // release exists.
        let config = test_config();
        let now = Utc::now();

        let meta = assemble(
            &config,
            "widget",
            None,
            Some(repo_info(42, 3, 10, now)),
            Some(release("v1.0")),
            true,
            None,
            now,
        );

        assert_eq!(meta.status, ProjectStatus::Active);
        assert_eq!(meta.stars, 42);
        assert_eq!(meta.forks, 3);
        assert_eq!(meta.latest_release.unwrap().tag, "v1.0");
        assert_eq!(meta.language.as_deref(), Some("Rust"));
        assert_eq!(meta.license, "MIT");
    }

    #[test]
    fn test_stale_repo_without_release_stays_experimental() {
        // Key regression test for the status heuristic's edge case: repo
        // info present, pushed 400 days ago, no release. Experimental, not
        // stable.
        let config = test_config();
        let now = Utc::now();

        let meta = assemble(&config, "widget", None, Some(repo_info(5, 1, 400, now)), None, false, None, now);

        assert_eq!(meta.status, ProjectStatus::Experimental);
    }

    #[test]
    fn test_convention_urls_require_published_crate() {
        let config = test_config();
        let now = Utc::now();

        let published = assemble(&config, "widget", None, None, None, true, None, now);
        assert_eq!(published.docs_url.as_deref(), Some("https://docs.rs/widget"));
        assert_eq!(published.crate_url.as_deref(), Some("https://crates.io/crates/widget"));

        let unpublished = assemble(&config, "widget", None, None, None, false, None, now);
        assert!(unpublished.docs_url.is_none());
        assert!(unpublished.crate_url.is_none());
    }

    #[test]
    fn test_readme_sections_back_prose_fields() {
        let config = test_config();
        let md = "# widget\n\n## Getting Started\nrun cargo add widget\n\n## Contributing\nfork and send a PR\n\n## License\nMIT license\n";

        let meta = assemble(&config, "widget", None, None, None, false, Some(md.to_string()), Utc::now());

        assert_eq!(meta.getting_started, "run cargo add widget");
        assert_eq!(meta.contributing, "fork and send a PR");
        assert_eq!(meta.license, "MIT license");
    }

    #[test]
    fn test_prose_fallbacks_without_readme() {
        let config = test_config();

        let meta = assemble(&config, "widget", None, None, None, false, None, Utc::now());

        assert_eq!(meta.getting_started, "See the widget repository on GitHub for setup instructions.");
        assert_eq!(meta.contributing, "Contributions are welcome; open an issue or pull request on GitHub.");
        assert_eq!(meta.license, "See the repository for license details.");
    }

    #[test]
    fn test_remote_spdx_wins_over_readme_license_section() {
        let config = test_config();
        let now = Utc::now();
        let md = "## License\nlong prose about licensing";

        let meta = assemble(&config, "widget", None, Some(repo_info(0, 0, 1, now)), None, false, Some(md.to_string()), now);

        assert_eq!(meta.license, "MIT");
    }

    #[test]
    fn test_slug_is_lowercased_identifier() {
        let config = test_config();
        let meta = assemble(&config, "WidgetKit", None, None, None, false, None, Utc::now());
        assert_eq!(meta.slug, "widgetkit");
        assert_eq!(meta.repo, "WidgetKit");
    }

    #[test]
    fn test_last_updated_prefers_pushed_at() {
        let config = test_config();
        let now = Utc::now();
        let info: RepoInfo = serde_json::from_value(serde_json::json!({
            "name": "widget",
            "pushed_at": (now - Duration::days(5)).to_rfc3339(),
            "updated_at": (now - Duration::days(1)).to_rfc3339(),
        }))
        .unwrap();

        let meta = assemble(&config, "widget", None, Some(info), None, false, None, now);
        assert!(now.signed_duration_since(meta.last_updated).num_days() >= 4);
    }

    #[test]
    fn test_license_struct_without_spdx_falls_through() {
        let config = test_config();
        let now = Utc::now();
        let mut info = repo_info(0, 0, 1, now);
        info.license = Some(RepoLicense { spdx_id: None });

        let meta = assemble(&config, "widget", None, Some(info), None, false, None, now);
        assert_eq!(meta.license, "See the repository for license details.");
    }
}

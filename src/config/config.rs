use crate::Result;
use crate::catalog::status::ProjectStatus;
use ohno::IntoAppError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use url::Url;

/// The default configuration TOML content, embedded from `default_site.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_site.toml");

/// Default base URL for the repository-hosting API. Overridable for tests.
fn default_api_host() -> String {
    "https://api.github.com".to_string()
}

/// Default base URL for the package-registry API. Overridable for tests.
fn default_registry_host() -> String {
    "https://crates.io".to_string()
}

/// Site-wide configuration loaded once at startup.
///
/// Holds the organization identity plus the ordered list of project override
/// records. Immutable for the process lifetime.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Organization display name, used in fallback text.
    pub name: String,

    /// GitHub organization handle used to address repositories.
    pub org: String,

    /// Organization home URL. Defaults to `https://github.com/{org}`.
    #[serde(default)]
    pub org_url: Option<String>,

    /// Base URL of the repository-hosting API.
    #[serde(default = "default_api_host")]
    pub api_host: String,

    /// Base URL of the package-registry API.
    #[serde(default = "default_registry_host")]
    pub registry_host: String,

    /// Ordered list of projects to show. Declaration order is preserved in
    /// the aggregated catalog.
    #[serde(default)]
    pub projects: Vec<ProjectOverride>,
}

/// Locally authored record for one project. Every populated field takes
/// precedence over the corresponding value fetched from GitHub.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectOverride {
    /// Repository name within the organization; also the identifier used to
    /// query the remote API and to key the override lookup.
    pub repo: String,

    /// Custom display name (defaults to the repo name).
    pub name: Option<String>,

    /// Custom description (overrides the GitHub description).
    pub description: Option<String>,

    /// Explicit lifecycle status; wins over the activity heuristic.
    pub status: Option<ProjectStatus>,

    /// Short "why it exists" explanation.
    pub purpose: Option<String>,

    /// Key features to highlight.
    #[serde(default)]
    pub features: Vec<String>,

    /// Custom documentation URL (if different from docs.rs).
    pub docs_url: Option<String>,

    /// Custom package-registry URL (if different from crates.io).
    pub crate_url: Option<String>,

    /// Getting-started instructions shown on the project page.
    pub getting_started: Option<String>,

    /// Contribution guide text shown on the project page.
    pub contributing: Option<String>,

    /// License text shown on the project page.
    pub license: Option<String>,
}

impl SiteConfig {
    /// Load the site configuration from a TOML file.
    ///
    /// This is the one boundary where malformed input is a real error; past
    /// this point the configuration is assumed valid by construction.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw =
            fs::read_to_string(path).into_app_err_with(|| format!("unable to read site configuration '{}'", path.display()))?;
        let config: Self =
            toml::from_str(&raw).into_app_err_with(|| format!("unable to parse site configuration '{}'", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject host URLs the fetch clients could not address.
    fn validate(&self) -> Result<()> {
        let _ = Url::parse(&self.api_host).into_app_err_with(|| format!("invalid api_host '{}'", self.api_host))?;
        let _ = Url::parse(&self.registry_host).into_app_err_with(|| format!("invalid registry_host '{}'", self.registry_host))?;
        if let Some(org_url) = &self.org_url {
            let _ = Url::parse(org_url).into_app_err_with(|| format!("invalid org_url '{org_url}'"))?;
        }
        Ok(())
    }

    /// Look up the override record for a repository, if one is configured.
    #[must_use]
    pub fn override_for(&self, repo: &str) -> Option<&ProjectOverride> {
        self.projects.iter().find(|p| p.repo == repo)
    }

    /// The organization home URL, configured or derived from the handle.
    #[must_use]
    pub fn org_url(&self) -> String {
        self.org_url
            .clone()
            .unwrap_or_else(|| format!("https://github.com/{}", self.org))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_parses() {
        let config: SiteConfig = toml::from_str(DEFAULT_CONFIG_TOML).unwrap();
        assert_eq!(config.org, "siderust");
        assert_eq!(config.api_host, "https://api.github.com");
        assert_eq!(config.registry_host, "https://crates.io");
        assert_eq!(config.projects.len(), 3);
        assert_eq!(config.projects[0].repo, "siderust");
        assert_eq!(config.projects[0].status, Some(ProjectStatus::Active));
    }

    #[test]
    fn test_org_url_defaults_to_github() {
        let config: SiteConfig = toml::from_str(
            r#"
            name = "Acme"
            org = "acme"
            "#,
        )
        .unwrap();
        assert_eq!(config.org_url(), "https://github.com/acme");
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str(
            r#"
            name = "Acme"
            org = "acme"
            not_a_field = true
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_override_lookup() {
        let config: SiteConfig = toml::from_str(
            r#"
            name = "Acme"
            org = "acme"

            [[projects]]
            repo = "widget"
            description = "A widget."
            "#,
        )
        .unwrap();

        assert_eq!(config.override_for("widget").unwrap().description.as_deref(), Some("A widget."));
        assert!(config.override_for("gadget").is_none());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "name = \"Acme\"\norg = \"acme\"\n").unwrap();

        let config = SiteConfig::load(file.path()).unwrap();
        assert_eq!(config.name, "Acme");
        assert!(config.projects.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let result = SiteConfig::load("/nonexistent/site.toml");
        assert!(result.unwrap_err().to_string().contains("unable to read"));
    }

    #[test]
    fn test_load_rejects_invalid_api_host() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "name = \"Acme\"\norg = \"acme\"\napi_host = \"not a url\"\n").unwrap();

        let result = SiteConfig::load(file.path());
        assert!(result.unwrap_err().to_string().contains("invalid api_host"));
    }
}

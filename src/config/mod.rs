mod config;

pub use config::{DEFAULT_CONFIG_TOML, ProjectOverride, SiteConfig};

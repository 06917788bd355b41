//! Package-registry client
//!
//! Single-purpose crates.io lookup: does a package with this name exist? The
//! answer decides whether convention-based docs.rs and crates.io URLs may be
//! synthesized for a project whose override supplies none.

use crate::Result;
use crate::catalog::FetchResult;
use ohno::EnrichableExt;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

const LOG_TARGET: &str = "  registry";

const USER_AGENT: &str = "site-catalog";

/// Package-registry API client with per-name response memoization.
#[derive(Debug)]
pub struct RegistryClient {
    client: reqwest::Client,
    registry_host: String,
    cache: Mutex<HashMap<Box<str>, FetchResult<()>>>,
}

impl RegistryClient {
    pub fn new(registry_host: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder().user_agent(USER_AGENT).build()?,
            registry_host: registry_host.into(),
            cache: Mutex::new(HashMap::new()),
        })
    }

    /// Check whether a package named `name` is published on the registry.
    ///
    /// `Found` means the package exists; `NotFound` and `Error` both mean no
    /// convention URL will be synthesized.
    pub async fn crate_exists(&self, name: &str) -> FetchResult<()> {
        {
            let map = self.cache.lock().expect("cache lock poisoned");
            if let Some(hit) = map.get(name) {
                log::debug!(target: LOG_TARGET, "Cache hit for registry check of '{name}'");
                return hit.clone();
            }
        }

        let url = format!("{}/api/v1/crates/{name}", self.registry_host);
        log::debug!(target: LOG_TARGET, "Querying registry for '{name}'");

        let result = match self.client.get(&url).send().await {
            Ok(resp) if resp.status() == reqwest::StatusCode::NOT_FOUND => {
                log::debug!(target: LOG_TARGET, "Package '{name}' is not published (404)");
                FetchResult::NotFound
            }
            Ok(resp) if resp.status().is_success() => FetchResult::Found(()),
            Ok(resp) => {
                let status = resp.status();
                log::warn!(target: LOG_TARGET, "Could not check registry for '{name}': HTTP {status}");
                FetchResult::Error(Arc::new(ohno::app_err!("could not check registry for '{name}': HTTP {status}")))
            }
            Err(e) => {
                log::warn!(target: LOG_TARGET, "Could not check registry for '{name}': {e:#}");
                FetchResult::Error(Arc::new(
                    ohno::AppError::from(e).enrich_with(|| format!("could not check registry for '{name}'")),
                ))
            }
        };

        let mut map = self.cache.lock().expect("cache lock poisoned");
        let _ = map.insert(Box::from(name), result.clone());
        result
    }
}

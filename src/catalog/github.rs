//! GitHub API client
//!
//! Minimal client for the three per-project lookups: repository info, latest
//! release, and README content. Every call returns a [`FetchResult`] and
//! memoizes its outcome per repository for the process lifetime.

use crate::Result;
use crate::catalog::FetchResult;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use ohno::EnrichableExt;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

const LOG_TARGET: &str = "    github";

/// API version header sent with every request.
const ACCEPT_HEADER: &str = "application/vnd.github.v3+json";

/// Descriptive client identifier sent with every request.
const USER_AGENT: &str = "site-catalog";

/// Repository information as returned by `GET /repos/{org}/{repo}`,
/// restricted to the fields the aggregation consumes.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoInfo {
    pub name: String,
    pub description: Option<String>,
    pub html_url: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    pub language: Option<String>,
    pub pushed_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub license: Option<RepoLicense>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepoLicense {
    pub spdx_id: Option<String>,
}

/// Latest-release information as returned by `GET /repos/{org}/{repo}/releases/latest`.
/// Repositories with no tagged releases answer 404, which is an expected
/// non-error outcome.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseInfo {
    pub tag_name: String,
    pub html_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

/// Raw README payload; `content` carries the text in a transfer encoding
/// (base64, possibly wrapped with newlines).
#[derive(Debug, Deserialize)]
struct ReadmePayload {
    content: String,
    #[serde(default)]
    encoding: String,
}

/// In-memory memoization map, populated at most once per key. A second
/// concurrent request for the same uncached key is not deduplicated; this is
/// build-time load, not user-facing request load.
type Cache<T> = Mutex<HashMap<Box<str>, FetchResult<T>>>;

/// GitHub API client with per-repository response memoization.
#[derive(Debug)]
pub struct GithubClient {
    client: reqwest::Client,
    api_host: String,
    org: String,
    repo_cache: Cache<RepoInfo>,
    release_cache: Cache<ReleaseInfo>,
    readme_cache: Cache<String>,
}

impl GithubClient {
    /// Create a new client addressing repositories under `org`.
    ///
    /// A missing token simply means unauthenticated access with the lower
    /// rate limit, not a failure.
    pub fn new(org: impl Into<String>, token: Option<&str>, api_host: impl Into<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let _ = headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HEADER));

        if let Some(t) = token {
            let mut auth_val = HeaderValue::from_str(&format!("token {t}"))?;
            auth_val.set_sensitive(true);
            let _ = headers.insert(AUTHORIZATION, auth_val);
        }

        let client = reqwest::Client::builder().user_agent(USER_AGENT).default_headers(headers).build()?;

        Ok(Self {
            client,
            api_host: api_host.into(),
            org: org.into(),
            repo_cache: Mutex::new(HashMap::new()),
            release_cache: Mutex::new(HashMap::new()),
            readme_cache: Mutex::new(HashMap::new()),
        })
    }

    /// Fetch repository information for `repo`.
    pub async fn repo_info(&self, repo: &str) -> FetchResult<RepoInfo> {
        if let Some(hit) = cache_get(&self.repo_cache, repo, "repository info") {
            return hit;
        }

        let url = format!("{}/repos/{}/{repo}", self.api_host, self.org);
        let result = self.get_json::<RepoInfo>(&url, &format!("repository info for '{repo}'")).await;
        cache_put(&self.repo_cache, repo, result)
    }

    /// Fetch the latest release for `repo`. `NotFound` means the repository
    /// has no tagged releases, a valid state that is not logged as an error.
    pub async fn latest_release(&self, repo: &str) -> FetchResult<ReleaseInfo> {
        if let Some(hit) = cache_get(&self.release_cache, repo, "latest release") {
            return hit;
        }

        let url = format!("{}/repos/{}/{repo}/releases/latest", self.api_host, self.org);
        let result = self.get_json::<ReleaseInfo>(&url, &format!("latest release for '{repo}'")).await;
        cache_put(&self.release_cache, repo, result)
    }

    /// Fetch and decode the README for `repo`.
    pub async fn readme(&self, repo: &str) -> FetchResult<String> {
        if let Some(hit) = cache_get(&self.readme_cache, repo, "readme") {
            return hit;
        }

        let url = format!("{}/repos/{}/{repo}/readme", self.api_host, self.org);
        let result = match self.get_json::<ReadmePayload>(&url, &format!("readme for '{repo}'")).await {
            FetchResult::Found(payload) => decode_readme(&payload, repo),
            FetchResult::NotFound => FetchResult::NotFound,
            FetchResult::Error(e) => FetchResult::Error(e),
        };
        cache_put(&self.readme_cache, repo, result)
    }

    /// Perform one GET request and collapse every failure mode into a
    /// non-`Found` result. No retry: a single failed attempt is treated as
    /// "no data available" and recovery is deferred to the caller's fallback
    /// chain.
    async fn get_json<T: DeserializeOwned>(&self, url: &str, ctx: &str) -> FetchResult<T> {
        log::debug!(target: LOG_TARGET, "Querying GitHub for {ctx}");

        let resp = match self.client.get(url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                log::warn!(target: LOG_TARGET, "Could not fetch {ctx}: {e:#}");
                return FetchResult::Error(Arc::new(
                    ohno::AppError::from(e).enrich_with(|| format!("could not fetch {ctx}")),
                ));
            }
        };

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            log::debug!(target: LOG_TARGET, "No data for {ctx} (404)");
            return FetchResult::NotFound;
        }

        if !status.is_success() {
            log::warn!(target: LOG_TARGET, "Could not fetch {ctx}: HTTP {status}");
            return FetchResult::Error(Arc::new(ohno::app_err!("could not fetch {ctx}: HTTP {status}")));
        }

        match resp.json::<T>().await {
            Ok(data) => FetchResult::Found(data),
            Err(e) => {
                log::warn!(target: LOG_TARGET, "Malformed response for {ctx}: {e:#}");
                FetchResult::Error(Arc::new(
                    ohno::AppError::from(e).enrich_with(|| format!("malformed response for {ctx}")),
                ))
            }
        }
    }
}

/// Decode the README transfer encoding. GitHub wraps the base64 body with
/// newlines, so whitespace is stripped before decoding.
fn decode_readme(payload: &ReadmePayload, repo: &str) -> FetchResult<String> {
    if payload.encoding != "base64" {
        return FetchResult::Found(payload.content.clone());
    }

    let compact: String = payload.content.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    match base64::engine::general_purpose::STANDARD.decode(compact) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(text) => FetchResult::Found(text),
            Err(e) => {
                log::warn!(target: LOG_TARGET, "README for '{repo}' is not valid UTF-8: {e}");
                FetchResult::Error(Arc::new(ohno::app_err!("readme for '{repo}' is not valid UTF-8")))
            }
        },
        Err(e) => {
            log::warn!(target: LOG_TARGET, "Could not decode README for '{repo}': {e}");
            FetchResult::Error(Arc::new(ohno::app_err!("could not decode readme for '{repo}': {e}")))
        }
    }
}

fn cache_get<T: Clone>(cache: &Cache<T>, repo: &str, what: &str) -> Option<FetchResult<T>> {
    let map = cache.lock().expect("cache lock poisoned");
    let hit = map.get(repo).cloned();
    if hit.is_some() {
        log::debug!(target: LOG_TARGET, "Cache hit for {what} of '{repo}'");
    }
    hit
}

fn cache_put<T: Clone>(cache: &Cache<T>, repo: &str, result: FetchResult<T>) -> FetchResult<T> {
    let mut map = cache.lock().expect("cache lock poisoned");
    let _ = map.insert(Box::from(repo), result.clone());
    result
}

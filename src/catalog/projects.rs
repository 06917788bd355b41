use super::aggregator::{Aggregator, Detail};
use super::project::ProjectMetadata;
use crate::Result;
use crate::config::SiteConfig;
use futures_util::future::join_all;
use std::sync::Arc;
use tokio::sync::OnceCell;

const LOG_TARGET: &str = "   catalog";

/// Process-lifetime collection of aggregated project metadata.
///
/// The full list is aggregated concurrently on first use, preserving the
/// configured declaration order, and memoized so repeated page-generation
/// calls never re-trigger network activity.
#[derive(Debug)]
pub struct Catalog {
    config: Arc<SiteConfig>,
    aggregator: Aggregator,
    projects: OnceCell<Vec<ProjectMetadata>>,
}

impl Catalog {
    pub fn new(config: Arc<SiteConfig>, token: Option<&str>) -> Result<Self> {
        Ok(Self {
            aggregator: Aggregator::new(Arc::clone(&config), token)?,
            config,
            projects: OnceCell::new(),
        })
    }

    /// All configured projects in declaration order, aggregated in summary
    /// mode (no README fetches).
    pub async fn all_projects(&self) -> &[ProjectMetadata] {
        self.projects
            .get_or_init(|| async {
                log::info!(target: LOG_TARGET, "Aggregating metadata for {} projects", self.config.projects.len());

                join_all(
                    self.config
                        .projects
                        .iter()
                        .map(|p| self.aggregator.aggregate(&p.repo, Detail::Summary)),
                )
                .await
            })
            .await
    }

    /// Look up one project by its slug. `None` means the slug is unknown;
    /// consumers never see partial or error states.
    pub async fn project_by_slug(&self, slug: &str) -> Option<&ProjectMetadata> {
        self.all_projects().await.iter().find(|p| p.slug == slug)
    }

    /// Aggregate one project in detail mode, resolving README-backed
    /// sections. Repository and release lookups hit the in-memory caches
    /// when a summary pass already ran.
    pub async fn project_detail(&self, repo: &str) -> ProjectMetadata {
        self.aggregator.aggregate(repo, Detail::Full).await
    }
}

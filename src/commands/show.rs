use super::common::{CommonArgs, build_catalog};
use clap::Parser;
use ohno::{IntoAppError, bail};
use site_catalog::Result;

#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Slug of the project to show
    #[arg(value_name = "SLUG")]
    pub slug: String,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Aggregate one project in detail mode, resolving README-backed sections,
/// and print it as JSON.
pub async fn show_project(args: &ShowArgs) -> Result<()> {
    let catalog = build_catalog(&args.common)?;

    let Some(summary) = catalog.project_by_slug(&args.slug).await else {
        bail!("no project with slug '{}' is configured", args.slug);
    };

    let repo = summary.repo.clone();
    let detail = catalog.project_detail(&repo).await;

    let json = serde_json::to_string_pretty(&detail).into_app_err("unable to serialize project metadata")?;
    println!("{json}");

    Ok(())
}

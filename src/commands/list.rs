use super::common::{CommonArgs, build_catalog};
use clap::Parser;
use ohno::IntoAppError;
use site_catalog::Result;

#[derive(Parser, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

/// Aggregate every configured project and print the catalog as JSON, in
/// declaration order.
pub async fn list_projects(args: &ListArgs) -> Result<()> {
    let catalog = build_catalog(&args.common)?;
    let projects = catalog.all_projects().await;

    let json = serde_json::to_string_pretty(projects).into_app_err("unable to serialize project catalog")?;
    println!("{json}");

    Ok(())
}

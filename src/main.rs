//! A tool that aggregates live repository metadata for an organization's project showcase.
//!
//! # Overview
//!
//! `site-catalog` reads a list of projects from `site.toml`, enriches each
//! entry with data from the GitHub API (stars, forks, language, latest
//! release, README excerpts) and the crates.io registry, and emits the fully
//! resolved catalog as JSON for a static-site generator to render.
//!
//! Locally authored values in `site.toml` always win over fetched data, and
//! every remote failure degrades to a fallback, so a build never breaks on a
//! flaky API: a project is always rendered, with hardcoded defaults when all
//! data sources are unavailable.
//!
//! # Quick Start
//!
//! ```bash
//! site-catalog init          # write a starter site.toml
//! site-catalog list          # aggregate every project, print JSON
//! site-catalog show siderust # one project, with README-backed sections
//! ```
//!
//! # GitHub Integration
//!
//! Unauthenticated access works but is rate-limited. Provide a personal
//! access token for higher limits:
//!
//! ```bash
//! export GITHUB_TOKEN=ghp_xxxxxxxxxxxxxxxxxxxx
//! site-catalog list
//! ```
//!
//! # Configuration
//!
//! See the generated `site.toml` for the full override surface: display
//! name, description, status, features, docs/crate URLs, and the prose
//! sections shown on a project page. Only `repo` is required per project.

use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};
use site_catalog::Result;

mod commands;

use crate::commands::{InitArgs, ListArgs, ShowArgs, init_config, list_projects, show_project};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "site-catalog", version, about)]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Aggregate all configured projects and print the catalog as JSON
    List(ListArgs),
    /// Aggregate one project in detail mode and print it as JSON
    Show(ShowArgs),
    /// Generate a default site configuration file
    Init(InitArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    match Cli::parse().command {
        Command::List(args) => list_projects(&args).await,
        Command::Show(args) => show_project(&args).await,
        Command::Init(args) => init_config(&args),
    }
}

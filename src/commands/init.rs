use clap::Parser;
use ohno::{IntoAppError, bail};
use site_catalog::Result;
use site_catalog::config::DEFAULT_CONFIG_TOML;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Output configuration file path
    #[arg(value_name = "PATH", default_value = "site.toml")]
    pub output: PathBuf,

    /// Overwrite an existing configuration file
    #[arg(long)]
    pub force: bool,
}

pub fn init_config(args: &InitArgs) -> Result<()> {
    if args.output.exists() && !args.force {
        bail!("'{}' already exists; pass --force to overwrite", args.output.display());
    }

    fs::write(&args.output, DEFAULT_CONFIG_TOML)
        .into_app_err_with(|| format!("unable to write configuration file '{}'", args.output.display()))?;

    println!("Generated default configuration file: {}", args.output.display());
    Ok(())
}

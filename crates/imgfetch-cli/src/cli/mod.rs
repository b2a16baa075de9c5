//! CLI for the imgfetch image fetcher.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use imgfetch_core::config;
use imgfetch_core::FetchPolicy;

use commands::{run_cache_clear, run_cache_path, run_config, run_get};

/// Top-level CLI for imgfetch.
#[derive(Debug, Parser)]
#[command(name = "imgfetch")]
#[command(about = "imgfetch: fetch remote images once, cache them, fan them out", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch one or more images and report every delivery.
    Get(GetArgs),

    /// Inspect or clear the on-disk image cache.
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Print the effective configuration.
    Config,
}

#[derive(Debug, Args)]
pub struct GetArgs {
    /// Image URLs (http, https or file).
    #[arg(required = true, value_name = "URL")]
    pub urls: Vec<String>,

    /// Fetch policy: forced-reflush, caching or cool-time (default from config).
    #[arg(long, value_name = "POLICY")]
    pub policy: Option<FetchPolicy>,

    /// Request every URL N times, each for its own target, before waiting.
    #[arg(long, default_value = "1", value_name = "N")]
    pub repeat: usize,

    /// Cool time in minutes for new cache entries (overrides config).
    #[arg(long, value_name = "MINUTES")]
    pub cool_time: Option<u32>,

    /// Per-fetch deadline in seconds (overrides config).
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Do not read or write the disk cache.
    #[arg(long)]
    pub no_disk_cache: bool,
}

#[derive(Debug, Subcommand)]
pub enum CacheAction {
    /// Print the disk cache directory.
    Path,
    /// Delete every image in the disk cache.
    Clear,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Get(args) => run_get(&cfg, args).await?,
            CliCommand::Cache { action } => match action {
                CacheAction::Path => run_cache_path()?,
                CacheAction::Clear => run_cache_clear()?,
            },
            CliCommand::Config => run_config(&cfg)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;

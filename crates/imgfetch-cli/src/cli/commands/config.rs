//! `imgfetch config` – print the effective configuration.

use anyhow::Result;
use imgfetch_core::config::{self, ImgfetchConfig};

pub fn run_config(cfg: &ImgfetchConfig) -> Result<()> {
    println!("# {}", config::config_path()?.display());
    print!("{}", toml::to_string_pretty(cfg)?);
    if cfg.http.is_none() {
        println!("\n# [http] not set, using defaults:");
        print!("{}", toml::to_string_pretty(&cfg.http_or_default())?);
    }
    Ok(())
}

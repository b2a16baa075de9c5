//! `imgfetch cache` – inspect or clear the disk cache.

use anyhow::Result;
use imgfetch_core::persist::DiskPersistence;

pub fn run_cache_path() -> Result<()> {
    println!("{}", DiskPersistence::default_dir()?.display());
    Ok(())
}

pub fn run_cache_clear() -> Result<()> {
    let disk = DiskPersistence::open_default()?;
    let removed = disk.clear()?;
    tracing::info!(files = removed, dir = %disk.dir().display(), "cleared disk cache");
    println!("Removed {} cached image(s) from {}", removed, disk.dir().display());
    Ok(())
}

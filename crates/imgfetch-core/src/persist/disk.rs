//! PNG files under the XDG cache dir, one per URL.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

use crate::decoded::Image;

use super::Persistence;

/// Temporary file suffix used before atomic rename.
const TEMP_SUFFIX: &str = ".part";

/// Distinguishes temp files of concurrent saves for the same URL.
static NEXT_TEMP: AtomicU64 = AtomicU64::new(0);

/// File name for `url`: lowercase hex SHA-256 of the URL plus `.png`.
pub fn file_name_for_url(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    format!("{}.png", hex::encode(digest))
}

/// Disk-backed [`Persistence`] storing PNG files in a single directory.
#[derive(Debug, Clone)]
pub struct DiskPersistence {
    dir: PathBuf,
}

impl DiskPersistence {
    /// Default directory: `~/.cache/imgfetch/images`.
    pub fn default_dir() -> Result<PathBuf> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("imgfetch")?;
        Ok(xdg_dirs.get_cache_home().join("imgfetch").join("images"))
    }

    /// Use `dir` (created if needed).
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).with_context(|| format!("create dir: {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_dir()?)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, url: &str) -> PathBuf {
        self.dir.join(file_name_for_url(url))
    }

    /// Delete every stored image (and stray temp files). Returns how many files were removed.
    pub fn clear(&self) -> Result<usize> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(e) => e,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e).with_context(|| format!("read dir: {}", self.dir.display())),
        };
        let mut removed = 0;
        for entry in entries {
            let path = entry?.path();
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if !(name.ends_with(".png") || name.ends_with(TEMP_SUFFIX)) {
                continue;
            }
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => tracing::warn!(path = %path.display(), "could not delete cached file: {}", e),
            }
        }
        Ok(removed)
    }
}

impl Persistence for DiskPersistence {
    fn load(&self, url: &str) -> Result<Option<(Image, SystemTime)>> {
        let path = self.path_for(url);
        let bytes = match fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).with_context(|| format!("read cached image: {}", path.display())),
        };
        let stored_at = fs::metadata(&path)
            .and_then(|m| m.modified())
            .with_context(|| format!("stat cached image: {}", path.display()))?;
        let image = Image::decode(&bytes)
            .with_context(|| format!("decode cached image: {}", path.display()))?;
        Ok(Some((image, stored_at)))
    }

    fn save(&self, url: &str, image: &Image) -> Result<()> {
        let path = self.path_for(url);
        let mut tmp = path.clone().into_os_string();
        tmp.push(format!(".{}{}", NEXT_TEMP.fetch_add(1, Ordering::Relaxed), TEMP_SUFFIX));
        let tmp = PathBuf::from(tmp);

        let png = image.encode_png().context("encode png")?;
        fs::write(&tmp, png).with_context(|| format!("write {}", tmp.display()))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("failed to rename {} to {}", tmp.display(), path.display()))?;
        Ok(())
    }

    fn remove(&self, url: &str) -> Result<bool> {
        let path = self.path_for(url);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("delete {}", path.display())),
        }
    }
}

//! Version-keyed on-disk preview cache.
//!
//! Sanitizing and compositing large payloads is expensive, so finished
//! textures are cached as PNG files keyed by the engine version and an
//! object name. Entries written by a different engine version are swept on
//! startup; corrupt entries are deleted the first time a load fails.

use crate::error::{AtlasError, Result};
use crate::pixel::{PixelBuffer, Rgba8};
use emblem_common::cache_prefix;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File-name prefix shared by all cache entries across versions.
const CACHE_STEM: &str = "em_v";

/// A directory of version-keyed PNG cache entries.
#[derive(Debug, Clone)]
pub struct PreviewCache {
    dir: PathBuf,
}

impl PreviewCache {
    /// Opens a cache rooted at `dir`. The directory is created if missing.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| AtlasError::Cache {
            name: dir.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { dir })
    }

    /// Full path of the cache entry for `name` under the running version.
    #[must_use]
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}_{name}.png", cache_prefix()))
    }

    /// Writes a buffer as a PNG cache entry.
    pub fn store(&self, name: &str, buf: &PixelBuffer) -> Result<()> {
        let mut img = image::RgbaImage::new(buf.width(), buf.height());
        for y in 0..buf.height() {
            for x in 0..buf.width() {
                let p = buf.get(x, buf.height() - 1 - y);
                img.put_pixel(x, y, image::Rgba([p.r, p.g, p.b, p.a]));
            }
        }
        img.save(self.path_for(name)).map_err(|e| AtlasError::Cache {
            name: name.to_owned(),
            reason: e.to_string(),
        })
    }

    /// Loads a cache entry, if present and readable. A file that exists but
    /// fails to decode is deleted so it is rebuilt instead of retried.
    #[must_use]
    pub fn load(&self, name: &str) -> Option<PixelBuffer> {
        let path = self.path_for(name);
        if !path.exists() {
            return None;
        }
        match Self::read_png(&path) {
            Ok(buf) => Some(buf),
            Err(err) => {
                debug!(name, error = %err, "corrupt cache entry, deleting");
                let _ = fs::remove_file(&path);
                None
            }
        }
    }

    fn read_png(path: &Path) -> std::result::Result<PixelBuffer, image::ImageError> {
        let img = image::open(path)?.to_rgba8();
        let (w, h) = img.dimensions();
        let mut buf = PixelBuffer::new(w, h);
        for (x, y, pixel) in img.enumerate_pixels() {
            let [r, g, b, a] = pixel.0;
            buf.set(x, h - 1 - y, Rgba8::new(r, g, b, a));
        }
        Ok(buf)
    }

    /// Deletes entries written by other engine versions. Returns how many
    /// files were removed.
    pub fn sweep_stale(&self) -> Result<usize> {
        let current = format!("{}_", cache_prefix());
        let mut removed = 0;

        let entries = fs::read_dir(&self.dir).map_err(|e| AtlasError::Cache {
            name: self.dir.display().to_string(),
            reason: e.to_string(),
        })?;

        for entry in entries.flatten() {
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if name.starts_with(CACHE_STEM)
                && name.ends_with(".png")
                && !name.starts_with(&current)
                && fs::remove_file(entry.path()).is_ok()
            {
                removed += 1;
            }
        }

        if removed > 0 {
            info!(removed, "swept stale cache entries");
        }
        Ok(removed)
    }
}

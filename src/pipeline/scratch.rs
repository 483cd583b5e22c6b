use std::{
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::foundation::error::{SlidewaveError, SlidewaveResult};

pub const LOCK_FILE: &str = ".slidewave.lock";
pub const IMAGES_DIR: &str = "images";
pub const AUDIO_DIR: &str = "audio";

/// Exclusive handle on a scratch root holding the intermediate slide images and audio.
///
/// The lock is an advisory file lock held for the life of the handle, so at most one batch
/// uses a given root at a time.
#[derive(Debug)]
pub struct ScratchDirs {
    root: PathBuf,
    images: PathBuf,
    audio: PathBuf,
    _lock: File,
}

impl ScratchDirs {
    pub fn acquire(root: &Path) -> SlidewaveResult<Self> {
        std::fs::create_dir_all(root)
            .with_context(|| format!("create scratch root '{}'", root.display()))?;

        let lock_path = root.join(LOCK_FILE);
        let lock = File::options()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .with_context(|| format!("open scratch lock '{}'", lock_path.display()))?;
        fs4::FileExt::try_lock_exclusive(&lock).map_err(|e| {
            SlidewaveError::busy(format!(
                "'{}' is in use by another run ({e})",
                root.display()
            ))
        })?;

        let images = root.join(IMAGES_DIR);
        let audio = root.join(AUDIO_DIR);
        for dir in [&images, &audio] {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("create scratch dir '{}'", dir.display()))?;
        }

        tracing::debug!(root = %root.display(), "scratch acquired");
        Ok(Self {
            root: root.to_path_buf(),
            images,
            audio,
            _lock: lock,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn images_dir(&self) -> &Path {
        &self.images
    }

    pub fn audio_dir(&self) -> &Path {
        &self.audio
    }

    /// Empty both scratch areas. Returns the number of entries removed.
    pub fn purge(&self) -> SlidewaveResult<usize> {
        let mut removed = 0;
        for dir in [&self.images, &self.audio] {
            removed += purge_dir(dir)?;
        }
        tracing::info!(removed, root = %self.root.display(), "scratch purged");
        Ok(removed)
    }
}

fn purge_dir(dir: &Path) -> SlidewaveResult<usize> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("read scratch dir '{}'", dir.display()))?;
    let mut removed = 0;
    for entry in entries {
        let path = entry
            .with_context(|| format!("read scratch dir '{}'", dir.display()))?
            .path();
        let res = if path.is_dir() {
            std::fs::remove_dir_all(&path)
        } else {
            std::fs::remove_file(&path)
        };
        res.with_context(|| format!("remove stale '{}'", path.display()))?;
        removed += 1;
    }
    Ok(removed)
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/scratch.rs"]
mod tests;

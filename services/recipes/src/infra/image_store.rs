use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use anyhow::Context as _;
use uuid::Uuid;

use crate::domain::image::ImagePayload;
use crate::domain::repository::ImageStore;
use crate::error::RecipesServiceError;

const IMAGE_DIR: &str = "recipes/images";

/// Stores recipe images under `root`, the directory served at the media URL.
#[derive(Clone)]
pub struct FsImageStore {
    pub root: PathBuf,
}

impl FsImageStore {
    /// Resolve a stored relative path, refusing anything that escapes the root.
    fn resolve(&self, relative: &str) -> Option<PathBuf> {
        let relative = Path::new(relative);
        relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
            .then(|| self.root.join(relative))
    }
}

impl ImageStore for FsImageStore {
    async fn save(&self, image: &ImagePayload) -> Result<String, RecipesServiceError> {
        let relative = format!("{IMAGE_DIR}/{}.{}", Uuid::now_v7(), image.extension);
        let path = self.root.join(&relative);
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .context("create image directory")?;
        }
        tokio::fs::write(&path, &image.bytes)
            .await
            .with_context(|| format!("write image {}", path.display()))?;
        Ok(relative)
    }

    async fn delete(&self, path: &str) -> Result<(), RecipesServiceError> {
        let Some(full) = self.resolve(path) else {
            tracing::warn!(path, "refusing to delete image outside media root");
            return Ok(());
        };
        match tokio::fs::remove_file(&full).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("delete image {}", full.display()))
                .into()),
        }
    }
}

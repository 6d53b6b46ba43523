//! Store file persistence
//!
//! Load-mutate-save against a single JSON file. Saves go through a
//! temporary file in the same directory followed by a rename, so a failed
//! write leaves the previous file intact.

use std::path::{Path, PathBuf};

use crate::error::{StudioError, StudioResult};
use crate::store::schema::{PreviewSet, PreviewSetPatch, PreviewStore, SettingsPatch, StoreSettings};

/// Handle on the persisted store file.
#[derive(Debug, Clone)]
pub struct PreviewStoreFile {
    path: PathBuf,
}

impl PreviewStoreFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted store, or a default-initialized one when the file
    /// does not exist yet. A file that exists but fails to parse is an
    /// error, never silently replaced.
    pub async fn load(&self) -> StudioResult<PreviewStore> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                serde_json::from_slice(&bytes).map_err(|e| StudioError::StoreCorrupted {
                    path: self.path.clone(),
                    message: e.to_string(),
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(PreviewStore::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write the full store back, atomically with respect to readers.
    pub async fn save(&self, store: &PreviewStore) -> StudioResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(store)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        tracing::debug!("Saved store with {} previews to {}", store.previews.len(), self.path.display());
        Ok(())
    }

    /// Append a preview set, preserving insertion order.
    pub async fn append(&self, preview: PreviewSet) -> StudioResult<PreviewSet> {
        let mut store = self.load().await?;
        store.previews.push(preview.clone());
        self.save(&store).await?;
        Ok(preview)
    }

    /// Remove a preview set by id.
    pub async fn remove(&self, id: &str) -> StudioResult<()> {
        let mut store = self.load().await?;
        let before = store.previews.len();
        store.previews.retain(|p| p.id != id);
        if store.previews.len() == before {
            return Err(StudioError::PreviewNotFound(id.to_string()));
        }
        self.save(&store).await?;
        Ok(())
    }

    /// Apply a partial update to a preview set in place; only supplied
    /// fields change and the record keeps its position.
    pub async fn update(&self, id: &str, patch: PreviewSetPatch) -> StudioResult<PreviewSet> {
        let mut store = self.load().await?;
        let preview = store
            .previews
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StudioError::PreviewNotFound(id.to_string()))?;

        if let Some(path) = patch.screenshot_path {
            preview.screenshot_path = path;
        }
        if let Some(title) = patch.title {
            preview.title = title;
        }
        if let Some(subtitle) = patch.subtitle {
            preview.subtitle = subtitle;
        }
        if let Some(device_id) = patch.device_id {
            preview.device_id = Some(device_id);
        }
        if let Some(palette_id) = patch.palette_id {
            preview.palette_id = Some(palette_id);
        }

        let updated = preview.clone();
        self.save(&store).await?;
        Ok(updated)
    }

    /// Drop all preview sets, keeping settings. Idempotent.
    pub async fn clear(&self) -> StudioResult<usize> {
        let mut store = self.load().await?;
        let removed = store.previews.len();
        store.previews.clear();
        self.save(&store).await?;
        Ok(removed)
    }

    /// Current settings verbatim.
    pub async fn settings(&self) -> StudioResult<StoreSettings> {
        Ok(self.load().await?.settings)
    }

    /// Apply a partial settings update; omitted fields are untouched.
    pub async fn update_settings(&self, patch: SettingsPatch) -> StudioResult<StoreSettings> {
        let mut store = self.load().await?;

        if let Some(device_id) = patch.default_device_id {
            store.settings.default_device_id = device_id;
        }
        if let Some(palette_id) = patch.default_palette_id {
            store.settings.default_palette_id = palette_id;
        }
        if let Some(dir) = patch.output_directory {
            store.settings.output_directory = dir;
        }
        if let Some(language) = patch.language {
            store.settings.language = language;
        }

        self.save(&store).await?;
        Ok(store.settings)
    }
}

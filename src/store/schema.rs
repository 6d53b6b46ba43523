//! Persisted store types
//!
//! Field names stay camelCase on disk so existing store files and the
//! renderer's payload reader keep working.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

use crate::paths::default_output_directory;

/// Factory default canonical device identifier (large phone class).
pub const DEFAULT_DEVICE_ID: &str = "phone-6-9";

/// Factory default palette.
pub const DEFAULT_PALETTE_ID: &str = "midnight";

/// Factory default language tag.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// One screenshot plus its marketing copy; the unit the renderer consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewSet {
    pub id: String,
    pub screenshot_path: PathBuf,
    pub title: String,
    pub subtitle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub palette_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PreviewSet {
    /// Build a new record with a fresh id and timestamp.
    pub fn new(
        screenshot_path: PathBuf,
        title: String,
        subtitle: String,
        device_id: Option<String>,
        palette_id: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            screenshot_path,
            title,
            subtitle,
            device_id,
            palette_id,
            created_at: Utc::now(),
        }
    }
}

/// Partial update for a preview set; only supplied fields change.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PreviewSetPatch {
    pub screenshot_path: Option<PathBuf>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub device_id: Option<String>,
    pub palette_id: Option<String>,
}

/// Partial settings update; omitted fields keep their prior value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SettingsPatch {
    pub default_device_id: Option<String>,
    pub default_palette_id: Option<String>,
    pub output_directory: Option<PathBuf>,
    pub language: Option<String>,
}

/// User settings; missing fields in an older store file get the factory
/// defaults on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSettings {
    #[serde(default = "default_device_id")]
    pub default_device_id: String,
    #[serde(default = "default_palette_id")]
    pub default_palette_id: String,
    #[serde(default = "default_output_directory")]
    pub output_directory: PathBuf,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_device_id() -> String {
    DEFAULT_DEVICE_ID.to_string()
}

fn default_palette_id() -> String {
    DEFAULT_PALETTE_ID.to_string()
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            default_device_id: default_device_id(),
            default_palette_id: default_palette_id(),
            output_directory: default_output_directory(),
            language: default_language(),
        }
    }
}

/// Root persisted aggregate: ordered previews plus settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreviewStore {
    #[serde(default)]
    pub previews: Vec<PreviewSet>,
    #[serde(default)]
    pub settings: StoreSettings,
}

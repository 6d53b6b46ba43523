//! Per-user filesystem locations
//!
//! Everything the tool writes lives under one data directory: the store
//! file, the captured screenshots, and the render-request handoff file.

use std::path::PathBuf;

/// Directory name under the platform data dir
const APP_DIR: &str = "preview-studio";

/// Well-known file names inside the data directory
const STORE_FILE: &str = "store.json";
const RENDER_REQUEST_FILE: &str = "render-request.json";
const SCREENSHOTS_DIR: &str = "screenshots";

/// Resolved locations for the store, screenshots and handoff payload.
#[derive(Debug, Clone)]
pub struct StudioPaths {
    pub data_dir: PathBuf,
    pub store_path: PathBuf,
    pub screenshots_dir: PathBuf,
    pub render_request_path: PathBuf,
}

impl StudioPaths {
    /// Locations under the per-user data directory (e.g.
    /// `~/Library/Application Support/preview-studio` on macOS).
    pub fn default_locations() -> Self {
        let base = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::under(base.join(APP_DIR))
    }

    /// All locations rooted at an explicit directory. Tests use this with a
    /// tempdir.
    pub fn under(data_dir: PathBuf) -> Self {
        Self {
            store_path: data_dir.join(STORE_FILE),
            screenshots_dir: data_dir.join(SCREENSHOTS_DIR),
            render_request_path: data_dir.join(RENDER_REQUEST_FILE),
            data_dir,
        }
    }
}

/// Default output directory offered in factory settings, under the user's
/// home area rather than the data dir so exported images are easy to find.
pub fn default_output_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("PreviewStudio")
}

//! Capture orchestration
//!
//! Sequences launch/wait/capture/terminate steps against discovered
//! targets and turns each successful capture into a persisted preview
//! set. The orchestrator talks to the OS only through the capability
//! traits, and it converts every component failure into a structured
//! [`StudioError`] at its boundary.

pub mod capture;
pub mod workflow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

use crate::automation::{Capturer, Launcher, TargetLister};
use crate::devices::{select_default_target, CaptureTarget};
use crate::error::{StudioError, StudioResult};
use crate::paths::StudioPaths;
use crate::store::PreviewStoreFile;

pub use capture::{
    CaptureOutcome, CaptureRequest, LaunchCaptureOutcome, LaunchCaptureRequest, ScreenSpec,
    ScreensOutcome, ScreensRequest,
};
pub use workflow::{CopyEntry, CreateOutcome, CreateRequest, HandoffResult};

/// Default wait after launching an app before the first capture.
pub const DEFAULT_LAUNCH_DELAY_MS: u64 = 3_000;

/// Default wait between screens in a multi-screen capture.
pub const DEFAULT_SCREEN_DELAY_MS: u64 = 2_000;

/// Caller-facing platform choice; `Auto` defers to detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformChoice {
    #[default]
    Auto,
    Desktop,
    Mobile,
}

/// Where an application was actually found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Desktop,
    Mobile,
}

/// Advisory continuity hint: the most recently launched target. Callers
/// pass the previous snapshot back in; operations that launch return a
/// fresh one. Never required for correctness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub target_handle: String,
    pub app_id: String,
    pub launched_at: DateTime<Utc>,
}

impl SessionSnapshot {
    fn now(target_handle: &str, app_id: &str) -> Self {
        Self {
            target_handle: target_handle.to_string(),
            app_id: app_id.to_string(),
            launched_at: Utc::now(),
        }
    }
}

/// The orchestration core. Owns the store handle and the capability
/// implementations; each public operation runs to completion before the
/// next is accepted (single-process, no concurrent workflows).
pub struct Orchestrator {
    store: PreviewStoreFile,
    paths: StudioPaths,
    lister: Arc<dyn TargetLister>,
    capturer: Arc<dyn Capturer>,
    launcher: Arc<dyn Launcher>,
}

impl Orchestrator {
    pub fn new(
        paths: StudioPaths,
        lister: Arc<dyn TargetLister>,
        capturer: Arc<dyn Capturer>,
        launcher: Arc<dyn Launcher>,
    ) -> Self {
        Self {
            store: PreviewStoreFile::new(paths.store_path.clone()),
            paths,
            lister,
            capturer,
            launcher,
        }
    }

    pub fn store(&self) -> &PreviewStoreFile {
        &self.store
    }

    pub fn paths(&self) -> &StudioPaths {
        &self.paths
    }

    /// Enumerate booted targets. An enumeration failure is
    /// `DiscoveryUnavailable`; an empty list is a valid result.
    pub async fn list_targets(&self) -> StudioResult<Vec<CaptureTarget>> {
        self.lister
            .list_targets()
            .await
            .map_err(|e| StudioError::DiscoveryUnavailable(e.to_string()))
    }

    /// Classify an application identifier. Each probe is best-effort:
    /// probe failures degrade to "not found" rather than erroring.
    pub async fn detect_platform(&self, app_id: &str) -> StudioResult<Option<Platform>> {
        if self.launcher.is_desktop_app(app_id).await {
            return Ok(Some(Platform::Desktop));
        }

        let targets = self.lister.list_targets().await.unwrap_or_default();
        for target in &targets {
            if self
                .launcher
                .is_installed_on_target(&target.handle, app_id)
                .await
            {
                return Ok(Some(Platform::Mobile));
            }
        }

        Ok(None)
    }

    /// Resolve a concrete target: an explicit handle must currently be
    /// discovered; otherwise the highest-priority booted target wins.
    pub(crate) fn resolve_target(
        targets: &[CaptureTarget],
        explicit: Option<&str>,
    ) -> StudioResult<CaptureTarget> {
        match explicit {
            Some(handle) => targets
                .iter()
                .find(|t| t.handle == handle)
                .cloned()
                .ok_or_else(|| StudioError::TargetNotFound(handle.to_string())),
            None => select_default_target(targets)
                .cloned()
                .ok_or(StudioError::NoTargetAvailable),
        }
    }

    /// Pick the target to launch on: explicit handle > a target already
    /// hosting the app > the session-snapshot target if still booted >
    /// first discovered.
    pub(crate) async fn resolve_launch_target(
        &self,
        targets: &[CaptureTarget],
        explicit: Option<&str>,
        app_id: &str,
        session: Option<&SessionSnapshot>,
    ) -> StudioResult<CaptureTarget> {
        if let Some(handle) = explicit {
            return targets
                .iter()
                .find(|t| t.handle == handle)
                .cloned()
                .ok_or_else(|| StudioError::TargetNotFound(handle.to_string()));
        }
        if targets.is_empty() {
            return Err(StudioError::NoTargetAvailable);
        }

        for target in targets {
            if self
                .launcher
                .is_installed_on_target(&target.handle, app_id)
                .await
            {
                return Ok(target.clone());
            }
        }

        if let Some(snapshot) = session {
            if let Some(target) = targets.iter().find(|t| t.handle == snapshot.target_handle) {
                return Ok(target.clone());
            }
        }

        Ok(targets[0].clone())
    }

    /// Build a unique destination path under the screenshots directory,
    /// creating it on demand.
    pub(crate) async fn screenshot_path(&self, label: &str) -> StudioResult<PathBuf> {
        tokio::fs::create_dir_all(&self.paths.screenshots_dir).await?;
        let stamp = Utc::now().format("%Y%m%d-%H%M%S%.3f");
        let file = format!("{}-{stamp}.png", sanitize(label));
        Ok(self.paths.screenshots_dir.join(file))
    }

    /// The success signal for every capture: the file must exist, even
    /// when the primitive reported success.
    pub(crate) async fn require_file(path: PathBuf) -> StudioResult<PathBuf> {
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            Ok(path)
        } else {
            Err(StudioError::CaptureProducedNoFile(path))
        }
    }
}

/// Reduce a target name to filesystem-safe characters.
fn sanitize(label: &str) -> String {
    label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .trim_matches('-')
        .to_string()
}

#[cfg(test)]
pub(crate) mod testing;

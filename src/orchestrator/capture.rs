//! Single-shot, launch-and-capture and multi-screen capture flows

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::devices::{map_target_to_device_id, CaptureTarget, DESKTOP_DEVICE_ID};
use crate::error::{StudioError, StudioResult};
use crate::orchestrator::{
    Orchestrator, Platform, PlatformChoice, SessionSnapshot, DEFAULT_LAUNCH_DELAY_MS,
    DEFAULT_SCREEN_DELAY_MS,
};
use crate::store::PreviewSet;

/// Arguments for a plain screenshot of a booted target.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CaptureRequest {
    /// Explicit target handle; defaults to the highest-priority booted
    /// target.
    pub target: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    pub device_id: Option<String>,
    pub palette_id: Option<String>,
}

/// A persisted capture plus the target it came from.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureOutcome {
    pub preview: PreviewSet,
    pub target_name: String,
}

/// Arguments for launch-and-capture.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LaunchCaptureRequest {
    pub app_id: String,
    #[serde(default)]
    pub platform: PlatformChoice,
    pub target: Option<String>,
    /// Wait after launch before capturing, in milliseconds.
    pub delay_ms: Option<u64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    pub device_id: Option<String>,
    pub palette_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchCaptureOutcome {
    pub preview: PreviewSet,
    pub platform: Platform,
    pub target_name: String,
    /// Present after a successful mobile launch; advisory continuity hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionSnapshot>,
}

/// One screen in a multi-screen capture.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ScreenSpec {
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    /// Wait before capturing this screen (screens after the first).
    pub delay_ms: Option<u64>,
    pub palette_id: Option<String>,
}

/// Arguments for a multi-screen capture session.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ScreensRequest {
    pub app_id: String,
    #[serde(default)]
    pub platform: PlatformChoice,
    pub target: Option<String>,
    /// Wait after the initial launch, before the first screen.
    pub delay_ms: Option<u64>,
    pub device_id: Option<String>,
    pub screens: Vec<ScreenSpec>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreensOutcome {
    /// Screens that actually produced a file.
    pub captured: usize,
    /// Screens skipped because their capture produced nothing.
    pub skipped: usize,
    pub previews: Vec<PreviewSet>,
    pub platform: Platform,
    pub target_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionSnapshot>,
}

/// The resolved launch phase shared by the launch-and-capture flows.
pub(crate) struct LaunchedApp {
    pub platform: Platform,
    /// None for desktop launches.
    pub target: Option<CaptureTarget>,
    pub session: Option<SessionSnapshot>,
}

impl Orchestrator {
    /// Capture the current screen of a booted target and persist it as a
    /// new preview set. Fails the whole operation on any step; no retry.
    pub async fn capture_once(&self, req: CaptureRequest) -> StudioResult<CaptureOutcome> {
        let targets = self.list_targets().await?;
        let target = Self::resolve_target(&targets, req.target.as_deref())?;

        let dest = self.screenshot_path(&target.name).await?;
        tracing::info!("Capturing {} to {}", target.name, dest.display());
        self.capturer
            .capture_target(&target.handle, &dest)
            .await
            .map_err(|e| StudioError::CaptureFailed {
                target: target.name.clone(),
                message: e.to_string(),
            })?;
        let dest = Self::require_file(dest).await?;

        let device_id = match req.device_id {
            Some(id) => id,
            None => map_target_to_device_id(&target.name).to_string(),
        };
        let palette_id = match req.palette_id {
            Some(id) => id,
            None => self.store().settings().await?.default_palette_id,
        };

        let preview = self
            .store()
            .append(PreviewSet::new(
                dest,
                req.title,
                req.subtitle,
                Some(device_id),
                Some(palette_id),
            ))
            .await?;

        Ok(CaptureOutcome {
            preview,
            target_name: target.name,
        })
    }

    /// Launch an app, wait, then capture it. Desktop apps are captured by
    /// window; mobile apps get a terminate-then-launch for a clean state.
    pub async fn launch_and_capture(
        &self,
        req: LaunchCaptureRequest,
        session: Option<SessionSnapshot>,
    ) -> StudioResult<LaunchCaptureOutcome> {
        let delay = Duration::from_millis(req.delay_ms.unwrap_or(DEFAULT_LAUNCH_DELAY_MS));
        let launched = self
            .launch_app(&req.app_id, req.platform, req.target.as_deref(), session.as_ref())
            .await?;
        tokio::time::sleep(delay).await;

        let (dest, target_name, device_id) = match &launched.target {
            Some(target) => {
                let dest = self.capture_target_screen(target).await?;
                let device_id = req
                    .device_id
                    .unwrap_or_else(|| map_target_to_device_id(&target.name).to_string());
                (dest, target.name.clone(), device_id)
            }
            None => {
                let dest = self.capture_desktop_window(&req.app_id).await?;
                let device_id = req.device_id.unwrap_or_else(|| DESKTOP_DEVICE_ID.to_string());
                (dest, req.app_id.clone(), device_id)
            }
        };

        let palette_id = match req.palette_id {
            Some(id) => id,
            None => self.store().settings().await?.default_palette_id,
        };
        let preview = self
            .store()
            .append(PreviewSet::new(
                dest,
                req.title,
                req.subtitle,
                Some(device_id),
                Some(palette_id),
            ))
            .await?;

        Ok(LaunchCaptureOutcome {
            preview,
            platform: launched.platform,
            target_name,
            session: launched.session,
        })
    }

    /// One launch/terminate cycle, then sequential captures of each
    /// declared screen. A screen whose capture produces no file is
    /// skipped with a warning; the remaining screens still run. This
    /// skip-and-continue policy is deliberate and differs from
    /// [`Orchestrator::capture_once`], which fails the whole operation.
    pub async fn capture_app_screens(
        &self,
        req: ScreensRequest,
        session: Option<SessionSnapshot>,
    ) -> StudioResult<ScreensOutcome> {
        let load_delay = Duration::from_millis(req.delay_ms.unwrap_or(DEFAULT_LAUNCH_DELAY_MS));
        let launched = self
            .launch_app(&req.app_id, req.platform, req.target.as_deref(), session.as_ref())
            .await?;
        tokio::time::sleep(load_delay).await;

        let default_device_id = req.device_id.unwrap_or_else(|| match &launched.target {
            Some(target) => map_target_to_device_id(&target.name).to_string(),
            None => DESKTOP_DEVICE_ID.to_string(),
        });
        let default_palette = self.store().settings().await?.default_palette_id;
        let target_name = launched
            .target
            .as_ref()
            .map(|t| t.name.clone())
            .unwrap_or_else(|| req.app_id.clone());

        let mut previews = Vec::new();
        let mut skipped = 0usize;
        for (index, screen) in req.screens.iter().enumerate() {
            if index > 0 {
                let wait =
                    Duration::from_millis(screen.delay_ms.unwrap_or(DEFAULT_SCREEN_DELAY_MS));
                tokio::time::sleep(wait).await;
            }

            let captured = match &launched.target {
                Some(target) => self.capture_target_screen(target).await,
                None => self.capture_desktop_window(&req.app_id).await,
            };
            let dest = match captured {
                Ok(dest) => dest,
                Err(e) => {
                    tracing::warn!("Skipping screen {} ({}): {}", index + 1, screen.title, e);
                    skipped += 1;
                    continue;
                }
            };

            let preview = self
                .store()
                .append(PreviewSet::new(
                    dest,
                    screen.title.clone(),
                    screen.subtitle.clone(),
                    Some(default_device_id.clone()),
                    Some(screen.palette_id.clone().unwrap_or_else(|| default_palette.clone())),
                ))
                .await?;
            previews.push(preview);
        }

        Ok(ScreensOutcome {
            captured: previews.len(),
            skipped,
            previews,
            platform: launched.platform,
            target_name,
            session: launched.session,
        })
    }

    /// Shared launch phase: resolve the platform, then launch the app on
    /// the right surface. Mobile launches terminate first for a clean
    /// state; termination failures are swallowed since the app may simply
    /// not have been running.
    pub(crate) async fn launch_app(
        &self,
        app_id: &str,
        choice: PlatformChoice,
        explicit_target: Option<&str>,
        session: Option<&SessionSnapshot>,
    ) -> StudioResult<LaunchedApp> {
        let platform = match choice {
            PlatformChoice::Desktop => Platform::Desktop,
            PlatformChoice::Mobile => Platform::Mobile,
            PlatformChoice::Auto => self
                .detect_platform(app_id)
                .await?
                .ok_or_else(|| StudioError::AppNotFound(app_id.to_string()))?,
        };

        match platform {
            Platform::Desktop => {
                self.launcher
                    .launch_desktop(app_id)
                    .await
                    .map_err(|e| StudioError::LaunchFailed {
                        app_id: app_id.to_string(),
                        message: e.to_string(),
                    })?;
                Ok(LaunchedApp {
                    platform,
                    target: None,
                    session: None,
                })
            }
            Platform::Mobile => {
                let targets = self.list_targets().await?;
                let target = self
                    .resolve_launch_target(&targets, explicit_target, app_id, session)
                    .await?;

                if let Err(e) = self
                    .launcher
                    .terminate_on_target(&target.handle, app_id)
                    .await
                {
                    tracing::debug!("Terminate before launch ignored: {}", e);
                }
                self.launcher
                    .launch_on_target(&target.handle, app_id)
                    .await
                    .map_err(|e| StudioError::LaunchFailed {
                        app_id: app_id.to_string(),
                        message: e.to_string(),
                    })?;

                let session = SessionSnapshot::now(&target.handle, app_id);
                tracing::info!("Launched {} on {}", app_id, target.name);
                Ok(LaunchedApp {
                    platform,
                    target: Some(target),
                    session: Some(session),
                })
            }
        }
    }

    /// Capture a booted target's screen and verify the file materialized.
    async fn capture_target_screen(&self, target: &CaptureTarget) -> StudioResult<std::path::PathBuf> {
        let dest = self.screenshot_path(&target.name).await?;
        self.capturer
            .capture_target(&target.handle, &dest)
            .await
            .map_err(|e| StudioError::CaptureFailed {
                target: target.name.clone(),
                message: e.to_string(),
            })?;
        Self::require_file(dest).await
    }

    /// Capture a desktop app window. Strategy selection (window id vs
    /// bring-to-front fallback) lives in the capturer; the existence
    /// check here is the actual success signal.
    async fn capture_desktop_window(&self, app_id: &str) -> StudioResult<std::path::PathBuf> {
        let dest = self.screenshot_path(app_id).await?;
        self.capturer
            .capture_window(app_id, &dest)
            .await
            .map_err(|e| StudioError::CaptureFailed {
                target: app_id.to_string(),
                message: e.to_string(),
            })?;
        Self::require_file(dest).await
    }
}

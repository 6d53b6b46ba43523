//! Full preview workflow
//!
//! Resets the collection, captures one preview set per copy entry, then
//! hands the result off to the renderer application.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{StudioError, StudioResult};
use crate::orchestrator::capture::{ScreenSpec, ScreensRequest};
use crate::orchestrator::{Orchestrator, Platform, PlatformChoice, SessionSnapshot};
use crate::store::PreviewSet;

/// Bundle identifier of the external renderer application.
pub const RENDERER_APP_ID: &str = "com.crafterstation.preview-renderer";

/// Palettes cycled by position when a copy entry does not name one.
pub const PALETTE_CYCLE: &[&str] = &["midnight", "sunrise", "forest", "ocean"];

/// Marketing copy for one preview in the full workflow.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CopyEntry {
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    pub palette_id: Option<String>,
    pub delay_ms: Option<u64>,
}

/// Arguments for the full create-previews workflow.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateRequest {
    pub app_id: String,
    #[serde(default)]
    pub platform: PlatformChoice,
    pub target: Option<String>,
    pub delay_ms: Option<u64>,
    pub device_id: Option<String>,
    pub language: Option<String>,
    /// Marketing copy, one entry per preview. When absent the workflow
    /// stops after the reset and asks the caller to supply it.
    pub copy: Option<Vec<CopyEntry>>,
    /// Required: the workflow starts by clearing all existing previews.
    #[serde(default)]
    pub confirm: bool,
}

/// How the handoff to the renderer ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HandoffResult {
    /// The renderer application was activated.
    Activated,
    /// The renderer was not present; the data directory was revealed
    /// instead.
    Revealed,
}

/// Result of the full workflow.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CreateOutcome {
    /// The reset ran but no copy was supplied; the caller should retry
    /// with `copy` filled in.
    #[serde(rename_all = "camelCase")]
    CopyRequired {
        copy_required: bool,
        platform: Platform,
    },
    #[serde(rename_all = "camelCase")]
    Done {
        captured: usize,
        skipped: usize,
        previews: Vec<PreviewSet>,
        platform: Platform,
        handoff: HandoffResult,
        #[serde(skip_serializing_if = "Option::is_none")]
        session: Option<SessionSnapshot>,
    },
}

impl Orchestrator {
    /// Full workflow: reset, capture one preview per copy entry, persist,
    /// hand off to the renderer. Destructive, so it requires `confirm`.
    pub async fn create_app_previews(
        &self,
        req: CreateRequest,
        session: Option<SessionSnapshot>,
    ) -> StudioResult<CreateOutcome> {
        if !req.confirm {
            return Err(StudioError::ConfirmationRequired("create_app_previews"));
        }

        self.reset_previews().await?;

        let platform = match req.platform {
            PlatformChoice::Desktop => Platform::Desktop,
            PlatformChoice::Mobile => Platform::Mobile,
            PlatformChoice::Auto => self
                .detect_platform(&req.app_id)
                .await?
                .ok_or_else(|| StudioError::AppNotFound(req.app_id.clone()))?,
        };

        let copy = match req.copy {
            Some(entries) if !entries.is_empty() => entries,
            _ => {
                return Ok(CreateOutcome::CopyRequired {
                    copy_required: true,
                    platform,
                })
            }
        };

        let screens = copy
            .iter()
            .enumerate()
            .map(|(i, entry)| ScreenSpec {
                title: entry.title.clone(),
                subtitle: entry.subtitle.clone(),
                delay_ms: entry.delay_ms,
                palette_id: Some(
                    entry
                        .palette_id
                        .clone()
                        .unwrap_or_else(|| PALETTE_CYCLE[i % PALETTE_CYCLE.len()].to_string()),
                ),
            })
            .collect();

        let platform_choice = match platform {
            Platform::Desktop => PlatformChoice::Desktop,
            Platform::Mobile => PlatformChoice::Mobile,
        };
        let outcome = self
            .capture_app_screens(
                ScreensRequest {
                    app_id: req.app_id.clone(),
                    platform: platform_choice,
                    target: req.target,
                    delay_ms: req.delay_ms,
                    device_id: req.device_id,
                    screens,
                },
                session,
            )
            .await?;

        let handoff = self.hand_off(req.language).await?;

        Ok(CreateOutcome::Done {
            captured: outcome.captured,
            skipped: outcome.skipped,
            previews: outcome.previews,
            platform,
            handoff,
            session: outcome.session,
        })
    }

    /// Clear the persisted previews and delete any screenshot files from
    /// earlier runs.
    pub(crate) async fn reset_previews(&self) -> StudioResult<usize> {
        let removed = self.store().clear().await?;

        match tokio::fs::read_dir(&self.paths().screenshots_dir).await {
            Ok(mut entries) => {
                while let Some(entry) = entries.next_entry().await? {
                    if entry.file_type().await.map(|t| t.is_file()).unwrap_or(false) {
                        if let Err(e) = tokio::fs::remove_file(entry.path()).await {
                            tracing::warn!("Could not delete {}: {}", entry.path().display(), e);
                        }
                    }
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        tracing::info!("Reset: removed {} previews", removed);
        Ok(removed)
    }

    /// Write the render-request payload and activate the renderer;
    /// reveal the data directory when the renderer is not present.
    pub(crate) async fn hand_off(&self, language: Option<String>) -> StudioResult<HandoffResult> {
        let store = self.store().load().await?;
        let language = language.unwrap_or_else(|| store.settings.language.clone());

        let payload = json!({
            "previews": store.previews,
            "options": {
                "language": language,
                "outputDirectory": store.settings.output_directory,
            },
        });
        tokio::fs::create_dir_all(&self.paths().data_dir).await?;
        tokio::fs::write(
            &self.paths().render_request_path,
            serde_json::to_vec_pretty(&payload)?,
        )
        .await?;

        match self.launcher.activate(RENDERER_APP_ID).await {
            Ok(()) => Ok(HandoffResult::Activated),
            Err(e) => {
                tracing::warn!("Renderer activation failed ({}); revealing data dir", e);
                self.launcher
                    .reveal(&self.paths().data_dir)
                    .await
                    .map_err(|e| StudioError::LaunchFailed {
                        app_id: RENDERER_APP_ID.to_string(),
                        message: e.to_string(),
                    })?;
                Ok(HandoffResult::Revealed)
            }
        }
    }
}

//! Preview collection commands

use serde::Deserialize;
use serde_json::json;
use std::path::PathBuf;

use crate::commands::response::{respond, CommandResponse};
use crate::commands::AppContext;
use crate::error::{StudioError, StudioResult};
use crate::store::{PreviewSet, PreviewSetPatch};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AddPreviewArgs {
    pub screenshot_path: PathBuf,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    pub device_id: Option<String>,
    pub palette_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdatePreviewArgs {
    pub id: String,
    pub screenshot_path: Option<PathBuf>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub device_id: Option<String>,
    pub palette_id: Option<String>,
}

impl UpdatePreviewArgs {
    fn into_patch(self) -> (String, PreviewSetPatch) {
        (
            self.id,
            PreviewSetPatch {
                screenshot_path: self.screenshot_path,
                title: self.title,
                subtitle: self.subtitle,
                device_id: self.device_id,
                palette_id: self.palette_id,
            },
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RemovePreviewArgs {
    pub id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ClearPreviewsArgs {
    #[serde(default)]
    pub confirm: bool,
}

/// All persisted previews, in capture order.
pub async fn list_previews(ctx: &AppContext) -> CommandResponse {
    let result: StudioResult<_> = async {
        let store = ctx.orchestrator.store().load().await?;
        let count = store.previews.len();
        Ok(json!({ "previews": store.previews, "count": count }))
    }
    .await;
    respond(result)
}

/// Register an existing screenshot as a new preview set. The file must
/// already exist; device and palette default from settings at creation
/// time only.
pub async fn add_preview(ctx: &AppContext, args: AddPreviewArgs) -> CommandResponse {
    let result: StudioResult<_> = async {
        if !tokio::fs::try_exists(&args.screenshot_path).await.unwrap_or(false) {
            return Err(StudioError::FileNotFound(args.screenshot_path));
        }

        let settings = ctx.orchestrator.store().settings().await?;
        let preview = ctx
            .orchestrator
            .store()
            .append(PreviewSet::new(
                args.screenshot_path,
                args.title,
                args.subtitle,
                Some(args.device_id.unwrap_or(settings.default_device_id)),
                Some(args.palette_id.unwrap_or(settings.default_palette_id)),
            ))
            .await?;
        Ok(json!({ "preview": preview }))
    }
    .await;
    respond(result)
}

/// Update supplied fields of one preview set in place.
pub async fn update_preview(ctx: &AppContext, args: UpdatePreviewArgs) -> CommandResponse {
    let result: StudioResult<_> = async {
        let (id, patch) = args.into_patch();
        if let Some(path) = &patch.screenshot_path {
            if !tokio::fs::try_exists(path).await.unwrap_or(false) {
                return Err(StudioError::FileNotFound(path.clone()));
            }
        }
        let preview = ctx.orchestrator.store().update(&id, patch).await?;
        Ok(json!({ "preview": preview }))
    }
    .await;
    respond(result)
}

/// Remove one preview set by id.
pub async fn remove_preview(ctx: &AppContext, args: RemovePreviewArgs) -> CommandResponse {
    let result: StudioResult<_> = async {
        ctx.orchestrator.store().remove(&args.id).await?;
        Ok(json!({ "removed": args.id }))
    }
    .await;
    respond(result)
}

/// Remove every preview set. Destructive, so it requires `confirm`.
pub async fn clear_previews(ctx: &AppContext, args: ClearPreviewsArgs) -> CommandResponse {
    let result: StudioResult<_> = async {
        if !args.confirm {
            return Err(StudioError::ConfirmationRequired("clear_previews"));
        }
        let removed = ctx.orchestrator.store().clear().await?;
        Ok(json!({ "removed": removed }))
    }
    .await;
    respond(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::testing::Rig;

    fn ctx() -> (AppContext, Rig) {
        // The Rig owns the tempdir; keep it alive alongside the context.
        let rig = Rig::with_targets(vec![]);
        let paths = rig.orchestrator.paths().clone();
        let ctx = AppContext::new(crate::orchestrator::Orchestrator::new(
            paths,
            rig.lister.clone(),
            rig.capturer.clone(),
            rig.launcher.clone(),
        ));
        (ctx, rig)
    }

    #[tokio::test]
    async fn test_add_preview_with_missing_file_does_not_mutate_store() {
        let (ctx, _rig) = ctx();

        let response = add_preview(
            &ctx,
            AddPreviewArgs {
                screenshot_path: PathBuf::from("/nonexistent/shot.png"),
                title: "A".into(),
                subtitle: "B".into(),
                device_id: None,
                palette_id: None,
            },
        )
        .await;

        assert!(!response.success);
        assert!(response.error.unwrap().contains("File not found"));

        let store = ctx.orchestrator.store().load().await.unwrap();
        assert!(store.previews.is_empty());
    }

    #[tokio::test]
    async fn test_add_preview_defaults_device_and_palette_from_settings() {
        let (ctx, _rig) = ctx();
        let dir = tempfile::TempDir::new().unwrap();
        let shot = dir.path().join("shot.png");
        std::fs::write(&shot, b"png").unwrap();

        let response = add_preview(
            &ctx,
            AddPreviewArgs {
                screenshot_path: shot,
                title: "A".into(),
                subtitle: String::new(),
                device_id: None,
                palette_id: None,
            },
        )
        .await;

        assert!(response.success);
        assert_eq!(response.data["preview"]["deviceId"], "phone-6-9");
        assert_eq!(response.data["preview"]["paletteId"], "midnight");
    }

    #[tokio::test]
    async fn test_clear_without_confirm_is_a_failure_not_a_noop() {
        let (ctx, _rig) = ctx();

        let response = clear_previews(&ctx, ClearPreviewsArgs::default()).await;
        assert!(!response.success);
        assert!(response.hint.unwrap().contains("confirm"));
    }

    #[tokio::test]
    async fn test_remove_unknown_preview_reports_not_found() {
        let (ctx, _rig) = ctx();

        let response = remove_preview(&ctx, RemovePreviewArgs { id: "nope".into() }).await;
        assert!(!response.success);
        assert!(response.error.unwrap().contains("Preview not found"));
    }
}

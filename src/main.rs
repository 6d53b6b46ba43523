//! previewd - line-oriented command server
//!
//! Reads one JSON request per stdin line and writes one JSON response per
//! stdout line. Commands are handled strictly sequentially: each request
//! runs to completion before the next is read. Malformed requests get a
//! structured failure response rather than killing the process.

use anyhow::Result;
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use preview_studio::commands::previews::{
    AddPreviewArgs, ClearPreviewsArgs, RemovePreviewArgs, UpdatePreviewArgs,
};
use preview_studio::commands::{capture, devices, previews, settings, AppContext, CommandResponse};
use preview_studio::orchestrator::{
    CaptureRequest, CreateRequest, LaunchCaptureRequest, ScreensRequest,
};
use preview_studio::store::SettingsPatch;

/// The declared command schema; serde rejects unknown commands and
/// unknown or ill-typed argument fields.
#[derive(Debug, Deserialize)]
#[serde(tag = "command", content = "args", rename_all = "snake_case")]
enum Request {
    ListTargets,
    GetSettings,
    UpdateSettings(SettingsPatch),
    ListPreviews,
    AddPreview(AddPreviewArgs),
    UpdatePreview(UpdatePreviewArgs),
    RemovePreview(RemovePreviewArgs),
    ClearPreviews(ClearPreviewsArgs),
    Capture(CaptureRequest),
    LaunchAndCapture(LaunchCaptureRequest),
    CaptureAppScreens(ScreensRequest),
    CreateAppPreviews(CreateRequest),
}

async fn dispatch(ctx: &AppContext, request: Request) -> CommandResponse {
    match request {
        Request::ListTargets => devices::list_targets(ctx).await,
        Request::GetSettings => settings::get_settings(ctx).await,
        Request::UpdateSettings(patch) => settings::update_settings(ctx, patch).await,
        Request::ListPreviews => previews::list_previews(ctx).await,
        Request::AddPreview(args) => previews::add_preview(ctx, args).await,
        Request::UpdatePreview(args) => previews::update_preview(ctx, args).await,
        Request::RemovePreview(args) => previews::remove_preview(ctx, args).await,
        Request::ClearPreviews(args) => previews::clear_previews(ctx, args).await,
        Request::Capture(req) => capture::capture(ctx, req).await,
        Request::LaunchAndCapture(req) => capture::launch_and_capture(ctx, req).await,
        Request::CaptureAppScreens(req) => capture::capture_app_screens(ctx, req).await,
        Request::CreateAppPreviews(req) => capture::create_app_previews(ctx, req).await,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    preview_studio::init_tracing();
    tracing::info!("Starting previewd v{}", env!("CARGO_PKG_VERSION"));

    let ctx = AppContext::host();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Request>(line) {
            Ok(request) => dispatch(&ctx, request).await,
            Err(e) => CommandResponse::error_text(format!("Invalid request: {e}"))
                .with_hint("Send {\"command\": \"...\", \"args\": {...}} with fields from the command schema."),
        };

        let mut out = serde_json::to_vec(&response)?;
        out.push(b'\n');
        stdout.write_all(&out).await?;
        stdout.flush().await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_schema_rejects_unknown_fields() {
        let err = serde_json::from_str::<Request>(
            r#"{"command": "capture", "args": {"bogus": 1}}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("bogus"));
    }

    #[test]
    fn test_request_schema_rejects_unknown_command() {
        assert!(serde_json::from_str::<Request>(r#"{"command": "explode"}"#).is_err());
    }

    #[test]
    fn test_request_schema_validates_platform_enum() {
        let ok = serde_json::from_str::<Request>(
            r#"{"command": "launch_and_capture",
                "args": {"appId": "com.example.app", "platform": "mobile"}}"#,
        );
        assert!(ok.is_ok());

        let bad = serde_json::from_str::<Request>(
            r#"{"command": "launch_and_capture",
                "args": {"appId": "com.example.app", "platform": "toaster"}}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_unit_commands_need_no_args() {
        assert!(serde_json::from_str::<Request>(r#"{"command": "list_targets"}"#).is_ok());
        assert!(serde_json::from_str::<Request>(r#"{"command": "list_previews"}"#).is_ok());
    }
}

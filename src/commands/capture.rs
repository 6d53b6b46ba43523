//! Capture workflow commands
//!
//! Thin wrappers over the orchestrator: they thread the advisory session
//! snapshot through and fold every failure into the response envelope.

use crate::commands::response::{respond, CommandResponse};
use crate::commands::AppContext;
use crate::orchestrator::{CaptureRequest, CreateRequest, LaunchCaptureRequest, ScreensRequest};

/// Screenshot the best (or requested) booted target right now.
pub async fn capture(ctx: &AppContext, req: CaptureRequest) -> CommandResponse {
    respond(ctx.orchestrator.capture_once(req).await)
}

/// Launch an app, wait for it to settle, capture it.
pub async fn launch_and_capture(ctx: &AppContext, req: LaunchCaptureRequest) -> CommandResponse {
    let result = ctx
        .orchestrator
        .launch_and_capture(req, ctx.session())
        .await;
    if let Ok(outcome) = &result {
        ctx.remember_session(outcome.session.clone());
    }
    respond(result)
}

/// Launch once, then capture each declared screen in sequence.
pub async fn capture_app_screens(ctx: &AppContext, req: ScreensRequest) -> CommandResponse {
    let result = ctx
        .orchestrator
        .capture_app_screens(req, ctx.session())
        .await;
    if let Ok(outcome) = &result {
        ctx.remember_session(outcome.session.clone());
    }
    respond(result)
}

/// The full workflow: reset, capture a set per copy entry, hand off to
/// the renderer.
pub async fn create_app_previews(ctx: &AppContext, req: CreateRequest) -> CommandResponse {
    let result = ctx
        .orchestrator
        .create_app_previews(req, ctx.session())
        .await;
    if let Ok(crate::orchestrator::CreateOutcome::Done { session, .. }) = &result {
        ctx.remember_session(session.clone());
    }
    respond(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::testing::{target, Rig};
    use crate::orchestrator::{Orchestrator, PlatformChoice};

    fn ctx_with(rig: &Rig) -> AppContext {
        AppContext::new(Orchestrator::new(
            rig.orchestrator.paths().clone(),
            rig.lister.clone(),
            rig.capturer.clone(),
            rig.launcher.clone(),
        ))
    }

    #[tokio::test]
    async fn test_launch_and_capture_remembers_session_for_next_call() {
        let rig = Rig::with_targets(vec![
            target("iPhone 15 Pro Max", "promax-1"),
            target("iPhone 15", "phone-1"),
        ]);
        rig.launcher.install("phone-1", "com.example.app");
        let ctx = ctx_with(&rig);

        let request = |app: &str| LaunchCaptureRequest {
            app_id: app.into(),
            platform: PlatformChoice::Mobile,
            target: None,
            delay_ms: Some(0),
            title: String::new(),
            subtitle: String::new(),
            device_id: None,
            palette_id: None,
        };

        let response = launch_and_capture(&ctx, request("com.example.app")).await;
        assert!(response.success);
        assert_eq!(ctx.session().unwrap().target_handle, "phone-1");

        // A second launch of an app installed nowhere follows the hint
        // instead of falling back to the Pro Max.
        let response = launch_and_capture(&ctx, request("com.example.other")).await;
        assert!(response.success);
        assert_eq!(response.data["targetName"], "iPhone 15");
    }

    #[tokio::test]
    async fn test_capture_failure_becomes_structured_response() {
        let rig = Rig::with_targets(vec![target("iPhone 15", "phone-1")]);
        rig.capturer.error_on(1);
        let ctx = ctx_with(&rig);

        let response = capture(&ctx, CaptureRequest::default()).await;
        assert!(!response.success);
        let error = response.error.unwrap();
        assert!(error.contains("iPhone 15"), "error should name the target: {error}");
        assert!(response.hint.is_some());
    }
}

//! Settings commands

use serde_json::json;

use crate::commands::response::{respond, CommandResponse};
use crate::commands::AppContext;
use crate::error::StudioResult;
use crate::store::SettingsPatch;

/// Current settings verbatim.
pub async fn get_settings(ctx: &AppContext) -> CommandResponse {
    let result: StudioResult<_> = async {
        let settings = ctx.orchestrator.store().settings().await?;
        Ok(json!({ "settings": settings }))
    }
    .await;
    respond(result)
}

/// Apply a partial settings update; omitted fields keep their value.
pub async fn update_settings(ctx: &AppContext, patch: SettingsPatch) -> CommandResponse {
    let result: StudioResult<_> = async {
        let settings = ctx.orchestrator.store().update_settings(patch).await?;
        Ok(json!({ "settings": settings }))
    }
    .await;
    respond(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::testing::Rig;
    use crate::orchestrator::Orchestrator;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_update_then_get_round_trips_the_changed_field() {
        let rig = Rig::with_targets(vec![]);
        let ctx = AppContext::new(Orchestrator::new(
            rig.orchestrator.paths().clone(),
            rig.lister.clone(),
            rig.capturer.clone(),
            rig.launcher.clone(),
        ));

        let before = get_settings(&ctx).await;
        assert!(before.success);

        let patch = SettingsPatch {
            output_directory: Some(PathBuf::from("/tmp/x")),
            ..Default::default()
        };
        let updated = update_settings(&ctx, patch).await;
        assert!(updated.success);

        let after = get_settings(&ctx).await;
        assert_eq!(after.data["settings"]["outputDirectory"], "/tmp/x");
        assert_eq!(
            after.data["settings"]["defaultDeviceId"],
            before.data["settings"]["defaultDeviceId"]
        );
        assert_eq!(
            after.data["settings"]["language"],
            before.data["settings"]["language"]
        );
    }
}

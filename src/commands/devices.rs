//! Target discovery commands

use serde_json::json;

use crate::commands::response::{respond, CommandResponse};
use crate::commands::AppContext;
use crate::error::StudioResult;

/// List currently booted capture targets. An empty list is a success
/// ("nothing booted"); a discovery failure is a structured error.
pub async fn list_targets(ctx: &AppContext) -> CommandResponse {
    let result: StudioResult<_> = async {
        let targets = ctx.orchestrator.list_targets().await?;
        let count = targets.len();
        Ok(json!({ "targets": targets, "count": count }))
    }
    .await;
    respond(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::testing::{target, Rig};
    use crate::orchestrator::Orchestrator;

    fn ctx_with(rig: &Rig) -> AppContext {
        AppContext::new(Orchestrator::new(
            rig.orchestrator.paths().clone(),
            rig.lister.clone(),
            rig.capturer.clone(),
            rig.launcher.clone(),
        ))
    }

    #[tokio::test]
    async fn test_empty_list_is_success_but_failure_is_not() {
        let rig = Rig::with_targets(vec![]);
        let ctx = ctx_with(&rig);

        let response = list_targets(&ctx).await;
        assert!(response.success);
        assert_eq!(response.data["count"], 0);

        *rig.lister.fail.lock() = true;
        let response = list_targets(&ctx).await;
        assert!(!response.success);
        assert!(response.error.unwrap().contains("discovery unavailable"));
    }

    #[tokio::test]
    async fn test_targets_carry_priority_for_default_selection() {
        let rig = Rig::with_targets(vec![target("iPhone 15 Pro Max", "h1")]);
        let ctx = ctx_with(&rig);

        let response = list_targets(&ctx).await;
        assert!(response.success);
        assert_eq!(response.data["targets"][0]["priority"], 4);
        assert_eq!(response.data["targets"][0]["handle"], "h1");
    }
}

//! Host automation via the platform tools
//!
//! One implementation for all three capability traits, shelling out to
//! `xcrun simctl` for simulators and `screencapture`/`open`/`osascript`
//! for desktop work. Nothing here inspects image bytes; success is the
//! tool exiting cleanly, and the orchestrator separately verifies that the
//! destination file exists.

use async_trait::async_trait;
use std::path::Path;
use std::process::Output;
use tokio::process::Command;

use crate::automation::traits::{AutomationError, AutomationResult, Capturer, Launcher, TargetLister};
use crate::devices::{parse_device_list, CaptureTarget};

/// Bundle identifier of the System Events scripting host used for
/// window-id resolution.
const SYSTEM_EVENTS: &str = "System Events";

/// Real automation backed by the host's command line tools.
#[derive(Debug, Default, Clone)]
pub struct HostAutomation;

impl HostAutomation {
    pub fn new() -> Self {
        Self
    }

    async fn run(program: &str, args: &[&str]) -> AutomationResult<Output> {
        tracing::debug!("Running {} {}", program, args.join(" "));
        let output = Command::new(program)
            .args(args)
            .output()
            .await
            .map_err(|e| AutomationError::ToolUnavailable(format!("{program}: {e}")))?;
        Ok(output)
    }

    /// Run and require a zero exit status.
    async fn run_checked(program: &str, args: &[&str]) -> AutomationResult<Output> {
        let output = Self::run(program, args).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AutomationError::CommandFailed(format!(
                "{program} {}: {}",
                args.join(" "),
                stderr.trim()
            )));
        }
        Ok(output)
    }

    /// Resolve the frontmost window id of an app through System Events.
    async fn front_window_id(app_id: &str) -> AutomationResult<String> {
        let script = format!(
            "tell application \"{SYSTEM_EVENTS}\" to get id of front window of \
             (first application process whose bundle identifier is \"{app_id}\")"
        );
        let output = Self::run_checked("osascript", &["-e", script.as_str()]).await?;
        let id = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if id.is_empty() {
            return Err(AutomationError::UnexpectedOutput(format!(
                "no window id for {app_id}"
            )));
        }
        Ok(id)
    }
}

#[async_trait]
impl TargetLister for HostAutomation {
    async fn list_targets(&self) -> AutomationResult<Vec<CaptureTarget>> {
        let output = Self::run_checked("xcrun", &["simctl", "list", "devices", "--json"]).await?;
        let json = String::from_utf8_lossy(&output.stdout);
        let targets = parse_device_list(&json)
            .map_err(|e| AutomationError::UnexpectedOutput(e.to_string()))?;
        tracing::debug!("Discovered {} booted targets", targets.len());
        Ok(targets)
    }
}

#[async_trait]
impl Capturer for HostAutomation {
    async fn capture_target(&self, handle: &str, dest: &Path) -> AutomationResult<()> {
        let dest = dest.to_string_lossy().into_owned();
        Self::run_checked("xcrun", &["simctl", "io", handle, "screenshot", dest.as_str()]).await?;
        Ok(())
    }

    async fn capture_window(&self, app_id: &str, dest: &Path) -> AutomationResult<()> {
        let dest = dest.to_string_lossy().into_owned();

        // Primary: capture the window directly by its id.
        match Self::front_window_id(app_id).await {
            Ok(window_id) => {
                let flag = format!("-l{window_id}");
                Self::run_checked("screencapture", &["-o", "-x", flag.as_str(), dest.as_str()])
                    .await?;
                Ok(())
            }
            Err(e) => {
                // Fallback: bring the app frontmost and grab the focused
                // window area generically.
                tracing::warn!("Window-id capture unavailable for {}: {}; using fallback", app_id, e);
                Self::run_checked("open", &["-b", app_id]).await?;
                Self::run_checked("screencapture", &["-o", "-x", "-w", dest.as_str()]).await?;
                Ok(())
            }
        }
    }
}

#[async_trait]
impl Launcher for HostAutomation {
    async fn launch_desktop(&self, app_id: &str) -> AutomationResult<()> {
        Self::run_checked("open", &["-b", app_id]).await?;
        Ok(())
    }

    async fn launch_on_target(&self, handle: &str, app_id: &str) -> AutomationResult<()> {
        Self::run_checked("xcrun", &["simctl", "launch", handle, app_id]).await?;
        Ok(())
    }

    async fn terminate_on_target(&self, handle: &str, app_id: &str) -> AutomationResult<()> {
        Self::run_checked("xcrun", &["simctl", "terminate", handle, app_id]).await?;
        Ok(())
    }

    async fn is_desktop_app(&self, app_id: &str) -> bool {
        let query = format!("kMDItemCFBundleIdentifier == '{app_id}'");
        match Self::run("mdfind", &[query.as_str()]).await {
            Ok(output) if output.status.success() => {
                !String::from_utf8_lossy(&output.stdout).trim().is_empty()
            }
            _ => false,
        }
    }

    async fn is_installed_on_target(&self, handle: &str, app_id: &str) -> bool {
        matches!(
            Self::run("xcrun", &["simctl", "get_app_container", handle, app_id]).await,
            Ok(output) if output.status.success()
        )
    }

    async fn activate(&self, app_id: &str) -> AutomationResult<()> {
        Self::run_checked("open", &["-b", app_id]).await?;
        Ok(())
    }

    async fn reveal(&self, path: &Path) -> AutomationResult<()> {
        let path = path.to_string_lossy().into_owned();
        Self::run_checked("open", &[path.as_str()]).await?;
        Ok(())
    }
}

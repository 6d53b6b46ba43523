//! Capability traits over the OS automation primitives
//!
//! Device enumeration, screenshot capture and app lifecycle are external
//! side effects with a narrow contract; everything above them trusts only
//! these signatures (and, for captures, the destination file's existence).

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

use crate::devices::CaptureTarget;

/// Errors surfaced by the automation primitives.
#[derive(Error, Debug)]
pub enum AutomationError {
    #[error("Tool unavailable: {0}")]
    ToolUnavailable(String),

    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Unexpected output: {0}")]
    UnexpectedOutput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for automation operations
pub type AutomationResult<T> = Result<T, AutomationError>;

/// Enumerates currently booted capture targets.
#[async_trait]
pub trait TargetLister: Send + Sync {
    /// List booted mobile-family targets. An error means the enumeration
    /// itself is unavailable; an empty list means nothing is booted.
    async fn list_targets(&self) -> AutomationResult<Vec<CaptureTarget>>;
}

/// Produces screenshot files. The destination file's existence afterwards
/// is the only success signal callers trust.
#[async_trait]
pub trait Capturer: Send + Sync {
    /// Capture the screen of a booted target to `dest`.
    async fn capture_target(&self, handle: &str, dest: &Path) -> AutomationResult<()>;

    /// Capture the foreground window of a desktop application to `dest`.
    /// Implementations try a window-id capture first and fall back to
    /// bringing the app frontmost plus a generic window capture.
    async fn capture_window(&self, app_id: &str, dest: &Path) -> AutomationResult<()>;
}

/// Launches and terminates applications, and probes for their presence.
#[async_trait]
pub trait Launcher: Send + Sync {
    async fn launch_desktop(&self, app_id: &str) -> AutomationResult<()>;

    async fn launch_on_target(&self, handle: &str, app_id: &str) -> AutomationResult<()>;

    async fn terminate_on_target(&self, handle: &str, app_id: &str) -> AutomationResult<()>;

    /// Best-effort probe: is the app registered on the desktop? Failures
    /// count as "not found".
    async fn is_desktop_app(&self, app_id: &str) -> bool;

    /// Best-effort probe: is the app installed on the given target?
    async fn is_installed_on_target(&self, handle: &str, app_id: &str) -> bool;

    /// Activate an already-installed desktop application by identifier.
    async fn activate(&self, app_id: &str) -> AutomationResult<()>;

    /// Reveal a directory to the user in the file manager.
    async fn reveal(&self, path: &Path) -> AutomationResult<()>;
}

//! Error taxonomy for preview-studio
//!
//! Every expected failure is data: the command layer turns these into
//! structured `success: false` responses instead of letting them escape.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur anywhere between the store and the orchestrator
#[derive(Error, Debug)]
pub enum StudioError {
    #[error("Preview not found: {0}")]
    PreviewNotFound(String),

    #[error("Target not found: {0}")]
    TargetNotFound(String),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("No booted target available")]
    NoTargetAvailable,

    #[error("Device discovery unavailable: {0}")]
    DiscoveryUnavailable(String),

    #[error("Capture failed on {target}: {message}")]
    CaptureFailed { target: String, message: String },

    #[error("Capture reported success but produced no file at {}", .0.display())]
    CaptureProducedNoFile(PathBuf),

    #[error("Application not found on any platform: {0}")]
    AppNotFound(String),

    #[error("Operation '{0}' requires confirmation")]
    ConfirmationRequired(&'static str),

    #[error("Store file at {} is corrupted: {message}", .path.display())]
    StoreCorrupted { path: PathBuf, message: String },

    #[error("Launch failed for {app_id}: {message}")]
    LaunchFailed { app_id: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for store and orchestrator operations
pub type StudioResult<T> = Result<T, StudioError>;

impl StudioError {
    /// Remediation text surfaced alongside the error in failure responses.
    pub fn hint(&self) -> Option<String> {
        match self {
            StudioError::PreviewNotFound(_) => {
                Some("Run list_previews to see the known preview ids.".into())
            }
            StudioError::TargetNotFound(_) => {
                Some("Run list_targets to see the currently booted targets.".into())
            }
            StudioError::FileNotFound(_) => {
                Some("Check the path; screenshot files must exist before they are referenced.".into())
            }
            StudioError::NoTargetAvailable => {
                Some("Boot a simulator (e.g. via the Simulator app) and retry.".into())
            }
            StudioError::DiscoveryUnavailable(_) => {
                Some("Make sure the Xcode command line tools are installed and `xcrun simctl` works.".into())
            }
            StudioError::CaptureFailed { .. } => {
                Some("Verify the target is still booted, then retry the capture.".into())
            }
            StudioError::CaptureProducedNoFile(_) => {
                Some("The capture tool exited cleanly but wrote nothing; check disk space and screen recording permission.".into())
            }
            StudioError::AppNotFound(_) => {
                Some("Install the app on a booted simulator or the desktop, or pass `platform` explicitly.".into())
            }
            StudioError::ConfirmationRequired(_) => {
                Some("Pass `confirm: true` to run this destructive operation.".into())
            }
            StudioError::StoreCorrupted { path, .. } => Some(format!(
                "Move {} aside to start from an empty store.",
                path.display()
            )),
            StudioError::LaunchFailed { .. } => {
                Some("Check that the application identifier is correct and the app is installed.".into())
            }
            StudioError::Io(_) | StudioError::Json(_) => None,
        }
    }
}

//! Preview Studio - app-store preview capture, made simple.
//!
//! This crate discovers booted simulator targets (or a running desktop
//! app), sequences launch/wait/capture workflows against them, and
//! persists the resulting preview sets for the external renderer.

pub mod automation;
pub mod commands;
pub mod devices;
pub mod error;
pub mod orchestrator;
pub mod paths;
pub mod store;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use commands::{AppContext, CommandResponse};
pub use error::{StudioError, StudioResult};
pub use orchestrator::{Orchestrator, SessionSnapshot};

/// Initialize tracing/logging. Output goes to stderr so stdout stays a
/// clean response channel.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "preview_studio=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

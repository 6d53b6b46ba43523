//! Command handlers
//!
//! The RPC-style surface: every operation takes schema-validated
//! arguments and returns a structured response with at least `success`,
//! plus `error` and `hint` on failure. Expected failures never escape as
//! panics or process exits.

pub mod capture;
pub mod devices;
pub mod previews;
pub mod response;
pub mod settings;

use parking_lot::Mutex;
use std::sync::Arc;

use crate::automation::HostAutomation;
use crate::orchestrator::{Orchestrator, SessionSnapshot};
use crate::paths::StudioPaths;

pub use response::CommandResponse;

/// Shared state behind all command handlers: the orchestrator plus the
/// advisory session snapshot from the most recent launch.
pub struct AppContext {
    pub orchestrator: Orchestrator,
    session: Mutex<Option<SessionSnapshot>>,
}

impl AppContext {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self {
            orchestrator,
            session: Mutex::new(None),
        }
    }

    /// Context wired to the real host automation and default locations.
    pub fn host() -> Self {
        let automation = Arc::new(HostAutomation::new());
        Self::new(Orchestrator::new(
            StudioPaths::default_locations(),
            automation.clone(),
            automation.clone(),
            automation,
        ))
    }

    pub(crate) fn session(&self) -> Option<SessionSnapshot> {
        self.session.lock().clone()
    }

    /// Keep the newest snapshot; operations that did not launch return
    /// none and leave the previous hint in place.
    pub(crate) fn remember_session(&self, snapshot: Option<SessionSnapshot>) {
        if snapshot.is_some() {
            *self.session.lock() = snapshot;
        }
    }
}

//! OS automation capability layer
//!
//! The orchestrator depends only on the traits in [`traits`]; the one real
//! implementation shells out to the host automation tools. Tests swap in
//! fakes.

pub mod host;
pub mod traits;

pub use host::HostAutomation;
pub use traits::{AutomationError, AutomationResult, Capturer, Launcher, TargetLister};

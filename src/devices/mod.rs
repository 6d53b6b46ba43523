//! Capture-target discovery and canonical device sizing

pub mod discovery;
pub mod mapping;

pub use discovery::{parse_device_list, select_default_target, target_priority, CaptureTarget};
pub use mapping::{map_target_to_device_id, DESKTOP_DEVICE_ID, FALLBACK_DEVICE_ID};

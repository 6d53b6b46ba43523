//! Target-name to canonical device-size mapping
//!
//! An ordered rule table, first match wins. The canonical identifiers are
//! logical output-size classes, not model names, so new simulator models
//! keep working: anything tablet-shaped falls back to the generic tablet
//! size and everything else to the large phone size.

/// Canonical identifier for the generic large-phone class; also the
/// fallback for names no rule matches.
pub const FALLBACK_DEVICE_ID: &str = "phone-6-9";

/// Fixed identifier used for desktop window captures.
pub const DESKTOP_DEVICE_ID: &str = "desktop";

/// Ordered substring rules; evaluated top to bottom.
const RULES: &[(&str, &str)] = &[
    ("Pro Max", "phone-6-9"),
    ("Plus", "phone-6-9"),
    // Before the bare "Pro" rule so "iPad Pro" stays a tablet.
    ("iPad", "tablet-13"),
    ("Pro", "phone-6-3"),
    ("iPhone", "phone-6-1"),
];

/// Map a discovered target's human-readable name to a canonical device
/// identifier. Total: unmatched names get [`FALLBACK_DEVICE_ID`].
pub fn map_target_to_device_id(name: &str) -> &'static str {
    RULES
        .iter()
        .find(|(needle, _)| name.contains(needle))
        .map(|(_, id)| *id)
        .unwrap_or(FALLBACK_DEVICE_ID)
}

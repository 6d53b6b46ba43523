//! Booted-target discovery
//!
//! Parsing and ranking are pure functions over the device-enumeration
//! JSON, so they are testable without a simulator runtime installed. The
//! actual `xcrun simctl` invocation lives in the automation layer.

use serde::{Deserialize, Serialize};

/// Runtime-family marker for the phone/tablet OS; other families
/// (watch, TV, spatial) are excluded even when booted.
const MOBILE_RUNTIME_MARKER: &str = "iOS";

/// A discovered, currently booted capture target. Transient; never
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureTarget {
    pub name: String,
    /// Opaque addressable identifier (simulator UDID).
    pub handle: String,
    pub os_version: String,
    /// Default-selection rank only; never stored.
    pub priority: u8,
}

/// Shape of one device entry in `simctl list devices --json` output.
#[derive(Debug, Deserialize)]
struct RawDevice {
    name: String,
    udid: String,
    state: String,
}

#[derive(Debug, Deserialize)]
struct RawDeviceList {
    devices: std::collections::BTreeMap<String, Vec<RawDevice>>,
}

/// Rank a target name for default selection: larger phones first, then
/// tablets, then anything else.
pub fn target_priority(name: &str) -> u8 {
    if name.contains("Pro Max") {
        4
    } else if name.contains("Pro") && name.contains("iPhone") {
        3
    } else if name.contains("iPhone") {
        2
    } else if name.contains("iPad") {
        1
    } else {
        0
    }
}

/// Parse the device-enumeration JSON into booted mobile-family targets,
/// in discovery order.
pub fn parse_device_list(json: &str) -> Result<Vec<CaptureTarget>, serde_json::Error> {
    let raw: RawDeviceList = serde_json::from_str(json)?;

    let mut targets = Vec::new();
    for (runtime, devices) in raw.devices {
        if !runtime.contains(MOBILE_RUNTIME_MARKER) {
            continue;
        }
        let os_version = runtime_version(&runtime);
        for device in devices {
            if device.state != "Booted" {
                continue;
            }
            targets.push(CaptureTarget {
                priority: target_priority(&device.name),
                name: device.name,
                handle: device.udid,
                os_version: os_version.clone(),
            });
        }
    }
    Ok(targets)
}

/// Pick the default target: highest priority, discovery order breaking
/// ties.
pub fn select_default_target(targets: &[CaptureTarget]) -> Option<&CaptureTarget> {
    let mut best: Option<&CaptureTarget> = None;
    for target in targets {
        if best.map_or(true, |b| target.priority > b.priority) {
            best = Some(target);
        }
    }
    best
}

/// "com.apple.CoreSimulator.SimRuntime.iOS-17-5" -> "17.5"
fn runtime_version(runtime: &str) -> String {
    runtime
        .rsplit('.')
        .next()
        .and_then(|tail| tail.split_once('-'))
        .map(|(_, version)| version.replace('-', "."))
        .unwrap_or_else(|| runtime.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "devices": {
            "com.apple.CoreSimulator.SimRuntime.iOS-17-5": [
                {"name": "iPhone 15", "udid": "AAAA-1111", "state": "Booted"},
                {"name": "iPhone 15 Pro Max", "udid": "BBBB-2222", "state": "Booted"},
                {"name": "iPhone 15 Pro", "udid": "CCCC-3333", "state": "Shutdown"}
            ],
            "com.apple.CoreSimulator.SimRuntime.iOS-16-4": [
                {"name": "iPad Air 11-inch (M2)", "udid": "DDDD-4444", "state": "Booted"}
            ],
            "com.apple.CoreSimulator.SimRuntime.watchOS-10-5": [
                {"name": "Apple Watch Ultra 2", "udid": "EEEE-5555", "state": "Booted"}
            ]
        }
    }"#;

    #[test]
    fn test_parse_keeps_only_booted_mobile_targets() {
        let targets = parse_device_list(SAMPLE).unwrap();
        let names: Vec<_> = targets.iter().map(|t| t.name.as_str()).collect();

        assert_eq!(names.len(), 3);
        assert!(names.contains(&"iPhone 15"));
        assert!(names.contains(&"iPhone 15 Pro Max"));
        assert!(names.contains(&"iPad Air 11-inch (M2)"));
        // Shutdown and watch devices are excluded.
        assert!(!names.contains(&"iPhone 15 Pro"));
        assert!(!names.contains(&"Apple Watch Ultra 2"));
    }

    #[test]
    fn test_parse_extracts_os_version_from_runtime() {
        let targets = parse_device_list(SAMPLE).unwrap();
        let ipad = targets.iter().find(|t| t.name.contains("iPad")).unwrap();
        assert_eq!(ipad.os_version, "16.4");
    }

    #[test]
    fn test_priority_ranking() {
        assert_eq!(target_priority("iPhone 15 Pro Max"), 4);
        assert_eq!(target_priority("iPhone 15 Pro"), 3);
        assert_eq!(target_priority("iPhone 15"), 2);
        assert_eq!(target_priority("iPad Air"), 1);
        assert_eq!(target_priority("Apple TV 4K"), 0);
    }

    #[test]
    fn test_default_selection_prefers_pro_max() {
        let targets = vec![
            CaptureTarget {
                name: "iPad Air".into(),
                handle: "a".into(),
                os_version: "17.5".into(),
                priority: target_priority("iPad Air"),
            },
            CaptureTarget {
                name: "iPhone 15 Pro Max".into(),
                handle: "b".into(),
                os_version: "17.5".into(),
                priority: target_priority("iPhone 15 Pro Max"),
            },
            CaptureTarget {
                name: "iPhone 15".into(),
                handle: "c".into(),
                os_version: "17.5".into(),
                priority: target_priority("iPhone 15"),
            },
        ];

        let pick = select_default_target(&targets).unwrap();
        assert_eq!(pick.name, "iPhone 15 Pro Max");
    }

    #[test]
    fn test_default_selection_ties_break_by_discovery_order() {
        let mk = |name: &str, handle: &str| CaptureTarget {
            name: name.into(),
            handle: handle.into(),
            os_version: "17.5".into(),
            priority: target_priority(name),
        };
        let targets = vec![mk("iPhone 15", "first"), mk("iPhone 14", "second")];
        assert_eq!(select_default_target(&targets).unwrap().handle, "first");
    }

    #[test]
    fn test_parse_invalid_json_is_an_error() {
        assert!(parse_device_list("not json").is_err());
    }

    #[test]
    fn test_empty_device_map_is_empty_not_an_error() {
        let targets = parse_device_list(r#"{"devices": {}}"#).unwrap();
        assert!(targets.is_empty());
    }
}

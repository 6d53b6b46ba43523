//! Fake capability implementations for orchestrator tests

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::automation::{AutomationError, AutomationResult, Capturer, Launcher, TargetLister};
use crate::devices::{target_priority, CaptureTarget};
use crate::orchestrator::Orchestrator;
use crate::paths::StudioPaths;

pub fn target(name: &str, handle: &str) -> CaptureTarget {
    CaptureTarget {
        name: name.to_string(),
        handle: handle.to_string(),
        os_version: "17.5".to_string(),
        priority: target_priority(name),
    }
}

#[derive(Default)]
pub struct FakeLister {
    pub targets: Mutex<Vec<CaptureTarget>>,
    pub fail: Mutex<bool>,
}

impl FakeLister {
    pub fn with_targets(targets: Vec<CaptureTarget>) -> Arc<Self> {
        Arc::new(Self {
            targets: Mutex::new(targets),
            fail: Mutex::new(false),
        })
    }
}

#[async_trait]
impl TargetLister for FakeLister {
    async fn list_targets(&self) -> AutomationResult<Vec<CaptureTarget>> {
        if *self.fail.lock() {
            return Err(AutomationError::ToolUnavailable("simctl missing".into()));
        }
        Ok(self.targets.lock().clone())
    }
}

/// Capture fake: writes a placeholder file on success. Individual calls
/// (1-based, counted across both capture kinds) can be made to error or
/// to "succeed" while writing nothing.
#[derive(Default)]
pub struct FakeCapturer {
    calls: AtomicUsize,
    pub error_on: Mutex<HashSet<usize>>,
    pub silent_on: Mutex<HashSet<usize>>,
}

impl FakeCapturer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn error_on(self: &Arc<Self>, call: usize) -> Arc<Self> {
        self.error_on.lock().insert(call);
        self.clone()
    }

    pub fn silent_on(self: &Arc<Self>, call: usize) -> Arc<Self> {
        self.silent_on.lock().insert(call);
        self.clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn shoot(&self, dest: &Path) -> AutomationResult<()> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.error_on.lock().contains(&call) {
            return Err(AutomationError::CommandFailed("capture tool crashed".into()));
        }
        if self.silent_on.lock().contains(&call) {
            return Ok(());
        }
        std::fs::write(dest, b"png").map_err(AutomationError::Io)
    }
}

#[async_trait]
impl Capturer for FakeCapturer {
    async fn capture_target(&self, _handle: &str, dest: &Path) -> AutomationResult<()> {
        self.shoot(dest)
    }

    async fn capture_window(&self, _app_id: &str, dest: &Path) -> AutomationResult<()> {
        self.shoot(dest)
    }
}

#[derive(Default)]
pub struct FakeLauncher {
    pub desktop_apps: Mutex<HashSet<String>>,
    /// handle -> installed app ids
    pub installed: Mutex<HashMap<String, HashSet<String>>>,
    pub fail_launch: Mutex<bool>,
    pub fail_activate: Mutex<bool>,
    pub launches: Mutex<Vec<(String, String)>>,
    pub terminates: Mutex<Vec<(String, String)>>,
    pub activations: Mutex<Vec<String>>,
    pub reveals: Mutex<Vec<std::path::PathBuf>>,
}

impl FakeLauncher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn install(self: &Arc<Self>, handle: &str, app_id: &str) -> Arc<Self> {
        self.installed
            .lock()
            .entry(handle.to_string())
            .or_default()
            .insert(app_id.to_string());
        self.clone()
    }

    pub fn register_desktop(self: &Arc<Self>, app_id: &str) -> Arc<Self> {
        self.desktop_apps.lock().insert(app_id.to_string());
        self.clone()
    }
}

#[async_trait]
impl Launcher for FakeLauncher {
    async fn launch_desktop(&self, app_id: &str) -> AutomationResult<()> {
        if *self.fail_launch.lock() {
            return Err(AutomationError::CommandFailed("launch refused".into()));
        }
        self.launches.lock().push(("desktop".into(), app_id.into()));
        Ok(())
    }

    async fn launch_on_target(&self, handle: &str, app_id: &str) -> AutomationResult<()> {
        if *self.fail_launch.lock() {
            return Err(AutomationError::CommandFailed("launch refused".into()));
        }
        self.launches.lock().push((handle.into(), app_id.into()));
        Ok(())
    }

    async fn terminate_on_target(&self, handle: &str, app_id: &str) -> AutomationResult<()> {
        self.terminates.lock().push((handle.into(), app_id.into()));
        // Apps that were never launched "fail" to terminate; callers must
        // not care.
        Err(AutomationError::CommandFailed("no such process".into()))
    }

    async fn is_desktop_app(&self, app_id: &str) -> bool {
        self.desktop_apps.lock().contains(app_id)
    }

    async fn is_installed_on_target(&self, handle: &str, app_id: &str) -> bool {
        self.installed
            .lock()
            .get(handle)
            .map(|apps| apps.contains(app_id))
            .unwrap_or(false)
    }

    async fn activate(&self, app_id: &str) -> AutomationResult<()> {
        if *self.fail_activate.lock() {
            return Err(AutomationError::CommandFailed("renderer not installed".into()));
        }
        self.activations.lock().push(app_id.into());
        Ok(())
    }

    async fn reveal(&self, path: &Path) -> AutomationResult<()> {
        self.reveals.lock().push(path.to_path_buf());
        Ok(())
    }
}

/// A complete orchestrator wired to fakes, rooted in a tempdir.
pub struct Rig {
    pub orchestrator: Orchestrator,
    pub lister: Arc<FakeLister>,
    pub capturer: Arc<FakeCapturer>,
    pub launcher: Arc<FakeLauncher>,
    _dir: tempfile::TempDir,
}

impl Rig {
    pub fn with_targets(targets: Vec<CaptureTarget>) -> Self {
        let dir = tempfile::TempDir::new().unwrap();
        let paths = StudioPaths::under(dir.path().to_path_buf());
        let lister = FakeLister::with_targets(targets);
        let capturer = FakeCapturer::new();
        let launcher = FakeLauncher::new();
        let orchestrator = Orchestrator::new(
            paths,
            lister.clone(),
            capturer.clone(),
            launcher.clone(),
        );
        Self {
            orchestrator,
            lister,
            capturer,
            launcher,
            _dir: dir,
        }
    }
}

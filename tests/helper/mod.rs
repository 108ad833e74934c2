//! Shared test utilities
#![allow(dead_code)]

mod hosts;
mod packages;

pub use hosts::FakeReleaseHost;
pub use packages::{FakePackageManager, FakeSelector, formula};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use brew_release_notes::console::{CapturedOutput, Reporter};
use brew_release_notes::orchestrator::{Orchestrator, RunSettings};
use brew_release_notes::preflight::Preflight;
use brew_release_notes::release::host::ReleaseHosts;

/// Temporary output root and ignore file for one run
pub struct TestWorkspace {
    pub temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn output_root(&self) -> PathBuf {
        self.temp_dir.path().join("out")
    }

    pub fn ignore_path(&self) -> PathBuf {
        self.temp_dir.path().join("ignore.txt")
    }

    pub fn settings(&self, interactive: bool) -> RunSettings {
        RunSettings {
            output_root: self.output_root(),
            ignore_path: self.ignore_path(),
            include_prereleases: false,
            interactive,
            only: Vec::new(),
        }
    }

    /// Files written below the output root, sorted by path
    pub fn written_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        collect_files(&self.output_root(), &mut files);
        files.sort();
        files
    }
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect_files(&path, files);
        } else {
            files.push(path);
        }
    }
}

/// Orchestrator wired to fakes, with the dependency check always passing
pub fn create_orchestrator(
    manager: FakePackageManager,
    host: FakeReleaseHost,
    selector: FakeSelector,
    settings: RunSettings,
) -> (Orchestrator, CapturedOutput) {
    let (reporter, output) = Reporter::capture();
    let orchestrator = Orchestrator::new(
        Arc::new(manager),
        ReleaseHosts::new().with(Arc::new(host)),
        Box::new(selector),
        reporter,
        settings,
    )
    .with_preflight(Preflight::with_probe(&["brew"], |_| true));
    (orchestrator, output)
}

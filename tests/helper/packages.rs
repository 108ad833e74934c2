//! In-memory package manager and selector

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use brew_release_notes::package::{
    OutdatedPackage, PackageInfo, PackageKind, PackageManager, PackageManagerError,
};
use brew_release_notes::select::{PackageSelector, SelectError};

/// Outdated formula with a single installed version
pub fn formula(name: &str, installed: &str, latest: &str) -> OutdatedPackage {
    OutdatedPackage {
        name: name.to_string(),
        kind: PackageKind::Formula,
        installed_versions: vec![installed.to_string()],
        current_version: Some(latest.to_string()),
    }
}

#[derive(Default)]
pub struct FakePackageManager {
    outdated: Vec<OutdatedPackage>,
    info: HashMap<String, PackageInfo>,
    info_requests: Arc<Mutex<Vec<String>>>,
}

impl FakePackageManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outdated(mut self, package: OutdatedPackage) -> Self {
        self.outdated.push(package);
        self
    }

    pub fn with_homepage(mut self, name: &str, homepage: &str) -> Self {
        self.info.entry(name.to_string()).or_default().homepage = Some(homepage.to_string());
        self
    }

    pub fn with_stable_url(mut self, name: &str, url: &str) -> Self {
        self.info.entry(name.to_string()).or_default().stable_url = Some(url.to_string());
        self
    }

    /// Handle to the packages whose info was requested, in request order
    pub fn info_requests(&self) -> Arc<Mutex<Vec<String>>> {
        self.info_requests.clone()
    }
}

#[async_trait]
impl PackageManager for FakePackageManager {
    async fn outdated(&self) -> Result<Vec<OutdatedPackage>, PackageManagerError> {
        Ok(self.outdated.clone())
    }

    async fn info(
        &self,
        name: &str,
        _kind: PackageKind,
    ) -> Result<PackageInfo, PackageManagerError> {
        self.info_requests.lock().unwrap().push(name.to_string());
        let mut info = self
            .info
            .get(name)
            .cloned()
            .ok_or_else(|| PackageManagerError::NotFound(name.to_string()))?;
        info.name = name.to_string();
        Ok(info)
    }
}

/// Selector answering with fixed names and recording what it was offered
#[derive(Default)]
pub struct FakeSelector {
    answer: Vec<String>,
    offered: Arc<Mutex<Vec<Vec<String>>>>,
}

impl FakeSelector {
    pub fn choosing(names: &[&str]) -> Self {
        Self {
            answer: names.iter().map(|name| name.to_string()).collect(),
            offered: Default::default(),
        }
    }

    /// Handle to the candidate lists offered so far
    pub fn offered(&self) -> Arc<Mutex<Vec<Vec<String>>>> {
        self.offered.clone()
    }
}

impl PackageSelector for FakeSelector {
    fn select(&self, _header: &str, candidates: &[String]) -> Result<Vec<String>, SelectError> {
        self.offered.lock().unwrap().push(candidates.to_vec());
        Ok(self.answer.clone())
    }
}

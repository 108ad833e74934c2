//! Run orchestration
//!
//! A run moves through `DependencyCheck → Enumerate → IgnoreFilter → PerPackage → Done`.
//! Only a failed dependency check aborts it; every other failure is reported and the
//! affected package (or step) is skipped.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use tracing::{debug, info};

use crate::config::IGNORE_PROMPT;
use crate::console::Reporter;
use crate::ignore::IgnoreList;
use crate::package::{OutdatedPackage, PackageManager};
use crate::preflight::{Preflight, PreflightError};
use crate::release::host::ReleaseHosts;
use crate::release::notes::collect_entries;
use crate::release::report::{ReportHeader, render_report, report_file_name, run_directory_name};
use crate::repository::RepositoryResolver;
use crate::select::PackageSelector;
use crate::version::window::{VersionWindow, compute_window, installed_is_published};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    DependencyCheck,
    Enumerate,
    IgnoreFilter,
    PerPackage,
    Done,
}

/// Settings for one run, after merging the config file with command-line flags
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    /// Directory under which the timestamped report directory is created
    pub output_root: PathBuf,
    pub ignore_path: PathBuf,
    pub include_prereleases: bool,
    /// Offer the remaining candidates for ignoring before processing
    pub interactive: bool,
    /// Restrict the run to these package names; empty means all
    pub only: Vec<String>,
}

/// Why a package produced no report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingInstalledVersion,
    PackageInfo(String),
    Unresolvable(String),
    UnsupportedHost(String),
    TagFetch(String),
    NoTags,
    UnrecognizedVersion(String),
    WriteFailed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingInstalledVersion => write!(f, "no installed version reported"),
            SkipReason::PackageInfo(e) => write!(f, "failed to read package info: {}", e),
            SkipReason::Unresolvable(e) => write!(f, "{}", e),
            SkipReason::UnsupportedHost(repo) => write!(f, "no release client for {}", repo),
            SkipReason::TagFetch(e) => write!(f, "failed to fetch tags: {}", e),
            SkipReason::NoTags => write!(f, "no published tags"),
            SkipReason::UnrecognizedVersion(v) => {
                write!(f, "installed version {:?} is not a release version", v)
            }
            SkipReason::WriteFailed(e) => write!(f, "failed to write report: {}", e),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPackage {
    pub name: String,
    pub reason: SkipReason,
}

/// What a run did, package by package
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Directory holding this run's reports; `None` when nothing was written
    pub output_dir: Option<PathBuf>,
    pub written: Vec<PathBuf>,
    pub up_to_date: Vec<String>,
    pub skipped: Vec<SkippedPackage>,
    /// Outdated packages left out because they are on the ignore list
    pub ignored: Vec<String>,
}

enum Outcome {
    Written(PathBuf),
    UpToDate,
    Skipped(SkipReason),
}

pub struct Orchestrator {
    preflight: Preflight,
    manager: Arc<dyn PackageManager>,
    hosts: ReleaseHosts,
    resolver: RepositoryResolver,
    selector: Box<dyn PackageSelector>,
    reporter: Reporter,
    settings: RunSettings,
}

impl Orchestrator {
    pub fn new(
        manager: Arc<dyn PackageManager>,
        hosts: ReleaseHosts,
        selector: Box<dyn PackageSelector>,
        reporter: Reporter,
        settings: RunSettings,
    ) -> Self {
        Self {
            preflight: Preflight::system(),
            manager,
            hosts,
            resolver: RepositoryResolver::default(),
            selector,
            reporter,
            settings,
        }
    }

    pub fn with_preflight(mut self, preflight: Preflight) -> Self {
        self.preflight = preflight;
        self
    }

    pub fn with_resolver(mut self, resolver: RepositoryResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Execute a full run.
    ///
    /// # Returns
    /// * `Ok(RunSummary)` - The run reached `Done`, whatever happened to individual packages
    /// * `Err(PreflightError)` - A required external tool is missing; nothing else ran
    pub async fn run(&self) -> Result<RunSummary, PreflightError> {
        let started_at = Local::now().naive_local();
        let mut summary = RunSummary::default();

        self.enter(RunState::DependencyCheck);
        if let Err(e) = self.preflight.check() {
            self.reporter.warn(&e.to_string());
            return Err(e);
        }

        self.enter(RunState::Enumerate);
        self.reporter.step("Checking for outdated packages");
        let outdated = match self.manager.outdated().await {
            Ok(packages) => self.apply_only_filter(packages),
            Err(e) => {
                self.reporter.warn(&format!("Failed to list outdated packages: {}", e));
                return Ok(self.finish(summary));
            }
        };
        if outdated.is_empty() {
            self.reporter.success("Everything is up to date");
            return Ok(self.finish(summary));
        }

        self.enter(RunState::IgnoreFilter);
        let candidates = self.filter_ignored(outdated, &mut summary);
        if candidates.is_empty() {
            self.reporter.success("All outdated packages are ignored");
            return Ok(self.finish(summary));
        }

        self.enter(RunState::PerPackage);
        let run_dir = self
            .settings
            .output_root
            .join(run_directory_name(started_at));
        for package in &candidates {
            match self.process_package(package, &run_dir, started_at).await {
                Outcome::Written(path) => {
                    summary.output_dir = Some(run_dir.clone());
                    summary.written.push(path);
                }
                Outcome::UpToDate => summary.up_to_date.push(package.name.clone()),
                Outcome::Skipped(reason) => {
                    self.reporter.warn(&format!("Skipping {}: {}", package.name, reason));
                    summary.skipped.push(SkippedPackage {
                        name: package.name.clone(),
                        reason,
                    });
                }
            }
        }

        Ok(self.finish(summary))
    }

    fn enter(&self, state: RunState) {
        debug!("Entering state {:?}", state);
    }

    fn finish(&self, summary: RunSummary) -> RunSummary {
        self.enter(RunState::Done);

        let mut banner = format!(
            "Done: {} report(s) written, {} up to date, {} skipped",
            summary.written.len(),
            summary.up_to_date.len(),
            summary.skipped.len()
        );
        if let Some(dir) = &summary.output_dir {
            banner.push_str(&format!(" ({})", dir.display()));
        }
        self.reporter.success(&banner);
        summary
    }

    fn apply_only_filter(&self, packages: Vec<OutdatedPackage>) -> Vec<OutdatedPackage> {
        if self.settings.only.is_empty() {
            return packages;
        }
        packages
            .into_iter()
            .filter(|package| self.settings.only.contains(&package.name))
            .collect()
    }

    /// Drop ignored packages, then let the user ignore more of the remaining ones
    fn filter_ignored(
        &self,
        outdated: Vec<OutdatedPackage>,
        summary: &mut RunSummary,
    ) -> Vec<OutdatedPackage> {
        let mut ignore_list = match IgnoreList::load(&self.settings.ignore_path) {
            Ok(list) => list,
            Err(e) => {
                // the file is left untouched and nothing is offered for ignoring
                self.reporter.warn(&format!("{}; ignore selection skipped", e));
                return outdated;
            }
        };

        let (ignored, candidates): (Vec<_>, Vec<_>) = outdated
            .into_iter()
            .partition(|package| ignore_list.is_ignored(&package.name));
        summary
            .ignored
            .extend(ignored.into_iter().map(|package| package.name));

        if !self.settings.interactive || candidates.is_empty() {
            return candidates;
        }

        let names: Vec<String> = candidates
            .iter()
            .map(|package| package.name.clone())
            .collect();
        let chosen: HashSet<String> = match self.selector.select(IGNORE_PROMPT, &names) {
            Ok(chosen) => chosen.into_iter().collect(),
            Err(e) => {
                self.reporter.warn(&e.to_string());
                HashSet::new()
            }
        };
        if chosen.is_empty() {
            return candidates;
        }

        match ignore_list.append(&chosen) {
            Ok(added) => info!("Ignoring {} more packages", added),
            Err(e) => self.reporter.warn(&e.to_string()),
        }

        let (ignored, candidates): (Vec<_>, Vec<_>) = candidates
            .into_iter()
            .partition(|package| chosen.contains(&package.name));
        summary
            .ignored
            .extend(ignored.into_iter().map(|package| package.name));
        candidates
    }

    async fn process_package(
        &self,
        package: &OutdatedPackage,
        run_dir: &Path,
        started_at: NaiveDateTime,
    ) -> Outcome {
        let Some(installed) = package.installed_version() else {
            return Outcome::Skipped(SkipReason::MissingInstalledVersion);
        };
        let latest = package.latest_version();
        self.reporter.step(&format!(
            "{} {} -> {}",
            package.name,
            installed,
            latest.unwrap_or("?")
        ));

        let info = match self.manager.info(&package.name, package.kind).await {
            Ok(info) => info,
            Err(e) => return Outcome::Skipped(SkipReason::PackageInfo(e.to_string())),
        };

        let repository = match self.resolver.resolve(&info) {
            Ok(repository) => repository,
            Err(e) => return Outcome::Skipped(SkipReason::Unresolvable(e.to_string())),
        };

        let Some(host) = self.hosts.for_repository(&repository) else {
            return Outcome::Skipped(SkipReason::UnsupportedHost(repository.to_string()));
        };

        let mut tags = match host.fetch_tags(&repository).await {
            Ok(tags) => tags,
            Err(e) => return Outcome::Skipped(SkipReason::TagFetch(e.to_string())),
        };
        if !self.settings.include_prereleases {
            tags.retain(|tag| !tag.prerelease);
        }
        if tags.is_empty() {
            return Outcome::Skipped(SkipReason::NoTags);
        }

        if !installed_is_published(installed, &tags) {
            info!(
                "Installed version {} of {} is not among the tags of {}",
                installed, package.name, repository
            );
        }

        let window = match compute_window(installed, &tags, &self.reporter) {
            VersionWindow::Newer(window) => window,
            VersionWindow::UpToDate => {
                self.reporter.success(&format!("{} has no newer releases", package.name));
                return Outcome::UpToDate;
            }
            VersionWindow::Unrecognized { installed } => {
                return Outcome::Skipped(SkipReason::UnrecognizedVersion(installed));
            }
        };
        debug!(
            "{} release(s) newer than {} for {}",
            window.len(),
            installed,
            package.name
        );

        let entries = collect_entries(host.as_ref(), &repository, &window, &self.reporter).await;
        let header = ReportHeader {
            package: &package.name,
            installed_version: installed,
            latest_version: latest,
            generated_at: started_at,
        };
        let document = render_report(&header, &entries);

        let path = run_dir.join(report_file_name(&package.name, installed, latest));
        if let Err(e) = write_report(run_dir, &path, &document).await {
            return Outcome::Skipped(SkipReason::WriteFailed(e.to_string()));
        }

        self.reporter.success(&format!("Wrote {}", path.display()));
        Outcome::Written(path)
    }
}

/// Write a report, creating the run directory on first use
async fn write_report(run_dir: &Path, path: &Path, document: &str) -> std::io::Result<()> {
    tokio::fs::create_dir_all(run_dir).await?;
    tokio::fs::write(path, document).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::manager::MockPackageManager;
    use crate::package::{PackageInfo, PackageKind};
    use crate::release::host::MockReleaseHost;
    use crate::repository::HostKind;
    use crate::select::MockPackageSelector;
    use crate::version::types::Tag;
    use tempfile::TempDir;

    fn outdated(name: &str, installed: &str, latest: &str) -> OutdatedPackage {
        OutdatedPackage {
            name: name.to_string(),
            kind: PackageKind::Formula,
            installed_versions: vec![installed.to_string()],
            current_version: Some(latest.to_string()),
        }
    }

    fn settings(temp_dir: &TempDir, interactive: bool) -> RunSettings {
        RunSettings {
            output_root: temp_dir.path().join("out"),
            ignore_path: temp_dir.path().join("ignore.txt"),
            include_prereleases: false,
            interactive,
            only: Vec::new(),
        }
    }

    fn github_info(name: &str) -> PackageInfo {
        PackageInfo {
            name: name.to_string(),
            homepage: Some(format!("https://github.com/acme/{}", name)),
            ..PackageInfo::default()
        }
    }

    fn no_tools_needed() -> Preflight {
        Preflight::with_probe(&["brew"], |_| true)
    }

    #[tokio::test]
    async fn missing_tool_aborts_before_enumeration() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = MockPackageManager::new();
        manager.expect_outdated().times(0);
        let (reporter, output) = Reporter::capture();

        let orchestrator = Orchestrator::new(
            Arc::new(manager),
            ReleaseHosts::new(),
            Box::new(MockPackageSelector::new()),
            reporter,
            settings(&temp_dir, false),
        )
        .with_preflight(Preflight::with_probe(&["brew"], |_| false));

        let result = orchestrator.run().await;

        assert_eq!(
            result,
            Err(PreflightError::MissingTools(vec!["brew".to_string()]))
        );
        assert!(output.contents().contains("⚠ Required tool(s) not found"));
    }

    #[tokio::test]
    async fn selected_packages_are_ignored_and_persisted() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = MockPackageManager::new();
        manager.expect_outdated().returning(|| {
            Ok(vec![
                outdated("foo", "1.0.0", "1.1.0"),
                outdated("bar", "2.0.0", "2.0.1"),
            ])
        });
        manager
            .expect_info()
            .withf(|name, _| name == "bar")
            .times(1)
            .returning(|name, _| Ok(github_info(name)));

        let mut host = MockReleaseHost::new();
        host.expect_host_kind().return_const(HostKind::GitHub);
        host.expect_fetch_tags()
            .returning(|_| Ok(vec![Tag::new("v2.0.0", false)]));

        let mut selector = MockPackageSelector::new();
        selector
            .expect_select()
            .withf(|_, candidates| candidates == ["foo".to_string(), "bar".to_string()])
            .times(1)
            .returning(|_, _| Ok(vec!["foo".to_string()]));

        let (reporter, _output) = Reporter::capture();
        let orchestrator = Orchestrator::new(
            Arc::new(manager),
            ReleaseHosts::new().with(Arc::new(host)),
            Box::new(selector),
            reporter,
            settings(&temp_dir, true),
        )
        .with_preflight(no_tools_needed());

        let summary = orchestrator.run().await.unwrap();

        assert_eq!(summary.ignored, vec!["foo".to_string()]);
        assert_eq!(summary.up_to_date, vec!["bar".to_string()]);
        assert_eq!(summary.output_dir, None);
        assert_eq!(
            std::fs::read_to_string(temp_dir.path().join("ignore.txt")).unwrap(),
            "foo\n"
        );
    }

    #[tokio::test]
    async fn prereleases_are_dropped_unless_requested() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = MockPackageManager::new();
        manager
            .expect_outdated()
            .returning(|| Ok(vec![outdated("foo", "1.0.0", "1.1.0")]));
        manager
            .expect_info()
            .returning(|name, _| Ok(github_info(name)));

        let mut host = MockReleaseHost::new();
        host.expect_host_kind().return_const(HostKind::GitHub);
        host.expect_fetch_tags().returning(|_| {
            Ok(vec![
                Tag::new("v1.2.0-rc.1", true),
                Tag::new("v1.1.0", false),
                Tag::new("v1.0.0", false),
            ])
        });
        host.expect_fetch_note()
            .withf(|_, tag| tag == "v1.1.0")
            .times(1)
            .returning(|_, _| Ok(Some("Stable".to_string())));

        let (reporter, _output) = Reporter::capture();
        let orchestrator = Orchestrator::new(
            Arc::new(manager),
            ReleaseHosts::new().with(Arc::new(host)),
            Box::new(MockPackageSelector::new()),
            reporter,
            settings(&temp_dir, false),
        )
        .with_preflight(no_tools_needed());

        let summary = orchestrator.run().await.unwrap();

        assert_eq!(summary.written.len(), 1);
        let report = std::fs::read_to_string(&summary.written[0]).unwrap();
        assert!(report.contains("## v1.1.0\n\nStable\n"));
        assert!(!report.contains("rc.1"));
    }

    #[tokio::test]
    async fn unrecognized_installed_version_is_skipped_with_reason() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = MockPackageManager::new();
        manager
            .expect_outdated()
            .returning(|| Ok(vec![outdated("foo", "HEAD-1a2b3c", "1.1.0")]));
        manager
            .expect_info()
            .returning(|name, _| Ok(github_info(name)));

        let mut host = MockReleaseHost::new();
        host.expect_host_kind().return_const(HostKind::GitHub);
        host.expect_fetch_tags()
            .returning(|_| Ok(vec![Tag::new("v1.1.0", false)]));
        host.expect_fetch_note().times(0);

        let (reporter, output) = Reporter::capture();
        let orchestrator = Orchestrator::new(
            Arc::new(manager),
            ReleaseHosts::new().with(Arc::new(host)),
            Box::new(MockPackageSelector::new()),
            reporter,
            settings(&temp_dir, false),
        )
        .with_preflight(no_tools_needed());

        let summary = orchestrator.run().await.unwrap();

        assert_eq!(
            summary.skipped,
            vec![SkippedPackage {
                name: "foo".to_string(),
                reason: SkipReason::UnrecognizedVersion("HEAD-1a2b3c".to_string()),
            }]
        );
        assert!(output.contents().contains("⚠ Skipping foo"));
    }

    #[tokio::test]
    async fn only_filter_limits_processed_packages() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = MockPackageManager::new();
        manager.expect_outdated().returning(|| {
            Ok(vec![
                outdated("foo", "1.0.0", "1.1.0"),
                outdated("bar", "2.0.0", "2.1.0"),
            ])
        });
        manager
            .expect_info()
            .withf(|name, _| name == "bar")
            .times(1)
            .returning(|name, _| {
                Ok(PackageInfo {
                    name: name.to_string(),
                    homepage: Some("https://example.com".to_string()),
                    ..PackageInfo::default()
                })
            });

        let (reporter, _output) = Reporter::capture();
        let mut settings = settings(&temp_dir, false);
        settings.only = vec!["bar".to_string()];
        let orchestrator = Orchestrator::new(
            Arc::new(manager),
            ReleaseHosts::new(),
            Box::new(MockPackageSelector::new()),
            reporter,
            settings,
        )
        .with_preflight(no_tools_needed());

        let summary = orchestrator.run().await.unwrap();

        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(summary.skipped[0].name, "bar");
        assert!(matches!(
            summary.skipped[0].reason,
            SkipReason::Unresolvable(_)
        ));
    }
}

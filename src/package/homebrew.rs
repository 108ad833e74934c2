//! Homebrew package manager implementation

use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::package::error::PackageManagerError;
use crate::package::manager::PackageManager;
use crate::package::types::{OutdatedPackage, PackageInfo, PackageKind};

/// Default program name for Homebrew
const DEFAULT_PROGRAM: &str = "brew";

/// Package manager implementation backed by the `brew` CLI
pub struct Homebrew {
    program: String,
}

impl Homebrew {
    /// Creates a new Homebrew client using a custom executable
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
        }
    }

    async fn run(&self, args: &[&str]) -> Result<String, PackageManagerError> {
        let command = format!("{} {}", self.program, args.join(" "));
        debug!("Running {}", command);

        let output = Command::new(&self.program)
            .args(args)
            .env("HOMEBREW_NO_AUTO_UPDATE", "1")
            .output()
            .await
            .map_err(|source| PackageManagerError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();

        // `brew outdated` may exit non-zero while still printing valid JSON
        if !output.status.success() && stdout.trim().is_empty() {
            return Err(PackageManagerError::CommandFailed {
                command,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        if !output.status.success() {
            warn!("{} exited with {}, using its output anyway", command, output.status);
        }

        Ok(stdout)
    }
}

impl Default for Homebrew {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

#[async_trait::async_trait]
impl PackageManager for Homebrew {
    async fn outdated(&self) -> Result<Vec<OutdatedPackage>, PackageManagerError> {
        let stdout = self.run(&["outdated", "--json=v2"]).await?;
        parse_outdated(&stdout)
    }

    async fn info(
        &self,
        name: &str,
        kind: PackageKind,
    ) -> Result<PackageInfo, PackageManagerError> {
        let kind_flag = match kind {
            PackageKind::Formula => "--formula",
            PackageKind::Cask => "--cask",
        };
        let stdout = self.run(&["info", "--json=v2", kind_flag, name]).await?;
        parse_info(&stdout, name, kind)
    }
}

/// Response from `brew outdated --json=v2`
#[derive(Debug, Deserialize)]
struct OutdatedResponse {
    #[serde(default)]
    formulae: Vec<OutdatedEntry>,
    #[serde(default)]
    casks: Vec<OutdatedEntry>,
}

#[derive(Debug, Deserialize)]
struct OutdatedEntry {
    name: String,
    installed_versions: OneOrMany,
    current_version: Option<String>,
}

/// Older Homebrew releases report a single string for casks
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(version) => vec![version],
            OneOrMany::Many(versions) => versions,
        }
    }
}

/// Response from `brew info --json=v2`
#[derive(Debug, Deserialize)]
struct InfoResponse {
    #[serde(default)]
    formulae: Vec<FormulaInfo>,
    #[serde(default)]
    casks: Vec<CaskInfo>,
}

#[derive(Debug, Deserialize)]
struct FormulaInfo {
    name: String,
    homepage: Option<String>,
    #[serde(default)]
    urls: FormulaUrls,
}

#[derive(Debug, Default, Deserialize)]
struct FormulaUrls {
    stable: Option<SourceUrl>,
    head: Option<SourceUrl>,
}

#[derive(Debug, Deserialize)]
struct SourceUrl {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CaskInfo {
    token: String,
    homepage: Option<String>,
    url: Option<String>,
}

/// Parse `brew outdated --json=v2` output, formulae first
pub fn parse_outdated(json: &str) -> Result<Vec<OutdatedPackage>, PackageManagerError> {
    let response: OutdatedResponse = serde_json::from_str(json)?;

    let formulae = response
        .formulae
        .into_iter()
        .map(|entry| (entry, PackageKind::Formula));
    let casks = response
        .casks
        .into_iter()
        .map(|entry| (entry, PackageKind::Cask));

    Ok(formulae
        .chain(casks)
        .map(|(entry, kind)| OutdatedPackage {
            name: entry.name,
            kind,
            installed_versions: entry.installed_versions.into_vec(),
            current_version: entry.current_version,
        })
        .collect())
}

/// Parse `brew info --json=v2` output for a single package
pub fn parse_info(
    json: &str,
    name: &str,
    kind: PackageKind,
) -> Result<PackageInfo, PackageManagerError> {
    let response: InfoResponse = serde_json::from_str(json)?;

    let info = match kind {
        PackageKind::Formula => response.formulae.into_iter().next().map(|formula| {
            let urls = formula.urls;
            PackageInfo {
                name: formula.name,
                homepage: formula.homepage,
                stable_url: urls.stable.and_then(|source| source.url),
                head_url: urls.head.and_then(|source| source.url),
            }
        }),
        PackageKind::Cask => response.casks.into_iter().next().map(|cask| PackageInfo {
            name: cask.token,
            homepage: cask.homepage,
            stable_url: cask.url,
            head_url: None,
        }),
    };

    info.ok_or_else(|| PackageManagerError::NotFound(name.to_string()))
}

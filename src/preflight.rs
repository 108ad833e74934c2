//! Dependency check run before anything else

use thiserror::Error;
use tracing::debug;

use crate::config::REQUIRED_TOOLS;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreflightError {
    #[error("Required tool(s) not found on PATH: {}", .0.join(", "))]
    MissingTools(Vec<String>),
}

/// Checks that external tools are installed
#[derive(Debug, Clone)]
pub struct Preflight {
    tools: Vec<String>,
    probe: fn(&str) -> bool,
}

impl Preflight {
    /// Look up [`REQUIRED_TOOLS`] on PATH
    pub fn system() -> Self {
        Self::with_probe(REQUIRED_TOOLS, |tool| which::which(tool).is_ok())
    }

    pub fn with_probe(tools: &[&str], probe: fn(&str) -> bool) -> Self {
        Self {
            tools: tools.iter().map(|tool| tool.to_string()).collect(),
            probe,
        }
    }

    pub fn check(&self) -> Result<(), PreflightError> {
        let missing: Vec<String> = self
            .tools
            .iter()
            .filter(|tool| !(self.probe)(tool))
            .cloned()
            .collect();

        if missing.is_empty() {
            debug!("All required tools found: {}", self.tools.join(", "));
            Ok(())
        } else {
            Err(PreflightError::MissingTools(missing))
        }
    }
}

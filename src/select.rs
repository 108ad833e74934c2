//! Interactive selection of packages to ignore

use inquire::{InquireError, MultiSelect};
use thiserror::Error;
use tracing::debug;

#[cfg(test)]
use mockall::automock;

#[derive(Debug, Error)]
pub enum SelectError {
    #[error("Selection prompt failed: {0}")]
    Prompt(#[from] InquireError),
}

/// Lets the user pick a subset of candidate package names
#[cfg_attr(test, automock)]
pub trait PackageSelector: Send + Sync {
    /// Returns the chosen names; empty when nothing was chosen or the prompt was cancelled
    fn select(&self, header: &str, candidates: &[String]) -> Result<Vec<String>, SelectError>;
}

/// Multi-select prompt on the terminal
pub struct TerminalSelector;

impl PackageSelector for TerminalSelector {
    fn select(&self, header: &str, candidates: &[String]) -> Result<Vec<String>, SelectError> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        match MultiSelect::new(header, candidates.to_vec()).prompt() {
            Ok(chosen) => Ok(chosen),
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                debug!("Ignore selection cancelled");
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Selector for non-interactive runs; never picks anything
pub struct NoSelection;

impl PackageSelector for NoSelection {
    fn select(&self, _header: &str, _candidates: &[String]) -> Result<Vec<String>, SelectError> {
        Ok(Vec::new())
    }
}

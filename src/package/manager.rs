//! Package manager trait for querying installed packages

#[cfg(test)]
use mockall::automock;

use crate::package::error::PackageManagerError;
use crate::package::types::{OutdatedPackage, PackageInfo, PackageKind};

/// Trait for querying a package manager
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait PackageManager: Send + Sync {
    /// Lists installed packages that have a newer version available
    ///
    /// # Returns
    /// * `Ok(Vec<OutdatedPackage>)` - Formulae first, then casks, in package manager order
    /// * `Err(PackageManagerError)` - If the query fails
    async fn outdated(&self) -> Result<Vec<OutdatedPackage>, PackageManagerError>;

    /// Fetches homepage and source URLs for a package
    ///
    /// # Arguments
    /// * `name` - Package name as reported by [`PackageManager::outdated`]
    /// * `kind` - Whether the package is a formula or a cask
    async fn info(&self, name: &str, kind: PackageKind)
    -> Result<PackageInfo, PackageManagerError>;
}

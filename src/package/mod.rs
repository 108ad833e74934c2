//! Package manager layer
//! - types.rs: Common types (OutdatedPackage, PackageInfo, PackageKind)
//! - manager.rs: PackageManager trait definition
//! - homebrew.rs: Homebrew implementation driving `brew --json=v2`
//! - error.rs: Error type for package manager queries

pub mod error;
pub mod homebrew;
pub mod manager;
pub mod types;

pub use error::PackageManagerError;
pub use homebrew::Homebrew;
pub use manager::PackageManager;
pub use types::{OutdatedPackage, PackageInfo, PackageKind};

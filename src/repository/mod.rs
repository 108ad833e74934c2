//! Repository resolution: which hosted repository publishes a package's releases
//!
//! - [`host`]: Host classification and repository coordinates
//! - [`resolver`]: Priority-ordered resolution over a package's URLs

pub mod host;
pub mod resolver;

pub use host::{Host, HostKind, HostPatterns, RepositoryCoordinate};
pub use resolver::{RepositoryResolver, ResolveError};

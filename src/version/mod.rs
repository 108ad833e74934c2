//! Version window calculation
//!
//! Given an installed version and the tags a repository publishes, works out which
//! tags are strictly newer, newest first.
//!
//! # Modules
//!
//! - [`ordering`]: Normalization and natural version ordering
//! - [`types`]: The `Tag` type shared with the release hosts
//! - [`window`]: The window computation itself

pub mod ordering;
pub mod types;
pub mod window;

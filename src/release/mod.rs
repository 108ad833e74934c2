//! Release notes layer
//!
//! Fetches tags and release notes from hosting providers and renders them into
//! per-package Markdown reports.
//!
//! # Modules
//!
//! - [`host`]: `ReleaseHost` trait and the per-kind client registry
//! - [`hosts`]: GitHub and GitLab implementations
//! - [`notes`]: Note collection with placeholder substitution
//! - [`report`]: Markdown rendering and file naming
//! - [`error`]: Error type for host requests

pub mod error;
pub mod host;
pub mod hosts;
pub mod notes;
pub mod report;

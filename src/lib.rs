pub mod config;
pub mod console;
pub mod ignore;
pub mod logging;
pub mod orchestrator;
pub mod package;
pub mod preflight;
pub mod release;
pub mod repository;
pub mod select;
pub mod version;

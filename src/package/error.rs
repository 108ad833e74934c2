use thiserror::Error;

#[derive(Debug, Error)]
pub enum PackageManagerError {
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("{command} exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("Invalid package manager output: {0}")]
    InvalidOutput(#[from] serde_json::Error),

    #[error("Package not found: {0}")]
    NotFound(String),
}

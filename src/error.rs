use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Failed to create directory {}: {source}", .path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Manifest not found: {}", .0.display())]
    ManifestMissing(PathBuf),

    #[error("Failed to read manifest {}: {source}", .path.display())]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Dependency installation failed ({})", describe_code(.code))]
    InstallFailed { code: Option<i32> },

    #[error("Invalid configuration in {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("exit code {c}"),
        None => "terminated by signal".to_string(),
    }
}

impl SetupError {
    /// Process exit status for this failure. A failed installer run keeps its own code.
    pub fn exit_code(&self) -> i32 {
        match self {
            SetupError::InstallFailed { code: Some(c) } if *c != 0 => *c,
            _ => 1,
        }
    }
}

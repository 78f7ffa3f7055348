use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

/// Errors that can occur while resolving or assembling an xcodebuild invocation
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no Xcode workspace or project found under {}", .0.display())]
    NoWorkspaceFound(PathBuf),

    #[error("no {0} to choose from")]
    NoOptions(&'static str),

    #[error("no destinations to run against")]
    NoDestinations,

    #[error("destination '{0}' is not available")]
    DestinationNotFound(String),

    #[error("unrecognized device family '{0}'")]
    UnknownDeviceFamily(String),

    #[error("selection state at {} is corrupt: {source}", .path.display())]
    CorruptState {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("{tool} not found on this host ({hint})")]
    ToolMissing { tool: String, hint: String },

    #[error("{tool} failed with {status}")]
    ExecutionFailed { tool: String, status: ExitStatus },

    #[error("selection cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for xcrunner operations
pub type Result<T> = std::result::Result<T, Error>;

use std::path::PathBuf;

use crate::violation::Violation;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid pattern `{pattern}`: {msg}")]
    Pattern { pattern: String, msg: String },

    #[error("nested schema under key `{key}` has no directory name")]
    MissingDirName { key: String },

    #[error(transparent)]
    Violation(#[from] Violation),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// The violation behind this error, when it came from a crash-mode walk.
    pub fn as_violation(&self) -> Option<&Violation> {
        match self {
            Error::Violation(v) => Some(v),
            _ => None,
        }
    }
}

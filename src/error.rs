use std::path::{Path, PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed input in {origin}: {details} (at line ~{line})")]
    MalformedInput {
        origin: String,
        line: usize,
        details: String,
    },

    #[error("failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl Error {
    /// a [Error::MalformedInput] not yet attributed to a file. `line` is
    /// one-based
    pub fn malformed(line: usize, details: impl Into<String>) -> Self {
        Self::MalformedInput {
            origin: String::from("<input>"),
            line,
            details: details.into(),
        }
    }

    pub fn io(
        action: &'static str,
        path: impl AsRef<Path>,
        source: std::io::Error,
    ) -> Self {
        Self::Io {
            action,
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// attach `path` as the origin of a [Error::MalformedInput]. other
    /// variants already carry their path and are returned unchanged
    pub fn in_file(self, path: impl AsRef<Path>) -> Self {
        match self {
            Self::MalformedInput { line, details, .. } => {
                Self::MalformedInput {
                    origin: path.as_ref().display().to_string(),
                    line,
                    details,
                }
            }
            e => e,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedInput { .. })
    }
}

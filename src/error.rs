// src/error.rs

use std::io;
use std::path::PathBuf;

/// Everything that can go wrong while turning a domain table into hits.
#[derive(thiserror::Error, Debug)]
pub enum HitError {
    /// The file exists but could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A data line does not follow the domtblout layout.
    #[error("{}:{line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// Naming convention given as text that we do not know.
    #[error("unknown naming mode '{0}' (expected 'default', 'prodigal' or 'gembase')")]
    UnknownMode(String),

    /// Bad arguments, detected before any file is touched.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl HitError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        HitError::Io { path: path.into(), source }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        HitError::Parse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }
}

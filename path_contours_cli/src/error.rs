use path_contours::{clip::ClipError, offset::OffsetError};
use std::{io, path::PathBuf};
use thiserror::Error;

/// Process exit status for each error class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// CLI usage error (missing args, invalid flags).
    Usage = 1,
    /// Input error (unreadable file, malformed document, bad selection or settings).
    Input = 2,
    /// Processing error (failure while writing the result).
    Processing = 3,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("malformed SVG document: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("invalid config file {path:?}: {source}")]
    Config {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid setting: {0}")]
    InvalidSetting(String),
    #[error("unknown unit '{0}'")]
    UnknownUnit(String),
    #[error("invalid offset options: {0}")]
    Offset(#[from] OffsetError),
    #[error("no elements selected, pass at least one --id")]
    NoSelection,
    #[error("no element with id '{0}'")]
    MissingElement(String),
    #[error("clip shape '{id}' cannot be used: {reason}")]
    InvalidClipShape { id: String, reason: String },
    #[error("clip shape '{id}': {source}")]
    Clip { id: String, source: ClipError },
    #[error("failed to write {path:?}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to write to stdout: {0}")]
    Stdout(io::Error),
}

impl Error {
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::Read { .. }
            | Error::Xml(_)
            | Error::Config { .. }
            | Error::InvalidSetting(_)
            | Error::UnknownUnit(_)
            | Error::Offset(_)
            | Error::NoSelection
            | Error::MissingElement(_)
            | Error::InvalidClipShape { .. }
            | Error::Clip { .. } => ErrorCode::Input,
            Error::Write { .. } | Error::Stdout(_) => ErrorCode::Processing,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

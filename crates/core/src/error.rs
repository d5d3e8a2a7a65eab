use std::fmt;
use std::path::PathBuf;

use crate::types::ListKind;

#[derive(Debug)]
pub enum Error {
    ConfigParse(String),
    /// The content source behind a list failed
    Builder {
        kind: ListKind,
        source: anyhow::Error,
    },
    Serialize {
        kind: ListKind,
        source: serde_json::Error,
    },
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// The file read back differs from the bytes just written
    ReadBackMismatch { path: PathBuf },
    /// An entry is missing a field route derivation needs
    Shape {
        path: PathBuf,
        index: usize,
        message: String,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ConfigParse(msg) => write!(f, "Configuration parse error: {}", msg),
            Error::Builder { kind, source } => {
                write!(f, "Failed to build {} list: {:#}", kind, source)
            }
            Error::Serialize { kind, source } => {
                write!(f, "Failed to serialize {} list: {}", kind, source)
            }
            Error::Io { path, source } => write!(f, "IO error on {}: {}", path.display(), source),
            Error::Parse { path, source } => {
                write!(f, "Invalid JSON in {}: {}", path.display(), source)
            }
            Error::ReadBackMismatch { path } => write!(
                f,
                "Read-back of {} does not match the written list",
                path.display()
            ),
            Error::Shape {
                path,
                index,
                message,
            } => write!(
                f,
                "Invalid entry #{} in {}: {}",
                index,
                path.display(),
                message
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Builder { source, .. } => {
                let err: &(dyn std::error::Error + 'static) = source.as_ref();
                Some(err)
            }
            Error::Serialize { source, .. } | Error::Parse { source, .. } => Some(source),
            Error::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::ConfigParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

use serde::Deserialize;
use std::fmt::{Display, Formatter};
use std::io;
use std::io::ErrorKind;
use std::str::FromStr;

pub const FILEHANDLE_STANDARD: u32 = 0;

pub const FILEHANDLE_ALTERNATE: u32 = 1;

#[derive(Debug, PartialEq)]
pub enum FileError {
    FileNotFound,
    AccessViolation,
    InvalidName(String),
    InvalidMode(String),
    StreamError(String),
    UnknownError(String),
}

impl FileError {
    pub(crate) fn from_io(err: &io::Error) -> Self {
        match err.kind() {
            ErrorKind::NotFound => FileError::FileNotFound,
            ErrorKind::PermissionDenied => FileError::AccessViolation,
            _ => FileError::UnknownError(err.to_string()),
        }
    }
}

impl Display for FileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FileError::FileNotFound => write!(f, "File not found"),
            FileError::AccessViolation => write!(f, "Access violation"),
            FileError::InvalidName(name) => write!(f, "Invalid file name {name:?}"),
            FileError::InvalidMode(mode) => write!(f, "Invalid open mode {mode:?}"),
            FileError::StreamError(message) => write!(f, "Stream error: {message}"),
            FileError::UnknownError(message) => write!(f, "Unknown error: {message}"),
        }
    }
}

impl std::error::Error for FileError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekOrigin {
    Start,
    Current,
    End,
}

/// Backend a handle is bound to. Fixed for the whole life of the handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Buffered C stdio streams.
    #[default]
    Standard,
    /// Media-library streams over a file or an in-memory buffer.
    Alternate,
}

impl BackendKind {
    pub fn from_tag(tag: u32) -> Option<Self> {
        match tag {
            FILEHANDLE_STANDARD => Some(BackendKind::Standard),
            FILEHANDLE_ALTERNATE => Some(BackendKind::Alternate),
            _ => None,
        }
    }

    pub fn tag(self) -> u32 {
        match self {
            BackendKind::Standard => FILEHANDLE_STANDARD,
            BackendKind::Alternate => FILEHANDLE_ALTERNATE,
        }
    }

    /// Whether this build carries an implementation for the backend.
    pub fn is_available(self) -> bool {
        match self {
            BackendKind::Standard => true,
            BackendKind::Alternate => cfg!(feature = "media"),
        }
    }
}

impl Display for BackendKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Standard => write!(f, "standard"),
            BackendKind::Alternate => write!(f, "alternate"),
        }
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standard" => Ok(BackendKind::Standard),
            "alternate" => Ok(BackendKind::Alternate),
            other => Err(format!(
                "Unknown backend {other:?}, expected \"standard\" or \"alternate\""
            )),
        }
    }
}

/// Native streams able to report and move their position.
pub(crate) trait Positioned {
    type Error;

    fn tell(&mut self) -> Result<u64, Self::Error>;

    fn seek(&mut self, offset: i64, origin: SeekOrigin) -> Result<(), Self::Error>;
}

/// Computes the length of a stream by seeking to its end and back.
pub(crate) fn size_by_seek<S: Positioned + ?Sized>(stream: &mut S) -> Result<u64, S::Error> {
    let current = stream.tell()?;
    stream.seek(0, SeekOrigin::End)?;
    let length = stream.tell()?;
    stream.seek(current as i64, SeekOrigin::Start)?;
    Ok(length)
}

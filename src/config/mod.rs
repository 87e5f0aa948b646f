use crate::fs::{BackendKind, FileError};
use crate::handle::FileHandle;
use serde::Deserialize;
use serde_json::{Value, from_value};
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::Path;


static DEFAULT_MODE: &str = "rb";

fn default_mode() -> String {
    String::from(DEFAULT_MODE)
}

/// How resources are opened: which backend and which fopen-style mode.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HandleConfig {
    #[serde(default)]
    pub backend: BackendKind,
    #[serde(default = "default_mode")]
    pub mode: String,
}

impl Default for HandleConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            mode: default_mode(),
        }
    }
}

impl HandleConfig {
    pub fn from_json(value: &Value) -> Option<Self> {
        match from_value::<Self>(value.clone()) {
            Ok(config) => Some(config),
            Err(error) => {
                eprintln!("Can't parse config {value:?} as a handle config: {error}");
                None
            }
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|error| ConfigError::Io(format!("{}: {error}", path.display())))?;
        serde_json::from_str(&content)
            .map_err(|error| ConfigError::Parse(format!("{}: {error}", path.display())))
    }

    pub fn open(&self, name: &str) -> Result<FileHandle, FileError> {
        FileHandle::open(name, &self.mode, self.backend)
    }
}

impl Display for HandleConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[backend: {}, mode: {}]", self.backend, self.mode)
    }
}

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    Io(String),
    Parse(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(message) => write!(f, "Can't read config: {message}"),
            ConfigError::Parse(message) => write!(f, "Can't parse config: {message}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// SPDX-License-Identifier: MPL-2.0
use std::fmt;

#[derive(Debug, Clone)]
pub enum Error {
    Io(String),
    Config(String),
    Load(LoadError),
    /// A newer load started before this one finished; its result was dropped.
    Superseded,
}

/// Reasons a translation bundle could not be obtained.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    /// The request never produced a response (DNS, connection, timeout).
    Network(String),

    /// The server answered with a non-success status.
    Status(u16),

    /// The payload is not a JSON object.
    Parse(String),

    /// No bundle exists for the language in this source.
    NotFound(String),
}

impl LoadError {
    /// Classifies a `serde_json` failure, keeping its message.
    pub fn parse(err: &serde_json::Error) -> Self {
        LoadError::Parse(err.to_string())
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Network(msg) => write!(f, "network failure: {}", msg),
            LoadError::Status(code) => write!(f, "unexpected HTTP status {}", code),
            LoadError::Parse(msg) => write!(f, "malformed bundle: {}", msg),
            LoadError::NotFound(lang) => write!(f, "no bundle for '{}'", lang),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::Load(e) => write!(f, "Load Error: {}", e),
            Error::Superseded => write!(f, "Load superseded by a newer request"),
        }
    }
}

impl std::error::Error for Error {}

impl From<LoadError> for Error {
    fn from(err: LoadError) -> Self {
        Error::Load(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Load(LoadError::parse(&err))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

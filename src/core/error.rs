use std::fmt;

/// Comprehensive error types for qbrgen operations
#[derive(Debug)]
pub enum QbrError {
    /// IO error (file operations, etc.)
    Io(std::io::Error),

    /// Configuration error
    Config(String),

    /// Malformed or inconsistent input data
    Data(String),

    /// CSV reading error
    Csv(csv::Error),

    /// Regex compilation error
    Regex(regex::Error),

    /// TOML parsing error
    TomlParsing(toml::de::Error),

    /// JSON serialization error
    Serialization(serde_json::Error),

    /// File not found error
    FileNotFound(String),

    /// Invalid argument error
    InvalidArgument(String),
}

impl fmt::Display for QbrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QbrError::Io(err) => write!(f, "IO error: {err}"),
            QbrError::Config(msg) => write!(f, "Configuration error: {msg}"),
            QbrError::Data(msg) => write!(f, "Data error: {msg}"),
            QbrError::Csv(err) => write!(f, "CSV error: {err}"),
            QbrError::Regex(err) => write!(f, "Regex error: {err}"),
            QbrError::TomlParsing(err) => write!(f, "TOML parsing error: {err}"),
            QbrError::Serialization(err) => write!(f, "Serialization error: {err}"),
            QbrError::FileNotFound(path) => write!(f, "File not found: {path}"),
            QbrError::InvalidArgument(msg) => write!(f, "Invalid argument: {msg}"),
        }
    }
}

impl std::error::Error for QbrError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QbrError::Io(err) => Some(err),
            QbrError::Csv(err) => Some(err),
            QbrError::Regex(err) => Some(err),
            QbrError::TomlParsing(err) => Some(err),
            QbrError::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for QbrError {
    fn from(err: std::io::Error) -> Self {
        QbrError::Io(err)
    }
}

impl From<csv::Error> for QbrError {
    fn from(err: csv::Error) -> Self {
        QbrError::Csv(err)
    }
}

impl From<regex::Error> for QbrError {
    fn from(err: regex::Error) -> Self {
        QbrError::Regex(err)
    }
}

impl From<toml::de::Error> for QbrError {
    fn from(err: toml::de::Error) -> Self {
        QbrError::TomlParsing(err)
    }
}

impl From<serde_json::Error> for QbrError {
    fn from(err: serde_json::Error) -> Self {
        QbrError::Serialization(err)
    }
}

/// Type alias for Results using QbrError
pub type Result<T> = std::result::Result<T, QbrError>;

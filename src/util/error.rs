// QSOMap - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation; every variant keeps its cause so the
// CLI can log the full chain.
//
// Soft conditions (a malformed record, an invalid locator) are NOT errors:
// they are absorbed where they occur and never reach these types.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all QSOMap operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum QsoMapError {
    /// Contact log could not be read or decoded.
    Decode(DecodeError),

    /// KML document could not be written.
    Export(ExportError),

    /// Configuration loading failed.
    Config(ConfigError),
}

impl fmt::Display for QsoMapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode(e) => write!(f, "Decode error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
        }
    }
}

impl std::error::Error for QsoMapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Config(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Decode errors
// ---------------------------------------------------------------------------

/// Fatal errors while turning a contact log into records.
#[derive(Debug)]
pub enum DecodeError {
    /// The input is empty or whitespace only.
    EmptyInput,

    /// The bytes are neither valid UTF-8 nor valid Windows-1252.
    UnreadableEncoding { len: usize },

    /// The log file exceeds the maximum accepted size.
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// I/O error while reading the log file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "contact log is empty"),
            Self::UnreadableEncoding { len } => write!(
                f,
                "unreadable file: {len} bytes are neither UTF-8 nor Windows-1252 text"
            ),
            Self::FileTooLarge {
                path,
                size,
                max_size,
            } => write!(
                f,
                "'{}' is {size} bytes, exceeds maximum of {max_size} bytes",
                path.display()
            ),
            Self::Io { path, source } => {
                write!(f, "'{}': I/O error: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<DecodeError> for QsoMapError {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors writing an export document. Any of these means the destination
/// holds no valid output.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error creating directories or writing the temporary file.
    Io { path: PathBuf, source: io::Error },

    /// The finished temporary file could not be moved over the destination.
    Persist {
        tmp_path: PathBuf,
        path: PathBuf,
        source: io::Error,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Persist {
                tmp_path,
                path,
                source,
            } => write!(
                f,
                "Failed to move '{}' to '{}': {source}",
                tmp_path.display(),
                path.display()
            ),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Persist { source, .. } => Some(source),
        }
    }
}

impl From<ExportError> for QsoMapError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
///
/// `load_config` turns these into warnings and falls back to defaults;
/// `read_config_file` surfaces them for callers that want the hard failure.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Legacy JSON settings parsing failed.
    JsonParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::JsonParse { path, source } => {
                write!(f, "Settings parse error '{}': {source}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::JsonParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<ConfigError> for QsoMapError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for QSOMap results.
pub type Result<T> = std::result::Result<T, QsoMapError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_top_level_error_keeps_source_chain() {
        let err: QsoMapError = DecodeError::Io {
            path: PathBuf::from("log.adi"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        }
        .into();

        assert!(err.to_string().starts_with("Decode error: 'log.adi'"));
        let decode = err.source().expect("decode error as source");
        assert!(decode.source().is_some(), "io error must stay in the chain");
    }

    #[test]
    fn test_empty_input_message() {
        assert_eq!(DecodeError::EmptyInput.to_string(), "contact log is empty");
    }
}

//! Error types for confpath
//!
//! Every failure is a closed [`ErrorKind`] wrapped in an [`Error`] that
//! carries the failing path, the parser location and an actionable help
//! message when one is known.

use std::fmt;

use crate::container::Format;
use crate::node::NodeKind;

/// Result type alias for confpath operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for confpath operations
#[derive(Debug, Clone)]
pub struct Error {
    /// The kind of error that occurred
    pub kind: ErrorKind,
    /// Path walked up to the failing step (e.g., "servers[0].host")
    pub path: Option<String>,
    /// Source location (file, line) if available
    pub source_location: Option<SourceLocation>,
    /// Actionable help message
    pub help: Option<String>,
    /// Underlying cause (as string for Clone compatibility)
    pub cause: Option<String>,
}

/// Location in a source document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: Option<String>,
    pub line: Option<usize>,
    pub column: Option<usize>,
}

/// Categories of errors that can occur
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorKind {
    /// Source bytes are not well-formed for the format
    #[error("Failed to parse {format} document")]
    Parse { format: Format },
    /// Environment entry without a `=` separator
    #[error("Malformed environment entry: {entry}")]
    MalformedEntry { entry: String },
    /// Two entries map to the same key after prefix stripping
    #[error("Duplicate key: {key}")]
    DuplicateKey { key: String },
    /// Reading a source file failed
    #[error("I/O error")]
    Io,
    /// A step expected a mapping or sequence and found something else
    #[error("Expected {expected}, found {found}")]
    KindMismatch { expected: NodeKind, found: NodeKind },
    /// Mapping does not contain the requested key
    #[error("Key not found: {key}")]
    KeyNotFound { key: String },
    /// Sequence is too short for the requested index
    #[error("Index {index} out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },
    /// YAML stream does not hold exactly one document
    #[error("Malformed document: expected exactly one document, found {documents}")]
    MalformedDocument { documents: usize },
    /// Document has no root value
    #[error("Empty document")]
    EmptyDocument,
    /// The resolved node is not a string scalar
    #[error("Value is not a string (found {found})")]
    NotAString { found: NodeKind },
    /// Rendered environment key is absent
    #[error("Path not found: {key}")]
    PathNotFound { key: String },
}

impl Error {
    fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            path: None,
            source_location: None,
            help: None,
            cause: None,
        }
    }

    /// Create a parse error
    pub fn parse(format: Format, message: impl Into<String>) -> Self {
        Self {
            cause: Some(message.into()),
            ..Self::new(ErrorKind::Parse { format })
        }
    }

    /// Create a malformed environment entry error
    pub fn malformed_entry(entry: impl Into<String>) -> Self {
        Self {
            help: Some("Environment entries must have the form KEY=VALUE".into()),
            ..Self::new(ErrorKind::MalformedEntry {
                entry: entry.into(),
            })
        }
    }

    /// Create a duplicate key error
    pub fn duplicate_key(key: impl Into<String>, prefix: &str) -> Self {
        let key = key.into();
        Self {
            help: Some(format!(
                "More than one variable maps to '{}{}'; remove one of them",
                prefix, key
            )),
            ..Self::new(ErrorKind::DuplicateKey { key })
        }
    }

    /// Create an I/O error
    pub fn io(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source_location: Some(SourceLocation {
                file: Some(file.into()),
                line: None,
                column: None,
            }),
            cause: Some(message.into()),
            ..Self::new(ErrorKind::Io)
        }
    }

    /// Create a node kind mismatch error
    pub fn kind_mismatch(expected: NodeKind, found: NodeKind) -> Self {
        Self::new(ErrorKind::KindMismatch { expected, found })
    }

    /// Create a key not found error
    pub fn key_not_found(key: impl Into<String>) -> Self {
        Self::new(ErrorKind::KeyNotFound { key: key.into() })
    }

    /// Create an index out of range error
    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        Self::new(ErrorKind::IndexOutOfRange { index, len })
    }

    /// Create a malformed document wrapper error
    pub fn malformed_document(documents: usize) -> Self {
        Self {
            help: Some("Split the stream so each source holds a single YAML document".into()),
            ..Self::new(ErrorKind::MalformedDocument { documents })
        }
    }

    /// Create an empty document error
    pub fn empty_document() -> Self {
        Self::new(ErrorKind::EmptyDocument)
    }

    /// Create a terminal type error
    pub fn not_a_string(found: NodeKind) -> Self {
        let help = match found {
            NodeKind::Mapping | NodeKind::Sequence => {
                "The path stops at a container; add steps down to a leaf value"
            }
            _ => "Only string values can be looked up; quote the value in the source",
        };
        Self {
            help: Some(help.into()),
            ..Self::new(ErrorKind::NotAString { found })
        }
    }

    /// Create an environment path not found error
    pub fn path_not_found(key: impl Into<String>, prefix: &str) -> Self {
        let key = key.into();
        Self {
            help: Some(format!(
                "Set an environment variable named '{}{}'",
                prefix, key
            )),
            ..Self::new(ErrorKind::PathNotFound { key })
        }
    }

    /// Add path context to the error
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add source location to the error
    pub fn with_source_location(mut self, loc: SourceLocation) -> Self {
        self.source_location = Some(loc);
        self
    }

    /// Attach a file name to the source location, keeping line and column
    pub fn in_file(mut self, file: impl Into<String>) -> Self {
        let loc = self.source_location.get_or_insert(SourceLocation {
            file: None,
            line: None,
            column: None,
        });
        loc.file = Some(file.into());
        self
    }

    /// Add help message to the error
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// True when the path is absent rather than pointing at the wrong type
    pub fn is_not_found(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::KeyNotFound { .. }
                | ErrorKind::IndexOutOfRange { .. }
                | ErrorKind::PathNotFound { .. }
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        if let Some(path) = &self.path {
            write!(f, "\n  Path: {}", path)?;
        }

        if let Some(loc) = &self.source_location {
            let file = loc.file.as_deref().unwrap_or("<input>");
            write!(f, "\n  File: {}", file)?;
            if let Some(line) = loc.line {
                write!(f, ":{}", line)?;
                if let Some(column) = loc.column {
                    write!(f, ":{}", column)?;
                }
            }
        }

        if let Some(cause) = &self.cause {
            write!(f, "\n  {}", cause)?;
        }

        if let Some(help) = &self.help {
            write!(f, "\n  Help: {}", help)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_key_not_found_display() {
        let err = Error::key_not_found("host").with_path("database.host");
        let display = format!("{}", err);

        assert!(display.contains("Key not found: host"));
        assert!(display.contains("Path: database.host"));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_kind_mismatch_display() {
        let err = Error::kind_mismatch(NodeKind::Mapping, NodeKind::Sequence);
        assert_eq!(
            err.to_string(),
            "Expected mapping, found sequence".to_string()
        );
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_index_out_of_range_display() {
        let err = Error::index_out_of_range(3, 2).with_path("servers[3]");
        let display = format!("{}", err);

        assert!(display.contains("Index 3 out of range (length 2)"));
        assert!(display.contains("Path: servers[3]"));
    }

    #[test]
    fn test_parse_error_with_location() {
        let err = Error::parse(Format::Json, "expected value")
            .with_source_location(SourceLocation {
                file: None,
                line: Some(3),
                column: Some(7),
            })
            .in_file("config.json");
        let display = format!("{}", err);

        assert!(display.contains("Failed to parse json document"));
        assert!(display.contains("File: config.json:3:7"));
        assert!(display.contains("expected value"));
    }

    #[test]
    fn test_duplicate_key_help() {
        let err = Error::duplicate_key("a.b", "APP_");

        assert_eq!(err.kind, ErrorKind::DuplicateKey { key: "a.b".into() });
        assert!(format!("{}", err).contains("'APP_a.b'"));
    }

    #[test]
    fn test_not_a_string_help_for_containers() {
        let err = Error::not_a_string(NodeKind::Mapping);
        assert!(err.help.unwrap().contains("leaf value"));

        let err = Error::not_a_string(NodeKind::Number);
        assert!(err.help.unwrap().contains("quote"));
    }

    #[test]
    fn test_path_not_found_is_not_found() {
        let err = Error::path_not_found("a.[0].b", "APP_");
        assert!(err.is_not_found());
        let display = format!("{}", err);
        assert!(display.contains("Path not found: a.[0].b"));
        assert!(display.contains("'APP_a.[0].b'"));
    }

    #[test]
    fn test_with_help() {
        let err = Error::empty_document().with_help("Provide a document");
        assert!(format!("{}", err).contains("Help: Provide a document"));
    }
}

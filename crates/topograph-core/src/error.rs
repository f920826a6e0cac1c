use std::fmt;
use std::io;
use std::path::PathBuf;

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    InputNotFound,
    InputReadFailed,
    SnapshotParseError,
    TriplesParseError,
    InvalidEnumValue,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1002",
            Self::InputNotFound => "E2001",
            Self::InputReadFailed => "E2002",
            Self::SnapshotParseError => "E3001",
            Self::TriplesParseError => "E3002",
            Self::InvalidEnumValue => "E3003",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::InputNotFound => "Input file not found",
            Self::InputReadFailed => "Input file could not be read",
            Self::SnapshotParseError => "Graph snapshot parse error",
            Self::TriplesParseError => "Semantic triple parse error",
            Self::InvalidEnumValue => "Invalid attribute category or priority value",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in .topograph/config.toml and retry."),
            Self::InputNotFound => Some("Check the path passed on the command line."),
            Self::InputReadFailed => Some("Check file permissions and retry."),
            Self::SnapshotParseError => {
                Some("Expected a JSON object of the form {\"nodes\": [...], \"edges\": [...]}.")
            }
            Self::TriplesParseError => Some(
                "Expected a JSON array of {\"subject\": {\"label\"}, \"predicate\": {\"relation\", \"category\"}, \"object\": {\"value\"}}.",
            ),
            Self::InvalidEnumValue => Some("Use one of UNIQUE, ROOT, RARE, COMMON."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors raised while loading graph inputs from disk or text.
#[derive(Debug, thiserror::Error)]
pub enum TopographError {
    #[error("input not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid graph snapshot: {0}")]
    Snapshot(#[source] serde_json::Error),

    #[error("invalid semantic triples: {0}")]
    Triples(#[source] serde_json::Error),

    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid {expected}: '{got}'")]
    InvalidEnum { expected: &'static str, got: String },
}

impl TopographError {
    /// The machine-readable code for this error.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::NotFound { .. } => ErrorCode::InputNotFound,
            Self::Read { .. } => ErrorCode::InputReadFailed,
            Self::Snapshot(_) => ErrorCode::SnapshotParseError,
            Self::Triples(_) => ErrorCode::TriplesParseError,
            Self::Config { .. } => ErrorCode::ConfigParseError,
            Self::InvalidEnum { .. } => ErrorCode::InvalidEnumValue,
        }
    }

    /// Remediation text, falling back to the code's summary when no hint exists.
    #[must_use]
    pub fn suggestion(&self) -> String {
        let code = self.error_code();
        code.hint().unwrap_or(code.message()).to_string()
    }
}

/// Read an input file, distinguishing a missing path from other I/O failures.
pub(crate) fn read_input(path: &std::path::Path) -> Result<String, TopographError> {
    std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            TopographError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            TopographError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

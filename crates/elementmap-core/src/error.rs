use std::fmt;
use std::path::PathBuf;

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    StoreNotFound,
    ConfigParseError,
    SchemaMismatch,
    InvalidTablePrefix,
    InvalidElementId,
    InvalidLocale,
    RoundLimitExceeded,
    StoreQueryFailed,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::StoreNotFound => "E1001",
            Self::ConfigParseError => "E1002",
            Self::SchemaMismatch => "E1003",
            Self::InvalidTablePrefix => "E1004",
            Self::InvalidElementId => "E2001",
            Self::InvalidLocale => "E2002",
            Self::RoundLimitExceeded => "E3001",
            Self::StoreQueryFailed => "E5001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::StoreNotFound => "Content store not found",
            Self::ConfigParseError => "Config file parse error",
            Self::SchemaMismatch => "Content store schema mismatch",
            Self::InvalidTablePrefix => "Invalid table prefix",
            Self::InvalidElementId => "Invalid element ID",
            Self::InvalidLocale => "Invalid locale",
            Self::RoundLimitExceeded => "Normalization did not converge",
            Self::StoreQueryFailed => "Content store query failed",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::StoreNotFound => {
                Some("Point `[store] path` in .elementmap/config.toml (or --db) at the database.")
            }
            Self::ConfigParseError => Some("Fix syntax in .elementmap/config.toml and retry."),
            Self::SchemaMismatch => {
                Some("Check `[store] table_prefix`; Craft installs usually use `craft_`.")
            }
            Self::InvalidTablePrefix => {
                Some("Use only ASCII letters, digits, and underscores in the table prefix.")
            }
            Self::InvalidElementId => Some("Pass a positive integer element ID."),
            Self::InvalidLocale => Some("Use the locale id exactly as stored, e.g. `en_us`."),
            Self::RoundLimitExceeded => {
                Some("Look for block records that own each other in a cycle.")
            }
            Self::StoreQueryFailed => Some("Retry once. If persistent, check the database file."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Failure while reading the relational content store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The database file does not exist.
    #[error("content store not found: {}", .0.display())]
    NotFound(PathBuf),

    /// SQLite refused to open the database file.
    #[error("failed to open content store {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// A table the traversal depends on is absent.
    #[error("content store is missing required table `{0}`")]
    MissingTable(String),

    /// The configured table prefix would not form a safe identifier.
    #[error("invalid table prefix '{0}'")]
    InvalidPrefix(String),

    /// A query failed to prepare, execute, or decode.
    #[error("content store query failed ({operation}): {source}")]
    Query {
        operation: &'static str,
        #[source]
        source: rusqlite::Error,
    },
}

impl StoreError {
    pub(crate) fn query(operation: &'static str) -> impl FnOnce(rusqlite::Error) -> Self {
        move |source| Self::Query { operation, source }
    }

    /// Machine-readable code for this failure.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound(_) => ErrorCode::StoreNotFound,
            Self::Open { .. } | Self::Query { .. } => ErrorCode::StoreQueryFailed,
            Self::MissingTable(_) => ErrorCode::SchemaMismatch,
            Self::InvalidPrefix(_) => ErrorCode::InvalidTablePrefix,
        }
    }
}

/// Failure while resolving an element map.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// The underlying store could not answer a query.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The requested target is not a usable element id.
    #[error("invalid element id '{0}': expected a positive integer")]
    InvalidId(String),

    /// Container resolution kept producing work past the round cap.
    #[error("normalization did not converge after {rounds} rounds")]
    RoundLimit { rounds: usize },
}

impl MapError {
    /// Machine-readable code for this failure.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Store(err) => err.code(),
            Self::InvalidId(_) => ErrorCode::InvalidElementId,
            Self::RoundLimit { .. } => ErrorCode::RoundLimitExceeded,
        }
    }
}

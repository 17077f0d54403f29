//! Error taxonomy: fatal construction-time schema errors vs per-value fit
//! errors. Fit errors carry the full path from the root; union failures
//! aggregate every attempted member so no diagnostic is lost.

use thiserror::Error;

// ————————————————————————————————————————————————————————————————————————————
// PATHS
// ————————————————————————————————————————————————————————————————————————————

/// One step from the root: a mapping/record key or a sequence index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Seg {
    Key(String),
    Index(usize),
}

/// Location of a mismatch, rendered `$.items[0].payload`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Path(pub Vec<Seg>);

impl std::fmt::Display for Path {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "$")?;
        for seg in &self.0 {
            match seg {
                Seg::Key(k) => write!(f, ".{k}")?,
                Seg::Index(i) => write!(f, "[{i}]")?,
            }
        }
        Ok(())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// FIT ERRORS
// ————————————————————————————————————————————————————————————————————————————

/// A value failed its descriptor at a specific path. Pure data; the core
/// never logs and never retries.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("at {path}: {kind}")]
pub struct FitError {
    pub path: Path,
    pub kind: FitErrorKind,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitErrorKind {
    #[error("expected {expected}, got {actual}")]
    Mismatch { expected: String, actual: String },

    #[error("{actual} is not one of the permitted literals [{allowed}]")]
    LiteralMismatch { allowed: String, actual: String },

    #[error("missing required field `{field}`")]
    MissingField { field: String },

    /// Every union member was attempted and rejected; one error per member,
    /// in declaration order.
    #[error("no union member matched: {}", render_attempts(.attempts))]
    NoMatch { attempts: Vec<FitError> },

    #[error("nesting depth limit of {0} exceeded")]
    DepthExceeded(usize),
}

fn render_attempts(attempts: &[FitError]) -> String {
    attempts
        .iter()
        .map(FitError::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// ————————————————————————————————————————————————————————————————————————————
// SCHEMA ERRORS
// ————————————————————————————————————————————————————————————————————————————

/// The declared type itself is malformed. Construction-time and fatal: a
/// schema bug, not a data problem, so never produced during fitting.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("unknown type name `{0}`")]
    UnknownType(String),

    #[error("literal form declares no permitted values")]
    EmptyLiteral,

    #[error("union form declares no member types")]
    EmptyUnion,

    #[error("record `{0}` refers to itself; recursive types cannot be resolved")]
    RecursiveRecord(String),

    #[error("default for field `{field}` of record `{record}` does not fit: {source}")]
    BadDefault {
        record: String,
        field: String,
        #[source]
        source: FitError,
    },
}

/// Either failure mode, as seen by the top-level entry point.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Fit(#[from] FitError),
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

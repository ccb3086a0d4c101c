//! Error types shared by the instance readers, the distance layer and the
//! solver entry points.

use thiserror::Error as ThisError;

use crate::graph::Distance;

/// Errors raised before or around a solve.
///
/// Invariant violations inside the search engine are not represented here;
/// they are programming errors and panic.
#[derive(Debug, ThisError)]
pub enum PCenterError {
    /// The instance cannot be solved as given (empty graph, bad P, bad edges).
    #[error("invalid instance: {0}")]
    InvalidInstance(String),

    /// A solver configuration failed validation.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Real path lengths could reach the "infinite" sentinel.
    #[error("distance overflow: total edge length {total} must stay below {limit}")]
    DistanceOverflow {
        /// Sum of all finite edge lengths.
        total: u64,
        /// The sentinel value used for unreachable pairs.
        limit: Distance,
    },

    /// A text instance could not be parsed.
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// An engine invariant was violated while solving one instance.
    #[error("internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[cfg(feature = "serde")]
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, PCenterError>;

impl PCenterError {
    pub fn invalid_instance(message: impl Into<String>) -> Self {
        Self::InvalidInstance(message.into())
    }

    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

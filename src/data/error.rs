use std::fmt;

use thiserror::Error;

/// Why a dataset could not be loaded. Each variant is fatal to startup.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The artifact could not be obtained (transport failure, non-success
    /// status, unreadable local file, oversized body).
    #[error("could not retrieve {location}: {reason}")]
    Retrieval { location: String, reason: String },

    /// The bytes were obtained but are not a valid gzip stream.
    #[error("corrupt gzip envelope: {reason}")]
    Decompression { reason: String },

    /// The decompressed payload is not a readable Parquet table.
    #[error("{}", parse_message(.column, .reason))]
    Parse {
        column: Option<String>,
        reason: String,
    },
}

fn parse_message(column: &Option<String>, reason: &str) -> String {
    match column {
        Some(col) => format!("invalid table payload in column '{col}': {reason}"),
        None => format!("invalid table payload: {reason}"),
    }
}

/// The three failure kinds, for callers that only need to branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadErrorKind {
    Retrieval,
    Decompression,
    Parse,
}

impl LoadError {
    pub fn kind(&self) -> LoadErrorKind {
        match self {
            LoadError::Retrieval { .. } => LoadErrorKind::Retrieval,
            LoadError::Decompression { .. } => LoadErrorKind::Decompression,
            LoadError::Parse { .. } => LoadErrorKind::Parse,
        }
    }

    pub(crate) fn parse(reason: impl fmt::Display) -> Self {
        LoadError::Parse {
            column: None,
            reason: reason.to_string(),
        }
    }

    pub(crate) fn parse_in(column: &str, reason: impl fmt::Display) -> Self {
        LoadError::Parse {
            column: Some(column.to_string()),
            reason: reason.to_string(),
        }
    }
}

impl LoadErrorKind {
    /// Process exit code used by the binary for this kind.
    pub fn exit_code(self) -> u8 {
        match self {
            LoadErrorKind::Retrieval => 2,
            LoadErrorKind::Decompression => 3,
            LoadErrorKind::Parse => 4,
        }
    }
}

impl fmt::Display for LoadErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LoadErrorKind::Retrieval => "retrieval error",
            LoadErrorKind::Decompression => "decompression error",
            LoadErrorKind::Parse => "parse error",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_message_names_the_column() {
        let err = LoadError::parse_in("recinto", "unsupported type");
        assert_eq!(
            err.to_string(),
            "invalid table payload in column 'recinto': unsupported type"
        );
        assert_eq!(err.kind(), LoadErrorKind::Parse);
    }

    #[test]
    fn kinds_have_distinct_exit_codes() {
        let codes = [
            LoadErrorKind::Retrieval.exit_code(),
            LoadErrorKind::Decompression.exit_code(),
            LoadErrorKind::Parse.exit_code(),
        ];
        assert_eq!(codes, [2, 3, 4]);
    }
}

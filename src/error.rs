use std::path::PathBuf;

use thiserror::Error;

/// File-level failures of a pipeline run.
///
/// Per-record problems (a date or playtime that does not parse) never show up
/// here: they fall back to the raw date text and zero hours respectively.
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("no review blocks found in the document")]
    NoReviewsFound,

    #[error("cannot read input file {}: {source}", path.display())]
    MalformedInputFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write output file {}: {source}", path.display())]
    Serialization {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, ReviewError>;

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures of the API itself. Problems in the document text are not errors
/// here; they are recorded on the [`Trove`](crate::Trove) as diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    #[error("bad parameter: {0}")]
    BadParameter(&'static str),

    #[error("no node at address `{address}`")]
    NotFound { address: String },

    #[error("illegal address `{address}`: {reason}")]
    IllegalAddress { address: String, reason: &'static str },

    #[error("cannot read `{}`", path.display())]
    BadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("document has {count} error(s)")]
    TroveHasErrors { count: usize },
}

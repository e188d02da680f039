use std::path::PathBuf;

use thiserror::Error;

use crate::id::DocId;

pub type DbResult<T> = Result<T, DbError>;

/// Errors raised by the document store.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("document for collection '{collection}' is not a JSON object")]
    NotAnObject { collection: String },

    #[error("document '{id}' already exists in collection '{collection}'")]
    DuplicateId { collection: String, id: DocId },

    #[error("'{0}' is not a valid document id")]
    InvalidId(String),

    #[error("malformed document in collection '{collection}': {source}")]
    Decode {
        collection: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error("failed to read seed file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid seed data: {0}")]
    InvalidSeed(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

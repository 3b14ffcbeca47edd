use thiserror::Error;

use crate::storage::Collection;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The bundled keyword table could not be loaded.
    #[error("Missing reference data: {0}")]
    MissingReferenceData(String),

    /// The in-memory mutation was applied but could not be written back.
    #[error("Failed to persist {collection} collection: {source}")]
    PersistenceWrite {
        collection: Collection,
        #[source]
        source: Box<FilterError>,
    },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// A keyword with no ASCII letters or digits
    #[error("Invalid keyword: '{0}'")]
    InvalidKeyword(String),

    #[error("Invalid spam choice: {0}")]
    InvalidChoice(String),
}

pub type Result<T> = std::result::Result<T, FilterError>;

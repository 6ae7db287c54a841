use thiserror::Error;

#[derive(Error, Debug)]
pub enum KontorError {
    #[error("record not found in {collection}: {id}")]
    NotFound {
        collection: &'static str,
        id: String,
    },

    #[error("duplicate {field}: {value}")]
    DuplicateKey {
        field: &'static str,
        value: String,
    },

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store error: {0}")]
    Store(String),
}

impl KontorError {
    pub fn not_found(collection: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            collection,
            id: id.into(),
        }
    }

    pub fn duplicate(field: &'static str, value: impl Into<String>) -> Self {
        Self::DuplicateKey {
            field,
            value: value.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, KontorError>;

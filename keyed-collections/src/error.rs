use thiserror::Error;

use crate::key::Key;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CollectionError {
    #[error("No {key} key in the collection")]
    MissingKey { key: Key },
    #[error("Value must be instance of {expected}")]
    InvalidValueType { expected: String, found: String },
}

pub type Result<T> = std::result::Result<T, CollectionError>;

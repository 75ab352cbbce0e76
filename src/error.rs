use crate::posting::DocId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O failure in the backing key-value store.
    #[error("storage failure: {0}")]
    Storage(#[from] redb::Error),

    /// A stored value failed to decode. Fatal for the affected key only.
    #[error("corrupt entry for key {key:?}: {reason}")]
    Corruption { key: String, reason: String },

    /// A value failed to serialize before being written.
    #[error("failed to encode value for key {key:?}: {reason}")]
    Encode { key: String, reason: String },

    /// Posting::merge called with postings of two different documents.
    #[error("cannot merge postings of different documents ({left:?} vs {right:?})")]
    MergeMismatch { left: DocId, right: DocId },

    /// A doc id surfaced by the index has no entry in the document store.
    #[error("document {0:?} is missing from the document store")]
    UnknownDocument(DocId),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<redb::DatabaseError> for Error {
    fn from(err: redb::DatabaseError) -> Self {
        Error::Storage(err.into())
    }
}

impl From<redb::TransactionError> for Error {
    fn from(err: redb::TransactionError) -> Self {
        Error::Storage(err.into())
    }
}

impl From<redb::TableError> for Error {
    fn from(err: redb::TableError) -> Self {
        Error::Storage(err.into())
    }
}

impl From<redb::StorageError> for Error {
    fn from(err: redb::StorageError) -> Self {
        Error::Storage(err.into())
    }
}

impl From<redb::CommitError> for Error {
    fn from(err: redb::CommitError) -> Self {
        Error::Storage(err.into())
    }
}

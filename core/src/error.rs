use crate::DocId;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    /// Id outside the range assigned by the document store.
    #[error("document not found: {0}")]
    DocumentNotFound(DocId),
}

pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors raised by search managers and the search box core
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Accessor '{0}' is already registered")]
    DuplicateAccessor(String),

    #[error("Search request failed: {0}")]
    Request(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

use crate::models::Namespace;

#[derive(Debug, thiserror::Error)]
pub enum CollectionError {
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Card catalog unavailable: {0}")]
    CatalogUnavailable(String),

    #[error("Membership lookup failed: {0}")]
    MembershipFetchFailed(String),

    #[error("Membership insert failed for card {card_id}: {reason}")]
    MembershipInsertFailed { card_id: String, reason: String },

    #[error("The {0} collection is append-only")]
    ReadOnlyNamespace(Namespace),
}

pub type Result<T> = std::result::Result<T, CollectionError>;

// libs/shared/database/src/store.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Failures at the document store boundary. The caller decides how each
/// maps onto its own error surface.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Document not found")]
    NotFound,

    #[error("Document already exists")]
    AlreadyExists,

    #[error("Stored document changed since it was read")]
    Conflict,

    #[error("Store rejected the request: {0}")]
    Rejected(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed store response: {0}")]
    Malformed(String),
}

/// Query primitives accepted by `list_documents`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListQuery {
    OrderAsc(String),
    OrderDesc(String),
    Limit(u32),
}

impl ListQuery {
    pub fn order_asc(attribute: &str) -> Self {
        ListQuery::OrderAsc(attribute.to_string())
    }

    pub fn order_desc(attribute: &str) -> Self {
        ListQuery::OrderDesc(attribute.to_string())
    }

    /// Wire encoding used by the document store REST API.
    pub fn to_query_string(&self) -> String {
        match self {
            ListQuery::OrderAsc(attribute) => format!("orderAsc(\"{}\")", attribute),
            ListQuery::OrderDesc(attribute) => format!("orderDesc(\"{}\")", attribute),
            ListQuery::Limit(limit) => format!("limit({})", limit),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResult<T> {
    pub total: u64,
    pub documents: Vec<T>,
}

/// The persistence boundary for document collections. The store is the
/// single point of truth for persisted state; callers never cache
/// documents across calls.
///
/// `update_document` merges the supplied fields into the stored document
/// rather than replacing it. When `expected_updated_at` is supplied the
/// write fails with `StoreError::Conflict` if the stored document has
/// been modified since that instant.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn create_document(
        &self,
        collection_id: &str,
        document_id: &str,
        data: Value,
    ) -> Result<Value, StoreError>;

    async fn get_document(&self, collection_id: &str, document_id: &str)
        -> Result<Value, StoreError>;

    async fn list_documents(
        &self,
        collection_id: &str,
        queries: &[ListQuery],
    ) -> Result<ListResult<Value>, StoreError>;

    async fn update_document(
        &self,
        collection_id: &str,
        document_id: &str,
        data: Value,
        expected_updated_at: Option<DateTime<Utc>>,
    ) -> Result<Value, StoreError>;
}

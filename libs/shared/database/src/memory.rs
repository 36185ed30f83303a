// libs/shared/database/src/memory.rs
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::debug;

use crate::store::{DocumentStore, ListQuery, ListResult, StoreError};

/// In-process document store with the same merge and versioning semantics
/// as the hosted one. Backs tests and local development runs.
#[derive(Default)]
pub struct MemoryDocumentStore {
    // Insertion order per collection is kept so that ordering queries are
    // stable across ties on the sort attribute.
    collections: Mutex<HashMap<String, Vec<Value>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn now_string() -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    fn as_object(data: Value) -> Result<Map<String, Value>, StoreError> {
        match data {
            Value::Object(map) => Ok(map),
            other => Err(StoreError::Rejected(format!(
                "document data must be an object, got {}",
                other
            ))),
        }
    }

    // Metadata keys ($id, $createdAt, $updatedAt) are store-owned and
    // never merged from caller data.
    fn merge_into(document: &mut Value, data: Map<String, Value>) {
        if let Value::Object(target) = document {
            for (key, value) in data {
                if key.starts_with('$') {
                    continue;
                }
                target.insert(key, value);
            }
        }
    }

    fn attribute<'a>(document: &'a Value, name: &str) -> Option<&'a str> {
        document.get(name).and_then(Value::as_str)
    }

    fn updated_at(document: &Value) -> Result<DateTime<Utc>, StoreError> {
        let raw = Self::attribute(document, "$updatedAt")
            .ok_or_else(|| StoreError::Malformed("document missing $updatedAt".to_string()))?;

        DateTime::parse_from_rfc3339(raw)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| StoreError::Malformed(format!("bad $updatedAt: {}", e)))
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn create_document(
        &self,
        collection_id: &str,
        document_id: &str,
        data: Value,
    ) -> Result<Value, StoreError> {
        let data = Self::as_object(data)?;
        let mut collections = self.collections.lock().await;
        let documents = collections.entry(collection_id.to_string()).or_default();

        if documents
            .iter()
            .any(|d| Self::attribute(d, "$id") == Some(document_id))
        {
            return Err(StoreError::AlreadyExists);
        }

        let now = Self::now_string();
        let mut document = serde_json::json!({
            "$id": document_id,
            "$createdAt": now,
            "$updatedAt": now,
        });
        Self::merge_into(&mut document, data);

        debug!("Created document {} in {}", document_id, collection_id);
        documents.push(document.clone());
        Ok(document)
    }

    async fn get_document(
        &self,
        collection_id: &str,
        document_id: &str,
    ) -> Result<Value, StoreError> {
        let collections = self.collections.lock().await;
        collections
            .get(collection_id)
            .and_then(|documents| {
                documents
                    .iter()
                    .find(|d| Self::attribute(d, "$id") == Some(document_id))
            })
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_documents(
        &self,
        collection_id: &str,
        queries: &[ListQuery],
    ) -> Result<ListResult<Value>, StoreError> {
        let collections = self.collections.lock().await;
        let mut documents: Vec<Value> = collections
            .get(collection_id)
            .cloned()
            .unwrap_or_default();
        let total = documents.len() as u64;

        for query in queries {
            match query {
                ListQuery::OrderAsc(attribute) => {
                    documents.sort_by(|a, b| {
                        Self::attribute(a, attribute).cmp(&Self::attribute(b, attribute))
                    });
                }
                ListQuery::OrderDesc(attribute) => {
                    documents.sort_by(|a, b| {
                        Self::attribute(b, attribute).cmp(&Self::attribute(a, attribute))
                    });
                }
                ListQuery::Limit(limit) => documents.truncate(*limit as usize),
            }
        }

        Ok(ListResult { total, documents })
    }

    async fn update_document(
        &self,
        collection_id: &str,
        document_id: &str,
        data: Value,
        expected_updated_at: Option<DateTime<Utc>>,
    ) -> Result<Value, StoreError> {
        let data = Self::as_object(data)?;
        let mut collections = self.collections.lock().await;
        let document = collections
            .get_mut(collection_id)
            .and_then(|documents| {
                documents
                    .iter_mut()
                    .find(|d| Self::attribute(d, "$id") == Some(document_id))
            })
            .ok_or(StoreError::NotFound)?;

        if let Some(expected) = expected_updated_at {
            if Self::updated_at(document)? > expected {
                return Err(StoreError::Conflict);
            }
        }

        Self::merge_into(document, data);
        if let Value::Object(target) = document {
            target.insert("$updatedAt".to_string(), Value::String(Self::now_string()));
        }

        debug!("Updated document {} in {}", document_id, collection_id);
        Ok(document.clone())
    }
}

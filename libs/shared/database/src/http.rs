// libs/shared/database/src/http.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE},
    Client, Method, Response, StatusCode,
};
use serde_json::{json, Value};
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::store::{DocumentStore, ListQuery, ListResult, StoreError};

/// Document store client speaking the hosted store's REST API. Endpoint,
/// project and key come from process-wide configuration; the database id
/// is fixed for the client's lifetime.
pub struct HttpDocumentStore {
    client: Client,
    endpoint: String,
    project_id: String,
    api_key: String,
    database_id: String,
}

impl HttpDocumentStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            endpoint: config.store_endpoint.clone(),
            project_id: config.store_project_id.clone(),
            api_key: config.store_api_key.clone(),
            database_id: config.database_id.clone(),
        }
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "X-Store-Project",
            HeaderValue::from_str(&self.project_id).unwrap_or(HeaderValue::from_static("")),
        );
        headers.insert(
            "X-Store-Key",
            HeaderValue::from_str(&self.api_key).unwrap_or(HeaderValue::from_static("")),
        );

        headers
    }

    fn collection_url(&self, collection_id: &str) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.endpoint, self.database_id, collection_id
        )
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<Value>,
    ) -> Result<Value, StoreError> {
        debug!("Store request: {} {}", method, url);

        let mut req = self.client.request(method, url).headers(self.headers());
        if let Some(body) = body {
            req = req.json(&body);
        }

        let response = req
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        Self::into_json(response).await
    }

    async fn into_json(response: Response) -> Result<Value, StoreError> {
        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Store error ({}): {}", status, error_text);

            return Err(match status {
                StatusCode::NOT_FOUND => StoreError::NotFound,
                StatusCode::CONFLICT => StoreError::AlreadyExists,
                _ => StoreError::Rejected(format!("{}: {}", status, error_text)),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| StoreError::Malformed(e.to_string()))
    }

    fn document_updated_at(document: &Value) -> Result<DateTime<Utc>, StoreError> {
        let raw = document
            .get("$updatedAt")
            .and_then(Value::as_str)
            .ok_or_else(|| StoreError::Malformed("document missing $updatedAt".to_string()))?;

        DateTime::parse_from_rfc3339(raw)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| StoreError::Malformed(format!("bad $updatedAt: {}", e)))
    }
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    async fn create_document(
        &self,
        collection_id: &str,
        document_id: &str,
        data: Value,
    ) -> Result<Value, StoreError> {
        let url = self.collection_url(collection_id);
        let body = json!({
            "documentId": document_id,
            "data": data,
        });

        self.send(Method::POST, &url, Some(body)).await
    }

    async fn get_document(
        &self,
        collection_id: &str,
        document_id: &str,
    ) -> Result<Value, StoreError> {
        let url = format!("{}/{}", self.collection_url(collection_id), document_id);
        self.send(Method::GET, &url, None).await
    }

    async fn list_documents(
        &self,
        collection_id: &str,
        queries: &[ListQuery],
    ) -> Result<ListResult<Value>, StoreError> {
        let mut url = self.collection_url(collection_id);
        if !queries.is_empty() {
            let params: Vec<String> = queries
                .iter()
                .map(|q| format!("queries[]={}", q.to_query_string()))
                .collect();
            url = format!("{}?{}", url, params.join("&"));
        }

        let body = self.send(Method::GET, &url, None).await?;
        serde_json::from_value(body).map_err(|e| StoreError::Malformed(e.to_string()))
    }

    async fn update_document(
        &self,
        collection_id: &str,
        document_id: &str,
        data: Value,
        expected_updated_at: Option<DateTime<Utc>>,
    ) -> Result<Value, StoreError> {
        let url = format!("{}/{}", self.collection_url(collection_id), document_id);

        // The REST API has no compare-and-swap, so the version check is a
        // read before the write. The window between the two is accepted;
        // the store remains the arbiter of write ordering.
        if let Some(expected) = expected_updated_at {
            let current = self.send(Method::GET, &url, None).await?;
            let stored = Self::document_updated_at(&current)?;
            if stored > expected {
                return Err(StoreError::Conflict);
            }
        }

        let body = json!({ "data": data });
        self.send(Method::PATCH, &url, Some(body)).await
    }
}

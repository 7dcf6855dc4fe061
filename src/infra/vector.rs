//! HTTP client for the external vector-store microservice (ChromaDB REST).
//!
//! Embeddings are computed by the service; we only ship documents and
//! query text.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::errors::{AppError, AppResult};

/// One document to index, with its caller-assigned id and metadata.
#[derive(Debug, Clone, Serialize)]
pub struct VectorDocument {
    pub id: String,
    pub text: String,
    pub metadata: serde_json::Value,
}

/// A search hit returned by the vector service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorHit {
    pub id: String,
    pub document: String,
    pub metadata: serde_json::Value,
    pub distance: f64,
}

/// Collection summary as reported by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub name: String,
    #[serde(default)]
    pub count: u64,
}

#[derive(Clone)]
pub struct VectorStoreClient {
    http: reqwest::Client,
    base_url: String,
}

impl VectorStoreClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    fn unavailable(e: reqwest::Error) -> AppError {
        tracing::warn!(error = %e, "vector service request failed");
        AppError::upstream("vector service")
    }

    async fn check(response: reqwest::Response) -> AppResult<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let detail = response.text().await.unwrap_or_default();
        tracing::warn!(%status, detail, "vector service rejected request");
        Err(AppError::upstream("vector service"))
    }

    /// Liveness probe, used by the health endpoint.
    pub async fn ping(&self) -> bool {
        match self.http.get(self.url("/heartbeat")).send().await {
            Ok(r) => r.status().is_success(),
            Err(_) => false,
        }
    }

    pub async fn list_collections(&self) -> AppResult<Vec<CollectionInfo>> {
        let response = self
            .http
            .get(self.url("/collections"))
            .send()
            .await
            .map_err(Self::unavailable)?;
        let response = Self::check(response).await?;
        response.json().await.map_err(Self::unavailable)
    }

    pub async fn create_collection(&self, name: &str) -> AppResult<()> {
        let response = self
            .http
            .post(self.url("/collections"))
            .json(&json!({ "name": name, "get_or_create": true }))
            .send()
            .await
            .map_err(Self::unavailable)?;
        Self::check(response).await?;
        Ok(())
    }

    pub async fn delete_collection(&self, name: &str) -> AppResult<()> {
        let response = self
            .http
            .delete(self.url(&format!("/collections/{}", name)))
            .send()
            .await
            .map_err(Self::unavailable)?;
        Self::check(response).await?;
        Ok(())
    }

    /// Upserts documents into a collection, creating it if missing.
    pub async fn add_documents(&self, collection: &str, docs: &[VectorDocument]) -> AppResult<()> {
        if docs.is_empty() {
            return Ok(());
        }
        self.create_collection(collection).await?;

        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        let documents: Vec<&str> = docs.iter().map(|d| d.text.as_str()).collect();
        let metadatas: Vec<&serde_json::Value> = docs.iter().map(|d| &d.metadata).collect();

        let response = self
            .http
            .post(self.url(&format!("/collections/{}/upsert", collection)))
            .json(&json!({
                "ids": ids,
                "documents": documents,
                "metadatas": metadatas,
            }))
            .send()
            .await
            .map_err(Self::unavailable)?;
        Self::check(response).await?;
        Ok(())
    }

    pub async fn delete_documents(&self, collection: &str, ids: &[String]) -> AppResult<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let response = self
            .http
            .post(self.url(&format!("/collections/{}/delete", collection)))
            .json(&json!({ "ids": ids }))
            .send()
            .await
            .map_err(Self::unavailable)?;
        Self::check(response).await?;
        Ok(())
    }

    /// Similarity search returning the `top_k` closest documents.
    pub async fn query(
        &self,
        collection: &str,
        text: &str,
        top_k: usize,
    ) -> AppResult<Vec<VectorHit>> {
        let response = self
            .http
            .post(self.url(&format!("/collections/{}/query", collection)))
            .json(&json!({
                "query_texts": [text],
                "n_results": top_k,
                "include": ["documents", "metadatas", "distances"],
            }))
            .send()
            .await
            .map_err(Self::unavailable)?;
        let response = Self::check(response).await?;
        let payload: serde_json::Value = response.json().await.map_err(Self::unavailable)?;

        // Chroma shapes results as parallel arrays nested per query text.
        fn first<'a>(payload: &'a serde_json::Value, key: &str) -> &'a [serde_json::Value] {
            payload[key][0].as_array().map(Vec::as_slice).unwrap_or(&[])
        }

        let ids = first(&payload, "ids");
        let documents = first(&payload, "documents");
        let metadatas = first(&payload, "metadatas");
        let distances = first(&payload, "distances");

        let mut hits = Vec::with_capacity(ids.len());
        for (i, id) in ids.iter().enumerate() {
            hits.push(VectorHit {
                id: id.as_str().unwrap_or_default().to_string(),
                document: documents
                    .get(i)
                    .and_then(|d| d.as_str())
                    .unwrap_or_default()
                    .to_string(),
                metadata: metadatas.get(i).cloned().unwrap_or(serde_json::Value::Null),
                distance: distances.get(i).and_then(|d| d.as_f64()).unwrap_or(0.0),
            });
        }
        Ok(hits)
    }
}

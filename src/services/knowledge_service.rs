//! Knowledge base service - Document ingestion and retrieval Q&A.
//!
//! Chunking happens here; embeddings belong to the external vector
//! service. Answers degrade to hits-only when the LLM is unreachable.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use super::chunker::chunk_text;
use super::config_service::ConfigService;
use crate::config::{CHUNK_MAX_CHARS, CHUNK_OVERLAP_CHARS, DEFAULT_TOP_K, KB_COLLECTION};
use crate::errors::AppResult;
use crate::infra::{ChatMessage, CollectionInfo, LlmClient, VectorDocument, VectorHit,
    VectorStoreClient};

/// Outcome of a document upload
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadReport {
    pub filename: String,
    pub chunks: usize,
}

/// Answer to a knowledge base question
#[derive(Debug, Serialize, ToSchema)]
pub struct KbAnswer {
    /// Synthesized answer; absent when the LLM call failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[schema(value_type = Vec<Object>)]
    pub hits: Vec<VectorHit>,
}

/// Knowledge base service trait for dependency injection.
#[async_trait]
pub trait KnowledgeService: Send + Sync {
    async fn list_collections(&self) -> AppResult<Vec<CollectionInfo>>;

    async fn create_collection(&self, name: &str) -> AppResult<()>;

    async fn delete_collection(&self, name: &str) -> AppResult<()>;

    /// Chunk a text document and index the chunks.
    async fn upload_document(&self, filename: String, text: String) -> AppResult<UploadReport>;

    /// Retrieve the closest chunks, then synthesize an answer from them.
    async fn ask(&self, question: String, top_k: Option<usize>) -> AppResult<KbAnswer>;
}

/// Concrete implementation of KnowledgeService.
pub struct KnowledgeBase {
    vector: VectorStoreClient,
    llm: LlmClient,
    configs: Arc<dyn ConfigService>,
}

impl KnowledgeBase {
    pub fn new(
        vector: VectorStoreClient,
        llm: LlmClient,
        configs: Arc<dyn ConfigService>,
    ) -> Self {
        Self {
            vector,
            llm,
            configs,
        }
    }
}

#[async_trait]
impl KnowledgeService for KnowledgeBase {
    async fn list_collections(&self) -> AppResult<Vec<CollectionInfo>> {
        self.vector.list_collections().await
    }

    async fn create_collection(&self, name: &str) -> AppResult<()> {
        self.vector.create_collection(name).await
    }

    async fn delete_collection(&self, name: &str) -> AppResult<()> {
        self.vector.delete_collection(name).await
    }

    async fn upload_document(&self, filename: String, text: String) -> AppResult<UploadReport> {
        let chunks = chunk_text(&text, CHUNK_MAX_CHARS, CHUNK_OVERLAP_CHARS);

        let docs: Vec<VectorDocument> = chunks
            .iter()
            .enumerate()
            .map(|(index, chunk)| VectorDocument {
                id: format!("{}-{}", Uuid::new_v4(), index),
                text: chunk.clone(),
                metadata: json!({ "filename": filename, "index": index }),
            })
            .collect();

        self.vector.add_documents(KB_COLLECTION, &docs).await?;

        tracing::info!(filename, chunks = docs.len(), "indexed knowledge base document");
        Ok(UploadReport {
            filename,
            chunks: docs.len(),
        })
    }

    async fn ask(&self, question: String, top_k: Option<usize>) -> AppResult<KbAnswer> {
        let top_k = top_k.unwrap_or(DEFAULT_TOP_K);
        let hits = self.vector.query(KB_COLLECTION, &question, top_k).await?;

        if hits.is_empty() {
            return Ok(KbAnswer { answer: None, hits });
        }

        // Hits are still useful when the LLM is down
        let answer = match self.configs.llm_settings().await {
            Ok(settings) => {
                let mut context = String::from("Context passages:\n");
                for hit in &hits {
                    context.push_str(&hit.document);
                    context.push_str("\n---\n");
                }
                context.push_str(&format!("\nQuestion: {}", question));

                let messages = [
                    ChatMessage::system(
                        "Answer the question using only the provided context passages.",
                    ),
                    ChatMessage::user(context),
                ];
                match self.llm.complete(&settings, &messages).await {
                    Ok(answer) => Some(answer),
                    Err(e) => {
                        tracing::warn!(error = %e, "answer synthesis failed, returning hits only");
                        None
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "LLM not configured, returning hits only");
                None
            }
        };

        Ok(KbAnswer { answer, hits })
    }
}

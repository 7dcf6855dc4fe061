//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections and repositories
//! - LLM completion and vector-store HTTP clients
//! - MCP server connections
//! - Uploaded file storage

pub mod db;
pub mod llm;
pub mod mcp;
pub mod persistence;
pub mod repositories;
pub mod storage;
pub mod vector;

pub use db::{Database, Migrator};
pub use llm::{ChatMessage, LlmClient, LlmSettings};
pub use mcp::McpClientManager;
pub use persistence::Persistence;
pub use storage::DocumentStorage;
pub use vector::{CollectionInfo, VectorDocument, VectorHit, VectorStoreClient};

//! Audit service - Append-only activity recording and listing.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{AuditLog, NewAuditLog};
use crate::errors::AppResult;
use crate::infra::repositories::{AuditFilter, AuditRepository};
use crate::types::PaginationParams;

/// Audit service trait for dependency injection.
#[async_trait]
pub trait AuditService: Send + Sync {
    /// Record an entry. Failures are logged, never propagated, so audit
    /// writes cannot take down the operation they describe.
    async fn record(&self, entry: NewAuditLog);

    async fn list(
        &self,
        filter: &AuditFilter,
        params: &PaginationParams,
    ) -> AppResult<(Vec<AuditLog>, u64)>;
}

/// Concrete implementation of AuditService.
pub struct AuditTrail {
    audit: Arc<dyn AuditRepository>,
}

impl AuditTrail {
    pub fn new(audit: Arc<dyn AuditRepository>) -> Self {
        Self { audit }
    }
}

#[async_trait]
impl AuditService for AuditTrail {
    async fn record(&self, entry: NewAuditLog) {
        if let Err(e) = self.audit.insert(entry).await {
            tracing::error!(error = %e, "failed to write audit log");
        }
    }

    async fn list(
        &self,
        filter: &AuditFilter,
        params: &PaginationParams,
    ) -> AppResult<(Vec<AuditLog>, u64)> {
        self.audit.list(filter, params).await
    }
}

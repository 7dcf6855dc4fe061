//! JWT authentication and permission checks.

use std::collections::HashSet;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::config::{BEARER_TOKEN_PREFIX, PERM_ADMIN_ALL};
use crate::errors::AppError;
use crate::services::Actor;

/// Authenticated user extracted from JWT token
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub username: String,
    pub permissions: HashSet<String>,
    pub ip: String,
}

impl CurrentUser {
    /// Check a permission; the admin wildcard satisfies every check.
    pub fn can(&self, permission: &str) -> bool {
        self.permissions.contains(PERM_ADMIN_ALL) || self.permissions.contains(permission)
    }

    /// The actor identity services attribute audited operations to.
    pub fn actor(&self) -> Actor {
        Actor {
            id: self.id,
            username: self.username.clone(),
            ip: self.ip.clone(),
        }
    }
}

/// Best-effort client address from proxy headers.
pub fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// JWT authentication middleware.
///
/// Extracts and validates the JWT token from the Authorization header,
/// then injects the CurrentUser into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .ok_or(AppError::Unauthorized)?;

    let claims = state.services.auth().verify_token(token)?;
    let ip = client_ip(request.headers());

    let current_user = CurrentUser {
        id: claims.sub,
        username: claims.username,
        permissions: claims.permissions.into_iter().collect(),
        ip,
    };

    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}

/// Require a permission, returns Forbidden error if not granted.
pub fn require_permission(user: &CurrentUser, permission: &str) -> Result<(), AppError> {
    if user.can(permission) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with(perms: &[&str]) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            username: "jdoe".into(),
            permissions: perms.iter().map(|p| p.to_string()).collect(),
            ip: "127.0.0.1".into(),
        }
    }

    #[test]
    fn admin_wildcard_satisfies_any_check() {
        let user = user_with(&[PERM_ADMIN_ALL]);
        assert!(user.can("query:run"));
        assert!(user.can("mcp:manage"));
    }

    #[test]
    fn missing_permission_is_forbidden() {
        let user = user_with(&["query:run"]);
        assert!(require_permission(&user, "query:run").is_ok());
        assert!(matches!(
            require_permission(&user, "audit:view"),
            Err(AppError::Forbidden)
        ));
    }
}

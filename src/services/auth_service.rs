//! Authentication service - Handles user authentication and authorization.
//!
//! SOLID (SRP): Handles authentication concerns only.
//! SOLID (ISP): Trait contains only auth methods, password handling in domain.
//! DDD: Uses domain Password value object for hashing.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{NewAuditLog, Password, User, UserResponse};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::{AuditRepository, UserRepository};

/// JWT claims payload. The granted permission set rides in the token so
/// request authorization needs no database round trip.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub permissions: Vec<String>,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
    /// The authenticated user
    pub user: UserResponse,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Login and return JWT token
    async fn login(&self, username: String, password: String, ip: String)
        -> AppResult<TokenResponse>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Generate JWT token for a user (shared helper to avoid duplication)
fn generate_token(user: &User, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id,
        username: user.username.clone(),
        permissions: user.permissions(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
        user: user.clone().into(),
    })
}

/// Verify JWT token and extract claims (shared helper)
fn verify_token_internal(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Concrete implementation of AuthService.
pub struct Authenticator {
    users: Arc<dyn UserRepository>,
    audit: Arc<dyn AuditRepository>,
    config: Config,
}

impl Authenticator {
    pub fn new(
        users: Arc<dyn UserRepository>,
        audit: Arc<dyn AuditRepository>,
        config: Config,
    ) -> Self {
        Self {
            users,
            audit,
            config,
        }
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn login(
        &self,
        username: String,
        password: String,
        ip: String,
    ) -> AppResult<TokenResponse> {
        let user_result = self.users.find_by_username(&username).await?;

        // SECURITY: Perform password verification even if user doesn't exist
        // to prevent timing attacks that could enumerate valid usernames.
        let dummy_hash =
            "$argon2id$v=19$m=19456,t=2,p=1$dummysalt123456$dummyhash1234567890123456789012";

        let (password_hash, account_ok) = match &user_result {
            Some(user) => (user.password_hash.as_str(), user.active),
            None => (dummy_hash, false),
        };

        let stored_password = Password::from_hash(password_hash.to_string());
        let password_valid = stored_password.verify(&password);

        if !account_ok || !password_valid {
            self.audit
                .insert(
                    NewAuditLog::new("auth.login_failed")
                        .ip(ip)
                        .detail(format!("username: {}", username)),
                )
                .await?;
            return Err(AppError::InvalidCredentials);
        }

        // account_ok implies user_result is Some
        let user = user_result.ok_or(AppError::InvalidCredentials)?;
        let token = generate_token(&user, &self.config)?;

        self.audit
            .insert(NewAuditLog::new("auth.login").user(user.id, user.username).ip(ip))
            .await?;

        Ok(token)
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        verify_token_internal(token, &self.config)
    }
}

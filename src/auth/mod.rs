/*!
 * # Authentication and Authorization Module
 *
 * Sign-in is a lookup in the configured account table. A successful login
 * yields an HS256 JWT carrying the account's role and permissions; the
 * middleware here validates that token and gates routes by permission.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::config::AppConfig;
use crate::errors::ServiceError;

mod directory;
mod permissions;
mod rbac;

pub use directory::AccountDirectory;
pub use permissions::*;
pub use rbac::*;

/// Claim structure for JWT tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,              // Account email
    pub role: Role,               // Account role
    pub permissions: Vec<String>, // Permissions granted by the role
    pub jti: String,              // JWT ID
    pub iat: i64,                 // Issued at time
    pub exp: i64,                 // Expiration time
    pub nbf: i64,                 // Not valid before time
    pub iss: String,              // Issuer
    pub aud: String,              // Audience
}

/// Authenticated account extracted from the JWT token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthUser {
    pub email: String,
    pub role: Role,
    pub permissions: Vec<String>,
    pub token_id: String,
}

impl AuthUser {
    /// Check if the account has a specific permission
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            email: claims.sub,
            role: claims.role,
            permissions: claims.permissions,
            token_id: claims.jti,
        }
    }
}

/// Authentication configuration
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_audience: String,
    pub jwt_issuer: String,
    pub access_token_expiration: Duration,
}

impl From<&AppConfig> for AuthConfig {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            jwt_secret: cfg.jwt_secret.clone(),
            jwt_audience: cfg.auth_audience.clone(),
            jwt_issuer: cfg.auth_issuer.clone(),
            access_token_expiration: Duration::from_secs(cfg.jwt_expiration as u64),
        }
    }
}

/// Sign-in request body
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginCredentials {
    #[validate(length(min = 1, message = "Email is required"))]
    #[schema(example = "manager@restaurant.com")]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Issued access token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub role: Role,
}

/// Authentication service that handles sign-in, token issuance and validation
#[derive(Debug, Clone)]
pub struct AuthService {
    config: AuthConfig,
    directory: AccountDirectory,
}

impl AuthService {
    pub fn new(config: AuthConfig, directory: AccountDirectory) -> Self {
        Self { config, directory }
    }

    pub fn from_app_config(cfg: &AppConfig) -> Self {
        Self::new(
            AuthConfig::from(cfg),
            AccountDirectory::from_config(&cfg.accounts),
        )
    }

    pub fn directory(&self) -> &AccountDirectory {
        &self.directory
    }

    /// Checks the credentials against the account table and issues a token
    pub fn login(&self, credentials: &LoginCredentials) -> Result<TokenResponse, AuthError> {
        let email = credentials.email.trim().to_lowercase();
        let role = self
            .directory
            .authenticate(&email, &credentials.password)
            .ok_or_else(|| {
                warn!(email = %email, "Rejected sign-in attempt");
                AuthError::InvalidCredentials
            })?;

        let access_token = self.generate_token(&email, role)?;
        info!(email = %email, role = %role, "Signed in");

        Ok(TokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.config.access_token_expiration.as_secs() as i64,
            role,
        })
    }

    /// Generate a JWT for an account
    pub fn generate_token(&self, email: &str, role: Role) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now
            + ChronoDuration::from_std(self.config.access_token_expiration)
                .map_err(|_| AuthError::InternalError("Invalid token duration".to_string()))?;

        let claims = Claims {
            sub: email.to_string(),
            role,
            permissions: role.permissions(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            nbf: now.timestamp(),
            iss: self.config.jwt_issuer.clone(),
            aud: self.config.jwt_audience.clone(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenCreation(e.to_string()))
    }

    /// Validate a JWT token and extract the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[self.config.jwt_audience.as_str()]);
        validation.set_issuer(&[self.config.jwt_issuer.as_str()]);

        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })?
        .claims;

        // The account table may have changed since the token was issued.
        if self.directory.role_of(&claims.sub) != Some(claims.role) {
            debug!(email = %claims.sub, "Token role no longer matches account table");
            return Err(AuthError::InvalidToken);
        }

        Ok(claims)
    }
}

/// Authentication error types
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing authentication")]
    MissingAuth,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Token creation failed: {0}")]
    TokenCreation(String),

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<AuthError> for ServiceError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingAuth => {
                ServiceError::Unauthorized("Authentication required".to_string())
            }
            AuthError::InvalidCredentials => {
                ServiceError::Unauthorized("Invalid email or password".to_string())
            }
            AuthError::InvalidToken | AuthError::TokenExpired => {
                ServiceError::JwtError(err.to_string())
            }
            AuthError::InsufficientPermissions => {
                ServiceError::Forbidden("Insufficient permissions".to_string())
            }
            AuthError::TokenCreation(msg) | AuthError::InternalError(msg) => {
                ServiceError::InternalError(msg)
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ServiceError::from(self).into_response()
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AuthError::MissingAuth)
    }
}

/// Permission middleware to check if the caller has the required permission
pub async fn permission_middleware(
    State(required_permission): State<String>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or(AuthError::MissingAuth)?;

    if !user.has_permission(&required_permission) {
        warn!(
            email = %user.email,
            role = %user.role,
            permission = %required_permission,
            "Permission denied"
        );
        return Err(AuthError::InsufficientPermissions);
    }

    Ok(next.run(request).await)
}

/// Authentication middleware that validates the bearer token
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let auth_service = match request.extensions().get::<Arc<AuthService>>() {
        Some(service) => service.clone(),
        None => {
            return AuthError::InternalError("Authentication service not available".to_string())
                .into_response();
        }
    };

    match extract_auth_from_headers(request.headers(), &auth_service) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

fn extract_auth_from_headers(
    headers: &HeaderMap,
    auth_service: &AuthService,
) -> Result<AuthUser, AuthError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingAuth)?;

    auth_service.validate_token(token).map(AuthUser::from)
}

/// Extension methods for Router to add auth middleware
pub trait AuthRouterExt {
    fn with_auth(self) -> Self;
    fn with_permission(self, permission: &str) -> Self;
}

impl<S> AuthRouterExt for axum::Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_auth(self) -> Self {
        self.layer(axum::middleware::from_fn(auth_middleware))
    }

    fn with_permission(self, permission: &str) -> Self {
        self.layer(axum::middleware::from_fn_with_state(
            permission.to_string(),
            permission_middleware,
        ))
        .with_auth()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_accounts;
    use assert_matches::assert_matches;

    fn service_with_secret(secret: &str) -> AuthService {
        AuthService::new(
            AuthConfig {
                jwt_secret: secret.to_string(),
                jwt_audience: "restaurant-erp-clients".to_string(),
                jwt_issuer: "restaurant-erp".to_string(),
                access_token_expiration: Duration::from_secs(600),
            },
            AccountDirectory::from_config(&default_accounts()),
        )
    }

    fn service() -> AuthService {
        service_with_secret("unit-test-secret-unit-test-secret-unit-test-secret-unit-test-secret")
    }

    fn credentials(email: &str, password: &str) -> LoginCredentials {
        LoginCredentials {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn login_issues_token_with_role_permissions() {
        let auth = service();
        let token = auth
            .login(&credentials("waiter@restaurant.com", "waiter"))
            .unwrap();
        assert_eq!(token.role, Role::Employee);
        assert_eq!(token.token_type, "Bearer");

        let claims = auth.validate_token(&token.access_token).unwrap();
        assert_eq!(claims.sub, "waiter@restaurant.com");
        assert!(claims.permissions.contains(&consts::ORDERS_CREATE.to_string()));
    }

    #[test]
    fn wrong_password_is_rejected() {
        assert_matches!(
            service().login(&credentials("manager@restaurant.com", "nope")),
            Err(AuthError::InvalidCredentials)
        );
    }

    #[test]
    fn tokens_signed_with_another_secret_are_rejected() {
        let other = service_with_secret("a-completely-different-secret-that-is-long-enough-for-hs256-keys!!");
        let token = other.generate_token("manager@restaurant.com", Role::Manager).unwrap();
        assert_matches!(service().validate_token(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn token_with_role_not_in_table_is_rejected() {
        let auth = service();
        let forged = auth
            .generate_token("customer@example.com", Role::Manager)
            .unwrap();
        assert_matches!(auth.validate_token(&forged), Err(AuthError::InvalidToken));
    }

    #[test]
    fn auth_errors_map_to_http_statuses() {
        use axum::http::StatusCode;
        assert_eq!(
            ServiceError::from(AuthError::MissingAuth).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ServiceError::from(AuthError::InsufficientPermissions).status_code(),
            StatusCode::FORBIDDEN
        );
    }
}

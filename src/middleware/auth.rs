//! Authentication middleware
//!
//! Extractors that verify the bearer session token and resolve the acting
//! user. The admin extractor re-reads the admin flag from the store on
//! every request instead of trusting a claim baked into the token, so a
//! revoked admin loses access immediately.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::AuthService;

/// Authenticated user extracted from the session token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub display_name: String,
    pub jti: String,
}

/// Error response for authentication failures
#[derive(Debug, Serialize)]
struct AuthRejection {
    error: AuthRejectionDetails,
}

#[derive(Debug, Serialize)]
struct AuthRejectionDetails {
    code: String,
    message: String,
}

impl AuthRejection {
    fn new(status: StatusCode, code: &str, message: &str) -> Response {
        let body = Self {
            error: AuthRejectionDetails {
                code: code.to_string(),
                message: message.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    AuthRejection::new(
                        StatusCode::UNAUTHORIZED,
                        "MISSING_TOKEN",
                        "Authorization header with Bearer token required",
                    )
                })?;

        let auth_service = Arc::<AuthService>::from_ref(state);

        let claims = auth_service.verify_session(bearer.token()).map_err(|e| {
            let (code, message) = if e.to_string().contains("expired") {
                ("TOKEN_EXPIRED", "Token has expired")
            } else {
                ("INVALID_TOKEN", "Invalid token")
            };
            AuthRejection::new(StatusCode::UNAUTHORIZED, code, message)
        })?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| {
            AuthRejection::new(
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                "Invalid user ID in token",
            )
        })?;

        // Banned accounts hold valid tokens until expiry; reject them here.
        auth_service.require_active(user_id).await.map_err(|_| {
            AuthRejection::new(
                StatusCode::FORBIDDEN,
                "ACCOUNT_DISABLED",
                "Account is banned or no longer exists",
            )
        })?;

        Ok(AuthenticatedUser {
            user_id,
            display_name: claims.name,
            jti: claims.jti,
        })
    }
}

/// Optional authenticated user extractor
///
/// Attempts to authenticate but does not fail when no token is present.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<AuthenticatedUser>);

#[async_trait]
impl<S> FromRequestParts<S> for OptionalUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match AuthenticatedUser::from_request_parts(parts, state).await {
            Ok(user) => Ok(OptionalUser(Some(user))),
            Err(_) => Ok(OptionalUser(None)),
        }
    }
}

/// Extractor requiring the admin flag on the stored profile
pub struct AdminUser(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;

        let auth_service = Arc::<AuthService>::from_ref(state);
        auth_service.require_admin(user.user_id).await.map_err(|_| {
            AuthRejection::new(
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "Administrator access required",
            )
        })?;

        Ok(AdminUser(user))
    }
}

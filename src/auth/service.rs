//! Authentication service
//!
//! Two sign-in paths, mirroring the product's flows: anonymous guest
//! accounts, and accounts asserted by an external identity provider. The
//! provider path is authenticated by a shared secret carried on the request;
//! when no secret is configured, that path fails closed.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::models::UserProfile;
use crate::services::ProfileService;

use super::jwt::{self, generate_session_token, Claims};

/// Namespace for deriving stable user ids from provider subject strings.
/// Changing this would detach every provider account from its profile.
const PROVIDER_ID_NAMESPACE: Uuid = Uuid::NAMESPACE_OID;

/// Identity asserted by the external provider callback
#[derive(Debug, Deserialize, Validate)]
pub struct ProviderSignInRequest {
    /// Provider-scoped subject identifier
    #[validate(length(min = 1, max = 128))]
    pub subject: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: Option<String>,
    pub photo_url: Option<String>,
}

/// Session issued on successful sign-in
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: UserProfile,
}

/// Authentication service
pub struct AuthService {
    profiles: Arc<ProfileService>,
    jwt_secret: String,
    session_ttl_hours: i64,
    provider_shared_secret: Option<String>,
}

impl AuthService {
    pub fn new(profiles: Arc<ProfileService>, config: &Config) -> Self {
        Self {
            profiles,
            jwt_secret: config.jwt_secret.clone(),
            session_ttl_hours: config.jwt_session_ttl_hours,
            provider_shared_secret: config.provider_shared_secret.clone(),
        }
    }

    /// Anonymous guest sign-in: seeds a fresh profile and issues a session.
    pub async fn sign_in_guest(&self) -> ApiResult<SessionResponse> {
        let profile = self
            .profiles
            .ensure_profile(Uuid::new_v4(), "Guest User".to_string(), None, None)
            .await?;
        self.issue_session(profile)
    }

    /// Provider-asserted sign-in.
    ///
    /// The caller must present the configured shared secret; with no secret
    /// configured the path is disabled entirely. The profile id is derived
    /// deterministically from the provider subject, so a returning user
    /// lands on the same profile.
    pub async fn sign_in_provider(
        &self,
        presented_secret: Option<&str>,
        request: ProviderSignInRequest,
    ) -> ApiResult<SessionResponse> {
        let Some(expected) = self.provider_shared_secret.as_deref() else {
            return Err(ApiError::Unauthorized(
                "Provider sign-in is not configured".to_string(),
            ));
        };
        if presented_secret != Some(expected) {
            return Err(ApiError::Unauthorized(
                "Invalid provider credentials".to_string(),
            ));
        }
        request.validate()?;

        let id = Uuid::new_v5(&PROVIDER_ID_NAMESPACE, request.subject.as_bytes());
        let profile = self
            .profiles
            .ensure_profile(id, request.name, request.email, request.photo_url)
            .await?;

        if profile.is_banned {
            return Err(ApiError::Forbidden("Account is banned".to_string()));
        }
        self.issue_session(profile)
    }

    /// Verify a bearer token and return its claims.
    pub fn verify_session(&self, token: &str) -> ApiResult<Claims> {
        jwt::verify_token(token, &self.jwt_secret)
            .map_err(|e| ApiError::Unauthorized(e.to_string()))
    }

    /// Load the profile behind a session and require the admin flag.
    ///
    /// The flag is read from the store on every call rather than trusted
    /// from the token, so revoking admin rights takes effect immediately.
    pub async fn require_admin(&self, user_id: Uuid) -> ApiResult<UserProfile> {
        let profile = self.profiles.get_own_profile(user_id).await?;
        if profile.is_banned {
            return Err(ApiError::Forbidden("Account is banned".to_string()));
        }
        if !profile.is_admin {
            return Err(ApiError::Forbidden(
                "Administrator access required".to_string(),
            ));
        }
        Ok(profile)
    }

    /// Load the profile behind a session and reject banned accounts.
    pub async fn require_active(&self, user_id: Uuid) -> ApiResult<UserProfile> {
        let profile = self.profiles.get_own_profile(user_id).await?;
        if profile.is_banned {
            return Err(ApiError::Forbidden("Account is banned".to_string()));
        }
        Ok(profile)
    }

    fn issue_session(&self, profile: UserProfile) -> ApiResult<SessionResponse> {
        let token = generate_session_token(&profile, &self.jwt_secret, self.session_ttl_hours)
            .map_err(|e| ApiError::StoreUnavailable(format!("Token issuance failed: {}", e)))?;
        tracing::info!(user_id = %profile.id, "Session issued");
        Ok(SessionResponse {
            token,
            user: profile,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Environment, StoreBackend};
    use crate::store::MemoryStore;

    fn test_config(provider_secret: Option<&str>) -> Config {
        Config {
            database_url: String::new(),
            store_backend: StoreBackend::Memory,
            environment: Environment::Development,
            port: 3001,
            db_max_connections: 5,
            rate_limit_rps: 100,
            cors_allowed_origins: None,
            log_level: "info".to_string(),
            jwt_secret: "test-secret".to_string(),
            jwt_session_ttl_hours: 24,
            provider_shared_secret: provider_secret.map(|s| s.to_string()),
        }
    }

    fn service(provider_secret: Option<&str>) -> AuthService {
        let store = Arc::new(MemoryStore::new());
        let profiles = Arc::new(ProfileService::new(store));
        AuthService::new(profiles, &test_config(provider_secret))
    }

    #[tokio::test]
    async fn guest_sign_in_seeds_a_profile_and_session() {
        let auth = service(None);
        let session = auth.sign_in_guest().await.unwrap();

        assert_eq!(session.user.name, "Guest User");
        assert!(!session.user.is_admin);

        let claims = auth.verify_session(&session.token).unwrap();
        assert_eq!(claims.sub, session.user.id.to_string());
    }

    #[tokio::test]
    async fn provider_sign_in_fails_closed_without_configured_secret() {
        let auth = service(None);
        let err = auth
            .sign_in_provider(
                Some("anything"),
                ProviderSignInRequest {
                    subject: "provider-uid-1".to_string(),
                    name: "Ann".to_string(),
                    email: None,
                    photo_url: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn provider_sign_in_is_stable_across_visits() {
        let auth = service(Some("shared"));
        let request = || ProviderSignInRequest {
            subject: "provider-uid-1".to_string(),
            name: "Ann".to_string(),
            email: Some("ann@example.com".to_string()),
            photo_url: None,
        };

        let first = auth.sign_in_provider(Some("shared"), request()).await.unwrap();
        let second = auth.sign_in_provider(Some("shared"), request()).await.unwrap();
        assert_eq!(first.user.id, second.user.id);

        let err = auth
            .sign_in_provider(Some("wrong"), request())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }
}

//! Authentication: session tokens and the two sign-in paths

pub mod jwt;
pub mod service;

pub use jwt::{user_id_from_claims, verify_token, Claims, JwtError};
pub use service::{AuthService, ProviderSignInRequest, SessionResponse};

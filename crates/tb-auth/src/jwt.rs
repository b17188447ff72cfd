//! JWT Authentication
//!
//! The identity provider is external; it hands users a signed token carrying
//! their id, super-admin flag, capability names, and project memberships.
//! This module validates such tokens and turns the claims into a
//! [`CurrentUser`](crate::policy::CurrentUser).

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::policy::{Capability, CurrentUser};
use tb_core::traits::Id;

/// JWT claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
    /// JWT ID (for token revocation)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    /// User login
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    /// Super admin flag
    #[serde(default)]
    pub super_admin: bool,
    /// Named capabilities granted to the user
    #[serde(default)]
    pub caps: Vec<String>,
    /// Project ids the user is a member of
    #[serde(default)]
    pub projects: Vec<Id>,
}

impl Claims {
    /// Build the typed identity the permission gate checks against.
    ///
    /// Unknown capability names are dropped with a warning; a stale token
    /// must not grant anything the closed enum does not know.
    pub fn to_current_user(&self) -> Result<CurrentUser, JwtError> {
        let id: Id = self
            .sub
            .parse()
            .map_err(|_| JwtError::Invalid("Invalid user ID in token".to_string()))?;

        let mut user = CurrentUser::new(id, self.login.clone().unwrap_or_default());
        user.is_super_admin = self.super_admin;

        for name in &self.caps {
            match Capability::from_name(name) {
                Some(cap) => user.grant(cap),
                None => tracing::warn!(capability = %name, "Ignoring unknown capability in token"),
            }
        }

        for project_id in &self.projects {
            user.add_project(*project_id);
        }

        Ok(user)
    }
}

/// JWT errors
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Token is expired")]
    Expired,
    #[error("Invalid token: {0}")]
    Invalid(String),
    #[error("Missing token")]
    Missing,
    #[error("Token encoding failed: {0}")]
    EncodingFailed(String),
}

/// JWT service for creating and validating tokens
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    /// Create a new JWT service with the given secret
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    /// Create a new JWT token for a user
    pub fn create_token(
        &self,
        user: &CurrentUser,
        expires_in_seconds: i64,
    ) -> Result<String, JwtError> {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))?
            .as_secs() as usize;

        let claims = Claims {
            sub: user.id.to_string(),
            exp: now + expires_in_seconds as usize,
            iat: now,
            jti: Some(uuid::Uuid::new_v4().to_string()),
            login: Some(user.login.clone()),
            super_admin: user.is_super_admin,
            caps: user.capability_names(),
            projects: user.project_ids(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Validate and decode a JWT token
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let validation = Validation::default();

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Invalid(e.to_string()),
            }
        })?;

        Ok(token_data.claims)
    }

    /// Validate a token and resolve the current user
    pub fn authenticate(&self, token: &str) -> Result<CurrentUser, JwtError> {
        self.validate_token(token)?.to_current_user()
    }
}

/// Extract bearer token from an Authorization header value
pub fn extract_bearer_token(authorization: &str) -> Option<&str> {
    if authorization.to_lowercase().starts_with("bearer ") {
        Some(authorization[7..].trim())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> JwtService {
        JwtService::new(b"test-secret-key-at-least-32-bytes")
    }

    #[test]
    fn test_create_and_validate_token() {
        let service = test_service();

        let mut user = CurrentUser::new(1, "jdoe");
        user.grant(Capability::ViewTicket);
        user.grant(Capability::UpdateTicket);
        user.add_project(5);

        let token = service.create_token(&user, 3600).unwrap();
        let resolved = service.authenticate(&token).unwrap();

        assert_eq!(resolved.id, 1);
        assert_eq!(resolved.login, "jdoe");
        assert!(resolved.has(Capability::ViewTicket));
        assert!(resolved.is_member_of(5));
        assert!(!resolved.is_super_admin);
    }

    #[test]
    fn test_unknown_capability_is_dropped() {
        let claims = Claims {
            sub: "7".into(),
            exp: usize::MAX,
            iat: 0,
            jti: None,
            login: None,
            super_admin: false,
            caps: vec!["view_ticket".into(), "launch_missiles".into()],
            projects: vec![],
        };

        let user = claims.to_current_user().unwrap();
        assert!(user.has(Capability::ViewTicket));
        assert_eq!(user.capability_names(), vec!["view_ticket".to_string()]);
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer_token("bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer_token("Basic abc123"), None);
    }

    #[test]
    fn test_invalid_subject_rejected() {
        let claims = Claims {
            sub: "not-a-number".into(),
            exp: usize::MAX,
            iat: 0,
            jti: None,
            login: None,
            super_admin: false,
            caps: vec![],
            projects: vec![],
        };

        assert!(claims.to_current_user().is_err());
    }
}

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{
    error::{ErrorMessage, HttpError},
    models::usermodel::RoleName,
};

pub const TOKEN_TYPE_ACCESS: &str = "access";
pub const TOKEN_TYPE_REFRESH: &str = "refresh";

/// Self-contained bearer token claims. Access tokens carry the resolved role
/// names as a comma-joined claim; refresh tokens carry the subject only.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<String>,
    pub token_type: String,
    pub iat: usize,
    pub exp: usize,
}

impl TokenClaims {
    pub fn is_access(&self) -> bool {
        self.token_type == TOKEN_TYPE_ACCESS
    }

    pub fn is_refresh(&self) -> bool {
        self.token_type == TOKEN_TYPE_REFRESH
    }

    pub fn role_names(&self) -> Vec<RoleName> {
        self.roles
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .filter_map(RoleName::parse)
            .collect()
    }
}

pub fn create_access_token(
    email: &str,
    roles: &[RoleName],
    secret: &[u8],
    max_age_secs: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let roles = roles
        .iter()
        .map(|role| role.to_str())
        .collect::<Vec<_>>()
        .join(",");

    create_token(email, Some(roles), TOKEN_TYPE_ACCESS, secret, max_age_secs)
}

pub fn create_refresh_token(
    email: &str,
    secret: &[u8],
    max_age_secs: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    create_token(email, None, TOKEN_TYPE_REFRESH, secret, max_age_secs)
}

fn create_token(
    email: &str,
    roles: Option<String>,
    token_type: &str,
    secret: &[u8],
    max_age_secs: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    if email.is_empty() {
        return Err(jsonwebtoken::errors::ErrorKind::InvalidSubject.into());
    }

    let now = Utc::now();
    let claims = TokenClaims {
        sub: email.to_string(),
        roles,
        token_type: token_type.to_string(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::seconds(max_age_secs)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
}

/// Any decode failure (bad signature, expiry, malformed token) maps to a
/// single 401 — callers must never distinguish "broken" from "forged".
pub fn decode_token<T: Into<String>>(token: T, secret: &[u8]) -> Result<TokenClaims, HttpError> {
    decode::<TokenClaims>(
        &token.into(),
        &DecodingKey::from_secret(secret),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|_| HttpError::unauthorized(ErrorMessage::InvalidToken.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret-key";

    #[test]
    fn access_token_roundtrip() {
        let token =
            create_access_token("a@x.com", &[RoleName::Customer], SECRET, 60).unwrap();
        let claims = decode_token(token, SECRET).unwrap();

        assert_eq!(claims.sub, "a@x.com");
        assert!(claims.is_access());
        assert!(!claims.is_refresh());
        assert_eq!(claims.role_names(), vec![RoleName::Customer]);
    }

    #[test]
    fn refresh_token_carries_no_roles() {
        let token = create_refresh_token("a@x.com", SECRET, 60).unwrap();
        let claims = decode_token(token, SECRET).unwrap();

        assert!(claims.is_refresh());
        assert!(claims.role_names().is_empty());
    }

    #[test]
    fn multiple_roles_are_preserved() {
        let token = create_access_token(
            "b@x.com",
            &[RoleName::Customer, RoleName::Provider],
            SECRET,
            60,
        )
        .unwrap();
        let claims = decode_token(token, SECRET).unwrap();

        assert_eq!(
            claims.role_names(),
            vec![RoleName::Customer, RoleName::Provider]
        );
    }

    #[test]
    fn expired_token_is_rejected() {
        // Past the default 60s decode leeway.
        let token = create_access_token("a@x.com", &[], SECRET, -3600).unwrap();
        assert!(decode_token(token, SECRET).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = create_access_token("a@x.com", &[], SECRET, 60).unwrap();
        assert!(decode_token(token, b"another-secret").is_err());
    }

    #[test]
    fn empty_subject_is_rejected() {
        assert!(create_access_token("", &[], SECRET, 60).is_err());
    }
}

//! Password hashing and JWT issuance.
//!
//! Tokens are HS256 JWTs signed with [`AuthConfig::jwt_secret`]. There are two kinds, distinguished by the
//! `token_type` claim:
//! * `access` tokens are short-lived and are the only kind accepted by the `/api` bearer middleware.
//! * `refresh` tokens live longer and can only be exchanged for a new access token at `/token/refresh/`.
use chrono::Duration;
use jwt_compact::{
    alg::{Hs256, Hs256Key},
    AlgorithmExt,
    Claims,
    Header,
    TimeOptions,
    UntrustedToken,
};
use log::*;
use serde::{Deserialize, Serialize};
use vendor_perf_engine::db_types::UserAccount;

use crate::{
    config::AuthConfig,
    errors::{AuthError, ServerError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenType::Access => write!(f, "access"),
            TokenType::Refresh => write!(f, "refresh"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    pub user_id: i64,
    pub username: String,
    pub token_type: TokenType,
}

impl JwtClaims {
    pub fn for_user(user: &UserAccount, token_type: TokenType) -> Self {
        Self { user_id: user.id, username: user.username.clone(), token_type }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

pub struct TokenIssuer {
    key: Hs256Key,
    access_lifetime: Duration,
    refresh_lifetime: Duration,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        let key = Hs256Key::new(config.jwt_secret.reveal().as_bytes());
        Self { key, access_lifetime: config.access_token_lifetime, refresh_lifetime: config.refresh_token_lifetime }
    }

    pub fn issue_token(&self, user: &UserAccount, token_type: TokenType) -> Result<String, AuthError> {
        let lifetime = match token_type {
            TokenType::Access => self.access_lifetime,
            TokenType::Refresh => self.refresh_lifetime,
        };
        let claims = Claims::new(JwtClaims::for_user(user, token_type))
            .set_duration_and_issuance(&TimeOptions::default(), lifetime);
        self.sign(&claims)
    }

    /// Issues a fresh access and refresh token for the user.
    pub fn issue_token_pair(&self, user: &UserAccount) -> Result<TokenPair, AuthError> {
        let access = self.issue_token(user, TokenType::Access)?;
        let refresh = self.issue_token(user, TokenType::Refresh)?;
        trace!("🔑️ Issued token pair for {}", user.username);
        Ok(TokenPair { access, refresh })
    }

    /// Checks the signature, expiry and type of `token`, returning its claims if everything is in order.
    pub fn validate(&self, token: &str, expected: TokenType) -> Result<JwtClaims, AuthError> {
        let untrusted = UntrustedToken::new(token).map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        let token = Hs256
            .validator::<JwtClaims>(&self.key)
            .validate(&untrusted)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        token.claims().validate_expiration(&TimeOptions::default()).map_err(|e| {
            debug!("🔑️ Rejected token. {e}");
            AuthError::InvalidToken(e.to_string())
        })?;
        let claims = token.claims().custom.clone();
        if claims.token_type != expected {
            debug!("🔑️ {} presented a {} token where a {expected} token was expected", claims.username, claims.token_type);
            return Err(AuthError::WrongTokenType(expected.to_string()));
        }
        Ok(claims)
    }

    fn sign(&self, claims: &Claims<JwtClaims>) -> Result<String, AuthError> {
        let header = Header::empty().with_token_type("JWT");
        Hs256.token(&header, claims, &self.key).map_err(|e| AuthError::TokenCreationError(e.to_string()))
    }
}

pub fn hash_password(password: &str, cost: u32) -> Result<String, ServerError> {
    bcrypt::hash(password, cost).map_err(|e| {
        error!("🔑️ Could not hash password. {e}");
        ServerError::BackendError(format!("Could not hash password. {e}"))
    })
}

/// Returns true if `password` matches the stored bcrypt hash. Malformed hashes never match.
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or_else(|e| {
        warn!("🔑️ Stored password hash could not be checked. {e}");
        false
    })
}

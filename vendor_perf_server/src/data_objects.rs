use std::fmt::Display;

use serde::{Deserialize, Serialize};
use vendor_perf_engine::db_types::UserAccount;

use crate::auth::TokenPair;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub password: String,
}

/// Username and password, as sent to `/login/` and `/token/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access: String,
}

/// The `/login/` response. Same tokens as `/token/`, but the refresh token goes by `refresh_token`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginTokens {
    pub access: String,
    pub refresh_token: String,
}

impl From<TokenPair> for LoginTokens {
    fn from(pair: TokenPair) -> Self {
        Self { access: pair.access, refresh_token: pair.refresh }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredUser {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<UserAccount> for RegisteredUser {
    fn from(user: UserAccount) -> Self {
        Self { id: user.id, username: user.username, email: user.email }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new<S: Display>(message: S) -> Self {
        Self { message: message.to_string() }
    }
}

use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{NewUserAccount, UserAccount},
    traits::{AuthApiError, AuthManagement},
};

/// User account storage for the login endpoints. Password hashing and token handling are done by the caller.
pub struct AuthApi<B> {
    db: B,
}

impl<B: Debug> Debug for AuthApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AuthApi ({:?})", self.db)
    }
}

impl<B> AuthApi<B>
where B: AuthManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn register_user(&self, user: NewUserAccount) -> Result<UserAccount, AuthApiError> {
        let user = self.db.create_user(user).await?;
        info!("🔑️ New user {} registered", user.username);
        Ok(user)
    }

    pub async fn user_by_username(&self, username: &str) -> Result<Option<UserAccount>, AuthApiError> {
        self.db.fetch_user_by_username(username).await
    }

    pub async fn user_by_id(&self, user_id: i64) -> Result<Option<UserAccount>, AuthApiError> {
        self.db.fetch_user(user_id).await
    }
}

use thiserror::Error;

use crate::{
    db_types::{NewUserAccount, UserAccount},
    validation::ValidationErrors,
};

#[allow(async_fn_in_trait)]
pub trait AuthManagement {
    async fn create_user(&self, user: NewUserAccount) -> Result<UserAccount, AuthApiError>;

    async fn fetch_user(&self, user_id: i64) -> Result<Option<UserAccount>, AuthApiError>;

    async fn fetch_user_by_username(&self, username: &str) -> Result<Option<UserAccount>, AuthApiError>;
}

#[derive(Debug, Clone, Error)]
pub enum AuthApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("A user with that username already exists.")]
    UsernameTaken,
    #[error("Invalid Credentials")]
    InvalidCredentials,
    #[error("Invalid registration. {0}")]
    ValidationFailed(ValidationErrors),
    #[error("Could not hash password. {0}")]
    PasswordHashError(String),
}

impl From<sqlx::Error> for AuthApiError {
    fn from(e: sqlx::Error) -> Self {
        AuthApiError::DatabaseError(e.to_string())
    }
}

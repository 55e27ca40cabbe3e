use chrono::Utc;
use sqlx::SqliteConnection;

use super::{first_row, is_unique_violation};
use crate::{
    db_types::{NewUserAccount, UserAccount},
    traits::AuthApiError,
};

pub async fn insert_user(user: NewUserAccount, conn: &mut SqliteConnection) -> Result<UserAccount, AuthApiError> {
    let result: Result<Vec<UserAccount>, sqlx::Error> = sqlx::query_as(
        r#"
            INSERT INTO users (username, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *;
        "#,
    )
    .bind(user.username)
    .bind(user.email)
    .bind(user.password_hash)
    .bind(Utc::now())
    .fetch_all(conn)
    .await;
    match result {
        Ok(rows) => first_row(rows).ok_or_else(|| sqlx::Error::RowNotFound.into()),
        Err(e) if is_unique_violation(&e) => Err(AuthApiError::UsernameTaken),
        Err(e) => Err(e.into()),
    }
}

pub async fn fetch_user_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<UserAccount>, sqlx::Error> {
    let rows = sqlx::query_as("SELECT * FROM users WHERE id = $1").bind(id).fetch_all(conn).await?;
    Ok(first_row(rows))
}

pub async fn fetch_user_by_username(
    username: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<UserAccount>, sqlx::Error> {
    let rows = sqlx::query_as("SELECT * FROM users WHERE username = $1").bind(username).fetch_all(conn).await?;
    Ok(first_row(rows))
}

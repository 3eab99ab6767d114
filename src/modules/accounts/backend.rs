use async_trait::async_trait;
use axum_login::{AuthnBackend, UserId};
use password_auth::{generate_hash, verify_password};
use sqlx::SqlitePool;
use tokio::task;

use super::models::{Credentials, User};

/// Session-backed authentication over the `users` table.
#[derive(Debug, Clone)]
pub struct Backend {
    db: SqlitePool,
}

impl Backend {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    TaskJoin(#[from] task::JoinError),
}

#[async_trait]
impl AuthnBackend for Backend {
    type User = User;
    type Credentials = Credentials;
    type Error = BackendError;

    async fn authenticate(
        &self,
        creds: Self::Credentials,
    ) -> Result<Option<Self::User>, Self::Error> {
        let user: Option<User> =
            sqlx::query_as("SELECT id, username, password_hash FROM users WHERE username = ?")
                .bind(&creds.username)
                .fetch_optional(&self.db)
                .await?;

        // Argon2 verification is CPU-bound; keep it off the async runtime.
        task::spawn_blocking(move || {
            Ok(user.filter(|user| verify_password(&creds.password, &user.password_hash).is_ok()))
        })
        .await?
    }

    async fn get_user(&self, user_id: &UserId<Self>) -> Result<Option<Self::User>, Self::Error> {
        let user =
            sqlx::query_as("SELECT id, username, password_hash FROM users WHERE id = ?")
                .bind(user_id)
                .fetch_optional(&self.db)
                .await?;

        Ok(user)
    }
}

/// Session type threaded into handlers as the per-request auth context.
pub type AuthSession = axum_login::AuthSession<Backend>;

/// Outcome of an account-creation attempt.
#[derive(Debug, PartialEq, Eq)]
pub enum RegisterOutcome {
    Created,
    UsernameTaken,
}

/// Persist a validated registration, hashing the password off-thread.
///
/// Username uniqueness is enforced by the database index; a violation is
/// reported as `UsernameTaken`, not an error.
pub async fn register_user(
    db: &SqlitePool,
    username: String,
    password: String,
) -> anyhow::Result<RegisterOutcome> {
    let password_hash = task::spawn_blocking(move || generate_hash(&password)).await?;

    let result = sqlx::query("INSERT INTO users (username, password_hash) VALUES (?, ?)")
        .bind(&username)
        .bind(&password_hash)
        .execute(db)
        .await;

    match result {
        Ok(_) => Ok(RegisterOutcome::Created),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            Ok(RegisterOutcome::UsernameTaken)
        }
        Err(e) => Err(e.into()),
    }
}

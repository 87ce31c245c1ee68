//! User registration and authentication

use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::Principal;
use crate::error::{AppError, AppResult};
use crate::security::password;

/// Account registration and credential verification against the user store.
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a new account.
    ///
    /// The duplicate-email check and the insert run in one transaction so a
    /// concurrent registration of the same email cannot slip between them.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        plain_password: &str,
    ) -> AppResult<Principal> {
        let mut tx = self.pool.begin().await?;

        let existing: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(&mut *tx)
                .await?;

        if existing.is_some() {
            return Err(AppError::BusinessRule("Email already registered".to_string()));
        }

        let password_hash = password::hash_password(plain_password)?;
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(&password_hash)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(user_id = %id, "User registered");

        Ok(Principal::new(id, email, name))
    }

    /// Verify credentials and return the principal.
    ///
    /// Unknown email and wrong password both come back as
    /// `InvalidCredentials`; callers must not be able to tell which.
    pub async fn authenticate(&self, email: &str, plain_password: &str) -> AppResult<Principal> {
        let row: Option<(Uuid, String, String, String)> = sqlx::query_as(
            "SELECT id, name, email, password_hash FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        let Some((id, name, stored_email, password_hash)) = row else {
            return Err(AppError::InvalidCredentials);
        };

        if !password::verify_password(&password_hash, plain_password) {
            return Err(AppError::InvalidCredentials);
        }

        Ok(Principal::new(id, stored_email, name))
    }

    /// Materialize the principal for an already-verified email.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Principal> {
        let row: Option<(Uuid, String, String)> =
            sqlx::query_as("SELECT id, name, email FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

        let Some((id, name, stored_email)) = row else {
            return Err(AppError::NotFound("User not found".to_string()));
        };

        Ok(Principal::new(id, stored_email, name))
    }
}

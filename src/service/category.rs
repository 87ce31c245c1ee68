//! Category operations
//!
//! All lookups are keyed by `(id, owner_id)`: a category owned by someone
//! else is reported as absent, never as forbidden.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

const CATEGORY_NOT_FOUND: &str = "Category not found or does not belong to user";

/// Stored category, as returned to the API layer.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryRecord {
    pub id: Uuid,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
}

type CategoryRow = (Uuid, String, String, String, DateTime<Utc>);

impl From<CategoryRow> for CategoryRecord {
    fn from((id, name, icon, color, created_at): CategoryRow) -> Self {
        Self {
            id,
            name,
            icon,
            color,
            created_at,
        }
    }
}

/// Owner-scoped category store operations.
pub struct CategoryService {
    pool: PgPool,
}

impl CategoryService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        owner_id: Uuid,
        name: &str,
        icon: &str,
        color: &str,
    ) -> AppResult<CategoryRecord> {
        let row: CategoryRow = sqlx::query_as(
            r#"
            INSERT INTO categories (id, user_id, name, icon, color, created_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
            RETURNING id, name, icon, color, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(name)
        .bind(icon)
        .bind(color)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    pub async fn list(&self, owner_id: Uuid) -> AppResult<Vec<CategoryRecord>> {
        let rows: Vec<CategoryRow> = sqlx::query_as(
            r#"
            SELECT id, name, icon, color, created_at
            FROM categories
            WHERE user_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn get(&self, id: Uuid, owner_id: Uuid) -> AppResult<CategoryRecord> {
        let row: Option<CategoryRow> = sqlx::query_as(
            r#"
            SELECT id, name, icon, color, created_at
            FROM categories
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Into::into)
            .ok_or_else(|| AppError::NotFound(CATEGORY_NOT_FOUND.to_string()))
    }

    pub async fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        name: &str,
        icon: &str,
        color: &str,
    ) -> AppResult<CategoryRecord> {
        let row: Option<CategoryRow> = sqlx::query_as(
            r#"
            UPDATE categories
            SET name = $3, icon = $4, color = $5
            WHERE id = $1 AND user_id = $2
            RETURNING id, name, icon, color, created_at
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(name)
        .bind(icon)
        .bind(color)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Into::into)
            .ok_or_else(|| AppError::NotFound(CATEGORY_NOT_FOUND.to_string()))
    }

    /// Delete a category the caller owns.
    ///
    /// Deletion is blocked while transactions still reference the category;
    /// that surfaces as a business-rule error rather than a storage
    /// constraint violation. The existence check, dependency check, and
    /// delete run in one transaction.
    pub async fn delete(&self, id: Uuid, owner_id: Uuid) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let owned: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM categories WHERE id = $1 AND user_id = $2)",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_one(&mut *tx)
        .await?;

        if !owned {
            return Err(AppError::NotFound(CATEGORY_NOT_FOUND.to_string()));
        }

        let referenced: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM transactions WHERE category_id = $1)",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        if referenced {
            return Err(AppError::BusinessRule(
                "Cannot delete category with existing transactions".to_string(),
            ));
        }

        sqlx::query("DELETE FROM categories WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}

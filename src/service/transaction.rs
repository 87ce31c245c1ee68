//! Transaction operations and financial summary
//!
//! Same ownership discipline as categories: every lookup carries
//! `(id, owner_id)`. Creating or re-pointing a transaction re-validates that
//! the referenced category belongs to the same owner; another owner's
//! category id behaves exactly like a nonexistent one.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{resolve_range, Summary, TransactionKind};
use crate::error::{AppError, AppResult};
use crate::service::category::CategoryRecord;

const TRANSACTION_NOT_FOUND: &str = "Transaction not found or does not belong to user";
const CATEGORY_NOT_FOUND: &str = "Category not found or does not belong to user";

/// Stored transaction with its category, as returned to the API layer.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionRecord {
    pub id: Uuid,
    pub description: String,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub date: NaiveDate,
    pub category: CategoryRecord,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating or replacing a transaction.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub description: String,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub date: NaiveDate,
    pub category_id: Uuid,
}

impl NewTransaction {
    /// Amounts are stored as non-negative magnitudes; the sign lives in the
    /// kind. A zero or negative amount is a client error, not a storage
    /// constraint violation.
    fn validate(&self) -> AppResult<()> {
        if self.amount <= Decimal::ZERO {
            return Err(AppError::BusinessRule(
                "Amount must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

type TransactionRow = (
    Uuid,
    String,
    Decimal,
    String,
    NaiveDate,
    Uuid,
    DateTime<Utc>,
    Uuid,
    String,
    String,
    String,
    DateTime<Utc>,
);

fn into_record(row: TransactionRow) -> AppResult<TransactionRecord> {
    let (
        id,
        description,
        amount,
        kind,
        date,
        user_id,
        created_at,
        category_id,
        category_name,
        icon,
        color,
        category_created_at,
    ) = row;

    Ok(TransactionRecord {
        id,
        description,
        amount,
        kind: TransactionKind::parse(&kind)?,
        date,
        category: CategoryRecord {
            id: category_id,
            name: category_name,
            icon,
            color,
            created_at: category_created_at,
        },
        user_id,
        created_at,
    })
}

const SELECT_TRANSACTION: &str = r#"
    SELECT t.id, t.description, t.amount, t.kind, t.date, t.user_id, t.created_at,
           c.id, c.name, c.icon, c.color, c.created_at
    FROM transactions t
    JOIN categories c ON c.id = t.category_id
"#;

/// Owner-scoped transaction store operations plus the summary aggregation.
pub struct TransactionService {
    pool: PgPool,
}

impl TransactionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, owner_id: Uuid, new: NewTransaction) -> AppResult<TransactionRecord> {
        new.validate()?;

        let mut tx = self.pool.begin().await?;

        let category_owned: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM categories WHERE id = $1 AND user_id = $2)",
        )
        .bind(new.category_id)
        .bind(owner_id)
        .fetch_one(&mut *tx)
        .await?;

        if !category_owned {
            return Err(AppError::NotFound(CATEGORY_NOT_FOUND.to_string()));
        }

        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO transactions (id, user_id, category_id, description, amount, kind, date, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(new.category_id)
        .bind(&new.description)
        .bind(new.amount)
        .bind(new.kind.as_str())
        .bind(new.date)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.get(id, owner_id).await
    }

    /// List the owner's transactions, newest first, with the total count for
    /// pagination.
    pub async fn list(
        &self,
        owner_id: Uuid,
        page: i64,
        per_page: i64,
    ) -> AppResult<(Vec<TransactionRecord>, i64)> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM transactions WHERE user_id = $1")
                .bind(owner_id)
                .fetch_one(&self.pool)
                .await?;

        let query = format!(
            "{SELECT_TRANSACTION} WHERE t.user_id = $1 ORDER BY t.date DESC, t.created_at DESC LIMIT $2 OFFSET $3"
        );
        let rows: Vec<TransactionRow> = sqlx::query_as(&query)
            .bind(owner_id)
            .bind(per_page)
            .bind(page * per_page)
            .fetch_all(&self.pool)
            .await?;

        let records = rows
            .into_iter()
            .map(into_record)
            .collect::<AppResult<Vec<_>>>()?;

        Ok((records, total))
    }

    pub async fn get(&self, id: Uuid, owner_id: Uuid) -> AppResult<TransactionRecord> {
        let query = format!("{SELECT_TRANSACTION} WHERE t.id = $1 AND t.user_id = $2");
        let row: Option<TransactionRow> = sqlx::query_as(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Err(AppError::NotFound(TRANSACTION_NOT_FOUND.to_string()));
        };

        into_record(row)
    }

    pub async fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        changes: NewTransaction,
    ) -> AppResult<TransactionRecord> {
        changes.validate()?;

        let mut tx = self.pool.begin().await?;

        let owned: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM transactions WHERE id = $1 AND user_id = $2)",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_one(&mut *tx)
        .await?;

        if !owned {
            return Err(AppError::NotFound(TRANSACTION_NOT_FOUND.to_string()));
        }

        let category_owned: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM categories WHERE id = $1 AND user_id = $2)",
        )
        .bind(changes.category_id)
        .bind(owner_id)
        .fetch_one(&mut *tx)
        .await?;

        if !category_owned {
            return Err(AppError::NotFound(CATEGORY_NOT_FOUND.to_string()));
        }

        sqlx::query(
            r#"
            UPDATE transactions
            SET description = $3, amount = $4, kind = $5, date = $6, category_id = $7
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(&changes.description)
        .bind(changes.amount)
        .bind(changes.kind.as_str())
        .bind(changes.date)
        .bind(changes.category_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.get(id, owner_id).await
    }

    pub async fn delete(&self, id: Uuid, owner_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(TRANSACTION_NOT_FOUND.to_string()));
        }

        Ok(())
    }

    /// Aggregate income and expense totals over the resolved range.
    ///
    /// The range endpoints are inclusive. No matching rows yields the
    /// all-zero summary.
    pub async fn summary(
        &self,
        owner_id: Uuid,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> AppResult<Summary> {
        let range = resolve_range(start_date, end_date, Utc::now().date_naive())?;

        let row: Option<(Decimal, Decimal)> = sqlx::query_as(
            r#"
            SELECT
                COALESCE(SUM(CASE WHEN kind = 'INCOME' THEN amount ELSE 0 END), 0) AS total_income,
                COALESCE(SUM(CASE WHEN kind = 'EXPENSE' THEN amount ELSE 0 END), 0) AS total_expense
            FROM transactions
            WHERE user_id = $1 AND date >= $2 AND date <= $3
            "#,
        )
        .bind(owner_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_optional(&self.pool)
        .await?;

        let summary = match row {
            Some((total_income, total_expense)) => {
                Summary::new(total_income, total_expense, range)
            }
            None => Summary::empty(range),
        };

        Ok(summary)
    }
}

//! Common test utilities

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Connect to the database named by `DATABASE_URL` and make sure the schema
/// exists. Returns `None` when `DATABASE_URL` is not set, so the DB-backed
/// suite is skipped on machines without Postgres.
pub async fn try_setup_test_db() -> Option<PgPool> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").ok()?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    // Same schema as migrations/0001_init.sql, idempotent so every test can
    // call setup. Tests isolate through unique per-test users instead of
    // truncation; truncating here would race with parallel tests.
    let statements = [
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY,
            name VARCHAR(100) NOT NULL,
            email VARCHAR(255) NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            id UUID PRIMARY KEY,
            user_id UUID NOT NULL REFERENCES users(id),
            name VARCHAR(50) NOT NULL,
            icon VARCHAR(50) NOT NULL,
            color VARCHAR(7) NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS transactions (
            id UUID PRIMARY KEY,
            user_id UUID NOT NULL REFERENCES users(id),
            category_id UUID NOT NULL REFERENCES categories(id),
            description VARCHAR(255) NOT NULL,
            amount NUMERIC(19, 2) NOT NULL CHECK (amount > 0),
            kind VARCHAR(10) NOT NULL CHECK (kind IN ('INCOME', 'EXPENSE')),
            date DATE NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ];

    for statement in statements {
        sqlx::query(statement)
            .execute(&pool)
            .await
            .expect("Failed to create schema");
    }

    Some(pool)
}

/// Unique email per call so parallel tests never collide on the
/// email-uniqueness constraint.
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@example.com", uuid::Uuid::new_v4())
}

//! SQLite pool factory and migration runner for Shelfmark modules.

use std::str::FromStr;

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use shelfmark_kernel::settings::DatabaseSettings;
use shelfmark_kernel::Migration;

/// Establish the application pool from the configured database URL.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&settings.url)
        .with_context(|| format!("invalid database url '{}'", settings.url))?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .connect_with(options)
        .await
        .with_context(|| "failed to connect to database")?;

    tracing::info!(url = %settings.url, "database pool established");

    Ok(pool)
}

/// Apply module-contributed migrations that have not run yet.
///
/// Each applied migration is recorded in the `_migrations` ledger keyed by
/// `(module, id)`, so re-running the full set on startup is a no-op.
pub async fn apply_migrations(
    pool: &SqlitePool,
    migrations: &[(String, Migration)],
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS _migrations (
            module TEXT NOT NULL,
            id     TEXT NOT NULL,
            PRIMARY KEY (module, id)
        )
        "#,
    )
    .execute(pool)
    .await
    .with_context(|| "failed to create migration ledger")?;

    for (module, migration) in migrations {
        let applied: Option<(String,)> =
            sqlx::query_as("SELECT id FROM _migrations WHERE module = ? AND id = ?")
                .bind(module)
                .bind(migration.id)
                .fetch_optional(pool)
                .await
                .with_context(|| "failed to read migration ledger")?;

        if applied.is_some() {
            continue;
        }

        tracing::info!(module = %module, migration = migration.id, "applying migration");

        sqlx::raw_sql(migration.up)
            .execute(pool)
            .await
            .with_context(|| {
                format!("failed to apply migration '{}/{}'", module, migration.id)
            })?;

        sqlx::query("INSERT INTO _migrations (module, id) VALUES (?, ?)")
            .bind(module)
            .bind(migration.id)
            .execute(pool)
            .await
            .with_context(|| "failed to record migration")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_migrations() -> Vec<(String, Migration)> {
        vec![(
            "books".to_string(),
            Migration {
                id: "001_init",
                up: "CREATE TABLE books (id INTEGER PRIMARY KEY, title TEXT NOT NULL);",
            },
        )]
    }

    #[tokio::test]
    async fn migrations_apply_once() {
        // A single connection keeps the in-memory database alive.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let migrations = sample_migrations();

        apply_migrations(&pool, &migrations).await.unwrap();
        // A second pass must skip the already-applied migration instead of
        // failing on the existing table.
        apply_migrations(&pool, &migrations).await.unwrap();

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM _migrations")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);

        sqlx::query("INSERT INTO books (title) VALUES ('Dune')")
            .execute(&pool)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn invalid_url_is_rejected() {
        let settings = DatabaseSettings {
            url: "postgres://nope".to_string(),
            max_connections: 1,
        };
        assert!(connect(&settings).await.is_err());
    }
}

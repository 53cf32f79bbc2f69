use std::str::FromStr;

use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tracing::info;

pub mod models;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;

/// Owns the connection pool for the field-sales database
#[derive(Clone)]
pub struct DBService {
    pub pool: SqlitePool,
}

impl DBService {
    /// Connect to `database_url`, creating the file when missing, and apply
    /// pending migrations.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(8)
            .connect_with(options)
            .await?;

        Self::migrate(&pool).await?;
        info!(database_url, "Database ready");

        Ok(Self { pool })
    }

    /// Private in-memory database. Pinned to one connection because every
    /// SQLite memory connection is its own database.
    pub async fn new_in_memory() -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        Self::migrate(&pool).await?;

        Ok(Self { pool })
    }

    async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        fixtures::{NewDealer, NewUser, insert_company},
        models::dealer::DealerReportRow,
    };

    #[tokio::test]
    async fn test_in_memory_database_is_migrated() {
        let db = DBService::new_in_memory().await.unwrap();
        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('users', 'dealers', 'dealer_scores')",
        )
        .fetch_one(&db.pool)
        .await
        .unwrap();
        assert_eq!(tables, 3);
    }

    #[tokio::test]
    async fn test_dealers_are_scoped_through_owning_salesman() {
        let db = DBService::new_in_memory().await.unwrap();
        let acme = insert_company(&db.pool, "Acme Cement").await.unwrap();
        let other = insert_company(&db.pool, "Other Cement").await.unwrap();
        let ours = NewUser::salesman(acme, "a@acme.test").insert(&db.pool).await.unwrap();
        let theirs = NewUser::salesman(other, "b@other.test").insert(&db.pool).await.unwrap();
        NewDealer::owned_by(ours, "Ours").insert(&db.pool).await.unwrap();
        NewDealer::owned_by(theirs, "Theirs").insert(&db.pool).await.unwrap();

        let rows = DealerReportRow::find_by_company_id(&db.pool, acme, None)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Ours");
        assert_eq!(rows[0].salesman_email, "a@acme.test");
    }
}

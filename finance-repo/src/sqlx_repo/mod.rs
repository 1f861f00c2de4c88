mod category_repo;
mod transaction_repo;
mod user_repo;

use crate::{HealthCheck, Repos};
use anyhow::Context;
use async_trait::async_trait;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub struct SQLxRepo {
    pool: Pool<Sqlite>,
}

impl SQLxRepo {
    pub fn new(pool: Pool<Sqlite>) -> SQLxRepo {
        SQLxRepo { pool }
    }
}

#[async_trait]
impl HealthCheck for SQLxRepo {
    async fn check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

/// Connects to `database_url` (e.g. `sqlite://finance.sqlite` or `sqlite::memory:`), creating
/// the file if needed, and brings the schema up to date.
///
/// Connections are never recycled so an in-memory database lives as long as the pool.
pub async fn create_repos(database_url: &str, max_pool_size: u32) -> Result<Repos, anyhow::Error> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("Invalid database url {}", database_url))?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(max_pool_size)
        .idle_timeout(None::<Duration>)
        .max_lifetime(None::<Duration>)
        .connect_with(options)
        .await
        .context("Unable to connect to database")?;

    info!("Running migrations");
    MIGRATOR
        .run(&pool)
        .await
        .context("Unable to run migrations")?;

    let repo = Arc::new(SQLxRepo::new(pool));
    Ok(Repos {
        user_repo: repo.clone(),
        category_repo: repo.clone(),
        transaction_repo: repo.clone(),
        health_check: repo,
    })
}

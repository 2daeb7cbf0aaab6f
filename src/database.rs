use std::path::Path;

use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqliteConnection, SqlitePool};
use tracing::info;

use crate::campaign;
use crate::campaign::db::CampaignStore;
use crate::error::Error;
use crate::seed;

#[async_trait]
pub trait Database: Send + Sync {
    /// Acquires one connection for the caller's exclusive use. It goes back
    /// to the pool when the session is dropped, and any transaction left
    /// open on it is rolled back.
    async fn open_session(&self) -> Result<Box<dyn Session>, Error>;

    async fn close(&self);
}

pub trait Session: Send {
    fn campaigns(&mut self) -> &mut dyn CampaignStore;
}

#[derive(Debug, Clone)]
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl SqliteDatabase {
    pub async fn connect(path: &Path, max_connections: u32) -> Result<SqliteDatabase, Error> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        Ok(SqliteDatabase { pool })
    }

    /// Ensures the schema exists and seeds an empty campaign table.
    #[tracing::instrument(skip(self))]
    pub async fn initialize(&self) -> Result<(), Error> {
        let mut session = self.acquire().await?;

        campaign::db::initialize(session.connection()).await?;
        seed::seed_if_empty(&mut session).await?;

        info!("database initialized");

        Ok(())
    }

    async fn acquire(&self) -> Result<SqliteSession, Error> {
        let conn = self.pool.acquire().await?;

        Ok(SqliteSession { conn })
    }
}

#[async_trait]
impl Database for SqliteDatabase {
    async fn open_session(&self) -> Result<Box<dyn Session>, Error> {
        Ok(Box::new(self.acquire().await?))
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

pub struct SqliteSession {
    conn: PoolConnection<Sqlite>,
}

impl SqliteSession {
    pub(crate) fn connection(&mut self) -> &mut SqliteConnection {
        &mut *self.conn
    }
}

impl Session for SqliteSession {
    fn campaigns(&mut self) -> &mut dyn CampaignStore {
        self
    }
}

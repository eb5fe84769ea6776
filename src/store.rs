//! SQLite-backed record store.
//!
//! The store only keeps connection options around. Every operation opens its
//! own connection, runs one statement (or a short existence-check, mutation,
//! re-fetch sequence) and closes the connection again before returning.

use std::{path::Path, str::FromStr};

use futures::future::BoxFuture;
use serde::Serialize;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode},
    ConnectOptions, Connection, FromRow, SqliteConnection,
};

use crate::error::AppResult;

mod quotes;
mod users;

#[derive(Clone, Debug)]
pub struct Store {
    options: SqliteConnectOptions,
}

/// Row counts reported by the status endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, FromRow)]
pub struct Stats {
    pub users: i64,
    pub quotes: i64,
    pub favorites: i64,
}

impl Store {
    pub fn new(options: SqliteConnectOptions) -> Self {
        Self {
            options: options
                .create_if_missing(true)
                .foreign_keys(true)
                .journal_mode(SqliteJournalMode::Wal),
        }
    }

    pub fn from_url(url: &str) -> AppResult<Self> {
        Ok(Self::new(SqliteConnectOptions::from_str(url)?))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self::new(SqliteConnectOptions::new().filename(path))
    }

    pub fn filename(&self) -> &Path {
        self.options.get_filename()
    }

    async fn connect(&self) -> AppResult<SqliteConnection> {
        let conn = self.options.connect().await.inspect_err(
            |e| tracing::error!(err = ?e, "an error occurred when opening database connection"),
        )?;

        Ok(conn)
    }

    /// Runs `op` on a fresh connection and closes it on every exit path.
    async fn run<T, F>(&self, op: F) -> AppResult<T>
    where
        T: Send,
        F: for<'c> FnOnce(&'c mut SqliteConnection) -> BoxFuture<'c, AppResult<T>> + Send,
    {
        let mut conn = self.connect().await?;
        let result = op(&mut conn).await;

        if let Err(e) = conn.close().await {
            tracing::warn!(err = ?e, "an error occurred when closing database connection");
        }

        result
    }

    /// Applies the embedded migrations. The migrator needs a connection it can
    /// borrow for a single lifetime, so this does not go through `run`.
    #[tracing::instrument(skip(self))]
    pub async fn migrate(&self) -> AppResult<()> {
        let mut conn = self.connect().await?;

        tracing::info!("running migrations...");
        let result = sqlx::migrate!("./migrations")
            .run(&mut conn)
            .await
            .inspect_err(|e| tracing::error!(err = ?e, "an error occurred when running migrations"));

        if let Err(e) = conn.close().await {
            tracing::warn!(err = ?e, "an error occurred when closing database connection");
        }

        result?;
        tracing::info!("finished running migrations!");

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn stats(&self) -> AppResult<Stats> {
        self.run(|conn| {
            Box::pin(async move {
                let stats = sqlx::query_as::<_, Stats>(
                    r#"
                        SELECT
                            (SELECT COUNT(*) FROM users) AS users,
                            (SELECT COUNT(*) FROM quotes) AS quotes,
                            (SELECT COUNT(*) FROM favorites) AS favorites;
                    "#,
                )
                .fetch_one(&mut *conn)
                .await
                .inspect_err(
                    |e| tracing::error!(err = ?e, "an error occurred when counting records"),
                )?;

                Ok(stats)
            })
        })
        .await
    }
}

//! Database access for the dubsite handlers.
//!
//! Handlers do not share a pool. Each invocation opens one connection through
//! [`ConnectionFactory::scoped`], does its work, and the connection is closed
//! before the handler returns, whatever the outcome.

pub mod models;
pub mod repositories;

use futures::future::BoxFuture;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::{ConnectOptions, Connection};

/// Opens per-invocation Postgres connections.
///
/// Holding a factory never touches the network; only [`connect`](Self::connect)
/// and [`scoped`](Self::scoped) do.
#[derive(Debug, Clone)]
pub struct ConnectionFactory {
    options: PgConnectOptions,
}

impl ConnectionFactory {
    /// Parse a `postgres://` URL.
    pub fn from_url(database_url: &str) -> Result<Self, sqlx::Error> {
        Ok(Self {
            options: database_url.parse()?,
        })
    }

    pub fn from_options(options: PgConnectOptions) -> Self {
        Self { options }
    }

    /// Open a connection the caller is responsible for closing.
    pub async fn connect(&self) -> Result<PgConnection, sqlx::Error> {
        self.options.connect().await
    }

    /// Run `f` with a fresh connection and close it afterwards.
    ///
    /// The connection is closed on success and on error alike. A failure to
    /// close is logged and does not override the result of `f`.
    pub async fn scoped<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: for<'c> FnOnce(&'c mut PgConnection) -> BoxFuture<'c, Result<T, E>>,
        E: From<sqlx::Error>,
    {
        let mut conn = self.connect().await?;
        tracing::debug!("Database connection opened");

        let result = f(&mut conn).await;

        match conn.close().await {
            Ok(()) => tracing::debug!("Database connection closed"),
            Err(err) => tracing::warn!(error = %err, "Failed to close database connection"),
        }

        result
    }
}

/// Run a trivial query to verify the connection is usable.
pub async fn health_check(conn: &mut PgConnection) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(conn).await?;
    Ok(())
}

/// Apply the embedded schema migrations in `crates/db/migrations`.
pub async fn run_migrations(conn: &mut PgConnection) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(conn).await
}

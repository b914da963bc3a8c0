//! Database access for the storefront.
//!
//! Wraps the SeaORM connection pool. The serving path applies pending
//! migrations on connect so a freshly provisioned database is usable
//! immediately; the migrate command opens the pool without touching the
//! schema and drives the migrator itself.

use std::time::Duration;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database as SeaDatabase, DatabaseConnection, DbErr, Statement,
};
use sea_orm_migration::MigratorTrait;

use crate::config::{Config, DB_CONNECT_TIMEOUT_SECS};

pub mod migrations;

pub use migrations::Migrator;

/// Connection pool handle shared across services and handlers
#[derive(Clone)]
pub struct Database {
    connection: DatabaseConnection,
}

impl Database {
    /// Open the pool and bring the schema up to date
    pub async fn connect(config: &Config) -> Result<Self, DbErr> {
        let db = Self::connect_without_migrations(config).await?;
        Migrator::up(&db.connection, None).await?;
        tracing::info!("database connected, schema up to date");
        Ok(db)
    }

    /// Open the pool without running migrations
    pub async fn connect_without_migrations(config: &Config) -> Result<Self, DbErr> {
        let mut options = ConnectOptions::new(config.database_url.clone());
        options
            .max_connections(config.database_max_connections)
            .connect_timeout(Duration::from_secs(DB_CONNECT_TIMEOUT_SECS))
            .sqlx_logging(false);

        let connection = SeaDatabase::connect(options).await?;
        Ok(Self { connection })
    }

    /// Borrow the underlying connection
    pub fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }

    /// Clone the underlying connection handle
    pub fn get_connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }

    /// Connectivity probe for the health endpoint
    pub async fn ping(&self) -> Result<(), DbErr> {
        let backend = self.connection.get_database_backend();
        self.connection
            .execute(Statement::from_string(backend, "SELECT 1".to_owned()))
            .await
            .map(|_| ())
    }
}

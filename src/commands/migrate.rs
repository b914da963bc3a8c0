//! Migrate command - schema management for the storefront database.

use std::collections::HashSet;

use sea_orm::{EntityTrait, QueryOrder};
use sea_orm_migration::{seaql_migrations, MigratorTrait};

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{Database, Migrator};

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    let db = Database::connect_without_migrations(&config).await?;
    let conn = db.connection();

    match args.action {
        MigrateAction::Up => {
            Migrator::up(conn, None).await?;
            tracing::info!("schema is up to date");
        }
        MigrateAction::Down => {
            Migrator::down(conn, Some(1)).await?;
            tracing::info!("rolled back one migration");
        }
        MigrateAction::Status => {
            // The bookkeeping table is absent on a database that has
            // never been migrated; treat that as nothing applied
            let applied: HashSet<String> = seaql_migrations::Entity::find()
                .order_by_asc(seaql_migrations::Column::Version)
                .all(conn)
                .await
                .map(|rows| rows.into_iter().map(|m| m.version).collect())
                .unwrap_or_default();

            for migration in Migrator::migrations() {
                let name = migration.name();
                let marker = if applied.contains(name) {
                    "applied"
                } else {
                    "pending"
                };
                println!("{name}: {marker}");
            }
        }
        MigrateAction::Fresh => {
            tracing::warn!("dropping all tables and re-running every migration");
            Migrator::fresh(conn).await?;
            tracing::info!("database reset and migrated");
        }
    }

    Ok(())
}

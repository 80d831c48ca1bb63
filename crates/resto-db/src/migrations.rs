//! # Schema Migrations
//!
//! The SQL files under `migrations/sqlite/` are compiled into the binary and
//! applied on open, oldest first. sqlx records each one in
//! `_sqlx_migrations`, so reopening an existing file applies only what is new.
//!
//! | File                     | Creates                                 |
//! |--------------------------|-----------------------------------------|
//! | `001_initial_schema.sql` | `categories`, `menu_items`, `orders`    |
//!
//! Applied files are checksummed; edit the schema by adding
//! `NNN_description.sql`, never by changing an existing file.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// How far a database is behind the embedded schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationStatus {
    pub embedded: usize,
    pub applied: usize,
}

impl MigrationStatus {
    pub fn pending(&self) -> usize {
        self.embedded.saturating_sub(self.applied)
    }
}

/// Applies every embedded migration the database has not seen yet.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    let before = migration_status(pool).await?;
    if before.pending() == 0 {
        debug!(applied = before.applied, "Schema up to date");
        return Ok(());
    }

    MIGRATOR.run(pool).await?;
    info!(applied = before.pending(), "Schema migrated");
    Ok(())
}

pub async fn migration_status(pool: &SqlitePool) -> DbResult<MigrationStatus> {
    let tracked: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = '_sqlx_migrations'",
    )
    .fetch_one(pool)
    .await?;

    let applied: i64 = if tracked == 0 {
        0
    } else {
        sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
            .fetch_one(pool)
            .await?
    };

    Ok(MigrationStatus {
        embedded: MIGRATOR.iter().count(),
        applied: usize::try_from(applied).unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_reapplying_is_a_no_op() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        run_migrations(db.pool()).await.unwrap();

        let status = migration_status(db.pool()).await.unwrap();
        assert_eq!(status.pending(), 0);
        assert!(status.embedded >= 1);
    }

    #[tokio::test]
    async fn test_fresh_database_is_behind() {
        let db = Database::new(DbConfig::in_memory().run_migrations(false))
            .await
            .unwrap();

        let status = migration_status(db.pool()).await.unwrap();
        assert_eq!(status.applied, 0);
        assert_eq!(status.pending(), status.embedded);

        db.run_migrations().await.unwrap();
        assert_eq!(migration_status(db.pool()).await.unwrap().pending(), 0);
    }
}

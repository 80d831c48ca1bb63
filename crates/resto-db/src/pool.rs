//! # Database Pool Management
//!
//! Connection pool creation, configuration and change notification.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Handle                                    │
//! │                                                                         │
//! │  Startup                                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::new(path) ← Configure pool settings                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await ← Create pool + run migrations             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────┐      ┌──────────────────────────────┐     │
//! │  │       SqlitePool        │      │  broadcast::Sender<Table>    │     │
//! │  │  Conn1  Conn2  ...      │      │  one message per write       │     │
//! │  └─────────────────────────┘      └──────────────┬───────────────┘     │
//! │                                                  │                      │
//! │  Repositories write through the pool and then    ▼                      │
//! │  announce the table they touched ──────────► LiveQuery re-queries       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! File databases use WAL journaling so live-query reads never block the
//! writer.

use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::category::CategoryRepository;
use crate::repository::menu_item::MenuItemRepository;
use crate::repository::order::OrderRepository;

/// Path value that selects a private in-memory database.
const IN_MEMORY_PATH: &str = ":memory:";

/// Buffered change notifications per subscriber before it starts lagging.
const CHANGE_CHANNEL_CAPACITY: usize = 64;

const IDLE_TIMEOUT: Duration = Duration::from_secs(600);

// =============================================================================
// Table
// =============================================================================

/// A table whose changes can be observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Categories,
    MenuItems,
    Orders,
}

impl Table {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Table::Categories => "categories",
            Table::MenuItems => "menu_items",
            Table::Orders => "orders",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// Where the data lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Storage {
    /// A SQLite file, created with its parent directories when missing.
    File(PathBuf),
    /// A private database that disappears with its connection.
    Memory,
}

/// Pool settings for a [`Database`].
///
/// ```rust,ignore
/// let config = DbConfig::new("/var/lib/resto/resto.db").max_connections(4);
/// let tests = DbConfig::in_memory();
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub storage: Storage,

    /// Upper bound on pooled connections (5). Memory storage always uses one.
    pub max_connections: u32,

    /// Connections kept open while idle (1).
    pub min_connections: u32,

    /// How long an acquire may wait for a free connection (30s).
    pub connect_timeout: Duration,

    /// Applies the embedded schema on open (true).
    pub run_migrations: bool,
}

impl DbConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let storage = if path.as_os_str() == IN_MEMORY_PATH {
            Storage::Memory
        } else {
            Storage::File(path)
        };
        DbConfig {
            storage,
            ..DbConfig::default()
        }
    }

    /// An isolated in-memory database, mostly for tests.
    pub fn in_memory() -> Self {
        DbConfig {
            storage: Storage::Memory,
            connect_timeout: Duration::from_secs(5),
            ..DbConfig::default()
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.storage == Storage::Memory
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = match &self.storage {
            Storage::Memory => SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?,
            Storage::File(path) => {
                if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                    std::fs::create_dir_all(dir).map_err(|e| {
                        DbError::ConnectionFailed(format!("{}: {}", dir.display(), e))
                    })?;
                }
                SqliteConnectOptions::new()
                    .filename(path)
                    .create_if_missing(true)
                    .journal_mode(SqliteJournalMode::Wal)
                    .synchronous(SqliteSynchronous::Normal)
            }
        };
        Ok(options.foreign_keys(true))
    }

    fn pool_options(&self) -> SqlitePoolOptions {
        let options = SqlitePoolOptions::new().acquire_timeout(self.connect_timeout);
        match self.storage {
            // Closing the last connection would drop the data
            Storage::Memory => options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None),
            Storage::File(_) => options
                .max_connections(self.max_connections)
                .min_connections(self.min_connections.min(self.max_connections))
                .idle_timeout(Some(IDLE_TIMEOUT)),
        }
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        DbConfig {
            storage: Storage::Memory,
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            run_migrations: true,
        }
    }
}

impl fmt::Display for Storage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Storage::File(path) => write!(f, "{}", path.display()),
            Storage::Memory => f.write_str(IN_MEMORY_PATH),
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Shared handle to the pool and the table change channel.
///
/// Clones share both, so one `Database` opened at startup is handed to the
/// Order Lifecycle and the command layer alike.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    changes: broadcast::Sender<Table>,
}

impl Database {
    /// Opens the pool and, unless disabled, brings the schema up to date.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(storage = %config.storage, "Opening database");

        let pool = config
            .pool_options()
            .connect_with(config.connect_options()?)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;
        debug!(size = pool.size(), "Pool ready");

        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        let db = Database { pool, changes };

        if config.run_migrations {
            db.run_migrations().await?;
        }
        Ok(db)
    }

    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Receives one [`Table`] per committed write.
    pub fn subscribe(&self) -> broadcast::Receiver<Table> {
        self.changes.subscribe()
    }

    pub fn categories(&self) -> CategoryRepository {
        CategoryRepository::new(self.pool.clone(), self.changes.clone())
    }

    pub fn menu_items(&self) -> MenuItemRepository {
        MenuItemRepository::new(self.pool.clone(), self.changes.clone())
    }

    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.pool.clone(), self.changes.clone())
    }

    /// Waits for checked-out connections and closes the pool. Later queries
    /// fail with `ConnectionFailed`.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database closed");
    }

    pub async fn health_check(&self) -> bool {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}

/// Announces a write. Having no live subscribers is not an error.
pub(crate) fn notify(changes: &broadcast::Sender<Table>, table: Table) {
    let receivers = changes.send(table).unwrap_or(0);
    debug!(table = %table, receivers, "Table changed");
}

// =============================================================================
// Unit Tests
// =============================================================================

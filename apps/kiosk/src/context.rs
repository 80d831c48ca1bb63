//! # App Context
//!
//! Everything a command needs, built once at startup and passed by
//! reference. There is no global database handle.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Application Startup                               │
//! │                                                                         │
//! │  1. KioskConfig::load ─────────────────────────────────────────────────►│
//! │     defaults → resto.toml → RESTO_* env                                 │
//! │                                                                         │
//! │  2. Connect to Database ───────────────────────────────────────────────►│
//! │     SQLite with WAL mode, run pending migrations                        │
//! │                                                                         │
//! │  3. First-run seed ────────────────────────────────────────────────────►│
//! │     only when the catalog is empty and seed_on_first_run is set         │
//! │                                                                         │
//! │  4. AppContext { db, lifecycle, cart, staff, config }                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use resto_db::{seed, Database, DbConfig, OrderLifecycle};
use tracing::info;

use crate::error::ApiResult;
use crate::state::{CartState, KioskConfig, StaffGate};

pub struct AppContext {
    db: Database,
    lifecycle: OrderLifecycle,
    cart: CartState,
    staff: StaffGate,
    config: KioskConfig,
}

impl AppContext {
    /// Opens the configured database file and applies the first-run seed.
    pub async fn open(config: KioskConfig) -> ApiResult<Self> {
        let db_path = config.resolve_database_path()?;
        info!(?db_path, "Database path determined");

        let db = Database::new(DbConfig::new(db_path)).await?;
        info!("Database connected and migrations applied");

        Self::bootstrap(db, config).await
    }

    /// Same as [`open`](Self::open) against a private in-memory database.
    pub async fn in_memory(config: KioskConfig) -> ApiResult<Self> {
        let db = Database::new(DbConfig::in_memory()).await?;
        Self::bootstrap(db, config).await
    }

    async fn bootstrap(db: Database, config: KioskConfig) -> ApiResult<Self> {
        if config.seed_on_first_run && seed::seed_if_empty(&db).await? {
            info!("Starter menu seeded");
        }
        Ok(Self::from_database(db, config))
    }

    /// Wraps an already-open database. No seeding.
    pub fn from_database(db: Database, config: KioskConfig) -> Self {
        AppContext {
            lifecycle: OrderLifecycle::new(db.clone()),
            cart: CartState::new(),
            staff: StaffGate::new(config.staff_pin.clone()),
            db,
            config,
        }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn lifecycle(&self) -> &OrderLifecycle {
        &self.lifecycle
    }

    pub fn cart(&self) -> &CartState {
        &self.cart
    }

    pub fn staff(&self) -> &StaffGate {
        &self.staff
    }

    pub fn config(&self) -> &KioskConfig {
        &self.config
    }

    /// Closes the connection pool.
    pub async fn shutdown(&self) {
        self.db.close().await;
    }
}

//! # resto-db: Database Layer for Resto
//!
//! This crate provides persistence for the Resto ordering system: the
//! Catalog Store (categories, menu items), the Order Store, live queries
//! over both, and the Order Lifecycle that turns a cart into an order.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Resto Data Flow                                │
//! │                                                                         │
//! │  Kiosk command (place_order, list_orders, ...)                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     resto-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────────┐   ┌───────────────┐   ┌──────────────┐     │   │
//! │  │   │ OrderLifecycle│──►│  Repositories │   │  Migrations  │     │   │
//! │  │   │ (lifecycle.rs)│   │ category.rs   │   │  (embedded)  │     │   │
//! │  │   └──────────────┘   │ menu_item.rs  │   │ 001_init.sql │     │   │
//! │  │                      │ order.rs      │   └──────────────┘     │   │
//! │  │   ┌──────────────┐   └───────┬───────┘                         │   │
//! │  │   │  LiveQuery   │◄── Table ─┘ change notifications            │   │
//! │  │   │  (live.rs)   │    (broadcast)                              │   │
//! │  │   └──────────────┘                                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   <config dir>/resto.db                                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool, change notifications, repository access
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Catalog and order repositories
//! - [`live`] - Live queries that re-emit on table changes
//! - [`lifecycle`] - Order placement and status transitions
//! - [`seed`] - First-run catalog
//!
//! ## Usage
//!
//! ```rust,ignore
//! use resto_db::{Database, DbConfig, OrderLifecycle};
//!
//! let db = Database::new(DbConfig::new("resto.db")).await?;
//! let lifecycle = OrderLifecycle::new(db.clone());
//!
//! let id = lifecycle.place_order("Alice", &cart.order_lines(), cart.grand_total()).await?;
//! lifecycle.advance(id, OrderAction::Accept).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod lifecycle;
pub mod live;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod seed;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use lifecycle::OrderLifecycle;
pub use live::{LiveQuery, LiveSource};
pub use pool::{Database, DbConfig, Storage, Table};

// Repository re-exports for convenience
pub use repository::category::CategoryRepository;
pub use repository::menu_item::MenuItemRepository;
pub use repository::order::OrderRepository;

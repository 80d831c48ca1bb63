//! # Repository Module
//!
//! Database repository implementations for Resto.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Kiosk command / OrderLifecycle                                         │
//! │       │                                                                 │
//! │       │  db.orders().list_by_status(OrderStatus::Pending)               │
//! │       ▼                                                                 │
//! │  OrderRepository                                                        │
//! │  ├── insert / update_status / delete_by_statuses   (writes → notify)    │
//! │  ├── get_by_id / list_by_status / list_by_statuses (reads)              │
//! │  └── watch_by_status / watch_by_statuses           (live reads)         │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! │                                                                         │
//! │  Every successful write announces its table on the change channel so    │
//! │  live queries over that table re-query.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CategoryRepository`](category::CategoryRepository) - Category CRUD
//! - [`MenuItemRepository`](menu_item::MenuItemRepository) - Menu item CRUD and stock flags
//! - [`OrderRepository`](order::OrderRepository) - Orders by status, transitions, bulk clear
//!
//! Money columns are `REAL` major units; rows are read into `*Row` structs
//! and converted to domain types with [`Money::from_major_f64`](resto_core::Money::from_major_f64).

pub mod category;
pub mod menu_item;
pub mod order;

//! # Commands Module
//!
//! Every operation the presentation layer (the `resto` CLI today) can
//! invoke. Each command takes the [`AppContext`](crate::AppContext), does
//! one thing and returns an owned, serializable result or an
//! [`ApiError`](crate::error::ApiError).
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── menu.rs     ◄─── Customer menu (grouped by category, live)
//! ├── cart.rs     ◄─── Cart manipulation
//! ├── order.rs    ◄─── Place order, staff order dashboard
//! └── catalog.rs  ◄─── Staff menu + category management
//! ```
//!
//! ## Who May Call What
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Customer (no PIN)              Staff (StaffGate unlocked)              │
//! │  ─────────────────              ──────────────────────────              │
//! │  menu::get_menu                 order::list_orders / watch_orders       │
//! │  cart::*                        order::accept / reject / complete       │
//! │  order::place_order             order::clear_orders                     │
//! │                                 catalog::*                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cart;
pub mod catalog;
pub mod menu;
pub mod order;

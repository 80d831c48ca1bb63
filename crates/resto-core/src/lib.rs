//! # resto-core: Pure Business Logic for Resto
//!
//! This crate is the **heart** of Resto, a single-device restaurant
//! ordering system. It contains the cart pricing model and the order
//! lifecycle rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Resto Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Kiosk (commands + `resto` CLI)                  │   │
//! │  │    menu ──► cart ──► place order ──► staff dashboard            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ resto-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │   order   │  │   │
//! │  │   │ MenuItem  │  │   Money   │  │   Cart    │  │  Status   │  │   │
//! │  │   │ Category  │  │           │  │ CartLine  │  │ Snapshot  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 resto-db (Database Layer)                       │   │
//! │  │     SQLite repositories, live queries, Order Lifecycle          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (MenuItem, Category, Order)
//! - [`money`] - Money type with integer arithmetic
//! - [`cart`] - The Cart Engine: lines, quantities, derived totals
//! - [`order`] - Order status machine and the cart snapshot format
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use resto_core::{Cart, MenuItem, Money};
//!
//! let tikka = MenuItem::new(1, "Paneer Tikka", Money::from_cents(25_000), "Starters")
//!     .with_parcel_charge(Money::from_cents(500));
//!
//! let mut cart = Cart::new();
//! let line = cart.add_item(&tikka);
//! cart.set_takeaway_quantity(line, 2);
//!
//! // 250 × (1 + 2) + 5 × 2
//! assert_eq!(cart.subtotal(), Money::from_cents(75_000));
//! assert_eq!(cart.parcel_charges(), Money::from_cents(1_000));
//! assert_eq!(cart.grand_total(), Money::from_cents(76_000));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod order;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLine, CartSnapshot, LineHandle};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use order::{NewOrder, Order, OrderAction, OrderLine, OrderStatus};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a customer name on an order.
pub const MAX_CUSTOMER_NAME_LEN: usize = 100;

/// Maximum length of a menu item or category name.
pub const MAX_NAME_LEN: usize = 200;

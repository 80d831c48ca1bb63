//! # Order Lifecycle
//!
//! Turns a cart into a persisted order and moves orders through the
//! status machine.
//!
//! ## Placement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  place_order("Alice", lines, total)                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  NewOrder::prepare     blank name / no lines → ValidationError          │
//! │       │                snapshot JSON, created_at = now, Pending         │
//! │       ▼                                                                 │
//! │  orders().insert       one INSERT: snapshot + total together            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Ok(order_id)          only after SQLite acknowledged the row           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Failures are reported, never retried: this is a local database.

use resto_core::order::compute_total;
use resto_core::{Money, NewOrder, Order, OrderAction, OrderLine, OrderStatus};
use tracing::{info, instrument, warn};

use crate::error::DbResult;
use crate::pool::Database;

/// Order placement and status transitions over a [`Database`].
///
/// Constructed once at startup with the shared database handle.
#[derive(Debug, Clone)]
pub struct OrderLifecycle {
    db: Database,
}

impl OrderLifecycle {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Places an order and returns its generated id.
    ///
    /// `total` is stored as given. It is expected to be the cart's grand
    /// total; a different value is logged.
    #[instrument(skip(self, lines), fields(lines = lines.len()))]
    pub async fn place_order(
        &self,
        customer_name: &str,
        lines: &[OrderLine],
        total: Money,
    ) -> DbResult<i64> {
        let order = NewOrder::prepare(customer_name, lines, total)?;

        let expected = compute_total(lines);
        if expected != total {
            warn!(given = %total, expected = %expected, "Order total differs from cart lines");
        }

        let id = self.db.orders().insert(&order).await?;
        info!(order_id = id, total = %total, "Order placed");
        Ok(id)
    }

    /// Moves an order to `new_status`, enforcing the transition table.
    pub async fn update_status(&self, order_id: i64, new_status: OrderStatus) -> DbResult<Order> {
        self.db.orders().update_status(order_id, new_status).await
    }

    /// Applies a staff action (accept, reject, complete).
    pub async fn advance(&self, order_id: i64, action: OrderAction) -> DbResult<Order> {
        info!(order_id, action = %action, "Applying order action");
        self.update_status(order_id, action.target_status()).await
    }

    /// Deletes every order in the given terminal statuses; returns how many
    /// went. Pending or Accepted in `statuses` is a validation error.
    pub async fn clear_by_status(&self, statuses: &[OrderStatus]) -> DbResult<u64> {
        self.db.orders().delete_by_statuses(statuses).await
    }

    /// Deletes all Completed and Rejected orders.
    pub async fn clear_terminal(&self) -> DbResult<u64> {
        self.clear_by_status(&OrderStatus::TERMINAL).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Order Commands
//!
//! Placing the cart as an order (customer side) and the staff order
//! dashboard.
//!
//! ## Place Order Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Place Order Flow                                     │
//! │                                                                         │
//! │  place_order("Alice")                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌───────────────────────┐                                              │
//! │  │ Copy lines + total    │  cart lock held only for the copy            │
//! │  │ out of CartState      │                                              │
//! │  └───────────────────────┘                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌───────────────────────┐  blank name / empty cart ──► VALIDATION     │
//! │  │ OrderLifecycle::      │  SQLite failure ───────────► STORAGE        │
//! │  │   place_order         │  (cart left as it was)                       │
//! │  └───────────────────────┘                                              │
//! │       │ Ok(order_id), row acknowledged                                  │
//! │       ▼                                                                 │
//! │  ┌───────────────────────┐                                              │
//! │  │ Remove placed lines   │  lines added or edited meanwhile stay        │
//! │  └───────────────────────┘                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PlacedOrder { order_id, total }                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Staff Dashboard
//! Pending orders offer Accept / Reject, Accepted orders offer Complete.
//! Completed and Rejected orders can only be cleared.

use resto_core::money;
use resto_core::{Money, Order, OrderAction, OrderLine, OrderStatus};
use resto_db::repository::order::Orders;
use resto_db::LiveQuery;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::context::AppContext;
use crate::error::{ApiError, ApiResult};

// =============================================================================
// Response Types
// =============================================================================

/// Acknowledgement of a placed order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedOrder {
    pub order_id: i64,
    pub customer_name: String,
    #[serde(with = "money::as_decimal")]
    pub total: Money,
}

/// An order as the dashboard shows it: snapshot decoded, actions listed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: i64,
    pub customer_name: String,
    pub lines: Vec<OrderLine>,
    #[serde(with = "money::as_decimal")]
    pub total: Money,
    pub status: OrderStatus,
    /// Epoch milliseconds.
    pub created_at: i64,
    pub actions: Vec<OrderAction>,
}

impl TryFrom<Order> for OrderView {
    type Error = ApiError;

    fn try_from(order: Order) -> Result<Self, Self::Error> {
        let lines = order.lines()?;
        Ok(OrderView {
            actions: order.status.available_actions().to_vec(),
            id: order.id,
            customer_name: order.customer_name,
            lines,
            total: order.total,
            status: order.status,
            created_at: order.created_at,
        })
    }
}

/// Decodes a batch of orders for display.
pub fn to_views(orders: Vec<Order>) -> ApiResult<Vec<OrderView>> {
    orders.into_iter().map(OrderView::try_from).collect()
}

// =============================================================================
// Customer
// =============================================================================

/// Places the current cart as an order for `customer_name`.
///
/// The stored total is the cart's grand total. The placed lines leave the
/// cart only after the order row is acknowledged; on any error the cart is
/// left untouched so the customer can fix the name and retry. Lines added
/// or edited while the insert was in flight are not part of the order and
/// stay in the cart.
pub async fn place_order(ctx: &AppContext, customer_name: &str) -> ApiResult<PlacedOrder> {
    debug!("place_order command");

    let (cart_id, placed, lines, total) = ctx
        .cart()
        .with_cart(|c| (c.id(), c.lines().to_vec(), c.order_lines(), c.grand_total()));

    let order_id = ctx
        .lifecycle()
        .place_order(customer_name, &lines, total)
        .await?;

    let removed = ctx.cart().with_cart_mut(|c| c.remove_placed(&placed));
    if removed < placed.len() {
        warn!(order_id, %cart_id, kept = placed.len() - removed, "Cart changed while placing");
    }
    info!(order_id, %cart_id, "Cart placed as order");

    Ok(PlacedOrder {
        order_id,
        customer_name: customer_name.trim().to_string(),
        total,
    })
}

// =============================================================================
// Staff Dashboard
// =============================================================================

/// Lists orders, newest first. An empty `statuses` means every order.
pub async fn list_orders(ctx: &AppContext, statuses: &[OrderStatus]) -> ApiResult<Vec<OrderView>> {
    debug!(?statuses, "list_orders command");
    ctx.staff().require()?;

    let orders = ctx.db().orders();
    let found = if statuses.is_empty() {
        orders.list_all().await?
    } else {
        orders.list_by_statuses(statuses).await?
    };
    to_views(found)
}

pub async fn get_order(ctx: &AppContext, id: i64) -> ApiResult<OrderView> {
    debug!(id, "get_order command");
    ctx.staff().require()?;

    let order = ctx
        .db()
        .orders()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Order", id))?;
    OrderView::try_from(order)
}

/// Applies a staff action to an order.
///
/// ## Errors
/// - `NOT_FOUND` - The order was cleared in the meantime
/// - `ILLEGAL_TRANSITION` - The action is not offered for the current status
pub async fn advance_order(ctx: &AppContext, id: i64, action: OrderAction) -> ApiResult<OrderView> {
    debug!(id, %action, "advance_order command");
    ctx.staff().require()?;

    let order = ctx.lifecycle().advance(id, action).await?;
    OrderView::try_from(order)
}

pub async fn accept_order(ctx: &AppContext, id: i64) -> ApiResult<OrderView> {
    advance_order(ctx, id, OrderAction::Accept).await
}

pub async fn reject_order(ctx: &AppContext, id: i64) -> ApiResult<OrderView> {
    advance_order(ctx, id, OrderAction::Reject).await
}

pub async fn complete_order(ctx: &AppContext, id: i64) -> ApiResult<OrderView> {
    advance_order(ctx, id, OrderAction::Complete).await
}

/// Deletes every order in the given terminal statuses.
///
/// ## Errors
/// - `VALIDATION_ERROR` - No status given, or a Pending/Accepted status
pub async fn clear_orders(ctx: &AppContext, statuses: &[OrderStatus]) -> ApiResult<u64> {
    debug!(?statuses, "clear_orders command");
    ctx.staff().require()?;

    if statuses.is_empty() {
        return Err(ApiError::validation("At least one status is required"));
    }
    if let Some(active) = statuses.iter().find(|s| !s.is_terminal()) {
        return Err(ApiError::validation(format!(
            "Only Completed or Rejected orders can be cleared, not {}",
            active
        )));
    }

    let removed = ctx.lifecycle().clear_by_status(statuses).await?;
    info!(removed, ?statuses, "Orders cleared");
    Ok(removed)
}

/// Live order list; an empty `statuses` watches every order.
pub fn watch_orders(ctx: &AppContext, statuses: &[OrderStatus]) -> ApiResult<LiveQuery<Orders>> {
    debug!(?statuses, "watch_orders command");
    ctx.staff().require()?;

    let orders = ctx.db().orders();
    Ok(if statuses.is_empty() {
        orders.watch_all()
    } else {
        orders.watch_by_statuses(statuses)
    })
}

//! # Cart Commands
//!
//! Commands for cart manipulation. Every command returns the new
//! [`CartSnapshot`]; nothing hands out a reference into the live cart.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Confirm  │────►│  Order   │       │
//! │  │  Cart    │     │          │     │  (name)  │     │ Pending  │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │       ▲                │                                 │              │
//! │       │           add_to_cart                       place_order         │
//! │       │           set_dine_in / set_takeaway        (order.rs)          │
//! │       │           set_instructions                       │              │
//! │       │           remove_from_cart                       │              │
//! │       │                │                                 │              │
//! │       └──── clear_cart ┘◄──── cleared after insert ack ──┘              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Quantities are clamped, never rejected: `-5` becomes `0`. A line with
//! both quantities at zero stays in the cart until removed.

use resto_core::{CartSnapshot, LineHandle};
use serde::Serialize;
use tracing::debug;

use crate::context::AppContext;
use crate::error::{ApiError, ApiResult};

/// Result of adding an item: the line it landed on plus the new cart.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartResponse {
    pub handle: LineHandle,
    pub cart: CartSnapshot,
}

/// Gets the current cart contents and totals.
pub fn get_cart(ctx: &AppContext) -> CartSnapshot {
    debug!("get_cart command");
    ctx.cart().snapshot()
}

/// Adds one dine-in unit of a menu item.
///
/// ## Behavior
/// - Item already in cart: its dine-in quantity goes up by one
/// - Item not in cart: new line, dine-in 1, takeaway 0
/// - The line keeps a copy of the item as it was when first added
///
/// ## Errors
/// - `NOT_FOUND` - No menu item with this id
/// - `VALIDATION_ERROR` - The item is out of stock
pub async fn add_to_cart(ctx: &AppContext, menu_item_id: i64) -> ApiResult<AddToCartResponse> {
    debug!(menu_item_id, "add_to_cart command");

    let item = ctx
        .db()
        .menu_items()
        .get_by_id(menu_item_id)
        .await?
        .ok_or_else(|| ApiError::not_found("MenuItem", menu_item_id))?;

    if !item.in_stock {
        return Err(ApiError::validation(format!("{} is out of stock", item.name)));
    }

    let (handle, cart) = ctx.cart().with_cart_mut(|c| {
        let handle = c.add_item(&item);
        (handle, c.snapshot())
    });

    Ok(AddToCartResponse { handle, cart })
}

/// Removes a line. Removing a line that is already gone is a no-op.
pub fn remove_from_cart(ctx: &AppContext, handle: LineHandle) -> CartSnapshot {
    debug!(%handle, "remove_from_cart command");

    ctx.cart().with_cart_mut(|c| {
        if !c.remove_item(handle) {
            debug!(%handle, "Line already gone");
        }
        c.snapshot()
    })
}

/// Sets the dine-in quantity (negative values become zero).
pub fn set_dine_in_quantity(
    ctx: &AppContext,
    handle: LineHandle,
    quantity: i64,
) -> ApiResult<CartSnapshot> {
    debug!(%handle, quantity, "set_dine_in_quantity command");

    ctx.cart().with_cart_mut(|c| {
        if !c.set_dine_in_quantity(handle, quantity) {
            return Err(ApiError::stale_line(handle));
        }
        Ok(c.snapshot())
    })
}

/// Sets the takeaway quantity (negative values become zero).
///
/// ## Errors
/// - `VALIDATION_ERROR` - A positive quantity for an item the kitchen
///   does not pack for takeaway
pub fn set_takeaway_quantity(
    ctx: &AppContext,
    handle: LineHandle,
    quantity: i64,
) -> ApiResult<CartSnapshot> {
    debug!(%handle, quantity, "set_takeaway_quantity command");

    ctx.cart().with_cart_mut(|c| {
        let line = c.line(handle).ok_or_else(|| ApiError::stale_line(handle))?;
        if quantity > 0 && !line.menu_item.takeaway_available {
            return Err(ApiError::validation(format!(
                "{} is not available for takeaway",
                line.menu_item.name
            )));
        }

        c.set_takeaway_quantity(handle, quantity);
        Ok(c.snapshot())
    })
}

/// Replaces the line's free-text instructions verbatim.
pub fn set_instructions(
    ctx: &AppContext,
    handle: LineHandle,
    instructions: &str,
) -> ApiResult<CartSnapshot> {
    debug!(%handle, "set_instructions command");

    ctx.cart().with_cart_mut(|c| {
        if !c.set_instructions(handle, instructions) {
            return Err(ApiError::stale_line(handle));
        }
        Ok(c.snapshot())
    })
}

/// Clears all lines from the cart.
pub fn clear_cart(ctx: &AppContext) -> CartSnapshot {
    debug!("clear_cart command");

    ctx.cart().with_cart_mut(|c| {
        c.clear();
        c.snapshot()
    })
}

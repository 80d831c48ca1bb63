//! # Cart Engine
//!
//! One customer's working set of cart lines plus the derived totals.
//!
//! ## Pricing Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  For every line:                                                        │
//! │                                                                         │
//! │    units          = dine_in_quantity + takeaway_quantity                │
//! │    line subtotal  = menu_item.price × units                             │
//! │    line parcel    = menu_item.parcel_charge × takeaway_quantity         │
//! │                                                                         │
//! │  Cart:                                                                  │
//! │    subtotal       = Σ line subtotal                                     │
//! │    parcel_charges = Σ line parcel     (takeaway units only)             │
//! │    grand_total    = subtotal + parcel_charges                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Line Handles
//! Lines are addressed by an opaque [`LineHandle`] issued by
//! [`Cart::add_item`], never by position. A handle stays valid until its
//! line is removed or the cart is cleared; operations on a stale handle
//! are no-ops that report `false`.
//!
//! ## Quantities
//! Quantity setters never fail. Negative inputs are stored as zero, and a
//! line whose quantities are both zero stays in the cart until it is
//! removed explicitly.
//!
//! The cart itself is single-owner (`&mut self` for every mutation). The
//! kiosk wraps it in a mutex and publishes a [`CartSnapshot`] after each
//! change.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::{self, Money};
use crate::order::OrderLine;
use crate::types::MenuItem;

// =============================================================================
// Line Handle
// =============================================================================

/// Opaque identity of one line within one cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineHandle(u64);

impl LineHandle {
    #[inline]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl From<u64> for LineHandle {
    fn from(value: u64) -> Self {
        LineHandle(value)
    }
}

impl std::fmt::Display for LineHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// Cart Line
// =============================================================================

/// One menu item's quantities and instructions within a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
    pub handle: LineHandle,
    /// Copy of the catalog entry taken when the line was created.
    pub menu_item: MenuItem,
    pub dine_in_quantity: u32,
    pub takeaway_quantity: u32,
    pub instructions: String,
}

impl CartLine {
    /// Total units across both dining modes.
    #[inline]
    pub fn units(&self) -> u32 {
        self.dine_in_quantity.saturating_add(self.takeaway_quantity)
    }

    #[inline]
    pub fn subtotal(&self) -> Money {
        self.menu_item.price.multiply_quantity(self.units())
    }

    #[inline]
    pub fn parcel_charges(&self) -> Money {
        self.menu_item
            .parcel_charge
            .multiply_quantity(self.takeaway_quantity)
    }

    #[inline]
    pub fn total(&self) -> Money {
        self.subtotal() + self.parcel_charges()
    }

    /// The snapshot element stored with an order.
    pub fn to_order_line(&self) -> OrderLine {
        OrderLine {
            menu_item: self.menu_item.clone(),
            dine_in_quantity: self.dine_in_quantity,
            takeaway_quantity: self.takeaway_quantity,
            instructions: self.instructions.clone(),
        }
    }
}

/// `max(0, value)`, saturating at `u32::MAX`.
fn clamp_quantity(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

// =============================================================================
// Cart
// =============================================================================

/// An in-progress customer cart.
#[derive(Debug, Clone)]
pub struct Cart {
    /// Session identifier, used to correlate log lines.
    id: Uuid,
    lines: Vec<CartLine>,
    next_handle: u64,
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

impl Cart {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            lines: Vec::new(),
            next_handle: 1,
        }
    }

    #[inline]
    pub fn id(&self) -> Uuid {
        self.id
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Adds one dine-in unit of `item`.
    ///
    /// If the cart already has a line for this menu item id, its dine-in
    /// quantity goes up by one and that
    /// line's handle is returned. Otherwise a new line is created with
    /// dine-in 1, takeaway 0 and empty instructions.
    pub fn add_item(&mut self, item: &MenuItem) -> LineHandle {
        if let Some(line) = self.lines.iter_mut().find(|l| l.menu_item.id == item.id) {
            line.dine_in_quantity = line.dine_in_quantity.saturating_add(1);
            return line.handle;
        }

        let handle = LineHandle(self.next_handle);
        self.next_handle += 1;
        self.lines.push(CartLine {
            handle,
            menu_item: item.clone(),
            dine_in_quantity: 1,
            takeaway_quantity: 0,
            instructions: String::new(),
        });
        handle
    }

    /// Removes a line. Returns `false` if the handle is unknown.
    pub fn remove_item(&mut self, handle: LineHandle) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.handle != handle);
        self.lines.len() != before
    }

    /// Replaces the dine-in quantity with `max(0, value)`.
    pub fn set_dine_in_quantity(&mut self, handle: LineHandle, value: i64) -> bool {
        match self.line_mut(handle) {
            Some(line) => {
                line.dine_in_quantity = clamp_quantity(value);
                true
            }
            None => false,
        }
    }

    /// Replaces the takeaway quantity with `max(0, value)`.
    pub fn set_takeaway_quantity(&mut self, handle: LineHandle, value: i64) -> bool {
        match self.line_mut(handle) {
            Some(line) => {
                line.takeaway_quantity = clamp_quantity(value);
                true
            }
            None => false,
        }
    }

    /// Replaces the free-text instructions verbatim.
    pub fn set_instructions(&mut self, handle: LineHandle, text: impl Into<String>) -> bool {
        match self.line_mut(handle) {
            Some(line) => {
                line.instructions = text.into();
                true
            }
            None => false,
        }
    }

    /// Empties the cart. Handles issued earlier become stale.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Removes the lines that still match `placed` exactly.
    ///
    /// Lines added or edited since `placed` was copied stay in the cart.
    /// Returns how many lines were removed.
    pub fn remove_placed(&mut self, placed: &[CartLine]) -> usize {
        let before = self.lines.len();
        self.lines.retain(|line| !placed.contains(line));
        before - self.lines.len()
    }

    fn line_mut(&mut self, handle: LineHandle) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| l.handle == handle)
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn line(&self, handle: LineHandle) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.handle == handle)
    }

    /// Finds the line holding a given menu item, if any.
    pub fn line_for_item(&self, menu_item_id: i64) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.menu_item.id == menu_item_id)
    }

    /// Lines in insertion order.
    #[inline]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    pub fn parcel_charges(&self) -> Money {
        self.lines.iter().map(CartLine::parcel_charges).sum()
    }

    pub fn grand_total(&self) -> Money {
        self.subtotal() + self.parcel_charges()
    }

    /// Lines in the order snapshot format.
    pub fn order_lines(&self) -> Vec<OrderLine> {
        self.lines.iter().map(CartLine::to_order_line).collect()
    }

    /// An immutable copy of the current state with totals precomputed.
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            cart_id: self.id,
            lines: self.lines.clone(),
            subtotal: self.subtotal(),
            parcel_charges: self.parcel_charges(),
            grand_total: self.grand_total(),
        }
    }
}

// =============================================================================
// Cart Snapshot
// =============================================================================

/// Point-in-time view of a cart handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartSnapshot {
    pub cart_id: Uuid,
    pub lines: Vec<CartLine>,
    #[serde(with = "money::as_decimal")]
    pub subtotal: Money,
    #[serde(with = "money::as_decimal")]
    pub parcel_charges: Money,
    #[serde(with = "money::as_decimal")]
    pub grand_total: Money,
}

impl CartSnapshot {
    /// Snapshot of an empty cart.
    pub fn empty(cart_id: Uuid) -> Self {
        Self {
            cart_id,
            lines: Vec::new(),
            subtotal: Money::zero(),
            parcel_charges: Money::zero(),
            grand_total: Money::zero(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn tikka() -> MenuItem {
        MenuItem::new(1, "Paneer Tikka", Money::from_cents(25_000), "Starters")
            .with_parcel_charge(Money::from_cents(500))
    }

    fn chai() -> MenuItem {
        MenuItem::new(12, "Masala Chai", Money::from_cents(5_000), "Beverages")
    }

    #[test]
    fn test_add_item_creates_line() {
        let mut cart = Cart::new();
        let handle = cart.add_item(&tikka());

        let line = cart.line(handle).unwrap();
        assert_eq!(line.dine_in_quantity, 1);
        assert_eq!(line.takeaway_quantity, 0);
        assert!(line.instructions.is_empty());
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_add_same_item_increments_dine_in() {
        let mut cart = Cart::new();
        let first = cart.add_item(&tikka());
        let second = cart.add_item(&tikka());
        cart.add_item(&chai());
        cart.add_item(&tikka());

        assert_eq!(first, second);
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.line(first).unwrap().dine_in_quantity, 3);
        assert_eq!(cart.line_for_item(12).unwrap().dine_in_quantity, 1);
    }

    #[test]
    fn test_add_item_counts_per_distinct_item() {
        let items: Vec<MenuItem> = (1..=5)
            .map(|id| MenuItem::new(id, format!("Dish {id}"), Money::from_cents(100), "Main Course"))
            .collect();

        let mut cart = Cart::new();
        // Item k is added k times, interleaved
        for round in 1..=5 {
            for item in items.iter().filter(|i| i.id >= round) {
                cart.add_item(item);
            }
        }

        assert_eq!(cart.len(), 5);
        for item in &items {
            let line = cart.line_for_item(item.id).unwrap();
            assert_eq!(line.dine_in_quantity as i64, item.id);
        }
    }

    #[test]
    fn test_add_item_has_no_upper_limit() {
        let mut cart = Cart::new();
        let handle = cart.add_item(&chai());
        for _ in 1..1_500 {
            cart.add_item(&chai());
        }
        assert_eq!(cart.line(handle).unwrap().dine_in_quantity, 1_500);

        cart.set_dine_in_quantity(handle, i64::from(u32::MAX));
        cart.add_item(&chai());
        assert_eq!(cart.line(handle).unwrap().dine_in_quantity, u32::MAX);
    }

    #[test]
    fn test_quantities_clamp() {
        let mut cart = Cart::new();
        let handle = cart.add_item(&tikka());

        assert!(cart.set_dine_in_quantity(handle, -5));
        assert_eq!(cart.line(handle).unwrap().dine_in_quantity, 0);

        assert!(cart.set_takeaway_quantity(handle, -1));
        assert_eq!(cart.line(handle).unwrap().takeaway_quantity, 0);

        cart.set_dine_in_quantity(handle, 5_000);
        assert_eq!(cart.line(handle).unwrap().dine_in_quantity, 5_000);

        cart.set_takeaway_quantity(handle, i64::MAX);
        assert_eq!(cart.line(handle).unwrap().takeaway_quantity, u32::MAX);
    }

    #[test]
    fn test_zero_quantity_line_is_kept() {
        let mut cart = Cart::new();
        let handle = cart.add_item(&tikka());
        cart.set_dine_in_quantity(handle, 0);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.grand_total(), Money::zero());

        // Recoverable without re-adding
        cart.set_dine_in_quantity(handle, 2);
        assert_eq!(cart.subtotal(), Money::from_cents(50_000));
    }

    #[test]
    fn test_stale_handle_is_noop() {
        let mut cart = Cart::new();
        let handle = cart.add_item(&tikka());
        assert!(cart.remove_item(handle));
        assert!(!cart.remove_item(handle));

        assert!(!cart.set_dine_in_quantity(handle, 3));
        assert!(!cart.set_takeaway_quantity(handle, 3));
        assert!(!cart.set_instructions(handle, "extra spicy"));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_placed_keeps_later_changes() {
        let mut cart = Cart::new();
        let tikka_handle = cart.add_item(&tikka());
        let chai_handle = cart.add_item(&chai());
        let placed = cart.lines().to_vec();

        // Edited and newly added lines survive
        cart.set_takeaway_quantity(chai_handle, 1);
        let coke = MenuItem::new(10, "Coke", Money::from_cents(4_000), "Beverages");
        let coke_handle = cart.add_item(&coke);

        assert_eq!(cart.remove_placed(&placed), 1);
        assert!(cart.line(tikka_handle).is_none());
        assert_eq!(cart.line(chai_handle).unwrap().takeaway_quantity, 1);
        assert!(cart.line(coke_handle).is_some());

        assert_eq!(cart.remove_placed(&placed), 0);
    }

    #[test]
    fn test_handles_not_reused_after_remove() {
        let mut cart = Cart::new();
        let first = cart.add_item(&tikka());
        cart.remove_item(first);
        let second = cart.add_item(&tikka());
        assert_ne!(first, second);
    }

    #[test]
    fn test_set_instructions_verbatim() {
        let mut cart = Cart::new();
        let handle = cart.add_item(&chai());
        cart.set_instructions(handle, "  less sugar, no ginger ");
        assert_eq!(cart.line(handle).unwrap().instructions, "  less sugar, no ginger ");
    }

    #[test]
    fn test_pricing_example() {
        // price 250, parcel 5, dine-in 1, takeaway 2
        let mut cart = Cart::new();
        let handle = cart.add_item(&tikka());
        cart.set_takeaway_quantity(handle, 2);

        assert_eq!(cart.subtotal(), Money::from_cents(75_000));
        assert_eq!(cart.parcel_charges(), Money::from_cents(1_000));
        assert_eq!(cart.grand_total(), Money::from_cents(76_000));
    }

    #[test]
    fn test_parcel_charges_ignore_dine_in() {
        let mut cart = Cart::new();
        let handle = cart.add_item(&tikka());
        cart.set_dine_in_quantity(handle, 10);
        assert!(cart.parcel_charges().is_zero());

        cart.set_takeaway_quantity(handle, 1);
        assert_eq!(cart.parcel_charges(), Money::from_cents(500));
        assert_eq!(cart.grand_total(), cart.subtotal() + cart.parcel_charges());
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        let handle = cart.add_item(&tikka());
        cart.add_item(&chai());
        cart.clear();

        assert!(cart.is_empty());
        assert!(cart.line(handle).is_none());
        assert!(cart.grand_total().is_zero());
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut cart = Cart::new();
        let handle = cart.add_item(&tikka());
        let snapshot = cart.snapshot();

        cart.set_dine_in_quantity(handle, 4);

        assert_eq!(snapshot.lines[0].dine_in_quantity, 1);
        assert_eq!(snapshot.grand_total, Money::from_cents(25_000));
        assert_eq!(snapshot.cart_id, cart.id());
    }

    #[test]
    fn test_order_lines_copy_quantities() {
        let mut cart = Cart::new();
        let handle = cart.add_item(&tikka());
        cart.set_takeaway_quantity(handle, 2);
        cart.set_instructions(handle, "no onion");

        let lines = cart.order_lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].menu_item.id, 1);
        assert_eq!(lines[0].dine_in_quantity, 1);
        assert_eq!(lines[0].takeaway_quantity, 2);
        assert_eq!(lines[0].instructions, "no onion");
    }
}

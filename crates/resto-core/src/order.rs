//! # Order Module
//!
//! The order status machine and the snapshot format that freezes a cart
//! into an order.
//!
//! ## Status Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │               accept               complete                             │
//! │   ┌─────────┐ ──────► ┌──────────┐ ──────► ┌───────────┐                │
//! │   │ Pending │         │ Accepted │         │ Completed │ (terminal)     │
//! │   └─────────┘         └──────────┘         └───────────┘                │
//! │        │                                                                │
//! │        │ reject       ┌──────────┐                                      │
//! │        └────────────► │ Rejected │ (terminal)                           │
//! │                       └──────────┘                                      │
//! │                                                                         │
//! │   Anything else is an IllegalTransition.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Format
//! The `items` column of an order is a JSON array of [`OrderLine`]:
//!
//! ```json
//! [{"menuItem":{"id":1,"name":"Paneer Tikka","description":"...","price":250.0,
//!   "category":"Starters","in_stock":true,"takeaway_available":true,
//!   "parcel_charge":5.0},
//!   "dineInQuantity":1,"takeawayQuantity":2,"instructions":"no onion"}]
//! ```
//!
//! The snapshot is written once at placement. It is decoded later for
//! display only; the stored total is never recomputed from it.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};
use crate::money::{self, Money};
use crate::types::MenuItem;
use crate::validation::{validate_amount, validate_customer_name, validate_order_lines};

// =============================================================================
// Order Status
// =============================================================================

/// The status of an order.
///
/// Stored as the exact strings `"Pending"`, `"Accepted"`, `"Completed"`,
/// `"Rejected"`; parsing is case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Placed by a customer, waiting for staff.
    Pending,
    /// Accepted by staff, being prepared.
    Accepted,
    /// Served. Terminal.
    Completed,
    /// Declined by staff. Terminal.
    Rejected,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Accepted,
        OrderStatus::Completed,
        OrderStatus::Rejected,
    ];

    pub const TERMINAL: [OrderStatus; 2] = [OrderStatus::Completed, OrderStatus::Rejected];

    /// The stored string form.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Accepted => "Accepted",
            OrderStatus::Completed => "Completed",
            OrderStatus::Rejected => "Rejected",
        }
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Rejected)
    }

    /// The transition table.
    ///
    /// ```rust
    /// use resto_core::OrderStatus::*;
    ///
    /// assert!(Pending.can_transition(Accepted));
    /// assert!(Pending.can_transition(Rejected));
    /// assert!(Accepted.can_transition(Completed));
    ///
    /// assert!(!Pending.can_transition(Completed));
    /// assert!(!Completed.can_transition(Pending));
    /// assert!(!Accepted.can_transition(Accepted));
    /// ```
    pub const fn can_transition(&self, to: OrderStatus) -> bool {
        matches!(
            (self, to),
            (OrderStatus::Pending, OrderStatus::Accepted)
                | (OrderStatus::Pending, OrderStatus::Rejected)
                | (OrderStatus::Accepted, OrderStatus::Completed)
        )
    }

    /// Checks a transition, returning the target status when it is legal.
    pub fn transition(self, to: OrderStatus) -> CoreResult<OrderStatus> {
        if self.can_transition(to) {
            Ok(to)
        } else {
            Err(CoreError::IllegalTransition { from: self, to })
        }
    }

    /// Staff actions offered for an order in this status.
    pub fn available_actions(&self) -> &'static [OrderAction] {
        match self {
            OrderStatus::Pending => &[OrderAction::Accept, OrderAction::Reject],
            OrderStatus::Accepted => &[OrderAction::Complete],
            OrderStatus::Completed | OrderStatus::Rejected => &[],
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CoreError::UnknownStatus(s.to_string()))
    }
}

// =============================================================================
// Order Action
// =============================================================================

/// A staff button on the order dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderAction {
    Accept,
    Reject,
    Complete,
}

impl OrderAction {
    /// The status this action moves an order to.
    pub const fn target_status(&self) -> OrderStatus {
        match self {
            OrderAction::Accept => OrderStatus::Accepted,
            OrderAction::Reject => OrderStatus::Rejected,
            OrderAction::Complete => OrderStatus::Completed,
        }
    }
}

impl fmt::Display for OrderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OrderAction::Accept => "accept",
            OrderAction::Reject => "reject",
            OrderAction::Complete => "complete",
        };
        f.write_str(label)
    }
}

// =============================================================================
// Order Line (snapshot element)
// =============================================================================

/// One element of an order's item snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    /// Catalog entry as it was at placement (not re-fetched).
    pub menu_item: MenuItem,
    #[serde(default)]
    pub dine_in_quantity: u32,
    #[serde(default)]
    pub takeaway_quantity: u32,
    #[serde(default)]
    pub instructions: String,
}

impl OrderLine {
    #[inline]
    pub fn units(&self) -> u32 {
        self.dine_in_quantity.saturating_add(self.takeaway_quantity)
    }

    /// Price × units plus parcel charge × takeaway units.
    pub fn total(&self) -> Money {
        self.menu_item.price.multiply_quantity(self.units())
            + self
                .menu_item
                .parcel_charge
                .multiply_quantity(self.takeaway_quantity)
    }
}

/// Recomputes an order total from snapshot lines.
pub fn compute_total(lines: &[OrderLine]) -> Money {
    lines.iter().map(OrderLine::total).sum()
}

/// Serializes lines into the snapshot string.
pub fn encode_snapshot(lines: &[OrderLine]) -> CoreResult<String> {
    Ok(serde_json::to_string(lines)?)
}

/// Parses a snapshot string back into lines.
pub fn decode_snapshot(items: &str) -> CoreResult<Vec<OrderLine>> {
    Ok(serde_json::from_str(items)?)
}

// =============================================================================
// Order
// =============================================================================

/// A placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub customer_name: String,
    /// JSON snapshot of the cart lines, immutable after placement.
    pub items: String,
    /// Computed at placement and never recomputed.
    #[serde(with = "money::as_decimal")]
    pub total: Money,
    pub status: OrderStatus,
    /// Epoch milliseconds.
    pub created_at: i64,
}

impl Order {
    /// Decodes the snapshot for display.
    pub fn lines(&self) -> CoreResult<Vec<OrderLine>> {
        decode_snapshot(&self.items)
    }

    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.created_at).single()
    }
}

// =============================================================================
// New Order
// =============================================================================

/// A validated order ready to be inserted.
///
/// ## Placement Flow
/// ```text
/// customer_name, cart lines, total
///      │
///      ▼
/// NewOrder::prepare ← THIS TYPE
///      │  ├── blank name?   → ValidationError::Required
///      │  ├── no lines?     → ValidationError::EmptyCart
///      │  └── total < 0?    → ValidationError::Negative
///      ▼
/// { items: JSON, status: Pending, created_at: now }
///      │
///      ▼
/// Order Store insert ──► generated id
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub customer_name: String,
    pub items: String,
    pub total: Money,
    pub status: OrderStatus,
    pub created_at: i64,
}

impl NewOrder {
    /// Validates and stamps with the current time.
    pub fn prepare(customer_name: &str, lines: &[OrderLine], total: Money) -> CoreResult<Self> {
        Self::prepare_at(customer_name, lines, total, Utc::now().timestamp_millis())
    }

    /// Validates and stamps with an explicit creation time.
    pub fn prepare_at(
        customer_name: &str,
        lines: &[OrderLine],
        total: Money,
        created_at: i64,
    ) -> CoreResult<Self> {
        let customer_name = validate_customer_name(customer_name)?;
        validate_order_lines(lines)?;
        validate_amount("total", total)?;

        Ok(Self {
            customer_name,
            items: encode_snapshot(lines)?,
            total,
            status: OrderStatus::Pending,
            created_at,
        })
    }

    /// Attaches the identity generated by the store.
    pub fn into_order(self, id: i64) -> Order {
        Order {
            id,
            customer_name: self.customer_name,
            items: self.items,
            total: self.total,
            status: self.status,
            created_at: self.created_at,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    fn line(dine_in: u32, takeaway: u32) -> OrderLine {
        OrderLine {
            menu_item: MenuItem::new(1, "Paneer Tikka", Money::from_cents(25_000), "Starters")
                .with_description("Grilled cottage cheese cubes")
                .with_parcel_charge(Money::from_cents(500)),
            dine_in_quantity: dine_in,
            takeaway_quantity: takeaway,
            instructions: "no onion".to_string(),
        }
    }

    #[test]
    fn test_status_strings_are_exact() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
            assert_eq!(status.to_string(), status.as_str());
        }
        assert!("pending".parse::<OrderStatus>().is_err());
        assert!("PENDING".parse::<OrderStatus>().is_err());
        assert!("".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_status_serde_matches_storage() {
        let json = serde_json::to_string(&OrderStatus::Accepted).unwrap();
        assert_eq!(json, "\"Accepted\"");
    }

    #[test]
    fn test_transition_table_exhaustive() {
        use OrderStatus::*;
        let legal = [(Pending, Accepted), (Pending, Rejected), (Accepted, Completed)];

        for from in OrderStatus::ALL {
            for to in OrderStatus::ALL {
                let expected = legal.contains(&(from, to));
                assert_eq!(from.can_transition(to), expected, "{from} -> {to}");
            }
        }
    }

    #[test]
    fn test_terminal_states_have_no_way_out() {
        for status in OrderStatus::TERMINAL {
            assert!(status.is_terminal());
            assert!(status.available_actions().is_empty());
            for to in OrderStatus::ALL {
                assert!(status.transition(to).is_err());
            }
        }
    }

    #[test]
    fn test_actions_match_transitions() {
        for status in OrderStatus::ALL {
            for action in status.available_actions() {
                assert!(status.can_transition(action.target_status()));
            }
        }
    }

    #[test]
    fn test_illegal_transition_error() {
        let err = OrderStatus::Pending
            .transition(OrderStatus::Completed)
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::IllegalTransition {
                from: OrderStatus::Pending,
                to: OrderStatus::Completed
            }
        ));
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line(1, 2).total(), Money::from_cents(76_000));
        assert_eq!(compute_total(&[line(1, 0), line(0, 1)]), Money::from_cents(50_500));
    }

    #[test]
    fn test_snapshot_wire_shape() {
        let json = encode_snapshot(&[line(1, 2)]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let element = &value[0];
        assert_eq!(element["dineInQuantity"], 1);
        assert_eq!(element["takeawayQuantity"], 2);
        assert_eq!(element["instructions"], "no onion");
        assert_eq!(element["menuItem"]["price"], 250.0);
        assert_eq!(element["menuItem"]["parcel_charge"], 5.0);
        assert_eq!(element["menuItem"]["in_stock"], true);
    }

    #[test]
    fn test_snapshot_round_trip_keeps_copied_fields() {
        let lines = vec![line(1, 2), line(0, 0)];
        let decoded = decode_snapshot(&encode_snapshot(&lines).unwrap()).unwrap();
        assert_eq!(decoded, lines);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode_snapshot("not json"), Err(CoreError::Snapshot(_))));
    }

    #[test]
    fn test_prepare_rejects_blank_name() {
        let err = NewOrder::prepare("   ", &[line(1, 0)], Money::from_cents(100)).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_prepare_rejects_empty_lines() {
        let err = NewOrder::prepare("Alice", &[], Money::zero()).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::EmptyCart)));
    }

    #[test]
    fn test_prepare_rejects_negative_total() {
        let err = NewOrder::prepare("Alice", &[line(1, 0)], Money::from_cents(-1)).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::Negative { .. })));
    }

    #[test]
    fn test_prepare_stamps_pending() {
        let order = NewOrder::prepare_at("  Alice ", &[line(1, 2)], Money::from_cents(76_000), 1_700_000_000_000)
            .unwrap()
            .into_order(9);

        assert_eq!(order.id, 9);
        assert_eq!(order.customer_name, "Alice");
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.created_at, 1_700_000_000_000);
        assert_eq!(order.lines().unwrap(), vec![line(1, 2)]);
        assert!(order.created_at_utc().is_some());
    }

    #[test]
    fn test_prepare_uses_current_time() {
        let before = Utc::now().timestamp_millis();
        let order = NewOrder::prepare("Bob", &[line(1, 0)], Money::from_cents(25_000)).unwrap();
        assert!(order.created_at >= before);
    }
}

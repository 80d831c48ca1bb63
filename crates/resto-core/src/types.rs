//! # Domain Types
//!
//! Catalog types used throughout Resto.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Catalog Types                                   │
//! │                                                                         │
//! │  ┌──────────────────────┐        ┌─────────────────┐                    │
//! │  │      MenuItem        │        │    Category     │                    │
//! │  │  ──────────────────  │        │  ─────────────  │                    │
//! │  │  id (rowid)          │  name  │  id (rowid)     │                    │
//! │  │  name, description   │ ─────► │  name (UNIQUE)  │                    │
//! │  │  price               │  ref   └─────────────────┘                    │
//! │  │  category (name)     │                                               │
//! │  │  in_stock            │  The category reference is by name and is     │
//! │  │  takeaway_available  │  not enforced: deleting a category leaves     │
//! │  │  parcel_charge       │  its items pointing at a dangling name.       │
//! │  └──────────────────────┘                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Orders and their status machine live in [`crate::order`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::money::{self, Money};

// =============================================================================
// Menu Item
// =============================================================================

/// A dish or drink on the menu.
///
/// The serde shape (snake_case fields, decimal prices) is also the
/// `menuItem` object embedded in every order snapshot, so field names here
/// are part of the stored format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Generated on insert.
    pub id: i64,

    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Unit price, non-negative.
    #[serde(with = "money::as_decimal")]
    pub price: Money,

    /// Category name reference.
    #[serde(default)]
    pub category: String,

    /// Out-of-stock items are shown but cannot be added to a cart.
    #[serde(default = "default_true")]
    pub in_stock: bool,

    /// Whether the kitchen packs this item for takeaway.
    #[serde(default = "default_true")]
    pub takeaway_available: bool,

    /// Surcharge applied per takeaway unit, non-negative.
    #[serde(with = "money::as_decimal", default)]
    pub parcel_charge: Money,
}

fn default_true() -> bool {
    true
}

impl MenuItem {
    /// Creates an in-stock, takeaway-capable item with no parcel charge.
    pub fn new(id: i64, name: impl Into<String>, price: Money, category: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            price,
            category: category.into(),
            in_stock: true,
            takeaway_available: true,
            parcel_charge: Money::zero(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_parcel_charge(mut self, parcel_charge: Money) -> Self {
        self.parcel_charge = parcel_charge;
        self
    }

    pub fn with_in_stock(mut self, in_stock: bool) -> Self {
        self.in_stock = in_stock;
        self
    }

    pub fn with_takeaway_available(mut self, takeaway_available: bool) -> Self {
        self.takeaway_available = takeaway_available;
        self
    }
}

// =============================================================================
// New Menu Item
// =============================================================================

/// A menu item that has not been persisted yet (no id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMenuItem {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "money::as_decimal")]
    pub price: Money,
    #[serde(default)]
    pub category: String,
    #[serde(default = "default_true")]
    pub in_stock: bool,
    #[serde(default = "default_true")]
    pub takeaway_available: bool,
    #[serde(with = "money::as_decimal", default)]
    pub parcel_charge: Money,
}

impl NewMenuItem {
    pub fn new(name: impl Into<String>, price: Money, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            price,
            category: category.into(),
            in_stock: true,
            takeaway_available: true,
            parcel_charge: Money::zero(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_parcel_charge(mut self, parcel_charge: Money) -> Self {
        self.parcel_charge = parcel_charge;
        self
    }

    /// Attaches the identity generated by the store.
    pub fn into_menu_item(self, id: i64) -> MenuItem {
        MenuItem {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            category: self.category,
            in_stock: self.in_stock,
            takeaway_available: self.takeaway_available,
            parcel_charge: self.parcel_charge,
        }
    }
}

// =============================================================================
// Category
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    /// Unique, case-sensitive.
    pub name: String,
}

// =============================================================================
// Menu Grouping
// =============================================================================

/// Groups menu items by category name for the customer menu.
///
/// Categories come out sorted by name; items keep their input order
/// within a category.
///
/// ```rust
/// use resto_core::{group_by_category, MenuItem, Money};
///
/// let menu = vec![
///     MenuItem::new(1, "Coke", Money::from_cents(4_000), "Beverages"),
///     MenuItem::new(2, "Paneer Tikka", Money::from_cents(25_000), "Starters"),
///     MenuItem::new(3, "Masala Chai", Money::from_cents(5_000), "Beverages"),
/// ];
///
/// let grouped = group_by_category(&menu);
/// assert_eq!(grouped.keys().collect::<Vec<_>>(), vec!["Beverages", "Starters"]);
/// assert_eq!(grouped["Beverages"].len(), 2);
/// ```
pub fn group_by_category(items: &[MenuItem]) -> BTreeMap<String, Vec<MenuItem>> {
    let mut grouped: BTreeMap<String, Vec<MenuItem>> = BTreeMap::new();
    for item in items {
        grouped
            .entry(item.category.clone())
            .or_default()
            .push(item.clone());
    }
    grouped
}

// =============================================================================
// Unit Tests
// =============================================================================

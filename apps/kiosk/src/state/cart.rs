//! # Cart State
//!
//! Holds the one in-progress customer cart and publishes a fresh
//! [`CartSnapshot`] after every mutation.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  Customer Action        Command                  Cart Change            │
//! │  ───────────────        ───────                  ───────────            │
//! │                                                                         │
//! │  Tap menu item ────────► add_to_cart() ────────► add_item(&item)        │
//! │  Dine-in  + / - ───────► set_dine_in() ────────► dine_in = max(0, n)    │
//! │  Takeaway + / - ───────► set_takeaway() ───────► takeaway = max(0, n)   │
//! │  Type a note ──────────► set_instructions() ───► instructions = text    │
//! │  Remove line ──────────► remove_from_cart() ───► lines.retain(...)      │
//! │  Order placed ─────────► place_order() ────────► clear()                │
//! │                                  │                                      │
//! │                                  ▼                                      │
//! │                    watch::Sender<CartSnapshot>                          │
//! │                    (every subscriber sees the new totals)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Callers never get a reference into the cart, only snapshots. The mutex
//! is held for the duration of one closure and never across an `.await`.

use std::sync::{Mutex, MutexGuard, PoisonError};

use resto_core::{Cart, CartSnapshot};
use tokio::sync::watch;

/// The active cart plus a change feed.
#[derive(Debug)]
pub struct CartState {
    cart: Mutex<Cart>,
    updates: watch::Sender<CartSnapshot>,
}

impl CartState {
    /// Creates a new empty cart state.
    pub fn new() -> Self {
        let cart = Cart::new();
        let (updates, _) = watch::channel(cart.snapshot());
        CartState {
            cart: Mutex::new(cart),
            updates,
        }
    }

    /// A panic inside a cart closure leaves the cart usable; the data is
    /// plain values with no half-applied invariant to protect.
    fn lock(&self) -> MutexGuard<'_, Cart> {
        self.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let total = cart_state.with_cart(|cart| cart.grand_total());
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.lock();
        f(&cart)
    }

    /// Executes a function with write access to the cart, then publishes
    /// the resulting snapshot.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let handle = cart_state.with_cart_mut(|cart| cart.add_item(&item));
    /// ```
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.lock();
        let result = f(&mut cart);
        self.updates.send_replace(cart.snapshot());
        result
    }

    /// Current totals and lines.
    pub fn snapshot(&self) -> CartSnapshot {
        self.with_cart(Cart::snapshot)
    }

    /// Subscribes to cart snapshots. The receiver starts at the current one.
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.updates.subscribe()
    }
}

impl Default for CartState {
    fn default() -> Self {
        Self::new()
    }
}

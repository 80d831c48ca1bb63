//! # State Module
//!
//! Focused state types held by the [`AppContext`](crate::AppContext).
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────────┐  ┌──────────────────┐          │
//! │  │  CartState   │  │   KioskConfig    │  │   StaffGate      │          │
//! │  │              │  │                  │  │                  │          │
//! │  │  Mutex<Cart> │  │  restaurant name │  │  optional PIN    │          │
//! │  │  watch::     │  │  currency        │  │  AtomicBool      │          │
//! │  │   Sender     │  │  db path, seed   │  │   unlocked       │          │
//! │  └──────────────┘  └──────────────────┘  └──────────────────┘          │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • CartState: std Mutex, never held across an await                    │
//! │  • KioskConfig: read-only after startup                                │
//! │  • StaffGate: atomic flag                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod config;
mod staff;

pub use cart::CartState;
pub use config::{ConfigError, ConfigResult, KioskConfig};
pub use staff::StaffGate;

//! # Resto Kiosk Library
//!
//! The application layer of the restaurant kiosk: configuration, the
//! [`AppContext`] built once at startup, the command layer the
//! presentation calls into, and the `resto` CLI.
//!
//! ## Module Organization
//! ```text
//! resto_kiosk/
//! ├── lib.rs          ◄─── You are here (tracing setup & exports)
//! ├── context.rs      ◄─── AppContext: Database, OrderLifecycle, cart, staff gate
//! ├── state/
//! │   ├── cart.rs     ◄─── Mutex<Cart> + watch channel of snapshots
//! │   ├── config.rs   ◄─── KioskConfig (defaults → TOML → env)
//! │   └── staff.rs    ◄─── Optional staff PIN gate
//! ├── commands/
//! │   ├── menu.rs     ◄─── Customer menu
//! │   ├── cart.rs     ◄─── Cart manipulation
//! │   ├── order.rs    ◄─── Place order, order dashboard
//! │   └── catalog.rs  ◄─── Menu + category management
//! ├── cli.rs          ◄─── clap definitions and dispatch
//! ├── output.rs       ◄─── Text / JSON rendering
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! let ctx = AppContext::in_memory(KioskConfig::default()).await?;
//!
//! let added = commands::cart::add_to_cart(&ctx, 1).await?;
//! commands::cart::set_takeaway_quantity(&ctx, added.handle, 2)?;
//!
//! let placed = commands::order::place_order(&ctx, "Alice").await?;
//! ```

pub mod cli;
pub mod commands;
pub mod context;
pub mod error;
pub mod output;
pub mod state;

pub use context::AppContext;
pub use error::{ApiError, ApiResult, ErrorCode};
pub use state::{CartState, KioskConfig, StaffGate};

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info,resto=debug,sqlx=warn";

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so command output on stdout stays clean.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=resto=trace` - Show trace for resto crates only
/// - Default: [`DEFAULT_LOG_FILTER`]
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    // A second call (tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

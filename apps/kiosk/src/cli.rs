//! # `resto` CLI
//!
//! Command-line front end over the command layer. Each invocation builds
//! one [`AppContext`], runs one command and exits.
//!
//! ```text
//! resto menu
//! resto order place --customer Alice --item 1 --item 10:0:2:"no ice"
//! resto --pin 4321 orders list --status Pending
//! resto --pin 4321 orders accept 1
//! resto --pin 4321 orders watch --status Pending --status Accepted
//! resto --pin 4321 orders clear --status Completed --status Rejected
//! resto --pin 4321 item add "Masala Dosa" --price 180 --category "Main Course"
//! ```
//!
//! Staff subcommands need `--pin` when a staff PIN is configured.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand, ValueEnum};
use resto_core::money::MAX_PRICE;
use resto_core::{Money, NewMenuItem, OrderStatus};
use tracing::debug;

use crate::commands::catalog::{self, MenuItemChanges};
use crate::commands::{cart, menu, order};
use crate::context::AppContext;
use crate::error::ApiResult;
use crate::output::{self, Printer};
use crate::state::KioskConfig;

// =============================================================================
// Arguments
// =============================================================================

#[derive(Debug, Parser)]
#[command(name = "resto", author, version, about = "Restaurant ordering kiosk", long_about = None)]
pub struct Cli {
    /// Config file (default: resto.toml in the platform config dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// SQLite database file, overrides the config
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Staff PIN for dashboard and menu management commands
    #[arg(long, global = true, value_name = "PIN")]
    pub pin: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the menu grouped by category
    Menu,

    /// Manage categories (staff)
    #[command(subcommand)]
    Category(CategoryCommand),

    /// Manage menu items (staff)
    #[command(subcommand)]
    Item(ItemCommand),

    /// Place an order
    #[command(subcommand)]
    Order(OrderCommand),

    /// Order dashboard (staff)
    #[command(subcommand)]
    Orders(OrdersCommand),

    /// Insert the starter menu where missing (staff)
    Seed,
}

#[derive(Debug, Subcommand)]
pub enum CategoryCommand {
    List,
    Add { name: String },
    Rename { id: i64, name: String },
    Remove { id: i64 },
}

#[derive(Debug, Subcommand)]
pub enum ItemCommand {
    /// Add a menu item
    Add(NewItemArgs),

    /// Change fields of a menu item
    Update(UpdateItemArgs),

    /// Delete a menu item
    Remove { id: i64 },

    /// Mark an item in stock or sold out
    Stock { id: i64, state: StockState },

    /// Enable or disable takeaway for an item
    Takeaway { id: i64, state: Toggle },
}

#[derive(Debug, Args)]
pub struct NewItemArgs {
    pub name: String,

    #[arg(long, value_parser = parse_money)]
    pub price: Money,

    #[arg(long)]
    pub category: String,

    #[arg(long, default_value = "")]
    pub description: String,

    /// Surcharge per takeaway unit
    #[arg(long, value_parser = parse_money)]
    pub parcel: Option<Money>,

    #[arg(long)]
    pub out_of_stock: bool,

    #[arg(long)]
    pub dine_in_only: bool,
}

impl NewItemArgs {
    fn into_new_item(self) -> NewMenuItem {
        let mut item = NewMenuItem::new(self.name, self.price, self.category)
            .with_description(self.description)
            .with_parcel_charge(self.parcel.unwrap_or_default());
        item.in_stock = !self.out_of_stock;
        item.takeaway_available = !self.dine_in_only;
        item
    }
}

#[derive(Debug, Args)]
pub struct UpdateItemArgs {
    pub id: i64,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long, value_parser = parse_money)]
    pub price: Option<Money>,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long, value_parser = parse_money)]
    pub parcel: Option<Money>,
}

impl UpdateItemArgs {
    fn changes(self) -> MenuItemChanges {
        MenuItemChanges {
            name: self.name,
            description: self.description,
            price: self.price,
            category: self.category,
            parcel_charge: self.parcel,
            ..MenuItemChanges::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StockState {
    In,
    Out,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

#[derive(Debug, Subcommand)]
pub enum OrderCommand {
    /// Build a cart from --item specs and place it
    Place {
        #[arg(long)]
        customer: String,

        /// Menu item id with optional dine-in qty, takeaway qty and note
        #[arg(long = "item", value_name = "ID[:DINE[:TAKE[:NOTE]]]", required = true)]
        items: Vec<ItemSpec>,
    },
}

#[derive(Debug, Subcommand)]
pub enum OrdersCommand {
    /// List orders, newest first
    List {
        #[arg(long = "status", value_parser = parse_status)]
        statuses: Vec<OrderStatus>,
    },

    /// Show one order
    Show { id: i64 },

    Accept { id: i64 },
    Reject { id: i64 },
    Complete { id: i64 },

    /// Delete Completed and/or Rejected orders
    Clear {
        #[arg(long = "status", value_parser = parse_status, required = true)]
        statuses: Vec<OrderStatus>,
    },

    /// Print the order list now and again after every change
    Watch {
        #[arg(long = "status", value_parser = parse_status)]
        statuses: Vec<OrderStatus>,

        /// Stop after this many printed lists
        #[arg(long)]
        updates: Option<usize>,
    },
}

// =============================================================================
// Value Parsers
// =============================================================================

/// `ID[:DINE[:TAKE[:NOTE]]]`, e.g. `4`, `4:2`, `10:0:2`, `4:1:0:less spicy`.
///
/// The note is everything after the third colon, colons included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSpec {
    pub menu_item_id: i64,
    pub dine_in: Option<i64>,
    pub takeaway: Option<i64>,
    pub note: Option<String>,
}

impl FromStr for ItemSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(4, ':');

        let id = parts.next().unwrap_or_default();
        let menu_item_id = id
            .trim()
            .parse()
            .map_err(|_| format!("invalid menu item id {:?}", id))?;

        let quantity = |part: Option<&str>, label: &str| -> Result<Option<i64>, String> {
            match part.map(str::trim) {
                None | Some("") => Ok(None),
                Some(q) => q
                    .parse()
                    .map(Some)
                    .map_err(|_| format!("invalid {} quantity {:?}", label, q)),
            }
        };

        let dine_in = quantity(parts.next(), "dine-in")?;
        let takeaway = quantity(parts.next(), "takeaway")?;
        let note = parts.next().map(str::to_string);

        Ok(ItemSpec {
            menu_item_id,
            dine_in,
            takeaway,
            note,
        })
    }
}

/// Major units, e.g. `250` or `12.50`, at most [`MAX_PRICE`].
fn parse_money(s: &str) -> Result<Money, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid amount {:?}", s))?;
    if !value.is_finite() {
        return Err(format!("invalid amount {:?}", s));
    }

    let amount = Money::from_major_f64(value);
    if amount > MAX_PRICE {
        return Err(format!("amount {} exceeds the maximum of {}", s.trim(), MAX_PRICE));
    }
    Ok(amount)
}

/// Status names, case-insensitive on the command line.
fn parse_status(s: &str) -> Result<OrderStatus, String> {
    OrderStatus::ALL
        .into_iter()
        .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
        .ok_or_else(|| {
            format!(
                "unknown status {:?} (expected Pending, Accepted, Completed or Rejected)",
                s
            )
        })
}

// =============================================================================
// Dispatch
// =============================================================================

/// Loads config, opens the database and runs one command.
pub async fn run(cli: Cli) -> ApiResult<()> {
    let mut config = KioskConfig::load(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.database_path = Some(db);
    }

    let ctx = AppContext::open(config).await?;
    let result = execute(&ctx, cli.pin.as_deref(), cli.json, cli.command).await;
    ctx.shutdown().await;
    result
}

/// Runs one command against an existing context.
pub async fn execute(
    ctx: &AppContext,
    pin: Option<&str>,
    json: bool,
    command: Command,
) -> ApiResult<()> {
    if let Some(pin) = pin {
        ctx.staff().unlock(pin)?;
    }

    let printer = Printer::new(ctx.config(), json);
    debug!(?command, "Executing command");

    match command {
        Command::Menu => {
            let sections = menu::get_menu(ctx).await?;
            printer.emit(&sections, |c| output::render_menu(c, &sections))
        }
        Command::Category(command) => run_category(ctx, &printer, command).await,
        Command::Item(command) => run_item(ctx, &printer, command).await,
        Command::Order(OrderCommand::Place { customer, items }) => {
            place(ctx, &printer, &customer, items).await
        }
        Command::Orders(command) => run_orders(ctx, &printer, command).await,
        Command::Seed => {
            let report = catalog::seed_menu(ctx).await?;
            printer.emit(&report, |_| output::render_seed(&report))
        }
    }
}

async fn run_category(ctx: &AppContext, printer: &Printer<'_>, command: CategoryCommand) -> ApiResult<()> {
    match command {
        CategoryCommand::List => {
            let categories = catalog::list_categories(ctx).await?;
            printer.emit(&categories, |_| output::render_categories(&categories))
        }
        CategoryCommand::Add { name } => {
            let category = catalog::add_category(ctx, &name).await?;
            printer.emit(&category, |_| {
                format!("Added category #{} {}", category.id, category.name)
            })
        }
        CategoryCommand::Rename { id, name } => {
            catalog::rename_category(ctx, id, &name).await?;
            printer.emit(&id, |_| format!("Renamed category #{} to {}", id, name))
        }
        CategoryCommand::Remove { id } => {
            catalog::remove_category(ctx, id).await?;
            printer.emit(&id, |_| format!("Removed category #{}", id))
        }
    }
}

async fn run_item(ctx: &AppContext, printer: &Printer<'_>, command: ItemCommand) -> ApiResult<()> {
    match command {
        ItemCommand::Add(args) => {
            let item = catalog::add_menu_item(ctx, args.into_new_item()).await?;
            printer.emit(&item, |c| format!("Added {}", output::render_item(c, &item)))
        }
        ItemCommand::Update(args) => {
            let id = args.id;
            let item = catalog::update_menu_item(ctx, id, args.changes()).await?;
            printer.emit(&item, |c| format!("Updated {}", output::render_item(c, &item)))
        }
        ItemCommand::Remove { id } => {
            catalog::remove_menu_item(ctx, id).await?;
            printer.emit(&id, |_| format!("Removed menu item #{}", id))
        }
        ItemCommand::Stock { id, state } => {
            let in_stock = state == StockState::In;
            catalog::set_item_in_stock(ctx, id, in_stock).await?;
            let item = menu::get_menu_item(ctx, id).await?;
            printer.emit(&item, |c| output::render_item(c, &item))
        }
        ItemCommand::Takeaway { id, state } => {
            catalog::set_item_takeaway(ctx, id, state == Toggle::On).await?;
            let item = menu::get_menu_item(ctx, id).await?;
            printer.emit(&item, |c| output::render_item(c, &item))
        }
    }
}

/// Fills the cart from `items`, then places it.
async fn place(
    ctx: &AppContext,
    printer: &Printer<'_>,
    customer: &str,
    items: Vec<ItemSpec>,
) -> ApiResult<()> {
    for spec in items {
        let handle = cart::add_to_cart(ctx, spec.menu_item_id).await?.handle;
        if let Some(dine_in) = spec.dine_in {
            cart::set_dine_in_quantity(ctx, handle, dine_in)?;
        }
        if let Some(takeaway) = spec.takeaway {
            cart::set_takeaway_quantity(ctx, handle, takeaway)?;
        }
        if let Some(note) = &spec.note {
            cart::set_instructions(ctx, handle, note)?;
        }
    }

    let placed = order::place_order(ctx, customer).await?;
    printer.emit(&placed, |c| output::render_placed(c, &placed))
}

async fn run_orders(ctx: &AppContext, printer: &Printer<'_>, command: OrdersCommand) -> ApiResult<()> {
    match command {
        OrdersCommand::List { statuses } => {
            let orders = order::list_orders(ctx, &statuses).await?;
            printer.emit(&orders, |c| output::render_orders(c, &orders))
        }
        OrdersCommand::Show { id } => {
            let found = order::get_order(ctx, id).await?;
            printer.emit(&found, |c| output::render_order(c, &found))
        }
        OrdersCommand::Accept { id } => {
            let updated = order::accept_order(ctx, id).await?;
            printer.emit(&updated, |c| output::render_order(c, &updated))
        }
        OrdersCommand::Reject { id } => {
            let updated = order::reject_order(ctx, id).await?;
            printer.emit(&updated, |c| output::render_order(c, &updated))
        }
        OrdersCommand::Complete { id } => {
            let updated = order::complete_order(ctx, id).await?;
            printer.emit(&updated, |c| output::render_order(c, &updated))
        }
        OrdersCommand::Clear { statuses } => {
            let removed = order::clear_orders(ctx, &statuses).await?;
            printer.emit(&removed, |_| format!("Cleared {} orders", removed))
        }
        OrdersCommand::Watch { statuses, updates } => {
            let mut live = order::watch_orders(ctx, &statuses)?;
            let mut printed = 0;

            while let Some(batch) = live.next().await {
                let orders = order::to_views(batch?)?;
                printer.emit(&orders, |c| output::render_orders(c, &orders))?;

                printed += 1;
                if updates.is_some_and(|limit| printed >= limit) {
                    break;
                }
            }
            Ok(())
        }
    }
}

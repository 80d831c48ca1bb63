//! # Output
//!
//! Plain-text rendering of command results for the terminal, and the
//! `--json` switch that prints the serialized result instead.

use std::fmt::Write as _;

use chrono::{TimeZone, Utc};
use resto_core::{Category, MenuItem};
use serde::Serialize;

use crate::commands::catalog::SeedReport;
use crate::commands::menu::MenuSection;
use crate::commands::order::{OrderView, PlacedOrder};
use crate::error::{ApiError, ApiResult};
use crate::state::KioskConfig;

/// Prints either human-readable text or pretty JSON.
pub struct Printer<'a> {
    config: &'a KioskConfig,
    json: bool,
}

impl<'a> Printer<'a> {
    pub fn new(config: &'a KioskConfig, json: bool) -> Self {
        Printer { config, json }
    }

    pub fn config(&self) -> &KioskConfig {
        self.config
    }

    /// Prints `value` as JSON, or the text produced by `human`.
    pub fn emit<T, F>(&self, value: &T, human: F) -> ApiResult<()>
    where
        T: Serialize + ?Sized,
        F: FnOnce(&KioskConfig) -> String,
    {
        if self.json {
            let json = serde_json::to_string_pretty(value)
                .map_err(|e| ApiError::internal(format!("Failed to encode output: {}", e)))?;
            println!("{}", json);
        } else {
            println!("{}", human(self.config).trim_end());
        }
        Ok(())
    }
}

// =============================================================================
// Renderers
// =============================================================================

pub fn render_menu(config: &KioskConfig, sections: &[MenuSection]) -> String {
    let mut out = format!("{}\n", config.restaurant_name);
    if sections.is_empty() {
        out.push_str("The menu is empty\n");
        return out;
    }

    for section in sections {
        let _ = writeln!(out, "\n== {} ==", section.category);
        for item in &section.items {
            out.push_str(&render_item_line(config, item));
        }
    }
    out
}

fn render_item_line(config: &KioskConfig, item: &MenuItem) -> String {
    let mut line = format!(
        "  #{:<4} {:<24} {:>10}",
        item.id,
        item.name,
        config.format_currency(item.price)
    );
    if !item.parcel_charge.is_zero() {
        let _ = write!(line, "  +{} parcel", config.format_currency(item.parcel_charge));
    }
    if !item.in_stock {
        line.push_str("  [out of stock]");
    }
    if !item.takeaway_available {
        line.push_str("  [dine-in only]");
    }
    line.push('\n');
    if !item.description.is_empty() {
        let _ = writeln!(line, "         {}", item.description);
    }
    line
}

pub fn render_item(config: &KioskConfig, item: &MenuItem) -> String {
    format!("[{}]\n{}", item.category, render_item_line(config, item))
}

pub fn render_categories(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories\n".to_string();
    }
    categories
        .iter()
        .map(|c| format!("#{:<4} {}\n", c.id, c.name))
        .collect()
}

pub fn render_placed(config: &KioskConfig, placed: &PlacedOrder) -> String {
    format!(
        "Order #{} placed for {}: {}\n",
        placed.order_id,
        placed.customer_name,
        config.format_currency(placed.total)
    )
}

pub fn render_order(config: &KioskConfig, order: &OrderView) -> String {
    let mut out = format!(
        "Order #{}  {}  {}  {}  {}\n",
        order.id,
        order.customer_name,
        order.status,
        format_timestamp(order.created_at),
        config.format_currency(order.total)
    );

    for line in &order.lines {
        let _ = write!(
            out,
            "    {} dine-in, {} takeaway  {}",
            line.dine_in_quantity, line.takeaway_quantity, line.menu_item.name
        );
        if !line.instructions.is_empty() {
            let _ = write!(out, "  \"{}\"", line.instructions);
        }
        out.push('\n');
    }

    if !order.actions.is_empty() {
        let actions: Vec<String> = order.actions.iter().map(ToString::to_string).collect();
        let _ = writeln!(out, "    actions: {}", actions.join(", "));
    }
    out
}

pub fn render_orders(config: &KioskConfig, orders: &[OrderView]) -> String {
    if orders.is_empty() {
        return "No orders\n".to_string();
    }
    orders.iter().map(|o| render_order(config, o)).collect()
}

pub fn render_seed(report: &SeedReport) -> String {
    format!(
        "Seeded {} categories and {} menu items\n",
        report.categories_added, report.items_added
    )
}

fn format_timestamp(millis: i64) -> String {
    match Utc.timestamp_millis_opt(millis).single() {
        Some(at) => at.format("%Y-%m-%d %H:%M").to_string(),
        None => millis.to_string(),
    }
}

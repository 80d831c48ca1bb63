//! # Catalog Commands
//!
//! Staff menu management: categories, menu items, stock and takeaway
//! toggles, and the starter-menu seed. Every command here requires the
//! staff gate to be open.
//!
//! Deleting a category leaves its items in place; they keep the old
//! category name and still show on the menu.

use resto_core::{Category, MenuItem, Money, NewMenuItem};
use resto_db::seed;
use serde::Serialize;
use tracing::{debug, info};

use crate::context::AppContext;
use crate::error::{ApiError, ApiResult};

// =============================================================================
// Categories
// =============================================================================

pub async fn list_categories(ctx: &AppContext) -> ApiResult<Vec<Category>> {
    debug!("list_categories command");
    ctx.staff().require()?;
    Ok(ctx.db().categories().list_all().await?)
}

/// Adds a category. Names are unique (case-sensitive).
pub async fn add_category(ctx: &AppContext, name: &str) -> ApiResult<Category> {
    debug!(name, "add_category command");
    ctx.staff().require()?;

    let category = ctx.db().categories().insert(name).await?;
    info!(id = category.id, name = %category.name, "Category added");
    Ok(category)
}

pub async fn rename_category(ctx: &AppContext, id: i64, name: &str) -> ApiResult<()> {
    debug!(id, name, "rename_category command");
    ctx.staff().require()?;
    Ok(ctx.db().categories().rename(id, name).await?)
}

pub async fn remove_category(ctx: &AppContext, id: i64) -> ApiResult<()> {
    debug!(id, "remove_category command");
    ctx.staff().require()?;
    Ok(ctx.db().categories().delete(id).await?)
}

// =============================================================================
// Menu Items
// =============================================================================

/// Field-by-field edit of a menu item. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct MenuItemChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Money>,
    pub category: Option<String>,
    pub parcel_charge: Option<Money>,
    pub in_stock: Option<bool>,
    pub takeaway_available: Option<bool>,
}

impl MenuItemChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.parcel_charge.is_none()
            && self.in_stock.is_none()
            && self.takeaway_available.is_none()
    }

    pub fn apply(self, item: &mut MenuItem) {
        if let Some(name) = self.name {
            item.name = name;
        }
        if let Some(description) = self.description {
            item.description = description;
        }
        if let Some(price) = self.price {
            item.price = price;
        }
        if let Some(category) = self.category {
            item.category = category;
        }
        if let Some(parcel_charge) = self.parcel_charge {
            item.parcel_charge = parcel_charge;
        }
        if let Some(in_stock) = self.in_stock {
            item.in_stock = in_stock;
        }
        if let Some(takeaway_available) = self.takeaway_available {
            item.takeaway_available = takeaway_available;
        }
    }
}

/// Adds a menu item and returns it with its generated id.
///
/// ## Errors
/// - `VALIDATION_ERROR` - Blank name, negative price or parcel charge
pub async fn add_menu_item(ctx: &AppContext, item: NewMenuItem) -> ApiResult<MenuItem> {
    debug!(name = %item.name, "add_menu_item command");
    ctx.staff().require()?;

    let stored = ctx.db().menu_items().insert(&item).await?;
    info!(id = stored.id, name = %stored.name, "Menu item added");
    Ok(stored)
}

/// Applies `changes` to an existing item and returns the stored result.
pub async fn update_menu_item(
    ctx: &AppContext,
    id: i64,
    changes: MenuItemChanges,
) -> ApiResult<MenuItem> {
    debug!(id, "update_menu_item command");
    ctx.staff().require()?;

    if changes.is_empty() {
        return Err(ApiError::validation("Nothing to update"));
    }

    let repo = ctx.db().menu_items();
    let mut item = repo
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("MenuItem", id))?;

    changes.apply(&mut item);
    repo.update(&item).await?;

    Ok(item)
}

pub async fn remove_menu_item(ctx: &AppContext, id: i64) -> ApiResult<()> {
    debug!(id, "remove_menu_item command");
    ctx.staff().require()?;
    Ok(ctx.db().menu_items().delete(id).await?)
}

/// Marks an item in stock or sold out.
pub async fn set_item_in_stock(ctx: &AppContext, id: i64, in_stock: bool) -> ApiResult<()> {
    debug!(id, in_stock, "set_item_in_stock command");
    ctx.staff().require()?;
    Ok(ctx.db().menu_items().set_in_stock(id, in_stock).await?)
}

/// Enables or disables takeaway for an item.
pub async fn set_item_takeaway(ctx: &AppContext, id: i64, available: bool) -> ApiResult<()> {
    debug!(id, available, "set_item_takeaway command");
    ctx.staff().require()?;
    Ok(ctx
        .db()
        .menu_items()
        .set_takeaway_available(id, available)
        .await?)
}

// =============================================================================
// Seed
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedReport {
    pub categories_added: usize,
    pub items_added: usize,
}

/// Inserts whatever part of the starter menu is missing.
pub async fn seed_menu(ctx: &AppContext) -> ApiResult<SeedReport> {
    debug!("seed_menu command");
    ctx.staff().require()?;

    let (categories_added, items_added) = seed::seed(ctx.db()).await?;
    Ok(SeedReport {
        categories_added,
        items_added,
    })
}

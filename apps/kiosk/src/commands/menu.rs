//! # Menu Commands
//!
//! The customer-facing menu: every item, grouped under its category.
//!
//! Sections follow the category table order. Items whose category name
//! no longer exists (the category was deleted or renamed) still show,
//! in trailing sections sorted by name.

use resto_core::{group_by_category, Category, MenuItem};
use resto_db::repository::menu_item::MenuItems;
use resto_db::LiveQuery;
use serde::Serialize;
use tracing::debug;

use crate::context::AppContext;
use crate::error::{ApiError, ApiResult};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuSection {
    pub category: String,
    pub items: Vec<MenuItem>,
}

/// Arranges items into sections.
///
/// Categories without items are left out.
pub fn build_menu(categories: &[Category], items: &[MenuItem]) -> Vec<MenuSection> {
    let mut grouped = group_by_category(items);

    let mut sections: Vec<MenuSection> = categories
        .iter()
        .filter_map(|category| {
            grouped.remove(&category.name).map(|items| MenuSection {
                category: category.name.clone(),
                items,
            })
        })
        .collect();

    sections.extend(
        grouped
            .into_iter()
            .map(|(category, items)| MenuSection { category, items }),
    );
    sections
}

/// Gets the full menu.
pub async fn get_menu(ctx: &AppContext) -> ApiResult<Vec<MenuSection>> {
    debug!("get_menu command");

    let categories = ctx.db().categories().list_all().await?;
    let items = ctx.db().menu_items().list_all().await?;
    Ok(build_menu(&categories, &items))
}

/// Gets one menu item.
pub async fn get_menu_item(ctx: &AppContext, id: i64) -> ApiResult<MenuItem> {
    debug!(id, "get_menu_item command");

    ctx.db()
        .menu_items()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("MenuItem", id))
}

/// Live menu items; pair with [`build_menu`] to render sections.
pub fn watch_menu(ctx: &AppContext) -> LiveQuery<MenuItems> {
    debug!("watch_menu command");
    ctx.db().menu_items().watch_all()
}

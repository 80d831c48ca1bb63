//! # Menu Item Repository
//!
//! Database operations for menu items.
//!
//! ## Key Operations
//! - CRUD with generated integer ids
//! - Staff toggles for the in-stock and takeaway-available flags
//! - Live views of the whole menu or a single item
//!
//! ## Money at the Boundary
//! ```text
//! menu_items.price REAL 250.0 ──► MenuItemRow.price f64
//!                                        │ Money::from_major_f64
//!                                        ▼
//!                               MenuItem.price Money(25000)
//! ```

use async_trait::async_trait;
use resto_core::validation::{validate_menu_item, validate_new_menu_item};
use resto_core::{MenuItem, Money, NewMenuItem};
use sqlx::SqlitePool;
use tokio::sync::broadcast;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::live::{LiveQuery, LiveSource};
use crate::pool::{notify, Table};

const SELECT_COLUMNS: &str = r#"
    SELECT
        id,
        name,
        description,
        price,
        category,
        in_stock,
        takeaway_available,
        parcel_charge
    FROM menu_items
"#;

#[derive(Debug, sqlx::FromRow)]
struct MenuItemRow {
    id: i64,
    name: String,
    description: String,
    price: f64,
    category: String,
    in_stock: bool,
    takeaway_available: bool,
    parcel_charge: f64,
}

impl From<MenuItemRow> for MenuItem {
    fn from(row: MenuItemRow) -> Self {
        MenuItem {
            id: row.id,
            name: row.name,
            description: row.description,
            price: Money::from_major_f64(row.price),
            category: row.category,
            in_stock: row.in_stock,
            takeaway_available: row.takeaway_available,
            parcel_charge: Money::from_major_f64(row.parcel_charge),
        }
    }
}

/// Repository for menu item database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.menu_items();
///
/// let coke = repo.insert(&NewMenuItem::new("Coke", Money::from_cents(4_000), "Beverages")).await?;
/// repo.set_in_stock(coke.id, false).await?;
/// ```
#[derive(Debug, Clone)]
pub struct MenuItemRepository {
    pool: SqlitePool,
    changes: broadcast::Sender<Table>,
}

impl MenuItemRepository {
    pub fn new(pool: SqlitePool, changes: broadcast::Sender<Table>) -> Self {
        MenuItemRepository { pool, changes }
    }

    /// Inserts a new menu item.
    ///
    /// ## Returns
    /// * `Ok(MenuItem)` - The stored item with its generated id
    pub async fn insert(&self, item: &NewMenuItem) -> DbResult<MenuItem> {
        validate_new_menu_item(item)?;
        debug!(name = %item.name, category = %item.category, "Inserting menu item");

        let result = sqlx::query(
            r#"
            INSERT INTO menu_items (
                name, description, price, category,
                in_stock, takeaway_available, parcel_charge
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(item.name.trim())
        .bind(&item.description)
        .bind(item.price.to_major_f64())
        .bind(&item.category)
        .bind(item.in_stock)
        .bind(item.takeaway_available)
        .bind(item.parcel_charge.to_major_f64())
        .execute(&self.pool)
        .await?;

        notify(&self.changes, Table::MenuItems);

        let mut stored = item.clone().into_menu_item(result.last_insert_rowid());
        stored.name = stored.name.trim().to_string();
        Ok(stored)
    }

    /// Replaces every field of an existing item.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No item with this id
    pub async fn update(&self, item: &MenuItem) -> DbResult<()> {
        validate_menu_item(item)?;
        debug!(id = item.id, "Updating menu item");

        let result = sqlx::query(
            r#"
            UPDATE menu_items SET
                name = ?2,
                description = ?3,
                price = ?4,
                category = ?5,
                in_stock = ?6,
                takeaway_available = ?7,
                parcel_charge = ?8
            WHERE id = ?1
            "#,
        )
        .bind(item.id)
        .bind(item.name.trim())
        .bind(&item.description)
        .bind(item.price.to_major_f64())
        .bind(&item.category)
        .bind(item.in_stock)
        .bind(item.takeaway_available)
        .bind(item.parcel_charge.to_major_f64())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("MenuItem", item.id));
        }

        notify(&self.changes, Table::MenuItems);
        Ok(())
    }

    /// Marks an item as available or sold out.
    pub async fn set_in_stock(&self, id: i64, in_stock: bool) -> DbResult<()> {
        debug!(id, in_stock, "Setting stock flag");
        self.set_flag("UPDATE menu_items SET in_stock = ?2 WHERE id = ?1", id, in_stock)
            .await
    }

    /// Enables or disables takeaway for an item.
    pub async fn set_takeaway_available(&self, id: i64, available: bool) -> DbResult<()> {
        debug!(id, available, "Setting takeaway flag");
        self.set_flag(
            "UPDATE menu_items SET takeaway_available = ?2 WHERE id = ?1",
            id,
            available,
        )
        .await
    }

    async fn set_flag(&self, sql: &'static str, id: i64, value: bool) -> DbResult<()> {
        let result = sqlx::query(sql)
            .bind(id)
            .bind(value)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("MenuItem", id));
        }

        notify(&self.changes, Table::MenuItems);
        Ok(())
    }

    /// Deletes an item. Orders that already snapshot it are unaffected.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting menu item");

        let result = sqlx::query("DELETE FROM menu_items WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("MenuItem", id));
        }

        notify(&self.changes, Table::MenuItems);
        Ok(())
    }

    /// Gets a menu item by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(MenuItem))` - Item found
    /// * `Ok(None)` - Item not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<MenuItem>> {
        let row = sqlx::query_as::<_, MenuItemRow>(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(MenuItem::from))
    }

    /// The whole menu in creation order.
    pub async fn list_all(&self) -> DbResult<Vec<MenuItem>> {
        let rows = sqlx::query_as::<_, MenuItemRow>(&format!("{SELECT_COLUMNS} ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Loaded menu items");
        Ok(rows.into_iter().map(MenuItem::from).collect())
    }

    pub async fn list_by_category(&self, category: &str) -> DbResult<Vec<MenuItem>> {
        let rows = sqlx::query_as::<_, MenuItemRow>(&format!(
            "{SELECT_COLUMNS} WHERE category = ?1 ORDER BY id"
        ))
        .bind(category)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(MenuItem::from).collect())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM menu_items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Live view of the whole menu.
    pub fn watch_all(&self) -> LiveQuery<MenuItems> {
        LiveQuery::new(
            MenuItems {
                repo: self.clone(),
                id: None,
            },
            self.changes.subscribe(),
        )
    }

    /// Live view of one item: emits an empty set once it is deleted.
    pub fn watch_by_id(&self, id: i64) -> LiveQuery<MenuItems> {
        LiveQuery::new(
            MenuItems {
                repo: self.clone(),
                id: Some(id),
            },
            self.changes.subscribe(),
        )
    }
}

/// Live source: the whole menu, or a single item.
pub struct MenuItems {
    repo: MenuItemRepository,
    id: Option<i64>,
}

#[async_trait]
impl LiveSource for MenuItems {
    type Item = MenuItem;

    fn table(&self) -> Table {
        Table::MenuItems
    }

    async fn fetch(&self) -> DbResult<Vec<MenuItem>> {
        match self.id {
            Some(id) => Ok(self.repo.get_by_id(id).await?.into_iter().collect()),
            None => self.repo.list_all().await,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

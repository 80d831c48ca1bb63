//! # First-Run Seed
//!
//! Fills an empty catalog with a starter menu.
//!
//! Each row is its own statement; a crash mid-seed leaves a partial menu,
//! which the next `seed_if_empty` will not touch because the catalog is no
//! longer empty. Running [`seed`] again by hand fills in whatever is missing.

use resto_core::{Money, NewMenuItem};
use tracing::{debug, info};

use crate::error::DbResult;
use crate::pool::Database;

/// Category names, in menu order.
pub const CATEGORIES: &[&str] = &["Starters", "Main Course", "Desserts", "Beverages"];

/// `(name, description, price, category, parcel_charge)`, prices in major units.
const MENU: &[(&str, &str, i64, &str, i64)] = &[
    ("Paneer Tikka", "Grilled cottage cheese cubes", 250, "Starters", 0),
    ("Veg Seekh Kebab", "Minced vegetables on skewers", 220, "Starters", 0),
    ("Chicken 65", "Spicy fried chicken", 280, "Starters", 0),
    ("Chicken Biryani", "Aromatic rice dish with chicken", 350, "Main Course", 0),
    ("Palak Paneer", "Cottage cheese in spinach gravy", 300, "Main Course", 0),
    ("Mutton Rogan Josh", "Aromatic lamb curry", 450, "Main Course", 0),
    ("Gulab Jamun", "Sweet milk dumplings", 100, "Desserts", 0),
    ("Rasmalai", "Spongy cheese dumplings in milk", 120, "Desserts", 0),
    ("Gajar Ka Halwa", "Carrot pudding", 150, "Desserts", 0),
    ("Coke", "Cold drink", 40, "Beverages", 5),
    ("Fresh Lime Soda", "Refreshing lemon drink", 60, "Beverages", 0),
    ("Masala Chai", "Spiced tea", 50, "Beverages", 0),
];

/// The starter menu as insertable items.
pub fn starter_menu() -> Vec<NewMenuItem> {
    MENU.iter()
        .map(|&(name, description, price, category, parcel)| {
            NewMenuItem::new(name, Money::from_major_minor(price, 0), category)
                .with_description(description)
                .with_parcel_charge(Money::from_major_minor(parcel, 0))
        })
        .collect()
}

/// Seeds only when there are no categories and no menu items.
///
/// ## Returns
/// `true` if the seed ran.
pub async fn seed_if_empty(db: &Database) -> DbResult<bool> {
    let categories = db.categories().count().await?;
    let items = db.menu_items().count().await?;

    if categories > 0 || items > 0 {
        debug!(categories, items, "Catalog present, skipping seed");
        return Ok(false);
    }

    seed(db).await?;
    Ok(true)
}

/// Inserts every starter category and item that is not there yet.
///
/// Items are matched by name within their category.
///
/// ## Returns
/// `(categories_added, items_added)`
pub async fn seed(db: &Database) -> DbResult<(usize, usize)> {
    let categories = db.categories();
    let menu_items = db.menu_items();

    let mut categories_added = 0;
    for name in CATEGORIES {
        if categories.get_by_name(name).await?.is_none() {
            categories.insert(name).await?;
            categories_added += 1;
        }
    }

    let existing = menu_items.list_all().await?;
    let mut items_added = 0;
    for item in starter_menu() {
        let present = existing
            .iter()
            .any(|e| e.name == item.name && e.category == item.category);
        if !present {
            menu_items.insert(&item).await?;
            items_added += 1;
        }
    }

    info!(categories_added, items_added, "Seeded starter menu");
    Ok((categories_added, items_added))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DbConfig;

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_seed_if_empty_runs_once() {
        let db = setup().await;

        assert!(seed_if_empty(&db).await.unwrap());
        assert!(!seed_if_empty(&db).await.unwrap());

        assert_eq!(db.categories().count().await.unwrap(), 4);
        assert_eq!(db.menu_items().count().await.unwrap(), 12);
    }

    #[tokio::test]
    async fn test_seed_contents() {
        let db = setup().await;
        seed(&db).await.unwrap();

        let menu = db.menu_items().list_all().await.unwrap();
        let coke = menu.iter().find(|i| i.name == "Coke").unwrap();
        assert_eq!(coke.price, Money::from_cents(4_000));
        assert_eq!(coke.parcel_charge, Money::from_cents(500));
        assert_eq!(coke.category, "Beverages");

        let tikka = menu.iter().find(|i| i.name == "Paneer Tikka").unwrap();
        assert_eq!(tikka.price, Money::from_cents(25_000));
        assert!(tikka.parcel_charge.is_zero());
        assert!(tikka.in_stock && tikka.takeaway_available);

        for item in &menu {
            assert!(CATEGORIES.contains(&item.category.as_str()));
        }
    }

    #[tokio::test]
    async fn test_seed_fills_gaps() {
        let db = setup().await;
        db.categories().insert("Starters").await.unwrap();

        let (categories, items) = seed(&db).await.unwrap();
        assert_eq!(categories, 3);
        assert_eq!(items, 12);

        assert_eq!(seed(&db).await.unwrap(), (0, 0));
    }

    #[tokio::test]
    async fn test_seed_skipped_for_partial_catalog() {
        let db = setup().await;
        db.categories().insert("Specials").await.unwrap();

        assert!(!seed_if_empty(&db).await.unwrap());
        assert_eq!(db.menu_items().count().await.unwrap(), 0);
    }
}

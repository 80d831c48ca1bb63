//! End-to-end tests of the command layer against a seeded in-memory database.
//!
//! Seeded menu ids follow the starter menu order: 1 Paneer Tikka (250),
//! 7 Gulab Jamun (100), 10 Coke (40, parcel 5), 12 Masala Chai (50).

use std::time::Duration;

use resto_core::{Money, NewMenuItem, OrderStatus};
use resto_kiosk::commands::catalog::{self, MenuItemChanges};
use resto_kiosk::commands::{cart, menu, order};
use resto_kiosk::{AppContext, ErrorCode, KioskConfig};

const PANEER_TIKKA: i64 = 1;
const GULAB_JAMUN: i64 = 7;
const COKE: i64 = 10;
const MASALA_CHAI: i64 = 12;

async fn setup() -> AppContext {
    AppContext::in_memory(KioskConfig::default()).await.unwrap()
}

async fn setup_with_pin(pin: &str) -> AppContext {
    let config = KioskConfig {
        staff_pin: Some(pin.to_string()),
        ..KioskConfig::default()
    };
    AppContext::in_memory(config).await.unwrap()
}

/// Places one Coke (1 dine-in, 2 takeaway) for `name`.
async fn place_coke_order(ctx: &AppContext, name: &str) -> i64 {
    let handle = cart::add_to_cart(ctx, COKE).await.unwrap().handle;
    cart::set_takeaway_quantity(ctx, handle, 2).unwrap();
    order::place_order(ctx, name).await.unwrap().order_id
}

// =============================================================================
// Menu
// =============================================================================

#[tokio::test]
async fn test_menu_grouped_in_category_order() {
    let ctx = setup().await;
    let sections = menu::get_menu(&ctx).await.unwrap();

    let names: Vec<_> = sections.iter().map(|s| s.category.as_str()).collect();
    assert_eq!(names, vec!["Starters", "Main Course", "Desserts", "Beverages"]);
    assert!(sections.iter().all(|s| s.items.len() == 3));
}

#[tokio::test]
async fn test_menu_item_not_found() {
    let ctx = setup().await;
    let err = menu::get_menu_item(&ctx, 999).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}

// =============================================================================
// Cart
// =============================================================================

#[tokio::test]
async fn test_add_same_item_increments_dine_in() {
    let ctx = setup().await;

    let first = cart::add_to_cart(&ctx, PANEER_TIKKA).await.unwrap();
    let second = cart::add_to_cart(&ctx, PANEER_TIKKA).await.unwrap();
    cart::add_to_cart(&ctx, GULAB_JAMUN).await.unwrap();

    assert_eq!(first.handle, second.handle);

    let snapshot = cart::get_cart(&ctx);
    assert_eq!(snapshot.lines.len(), 2);
    assert_eq!(snapshot.lines[0].dine_in_quantity, 2);
    assert_eq!(snapshot.lines[1].dine_in_quantity, 1);
    assert_eq!(snapshot.subtotal, Money::from_cents(60_000));
}

#[tokio::test]
async fn test_add_rejects_unknown_and_out_of_stock() {
    let ctx = setup().await;

    let err = cart::add_to_cart(&ctx, 999).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);

    catalog::set_item_in_stock(&ctx, MASALA_CHAI, false).await.unwrap();
    let err = cart::add_to_cart(&ctx, MASALA_CHAI).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
    assert!(cart::get_cart(&ctx).is_empty());
}

#[tokio::test]
async fn test_quantities_clamp_and_totals() {
    let ctx = setup().await;
    let handle = cart::add_to_cart(&ctx, COKE).await.unwrap().handle;

    let snapshot = cart::set_takeaway_quantity(&ctx, handle, 2).unwrap();
    assert_eq!(snapshot.subtotal, Money::from_cents(12_000));
    assert_eq!(snapshot.parcel_charges, Money::from_cents(1_000));
    assert_eq!(snapshot.grand_total, Money::from_cents(13_000));

    // Zeroed lines stay in the cart
    let snapshot = cart::set_dine_in_quantity(&ctx, handle, -5).unwrap();
    assert_eq!(snapshot.lines[0].dine_in_quantity, 0);
    let snapshot = cart::set_takeaway_quantity(&ctx, handle, -1).unwrap();
    assert_eq!(snapshot.lines.len(), 1);
    assert!(snapshot.grand_total.is_zero());
}

#[tokio::test]
async fn test_large_quantities_are_kept() {
    let ctx = setup().await;
    let handle = cart::add_to_cart(&ctx, COKE).await.unwrap().handle;

    let snapshot = cart::set_dine_in_quantity(&ctx, handle, 5_000).unwrap();
    assert_eq!(snapshot.lines[0].dine_in_quantity, 5_000);
    assert_eq!(snapshot.grand_total, Money::from_cents(4_000 * 5_000));

    let snapshot = cart::add_to_cart(&ctx, COKE).await.unwrap().cart;
    assert_eq!(snapshot.lines[0].dine_in_quantity, 5_001);
}

#[tokio::test]
async fn test_takeaway_rejected_for_dine_in_only_item() {
    let ctx = setup().await;
    catalog::set_item_takeaway(&ctx, GULAB_JAMUN, false).await.unwrap();

    let handle = cart::add_to_cart(&ctx, GULAB_JAMUN).await.unwrap().handle;
    let err = cart::set_takeaway_quantity(&ctx, handle, 1).unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    // Zero is always allowed
    assert!(cart::set_takeaway_quantity(&ctx, handle, 0).is_ok());
}

#[tokio::test]
async fn test_stale_handles() {
    let ctx = setup().await;
    let handle = cart::add_to_cart(&ctx, COKE).await.unwrap().handle;

    let snapshot = cart::remove_from_cart(&ctx, handle);
    assert!(snapshot.is_empty());

    // Removing again is a no-op, editing is not found
    assert!(cart::remove_from_cart(&ctx, handle).is_empty());
    let err = cart::set_dine_in_quantity(&ctx, handle, 3).unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
    let err = cart::set_instructions(&ctx, handle, "no ice").unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn test_cart_subscribers_follow_commands() {
    let ctx = setup().await;
    let mut updates = ctx.cart().subscribe();

    cart::add_to_cart(&ctx, COKE).await.unwrap();
    updates.changed().await.unwrap();
    assert_eq!(updates.borrow_and_update().grand_total, Money::from_cents(4_000));

    cart::clear_cart(&ctx);
    updates.changed().await.unwrap();
    assert!(updates.borrow_and_update().is_empty());
}

// =============================================================================
// Placing Orders
// =============================================================================

#[tokio::test]
async fn test_place_order_snapshots_cart_and_clears_it() {
    let ctx = setup().await;

    let handle = cart::add_to_cart(&ctx, COKE).await.unwrap().handle;
    cart::set_takeaway_quantity(&ctx, handle, 2).unwrap();
    cart::set_instructions(&ctx, handle, "no ice").unwrap();

    let placed = order::place_order(&ctx, "  Alice ").await.unwrap();
    assert!(placed.order_id > 0);
    assert_eq!(placed.customer_name, "Alice");
    assert_eq!(placed.total, Money::from_cents(13_000));
    assert!(cart::get_cart(&ctx).is_empty());

    let view = order::get_order(&ctx, placed.order_id).await.unwrap();
    assert_eq!(view.status, OrderStatus::Pending);
    assert_eq!(view.customer_name, "Alice");
    assert_eq!(view.total, Money::from_cents(13_000));
    assert_eq!(view.lines.len(), 1);
    assert_eq!(view.lines[0].menu_item.id, COKE);
    assert_eq!(view.lines[0].dine_in_quantity, 1);
    assert_eq!(view.lines[0].takeaway_quantity, 2);
    assert_eq!(view.lines[0].instructions, "no ice");
}

#[tokio::test]
async fn test_snapshot_survives_catalog_edits() {
    let ctx = setup().await;
    let id = place_coke_order(&ctx, "Alice").await;

    let changes = MenuItemChanges {
        price: Some(Money::from_cents(9_900)),
        ..MenuItemChanges::default()
    };
    catalog::update_menu_item(&ctx, COKE, changes).await.unwrap();
    catalog::remove_menu_item(&ctx, COKE).await.unwrap();

    let view = order::get_order(&ctx, id).await.unwrap();
    assert_eq!(view.lines[0].menu_item.price, Money::from_cents(4_000));
    assert_eq!(view.total, Money::from_cents(13_000));
}

#[tokio::test]
async fn test_failed_placement_keeps_cart() {
    let ctx = setup().await;

    let err = order::place_order(&ctx, "Alice").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    cart::add_to_cart(&ctx, PANEER_TIKKA).await.unwrap();
    let err = order::place_order(&ctx, "   ").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    assert_eq!(cart::get_cart(&ctx).lines.len(), 1);
    assert!(order::list_orders(&ctx, &[]).await.unwrap().is_empty());
}

// =============================================================================
// Staff Dashboard
// =============================================================================

#[tokio::test]
async fn test_order_workflow() {
    let ctx = setup().await;
    let id = place_coke_order(&ctx, "Alice").await;

    let view = order::get_order(&ctx, id).await.unwrap();
    assert_eq!(view.actions.len(), 2);

    let view = order::accept_order(&ctx, id).await.unwrap();
    assert_eq!(view.status, OrderStatus::Accepted);
    let view = order::complete_order(&ctx, id).await.unwrap();
    assert_eq!(view.status, OrderStatus::Completed);
    assert!(view.actions.is_empty());

    let completed = order::list_orders(&ctx, &[OrderStatus::Completed]).await.unwrap();
    assert_eq!(completed.len(), 1);
    let active = order::list_orders(&ctx, &[OrderStatus::Pending, OrderStatus::Accepted])
        .await
        .unwrap();
    assert!(active.is_empty());
}

#[tokio::test]
async fn test_illegal_transitions_leave_order_untouched() {
    let ctx = setup().await;
    let id = place_coke_order(&ctx, "Alice").await;

    let err = order::complete_order(&ctx, id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::IllegalTransition);

    order::reject_order(&ctx, id).await.unwrap();
    let err = order::accept_order(&ctx, id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::IllegalTransition);

    let view = order::get_order(&ctx, id).await.unwrap();
    assert_eq!(view.status, OrderStatus::Rejected);

    let err = order::accept_order(&ctx, 9_999).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn test_clear_terminal_orders() {
    let ctx = setup().await;
    let pending = place_coke_order(&ctx, "P").await;
    let accepted = place_coke_order(&ctx, "A").await;
    let completed = place_coke_order(&ctx, "C").await;
    let rejected = place_coke_order(&ctx, "R").await;

    order::accept_order(&ctx, accepted).await.unwrap();
    order::accept_order(&ctx, completed).await.unwrap();
    order::complete_order(&ctx, completed).await.unwrap();
    order::reject_order(&ctx, rejected).await.unwrap();

    let err = order::clear_orders(&ctx, &[OrderStatus::Pending]).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
    let err = order::clear_orders(&ctx, &[]).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    let removed = order::clear_orders(&ctx, &[OrderStatus::Completed, OrderStatus::Rejected])
        .await
        .unwrap();
    assert_eq!(removed, 2);

    let mut left: Vec<_> = order::list_orders(&ctx, &[])
        .await
        .unwrap()
        .into_iter()
        .map(|o| o.id)
        .collect();
    left.sort();
    assert_eq!(left, vec![pending, accepted]);
}

#[tokio::test]
async fn test_orders_listed_newest_first() {
    let ctx = setup().await;
    let first = place_coke_order(&ctx, "First").await;
    let second = place_coke_order(&ctx, "Second").await;

    let ids: Vec<_> = order::list_orders(&ctx, &[])
        .await
        .unwrap()
        .into_iter()
        .map(|o| o.id)
        .collect();
    assert_eq!(ids, vec![second, first]);
}

#[tokio::test]
async fn test_watch_orders_sees_new_order() {
    let ctx = setup().await;
    let mut pending = order::watch_orders(&ctx, &[OrderStatus::Pending]).unwrap();

    assert!(pending.next().await.unwrap().unwrap().is_empty());

    let id = place_coke_order(&ctx, "Alice").await;
    let set = tokio::time::timeout(Duration::from_secs(5), pending.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(set.len(), 1);
    assert_eq!(set[0].id, id);

    order::accept_order(&ctx, id).await.unwrap();
    let set = tokio::time::timeout(Duration::from_secs(5), pending.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert!(set.is_empty());
}

#[tokio::test]
async fn test_watch_menu_sees_stock_change() {
    let ctx = setup().await;
    let mut live = menu::watch_menu(&ctx);

    let items = live.next().await.unwrap().unwrap();
    assert_eq!(items.len(), 12);
    assert!(items.iter().all(|i| i.in_stock));

    catalog::set_item_in_stock(&ctx, 4, false).await.unwrap();
    let items = tokio::time::timeout(Duration::from_secs(5), live.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    let biryani = items.iter().find(|i| i.id == 4).unwrap();
    assert!(!biryani.in_stock);
}

#[tokio::test]
async fn test_staff_gate() {
    let ctx = setup_with_pin("4321").await;

    // Customers can still order
    let id = place_coke_order(&ctx, "Alice").await;

    let err = order::list_orders(&ctx, &[]).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::Unauthorized);
    let err = order::accept_order(&ctx, id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::Unauthorized);
    let err = catalog::add_category(&ctx, "Specials").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::Unauthorized);
    assert!(order::watch_orders(&ctx, &[]).is_err());

    assert_eq!(ctx.staff().unlock("1111").unwrap_err().code, ErrorCode::Unauthorized);
    ctx.staff().unlock("4321").unwrap();
    order::accept_order(&ctx, id).await.unwrap();

    ctx.staff().lock();
    assert!(order::list_orders(&ctx, &[]).await.is_err());
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn test_category_management() {
    let ctx = setup().await;

    let specials = catalog::add_category(&ctx, "Specials").await.unwrap();
    let err = catalog::add_category(&ctx, "Specials").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    catalog::rename_category(&ctx, specials.id, "Chef Specials").await.unwrap();
    let names: Vec<_> = catalog::list_categories(&ctx)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert!(names.contains(&"Chef Specials".to_string()));

    let err = catalog::remove_category(&ctx, 9_999).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn test_removing_category_keeps_items() {
    let ctx = setup().await;
    let desserts = catalog::list_categories(&ctx)
        .await
        .unwrap()
        .into_iter()
        .find(|c| c.name == "Desserts")
        .unwrap();

    catalog::remove_category(&ctx, desserts.id).await.unwrap();

    let sections = menu::get_menu(&ctx).await.unwrap();
    let last = sections.last().unwrap();
    assert_eq!(last.category, "Desserts");
    assert_eq!(last.items.len(), 3);
}

#[tokio::test]
async fn test_menu_item_management() {
    let ctx = setup().await;

    let dosa = NewMenuItem::new("Masala Dosa", Money::from_cents(18_000), "Main Course")
        .with_parcel_charge(Money::from_cents(1_000));
    let stored = catalog::add_menu_item(&ctx, dosa).await.unwrap();
    assert!(stored.id > MASALA_CHAI);

    let invalid = NewMenuItem::new("Free Lunch", Money::from_cents(-100), "Main Course");
    let err = catalog::add_menu_item(&ctx, invalid).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    let overpriced = NewMenuItem::new("Gold Thali", Money::from_major_f64(1e17), "Main Course");
    let err = catalog::add_menu_item(&ctx, overpriced).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    let changes = MenuItemChanges {
        price: Some(Money::from_major_f64(1e17)),
        ..MenuItemChanges::default()
    };
    let err = catalog::update_menu_item(&ctx, stored.id, changes).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    let changes = MenuItemChanges {
        name: Some("Mysore Masala Dosa".into()),
        ..MenuItemChanges::default()
    };
    let updated = catalog::update_menu_item(&ctx, stored.id, changes).await.unwrap();
    assert_eq!(updated.name, "Mysore Masala Dosa");
    assert_eq!(updated.price, Money::from_cents(18_000));

    let err = catalog::update_menu_item(&ctx, stored.id, MenuItemChanges::default())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    catalog::remove_menu_item(&ctx, stored.id).await.unwrap();
    let err = catalog::remove_menu_item(&ctx, stored.id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);

    let changes = MenuItemChanges {
        in_stock: Some(false),
        ..MenuItemChanges::default()
    };
    let err = catalog::update_menu_item(&ctx, stored.id, changes).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn test_seed_menu_fills_gaps() {
    let ctx = setup().await;
    catalog::remove_menu_item(&ctx, COKE).await.unwrap();

    let report = catalog::seed_menu(&ctx).await.unwrap();
    assert_eq!(report.categories_added, 0);
    assert_eq!(report.items_added, 1);
}

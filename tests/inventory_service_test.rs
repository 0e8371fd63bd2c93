mod common;

use assert_matches::assert_matches;
use common::{item, stock, variation, TestApp};
use repair_shop_api::{
    errors::ServiceError,
    services::inventory::{ItemQuery, UpdateItemInput, VariationInput},
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

fn money(value: Decimal) -> Decimal {
    value.round_dp(2)
}

fn priced(sku: &str) -> VariationInput {
    let mut v = variation(sku, dec!(100));
    v.tax = dec!(10);
    v.shipping = dec!(5);
    v.markup = dec!(20);
    v
}

fn resubmit(v: &repair_shop_api::entities::inventory_variation::Model) -> VariationInput {
    VariationInput {
        id: Some(v.id),
        name: v.name.clone(),
        sku: v.sku.clone(),
        raw_price: money(v.raw_price),
        tax: v.tax.round_dp(3),
        shipping: money(v.shipping),
        markup: v.markup.round_dp(3),
        use_default_rates: v.use_default_rates,
        image_url: v.image_url.clone(),
        stock_levels: Vec::new(),
    }
}

fn as_update(detail: &repair_shop_api::services::inventory::ItemDetail) -> UpdateItemInput {
    UpdateItemInput {
        name: detail.item.name.clone(),
        description: detail.item.description.clone(),
        category: detail.item.category.clone(),
        brand: detail.item.brand.clone(),
        image_url: detail.item.image_url.clone(),
        variations: detail
            .variations
            .iter()
            .map(|v| resubmit(&v.variation))
            .collect(),
    }
}

#[tokio::test]
async fn create_item_derives_prices_and_stores_stock() {
    let app = TestApp::new().await;
    let downtown = app.create_location("Downtown").await;
    let mall = app.create_location("Westside Mall").await;
    let inventory = &app.state.services.inventory;

    let mut screen = priced("IP15-SCR");
    screen.stock_levels = vec![stock(downtown.id, 4), stock(mall.id, 3)];

    let detail = inventory
        .create_item(item("iPhone 15 Screen", vec![screen]))
        .await
        .expect("create item");

    assert_eq!(detail.item.name, "iPhone 15 Screen");
    assert_eq!(detail.variations.len(), 1);

    let v = &detail.variations[0];
    assert_eq!(money(v.variation.cost), dec!(115));
    assert_eq!(money(v.variation.total_cost), dec!(138));
    assert_eq!(money(v.variation.profit), dec!(23));
    assert_eq!(money(v.variation.selling_price), dec!(138));
    assert_eq!(v.stock_levels.len(), 2);
    assert_eq!(v.total_stock, 7);
}

#[tokio::test]
async fn default_rate_variations_use_fallback_until_rates_are_stored() {
    let app = TestApp::new().await;
    let inventory = &app.state.services.inventory;

    let mut battery = variation("S23-BAT", dec!(200));
    battery.use_default_rates = true;
    battery.markup = dec!(10);
    // Ignored while default rates apply
    battery.tax = dec!(99);
    battery.shipping = dec!(999);

    let detail = inventory
        .create_item(item("Galaxy S23 Battery", vec![battery]))
        .await
        .expect("create item");

    // 8.25% tax and 5% shipping from the configured fallback
    let v = &detail.variations[0].variation;
    assert_eq!(money(v.cost), dec!(226.50));
    assert_eq!(money(v.total_cost), dec!(249.15));
    assert_eq!(money(v.profit), dec!(22.65));
}

#[tokio::test]
async fn create_item_rejects_duplicate_and_taken_skus() {
    let app = TestApp::new().await;
    let inventory = &app.state.services.inventory;

    let result = inventory
        .create_item(item("Dup", vec![priced("SKU-1"), priced("SKU-1")]))
        .await;
    assert_matches!(result, Err(ServiceError::ValidationError(_)));

    inventory
        .create_item(item("First", vec![priced("SKU-1")]))
        .await
        .expect("create first");
    let result = inventory
        .create_item(item("Second", vec![priced("SKU-1")]))
        .await;
    assert_matches!(result, Err(ServiceError::Conflict(_)));

    // Nothing from the failed request was persisted
    let page = inventory
        .list_items(ItemQuery {
            page: 1,
            per_page: 20,
            ..Default::default()
        })
        .await
        .expect("list");
    assert_eq!(page.total, 1);
}

#[tokio::test]
async fn create_item_with_unknown_location_rolls_back() {
    let app = TestApp::new().await;
    let inventory = &app.state.services.inventory;

    let mut v = priced("GHOST-1");
    v.stock_levels = vec![stock(Uuid::new_v4(), 1)];
    let result = inventory.create_item(item("Ghost", vec![v])).await;
    assert_matches!(result, Err(ServiceError::NotFound(_)));

    let page = inventory
        .list_items(ItemQuery {
            page: 1,
            per_page: 20,
            ..Default::default()
        })
        .await
        .expect("list");
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn negative_prices_are_rejected() {
    let app = TestApp::new().await;
    let mut v = priced("NEG-1");
    v.raw_price = dec!(-1);

    let result = app
        .state
        .services
        .inventory
        .create_item(item("Negative", vec![v]))
        .await;
    assert_matches!(result, Err(ServiceError::ValidationError(msg)) if msg.contains("raw_price"));
}

#[tokio::test]
async fn list_items_filters_and_aggregates_stock() {
    let app = TestApp::new().await;
    let downtown = app.create_location("Downtown").await;
    let inventory = &app.state.services.inventory;

    let mut a = priced("A-1");
    a.stock_levels = vec![stock(downtown.id, 2)];
    let mut b = priced("A-2");
    b.stock_levels = vec![stock(downtown.id, 5)];
    inventory
        .create_item(item("iPad Air Screen", vec![a, b]))
        .await
        .expect("create");

    let mut charger = item("USB-C Charger", vec![priced("CH-1")]);
    charger.category = Some("Accessories".to_string());
    inventory.create_item(charger).await.expect("create");

    let all = inventory
        .list_items(ItemQuery {
            page: 1,
            per_page: 20,
            ..Default::default()
        })
        .await
        .expect("list");
    assert_eq!(all.total, 2);
    // Ordered by name
    assert_eq!(all.items[0].item.name, "USB-C Charger");
    assert_eq!(all.items[1].variation_count, 2);
    assert_eq!(all.items[1].total_stock, 7);

    let screens = inventory
        .list_items(ItemQuery {
            category: Some("Screens".to_string()),
            page: 1,
            per_page: 20,
            ..Default::default()
        })
        .await
        .expect("list");
    assert_eq!(screens.total, 1);

    let search = inventory
        .list_items(ItemQuery {
            search: Some("Charger".to_string()),
            page: 1,
            per_page: 1,
            ..Default::default()
        })
        .await
        .expect("list");
    assert_eq!(search.total, 1);
    assert_eq!(search.items[0].item.name, "USB-C Charger");
}

#[tokio::test]
async fn update_item_reconciles_variations() {
    let app = TestApp::new().await;
    let downtown = app.create_location("Downtown").await;
    let inventory = &app.state.services.inventory;

    let mut keep = priced("KEEP-1");
    keep.stock_levels = vec![stock(downtown.id, 3)];
    let mut discard = priced("DROP-1");
    discard.stock_levels = vec![stock(downtown.id, 9)];
    let detail = inventory
        .create_item(item("Pixel 8 Screen", vec![keep, discard]))
        .await
        .expect("create");
    let dropped_id = detail
        .variations
        .iter()
        .find(|v| v.variation.sku == "DROP-1")
        .map(|v| v.variation.id)
        .expect("dropped variation");

    let mut update = as_update(&detail);
    update.name = "Pixel 8 OLED Screen".to_string();
    update.variations.retain(|v| v.sku == "KEEP-1");
    update.variations[0].raw_price = dec!(50);
    update.variations.push(priced("NEW-1"));

    let updated = inventory
        .update_item(detail.item.id, update)
        .await
        .expect("update");

    assert_eq!(updated.item.name, "Pixel 8 OLED Screen");
    let skus: Vec<&str> = updated
        .variations
        .iter()
        .map(|v| v.variation.sku.as_str())
        .collect();
    assert_eq!(skus.len(), 2);
    assert!(skus.contains(&"KEEP-1"));
    assert!(skus.contains(&"NEW-1"));

    let kept = updated
        .variations
        .iter()
        .find(|v| v.variation.sku == "KEEP-1")
        .expect("kept variation");
    // 50 + 5 tax + 5 shipping = 60, +20% = 72
    assert_eq!(money(kept.variation.total_cost), dec!(72));
    // Stock untouched when the update omits stock levels
    assert_eq!(kept.total_stock, 3);

    let result = inventory.stock_levels(dropped_id).await;
    assert_matches!(result, Err(ServiceError::NotFound(_)));
}

#[tokio::test]
async fn update_item_rejects_foreign_variation_ids() {
    let app = TestApp::new().await;
    let inventory = &app.state.services.inventory;

    let first = inventory
        .create_item(item("First", vec![priced("F-1")]))
        .await
        .expect("create");
    let second = inventory
        .create_item(item("Second", vec![priced("S-1")]))
        .await
        .expect("create");

    let mut update = as_update(&first);
    update.variations[0].id = Some(second.variations[0].variation.id);

    let result = inventory.update_item(first.item.id, update).await;
    assert_matches!(result, Err(ServiceError::ValidationError(_)));

    // First item is unchanged
    let reloaded = inventory.get_item(first.item.id).await.expect("get");
    assert_eq!(reloaded.variations[0].variation.sku, "F-1");
}

#[tokio::test]
async fn delete_item_removes_variations_and_stock() {
    let app = TestApp::new().await;
    let downtown = app.create_location("Downtown").await;
    let inventory = &app.state.services.inventory;

    let mut v = priced("DEL-1");
    v.stock_levels = vec![stock(downtown.id, 1)];
    let detail = inventory
        .create_item(item("To delete", vec![v]))
        .await
        .expect("create");
    let variation_id = detail.variations[0].variation.id;

    inventory.delete_item(detail.item.id).await.expect("delete");

    assert_matches!(
        inventory.get_item(detail.item.id).await,
        Err(ServiceError::NotFound(_))
    );
    assert_matches!(
        inventory.stock_levels(variation_id).await,
        Err(ServiceError::NotFound(_))
    );
    assert_matches!(
        inventory.delete_item(detail.item.id).await,
        Err(ServiceError::NotFound(_))
    );
}

#[tokio::test]
async fn duplicate_item_copies_variations_without_stock() {
    let app = TestApp::new().await;
    let downtown = app.create_location("Downtown").await;
    let inventory = &app.state.services.inventory;

    let mut v = priced("DUP-1");
    v.stock_levels = vec![stock(downtown.id, 6)];
    let source = inventory
        .create_item(item("Galaxy Back Glass", vec![v]))
        .await
        .expect("create");

    let copy = inventory
        .duplicate_item(source.item.id)
        .await
        .expect("duplicate");
    assert_ne!(copy.item.id, source.item.id);
    assert_eq!(copy.item.name, "Galaxy Back Glass (Copy)");
    assert_eq!(copy.variations.len(), 1);

    let copied = &copy.variations[0];
    assert_eq!(copied.variation.sku, "DUP-1-COPY");
    assert_eq!(copied.variation.name, source.variations[0].variation.name);
    assert_eq!(
        money(copied.variation.total_cost),
        money(source.variations[0].variation.total_cost)
    );
    assert_eq!(copied.total_stock, 0);

    let again = inventory
        .duplicate_item(source.item.id)
        .await
        .expect("duplicate again");
    assert_eq!(again.variations[0].variation.sku, "DUP-1-COPY-2");
}

#[tokio::test]
async fn variation_lifecycle() {
    let app = TestApp::new().await;
    let inventory = &app.state.services.inventory;

    let detail = inventory
        .create_item(item("Charging Port", vec![]))
        .await
        .expect("create");
    assert!(detail.variations.is_empty());

    let added = inventory
        .add_variation(detail.item.id, priced("PORT-1"))
        .await
        .expect("add");
    assert_eq!(money(added.variation.total_cost), dec!(138));

    let mut change = priced("PORT-1A");
    change.id = Some(added.variation.id);
    change.markup = dec!(0);
    let updated = inventory
        .update_variation(added.variation.id, change)
        .await
        .expect("update");
    assert_eq!(updated.variation.sku, "PORT-1A");
    assert_eq!(money(updated.variation.total_cost), dec!(115));

    let mut mismatched = priced("PORT-1B");
    mismatched.id = Some(Uuid::new_v4());
    assert_matches!(
        inventory
            .update_variation(added.variation.id, mismatched)
            .await,
        Err(ServiceError::ValidationError(_))
    );

    let copy = inventory
        .duplicate_variation(added.variation.id)
        .await
        .expect("duplicate");
    assert_eq!(copy.variation.item_id, detail.item.id);
    assert_eq!(copy.variation.sku, "PORT-1A-COPY");
    assert!(copy.variation.name.ends_with(" (Copy)"));

    inventory
        .delete_variation(added.variation.id)
        .await
        .expect("delete");
    let reloaded = inventory.get_item(detail.item.id).await.expect("get");
    assert_eq!(reloaded.variations.len(), 1);
    assert_eq!(reloaded.variations[0].variation.id, copy.variation.id);

    assert_matches!(
        inventory.add_variation(Uuid::new_v4(), priced("ORPHAN")).await,
        Err(ServiceError::NotFound(_))
    );
}

#[tokio::test]
async fn set_and_adjust_stock() {
    let app = TestApp::new().await;
    let downtown = app.create_location("Downtown").await;
    let airport = app.create_location("Airport Kiosk").await;
    let inventory = &app.state.services.inventory;

    let detail = inventory
        .create_item(item("Battery", vec![priced("BAT-1")]))
        .await
        .expect("create");
    let variation_id = detail.variations[0].variation.id;

    let level = inventory
        .set_stock_level(variation_id, downtown.id, 5, Some(dec!(12.5)))
        .await
        .expect("set");
    assert_eq!(level.quantity, 5);

    // Upsert keeps one row per location
    let level = inventory
        .set_stock_level(variation_id, downtown.id, 8, Some(dec!(12.5)))
        .await
        .expect("set again");
    assert_eq!(level.quantity, 8);

    let level = inventory
        .adjust_stock(variation_id, downtown.id, -3)
        .await
        .expect("adjust");
    assert_eq!(level.quantity, 5);
    assert_eq!(level.purchase_cost.map(money), Some(dec!(12.5)));

    // Absent level counts as zero
    let level = inventory
        .adjust_stock(variation_id, airport.id, 2)
        .await
        .expect("adjust new");
    assert_eq!(level.quantity, 2);

    assert_matches!(
        inventory.adjust_stock(variation_id, airport.id, -3).await,
        Err(ServiceError::InsufficientStock(_))
    );
    assert_matches!(
        inventory
            .set_stock_level(variation_id, downtown.id, -1, None)
            .await,
        Err(ServiceError::ValidationError(_))
    );
    assert_matches!(
        inventory
            .set_stock_level(variation_id, Uuid::new_v4(), 1, None)
            .await,
        Err(ServiceError::NotFound(_))
    );

    let levels = inventory.stock_levels(variation_id).await.expect("levels");
    assert_eq!(levels.len(), 2);
    // Ordered by location name
    assert_eq!(levels[0].location_name.as_deref(), Some("Airport Kiosk"));
    assert_eq!(levels[0].level.quantity, 2);
    assert_eq!(levels[1].level.quantity, 5);
}

#[tokio::test]
async fn update_item_can_swap_skus_between_variations() {
    let app = TestApp::new().await;
    let inventory = &app.state.services.inventory;

    let detail = inventory
        .create_item(item("Swap", vec![priced("SWAP-X"), priced("SWAP-Y")]))
        .await
        .expect("create");
    let x_id = detail
        .variations
        .iter()
        .find(|v| v.variation.sku == "SWAP-X")
        .map(|v| v.variation.id)
        .expect("x");

    let mut update = as_update(&detail);
    for v in &mut update.variations {
        v.sku = if v.sku == "SWAP-X" { "SWAP-Y" } else { "SWAP-X" }.to_string();
    }
    let swapped = inventory
        .update_item(detail.item.id, update)
        .await
        .expect("swap");

    let x = swapped
        .variations
        .iter()
        .find(|v| v.variation.id == x_id)
        .expect("x kept");
    assert_eq!(x.variation.sku, "SWAP-Y");
    assert_eq!(swapped.variations.len(), 2);

    // A new variation may take the SKU a kept one gives up
    let mut update = as_update(&swapped);
    for v in &mut update.variations {
        if v.sku == "SWAP-Y" {
            v.sku = "SWAP-Z".to_string();
        }
    }
    update.variations.push(priced("SWAP-Y"));
    let reused = inventory
        .update_item(detail.item.id, update)
        .await
        .expect("reuse freed sku");
    let mut skus: Vec<_> = reused
        .variations
        .iter()
        .map(|v| v.variation.sku.as_str())
        .collect();
    skus.sort_unstable();
    assert_eq!(skus, ["SWAP-X", "SWAP-Y", "SWAP-Z"]);
}

#[tokio::test]
async fn update_item_still_rejects_sku_held_by_another_item() {
    let app = TestApp::new().await;
    let inventory = &app.state.services.inventory;

    inventory
        .create_item(item("Other", vec![priced("HELD-1")]))
        .await
        .expect("create other");
    let detail = inventory
        .create_item(item("Mine", vec![priced("MINE-1")]))
        .await
        .expect("create mine");

    let mut update = as_update(&detail);
    update.variations[0].sku = "HELD-1".to_string();
    assert_matches!(
        inventory.update_item(detail.item.id, update).await,
        Err(ServiceError::Conflict(msg)) if msg.contains("HELD-1")
    );

    let reloaded = inventory.get_item(detail.item.id).await.expect("get");
    assert_eq!(reloaded.variations[0].variation.sku, "MINE-1");
}

#[tokio::test]
async fn copies_of_max_length_skus_stay_within_limit() {
    let app = TestApp::new().await;
    let inventory = &app.state.services.inventory;
    let long_sku = "L".repeat(64);

    let detail = inventory
        .create_item(item("Long", vec![priced(&long_sku)]))
        .await
        .expect("create");
    let source_id = detail.variations[0].variation.id;

    let first = inventory
        .duplicate_variation(source_id)
        .await
        .expect("first copy");
    let second = inventory
        .duplicate_variation(source_id)
        .await
        .expect("second copy");

    assert_eq!(first.variation.sku, format!("{}-COPY", "L".repeat(59)));
    assert_eq!(second.variation.sku, format!("{}-COPY-2", "L".repeat(57)));
    assert_eq!(second.variation.sku.chars().count(), 64);

    // The copy can be saved back unchanged
    inventory
        .update_variation(first.variation.id, resubmit(&first.variation))
        .await
        .expect("resubmit copy");
}

#[tokio::test]
async fn prices_that_overflow_money_columns_are_rejected() {
    let app = TestApp::new().await;
    let inventory = &app.state.services.inventory;

    let mut huge = variation("HUGE-1", dec!(9999999999.99));
    huge.tax = dec!(100);
    huge.markup = dec!(1000);
    assert_matches!(
        inventory.create_item(item("Huge", vec![huge])).await,
        Err(ServiceError::ValidationError(msg)) if msg.contains("cost")
    );

    let precise = variation("PRECISE-1", dec!(10.005));
    assert_matches!(
        inventory.create_item(item("Precise", vec![precise])).await,
        Err(ServiceError::ValidationError(msg)) if msg.contains("decimal places")
    );

    let page = inventory
        .list_items(ItemQuery {
            page: 1,
            per_page: 10,
            ..Default::default()
        })
        .await
        .expect("list");
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn purchase_cost_is_bounded_like_prices() {
    let app = TestApp::new().await;
    let downtown = app.create_location("Downtown").await;
    let inventory = &app.state.services.inventory;

    let detail = inventory
        .create_item(item("Cable", vec![priced("CBL-1")]))
        .await
        .expect("create");
    let variation_id = detail.variations[0].variation.id;

    for cost in [dec!(10000000000), dec!(1.999), dec!(-0.01)] {
        assert_matches!(
            inventory
                .set_stock_level(variation_id, downtown.id, 1, Some(cost))
                .await,
            Err(ServiceError::ValidationError(msg)) if msg.contains("purchase_cost")
        );
    }
    assert!(inventory
        .stock_levels(variation_id)
        .await
        .expect("levels")
        .is_empty());
}

#[tokio::test]
async fn failed_adjustment_leaves_no_stock_row() {
    let app = TestApp::new().await;
    let downtown = app.create_location("Downtown").await;
    let inventory = &app.state.services.inventory;

    let detail = inventory
        .create_item(item("Camera", vec![priced("CAM-1")]))
        .await
        .expect("create");
    let variation_id = detail.variations[0].variation.id;

    assert_matches!(
        inventory.adjust_stock(variation_id, downtown.id, -1).await,
        Err(ServiceError::InsufficientStock(_))
    );
    assert!(inventory
        .stock_levels(variation_id)
        .await
        .expect("levels")
        .is_empty());

    // Sequential adjustments accumulate on the same row
    for _ in 0..3 {
        inventory
            .adjust_stock(variation_id, downtown.id, 2)
            .await
            .expect("adjust");
    }
    let level = inventory
        .adjust_stock(variation_id, downtown.id, -5)
        .await
        .expect("adjust down");
    assert_eq!(level.quantity, 1);
    assert_eq!(
        inventory
            .stock_levels(variation_id)
            .await
            .expect("levels")
            .len(),
        1
    );
}

#[tokio::test]
async fn unique_violations_from_the_database_map_to_conflict() {
    use repair_shop_api::entities::device_brand;
    use sea_orm::{ActiveModelTrait, Set};

    let app = TestApp::new().await;
    let brand = || device_brand::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set("Pixel".to_string()),
        created_at: Set(chrono::Utc::now()),
    };

    brand().insert(&*app.state.db).await.expect("first brand");
    let err = brand()
        .insert(&*app.state.db)
        .await
        .map_err(ServiceError::from)
        .expect_err("second brand repeats the name");
    assert_matches!(err, ServiceError::Conflict(_));
}

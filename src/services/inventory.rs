use crate::{
    entities::{
        inventory_item, inventory_variation, stock_level, store_location, InventoryItem,
        InventoryVariation, StockLevel, StoreLocation,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::{
        default_rates::current_rates,
        pricing::{self, PricingInput, Rates},
    },
};
use chrono::Utc;
use metrics::counter;
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::OnConflict, ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

const COPY_NAME_SUFFIX: &str = " (Copy)";
const COPY_SKU_SUFFIX: &str = "-COPY";
/// Matches the `length(max = 64)` rule on [`VariationInput::sku`]
pub const MAX_SKU_LEN: usize = 64;
const RENAME_SKU_PREFIX: &str = "__renaming-";

/// Quantity of a variation to hold at one location
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct StockLevelInput {
    pub location_id: Uuid,
    #[validate(range(min = 0))]
    pub quantity: i32,
    pub purchase_cost: Option<Decimal>,
}

/// Variation fields accepted on create and update.
///
/// `id` is only meaningful inside [`UpdateItemInput`]: present means
/// "update this existing variation", absent means "create a new one".
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct VariationInput {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 64))]
    pub sku: String,
    pub raw_price: Decimal,
    #[serde(default)]
    pub tax: Decimal,
    #[serde(default)]
    pub shipping: Decimal,
    #[serde(default)]
    pub markup: Decimal,
    #[serde(default)]
    pub use_default_rates: bool,
    #[validate(url)]
    pub image_url: Option<String>,
    #[serde(default)]
    #[validate]
    pub stock_levels: Vec<StockLevelInput>,
}

impl VariationInput {
    pub fn pricing(&self) -> PricingInput {
        PricingInput {
            raw_price: self.raw_price,
            tax: self.tax,
            shipping: self.shipping,
            markup: self.markup,
            use_default_rates: self.use_default_rates,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateItemInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(max = 100))]
    pub category: Option<String>,
    #[validate(length(max = 100))]
    pub brand: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
    #[serde(default)]
    #[validate]
    pub variations: Vec<VariationInput>,
}

/// Full replacement of an item's fields plus the desired set of variations
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateItemInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(max = 100))]
    pub category: Option<String>,
    #[validate(length(max = 100))]
    pub brand: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
    #[serde(default)]
    #[validate]
    pub variations: Vec<VariationInput>,
}

/// Search and paging for [`InventoryService::list_items`]
#[derive(Debug, Clone, Default)]
pub struct ItemQuery {
    /// Matched against name, brand and category
    pub search: Option<String>,
    pub category: Option<String>,
    /// 1-based
    pub page: u64,
    pub per_page: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VariationDetail {
    #[serde(flatten)]
    pub variation: inventory_variation::Model,
    pub stock_levels: Vec<stock_level::Model>,
    pub total_stock: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ItemDetail {
    #[serde(flatten)]
    pub item: inventory_item::Model,
    pub variations: Vec<VariationDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ItemSummary {
    #[serde(flatten)]
    pub item: inventory_item::Model,
    pub variation_count: u64,
    pub total_stock: i64,
}

#[derive(Debug, Clone)]
pub struct ItemPage {
    pub items: Vec<ItemSummary>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

/// Stock level joined with its location's name
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StockLevelDetail {
    #[serde(flatten)]
    pub level: stock_level::Model,
    pub location_name: Option<String>,
}

fn total_stock(levels: &[stock_level::Model]) -> i64 {
    levels.iter().map(|l| i64::from(l.quantity)).sum()
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Rejects repeated SKUs, variation ids or per-variation locations inside one request
fn check_request_duplicates(variations: &[VariationInput]) -> Result<(), ServiceError> {
    let mut skus = HashSet::new();
    let mut ids = HashSet::new();
    for variation in variations {
        if !skus.insert(variation.sku.trim()) {
            return Err(ServiceError::ValidationError(format!(
                "SKU '{}' appears more than once",
                variation.sku.trim()
            )));
        }
        if let Some(id) = variation.id {
            if !ids.insert(id) {
                return Err(ServiceError::ValidationError(format!(
                    "Variation {} appears more than once",
                    id
                )));
            }
        }
        let mut locations = HashSet::new();
        for level in &variation.stock_levels {
            if !locations.insert(level.location_id) {
                return Err(ServiceError::ValidationError(format!(
                    "Location {} appears more than once for SKU '{}'",
                    level.location_id,
                    variation.sku.trim()
                )));
            }
        }
    }
    Ok(())
}

async fn ensure_unique_sku<C: ConnectionTrait>(
    conn: &C,
    sku: &str,
    exclude: Option<Uuid>,
) -> Result<(), ServiceError> {
    let existing = InventoryVariation::find()
        .filter(inventory_variation::Column::Sku.eq(sku))
        .one(conn)
        .await?;

    match existing {
        Some(v) if Some(v.id) != exclude => Err(ServiceError::Conflict(format!(
            "SKU '{}' is already in use",
            sku
        ))),
        _ => Ok(()),
    }
}

/// Fails when a variation outside `keep` already holds one of `skus`
async fn ensure_skus_available<C: ConnectionTrait>(
    conn: &C,
    skus: Vec<String>,
    keep: &HashSet<Uuid>,
) -> Result<(), ServiceError> {
    if skus.is_empty() {
        return Ok(());
    }
    let holders = InventoryVariation::find()
        .filter(inventory_variation::Column::Sku.is_in(skus))
        .all(conn)
        .await?;

    match holders.into_iter().find(|v| !keep.contains(&v.id)) {
        Some(taken) => Err(ServiceError::Conflict(format!(
            "SKU '{}' is already in use",
            taken.sku
        ))),
        None => Ok(()),
    }
}

/// Moves a variation onto a placeholder SKU so its old one is free for the
/// rest of the transaction
async fn release_sku<C: ConnectionTrait>(
    conn: &C,
    variation: inventory_variation::Model,
) -> Result<inventory_variation::Model, ServiceError> {
    let placeholder = format!("{}{}", RENAME_SKU_PREFIX, variation.id.simple());
    let mut active: inventory_variation::ActiveModel = variation.into();
    active.sku = Set(placeholder);
    Ok(active.update(conn).await?)
}

/// `n`-th copy SKU for `sku` (`-COPY`, then `-COPY-2`, ...), cutting the
/// base so the suffix always fits in [`MAX_SKU_LEN`] characters
fn copy_sku_candidate(sku: &str, n: u32) -> String {
    let suffix = if n <= 1 {
        COPY_SKU_SUFFIX.to_string()
    } else {
        format!("{}-{}", COPY_SKU_SUFFIX, n)
    };
    let room = MAX_SKU_LEN.saturating_sub(suffix.chars().count());
    let base: String = sku.chars().take(room).collect();
    format!("{}{}", base, suffix)
}

/// First free SKU of the form `SKU-COPY`, `SKU-COPY-2`, `SKU-COPY-3`, ...
async fn next_copy_sku<C: ConnectionTrait>(conn: &C, sku: &str) -> Result<String, ServiceError> {
    let mut n = 1u32;
    loop {
        let candidate = copy_sku_candidate(sku, n);
        let taken = InventoryVariation::find()
            .filter(inventory_variation::Column::Sku.eq(candidate.as_str()))
            .one(conn)
            .await?
            .is_some();
        if !taken {
            return Ok(candidate);
        }
        n += 1;
    }
}

async fn find_item<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<inventory_item::Model, ServiceError> {
    InventoryItem::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Inventory item {} not found", id)))
}

async fn find_variation<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<inventory_variation::Model, ServiceError> {
    InventoryVariation::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Variation {} not found", id)))
}

async fn ensure_location<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<(), ServiceError> {
    StoreLocation::find_by_id(id)
        .one(conn)
        .await?
        .map(|_| ())
        .ok_or_else(|| ServiceError::NotFound(format!("Store location {} not found", id)))
}

/// Inserts or updates the level for `(variation_id, location_id)`
async fn upsert_stock_level<C: ConnectionTrait>(
    conn: &C,
    variation_id: Uuid,
    location_id: Uuid,
    quantity: i32,
    purchase_cost: Option<Decimal>,
) -> Result<stock_level::Model, ServiceError> {
    if quantity < 0 {
        return Err(ServiceError::ValidationError(
            "Stock quantity must not be negative".to_string(),
        ));
    }
    if let Some(cost) = purchase_cost {
        pricing::validate_amount("purchase_cost", cost)?;
    }
    ensure_location(conn, location_id).await?;

    let current = lock_stock_level(conn, variation_id, location_id).await?;
    let mut active: stock_level::ActiveModel = current.into();
    active.quantity = Set(quantity);
    active.purchase_cost = Set(purchase_cost);
    active.updated_at = Set(Utc::now());
    Ok(active.update(conn).await?)
}

/// Loads the level for `(variation_id, location_id)` under a row lock,
/// creating a zero level first when none exists
async fn lock_stock_level<C: ConnectionTrait>(
    conn: &C,
    variation_id: Uuid,
    location_id: Uuid,
) -> Result<stock_level::Model, ServiceError> {
    let now = Utc::now();
    let zero = stock_level::ActiveModel {
        id: Set(Uuid::new_v4()),
        variation_id: Set(variation_id),
        location_id: Set(location_id),
        quantity: Set(0),
        purchase_cost: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    StockLevel::insert(zero)
        .on_conflict(
            OnConflict::columns([
                stock_level::Column::VariationId,
                stock_level::Column::LocationId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    StockLevel::find()
        .filter(stock_level::Column::VariationId.eq(variation_id))
        .filter(stock_level::Column::LocationId.eq(location_id))
        .lock_exclusive()
        .one(conn)
        .await?
        .ok_or_else(|| {
            ServiceError::NotFound(format!(
                "Stock level for variation {} at location {} not found",
                variation_id, location_id
            ))
        })
}

async fn upsert_stock_levels<C: ConnectionTrait>(
    conn: &C,
    variation_id: Uuid,
    levels: &[StockLevelInput],
) -> Result<(), ServiceError> {
    for level in levels {
        upsert_stock_level(
            conn,
            variation_id,
            level.location_id,
            level.quantity,
            level.purchase_cost,
        )
        .await?;
    }
    Ok(())
}

async fn insert_variation<C: ConnectionTrait>(
    conn: &C,
    item_id: Uuid,
    input: &VariationInput,
    rates: &Rates,
) -> Result<inventory_variation::Model, ServiceError> {
    let pricing_input = input.pricing();
    let breakdown = pricing::price(&pricing_input, rates)?;
    let sku = input.sku.trim().to_string();
    ensure_unique_sku(conn, &sku, None).await?;

    let now = Utc::now();
    let variation = inventory_variation::ActiveModel {
        id: Set(Uuid::new_v4()),
        item_id: Set(item_id),
        name: Set(input.name.trim().to_string()),
        sku: Set(sku),
        raw_price: Set(pricing_input.raw_price),
        tax: Set(pricing_input.tax),
        shipping: Set(pricing_input.shipping),
        markup: Set(pricing_input.markup),
        use_default_rates: Set(pricing_input.use_default_rates),
        cost: Set(breakdown.cost),
        total_cost: Set(breakdown.total_cost),
        profit: Set(breakdown.profit),
        selling_price: Set(breakdown.selling_price),
        image_url: Set(trimmed(input.image_url.clone())),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await?;

    upsert_stock_levels(conn, variation.id, &input.stock_levels).await?;
    Ok(variation)
}

async fn apply_variation_update<C: ConnectionTrait>(
    conn: &C,
    existing: inventory_variation::Model,
    input: &VariationInput,
    rates: &Rates,
) -> Result<inventory_variation::Model, ServiceError> {
    let pricing_input = input.pricing();
    let breakdown = pricing::price(&pricing_input, rates)?;
    let sku = input.sku.trim().to_string();

    let mut active: inventory_variation::ActiveModel = existing.into();
    active.name = Set(input.name.trim().to_string());
    active.sku = Set(sku);
    active.raw_price = Set(pricing_input.raw_price);
    active.tax = Set(pricing_input.tax);
    active.shipping = Set(pricing_input.shipping);
    active.markup = Set(pricing_input.markup);
    active.use_default_rates = Set(pricing_input.use_default_rates);
    active.cost = Set(breakdown.cost);
    active.total_cost = Set(breakdown.total_cost);
    active.profit = Set(breakdown.profit);
    active.selling_price = Set(breakdown.selling_price);
    active.image_url = Set(trimmed(input.image_url.clone()));
    active.updated_at = Set(Utc::now());
    let variation = active.update(conn).await?;

    upsert_stock_levels(conn, variation.id, &input.stock_levels).await?;
    Ok(variation)
}

async fn copy_variation<C: ConnectionTrait>(
    conn: &C,
    source: &inventory_variation::Model,
    item_id: Uuid,
    name: String,
    rates: &Rates,
) -> Result<inventory_variation::Model, ServiceError> {
    let pricing_input = PricingInput::from(source);
    let breakdown = pricing::derive(&pricing_input, rates);
    pricing::check_breakdown(&breakdown)?;
    let sku = next_copy_sku(conn, &source.sku).await?;
    let now = Utc::now();

    let copy = inventory_variation::ActiveModel {
        id: Set(Uuid::new_v4()),
        item_id: Set(item_id),
        name: Set(name),
        sku: Set(sku),
        raw_price: Set(source.raw_price),
        tax: Set(source.tax),
        shipping: Set(source.shipping),
        markup: Set(source.markup),
        use_default_rates: Set(source.use_default_rates),
        cost: Set(breakdown.cost),
        total_cost: Set(breakdown.total_cost),
        profit: Set(breakdown.profit),
        selling_price: Set(breakdown.selling_price),
        image_url: Set(source.image_url.clone()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await?;
    Ok(copy)
}

/// Deletes a variation and its stock levels
async fn delete_variation_rows<C: ConnectionTrait>(
    conn: &C,
    variation_id: Uuid,
) -> Result<(), ServiceError> {
    StockLevel::delete_many()
        .filter(stock_level::Column::VariationId.eq(variation_id))
        .exec(conn)
        .await?;
    InventoryVariation::delete_by_id(variation_id)
        .exec(conn)
        .await?;
    Ok(())
}

async fn load_detail<C: ConnectionTrait>(
    conn: &C,
    item: inventory_item::Model,
) -> Result<ItemDetail, ServiceError> {
    let variations = InventoryVariation::find()
        .filter(inventory_variation::Column::ItemId.eq(item.id))
        .order_by_asc(inventory_variation::Column::CreatedAt)
        .order_by_asc(inventory_variation::Column::Sku)
        .all(conn)
        .await?;

    let mut levels_by_variation = load_levels(conn, variations.iter().map(|v| v.id)).await?;

    let variations = variations
        .into_iter()
        .map(|variation| {
            let stock_levels = levels_by_variation.remove(&variation.id).unwrap_or_default();
            VariationDetail {
                total_stock: total_stock(&stock_levels),
                variation,
                stock_levels,
            }
        })
        .collect();

    Ok(ItemDetail { item, variations })
}

async fn load_levels<C: ConnectionTrait>(
    conn: &C,
    variation_ids: impl Iterator<Item = Uuid>,
) -> Result<HashMap<Uuid, Vec<stock_level::Model>>, ServiceError> {
    let ids: Vec<Uuid> = variation_ids.collect();
    let mut grouped: HashMap<Uuid, Vec<stock_level::Model>> = HashMap::new();
    if ids.is_empty() {
        return Ok(grouped);
    }

    let levels = StockLevel::find()
        .filter(stock_level::Column::VariationId.is_in(ids))
        .all(conn)
        .await?;
    for level in levels {
        grouped.entry(level.variation_id).or_default().push(level);
    }
    Ok(grouped)
}

/// Inventory catalog: items, their variations and per-location stock
#[derive(Clone)]
pub struct InventoryService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
    fallback_rates: Rates,
}

impl InventoryService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        event_sender: Arc<EventSender>,
        fallback_rates: Rates,
    ) -> Self {
        Self {
            db,
            event_sender,
            fallback_rates,
        }
    }

    /// Creates an item with its variations and their stock levels
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_item(&self, input: CreateItemInput) -> Result<ItemDetail, ServiceError> {
        input.validate()?;
        check_request_duplicates(&input.variations)?;

        let txn = self.db.begin().await?;
        let rates = current_rates(&txn, self.fallback_rates).await?;
        let now = Utc::now();

        let item = inventory_item::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name.trim().to_string()),
            description: Set(trimmed(input.description)),
            category: Set(trimmed(input.category)),
            brand: Set(trimmed(input.brand)),
            image_url: Set(trimmed(input.image_url)),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        for variation in &input.variations {
            insert_variation(&txn, item.id, variation, &rates).await?;
        }

        let detail = load_detail(&txn, item).await?;
        txn.commit().await?;

        counter!("repair_shop.inventory.items_created", 1);
        info!(
            "Created inventory item {} with {} variations",
            detail.item.id,
            detail.variations.len()
        );
        self.event_sender
            .send_or_log(Event::InventoryItemCreated(detail.item.id))
            .await;

        Ok(detail)
    }

    #[instrument(skip(self))]
    pub async fn get_item(&self, id: Uuid) -> Result<ItemDetail, ServiceError> {
        let item = find_item(&*self.db, id).await?;
        load_detail(&*self.db, item).await
    }

    /// Lists items with variation counts and aggregated stock
    #[instrument(skip(self))]
    pub async fn list_items(&self, query: ItemQuery) -> Result<ItemPage, ServiceError> {
        let per_page = query.per_page.max(1);
        let page = query.page.max(1);

        let mut condition = Condition::all();
        if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            condition = condition.add(
                Condition::any()
                    .add(inventory_item::Column::Name.contains(search))
                    .add(inventory_item::Column::Brand.contains(search))
                    .add(inventory_item::Column::Category.contains(search)),
            );
        }
        if let Some(category) = query
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
        {
            condition = condition.add(inventory_item::Column::Category.eq(category));
        }

        let paginator = InventoryItem::find()
            .filter(condition)
            .order_by_asc(inventory_item::Column::Name)
            .order_by_asc(inventory_item::Column::Id)
            .paginate(&*self.db, per_page);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page - 1).await?;

        let item_ids: Vec<Uuid> = items.iter().map(|i| i.id).collect();
        let variations = if item_ids.is_empty() {
            Vec::new()
        } else {
            InventoryVariation::find()
                .filter(inventory_variation::Column::ItemId.is_in(item_ids))
                .all(&*self.db)
                .await?
        };
        let levels = load_levels(&*self.db, variations.iter().map(|v| v.id)).await?;

        let mut per_item: HashMap<Uuid, (u64, i64)> = HashMap::new();
        for variation in &variations {
            let entry = per_item.entry(variation.item_id).or_default();
            entry.0 += 1;
            entry.1 += levels
                .get(&variation.id)
                .map(|l| total_stock(l))
                .unwrap_or(0);
        }

        let items = items
            .into_iter()
            .map(|item| {
                let (variation_count, total_stock) =
                    per_item.get(&item.id).copied().unwrap_or_default();
                ItemSummary {
                    item,
                    variation_count,
                    total_stock,
                }
            })
            .collect();

        Ok(ItemPage {
            items,
            total,
            page,
            per_page,
        })
    }

    /// Updates item fields and reconciles its variations against `input.variations`:
    /// listed ids are updated, entries without id are created and unlisted
    /// variations are deleted with their stock levels.
    #[instrument(skip(self, input))]
    pub async fn update_item(
        &self,
        id: Uuid,
        input: UpdateItemInput,
    ) -> Result<ItemDetail, ServiceError> {
        input.validate()?;
        check_request_duplicates(&input.variations)?;

        let txn = self.db.begin().await?;
        let item = find_item(&txn, id).await?;
        let rates = current_rates(&txn, self.fallback_rates).await?;

        let mut existing: HashMap<Uuid, inventory_variation::Model> = InventoryVariation::find()
            .filter(inventory_variation::Column::ItemId.eq(id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|v| (v.id, v))
            .collect();

        for incoming_id in input.variations.iter().filter_map(|v| v.id) {
            if !existing.contains_key(&incoming_id) {
                return Err(ServiceError::ValidationError(format!(
                    "Variation {} does not belong to item {}",
                    incoming_id, id
                )));
            }
        }

        let keep: HashSet<Uuid> = input.variations.iter().filter_map(|v| v.id).collect();
        let removed: Vec<Uuid> = existing
            .keys()
            .filter(|vid| !keep.contains(vid))
            .copied()
            .collect();
        for variation_id in &removed {
            delete_variation_rows(&txn, *variation_id).await?;
            existing.remove(variation_id);
        }

        let mut active: inventory_item::ActiveModel = item.into();
        active.name = Set(input.name.trim().to_string());
        active.description = Set(trimmed(input.description.clone()));
        active.category = Set(trimmed(input.category.clone()));
        active.brand = Set(trimmed(input.brand.clone()));
        active.image_url = Set(trimmed(input.image_url.clone()));
        active.updated_at = Set(Utc::now());
        let item = active.update(&txn).await?;

        // Uniqueness is judged on the final state, so SKUs may move between
        // variations of this item within one request.
        let final_skus = input
            .variations
            .iter()
            .map(|v| v.sku.trim().to_string())
            .collect();
        ensure_skus_available(&txn, final_skus, &keep).await?;

        for variation in &input.variations {
            let Some(vid) = variation.id else { continue };
            let renamed = existing
                .get(&vid)
                .is_some_and(|current| current.sku != variation.sku.trim());
            if renamed {
                if let Some(current) = existing.remove(&vid) {
                    let released = release_sku(&txn, current).await?;
                    existing.insert(vid, released);
                }
            }
        }

        let mut created = 0usize;
        let mut updated = 0usize;
        for variation in &input.variations {
            match variation.id.and_then(|vid| existing.remove(&vid)) {
                Some(current) => {
                    apply_variation_update(&txn, current, variation, &rates).await?;
                    updated += 1;
                }
                None => {
                    insert_variation(&txn, item.id, variation, &rates).await?;
                    created += 1;
                }
            }
        }

        let detail = load_detail(&txn, item).await?;
        txn.commit().await?;

        counter!("repair_shop.inventory.items_updated", 1);
        info!(
            "Updated inventory item {}: {} variations updated, {} created, {} deleted",
            id,
            updated,
            created,
            removed.len()
        );
        self.event_sender
            .send_or_log(Event::InventoryItemUpdated(id))
            .await;
        for variation_id in removed {
            self.event_sender
                .send_or_log(Event::VariationDeleted {
                    item_id: id,
                    variation_id,
                })
                .await;
        }

        Ok(detail)
    }

    /// Deletes stock levels, variations and then the item
    #[instrument(skip(self))]
    pub async fn delete_item(&self, id: Uuid) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;
        find_item(&txn, id).await?;

        let variation_ids: Vec<Uuid> = InventoryVariation::find()
            .filter(inventory_variation::Column::ItemId.eq(id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|v| v.id)
            .collect();

        if !variation_ids.is_empty() {
            StockLevel::delete_many()
                .filter(stock_level::Column::VariationId.is_in(variation_ids))
                .exec(&txn)
                .await?;
        }
        InventoryVariation::delete_many()
            .filter(inventory_variation::Column::ItemId.eq(id))
            .exec(&txn)
            .await?;
        InventoryItem::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        counter!("repair_shop.inventory.items_deleted", 1);
        info!("Deleted inventory item {}", id);
        self.event_sender
            .send_or_log(Event::InventoryItemDeleted(id))
            .await;
        Ok(())
    }

    /// Copies an item and its variations; stock is not copied
    #[instrument(skip(self))]
    pub async fn duplicate_item(&self, id: Uuid) -> Result<ItemDetail, ServiceError> {
        let txn = self.db.begin().await?;
        let source = find_item(&txn, id).await?;
        let rates = current_rates(&txn, self.fallback_rates).await?;
        let now = Utc::now();

        let copy = inventory_item::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(format!("{}{}", source.name, COPY_NAME_SUFFIX)),
            description: Set(source.description.clone()),
            category: Set(source.category.clone()),
            brand: Set(source.brand.clone()),
            image_url: Set(source.image_url.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let variations = InventoryVariation::find()
            .filter(inventory_variation::Column::ItemId.eq(id))
            .order_by_asc(inventory_variation::Column::CreatedAt)
            .order_by_asc(inventory_variation::Column::Sku)
            .all(&txn)
            .await?;
        for variation in &variations {
            copy_variation(&txn, variation, copy.id, variation.name.clone(), &rates).await?;
        }

        let detail = load_detail(&txn, copy).await?;
        txn.commit().await?;

        counter!("repair_shop.inventory.items_created", 1);
        info!("Duplicated inventory item {} as {}", id, detail.item.id);
        self.event_sender
            .send_or_log(Event::InventoryItemDuplicated {
                source_id: id,
                copy_id: detail.item.id,
            })
            .await;
        Ok(detail)
    }

    #[instrument(skip(self, input))]
    pub async fn add_variation(
        &self,
        item_id: Uuid,
        input: VariationInput,
    ) -> Result<VariationDetail, ServiceError> {
        input.validate()?;
        check_request_duplicates(std::slice::from_ref(&input))?;

        let txn = self.db.begin().await?;
        find_item(&txn, item_id).await?;
        let rates = current_rates(&txn, self.fallback_rates).await?;
        let variation = insert_variation(&txn, item_id, &input, &rates).await?;
        let detail = self.variation_detail(&txn, variation).await?;
        txn.commit().await?;

        counter!("repair_shop.inventory.variations_created", 1);
        self.event_sender
            .send_or_log(Event::VariationCreated {
                item_id,
                variation_id: detail.variation.id,
            })
            .await;
        Ok(detail)
    }

    /// Updates a variation's fields, re-derives its prices and upserts the given stock levels
    #[instrument(skip(self, input))]
    pub async fn update_variation(
        &self,
        id: Uuid,
        input: VariationInput,
    ) -> Result<VariationDetail, ServiceError> {
        input.validate()?;
        check_request_duplicates(std::slice::from_ref(&input))?;
        if input.id.is_some_and(|body_id| body_id != id) {
            return Err(ServiceError::ValidationError(
                "Variation id in body does not match path".to_string(),
            ));
        }

        let txn = self.db.begin().await?;
        let existing = find_variation(&txn, id).await?;
        if input.sku.trim() != existing.sku {
            ensure_unique_sku(&txn, input.sku.trim(), Some(existing.id)).await?;
        }
        let rates = current_rates(&txn, self.fallback_rates).await?;
        let variation = apply_variation_update(&txn, existing, &input, &rates).await?;
        let detail = self.variation_detail(&txn, variation).await?;
        txn.commit().await?;

        counter!("repair_shop.inventory.variations_updated", 1);
        self.event_sender
            .send_or_log(Event::VariationUpdated {
                item_id: detail.variation.item_id,
                variation_id: id,
            })
            .await;
        Ok(detail)
    }

    #[instrument(skip(self))]
    pub async fn delete_variation(&self, id: Uuid) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;
        let variation = find_variation(&txn, id).await?;
        delete_variation_rows(&txn, id).await?;
        txn.commit().await?;

        counter!("repair_shop.inventory.variations_deleted", 1);
        self.event_sender
            .send_or_log(Event::VariationDeleted {
                item_id: variation.item_id,
                variation_id: id,
            })
            .await;
        Ok(())
    }

    /// Copies a variation within its item; stock is not copied
    #[instrument(skip(self))]
    pub async fn duplicate_variation(&self, id: Uuid) -> Result<VariationDetail, ServiceError> {
        let txn = self.db.begin().await?;
        let source = find_variation(&txn, id).await?;
        let rates = current_rates(&txn, self.fallback_rates).await?;
        let copy = copy_variation(
            &txn,
            &source,
            source.item_id,
            format!("{}{}", source.name, COPY_NAME_SUFFIX),
            &rates,
        )
        .await?;
        txn.commit().await?;

        counter!("repair_shop.inventory.variations_created", 1);
        self.event_sender
            .send_or_log(Event::VariationCreated {
                item_id: copy.item_id,
                variation_id: copy.id,
            })
            .await;
        Ok(VariationDetail {
            variation: copy,
            stock_levels: Vec::new(),
            total_stock: 0,
        })
    }

    /// Sets the absolute quantity held at a location, creating the level if needed
    #[instrument(skip(self))]
    pub async fn set_stock_level(
        &self,
        variation_id: Uuid,
        location_id: Uuid,
        quantity: i32,
        purchase_cost: Option<Decimal>,
    ) -> Result<stock_level::Model, ServiceError> {
        let txn = self.db.begin().await?;
        find_variation(&txn, variation_id).await?;
        let level =
            upsert_stock_level(&txn, variation_id, location_id, quantity, purchase_cost).await?;
        txn.commit().await?;

        counter!("repair_shop.inventory.stock_set", 1);
        self.event_sender
            .send_or_log(Event::StockLevelSet {
                variation_id,
                location_id,
                quantity,
            })
            .await;
        Ok(level)
    }

    /// Adds `delta` (possibly negative) to the quantity at a location
    #[instrument(skip(self))]
    pub async fn adjust_stock(
        &self,
        variation_id: Uuid,
        location_id: Uuid,
        delta: i32,
    ) -> Result<stock_level::Model, ServiceError> {
        let txn = self.db.begin().await?;
        let variation = find_variation(&txn, variation_id).await?;
        ensure_location(&txn, location_id).await?;

        let current = lock_stock_level(&txn, variation_id, location_id).await?;
        let old_quantity = current.quantity;

        let new_quantity = match old_quantity.checked_add(delta) {
            Some(q) if q >= 0 => q,
            Some(_) => {
                warn!(
                    "Rejected stock adjustment for {}: {} on hand, delta {}",
                    variation.sku, old_quantity, delta
                );
                return Err(ServiceError::InsufficientStock(format!(
                    "SKU '{}' has {} units at location {}, cannot apply {}",
                    variation.sku, old_quantity, location_id, delta
                )));
            }
            None => {
                return Err(ServiceError::InvalidInput(
                    "Stock adjustment overflows quantity".to_string(),
                ))
            }
        };

        let mut active: stock_level::ActiveModel = current.into();
        active.quantity = Set(new_quantity);
        active.updated_at = Set(Utc::now());
        let level = active.update(&txn).await?;
        txn.commit().await?;

        counter!("repair_shop.inventory.stock_adjusted", 1);
        self.event_sender
            .send_or_log(Event::StockAdjusted {
                variation_id,
                location_id,
                old_quantity,
                new_quantity,
            })
            .await;
        Ok(level)
    }

    /// Per-location stock for a variation
    #[instrument(skip(self))]
    pub async fn stock_levels(
        &self,
        variation_id: Uuid,
    ) -> Result<Vec<StockLevelDetail>, ServiceError> {
        find_variation(&*self.db, variation_id).await?;

        let rows = StockLevel::find()
            .filter(stock_level::Column::VariationId.eq(variation_id))
            .find_also_related(StoreLocation)
            .order_by_asc(store_location::Column::Name)
            .all(&*self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(level, location)| StockLevelDetail {
                level,
                location_name: location.map(|l| l.name),
            })
            .collect())
    }

    async fn variation_detail<C: ConnectionTrait>(
        &self,
        conn: &C,
        variation: inventory_variation::Model,
    ) -> Result<VariationDetail, ServiceError> {
        let stock_levels = StockLevel::find()
            .filter(stock_level::Column::VariationId.eq(variation.id))
            .all(conn)
            .await?;
        Ok(VariationDetail {
            total_stock: total_stock(&stock_levels),
            variation,
            stock_levels,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    fn variation(sku: &str) -> VariationInput {
        VariationInput {
            id: None,
            name: "Black".into(),
            sku: sku.into(),
            raw_price: dec!(10),
            tax: dec!(0),
            shipping: dec!(0),
            markup: dec!(0),
            use_default_rates: false,
            image_url: None,
            stock_levels: Vec::new(),
        }
    }

    #[test]
    fn copy_sku_candidates_fit_the_sku_limit() {
        assert_eq!(copy_sku_candidate("BAT-1", 1), "BAT-1-COPY");
        assert_eq!(copy_sku_candidate("BAT-1", 3), "BAT-1-COPY-3");

        let long = "Ü".repeat(MAX_SKU_LEN);
        for n in [1, 2, 10, 1000] {
            let candidate = copy_sku_candidate(&long, n);
            assert_eq!(candidate.chars().count(), MAX_SKU_LEN);
            assert!(candidate.ends_with("-COPY") || candidate.contains("-COPY-"));
        }
    }

    #[test]
    fn duplicate_skus_in_request_are_rejected() {
        let result = check_request_duplicates(&[variation("A-1"), variation(" A-1 ")]);
        assert_matches!(result, Err(ServiceError::ValidationError(msg)) if msg.contains("A-1"));
    }

    #[test]
    fn duplicate_locations_for_one_variation_are_rejected() {
        let location_id = Uuid::new_v4();
        let mut v = variation("B-1");
        v.stock_levels = vec![
            StockLevelInput {
                location_id,
                quantity: 1,
                purchase_cost: None,
            },
            StockLevelInput {
                location_id,
                quantity: 2,
                purchase_cost: None,
            },
        ];
        assert!(check_request_duplicates(&[v]).is_err());
    }

    #[test]
    fn negative_stock_input_fails_validation() {
        let mut v = variation("C-1");
        v.stock_levels.push(StockLevelInput {
            location_id: Uuid::new_v4(),
            quantity: -3,
            purchase_cost: None,
        });
        assert!(v.validate().is_err());
    }

    #[test]
    fn total_stock_sums_levels() {
        let now = Utc::now();
        let level = |quantity| stock_level::Model {
            id: Uuid::new_v4(),
            variation_id: Uuid::nil(),
            location_id: Uuid::new_v4(),
            quantity,
            purchase_cost: None,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(total_stock(&[level(3), level(0), level(7)]), 10);
        assert_eq!(total_stock(&[]), 0);
    }
}

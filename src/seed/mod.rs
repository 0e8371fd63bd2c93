//! Idempotent fixture loaders.
//!
//! Every loader can be re-run against a populated database: rows are matched
//! by their natural key (name, email, slug) and only missing rows are created.
//! Counts in [`SeedSummary`] are rows created by the run.

pub mod fixtures;
pub mod id_map;

use crate::{
    entities::{
        blog_post, device_brand, device_model, device_series, repair_type, store_location,
        BlogPost, DefaultRates, DeviceBrand, DeviceModel, DeviceSeries, RepairType,
        StoreLocation,
    },
    services::{
        default_rates::{self, validate_rates},
        pricing::Rates,
        users::{upsert_user, NewUser},
    },
};
use anyhow::{anyhow, Context};
use chrono::{DateTime, TimeZone, Utc};
use fixtures::{
    BlogPostFixture, DeviceFixtures, LocationFixture, RepairTypeFixture, UserFixture,
};
use id_map::{IdRemap, RemapError};
use metrics::counter;
use sea_orm::{
    sea_query::OnConflict, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, QueryFilter, Set, TransactionTrait,
};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info};
use uuid::Uuid;

/// Rows created by a seed run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub locations: u64,
    pub default_rates: u64,
    pub users: u64,
    pub blog_posts: u64,
    pub repair_types: u64,
    pub device_brands: u64,
    pub device_series: u64,
    pub device_models: u64,
}

impl SeedSummary {
    pub fn total(&self) -> u64 {
        self.locations
            + self.default_rates
            + self.users
            + self.blog_posts
            + self.repair_types
            + self.device_brands
            + self.device_series
            + self.device_models
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceSeedCounts {
    pub brands: u64,
    pub series: u64,
    pub models: u64,
}

/// Upserts locations by name
pub async fn seed_locations<C: ConnectionTrait>(
    conn: &C,
    fixtures: &[LocationFixture],
) -> anyhow::Result<u64> {
    let mut created = 0;
    let now = Utc::now();

    for fixture in fixtures {
        let existing = StoreLocation::find()
            .filter(store_location::Column::Name.eq(fixture.name))
            .one(conn)
            .await?;

        match existing {
            Some(location) => {
                let unchanged = location.address == fixture.address
                    && location.phone.as_deref() == fixture.phone
                    && location.email.as_deref() == fixture.email;
                if !unchanged {
                    let mut active: store_location::ActiveModel = location.into();
                    active.address = Set(fixture.address.to_string());
                    active.phone = Set(fixture.phone.map(str::to_string));
                    active.email = Set(fixture.email.map(str::to_string));
                    active.updated_at = Set(now);
                    active.update(conn).await?;
                }
            }
            None => {
                store_location::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    name: Set(fixture.name.to_string()),
                    address: Set(fixture.address.to_string()),
                    phone: Set(fixture.phone.map(str::to_string)),
                    email: Set(fixture.email.map(str::to_string)),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(conn)
                .await?;
                created += 1;
            }
        }
    }

    debug!("Seeded locations: {} created", created);
    Ok(created)
}

/// Creates the default-rates row when absent; stored rates are left alone
pub async fn seed_default_rates<C: ConnectionTrait>(conn: &C, rates: Rates) -> anyhow::Result<u64> {
    validate_rates(&rates)?;

    if DefaultRates::find_by_id(crate::entities::default_rates::SINGLETON_ID)
        .one(conn)
        .await?
        .is_some()
    {
        return Ok(0);
    }

    default_rates::upsert_rates(conn, rates).await?;
    Ok(1)
}

/// Upserts accounts by email; staff reference their home store by name
pub async fn seed_users<C: ConnectionTrait>(
    conn: &C,
    fixtures: &[UserFixture],
) -> anyhow::Result<u64> {
    let mut created = 0;

    for fixture in fixtures {
        let location_id = match fixture.location {
            Some(name) => Some(
                StoreLocation::find()
                    .filter(store_location::Column::Name.eq(name))
                    .one(conn)
                    .await?
                    .map(|l| l.id)
                    .ok_or_else(|| {
                        anyhow!("user {} references unknown location '{}'", fixture.email, name)
                    })?,
            ),
            None => None,
        };

        let (_, was_created) = upsert_user(
            conn,
            NewUser {
                name: fixture.name.to_string(),
                email: fixture.email.to_string(),
                password: fixture.password.to_string(),
                role: fixture.role,
                phone: fixture.phone.map(str::to_string),
                location_id,
            },
        )
        .await
        .with_context(|| format!("seeding user {}", fixture.email))?;

        if was_created {
            created += 1;
        }
    }

    debug!("Seeded users: {} created", created);
    Ok(created)
}

fn published_at(fixture: &BlogPostFixture) -> anyhow::Result<Option<DateTime<Utc>>> {
    fixture
        .published_on
        .map(|(y, m, d)| {
            Utc.with_ymd_and_hms(y, m, d, 9, 0, 0)
                .single()
                .ok_or_else(|| anyhow!("invalid publish date for post '{}'", fixture.slug))
        })
        .transpose()
}

/// Upserts blog posts by slug in a single statement
pub async fn seed_blog_posts<C: ConnectionTrait>(
    conn: &C,
    fixtures: &[BlogPostFixture],
) -> anyhow::Result<u64> {
    if fixtures.is_empty() {
        return Ok(0);
    }

    let existing: HashSet<String> = BlogPost::find()
        .filter(blog_post::Column::Slug.is_in(fixtures.iter().map(|f| f.slug)))
        .all(conn)
        .await?
        .into_iter()
        .map(|p| p.slug)
        .collect();

    let now = Utc::now();
    let mut rows = Vec::with_capacity(fixtures.len());
    for fixture in fixtures {
        let tags = (!fixture.tags.is_empty()).then(|| fixture.tags.join(","));
        rows.push(blog_post::ActiveModel {
            id: Set(Uuid::new_v4()),
            slug: Set(fixture.slug.to_string()),
            title: Set(fixture.title.to_string()),
            excerpt: Set(fixture.excerpt.map(str::to_string)),
            content: Set(fixture.content.to_string()),
            author: Set(fixture.author.to_string()),
            tags: Set(tags),
            published: Set(fixture.published_on.is_some()),
            published_at: Set(published_at(fixture)?),
            created_at: Set(now),
            updated_at: Set(now),
        });
    }

    BlogPost::insert_many(rows)
        .on_conflict(
            OnConflict::column(blog_post::Column::Slug)
                .update_columns([
                    blog_post::Column::Title,
                    blog_post::Column::Excerpt,
                    blog_post::Column::Content,
                    blog_post::Column::Author,
                    blog_post::Column::Tags,
                    blog_post::Column::Published,
                    blog_post::Column::PublishedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    let created = fixtures
        .iter()
        .filter(|f| !existing.contains(f.slug))
        .count() as u64;
    debug!("Seeded blog posts: {} created", created);
    Ok(created)
}

/// Inserts repair types whose names are not present yet
pub async fn seed_repair_types<C: ConnectionTrait>(
    conn: &C,
    fixtures: &[RepairTypeFixture],
) -> anyhow::Result<u64> {
    let existing: HashSet<String> = RepairType::find()
        .all(conn)
        .await?
        .into_iter()
        .map(|r| r.name)
        .collect();

    let now = Utc::now();
    let mut seen = HashSet::new();
    let rows: Vec<repair_type::ActiveModel> = fixtures
        .iter()
        .filter(|f| !existing.contains(f.name) && seen.insert(f.name))
        .map(|f| repair_type::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(f.name.to_string()),
            description: Set(f.description.map(str::to_string)),
            base_price: Set(f.base_price),
            estimated_minutes: Set(f.estimated_minutes),
            created_at: Set(now),
        })
        .collect();

    let created = rows.len() as u64;
    if !rows.is_empty() {
        RepairType::insert_many(rows).exec_without_returning(conn).await?;
    }

    debug!("Seeded repair types: {} created", created);
    Ok(created)
}

/// Checks that original ids are unique and every reference resolves
/// before anything is written
pub fn validate_device_fixtures(fixtures: &DeviceFixtures) -> Result<(), RemapError> {
    let mut brands = IdRemap::new("brand");
    for brand in &fixtures.brands {
        brands.insert(brand.original_id, Uuid::nil())?;
    }
    let mut series = IdRemap::new("series");
    for s in &fixtures.series {
        brands.resolve(s.brand_original_id)?;
        series.insert(s.original_id, Uuid::nil())?;
    }
    for model in &fixtures.models {
        series.resolve(model.series_original_id)?;
    }
    Ok(())
}

/// Seeds brands, then series keyed through the brand id map, then models
/// keyed through the series id map
pub async fn seed_device_hierarchy<C: ConnectionTrait>(
    conn: &C,
    fixtures: &DeviceFixtures,
) -> anyhow::Result<DeviceSeedCounts> {
    validate_device_fixtures(fixtures)?;

    let mut counts = DeviceSeedCounts::default();
    let now = Utc::now();

    let mut brand_ids = IdRemap::new("brand");
    for fixture in &fixtures.brands {
        let existing = DeviceBrand::find()
            .filter(device_brand::Column::Name.eq(fixture.name))
            .one(conn)
            .await?;
        let id = match existing {
            Some(brand) => brand.id,
            None => {
                counts.brands += 1;
                device_brand::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    name: Set(fixture.name.to_string()),
                    created_at: Set(now),
                }
                .insert(conn)
                .await?
                .id
            }
        };
        brand_ids.insert(fixture.original_id, id)?;
    }

    let mut series_ids = IdRemap::new("series");
    for fixture in &fixtures.series {
        let brand_id = brand_ids.resolve(fixture.brand_original_id)?;
        let existing = DeviceSeries::find()
            .filter(device_series::Column::BrandId.eq(brand_id))
            .filter(device_series::Column::Name.eq(fixture.name))
            .one(conn)
            .await?;
        let id = match existing {
            Some(series) => series.id,
            None => {
                counts.series += 1;
                device_series::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    brand_id: Set(brand_id),
                    name: Set(fixture.name.to_string()),
                    created_at: Set(now),
                }
                .insert(conn)
                .await?
                .id
            }
        };
        series_ids.insert(fixture.original_id, id)?;
    }

    for fixture in &fixtures.models {
        let series_id = series_ids.resolve(fixture.series_original_id)?;
        let exists = DeviceModel::find()
            .filter(device_model::Column::SeriesId.eq(series_id))
            .filter(device_model::Column::Name.eq(fixture.name))
            .one(conn)
            .await?
            .is_some();
        if !exists {
            device_model::ActiveModel {
                id: Set(Uuid::new_v4()),
                series_id: Set(series_id),
                name: Set(fixture.name.to_string()),
                created_at: Set(now),
            }
            .insert(conn)
            .await?;
            counts.models += 1;
        }
    }

    debug!(
        "Seeded device hierarchy: {} brands, {} series, {} models created",
        counts.brands, counts.series, counts.models
    );
    Ok(counts)
}

/// Runs every loader in dependency order inside one transaction
pub async fn seed_all(db: &DatabaseConnection, default_rates: Rates) -> anyhow::Result<SeedSummary> {
    let txn = db.begin().await?;

    let locations = seed_locations(&txn, &fixtures::locations())
        .await
        .context("seeding store locations")?;
    let rates = seed_default_rates(&txn, default_rates)
        .await
        .context("seeding default rates")?;
    let users = seed_users(&txn, &fixtures::users())
        .await
        .context("seeding users")?;
    let blog_posts = seed_blog_posts(&txn, &fixtures::blog_posts())
        .await
        .context("seeding blog posts")?;
    let repair_types = seed_repair_types(&txn, &fixtures::repair_types())
        .await
        .context("seeding repair types")?;
    let devices = seed_device_hierarchy(&txn, &fixtures::device_hierarchy())
        .await
        .context("seeding device hierarchy")?;

    txn.commit().await?;

    let summary = SeedSummary {
        locations,
        default_rates: rates,
        users,
        blog_posts,
        repair_types,
        device_brands: devices.brands,
        device_series: devices.series,
        device_models: devices.models,
    };
    counter!("repair_shop.seed.records_created", summary.total());
    info!(?summary, "Seed run complete");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixtures::{BrandFixture, ModelFixture, SeriesFixture};

    #[test]
    fn bundled_device_fixtures_are_consistent() {
        assert!(validate_device_fixtures(&fixtures::device_hierarchy()).is_ok());
    }

    #[test]
    fn series_with_unknown_brand_is_rejected() {
        let fixtures = DeviceFixtures {
            brands: vec![BrandFixture {
                original_id: 1,
                name: "Apple",
            }],
            series: vec![SeriesFixture {
                original_id: 10,
                brand_original_id: 2,
                name: "Galaxy S",
            }],
            models: vec![],
        };
        assert_eq!(
            validate_device_fixtures(&fixtures),
            Err(RemapError::Unresolved {
                kind: "brand",
                original: 2
            })
        );
    }

    #[test]
    fn duplicate_series_ids_are_rejected() {
        let fixtures = DeviceFixtures {
            brands: vec![BrandFixture {
                original_id: 1,
                name: "Apple",
            }],
            series: vec![
                SeriesFixture {
                    original_id: 10,
                    brand_original_id: 1,
                    name: "iPhone",
                },
                SeriesFixture {
                    original_id: 10,
                    brand_original_id: 1,
                    name: "iPad",
                },
            ],
            models: vec![ModelFixture {
                series_original_id: 10,
                name: "iPhone 15",
            }],
        };
        assert!(matches!(
            validate_device_fixtures(&fixtures),
            Err(RemapError::Duplicate { kind: "series", .. })
        ));
    }

    #[test]
    fn draft_posts_have_no_publish_date() {
        let posts = fixtures::blog_posts();
        let draft = posts.iter().find(|p| p.published_on.is_none()).unwrap();
        assert_eq!(published_at(draft).unwrap(), None);
        let live = posts.iter().find(|p| p.published_on.is_some()).unwrap();
        assert!(published_at(live).unwrap().is_some());
    }

    #[test]
    fn summary_total_adds_every_count() {
        let summary = SeedSummary {
            locations: 1,
            default_rates: 1,
            users: 2,
            blog_posts: 3,
            repair_types: 4,
            device_brands: 5,
            device_series: 6,
            device_models: 7,
        };
        assert_eq!(summary.total(), 29);
    }
}

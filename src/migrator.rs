use anyhow::Result;
use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::prelude::*;
use std::time::Duration;
use tracing::{error, info};

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_store_locations_table::Migration),
            Box::new(m20240101_000002_create_users_table::Migration),
            Box::new(m20240101_000003_create_inventory_tables::Migration),
            Box::new(m20240101_000004_create_default_rates_table::Migration),
            Box::new(m20240101_000005_create_device_hierarchy_tables::Migration),
            Box::new(m20240101_000006_create_repair_types_table::Migration),
            Box::new(m20240101_000007_create_blog_posts_table::Migration),
        ]
    }
}

mod m20240101_000001_create_store_locations_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_store_locations_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(StoreLocations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(StoreLocations::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StoreLocations::Name)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(StoreLocations::Address).string().not_null())
                        .col(ColumnDef::new(StoreLocations::Phone).string().null())
                        .col(ColumnDef::new(StoreLocations::Email).string().null())
                        .col(
                            ColumnDef::new(StoreLocations::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StoreLocations::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(StoreLocations::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum StoreLocations {
        Table,
        Id,
        Name,
        Address,
        Phone,
        Email,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000002_create_users_table {
    use super::m20240101_000001_create_store_locations_table::StoreLocations;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Users::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Users::Name).string().not_null())
                        .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                        .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                        .col(ColumnDef::new(Users::Role).string_len(16).not_null())
                        .col(ColumnDef::new(Users::Phone).string().null())
                        .col(ColumnDef::new(Users::LocationId).uuid().null())
                        .col(
                            ColumnDef::new(Users::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Users::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_users_location_id")
                                .from(Users::Table, Users::LocationId)
                                .to(StoreLocations::Table, StoreLocations::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Users {
        Table,
        Id,
        Name,
        Email,
        PasswordHash,
        Role,
        Phone,
        LocationId,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000003_create_inventory_tables {
    use super::m20240101_000001_create_store_locations_table::StoreLocations;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_inventory_tables"
        }
    }

    fn money(col: InventoryVariations) -> ColumnDef {
        ColumnDef::new(col)
            .decimal_len(12, 2)
            .not_null()
            .default(0)
            .to_owned()
    }

    fn percent(col: InventoryVariations) -> ColumnDef {
        ColumnDef::new(col)
            .decimal_len(7, 3)
            .not_null()
            .default(0)
            .to_owned()
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(InventoryItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InventoryItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(InventoryItems::Name).string().not_null())
                        .col(ColumnDef::new(InventoryItems::Description).text().null())
                        .col(ColumnDef::new(InventoryItems::Category).string().null())
                        .col(ColumnDef::new(InventoryItems::Brand).string().null())
                        .col(ColumnDef::new(InventoryItems::ImageUrl).string().null())
                        .col(
                            ColumnDef::new(InventoryItems::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_inventory_items_category")
                        .table(InventoryItems::Table)
                        .col(InventoryItems::Category)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(InventoryVariations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InventoryVariations::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(InventoryVariations::ItemId).uuid().not_null())
                        .col(ColumnDef::new(InventoryVariations::Name).string().not_null())
                        .col(
                            ColumnDef::new(InventoryVariations::Sku)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(&mut money(InventoryVariations::RawPrice))
                        .col(&mut percent(InventoryVariations::Tax))
                        .col(&mut money(InventoryVariations::Shipping))
                        .col(&mut percent(InventoryVariations::Markup))
                        .col(
                            ColumnDef::new(InventoryVariations::UseDefaultRates)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(&mut money(InventoryVariations::Cost))
                        .col(&mut money(InventoryVariations::TotalCost))
                        .col(&mut money(InventoryVariations::Profit))
                        .col(&mut money(InventoryVariations::SellingPrice))
                        .col(ColumnDef::new(InventoryVariations::ImageUrl).string().null())
                        .col(
                            ColumnDef::new(InventoryVariations::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryVariations::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_inventory_variations_item_id")
                                .from(InventoryVariations::Table, InventoryVariations::ItemId)
                                .to(InventoryItems::Table, InventoryItems::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_inventory_variations_item_id")
                        .table(InventoryVariations::Table)
                        .col(InventoryVariations::ItemId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(StockLevels::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(StockLevels::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(StockLevels::VariationId).uuid().not_null())
                        .col(ColumnDef::new(StockLevels::LocationId).uuid().not_null())
                        .col(
                            ColumnDef::new(StockLevels::Quantity)
                                .integer()
                                .not_null()
                                .default(0)
                                .check(Expr::col(StockLevels::Quantity).gte(0)),
                        )
                        .col(
                            ColumnDef::new(StockLevels::PurchaseCost)
                                .decimal_len(12, 2)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(StockLevels::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockLevels::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_stock_levels_variation_id")
                                .from(StockLevels::Table, StockLevels::VariationId)
                                .to(InventoryVariations::Table, InventoryVariations::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_stock_levels_location_id")
                                .from(StockLevels::Table, StockLevels::LocationId)
                                .to(StoreLocations::Table, StoreLocations::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .unique()
                        .name("uq_stock_levels_variation_location")
                        .table(StockLevels::Table)
                        .col(StockLevels::VariationId)
                        .col(StockLevels::LocationId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(StockLevels::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(InventoryVariations::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(InventoryItems::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum InventoryItems {
        Table,
        Id,
        Name,
        Description,
        Category,
        Brand,
        ImageUrl,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum InventoryVariations {
        Table,
        Id,
        ItemId,
        Name,
        Sku,
        RawPrice,
        Tax,
        Shipping,
        Markup,
        UseDefaultRates,
        Cost,
        TotalCost,
        Profit,
        SellingPrice,
        ImageUrl,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum StockLevels {
        Table,
        Id,
        VariationId,
        LocationId,
        Quantity,
        PurchaseCost,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000004_create_default_rates_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_default_rates_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(DefaultRates::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(DefaultRates::Id)
                                .integer()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DefaultRates::TaxRate)
                                .decimal_len(7, 3)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DefaultRates::ShippingRate)
                                .decimal_len(7, 3)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DefaultRates::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(DefaultRates::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum DefaultRates {
        Table,
        Id,
        TaxRate,
        ShippingRate,
        UpdatedAt,
    }
}

mod m20240101_000005_create_device_hierarchy_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_device_hierarchy_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(DeviceBrands::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(DeviceBrands::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DeviceBrands::Name)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(DeviceBrands::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(DeviceSeries::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(DeviceSeries::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(DeviceSeries::BrandId).uuid().not_null())
                        .col(ColumnDef::new(DeviceSeries::Name).string().not_null())
                        .col(
                            ColumnDef::new(DeviceSeries::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_device_series_brand_id")
                                .from(DeviceSeries::Table, DeviceSeries::BrandId)
                                .to(DeviceBrands::Table, DeviceBrands::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .unique()
                        .name("uq_device_series_brand_name")
                        .table(DeviceSeries::Table)
                        .col(DeviceSeries::BrandId)
                        .col(DeviceSeries::Name)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(DeviceModels::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(DeviceModels::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(DeviceModels::SeriesId).uuid().not_null())
                        .col(ColumnDef::new(DeviceModels::Name).string().not_null())
                        .col(
                            ColumnDef::new(DeviceModels::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_device_models_series_id")
                                .from(DeviceModels::Table, DeviceModels::SeriesId)
                                .to(DeviceSeries::Table, DeviceSeries::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .unique()
                        .name("uq_device_models_series_name")
                        .table(DeviceModels::Table)
                        .col(DeviceModels::SeriesId)
                        .col(DeviceModels::Name)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(DeviceModels::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(DeviceSeries::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(DeviceBrands::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum DeviceBrands {
        Table,
        Id,
        Name,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum DeviceSeries {
        Table,
        Id,
        BrandId,
        Name,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum DeviceModels {
        Table,
        Id,
        SeriesId,
        Name,
        CreatedAt,
    }
}

mod m20240101_000006_create_repair_types_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000006_create_repair_types_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(RepairTypes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(RepairTypes::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RepairTypes::Name)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(RepairTypes::Description).text().null())
                        .col(
                            ColumnDef::new(RepairTypes::BasePrice)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(RepairTypes::EstimatedMinutes)
                                .integer()
                                .not_null()
                                .default(60),
                        )
                        .col(
                            ColumnDef::new(RepairTypes::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(RepairTypes::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum RepairTypes {
        Table,
        Id,
        Name,
        Description,
        BasePrice,
        EstimatedMinutes,
        CreatedAt,
    }
}

mod m20240101_000007_create_blog_posts_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000007_create_blog_posts_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(BlogPosts::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(BlogPosts::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(BlogPosts::Slug)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(BlogPosts::Title).string().not_null())
                        .col(ColumnDef::new(BlogPosts::Excerpt).string().null())
                        .col(ColumnDef::new(BlogPosts::Content).text().not_null())
                        .col(ColumnDef::new(BlogPosts::Author).string().not_null())
                        .col(ColumnDef::new(BlogPosts::Tags).string().null())
                        .col(
                            ColumnDef::new(BlogPosts::Published)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(BlogPosts::PublishedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(BlogPosts::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(BlogPosts::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_blog_posts_published_at")
                        .table(BlogPosts::Table)
                        .col(BlogPosts::PublishedAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(BlogPosts::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum BlogPosts {
        Table,
        Id,
        Slug,
        Title,
        Excerpt,
        Content,
        Author,
        Tags,
        Published,
        PublishedAt,
        CreatedAt,
        UpdatedAt,
    }
}

/// Database migration CLI runner
pub async fn run_migration(db_url: &str) -> Result<()> {
    info!("Setting up database connection for migrations");

    let mut opt = ConnectOptions::new(db_url);
    opt.max_connections(4)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(30))
        .acquire_timeout(Duration::from_secs(30))
        .sqlx_logging(false);

    let db = Database::connect(opt).await?;

    info!("Running database migrations");
    match Migrator::up(&db, None).await {
        Ok(_) => {
            info!("Migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            error!("Migration failed: {}", e);
            Err(e.into())
        }
    }
}

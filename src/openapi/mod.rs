use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Repair Shop API",
        version = "1.0.0",
        description = r#"
# Repair Shop Management API

Back office for a device repair business.

- **Inventory**: items, SKU-level variations with derived pricing, stock per store location
- **Pricing**: `cost = raw + raw * tax% + shipping`, `total_cost = cost + cost * markup%`;
  variations can opt into the shop-wide default rates
- **Catalog**: store locations, device brand / series / model hierarchy, repair types
- **Blog**: published articles

## Error Handling

Errors share one body:

```json
{
  "error": "Not Found",
  "message": "Not found: Variation 550e8400-e29b-41d4-a716-446655440000 not found",
  "request_id": "0f3c...",
  "timestamp": "2024-01-01T00:00:00Z"
}
```

## Pagination

List endpoints accept `page` (default 1) and `per_page` (default 20, max 100).
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "inventory", description = "Inventory items and their variations"),
        (name = "variations", description = "Variation edits and per-location stock"),
        (name = "pricing", description = "Price derivation"),
        (name = "settings", description = "Shop-wide default rates"),
        (name = "catalog", description = "Locations, devices and repair types"),
        (name = "blog", description = "Published blog posts")
    ),
    paths(
        // Inventory
        crate::handlers::inventory::list_items,
        crate::handlers::inventory::create_item,
        crate::handlers::inventory::get_item,
        crate::handlers::inventory::update_item,
        crate::handlers::inventory::delete_item,
        crate::handlers::inventory::duplicate_item,
        crate::handlers::inventory::add_variation,

        // Variations and stock
        crate::handlers::variations::update_variation,
        crate::handlers::variations::delete_variation,
        crate::handlers::variations::duplicate_variation,
        crate::handlers::variations::list_stock,
        crate::handlers::variations::set_stock,
        crate::handlers::variations::adjust_stock,

        // Pricing and settings
        crate::handlers::pricing::preview,
        crate::handlers::settings::get_default_rates,
        crate::handlers::settings::update_default_rates,

        // Catalog
        crate::handlers::catalog::list_locations,
        crate::handlers::catalog::get_location,
        crate::handlers::catalog::list_brands,
        crate::handlers::catalog::list_series,
        crate::handlers::catalog::list_models,
        crate::handlers::catalog::device_tree,
        crate::handlers::catalog::list_repair_types,

        // Blog
        crate::handlers::blog::list_posts,
        crate::handlers::blog::get_post,
    ),
    components(
        schemas(
            crate::services::inventory::CreateItemInput,
            crate::services::inventory::UpdateItemInput,
            crate::services::inventory::VariationInput,
            crate::services::inventory::StockLevelInput,
            crate::services::pricing::PricingInput,
            crate::services::pricing::PriceBreakdown,
            crate::handlers::variations::SetStockRequest,
            crate::handlers::variations::AdjustStockRequest,
            crate::handlers::settings::UpdateDefaultRatesRequest,
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

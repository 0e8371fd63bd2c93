#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request},
    Router,
};
use chrono::Utc;
use repair_shop_api::{
    config::AppConfig,
    db::{self, DbConfig},
    entities::store_location,
    events::{self, EventSender},
    services::inventory::{CreateItemInput, StockLevelInput, VariationInput},
    AppState,
};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

/// Helper harness for spinning up an application state backed by an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    /// Construct a new test application with a freshly migrated database.
    pub async fn new() -> Self {
        let cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );

        let pool = db::establish_connection_with_config(&DbConfig::sqlite_in_memory())
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let (event_tx, event_rx) = mpsc::channel(256);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let state = AppState::new(Arc::new(pool), cfg, event_sender);
        let router = repair_shop_api::build_router(state.clone());

        Self {
            router,
            state,
            _event_task: event_task,
        }
    }

    /// Send a request against the router.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    pub async fn create_location(&self, name: &str) -> store_location::Model {
        let now = Utc::now();
        store_location::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            address: Set("100 Main St".to_string()),
            phone: Set(None),
            email: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.state.db)
        .await
        .expect("insert store location")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self._event_task.abort();
    }
}

/// Deserialize a response body into JSON.
pub async fn response_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    serde_json::from_slice(&bytes).expect("response body is json")
}

pub fn variation(sku: &str, raw_price: Decimal) -> VariationInput {
    VariationInput {
        id: None,
        name: format!("Variant {}", sku),
        sku: sku.to_string(),
        raw_price,
        tax: Decimal::ZERO,
        shipping: Decimal::ZERO,
        markup: Decimal::ZERO,
        use_default_rates: false,
        image_url: None,
        stock_levels: Vec::new(),
    }
}

pub fn stock(location_id: Uuid, quantity: i32) -> StockLevelInput {
    StockLevelInput {
        location_id,
        quantity,
        purchase_cost: None,
    }
}

pub fn item(name: &str, variations: Vec<VariationInput>) -> CreateItemInput {
    CreateItemInput {
        name: name.to_string(),
        description: None,
        category: Some("Screens".to_string()),
        brand: Some("Apple".to_string()),
        image_url: None,
        variations,
    }
}

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

/// Quantity at or below which a stock adjustment logs a low-stock warning
pub const LOW_STOCK_THRESHOLD: i32 = 2;

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends an event, logging instead of failing when the receiver is gone.
    /// Mutations have already committed by the time events go out.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(e) = self.send(event).await {
            warn!("{}", e);
        }
    }
}

/// Domain events emitted after a committed mutation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    InventoryItemCreated(Uuid),
    InventoryItemUpdated(Uuid),
    InventoryItemDeleted(Uuid),
    InventoryItemDuplicated {
        source_id: Uuid,
        copy_id: Uuid,
    },
    VariationCreated {
        item_id: Uuid,
        variation_id: Uuid,
    },
    VariationUpdated {
        item_id: Uuid,
        variation_id: Uuid,
    },
    VariationDeleted {
        item_id: Uuid,
        variation_id: Uuid,
    },
    StockLevelSet {
        variation_id: Uuid,
        location_id: Uuid,
        quantity: i32,
    },
    StockAdjusted {
        variation_id: Uuid,
        location_id: Uuid,
        old_quantity: i32,
        new_quantity: i32,
    },
    DefaultRatesUpdated {
        tax_rate: Decimal,
        shipping_rate: Decimal,
        repriced_variations: u64,
    },
}

/// Drains the event channel, logging each event until every sender is dropped
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match event {
            Event::StockAdjusted {
                variation_id,
                location_id,
                old_quantity,
                new_quantity,
            } => handle_stock_adjusted(variation_id, location_id, old_quantity, new_quantity),
            Event::StockLevelSet {
                variation_id,
                location_id,
                quantity,
            } => {
                info!(
                    "Stock level set: variation={}, location={}, quantity={}",
                    variation_id, location_id, quantity
                );
            }
            Event::DefaultRatesUpdated {
                tax_rate,
                shipping_rate,
                repriced_variations,
            } => {
                info!(
                    "Default rates changed to tax={}%, shipping={}%; {} variations repriced",
                    tax_rate, shipping_rate, repriced_variations
                );
            }
            other => {
                info!("Received event: {:?}", other);
            }
        }
    }

    warn!("Event processing loop has ended");
}

fn handle_stock_adjusted(
    variation_id: Uuid,
    location_id: Uuid,
    old_quantity: i32,
    new_quantity: i32,
) {
    info!(
        "Stock adjusted: variation={}, location={}, {} -> {}",
        variation_id, location_id, old_quantity, new_quantity
    );

    if new_quantity <= LOW_STOCK_THRESHOLD {
        warn!(
            "Low stock alert: variation {} has only {} units at location {}",
            variation_id, new_quantity, location_id
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_delivers_to_receiver() {
        let (tx, mut rx) = mpsc::channel(4);
        let sender = EventSender::new(tx);
        let id = Uuid::new_v4();

        sender.send(Event::InventoryItemCreated(id)).await.unwrap();

        match rx.recv().await {
            Some(Event::InventoryItemCreated(got)) => assert_eq!(got, id),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn send_fails_once_receiver_dropped() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);

        assert!(sender
            .send(Event::InventoryItemDeleted(Uuid::new_v4()))
            .await
            .is_err());
        // must not panic
        sender
            .send_or_log(Event::InventoryItemDeleted(Uuid::new_v4()))
            .await;
    }

    #[tokio::test]
    async fn process_events_exits_when_senders_dropped() {
        let (tx, rx) = mpsc::channel(4);
        let sender = EventSender::new(tx);
        sender
            .send(Event::StockAdjusted {
                variation_id: Uuid::new_v4(),
                location_id: Uuid::new_v4(),
                old_quantity: 5,
                new_quantity: 1,
            })
            .await
            .unwrap();
        drop(sender);

        process_events(rx).await;
    }
}

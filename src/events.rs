use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

/// Events emitted after state changes commit. Emission is best-effort:
/// a full or closed channel never fails the operation that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    ItemCreated(Uuid),
    ItemUpdated(Uuid),
    ItemDeleted(Uuid),
    MovementCommitted {
        movement_id: Uuid,
        item_id: Uuid,
        tipo: String,
        quantidade: i32,
    },
    LowStockDetected {
        item_id: Uuid,
        estoque_atual: i32,
        estoque_minimo: i32,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event, logging instead of propagating on failure.
    pub async fn send(&self, event: Event) {
        if let Err(e) = self.sender.send(event).await {
            warn!("Failed to send event: {}", e);
        }
    }
}

/// Drains the event channel, logging each event. Downstream consumers
/// (dashboards, notification fan-out) hook in here.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match event {
            Event::MovementCommitted {
                movement_id,
                item_id,
                ref tipo,
                quantidade,
            } => {
                info!(
                    movement_id = %movement_id,
                    item_id = %item_id,
                    tipo = %tipo,
                    quantidade,
                    "Movement committed"
                );
            }
            Event::LowStockDetected {
                item_id,
                estoque_atual,
                estoque_minimo,
            } => {
                warn!(
                    item_id = %item_id,
                    estoque_atual,
                    estoque_minimo,
                    "Item at or below reorder threshold"
                );
            }
            Event::ItemCreated(id) => info!(item_id = %id, "Item created"),
            Event::ItemUpdated(id) => info!(item_id = %id, "Item updated"),
            Event::ItemDeleted(id) => info!(item_id = %id, "Item deleted"),
        }
    }

    info!("Event channel closed; processing loop exiting");
}

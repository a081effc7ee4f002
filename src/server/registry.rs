use crate::domain::ports::StatusSink;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

const SUBSCRIBER_BUFFER: usize = 32;

/// Registry of live WebSocket subscribers. Delivery is best-effort: a dead
/// subscriber never blocks the rest, and removal tolerates double calls.
pub struct SubscriberRegistry {
    subscribers: RwLock<HashMap<Uuid, mpsc::Sender<String>>>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
        }
    }

    pub async fn register(&self) -> (Uuid, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(SUBSCRIBER_BUFFER);
        let id = Uuid::new_v4();
        self.subscribers.write().await.insert(id, tx);
        tracing::debug!("Subscriber registered: {}", id);
        (id, rx)
    }

    /// Safe to call for an id that was already removed.
    pub async fn unregister(&self, id: &Uuid) {
        if self.subscribers.write().await.remove(id).is_some() {
            tracing::debug!("Subscriber removed: {}", id);
        }
    }

    pub async fn count(&self) -> usize {
        self.subscribers.read().await.len()
    }

    /// Fan a line out to every current subscriber. The lock is released
    /// before any send so a slow socket cannot stall registration.
    pub async fn broadcast(&self, message: &str) {
        let targets: Vec<(Uuid, mpsc::Sender<String>)> = {
            let subscribers = self.subscribers.read().await;
            subscribers
                .iter()
                .map(|(id, tx)| (*id, tx.clone()))
                .collect()
        };

        for (id, tx) in targets {
            if tx.send(message.to_string()).await.is_err() {
                tracing::debug!("Dropping message for disconnected subscriber {}", id);
            }
        }
    }
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StatusSink for SubscriberRegistry {
    async fn emit(&self, line: &str) {
        self.broadcast(line).await;
    }
}

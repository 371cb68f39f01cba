//! Serialized update queue
//!
//! All mutations, timer ticks and operator actions alike, travel through one
//! `mpsc` channel into a single task that owns the [`SessionState`]. Readers
//! see immutable snapshots through a `watch` channel and can subscribe to
//! the event stream.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use crate::{SessionEvent, SessionState, Update};

const QUEUE_DEPTH: usize = 64;
const EVENT_BUFFER: usize = 256;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session store is closed")]
    Closed,
}

struct Envelope {
    update: Update,
    reply: oneshot::Sender<Vec<SessionEvent>>,
}

/// Cloneable handle to a running session store
#[derive(Clone)]
pub struct StoreHandle {
    tx: mpsc::Sender<Envelope>,
    snapshots: watch::Receiver<Arc<SessionState>>,
    events: broadcast::Sender<SessionEvent>,
}

impl StoreHandle {
    /// Queue an update and wait until it has been applied
    pub async fn apply(&self, update: Update) -> Result<Vec<SessionEvent>, StoreError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Envelope { update, reply })
            .await
            .map_err(|_| StoreError::Closed)?;
        rx.await.map_err(|_| StoreError::Closed)
    }

    /// Latest applied state
    pub fn snapshot(&self) -> Arc<SessionState> {
        self.snapshots.borrow().clone()
    }

    /// Receiver that is notified after every applied update
    pub fn watch(&self) -> watch::Receiver<Arc<SessionState>> {
        self.snapshots.clone()
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

/// Start the store task that owns `state`
///
/// The task ends once every [`StoreHandle`] has been dropped.
pub fn spawn_store(state: SessionState) -> (StoreHandle, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::channel::<Envelope>(QUEUE_DEPTH);
    let (snapshot_tx, snapshot_rx) = watch::channel(Arc::new(state.clone()));
    let (events_tx, _) = broadcast::channel(EVENT_BUFFER);

    let handle = StoreHandle {
        tx,
        snapshots: snapshot_rx,
        events: events_tx.clone(),
    };

    let task = tokio::spawn(async move {
        let mut state = state;
        while let Some(Envelope { update, reply }) = rx.recv().await {
            let events = state.apply(update);
            snapshot_tx.send_replace(Arc::new(state.clone()));
            for event in &events {
                // Ignore send errors (no receivers)
                let _ = events_tx.send(event.clone());
            }
            let _ = reply.send(events);
        }
        tracing::debug!("session store drained");
    });

    (handle, task)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::Simulator;

    #[tokio::test]
    async fn test_updates_are_applied_in_order() {
        let (handle, _task) = spawn_store(SessionState::seeded(5));
        let mut simulator = Simulator::seeded(11);

        for _ in 0..8 {
            let sample = simulator.sample(4, "12:00:00");
            handle.apply(Update::Tick(sample)).await.unwrap();
        }

        let snapshot = handle.snapshot();
        assert_eq!(snapshot.ticks, 8);
        assert_eq!(snapshot.cpu.len(), 5);
    }

    #[tokio::test]
    async fn test_concurrent_producers_are_serialized() {
        let (handle, _task) = spawn_store(SessionState::seeded(10));

        let mut joins = Vec::new();
        for worker in 0..4 {
            let handle = handle.clone();
            joins.push(tokio::spawn(async move {
                let mut simulator = Simulator::seeded(worker);
                for _ in 0..25 {
                    let sample = simulator.sample(4, "12:00:00");
                    handle.apply(Update::Tick(sample)).await.unwrap();
                }
            }));
        }
        for join in joins {
            join.await.unwrap();
        }

        assert_eq!(handle.snapshot().ticks, 100);
    }

    #[tokio::test]
    async fn test_events_are_broadcast() {
        let (handle, _task) = spawn_store(SessionState::seeded(10));
        let mut events = handle.subscribe();

        handle
            .apply(Update::PromptSubmitted("status?".to_string()))
            .await
            .unwrap();

        let first = events.recv().await.unwrap();
        assert!(matches!(first, SessionEvent::PromptAccepted { .. }));
    }

    #[tokio::test]
    async fn test_watch_sees_new_snapshot() {
        let (handle, _task) = spawn_store(SessionState::seeded(10));
        let mut watch = handle.watch();

        handle
            .apply(Update::PromptSubmitted("hello".to_string()))
            .await
            .unwrap();

        watch.changed().await.unwrap();
        assert!(watch.borrow().assistant_busy);
    }
}

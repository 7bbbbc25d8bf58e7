//! Fan-out of chat payloads to every other open connection.
//!
//! [`BroadcastRelay::on_message`] snapshots the [`ConnectionRegistry`] and
//! offers the payload to each member except the sender. Delivery never
//! waits: a target either accepts the payload into its outbound queue or
//! the attempt counts as that target's failure. Failures are local to the
//! target; a target that can no longer accept anything is unregistered.
//!
//! Per-source ordering comes from the caller. Each socket loop awaits
//! `on_message` for one payload before it reads the next, and every
//! target drains its queue in FIFO order.

use std::sync::Arc;

use super::{Connection, ConnectionRegistry, Payload};

/// Tally of one fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayOutcome {
    /// Targets whose queue accepted the payload.
    pub delivered: usize,
    /// Targets that were skipped but stay registered (queue full).
    pub dropped: usize,
    /// Targets removed from the registry because they are unusable.
    pub evicted: usize,
}

/// Rebroadcasts inbound payloads to all other registered connections.
#[derive(Debug, Clone)]
pub struct BroadcastRelay {
    registry: Arc<ConnectionRegistry>,
}

impl BroadcastRelay {
    /// Creates a relay over the given registry.
    #[must_use]
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Returns the registry this relay fans out over.
    #[must_use]
    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Delivers `payload` verbatim to every open member other than `source`.
    pub async fn on_message(&self, source: &Connection, payload: Payload) -> RelayOutcome {
        let targets = self.registry.snapshot().await;
        let mut outcome = RelayOutcome::default();
        let mut unusable = Vec::new();

        for target in targets.iter().filter(|t| *t != source) {
            match target.try_deliver(payload.clone()) {
                Ok(()) => outcome.delivered += 1,
                Err(err) => {
                    tracing::warn!(
                        source = %source.id(),
                        target = %target.id(),
                        error = %err,
                        "delivery failed"
                    );
                    if err.is_terminal() {
                        unusable.push(target);
                    } else {
                        outcome.dropped += 1;
                    }
                }
            }
        }

        for target in unusable {
            if self.registry.unregister(target).await {
                outcome.evicted += 1;
            }
        }

        tracing::debug!(
            source = %source.id(),
            kind = payload.kind(),
            bytes = payload.len(),
            delivered = outcome.delivered,
            dropped = outcome.dropped,
            evicted = outcome.evicted,
            "relayed message"
        );
        outcome
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use axum::body::Bytes;
    use tokio::sync::mpsc;

    use super::*;
    use crate::domain::ConnectionState;

    async fn join(
        registry: &ConnectionRegistry,
        capacity: usize,
    ) -> (Connection, mpsc::Receiver<Payload>) {
        let (conn, rx) = Connection::new(capacity);
        assert!(conn.mark_open());
        let Ok(()) = registry.register(conn.clone()).await else {
            panic!("registration failed");
        };
        (conn, rx)
    }

    fn text(s: &'static str) -> Payload {
        Payload::Text(s.into())
    }

    #[tokio::test]
    async fn sender_never_receives_own_message() {
        let registry = Arc::new(ConnectionRegistry::new());
        let relay = BroadcastRelay::new(Arc::clone(&registry));
        let (a, mut rx_a) = join(&registry, 8).await;
        let (_b, mut rx_b) = join(&registry, 8).await;
        let (_c, mut rx_c) = join(&registry, 8).await;

        let outcome = relay.on_message(&a, text("vamo furia")).await;
        assert_eq!(outcome.delivered, 2);

        assert!(rx_a.try_recv().is_err());
        assert_eq!(rx_b.try_recv().ok(), Some(text("vamo furia")));
        assert_eq!(rx_c.try_recv().ok(), Some(text("vamo furia")));
    }

    #[tokio::test]
    async fn lone_sender_delivers_to_nobody() {
        let registry = Arc::new(ConnectionRegistry::new());
        let relay = BroadcastRelay::new(Arc::clone(&registry));
        let (a, mut rx_a) = join(&registry, 8).await;

        let outcome = relay.on_message(&a, text("anyone?")).await;
        assert_eq!(outcome, RelayOutcome::default());
        assert!(rx_a.try_recv().is_err());
    }

    #[tokio::test]
    async fn binary_payload_arrives_byte_for_byte() {
        let registry = Arc::new(ConnectionRegistry::new());
        let relay = BroadcastRelay::new(Arc::clone(&registry));
        let (a, _rx_a) = join(&registry, 8).await;
        let (_b, mut rx_b) = join(&registry, 8).await;

        let raw = Payload::Binary(Bytes::from_static(&[0xde, 0xad, 0x00, 0xbe, 0xef]));
        relay.on_message(&a, raw.clone()).await;

        assert_eq!(rx_b.try_recv().ok(), Some(raw));
    }

    #[tokio::test]
    async fn closed_target_does_not_stop_the_others() {
        let registry = Arc::new(ConnectionRegistry::new());
        let relay = BroadcastRelay::new(Arc::clone(&registry));
        let (a, _rx_a) = join(&registry, 8).await;
        let (b, _rx_b) = join(&registry, 8).await;
        let (c, rx_c) = join(&registry, 8).await;
        let (_d, mut rx_d) = join(&registry, 8).await;

        // b closed between snapshot and delivery; c's socket loop is gone.
        b.mark_closed();
        drop(rx_c);

        let outcome = relay.on_message(&a, text("gg")).await;
        assert_eq!(outcome.delivered, 1);
        assert_eq!(outcome.evicted, 2);
        assert_eq!(rx_d.try_recv().ok(), Some(text("gg")));

        let members = registry.snapshot().await;
        assert!(!members.contains(&b));
        assert!(!members.contains(&c));
        assert_eq!(c.state(), ConnectionState::Closed);
    }

    #[tokio::test]
    async fn saturated_target_is_skipped_but_kept() {
        let registry = Arc::new(ConnectionRegistry::new());
        let relay = BroadcastRelay::new(Arc::clone(&registry));
        let (a, _rx_a) = join(&registry, 8).await;
        let (slow, mut rx_slow) = join(&registry, 1).await;
        let (_fast, mut rx_fast) = join(&registry, 8).await;

        relay.on_message(&a, text("first")).await;
        let outcome = relay.on_message(&a, text("second")).await;

        assert_eq!(outcome.delivered, 1);
        assert_eq!(outcome.dropped, 1);
        assert!(registry.snapshot().await.contains(&slow));
        assert_eq!(rx_slow.try_recv().ok(), Some(text("first")));
        assert!(rx_slow.try_recv().is_err());
        assert_eq!(rx_fast.try_recv().ok(), Some(text("first")));
        assert_eq!(rx_fast.try_recv().ok(), Some(text("second")));
    }

    #[tokio::test]
    async fn messages_from_one_source_keep_their_order() {
        let registry = Arc::new(ConnectionRegistry::new());
        let relay = BroadcastRelay::new(Arc::clone(&registry));
        let (a, _rx_a) = join(&registry, 64).await;
        let (b, mut rx_b) = join(&registry, 64).await;
        let (_c, mut rx_c) = join(&registry, 64).await;

        let sent: Vec<String> = (0..20).map(|i| format!("m{i}")).collect();
        for (i, msg) in sent.iter().enumerate() {
            // Interleave traffic from another source.
            if i % 3 == 0 {
                relay.on_message(&b, text("noise")).await;
            }
            relay
                .on_message(&a, Payload::Text(msg.clone().into()))
                .await;
        }

        let mut at_b = Vec::new();
        while let Ok(Payload::Text(t)) = rx_b.try_recv() {
            at_b.push(t.as_str().to_string());
        }
        assert_eq!(at_b, sent);

        let mut at_c = Vec::new();
        while let Ok(Payload::Text(t)) = rx_c.try_recv() {
            if t.as_str() != "noise" {
                at_c.push(t.as_str().to_string());
            }
        }
        assert_eq!(at_c, sent);
    }

    #[tokio::test]
    async fn newly_registered_connection_sees_next_message() {
        let registry = Arc::new(ConnectionRegistry::new());
        let relay = BroadcastRelay::new(Arc::clone(&registry));
        let (a, _rx_a) = join(&registry, 8).await;

        relay.on_message(&a, text("before")).await;
        let (_late, mut rx_late) = join(&registry, 8).await;
        relay.on_message(&a, text("after")).await;

        assert_eq!(rx_late.try_recv().ok(), Some(text("after")));
        assert!(rx_late.try_recv().is_err());
    }
}

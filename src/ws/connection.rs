//! Read/write loop for a single WebSocket connection.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};

use crate::domain::{BroadcastRelay, Connection, Payload};

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Exit {
    /// Client closed or the stream ended.
    ClientClosed,
    /// Transport read or write failed.
    TransportError,
    /// The registry dropped this connection (relay eviction or shutdown).
    Evicted,
}

/// Runs the relay loop for one upgraded socket.
///
/// - Registers the connection as soon as it is open.
/// - Hands each inbound text/binary frame to the relay, one at a time,
///   so frames from this client fan out in arrival order.
/// - Writes queued frames from other clients to this socket.
/// - Unregisters on close, transport error, or eviction.
pub async fn run_connection(socket: WebSocket, relay: BroadcastRelay, outbound_capacity: usize) {
    let (connection, mut outbound_rx) = Connection::new(outbound_capacity);
    let conn_id = connection.id();
    let (mut ws_tx, mut ws_rx) = socket.split();

    connection.mark_open();
    if let Err(err) = relay.registry().register(connection.clone()).await {
        tracing::warn!(conn_id = %conn_id, error = %err, "could not register connection");
        connection.mark_closed();
        let _ = ws_tx.send(Message::Close(None)).await;
        return;
    }
    tracing::info!(conn_id = %conn_id, "ws connection opened");

    let exit = loop {
        tokio::select! {
            // Incoming frame from this client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => break Exit::ClientClosed,
                    Some(Ok(message)) => {
                        if let Some(payload) = Payload::from_message(message) {
                            relay.on_message(&connection, payload).await;
                            // Let the targets' loops drain their queues before the next frame.
                            tokio::task::yield_now().await;
                        }
                    }
                    Some(Err(err)) => {
                        tracing::debug!(conn_id = %conn_id, error = %err, "ws read failed");
                        break Exit::TransportError;
                    }
                }
            }
            // Frame relayed from another client. `connection` holds the
            // sender, so the queue stays open for the whole loop.
            Some(payload) = outbound_rx.recv() => {
                if let Err(err) = ws_tx.send(payload.into_message()).await {
                    tracing::debug!(conn_id = %conn_id, error = %err, "ws write failed");
                    break Exit::TransportError;
                }
            }
            // Removed from the registry by someone else
            () = connection.closing() => break Exit::Evicted,
        }
    };

    relay.registry().unregister(&connection).await;
    connection.mark_closed();
    if exit == Exit::Evicted {
        let _ = ws_tx.send(Message::Close(None)).await;
    }

    tracing::info!(conn_id = %conn_id, reason = ?exit, "ws connection closed");
}

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use log::{debug, info, warn};
use warp::ws::{Message, WebSocket};

use crate::session_management::{SessionHooks, SessionManager};
use crate::transport::ChannelTransport;

/// Runs one websocket connection as a bridge session until either side closes it.
///
/// Outbound commands are written by a dedicated task, in the order they were queued.
/// Inbound text frames are client messages for this session.
pub async fn client_connection(
    socket: WebSocket,
    manager: Arc<SessionManager>,
    hooks: Arc<dyn SessionHooks>,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (transport, mut outbound) = ChannelTransport::new();

    let handle = match manager.create_session(Arc::new(transport)) {
        Ok(handle) => handle,
        Err(e) => {
            warn!("websocket refused: {}", e);
            let _ = ws_tx.send(Message::close()).await;
            return;
        }
    };
    let session_id = handle.id();

    let writer = tokio::spawn(async move {
        while let Some(text) = outbound.recv().await {
            if let Err(e) = ws_tx.send(Message::text(text)).await {
                debug!("[{}] websocket write failed: {}", session_id, e);
                break;
            }
        }
        let _ = ws_tx.close().await;
    });

    hooks.on_session_start(handle.clone());

    while let Some(frame) = ws_rx.next().await {
        let message = match frame {
            Ok(message) => message,
            Err(e) => {
                debug!("[{}] websocket read failed: {}", session_id, e);
                break;
            }
        };
        if message.is_close() {
            break;
        }
        // pings and binary frames carry nothing for us
        let Ok(text) = message.to_str() else {
            continue;
        };
        if let Err(e) = manager.handle_client_message(session_id, text) {
            warn!("[{}] ignored client message: {}", session_id, e);
        }
    }

    hooks.on_session_end(&handle);
    if let Err(e) = manager.close_session(session_id) {
        debug!("[{}] close: {}", session_id, e);
    }
    writer.abort();
    info!("[{}] websocket disconnected", session_id);
}

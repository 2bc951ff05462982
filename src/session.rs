//! One live client session: websocket loop, per-frame pipeline dispatch,
//! deterministic teardown.

use crate::config::Config;
use crate::face_detection::create_extractor;
use crate::pipeline::{FramePipeline, SharedSmoother};
use crate::protocol::FrameReply;
use crate::smoothing::SessionId;
use crate::{Error, Result};
use futures_util::{SinkExt, StreamExt};
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::protocol::{Message, WebSocketConfig};

/// Session lifecycle. `Disconnected` is terminal; per-frame errors never
/// reach it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Connected,
    Streaming,
    Disconnected,
}

/// Run one client session to completion.
///
/// Frames are pulled and answered strictly sequentially: the next frame is
/// not read until the previous reply has been sent, so the smoother's
/// recurrence order matches arrival order and the socket itself provides
/// backpressure against a fast sender.
pub async fn run_session(
    stream: TcpStream,
    session: SessionId,
    config: Arc<Config>,
    smoother: SharedSmoother,
) -> Result<()> {
    let mut ws_config = WebSocketConfig::default();
    ws_config.max_message_size = Some(config.server.max_message_size);
    ws_config.max_frame_size = Some(config.server.max_message_size);
    let mut ws = tokio_tungstenite::accept_async_with_config(stream, Some(ws_config)).await?;

    let extractor = create_extractor(&config.detection)?;
    info!("session {}: connected (extractor: {})", session, extractor.name());
    let cleanup_smoother = Arc::clone(&smoother);
    let mut pipeline = Some(FramePipeline::new(session, extractor, &config, smoother));
    let mut state = SessionState::Connected;

    // Every exit path, error or not, must fall through to the teardown below,
    // so errors break out of the loop instead of returning early.
    let result = loop {
        let msg = match ws.next().await {
            Some(Ok(msg)) => msg,
            Some(Err(err)) => break Err(Error::Transport(err)),
            None => break Ok(()),
        };

        match msg {
            Message::Binary(bytes) => {
                if state == SessionState::Connected {
                    state = SessionState::Streaming;
                    debug!("session {}: streaming", session);
                }

                // The pipeline does CPU-bound decode and math; run it off the
                // runtime worker, but await it inline so frame N's result is
                // applied before frame N+1 is read.
                let Some(mut active) = pipeline.take() else {
                    break Err(Error::Internal("frame pipeline missing".to_string()));
                };
                let joined = tokio::task::spawn_blocking(move || {
                    let reply = active.process_frame(&bytes);
                    (active, reply)
                })
                .await;
                let (returned, reply) = match joined {
                    Ok(pair) => pair,
                    Err(err) => break Err(Error::Internal(format!("pipeline task failed: {err}"))),
                };
                pipeline = Some(returned);

                if let Err(err) = send_reply(&mut ws, &reply).await {
                    break Err(err);
                }
            }
            Message::Ping(payload) => {
                if let Err(err) = ws.send(Message::Pong(payload)).await {
                    break Err(Error::Transport(err));
                }
            }
            Message::Close(_) => break Ok(()),
            Message::Text(text) => {
                debug!("session {}: ignoring text message ({} bytes)", session, text.len());
            }
            Message::Pong(_) | Message::Frame(_) => {}
        }
    };

    state = SessionState::Disconnected;
    match pipeline {
        Some(mut p) => p.teardown(),
        // The pipeline was lost to a panicked worker; drop the smoothing
        // entry directly so no per-session state outlives the connection.
        None => {
            if let Ok(mut s) = cleanup_smoother.lock() {
                s.remove(session);
            }
        }
    }
    match &result {
        Ok(()) => info!("session {}: {:?}", session, state),
        Err(err) => warn!("session {}: {:?} with error: {}", session, state, err),
    }
    result
}

async fn send_reply<S>(ws: &mut S, reply: &FrameReply) -> Result<()>
where
    S: SinkExt<Message, Error = tokio_tungstenite::tungstenite::Error> + Unpin,
{
    let body = serde_json::to_string(reply)
        .map_err(|e| Error::Internal(format!("reply serialization failed: {e}")))?;
    ws.send(Message::Text(body)).await.map_err(Error::Transport)
}

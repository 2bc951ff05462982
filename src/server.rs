//! WebSocket server: accept loop, per-session tasks, health probes.
//!
//! Each accepted connection gets its own tokio task and session id. Sessions
//! share nothing but the read-only configuration and the keyed smoothing map.
//! Plain HTTP GETs on the same listener (no websocket upgrade) are answered
//! directly as liveness/status probes.

use crate::config::Config;
use crate::pipeline::SharedSmoother;
use crate::protocol::{HealthReply, StatusReply};
use crate::session::run_session;
use crate::smoothing::{PoseSmoother, SessionId};
use crate::Result;
use log::{debug, info, warn};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// A bound server, ready to accept sessions
pub struct Server {
    listener: TcpListener,
    config: Arc<Config>,
    smoother: SharedSmoother,
}

impl Server {
    /// Validate the configuration and bind the listener
    pub async fn bind(config: Config) -> Result<Self> {
        config.validate()?;
        let listener = TcpListener::bind(config.bind_addr()).await?;
        info!(
            "Hat try-on backend listening on {} (extractor: {})",
            listener.local_addr()?,
            config.detection.extractor
        );
        let smoother = Arc::new(Mutex::new(PoseSmoother::new(config.smoothing.factor)));
        Ok(Self {
            listener,
            config: Arc::new(config),
            smoother,
        })
    }

    /// The address the listener actually bound (useful with port 0)
    pub fn local_addr(&self) -> Result<std::net::SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept and serve sessions until the task is cancelled
    pub async fn serve(self) -> Result<()> {
        let mut next_session: SessionId = 0;
        loop {
            let (stream, peer) = self.listener.accept().await?;
            next_session += 1;
            let session = next_session;
            debug!("session {}: accepted from {}", session, peer);

            let config = Arc::clone(&self.config);
            let smoother = Arc::clone(&self.smoother);
            tokio::spawn(async move {
                if let Err(err) = handle_connection(stream, session, config, smoother).await {
                    warn!("session {}: {}", session, err);
                }
            });
        }
    }
}

/// Bind and serve in one call
pub async fn run(config: Config) -> Result<()> {
    Server::bind(config).await?.serve().await
}

async fn handle_connection(
    stream: TcpStream,
    session: SessionId,
    config: Arc<Config>,
    smoother: SharedSmoother,
) -> Result<()> {
    // A plain GET without a websocket upgrade is a probe; answer it inline
    // and close. Anything else goes through the websocket handshake.
    if let Some(path) = peek_probe_path(&stream).await? {
        return answer_probe(stream, &path, &config).await;
    }
    run_session(stream, session, config, smoother).await
}

/// Request heads larger than this are never treated as probes
const PROBE_HEAD_LIMIT: usize = 4096;

/// How long to wait for a slow client to finish sending its request head
const PROBE_HEAD_TIMEOUT: Duration = Duration::from_millis(500);

/// Peek the request head without consuming it. Returns the request path for
/// a non-upgrade HTTP GET, `None` when the client is starting a websocket
/// handshake (or the head is oversized or stalled, in which case the
/// handshake path will produce the proper error).
async fn peek_probe_path(stream: &TcpStream) -> Result<Option<String>> {
    let mut buf = [0u8; PROBE_HEAD_LIMIT];
    let deadline = Instant::now() + PROBE_HEAD_TIMEOUT;
    let mut seen = 0;
    loop {
        let n = stream.peek(&mut buf).await?;
        let head = String::from_utf8_lossy(&buf[..n]);

        if head.to_ascii_lowercase().contains("sec-websocket-key") {
            return Ok(None);
        }
        if head.contains("\r\n\r\n") {
            let mut parts = head.split_whitespace();
            return match (parts.next(), parts.next()) {
                (Some("GET"), Some(path)) => Ok(Some(path.to_string())),
                _ => Ok(None),
            };
        }
        // Head incomplete: wait for the rest of it instead of classifying
        // on a partial packet
        if n == buf.len() || Instant::now() >= deadline {
            return Ok(None);
        }
        if n == seen {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        seen = n;
    }
}

async fn answer_probe(mut stream: TcpStream, path: &str, config: &Config) -> Result<()> {
    // Drain the full request head before replying so the close handshake is
    // clean (unread bytes at close can reset the socket and clip the reply)
    let mut sink = [0u8; PROBE_HEAD_LIMIT];
    let mut head = Vec::new();
    loop {
        let n = stream.read(&mut sink).await?;
        head.extend_from_slice(&sink[..n]);
        if n == 0 || head.len() >= PROBE_HEAD_LIMIT || head.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }

    let (status_line, body) = match path {
        "/" | "/healthz" => ("200 OK", serde_json::to_string(&HealthReply::healthy())),
        "/status" => ("200 OK", serde_json::to_string(&StatusReply::from_config(config))),
        _ => ("404 Not Found", serde_json::to_string(&NotFound::default())),
    };
    let body = body.unwrap_or_else(|_| "{}".to_string());
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_line,
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct NotFound {
    error: String,
}

impl Default for NotFound {
    fn default() -> Self {
        Self {
            error: "not found".to_string(),
        }
    }
}

//! Simulation WebSocket channel.
//!
//! # Responsibilities
//! - Open a WebSocket session against the backend simulation endpoint
//! - Send JSON payloads as text frames
//! - Read JSON replies, skipping control frames
//!
//! # Data Flow
//! ```text
//! SimulateForm view ──── JSON text frames ────→ backend ws/simulation/
//!                   ←─── {"message": ...} ─────
//! ```
//!
//! # Design Decisions
//! - Connect and request/reply are bounded by the configured timeout
//! - Ping/pong is answered by tungstenite; callers only see data frames
//! - A close frame ends the reply stream (`None`), not an error

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::config::SimulationConfig;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Errors on the simulation channel.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error("could not connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: tungstenite::Error,
    },

    #[error("simulation channel timed out after {0} ms")]
    Timeout(u64),

    #[error("simulation channel error: {0}")]
    Socket(#[source] tungstenite::Error),

    #[error("simulation channel closed by the server")]
    Closed,

    #[error("invalid simulation message: {0}")]
    Json(#[from] serde_json::Error),
}

/// A reply frame from the simulation endpoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SimulationReply {
    #[serde(default)]
    pub message: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An open simulation session.
pub struct SimulationSession {
    socket: Socket,
    url: String,
    timeout: Duration,
}

impl std::fmt::Debug for SimulationSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationSession")
            .field("url", &self.url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl SimulationSession {
    /// Connect to the configured simulation endpoint.
    pub async fn connect(config: &SimulationConfig) -> Result<Self, SimulationError> {
        let limit = Duration::from_millis(config.timeout_ms);
        let (socket, _response) = match timeout(limit, connect_async(config.url.as_str())).await {
            Ok(Ok(connected)) => connected,
            Ok(Err(source)) => {
                return Err(SimulationError::Connect {
                    url: config.url.clone(),
                    source,
                })
            }
            Err(_) => return Err(SimulationError::Timeout(config.timeout_ms)),
        };

        tracing::info!(url = %config.url, "Simulation session established");
        Ok(Self {
            socket,
            url: config.url.clone(),
            timeout: limit,
        })
    }

    /// Send one JSON payload.
    pub async fn send(&mut self, payload: &Value) -> Result<(), SimulationError> {
        let text = serde_json::to_string(payload)?;
        tracing::debug!(url = %self.url, bytes = text.len(), "Sending simulation frame");
        self.socket
            .send(Message::Text(text.into()))
            .await
            .map_err(SimulationError::Socket)
    }

    /// Next data frame, or `None` once the server closes the session.
    pub async fn next_message(&mut self) -> Result<Option<SimulationReply>, SimulationError> {
        while let Some(frame) = self.socket.next().await {
            match frame.map_err(SimulationError::Socket)? {
                Message::Text(text) => return Ok(Some(serde_json::from_str(text.as_str())?)),
                Message::Binary(bytes) => return Ok(Some(serde_json::from_slice(&bytes)?)),
                Message::Close(frame) => {
                    tracing::debug!(url = %self.url, frame = ?frame, "Simulation session closed by server");
                    return Ok(None);
                }
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => continue,
            }
        }
        Ok(None)
    }

    /// Send a payload and wait for the reply.
    pub async fn request(&mut self, payload: &Value) -> Result<SimulationReply, SimulationError> {
        self.send(payload).await?;
        match timeout(self.timeout, self.next_message()).await {
            Ok(Ok(Some(reply))) => Ok(reply),
            Ok(Ok(None)) => Err(SimulationError::Closed),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(SimulationError::Timeout(self.timeout.as_millis() as u64)),
        }
    }

    /// Close the session with a normal close frame.
    pub async fn close(mut self) -> Result<(), SimulationError> {
        match self.socket.close(None).await {
            Ok(())
            | Err(tungstenite::Error::ConnectionClosed)
            | Err(tungstenite::Error::AlreadyClosed) => {
                tracing::debug!(url = %self.url, "Simulation session closed");
                Ok(())
            }
            Err(e) => Err(SimulationError::Socket(e)),
        }
    }
}

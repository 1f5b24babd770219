//! WebSocket connection lifecycle.
//!
//! [`TankConnection`] owns exactly one connection to the tank server and
//! its [`ConnectionState`].  After the handshake it sends a single opaque
//! text greeting (the initiation signal the server expects before it starts
//! streaming), then forwards every inbound text payload to the
//! [`TankClient`] pipeline.  There is no reconnect: once the connection
//! closes, the manager stays `Closed` and issues no further sends.

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{info, warn};

use tankview_types::{ConnectionState, TankError, TelemetryFrame};

use crate::client::{TankClient, TransportEvent};

/// Default greeting sent right after the handshake.  The content is opaque
/// to the server; it only marks the client as ready.
pub const DEFAULT_GREETING: &str = "tankview client ready";

/// Manager for the single WebSocket connection to the tank server.
pub struct TankConnection {
    url: String,
    greeting: String,
    state: ConnectionState,
}

impl TankConnection {
    /// Create a manager for `url` (e.g. `"ws://localhost:7799"`).
    ///
    /// The manager starts in [`ConnectionState::Connecting`]; [`run`]
    /// performs the actual handshake.
    ///
    /// [`run`]: TankConnection::run
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            greeting: DEFAULT_GREETING.to_string(),
            state: ConnectionState::Connecting,
        }
    }

    /// Override the greeting payload (builder-style).
    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = greeting.into();
        self
    }

    /// The configured server endpoint.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Connect and process the message stream until the server closes it.
    ///
    /// Every inbound text payload drives one synchronous pipeline pass on
    /// `client`; after each successfully rendered frame `on_frame` is
    /// invoked so the caller can persist or forward the updated document.
    /// Pipeline failures drop the offending frame, log it, and keep the
    /// stream going.  Ping/pong and binary messages are ignored.
    ///
    /// # Errors
    ///
    /// [`TankError::Transport`] when the handshake or the greeting send
    /// fails, [`TankError::ConnectionLost`] when the stream dies with a
    /// read error.  An orderly close by the server is `Ok`.
    pub async fn run<F>(&mut self, client: &mut TankClient, mut on_frame: F) -> Result<(), TankError>
    where
        F: FnMut(&TankClient, &TelemetryFrame),
    {
        self.state = ConnectionState::Connecting;
        let (ws_stream, _) = match connect_async(self.url.as_str()).await {
            Ok(pair) => pair,
            Err(e) => {
                self.state = ConnectionState::Closed;
                return Err(TankError::Transport(format!(
                    "handshake with {} failed: {e}",
                    self.url
                )));
            }
        };

        self.state = ConnectionState::Open;
        info!(url = %self.url, "connection open");
        client.handle_event(TransportEvent::Opened)?;

        let (mut ws_tx, mut ws_rx) = ws_stream.split();
        if let Err(e) = ws_tx.send(Message::Text(self.greeting.clone().into())).await {
            self.state = ConnectionState::Closed;
            return Err(TankError::Transport(format!("greeting send failed: {e}")));
        }

        while let Some(msg) = ws_rx.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    match client.handle_event(TransportEvent::MessageReceived(
                        text.as_str().to_string(),
                    )) {
                        Ok(Some(frame)) => on_frame(client, &frame),
                        Ok(None) => {}
                        Err(e) => warn!(error = %e, "frame dropped"),
                    }
                }
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    self.state = ConnectionState::Closed;
                    client.handle_event(TransportEvent::Closed)?;
                    warn!(url = %self.url, error = %e, "connection lost");
                    return Err(TankError::ConnectionLost(e.to_string()));
                }
            }
        }

        self.state = ConnectionState::Closed;
        client.handle_event(TransportEvent::Closed)?;
        info!(url = %self.url, "connection closed by server, not reconnecting");
        Ok(())
    }
}

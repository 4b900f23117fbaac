//! Live evaluation stream
//!
//! [`EvalStream`] owns one background task holding the websocket to the
//! analysis backend. Positions go in through [`EvalStream::update_position`];
//! evaluation messages come out on the channel given to [`EvalStream::open`].
//! A missing socket or failed send is answered by opening a fresh connection,
//! never by queuing. Closing or dropping the handle tears the connection down.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use shared::protocol::{AnalysisMessage, AnalysisRequest, ANALYSIS_DEPTH, ANALYSIS_VARIANTS};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use websocket::{ClientBuilder, MaybeTlsStream, Message, WebSocketStream};

use crate::networking::error::{NetworkError, NetworkResult};

pub const DEFAULT_EVAL_URL: &str = "wss://chess-api.com/v1";

/// Pause before reconnecting after the backend dropped the connection
const RECONNECT_DELAY: Duration = Duration::from_millis(500);

/// Upper bound on the websocket handshake
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// How long `close` waits for a clean shutdown before aborting the task
const CLOSE_GRACE: Duration = Duration::from_millis(200);

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Where and how deep to analyse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalStreamConfig {
    pub url: String,
    pub depth: u32,
    pub variants: u32,
}

impl Default for EvalStreamConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_EVAL_URL.to_string(),
            depth: ANALYSIS_DEPTH,
            variants: ANALYSIS_VARIANTS,
        }
    }
}

impl EvalStreamConfig {
    fn request(&self, fen: &str) -> AnalysisRequest {
        AnalysisRequest {
            fen: fen.to_string(),
            depth: self.depth,
            variants: self.variants,
        }
    }
}

/// Handle to the running analysis connection
#[derive(Debug)]
pub struct EvalStream {
    positions: Option<mpsc::UnboundedSender<String>>,
    task: Option<JoinHandle<()>>,
}

impl EvalStream {
    /// Connect in the background and analyse `initial_fen` straight away
    ///
    /// Must be called from within a tokio runtime.
    pub fn open(
        config: EvalStreamConfig,
        initial_fen: String,
        events: mpsc::UnboundedSender<AnalysisMessage>,
    ) -> Self {
        info!("[EVAL] Opening analysis stream to {}", config.url);
        let (positions, receiver) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_stream(config, initial_fen, receiver, events));
        Self {
            positions: Some(positions),
            task: Some(task),
        }
    }

    /// Ask for analysis of a new position; `false` once the stream has ended
    pub fn update_position(&self, fen: &str) -> bool {
        self.positions
            .as_ref()
            .is_some_and(|positions| positions.send(fen.to_string()).is_ok())
    }

    /// Close the connection, giving the task a short grace period to say
    /// goodbye before it is aborted
    ///
    /// A task stuck connecting or waiting to reconnect is aborted, so this
    /// returns within [`CLOSE_GRACE`].
    pub async fn close(mut self) {
        self.positions.take();
        if let Some(mut task) = self.task.take() {
            match tokio::time::timeout(CLOSE_GRACE, &mut task).await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => warn!("[EVAL] Stream task ended abnormally: {}", err),
                Err(_) => {
                    debug!("[EVAL] Stream task still busy; aborting");
                    task.abort();
                }
            }
        }
        info!("[EVAL] Analysis stream closed");
    }
}

impl Drop for EvalStream {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run_stream(
    config: EvalStreamConfig,
    initial_fen: String,
    mut positions: mpsc::UnboundedReceiver<String>,
    events: mpsc::UnboundedSender<AnalysisMessage>,
) {
    let mut current = initial_fen;
    let mut socket = send_position(&config, None, &current).await;

    loop {
        tokio::select! {
            fen = positions.recv() => {
                let Some(fen) = fen else { break };
                current = latest_position(&mut positions, fen);
                socket = send_position(&config, socket.take(), &current).await;
            }
            message = next_message(&mut socket) => match message {
                Some(Ok(message)) => {
                    let Some(text) = message.as_text() else { continue };
                    match serde_json::from_str::<AnalysisMessage>(text) {
                        Ok(analysis) if analysis.is_evaluation() => {
                            if events.send(analysis).is_err() {
                                break;
                            }
                        }
                        Ok(_) => debug!("[EVAL] Ignoring non-evaluation message"),
                        Err(err) => debug!("[EVAL] Unparsable message: {}", err),
                    }
                }
                Some(Err(err)) => {
                    warn!("[EVAL] Connection error: {}", err);
                    tokio::time::sleep(RECONNECT_DELAY).await;
                    current = latest_position(&mut positions, current);
                    socket = send_position(&config, None, &current).await;
                }
                None => {
                    debug!("[EVAL] Connection closed by backend");
                    tokio::time::sleep(RECONNECT_DELAY).await;
                    current = latest_position(&mut positions, current);
                    socket = send_position(&config, None, &current).await;
                }
            },
        }
    }

    if let Some(mut socket) = socket {
        if let Err(err) = socket.close().await {
            debug!("[EVAL] Close failed: {}", err);
        }
    }
}

/// Newest position waiting in `positions`, or `fen` if none arrived since.
/// Positions superseded while a send or reconnect was in progress are skipped.
fn latest_position(positions: &mut mpsc::UnboundedReceiver<String>, mut fen: String) -> String {
    while let Ok(newer) = positions.try_recv() {
        fen = newer;
    }
    fen
}

/// Next message from the socket; never resolves while disconnected
async fn next_message(socket: &mut Option<Socket>) -> Option<Result<Message, websocket::Error>> {
    match socket {
        Some(socket) => socket.next().await,
        None => std::future::pending().await,
    }
}

/// Send `fen` on `socket`, opening a fresh connection if there is none or the
/// send fails. Returns the socket to keep, if any.
async fn send_position(config: &EvalStreamConfig, socket: Option<Socket>, fen: &str) -> Option<Socket> {
    let payload = match serde_json::to_string(&config.request(fen)) {
        Ok(payload) => payload,
        Err(err) => {
            warn!("[EVAL] Could not encode request: {}", err);
            return socket;
        }
    };

    if let Some(mut socket) = socket {
        match send_text(&mut socket, &payload).await {
            Ok(()) => return Some(socket),
            Err(err) => warn!("[EVAL] {}; reconnecting", err),
        }
    }

    let mut socket = match connect(&config.url).await {
        Ok(socket) => socket,
        Err(err) => {
            warn!("[EVAL] {}", err);
            return None;
        }
    };
    match send_text(&mut socket, &payload).await {
        Ok(()) => Some(socket),
        Err(err) => {
            warn!("[EVAL] {}", err);
            None
        }
    }
}

async fn connect(url: &str) -> NetworkResult<Socket> {
    let connect_error = |message: String| NetworkError::Connect {
        url: url.to_string(),
        message,
    };
    let builder = ClientBuilder::new()
        .uri(url)
        .map_err(|e| connect_error(e.to_string()))?;
    let (socket, _response) = tokio::time::timeout(CONNECT_TIMEOUT, builder.connect())
        .await
        .map_err(|_| connect_error(format!("handshake timed out after {CONNECT_TIMEOUT:?}")))?
        .map_err(|e| connect_error(e.to_string()))?;
    debug!("[EVAL] Connected to {}", url);
    Ok(socket)
}

async fn send_text(socket: &mut Socket, payload: &str) -> NetworkResult<()> {
    socket
        .send(Message::text(payload.to_string()))
        .await
        .map_err(|e| NetworkError::Send {
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_position_skips_superseded() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        for fen in ["a", "b", "c"] {
            tx.send(fen.to_string()).unwrap();
        }
        assert_eq!(latest_position(&mut rx, "start".to_string()), "c");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_latest_position_keeps_current_when_nothing_queued() {
        let (_tx, mut rx) = mpsc::unbounded_channel::<String>();
        assert_eq!(latest_position(&mut rx, "start".to_string()), "start");
    }

    #[tokio::test]
    async fn test_close_returns_while_handshake_hangs() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // accept and hold connections without ever answering the upgrade
        let _holder = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let (events, _events_rx) = mpsc::unbounded_channel();
        let config = EvalStreamConfig {
            url: format!("ws://{addr}/"),
            ..EvalStreamConfig::default()
        };
        let stream = EvalStream::open(config, "8/8/8/8/8/8/8/K1k5 w - - 0 1".to_string(), events);
        tokio::time::sleep(Duration::from_millis(50)).await;

        tokio::time::timeout(Duration::from_secs(1), stream.close())
            .await
            .expect("close must not wait for the handshake");
    }
}

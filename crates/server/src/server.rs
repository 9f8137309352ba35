//! TCP server for duel clients
//!
//! Handles incoming connections and manages client lifecycle.
//! Uses tokio for async networking.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use tetris_duel_core::{RoomRegistry, SessionServices};
use tetris_duel_types::PlayerId;

use crate::config::ServerConfig;
use crate::engine::{Engine, EngineEvent};
use crate::hub::ConnectionHub;
use crate::protocol::{encode, parse_message, ServerMessage};
use crate::ticker::IntervalTicks;

/// Longest inbound line accepted, newline included.
pub const MAX_LINE_BYTES: usize = 8 * 1024;

/// Bind, start the engine and accept clients until the listener fails.
///
/// `ready_tx` receives the bound address once the socket is listening,
/// which lets callers bind port 0 and learn the real port.
pub async fn run_server(
    config: ServerConfig,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(&addr).await?;
    let bound = listener.local_addr()?;
    info!(%bound, tick_ms = config.tick_ms, randomizer = ?config.randomizer, "server listening");
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let hub = Arc::new(ConnectionHub::new());
    let (events_tx, events_rx) = mpsc::unbounded_channel::<EngineEvent>();
    let services = SessionServices::new(
        hub.clone(),
        Arc::new(IntervalTicks::new(config.tick_interval(), events_tx.clone())),
        config.piece_source_factory(),
    );
    tokio::spawn(Engine::new(RoomRegistry::new(services)).run(events_rx));

    let mut player_counter = 0u64;

    // Accept incoming connections
    loop {
        let (socket, addr) = listener.accept().await?;
        player_counter += 1;
        let player = PlayerId(player_counter);

        info!(%player, %addr, "client connected");

        let hub = Arc::clone(&hub);
        let events = events_tx.clone();

        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, player, hub, events).await {
                warn!(%player, error = %e, "client error");
            }
            info!(%player, "client disconnected");
        });
    }
}

/// Handle a single client connection
async fn handle_client(
    socket: TcpStream,
    player: PlayerId,
    hub: Arc<ConnectionHub>,
    events: mpsc::UnboundedSender<EngineEvent>,
) -> anyhow::Result<()> {
    let (reader, mut writer) = socket.into_split();
    let mut reader = BufReader::new(reader);

    // Channel to send lines to this client
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    hub.register(player, tx.clone());

    let write_task = tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            if writer.write_all(line.as_bytes()).await.is_err() {
                break;
            }
            if writer.write_all(b"\n").await.is_err() {
                break;
            }
            if writer.flush().await.is_err() {
                break;
            }
        }
    });

    let result = read_loop(&mut reader, player, &tx, &events).await;

    // Whatever ended the read side, the player is gone.
    hub.unregister(player);
    let _ = events.send(EngineEvent::Disconnected { player });
    drop(tx);
    let _ = write_task.await;

    result
}

async fn read_loop<R>(
    reader: &mut BufReader<R>,
    player: PlayerId,
    tx: &mpsc::UnboundedSender<String>,
    events: &mpsc::UnboundedSender<EngineEvent>,
) -> anyhow::Result<()>
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let bytes_read = (&mut *reader)
            .take(MAX_LINE_BYTES as u64)
            .read_until(b'\n', &mut buf)
            .await?;
        if bytes_read == 0 {
            return Ok(());
        }
        if bytes_read == MAX_LINE_BYTES && buf.last() != Some(&b'\n') {
            warn!(%player, limit = MAX_LINE_BYTES, "line too long, skipped");
            reply_error(player, tx, format!("Message exceeds {MAX_LINE_BYTES} bytes"));
            if !discard_line(reader).await? {
                return Ok(());
            }
            continue;
        }

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line,
            Err(e) => {
                warn!(%player, error = %e, "non-utf8 message");
                reply_error(player, tx, format!("Malformed message: {e}"));
                continue;
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match parse_message(trimmed) {
            Ok(message) => {
                if events.send(EngineEvent::Inbound { player, message }).is_err() {
                    return Ok(());
                }
            }
            Err(e) => {
                warn!(%player, error = %e, "malformed message");
                reply_error(player, tx, format!("Malformed message: {e}"));
            }
        }
    }
}

/// Drop input up to and including the next newline. False on EOF.
async fn discard_line<R>(reader: &mut BufReader<R>) -> std::io::Result<bool>
where
    R: tokio::io::AsyncRead + Unpin,
{
    loop {
        let chunk = reader.fill_buf().await?;
        if chunk.is_empty() {
            return Ok(false);
        }
        if let Some(end) = chunk.iter().position(|&b| b == b'\n') {
            reader.consume(end + 1);
            return Ok(true);
        }
        let len = chunk.len();
        reader.consume(len);
    }
}

fn reply_error(player: PlayerId, tx: &mpsc::UnboundedSender<String>, message: String) {
    match encode(&ServerMessage::error(message)) {
        Ok(out) => {
            let _ = tx.send(out);
        }
        Err(e) => debug!(%player, error = %e, "failed to encode error reply"),
    }
}

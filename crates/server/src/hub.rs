//! Connection hub - player id to outbound line queue.
//!
//! The engine delivers through this hub synchronously; each connection's
//! writer task drains its own queue, so a slow socket never stalls a tick.

use std::collections::HashMap;
use std::sync::RwLock;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use tetris_duel_core::{SyncChannel, SyncEvent};
use tetris_duel_types::PlayerId;

use crate::protocol::{encode, ServerMessage};

/// Outbound queue for one connection. Lines carry no trailing newline.
pub type LineSender = mpsc::UnboundedSender<String>;

#[derive(Debug, Default)]
pub struct ConnectionHub {
    clients: RwLock<HashMap<PlayerId, LineSender>>,
}

impl ConnectionHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, player: PlayerId, tx: LineSender) {
        if let Ok(mut clients) = self.clients.write() {
            clients.insert(player, tx);
        }
    }

    pub fn unregister(&self, player: PlayerId) {
        if let Ok(mut clients) = self.clients.write() {
            clients.remove(&player);
        }
    }

    pub fn len(&self) -> usize {
        self.clients.read().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Queue a preformatted line. Unknown or closed connections are skipped.
    pub fn send_line(&self, player: PlayerId, line: &str) {
        let Ok(clients) = self.clients.read() else {
            return;
        };
        match clients.get(&player) {
            Some(tx) => {
                if tx.send(line.to_string()).is_err() {
                    debug!(%player, "outbound queue closed");
                }
            }
            None => debug!(%player, "no connection for player"),
        }
    }

    fn render(event: &SyncEvent) -> Option<String> {
        match encode(&ServerMessage::from(event)) {
            Ok(line) => Some(line),
            Err(e) => {
                warn!(event = event.name(), error = %e, "failed to encode message");
                None
            }
        }
    }
}

impl SyncChannel for ConnectionHub {
    fn send(&self, to: PlayerId, event: &SyncEvent) {
        if let Some(line) = Self::render(event) {
            self.send_line(to, &line);
        }
    }

    fn broadcast(&self, members: &[PlayerId], event: &SyncEvent) {
        let Some(line) = Self::render(event) else {
            return;
        };
        for &member in members {
            self.send_line(member, &line);
        }
    }
}

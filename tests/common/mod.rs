//! Shared fixtures for the session and registry tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use tetris_duel::core::{
    GameSession, ManualTicks, PieceSource, SequenceSource, SessionServices, SyncChannel, SyncEvent,
};
use tetris_duel::types::{PieceKind, PlayerId, RoomId};

pub const P1: PlayerId = PlayerId(1);
pub const P2: PlayerId = PlayerId(2);
pub const P3: PlayerId = PlayerId(3);

/// SyncChannel that keeps every delivery, per recipient, in order.
#[derive(Debug, Default)]
pub struct RecordingSync {
    events: Mutex<Vec<(PlayerId, SyncEvent)>>,
}

impl RecordingSync {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Drain everything recorded so far.
    pub fn take(&self) -> Vec<(PlayerId, SyncEvent)> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    /// Event names delivered to `player`, in order.
    pub fn names_for(&self, player: PlayerId) -> Vec<&'static str> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(to, _)| *to == player)
            .map(|(_, e)| e.name())
            .collect()
    }

    pub fn count(&self, player: PlayerId, name: &str) -> usize {
        self.names_for(player).into_iter().filter(|n| *n == name).count()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().unwrap().is_empty()
    }
}

impl SyncChannel for RecordingSync {
    fn send(&self, to: PlayerId, event: &SyncEvent) {
        self.events.lock().unwrap().push((to, event.clone()));
    }
}

/// Services whose every session draws `kinds` in a loop.
pub fn services(sync: Arc<RecordingSync>, ticks: &ManualTicks, kinds: &[PieceKind]) -> SessionServices {
    let kinds = kinds.to_vec();
    SessionServices::new(
        sync,
        Arc::new(ticks.clone()),
        Arc::new(move || Box::new(SequenceSource::new(kinds.clone())) as Box<dyn PieceSource>),
    )
}

/// A running two-player session with the join/start chatter already drained.
pub fn duel(kind: PieceKind) -> (GameSession, Arc<RecordingSync>, ManualTicks) {
    let sync = RecordingSync::new();
    let ticks = ManualTicks::new();
    let mut session = GameSession::new(RoomId::from("duel"), &services(sync.clone(), &ticks, &[kind]));
    session.join(P1).unwrap();
    session.join(P2).unwrap();
    sync.clear();
    (session, sync, ticks)
}

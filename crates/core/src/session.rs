//! Per-room match state machine.
//!
//! ```text
//! Waiting --second join--> Active --top-out / forfeit / disconnect--> Ended
//!    \______________________ forfeit / disconnect ______________________/
//! ```
//!
//! A session owns both players' boards and pieces and the one clock that
//! drives gravity. It holds a tick handle exactly while Active, and every
//! exit goes through [`GameSession::terminate`], which cancels that handle
//! before anything else happens.
//!
//! None of the methods here suspend. Callers are expected to feed ticks and
//! inputs one at a time from a single task, which is what keeps a tick and an
//! input from ever interleaving on the same board.

use std::sync::Arc;

use arrayvec::ArrayVec;
use tracing::{debug, info};

use crate::error::GameError;
use crate::player::{ActionOutcome, GravityOutcome, PlayerState};
use crate::rng::{PieceGenerator, PieceSource};
use crate::snapshot::{PlayerSnapshot, SessionSnapshot};
use crate::sync::{SyncChannel, SyncEvent};
use crate::tick::{TickHandle, TickSource};
use crate::types::{PlayerAction, PlayerId, RoomId, MAX_PLAYERS};

/// Builds the piece source for each new session.
pub type PieceSourceFactory = Arc<dyn Fn() -> Box<dyn PieceSource> + Send + Sync>;

/// Collaborators every session is wired to.
#[derive(Clone)]
pub struct SessionServices {
    pub sync: Arc<dyn SyncChannel>,
    pub ticks: Arc<dyn TickSource>,
    pub pieces: PieceSourceFactory,
}

impl SessionServices {
    pub fn new(
        sync: Arc<dyn SyncChannel>,
        ticks: Arc<dyn TickSource>,
        pieces: PieceSourceFactory,
    ) -> Self {
        Self {
            sync,
            ticks,
            pieces,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    Waiting,
    Active,
    Ended,
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// The player's replacement piece collided at spawn
    ToppedOut(PlayerId),
    /// The player reported their own loss
    Forfeit(PlayerId),
    /// The player's connection went away
    Disconnected(PlayerId),
    /// Removed by the server without a winner
    Closed,
}

/// What a successful join did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// First seat taken; waiting for an opponent
    Waiting,
    /// Second seat taken; the match is running
    Started,
    /// The player was already seated; nothing changed
    AlreadyPresent,
}

#[derive(Debug)]
struct PlayerSlot {
    id: PlayerId,
    state: PlayerState,
}

/// One match between up to two players.
pub struct GameSession {
    room_id: RoomId,
    status: SessionStatus,
    players: ArrayVec<PlayerSlot, MAX_PLAYERS>,
    generator: PieceGenerator,
    tick_handle: Option<Box<dyn TickHandle>>,
    sync: Arc<dyn SyncChannel>,
    ticks: Arc<dyn TickSource>,
}

impl GameSession {
    /// Empty session in Waiting.
    pub fn new(room_id: RoomId, services: &SessionServices) -> Self {
        Self {
            room_id,
            status: SessionStatus::Waiting,
            players: ArrayVec::new(),
            generator: PieceGenerator::new((services.pieces)()),
            tick_handle: None,
            sync: Arc::clone(&services.sync),
            ticks: Arc::clone(&services.ticks),
        }
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    pub fn is_ended(&self) -> bool {
        self.status == SessionStatus::Ended
    }

    /// Whether a gravity clock is currently held.
    pub fn has_tick(&self) -> bool {
        self.tick_handle.is_some()
    }

    /// Player ids in join order.
    pub fn players(&self) -> Vec<PlayerId> {
        self.players.iter().map(|slot| slot.id).collect()
    }

    pub fn contains(&self, player: PlayerId) -> bool {
        self.players.iter().any(|slot| slot.id == player)
    }

    pub fn player(&self, player: PlayerId) -> Option<&PlayerState> {
        self.players
            .iter()
            .find(|slot| slot.id == player)
            .map(|slot| &slot.state)
    }

    pub fn player_mut(&mut self, player: PlayerId) -> Option<&mut PlayerState> {
        self.players
            .iter_mut()
            .find(|slot| slot.id == player)
            .map(|slot| &mut slot.state)
    }

    /// Canonical copy of the whole session.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            room_id: self.room_id.clone(),
            players: self
                .players
                .iter()
                .map(|slot| PlayerSnapshot::capture(slot.id, &slot.state))
                .collect(),
        }
    }

    /// Seat a player and reply `GameJoined` to them.
    ///
    /// The second distinct player flips the session to Active, starts the
    /// clock and broadcasts `StartGame`. Re-joining is a no-op.
    pub fn join(&mut self, player: PlayerId) -> Result<JoinOutcome, GameError> {
        self.seat(player, true)
    }

    /// Seat the room's creator. Same as [`GameSession::join`] without the
    /// `GameJoined` reply (the creator is answered with `GameCreated`).
    pub fn open(&mut self, player: PlayerId) -> Result<JoinOutcome, GameError> {
        self.seat(player, false)
    }

    fn seat(&mut self, player: PlayerId, reply: bool) -> Result<JoinOutcome, GameError> {
        if self.is_ended() {
            return Err(GameError::SessionInactive(self.room_id.clone()));
        }
        if self.contains(player) {
            debug!(room = %self.room_id, %player, "duplicate join ignored");
            return Ok(JoinOutcome::AlreadyPresent);
        }
        if self.players.is_full() {
            return Err(GameError::RoomFull);
        }

        let state = PlayerState::new(&mut self.generator);
        self.players.push(PlayerSlot { id: player, state });
        info!(room = %self.room_id, %player, seats = self.players.len(), "player joined");

        if reply {
            self.sync.send(
                player,
                &SyncEvent::GameJoined {
                    room_id: self.room_id.clone(),
                    players: self.players(),
                },
            );
        }
        if !self.players.is_full() {
            return Ok(JoinOutcome::Waiting);
        }

        self.status = SessionStatus::Active;
        self.tick_handle = Some(self.ticks.start(&self.room_id));
        info!(room = %self.room_id, "match started");
        self.broadcast(&SyncEvent::StartGame {
            room_id: self.room_id.clone(),
            players: self.players(),
        });
        Ok(JoinOutcome::Started)
    }

    /// One gravity step for every player, then one snapshot.
    ///
    /// Every player is stepped even when an earlier one tops out, so the
    /// final scores include this tick. If anyone topped out the match ends
    /// instead of broadcasting; with two losers the first seated is named.
    pub fn tick(&mut self) -> SessionStatus {
        if !self.is_active() {
            debug!(room = %self.room_id, status = ?self.status, "tick on idle session ignored");
            return self.status;
        }

        let mut losers: ArrayVec<PlayerId, MAX_PLAYERS> = ArrayVec::new();
        for slot in self.players.iter_mut() {
            if let GravityOutcome::Locked(lock) = slot.state.gravity(&mut self.generator) {
                if lock.lines_cleared > 0 {
                    debug!(room = %self.room_id, player = %slot.id, lines = lock.lines_cleared, "lines cleared");
                }
                if lock.topped_out {
                    losers.push(slot.id);
                }
            }
        }

        if let Some(&player) = losers.first() {
            if losers.len() > 1 {
                debug!(room = %self.room_id, ?losers, "simultaneous top-out");
            }
            self.terminate(EndReason::ToppedOut(player));
        } else {
            self.broadcast(&SyncEvent::StateUpdate(self.snapshot()));
        }
        self.status
    }

    /// Apply one input from a seated player.
    ///
    /// Returns `Ok(true)` if the input changed the state (a snapshot was
    /// broadcast, or the match ended), `Ok(false)` if it was illegal.
    pub fn apply_input(&mut self, player: PlayerId, action: PlayerAction) -> Result<bool, GameError> {
        if !self.is_active() {
            return Err(GameError::SessionInactive(self.room_id.clone()));
        }
        let Some(slot) = self.players.iter_mut().find(|slot| slot.id == player) else {
            return Err(GameError::UnauthorizedAction {
                player,
                room_id: self.room_id.clone(),
            });
        };

        match slot.state.apply(action, &mut self.generator) {
            ActionOutcome::Rejected => {
                debug!(room = %self.room_id, %player, action = action.as_str(), "input rejected");
                Ok(false)
            }
            ActionOutcome::Locked(lock) if lock.topped_out => {
                self.terminate(EndReason::ToppedOut(player));
                Ok(true)
            }
            ActionOutcome::Moved | ActionOutcome::Locked(_) => {
                self.broadcast(&SyncEvent::StateUpdate(self.snapshot()));
                Ok(true)
            }
        }
    }

    /// Legacy client-side loss report. Ends the match with `player` as loser.
    pub fn report_loss(&mut self, player: PlayerId) -> Result<(), GameError> {
        if !self.contains(player) {
            return Err(GameError::UnauthorizedAction {
                player,
                room_id: self.room_id.clone(),
            });
        }
        if self.terminate(EndReason::Forfeit(player)) {
            Ok(())
        } else {
            Err(GameError::SessionInactive(self.room_id.clone()))
        }
    }

    /// Stop the clock, mark Ended and notify the room. Idempotent.
    ///
    /// Returns false if the session had already ended.
    pub fn terminate(&mut self, reason: EndReason) -> bool {
        if self.is_ended() {
            return false;
        }
        if let Some(mut handle) = self.tick_handle.take() {
            handle.cancel();
        }
        self.status = SessionStatus::Ended;
        info!(room = %self.room_id, ?reason, "match ended");

        match reason {
            EndReason::ToppedOut(loser) | EndReason::Forfeit(loser) => {
                let scores = self
                    .players
                    .iter()
                    .map(|slot| (slot.id, slot.state.score()))
                    .collect();
                self.broadcast(&SyncEvent::GameOver {
                    message: format!("Player {} has lost the game!", loser),
                    scores,
                });
            }
            EndReason::Disconnected(gone) => {
                let remaining: ArrayVec<PlayerId, MAX_PLAYERS> = self
                    .players
                    .iter()
                    .map(|slot| slot.id)
                    .filter(|&id| id != gone)
                    .collect();
                self.sync.broadcast(
                    &remaining,
                    &SyncEvent::PlayerDisconnected {
                        message: "Opponent has disconnected. Game over.".to_string(),
                    },
                );
            }
            EndReason::Closed => {}
        }
        true
    }

    fn broadcast(&self, event: &SyncEvent) {
        let members: ArrayVec<PlayerId, MAX_PLAYERS> =
            self.players.iter().map(|slot| slot.id).collect();
        self.sync.broadcast(&members, event);
    }
}

impl Drop for GameSession {
    fn drop(&mut self) {
        if let Some(mut handle) = self.tick_handle.take() {
            handle.cancel();
        }
    }
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("room_id", &self.room_id)
            .field("status", &self.status)
            .field("players", &self.players)
            .field("has_tick", &self.tick_handle.is_some())
            .finish()
    }
}

//! Room registry - every live session, keyed by room id.
//!
//! The registry is the only structure shared between rooms. Each public
//! method is one atomic step for the caller, and any session that reaches
//! Ended during that step is removed before the method returns, so ended
//! sessions are never observable through the registry.

use std::collections::HashMap;

use tracing::info;

use crate::error::GameError;
use crate::session::{EndReason, GameSession, JoinOutcome, SessionServices, SessionStatus};
use crate::types::{PlayerAction, PlayerId, RoomId};

pub struct RoomRegistry {
    rooms: HashMap<RoomId, GameSession>,
    /// Which room each seated player is in (one room per player)
    membership: HashMap<PlayerId, RoomId>,
    services: SessionServices,
}

impl RoomRegistry {
    pub fn new(services: SessionServices) -> Self {
        Self {
            rooms: HashMap::new(),
            membership: HashMap::new(),
            services,
        }
    }

    pub fn services(&self) -> &SessionServices {
        &self.services
    }

    /// Register an empty Waiting session under a fresh id.
    pub fn create(&mut self) -> RoomId {
        let room_id = loop {
            let candidate = RoomId::generate();
            if !self.rooms.contains_key(&candidate) {
                break candidate;
            }
        };
        let session = GameSession::new(room_id.clone(), &self.services);
        self.rooms.insert(room_id.clone(), session);
        info!(room = %room_id, "room created");
        room_id
    }

    /// Create a room and seat `player` in it as the first player.
    pub fn host(&mut self, player: PlayerId) -> Result<RoomId, GameError> {
        if let Some(current) = self.membership.get(&player) {
            return Err(GameError::AlreadyInRoom(current.clone()));
        }
        let room_id = self.create();
        self.get_mut(&room_id)?.open(player)?;
        self.membership.insert(player, room_id.clone());
        Ok(room_id)
    }

    pub fn get(&self, room_id: &RoomId) -> Result<&GameSession, GameError> {
        self.rooms.get(room_id).ok_or(GameError::RoomNotFound)
    }

    pub fn get_mut(&mut self, room_id: &RoomId) -> Result<&mut GameSession, GameError> {
        self.rooms.get_mut(room_id).ok_or(GameError::RoomNotFound)
    }

    /// Seat `player` in an existing room.
    pub fn join(&mut self, room_id: &RoomId, player: PlayerId) -> Result<JoinOutcome, GameError> {
        let session = self.rooms.get_mut(room_id).ok_or(GameError::RoomNotFound)?;
        if let Some(current) = self.membership.get(&player) {
            if current != room_id {
                return Err(GameError::AlreadyInRoom(current.clone()));
            }
        }
        let outcome = session.join(player)?;
        self.membership.insert(player, room_id.clone());
        Ok(outcome)
    }

    /// Route one input to its session.
    pub fn apply_input(
        &mut self,
        room_id: &RoomId,
        player: PlayerId,
        action: PlayerAction,
    ) -> Result<bool, GameError> {
        let result = self.get_mut(room_id)?.apply_input(player, action);
        self.reap(room_id);
        result
    }

    /// Advance one room's gravity clock.
    pub fn tick(&mut self, room_id: &RoomId) -> Result<SessionStatus, GameError> {
        let status = self.get_mut(room_id)?.tick();
        self.reap(room_id);
        Ok(status)
    }

    /// Accept a player's own loss report and end their match.
    pub fn report_loss(&mut self, room_id: &RoomId, player: PlayerId) -> Result<(), GameError> {
        let result = self.get_mut(room_id)?.report_loss(player);
        self.reap(room_id);
        result
    }

    /// End whatever match `player` is in. Returns the room that ended.
    pub fn disconnect(&mut self, player: PlayerId) -> Option<RoomId> {
        let room_id = self.membership.get(&player)?.clone();
        self.terminate(&room_id, EndReason::Disconnected(player)).ok()?;
        Some(room_id)
    }

    /// End a session for `reason` and drop it.
    pub fn terminate(&mut self, room_id: &RoomId, reason: EndReason) -> Result<(), GameError> {
        self.get_mut(room_id)?.terminate(reason);
        self.reap(room_id);
        Ok(())
    }

    /// Drop a session. A session that has not ended yet is closed first,
    /// so its clock is always stopped before it leaves the map.
    pub fn remove(&mut self, room_id: &RoomId) -> Option<GameSession> {
        let session = self.rooms.get_mut(room_id)?;
        session.terminate(EndReason::Closed);
        let session = self.rooms.remove(room_id)?;
        for player in session.players() {
            if self.membership.get(&player) == Some(room_id) {
                self.membership.remove(&player);
            }
        }
        info!(room = %room_id, live_rooms = self.rooms.len(), "room removed");
        Some(session)
    }

    fn reap(&mut self, room_id: &RoomId) {
        if self.rooms.get(room_id).is_some_and(|s| s.is_ended()) {
            self.remove(room_id);
        }
    }

    /// Room the player is currently seated in.
    pub fn room_of(&self, player: PlayerId) -> Option<&RoomId> {
        self.membership.get(&player)
    }

    pub fn contains(&self, room_id: &RoomId) -> bool {
        self.rooms.contains_key(room_id)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

//! Protocol module - JSON message types for duel clients
//!
//! Line-delimited JSON: one object per line, discriminated by `"type"`,
//! camelCase field names. Per-player maps are keyed by the player id in
//! decimal text so they survive as JSON object keys.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use tetris_duel_core::{PlayerSnapshot, SyncEvent};
use tetris_duel_types::PlayerId;

// ============== Client -> Server Messages ==============

/// Everything a client may send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Open a new room and take its first seat
    CreateGame,
    #[serde(rename_all = "camelCase")]
    JoinGame { room_id: String },
    /// `input` is kept as text; unknown action names are dropped by the engine
    #[serde(rename_all = "camelCase")]
    PlayerInput { room_id: String, input: String },
    /// Legacy self-reported loss. The score is informational only.
    #[serde(rename_all = "camelCase")]
    GameOver {
        room_id: String,
        #[serde(default)]
        score: Option<u32>,
    },
}

impl ClientMessage {
    pub fn name(&self) -> &'static str {
        match self {
            ClientMessage::CreateGame => "createGame",
            ClientMessage::JoinGame { .. } => "joinGame",
            ClientMessage::PlayerInput { .. } => "playerInput",
            ClientMessage::GameOver { .. } => "gameOver",
        }
    }
}

// ============== Server -> Client Messages ==============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    #[serde(rename_all = "camelCase")]
    GameCreated { room_id: String },
    #[serde(rename_all = "camelCase")]
    GameJoined { room_id: String, players: Vec<u64> },
    #[serde(rename_all = "camelCase")]
    StartGame { room_id: String, players: Vec<u64> },
    GameStateUpdate(GameStateUpdate),
    GameOver {
        message: String,
        scores: BTreeMap<String, u32>,
    },
    PlayerDisconnected { message: String },
    Error { message: String },
}

impl ServerMessage {
    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            message: message.into(),
        }
    }
}

/// Full state of both halves of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateUpdate {
    pub room_id: String,
    /// 20 rows of 10 color ids, 0 = empty
    pub grids: BTreeMap<String, Vec<Vec<u8>>>,
    pub positions: BTreeMap<String, Position>,
    pub current_pieces: BTreeMap<String, PieceView>,
    pub next_pieces: BTreeMap<String, PieceView>,
    pub scores: BTreeMap<String, u32>,
    pub lines: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i8,
    pub y: i8,
}

/// A piece as drawn by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceView {
    pub kind: String,
    pub rotation: u8,
    /// Bounding-box matrix, occupied cells hold `color`
    pub shape: Vec<Vec<u8>>,
    pub color: u8,
}

fn key(player: PlayerId) -> String {
    player.0.to_string()
}

fn ids(players: &[PlayerId]) -> Vec<u64> {
    players.iter().map(|p| p.0).collect()
}

fn score_map(scores: &[(PlayerId, u32)]) -> BTreeMap<String, u32> {
    scores.iter().map(|&(p, s)| (key(p), s)).collect()
}

impl GameStateUpdate {
    fn insert(&mut self, p: &PlayerSnapshot) {
        let id = key(p.player);
        let active = p.active;
        let active_color = active.kind.color_id();
        let next_color = p.next.color_id();

        self.grids
            .insert(id.clone(), p.board.iter().map(|row| row.to_vec()).collect());
        self.positions.insert(
            id.clone(),
            Position {
                x: active.x,
                y: active.y,
            },
        );
        self.current_pieces.insert(
            id.clone(),
            PieceView {
                kind: active.kind.as_str().to_string(),
                rotation: active.rotation,
                shape: active.shape().matrix(active_color),
                color: active_color,
            },
        );
        self.next_pieces.insert(
            id.clone(),
            PieceView {
                kind: p.next.as_str().to_string(),
                rotation: 0,
                shape: tetris_duel_core::shape(p.next, 0).matrix(next_color),
                color: next_color,
            },
        );
        self.scores.insert(id.clone(), p.score);
        self.lines.insert(id, p.lines);
    }
}

impl From<&SyncEvent> for ServerMessage {
    fn from(event: &SyncEvent) -> Self {
        match event {
            SyncEvent::GameCreated { room_id } => ServerMessage::GameCreated {
                room_id: room_id.to_string(),
            },
            SyncEvent::GameJoined { room_id, players } => ServerMessage::GameJoined {
                room_id: room_id.to_string(),
                players: ids(players),
            },
            SyncEvent::StartGame { room_id, players } => ServerMessage::StartGame {
                room_id: room_id.to_string(),
                players: ids(players),
            },
            SyncEvent::StateUpdate(snapshot) => {
                let mut update = GameStateUpdate {
                    room_id: snapshot.room_id.to_string(),
                    grids: BTreeMap::new(),
                    positions: BTreeMap::new(),
                    current_pieces: BTreeMap::new(),
                    next_pieces: BTreeMap::new(),
                    scores: BTreeMap::new(),
                    lines: BTreeMap::new(),
                };
                for player in &snapshot.players {
                    update.insert(player);
                }
                ServerMessage::GameStateUpdate(update)
            }
            SyncEvent::GameOver { message, scores } => ServerMessage::GameOver {
                message: message.clone(),
                scores: score_map(scores),
            },
            SyncEvent::PlayerDisconnected { message } => ServerMessage::PlayerDisconnected {
                message: message.clone(),
            },
            SyncEvent::Error { message } => ServerMessage::error(message.clone()),
        }
    }
}

/// Parse one inbound line.
pub fn parse_message(json: &str) -> Result<ClientMessage, serde_json::Error> {
    serde_json::from_str(json)
}

/// Serialize one outbound message, without the trailing newline.
pub fn encode(message: &ServerMessage) -> Result<String, serde_json::Error> {
    serde_json::to_string(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tetris_duel_core::{ActivePiece, Board, SessionSnapshot};
    use tetris_duel_types::{PieceKind, RoomId};

    #[test]
    fn test_parse_create_game() {
        let msg = parse_message(r#"{"type":"createGame"}"#).unwrap();
        assert_eq!(msg, ClientMessage::CreateGame);
    }

    #[test]
    fn test_parse_player_input() {
        let json = r#"{"type":"playerInput","roomId":"abc","input":"hardDrop"}"#;
        match parse_message(json).unwrap() {
            ClientMessage::PlayerInput { room_id, input } => {
                assert_eq!(room_id, "abc");
                assert_eq!(input, "hardDrop");
            }
            other => panic!("Expected PlayerInput, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_game_over_without_score() {
        let msg = parse_message(r#"{"type":"gameOver","roomId":"abc"}"#).unwrap();
        assert_eq!(
            msg,
            ClientMessage::GameOver {
                room_id: "abc".to_string(),
                score: None
            }
        );
    }

    #[test]
    fn test_parse_rejects_unknown_type_and_garbage() {
        assert!(parse_message(r#"{"type":"hello"}"#).is_err());
        assert!(parse_message(r#"{"type":"joinGame"}"#).is_err());
        assert!(parse_message("not json").is_err());
    }

    #[test]
    fn test_encode_error_shape() {
        let line = encode(&ServerMessage::error("Game not found")).unwrap();
        assert_eq!(line, r#"{"type":"error","message":"Game not found"}"#);
    }

    #[test]
    fn test_state_update_from_snapshot() {
        let snapshot = SessionSnapshot {
            room_id: RoomId::from("r"),
            players: vec![PlayerSnapshot {
                player: PlayerId(7),
                board: Board::new().rows(),
                active: ActivePiece::spawn(PieceKind::T),
                next: PieceKind::I,
                score: 120,
                lines: 1,
            }],
        };

        let msg = ServerMessage::from(&SyncEvent::StateUpdate(snapshot));
        let ServerMessage::GameStateUpdate(update) = msg else {
            panic!("Expected GameStateUpdate");
        };
        assert_eq!(update.room_id, "r");
        assert_eq!(update.grids["7"].len(), 20);
        assert_eq!(update.grids["7"][0].len(), 10);
        assert_eq!(update.positions["7"], Position { x: 3, y: 0 });
        assert_eq!(update.current_pieces["7"].kind, "T");
        assert_eq!(update.current_pieces["7"].color, 3);
        assert_eq!(update.next_pieces["7"].shape[1], vec![1, 1, 1, 1]);
        assert_eq!(update.next_pieces["7"].shape.len(), 4);
        assert_eq!(update.scores["7"], 120);

        let line = encode(&ServerMessage::GameStateUpdate(update)).unwrap();
        assert!(line.starts_with(r#"{"type":"gameStateUpdate","roomId":"r""#));
        assert!(line.contains(r#""currentPieces""#));
    }
}

//! Core match logic - pure, deterministic, and testable
//!
//! This crate holds the authoritative simulation for two-player duels: the
//! board rules, the piece catalog, the per-room state machine and the room
//! registry. It does no I/O of its own. Clocks, randomness and outbound
//! delivery are all injected, which makes every match replayable from a seed
//! and a list of events.
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 grid with collision testing, placement and line clearing
//! - [`pieces`]: fixed rotation tables for the seven tetrominoes
//! - [`rng`]: piece sources (uniform, seeded, 7-bag, scripted) and the generator
//! - [`scoring`]: drop bonus and line-clear table
//! - [`player`]: one player's board, active/next piece and score
//! - [`session`]: Waiting → Active → Ended state machine for one room
//! - [`registry`]: room id → session map with join/cleanup rules
//! - [`sync`]: outbound notification seam
//! - [`tick`]: gravity clock seam
//!
//! # Rules
//!
//! - Pieces rotate through a fixed table; a rotation that collides is refused (no wall kicks)
//! - Gravity moves every player's piece down one row per tick; a blocked piece locks
//! - A lock clears full rows and scores 0/100/300/500/800 for 0-4 lines
//! - Soft and hard drop score 10 per row descended
//! - A replacement piece that collides at spawn ends the match for that player
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use tetris_duel_core::{
//!     ManualTicks, PieceSource, RoomRegistry, SessionServices, SessionStatus, SimpleRng,
//!     SyncChannel, SyncEvent,
//! };
//! use tetris_duel_types::{PlayerAction, PlayerId};
//!
//! struct Quiet;
//! impl SyncChannel for Quiet {
//!     fn send(&self, _to: PlayerId, _event: &SyncEvent) {}
//! }
//!
//! let services = SessionServices::new(
//!     Arc::new(Quiet),
//!     Arc::new(ManualTicks::new()),
//!     Arc::new(|| Box::new(SimpleRng::new(42)) as Box<dyn PieceSource>),
//! );
//! let mut rooms = RoomRegistry::new(services);
//!
//! let room = rooms.host(PlayerId(1)).unwrap();
//! rooms.join(&room, PlayerId(2)).unwrap();
//! assert_eq!(rooms.get(&room).unwrap().status(), SessionStatus::Active);
//!
//! rooms.apply_input(&room, PlayerId(1), PlayerAction::HardDrop).unwrap();
//! rooms.tick(&room).unwrap();
//! ```

pub mod board;
pub mod error;
pub mod pieces;
pub mod player;
pub mod registry;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;
pub mod sync;
pub mod tick;

pub use tetris_duel_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, BoardRows};
pub use error::GameError;
pub use pieces::{next_rotation, rotation_count, rotations, shape, spawn_x, Shape};
pub use player::{ActionOutcome, ActivePiece, GravityOutcome, LockOutcome, PlayerState};
pub use registry::RoomRegistry;
pub use rng::{
    GeneratedPiece, PieceGenerator, PieceSource, SequenceSource, SevenBag, SimpleRng,
    ThreadRngSource,
};
pub use scoring::{drop_points, line_clear_points};
pub use session::{
    EndReason, GameSession, JoinOutcome, PieceSourceFactory, SessionServices, SessionStatus,
};
pub use snapshot::{PlayerSnapshot, SessionSnapshot};
pub use sync::{SyncChannel, SyncEvent};
pub use tick::{ManualTicks, TickHandle, TickSource};

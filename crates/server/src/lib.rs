//! Network side of the duel server.
//!
//! Speaks line-delimited JSON over TCP and drives the core simulation from a
//! single engine task.
//!
//! # Architecture
//!
//! ```text
//!  client sockets ──lines──► reader tasks ──EngineEvent──┐
//!                                                       ▼
//!  IntervalTicks (one tokio interval per room) ──Tick──► Engine (owns RoomRegistry)
//!                                                       │ SyncEvent
//!  client sockets ◄──lines── writer tasks ◄── ConnectionHub
//! ```
//!
//! # Environment
//!
//! - `TETRIS_DUEL_HOST` / `TETRIS_DUEL_PORT`: listen address (127.0.0.1:3000)
//! - `TETRIS_DUEL_TICK_MS`: gravity period in milliseconds (1000)
//! - `TETRIS_DUEL_RANDOMIZER`: `uniform` or `bag`
//! - `TETRIS_DUEL_SEED`: fixed seed for reproducible piece sequences

pub mod config;
pub mod engine;
pub mod hub;
pub mod protocol;
pub mod server;
pub mod ticker;

pub use config::{Randomizer, ServerConfig};
pub use engine::{Engine, EngineEvent};
pub use hub::ConnectionHub;
pub use protocol::{parse_message, ClientMessage, ServerMessage};
pub use server::{run_server, MAX_LINE_BYTES};
pub use ticker::IntervalTicks;

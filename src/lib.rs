//! Tetris Duel (workspace facade crate).
//!
//! Re-exports the workspace crates as `tetris_duel::{types,core,server}` so
//! tests, benches and embedders need a single dependency.

pub use tetris_duel_core as core;
pub use tetris_duel_server as server;
pub use tetris_duel_types as types;

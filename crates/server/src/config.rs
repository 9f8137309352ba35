//! Server configuration, read from the environment.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use tetris_duel_core::{PieceSource, PieceSourceFactory, SevenBag, SimpleRng, ThreadRngSource};
use tetris_duel_types::TICK_MS;

/// How new pieces are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Randomizer {
    /// Independent uniform draw per piece
    #[default]
    Uniform,
    /// Shuffled bags of all seven kinds
    Bag,
}

impl Randomizer {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "uniform" => Some(Randomizer::Uniform),
            "bag" | "7bag" | "7-bag" => Some(Randomizer::Bag),
            _ => None,
        }
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Gravity period for every running match
    pub tick_ms: u64,
    pub randomizer: Randomizer,
    /// Fixed seed for reproducible piece sequences. Each room gets
    /// `seed + n` where n counts rooms created so far.
    pub seed: Option<u32>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            tick_ms: TICK_MS as u64,
            randomizer: Randomizer::Uniform,
            seed: None,
        }
    }
}

impl ServerConfig {
    /// Create from environment variables, falling back to defaults for
    /// anything missing or unparsable.
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();

        let host = env::var("TETRIS_DUEL_HOST")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.host);
        let port = env::var("TETRIS_DUEL_PORT")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.port);
        let tick_ms = env::var("TETRIS_DUEL_TICK_MS")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .filter(|&ms: &u64| ms > 0)
            .unwrap_or(defaults.tick_ms);
        let randomizer = env::var("TETRIS_DUEL_RANDOMIZER")
            .ok()
            .and_then(|s| Randomizer::from_str(&s))
            .unwrap_or(defaults.randomizer);
        let seed = env::var("TETRIS_DUEL_SEED")
            .ok()
            .and_then(|s| s.trim().parse().ok());

        Self {
            host,
            port,
            tick_ms,
            randomizer,
            seed,
        }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }

    /// Piece source factory handed to every new session.
    pub fn piece_source_factory(&self) -> PieceSourceFactory {
        let randomizer = self.randomizer;
        match self.seed {
            Some(seed) => {
                let rooms = Arc::new(AtomicU32::new(0));
                Arc::new(move || {
                    let seed = seed.wrapping_add(rooms.fetch_add(1, Ordering::Relaxed));
                    match randomizer {
                        Randomizer::Uniform => Box::new(SimpleRng::new(seed)) as Box<dyn PieceSource>,
                        Randomizer::Bag => Box::new(SevenBag::new(seed)),
                    }
                })
            }
            None => Arc::new(move || match randomizer {
                Randomizer::Uniform => Box::new(ThreadRngSource) as Box<dyn PieceSource>,
                Randomizer::Bag => Box::new(SevenBag::new(rand::random())),
            }),
        }
    }
}

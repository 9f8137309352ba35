//! RNG module - piece selection
//!
//! Sessions never call a random number generator directly; they draw from a
//! [`PieceSource`]. Production uses a uniform source, tests plug in a seeded
//! [`SimpleRng`] or a scripted [`SequenceSource`] to get reproducible matches.

use rand::Rng;

use crate::pieces::{shape, Shape};
use crate::types::PieceKind;

/// Anything that can pick the kind of the next piece.
pub trait PieceSource: Send {
    fn next_kind(&mut self) -> PieceKind;
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high bits; the low bits of a power-of-two LCG cycle quickly.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}

impl PieceSource for SimpleRng {
    fn next_kind(&mut self) -> PieceKind {
        PieceKind::ALL[self.next_range(PieceKind::ALL.len() as u32) as usize]
    }
}

/// Uniform selection backed by the thread-local OS-seeded RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngSource;

impl PieceSource for ThreadRngSource {
    fn next_kind(&mut self) -> PieceKind {
        PieceKind::ALL[rand::thread_rng().gen_range(0..PieceKind::ALL.len())]
    }
}

/// 7-bag generator: every run of seven draws contains each kind exactly once.
#[derive(Debug, Clone)]
pub struct SevenBag {
    bag: [PieceKind; 7],
    bag_index: usize,
    rng: SimpleRng,
}

impl SevenBag {
    pub fn new(seed: u32) -> Self {
        let mut bag = Self {
            bag: PieceKind::ALL,
            bag_index: 0,
            rng: SimpleRng::new(seed),
        };
        bag.refill();
        bag
    }

    fn refill(&mut self) {
        self.bag = PieceKind::ALL;
        self.rng.shuffle(&mut self.bag);
        self.bag_index = 0;
    }
}

impl PieceSource for SevenBag {
    fn next_kind(&mut self) -> PieceKind {
        if self.bag_index >= self.bag.len() {
            self.refill();
        }
        let kind = self.bag[self.bag_index];
        self.bag_index += 1;
        kind
    }
}

/// Replays a fixed list of kinds, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    kinds: Vec<PieceKind>,
    pos: usize,
}

impl SequenceSource {
    /// Panics if `kinds` is empty.
    pub fn new(kinds: impl Into<Vec<PieceKind>>) -> Self {
        let kinds = kinds.into();
        assert!(!kinds.is_empty(), "SequenceSource needs at least one kind");
        Self { kinds, pos: 0 }
    }

    /// A source that only ever produces `kind`.
    pub fn repeat(kind: PieceKind) -> Self {
        Self::new(vec![kind])
    }
}

impl PieceSource for SequenceSource {
    fn next_kind(&mut self) -> PieceKind {
        let kind = self.kinds[self.pos % self.kinds.len()];
        self.pos += 1;
        kind
    }
}

/// A freshly generated piece, always in its spawn rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratedPiece {
    pub kind: PieceKind,
    pub rotation: u8,
    pub shape: &'static Shape,
    pub color_id: u8,
}

/// Turns a [`PieceSource`] into spawn-ready pieces.
pub struct PieceGenerator {
    source: Box<dyn PieceSource>,
}

impl PieceGenerator {
    pub fn new(source: Box<dyn PieceSource>) -> Self {
        Self { source }
    }

    pub fn next(&mut self) -> GeneratedPiece {
        let kind = self.source.next_kind();
        GeneratedPiece {
            kind,
            rotation: 0,
            shape: shape(kind, 0),
            color_id: kind.color_id(),
        }
    }
}

impl std::fmt::Debug for PieceGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PieceGenerator").finish_non_exhaustive()
    }
}

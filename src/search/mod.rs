pub mod alphabeta;
pub mod clock;
pub mod eval;
pub mod fallback;
pub mod minimax;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{GameState, Move};
use crate::search::clock::TimeBudget;
use crate::search::eval::Heuristic;

pub use alphabeta::AlphaBetaSearcher;
pub use clock::Deadline;
pub use eval::Evaluator;
pub use minimax::MinimaxSearcher;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum SearchError {
    /// The turn budget dropped below the configured threshold.
    #[error("search cancelled with {remaining_ms:.2}ms left (threshold {threshold_ms:.2}ms)")]
    Cancelled { remaining_ms: f64, threshold_ms: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    /// Fixed depth for minimax.
    pub depth: u32,
    /// Cancel once fewer than this many milliseconds remain.
    pub timeout_ms: f64,
    pub heuristic: Heuristic,
    /// Optional cap on iterative deepening.
    pub max_depth: Option<u32>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self { depth: 3, timeout_ms: 10.0, heuristic: Heuristic::default(), max_depth: None }
    }
}

/// One completed search at a given depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult {
    /// `Move::NONE` when the root had no legal move or `depth` was zero.
    pub best_move: Move,
    pub score: f64,
    pub nodes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Source {
    Search,
    Fallback,
    NoMoves,
}

/// What `get_move` decided and how it got there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub best_move: Move,
    /// Score of the last fully completed sweep, if any.
    pub score: Option<f64>,
    /// Depth of the last fully completed sweep, if any.
    pub depth: Option<u32>,
    pub nodes: u64,
    pub source: Source,
}

/// A move-selection policy, as seen by a match driver.
pub trait Agent<S: GameState> {
    fn get_move(&mut self, state: &S, time_left: &dyn TimeBudget) -> Move;
}

/// Plays a uniformly random legal move.
pub struct RandomAgent<R = SmallRng> {
    rng: R,
}

impl RandomAgent {
    pub fn with_seed(seed: u64) -> Self { Self { rng: SmallRng::seed_from_u64(seed) } }
}

impl<R: Rng> RandomAgent<R> {
    pub fn new(rng: R) -> Self { Self { rng } }
}

impl<S: GameState, R: Rng> Agent<S> for RandomAgent<R> {
    fn get_move(&mut self, state: &S, _time_left: &dyn TimeBudget) -> Move {
        fallback::random_move(&state.active_moves(), &mut self.rng)
    }
}

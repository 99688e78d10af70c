use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::Move;
use crate::search::{Decision, Source};

/// Uniform pick from `moves`; `Move::NONE` when there is nothing to pick.
pub fn random_move<R: Rng + ?Sized>(moves: &[Move], rng: &mut R) -> Move {
    moves.choose(rng).copied().unwrap_or(Move::NONE)
}

pub(crate) fn no_moves() -> Decision {
    Decision { best_move: Move::NONE, score: None, depth: None, nodes: 0, source: Source::NoMoves }
}

/// Used when no sweep finished before the budget ran out.
pub(crate) fn random_decision<R: Rng + ?Sized>(legal: &[Move], rng: &mut R, nodes: u64) -> Decision {
    let best_move = random_move(legal, rng);
    debug!("no completed sweep after {nodes} nodes; falling back to random move {best_move}");
    Decision { best_move, score: None, depth: None, nodes, source: Source::Fallback }
}

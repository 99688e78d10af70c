use anyhow::{Context, Result};
use log::{debug, info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::board::isolation::{Board, Player};
use crate::board::{GameState, Move};
use crate::search::clock::{Deadline, TimeBudget};
use crate::search::fallback::random_move;
use crate::search::{Agent, AlphaBetaSearcher, MinimaxSearcher, RandomAgent, SearchParams};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Minimax,
    AlphaBeta,
    Random,
}

/// Which policy to field and how to configure it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentSpec {
    pub kind: AgentKind,
    #[serde(default)]
    pub params: SearchParams,
}

impl AgentSpec {
    pub fn new(kind: AgentKind) -> Self { Self { kind, params: SearchParams::default() } }

    pub fn build(&self, seed: u64) -> Box<dyn Agent<Board>> {
        match self.kind {
            AgentKind::Minimax => Box::new(MinimaxSearcher::from_params(self.params, seed)),
            AgentKind::AlphaBeta => Box::new(AlphaBetaSearcher::from_params(self.params, seed)),
            AgentKind::Random => Box::new(RandomAgent::with_seed(seed)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct MatchParams {
    pub games: usize,
    pub width: usize,
    pub height: usize,
    pub time_limit_ms: u64,
    pub threads: usize,
    pub seed: u64,
    /// Place both players on random cells before the agents take over.
    pub random_openings: bool,
}

impl Default for MatchParams {
    fn default() -> Self {
        Self { games: 10, width: 7, height: 7, time_limit_ms: 150, threads: 1, seed: 42, random_openings: true }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The loser had no legal move.
    NoMoves,
    IllegalMove,
    Timeout,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub width: usize,
    pub height: usize,
    pub moves: Vec<Move>,
    pub winner: Player,
    pub outcome: Outcome,
    /// Side played by the first agent spec.
    pub first_as: Player,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub games: usize,
    pub first_wins: usize,
    pub second_wins: usize,
    pub timeouts: usize,
    pub illegal_moves: usize,
}

pub fn summarize(records: &[GameRecord]) -> MatchSummary {
    let mut s = MatchSummary { games: records.len(), ..MatchSummary::default() };
    for r in records {
        if r.winner == r.first_as { s.first_wins += 1; } else { s.second_wins += 1; }
        match r.outcome {
            Outcome::Timeout => s.timeouts += 1,
            Outcome::IllegalMove => s.illegal_moves += 1,
            Outcome::NoMoves => {}
        }
    }
    s
}

/// Play one game to the end. `one` plays `Player::One`.
///
/// A move returned after the turn's deadline, or one that is not legal, loses on the spot.
pub fn play_game(
    one: &mut dyn Agent<Board>,
    two: &mut dyn Agent<Board>,
    mut board: Board,
    time_limit_ms: u64,
) -> (Vec<Move>, Player, Outcome) {
    let mut moves = Vec::new();
    loop {
        let active = board.active_player();
        if board.active_moves().is_empty() {
            return (moves, active.other(), Outcome::NoMoves);
        }
        let agent: &mut dyn Agent<Board> = match active { Player::One => &mut *one, Player::Two => &mut *two };
        let deadline = Deadline::after_ms(time_limit_ms);
        let mv = agent.get_move(&board, &deadline);
        let left = deadline.remaining_ms();
        if left < 0.0 {
            warn!("{:?} overran its turn by {:.2}ms", active, -left);
            return (moves, active.other(), Outcome::Timeout);
        }
        if let Err(e) = board.apply_move(mv) {
            warn!("{:?} forfeits: {}", active, e);
            return (moves, active.other(), Outcome::IllegalMove);
        }
        moves.push(mv);
    }
}

fn opening(params: &MatchParams, rng: &mut SmallRng) -> (Board, Vec<Move>) {
    let mut board = Board::new(params.width, params.height);
    let mut moves = Vec::new();
    if params.random_openings {
        for _ in 0..2 {
            let mv = random_move(&board.active_moves(), rng);
            if board.apply_move(mv).is_err() { break; }
            moves.push(mv);
        }
    }
    (board, moves)
}

/// Play `params.games` games between `first` and `second`, alternating who moves first.
pub fn run_matches(first: &AgentSpec, second: &AgentSpec, params: &MatchParams) -> Result<Vec<GameRecord>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(params.threads.max(1))
        .build()
        .context("build match thread pool")?;
    info!("playing {} games: {:?} vs {:?}", params.games, first.kind, second.kind);
    let records: Vec<GameRecord> = pool.install(|| {
        (0..params.games).into_par_iter().map(|gi| {
            let seed = params.seed.wrapping_add(gi as u64);
            let mut rng = SmallRng::seed_from_u64(seed);
            let (board, mut moves) = opening(params, &mut rng);
            let mut a = first.build(seed ^ 0xA5A5_A5A5);
            let mut b = second.build(seed ^ 0x5A5A_5A5A);
            let first_as = if gi % 2 == 0 { Player::One } else { Player::Two };
            let (played, winner, outcome) = if first_as == Player::One {
                play_game(a.as_mut(), b.as_mut(), board, params.time_limit_ms)
            } else {
                play_game(b.as_mut(), a.as_mut(), board, params.time_limit_ms)
            };
            debug!("game {gi}: {:?} wins by {:?} after {} moves", winner, outcome, played.len());
            moves.extend(played);
            GameRecord { width: params.width, height: params.height, moves, winner, outcome, first_as }
        }).collect()
    });
    Ok(records)
}

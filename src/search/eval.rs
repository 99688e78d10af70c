use serde::{Deserialize, Serialize};

use crate::board::{GameState, Move};

/// Blank-cell count above which the phase-adaptive heuristic stays aggressive.
pub const OPENING_BLANKS: usize = 25;

/// Scores a state from `player`'s point of view.
///
/// Infinite values are reserved for decided games: `-inf` when `player` has lost,
/// `+inf` when it has won. Everything else must be finite.
pub trait Evaluator<S: GameState> {
    fn score(&self, state: &S, player: S::Player) -> f64;
}

impl<S, F> Evaluator<S> for F
where
    S: GameState,
    F: Fn(&S, S::Player) -> f64,
{
    fn score(&self, state: &S, player: S::Player) -> f64 { self(state, player) }
}

/// Built-in heuristics, selectable from configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Heuristic {
    #[default]
    MobilityCentrality,
    MobilityRatio,
    PhaseAdaptive,
}

impl<S: GameState> Evaluator<S> for Heuristic {
    fn score(&self, state: &S, player: S::Player) -> f64 {
        match self {
            Heuristic::MobilityCentrality => mobility_centrality(state, player),
            Heuristic::MobilityRatio => mobility_ratio(state, player),
            Heuristic::PhaseAdaptive => phase_adaptive(state, player),
        }
    }
}

fn decided<S: GameState>(state: &S, player: S::Player) -> Option<f64> {
    if state.is_loser(player) { return Some(f64::NEG_INFINITY); }
    if state.is_winner(player) { return Some(f64::INFINITY); }
    None
}

fn mobility<S: GameState>(state: &S, player: S::Player) -> (f64, f64) {
    let own = state.legal_moves(player).len() as f64;
    let opp = state.legal_moves(state.opponent(player)).len() as f64;
    (own, opp)
}

fn center_distance(loc: Option<Move>, center: f64) -> f64 {
    // Players not yet on the board sit at the center.
    loc.map_or(0.0, |m| (center - m.row as f64).abs() + (center - m.col as f64).abs())
}

/// `10 * (opp_moves - own_moves) + own_center_distance - opp_center_distance`.
pub fn mobility_centrality<S: GameState>(state: &S, player: S::Player) -> f64 {
    if let Some(v) = decided(state, player) { return v; }
    let (own, opp) = mobility(state, player);
    let center = state.width() as f64 / 2.0;
    let own_dist = center_distance(state.player_location(player), center);
    let opp_dist = center_distance(state.player_location(state.opponent(player)), center);
    10.0 * (opp - own) + own_dist - opp_dist
}

/// `opp_moves - 3 * own_moves`.
pub fn mobility_ratio<S: GameState>(state: &S, player: S::Player) -> f64 {
    if let Some(v) = decided(state, player) { return v; }
    let (own, opp) = mobility(state, player);
    opp - 3.0 * own
}

/// Aggressive (`own - 3 * opp`) while more than [`OPENING_BLANKS`] cells are blank,
/// defensive (`3 * own - opp`) afterwards.
pub fn phase_adaptive<S: GameState>(state: &S, player: S::Player) -> f64 {
    if let Some(v) = decided(state, player) { return v; }
    let (own, opp) = mobility(state, player);
    if state.blank_spaces().len() > OPENING_BLANKS { own - 3.0 * opp } else { 3.0 * own - opp }
}

use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::board::{GameState, Move};
use crate::search::clock::{SearchClock, TimeBudget};
use crate::search::eval::{Evaluator, Heuristic};
use crate::search::{fallback, Agent, Decision, SearchError, SearchParams, SearchResult, Source};

/// Fixed-depth minimax without pruning.
///
/// Ties at the root keep the first move in enumeration order.
pub struct MinimaxSearcher<E = Heuristic, R = SmallRng> {
    params: SearchParams,
    evaluator: E,
    rng: R,
    nodes: u64,
}

impl MinimaxSearcher {
    pub fn from_params(params: SearchParams, seed: u64) -> Self {
        Self::new(params, params.heuristic, SmallRng::seed_from_u64(seed))
    }
}

impl<E, R: Rng> MinimaxSearcher<E, R> {
    pub fn new(params: SearchParams, evaluator: E, rng: R) -> Self {
        Self { params, evaluator, rng, nodes: 0 }
    }

    pub fn params(&self) -> &SearchParams { &self.params }

    pub fn nodes(&self) -> u64 { self.nodes }

    pub fn get_move<S, T>(&mut self, state: &S, time_left: &T) -> Move
    where
        S: GameState,
        E: Evaluator<S>,
        T: TimeBudget + ?Sized,
    {
        self.search(state, time_left).best_move
    }

    /// Search to `params.depth` and report how the move was chosen.
    ///
    /// Returns `Move::NONE` only when the side to move has no legal move. If the
    /// budget runs out before the root loop finishes, a random legal move is played.
    pub fn search<S, T>(&mut self, state: &S, time_left: &T) -> Decision
    where
        S: GameState,
        E: Evaluator<S>,
        T: TimeBudget + ?Sized,
    {
        self.nodes = 0;
        let clock = SearchClock::new(time_left, self.params.timeout_ms);
        let at_entry = clock.check();
        let legal = state.active_moves();
        if legal.is_empty() { return fallback::no_moves(); }
        if let Err(e) = at_entry {
            debug!("minimax: {e} before search started");
            return fallback::random_decision(&legal, &mut self.rng, 0);
        }

        let depth = self.params.depth.max(1);
        match self.root(state, depth, &clock) {
            Ok(r) if !r.best_move.is_none() => Decision {
                best_move: r.best_move,
                score: Some(r.score),
                depth: Some(depth),
                nodes: r.nodes,
                source: Source::Search,
            },
            Ok(_) => fallback::random_decision(&legal, &mut self.rng, self.nodes),
            Err(e) => {
                debug!("minimax depth {depth}: {e}");
                fallback::random_decision(&legal, &mut self.rng, self.nodes)
            }
        }
    }

    /// Best move and its minimax value at `depth`, for the side to move.
    ///
    /// Depth zero evaluates the root itself and returns `Move::NONE`.
    pub fn minimax<S, T>(&mut self, state: &S, depth: u32, time_left: &T) -> Result<SearchResult, SearchError>
    where
        S: GameState,
        E: Evaluator<S>,
        T: TimeBudget + ?Sized,
    {
        self.nodes = 0;
        let clock = SearchClock::new(time_left, self.params.timeout_ms);
        self.root(state, depth, &clock)
    }

    fn root<S, T>(&mut self, state: &S, depth: u32, clock: &SearchClock<'_, T>) -> Result<SearchResult, SearchError>
    where
        S: GameState,
        E: Evaluator<S>,
        T: TimeBudget + ?Sized,
    {
        clock.check()?;
        self.nodes += 1;
        let me = state.active_player();
        if depth == 0 {
            return Ok(SearchResult { best_move: Move::NONE, score: self.evaluator.score(state, me), nodes: self.nodes });
        }

        let mut best_move = Move::NONE;
        let mut best_score = f64::NEG_INFINITY;
        for mv in state.active_moves() {
            let score = self.min_value(&state.forecast(mv), depth - 1, me, clock)?;
            // Strictly better only, so the first of several equal moves stays.
            if best_move.is_none() || score > best_score {
                best_score = score;
                best_move = mv;
            }
        }
        Ok(SearchResult { best_move, score: best_score, nodes: self.nodes })
    }

    fn max_value<S, T>(&mut self, state: &S, depth: u32, me: S::Player, clock: &SearchClock<'_, T>) -> Result<f64, SearchError>
    where
        S: GameState,
        E: Evaluator<S>,
        T: TimeBudget + ?Sized,
    {
        clock.check()?;
        self.nodes += 1;
        if depth == 0 { return Ok(self.evaluator.score(state, me)); }
        let mut best = f64::NEG_INFINITY;
        for mv in state.active_moves() {
            let v = self.min_value(&state.forecast(mv), depth - 1, me, clock)?;
            if v > best { best = v; }
        }
        Ok(best)
    }

    fn min_value<S, T>(&mut self, state: &S, depth: u32, me: S::Player, clock: &SearchClock<'_, T>) -> Result<f64, SearchError>
    where
        S: GameState,
        E: Evaluator<S>,
        T: TimeBudget + ?Sized,
    {
        clock.check()?;
        self.nodes += 1;
        if depth == 0 { return Ok(self.evaluator.score(state, me)); }
        let mut best = f64::INFINITY;
        for mv in state.active_moves() {
            let v = self.max_value(&state.forecast(mv), depth - 1, me, clock)?;
            if v < best { best = v; }
        }
        Ok(best)
    }
}

impl<S, E, R> Agent<S> for MinimaxSearcher<E, R>
where
    S: GameState,
    E: Evaluator<S>,
    R: Rng,
{
    fn get_move(&mut self, state: &S, time_left: &dyn TimeBudget) -> Move {
        self.search(state, time_left).best_move
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::isolation::{Board, Player};
    use crate::search::eval::mobility_ratio;

    fn open_budget() -> f64 { 1.0e9 }

    fn corner_position() -> Board {
        Board::new(5, 5).place(Player::One, (0, 0)).place(Player::Two, (4, 4))
    }

    #[test]
    fn depth_one_visits_root_and_children() {
        let b = corner_position();
        let mut s = MinimaxSearcher::from_params(SearchParams::default(), 1);
        let r = s.minimax(&b, 1, &open_budget).unwrap();
        assert_eq!(r.nodes, 1 + b.active_moves().len() as u64);
        assert!(b.is_legal(r.best_move));
    }

    #[test]
    fn depth_zero_scores_the_root() {
        let b = corner_position();
        let mut s = MinimaxSearcher::new(SearchParams::default(), mobility_ratio::<Board>, SmallRng::seed_from_u64(0));
        let r = s.minimax(&b, 0, &open_budget).unwrap();
        assert!(r.best_move.is_none());
        assert_eq!(r.score, mobility_ratio(&b, Player::One));
    }

    #[test]
    fn picks_highest_child_value_at_depth_one() {
        let b = corner_position();
        let mut s = MinimaxSearcher::new(SearchParams::default(), mobility_ratio::<Board>, SmallRng::seed_from_u64(0));
        let r = s.minimax(&b, 1, &open_budget).unwrap();
        let best = b.active_moves().into_iter()
            .map(|m| mobility_ratio(&b.forecast(m), Player::One))
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(r.score, best);
    }

    #[test]
    fn all_losing_moves_still_returns_a_move() {
        // Both jumps lose within four plies.
        let b = Board::new(3, 3).place(Player::One, (0, 0)).place(Player::Two, (0, 1));
        let mut s = MinimaxSearcher::from_params(SearchParams { depth: 4, ..SearchParams::default() }, 0);
        let d = s.search(&b, &open_budget);
        assert_eq!(d.source, Source::Search);
        assert_eq!(d.best_move, b.active_moves()[0]);
        assert_eq!(d.score, Some(f64::NEG_INFINITY));
    }
}

use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::board::{GameState, Move};
use crate::search::clock::{SearchClock, TimeBudget};
use crate::search::eval::{Evaluator, Heuristic};
use crate::search::{fallback, Agent, Decision, SearchError, SearchParams, SearchResult, Source};

/// Iterative-deepening alpha-beta.
///
/// Each depth is searched from scratch; only a fully completed depth replaces the
/// previous answer. Ties at the root go to the last move in enumeration order.
pub struct AlphaBetaSearcher<E = Heuristic, R = SmallRng> {
    params: SearchParams,
    evaluator: E,
    rng: R,
    nodes: u64,
    // Set when the current iteration evaluated a non-terminal node at the depth limit.
    cut_by_depth: bool,
}

impl AlphaBetaSearcher {
    pub fn from_params(params: SearchParams, seed: u64) -> Self {
        Self::new(params, params.heuristic, SmallRng::seed_from_u64(seed))
    }
}

impl<E, R: Rng> AlphaBetaSearcher<E, R> {
    pub fn new(params: SearchParams, evaluator: E, rng: R) -> Self {
        Self { params, evaluator, rng, nodes: 0, cut_by_depth: false }
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

    /// Deepen one ply at a time while the budget stays above the threshold.
    ///
    /// Stops early at `params.max_depth`, or once an iteration never reached the
    /// depth limit (the reachable tree was exhausted and deeper passes would repeat it).
    pub fn search<S, T>(&mut self, state: &S, time_left: &T) -> Decision
    where
        S: GameState,
        E: Evaluator<S>,
        T: TimeBudget + ?Sized,
    {
        self.nodes = 0;
        let threshold = self.params.timeout_ms;
        let clock = SearchClock::new(time_left, threshold);
        let mut remaining = clock.remaining_ms();
        let legal = state.active_moves();
        if legal.is_empty() { return fallback::no_moves(); }

        let mut completed: Option<(SearchResult, u32)> = None;
        let mut depth = 1u32;
        while remaining > threshold {
            if self.params.max_depth.map_or(false, |cap| depth > cap) { break; }
            self.cut_by_depth = false;
            let before = self.nodes;
            match self.root(state, depth, f64::NEG_INFINITY, f64::INFINITY, &clock) {
                Ok(r) => {
                    // `r.nodes` counts every iteration so far.
                    debug!(
                        "alphabeta depth {depth}: best {} score {} nodes {} (total {})",
                        r.best_move, r.score, r.nodes - before, r.nodes
                    );
                    completed = Some((r, depth));
                    if !self.cut_by_depth {
                        debug!("alphabeta depth {depth}: tree exhausted");
                        break;
                    }
                }
                Err(e) => {
                    debug!("alphabeta depth {depth} abandoned: {e}");
                    break;
                }
            }
            depth += 1;
            remaining = clock.remaining_ms();
        }

        match completed {
            Some((r, d)) if !r.best_move.is_none() => Decision {
                best_move: r.best_move,
                score: Some(r.score),
                depth: Some(d),
                nodes: self.nodes,
                source: Source::Search,
            },
            _ => fallback::random_decision(&legal, &mut self.rng, self.nodes),
        }
    }

    /// Full-window search at a fixed depth.
    pub fn search_depth<S, T>(&mut self, state: &S, depth: u32, time_left: &T) -> Result<SearchResult, SearchError>
    where
        S: GameState,
        E: Evaluator<S>,
        T: TimeBudget + ?Sized,
    {
        self.alphabeta(state, depth, f64::NEG_INFINITY, f64::INFINITY, time_left)
    }

    /// Alpha-beta from the side to move's point of view within `(alpha, beta)`.
    ///
    /// Depth zero scores the root; no legal moves yields `Move::NONE`. Once the best
    /// value reaches `beta` the remaining root moves are skipped.
    pub fn alphabeta<S, T>(
        &mut self,
        state: &S,
        depth: u32,
        alpha: f64,
        beta: f64,
        time_left: &T,
    ) -> Result<SearchResult, SearchError>
    where
        S: GameState,
        E: Evaluator<S>,
        T: TimeBudget + ?Sized,
    {
        self.nodes = 0;
        self.cut_by_depth = false;
        let clock = SearchClock::new(time_left, self.params.timeout_ms);
        self.root(state, depth, alpha, beta, &clock)
    }

    fn root<S, T>(
        &mut self,
        state: &S,
        depth: u32,
        mut alpha: f64,
        beta: f64,
        clock: &SearchClock<'_, T>,
    ) -> Result<SearchResult, SearchError>
    where
        S: GameState,
        E: Evaluator<S>,
        T: TimeBudget + ?Sized,
    {
        clock.check()?;
        self.nodes += 1;
        let me = state.active_player();
        if depth == 0 {
            self.cut_by_depth = true;
            return Ok(SearchResult { best_move: Move::NONE, score: self.evaluator.score(state, me), nodes: self.nodes });
        }
        let moves = state.active_moves();
        if moves.is_empty() {
            return Ok(SearchResult { best_move: Move::NONE, score: self.evaluator.score(state, me), nodes: self.nodes });
        }

        let mut best_move = Move::NONE;
        let mut best_val = f64::NEG_INFINITY;
        for mv in moves {
            let val = self.min_val(&state.forecast(mv), depth - 1, alpha, beta, me, clock)?;
            // Equal values replace: the last of several tied moves wins.
            if val >= best_val {
                best_val = val;
                best_move = mv;
            }
            if best_val >= beta { break; }
            alpha = alpha.max(best_val);
        }
        Ok(SearchResult { best_move, score: best_val, nodes: self.nodes })
    }

    fn min_val<S, T>(
        &mut self,
        state: &S,
        depth: u32,
        alpha: f64,
        mut beta: f64,
        me: S::Player,
        clock: &SearchClock<'_, T>,
    ) -> Result<f64, SearchError>
    where
        S: GameState,
        E: Evaluator<S>,
        T: TimeBudget + ?Sized,
    {
        clock.check()?;
        self.nodes += 1;
        let moves = state.active_moves();
        // No moves and depth limit share one exit; the evaluator detects wins and losses.
        if moves.is_empty() || depth == 0 {
            self.cut_by_depth |= !moves.is_empty();
            return Ok(self.evaluator.score(state, me));
        }
        let mut best = f64::INFINITY;
        for mv in moves {
            best = best.min(self.max_val(&state.forecast(mv), depth - 1, alpha, beta, me, clock)?);
            if best <= alpha { return Ok(best); }
            beta = beta.min(best);
        }
        Ok(best)
    }

    fn max_val<S, T>(
        &mut self,
        state: &S,
        depth: u32,
        mut alpha: f64,
        beta: f64,
        me: S::Player,
        clock: &SearchClock<'_, T>,
    ) -> Result<f64, SearchError>
    where
        S: GameState,
        E: Evaluator<S>,
        T: TimeBudget + ?Sized,
    {
        clock.check()?;
        self.nodes += 1;
        let moves = state.active_moves();
        if moves.is_empty() || depth == 0 {
            self.cut_by_depth |= !moves.is_empty();
            return Ok(self.evaluator.score(state, me));
        }
        let mut best = f64::NEG_INFINITY;
        for mv in moves {
            best = best.max(self.min_val(&state.forecast(mv), depth - 1, alpha, beta, me, clock)?);
            if best >= beta { return Ok(best); }
            alpha = alpha.max(best);
        }
        Ok(best)
    }
}

impl<S, E, R> Agent<S> for AlphaBetaSearcher<E, R>
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
    fn depth_zero_scores_the_root() {
        let b = corner_position();
        let mut s = AlphaBetaSearcher::new(SearchParams::default(), mobility_ratio::<Board>, SmallRng::seed_from_u64(0));
        let r = s.search_depth(&b, 0, &open_budget).unwrap();
        assert!(r.best_move.is_none());
        assert_eq!(r.score, mobility_ratio(&b, Player::One));
    }

    #[test]
    fn root_without_moves_returns_sentinel() {
        let b = Board::new(3, 3).place(Player::One, (0, 0)).place(Player::Two, (2, 2)).block((1, 2)).block((2, 1));
        let mut s = AlphaBetaSearcher::from_params(SearchParams::default(), 0);
        let r = s.search_depth(&b, 3, &open_budget).unwrap();
        assert!(r.best_move.is_none());
        assert_eq!(r.score, f64::NEG_INFINITY);
    }

    #[test]
    fn root_beta_cutoff_skips_remaining_moves() {
        let b = corner_position();
        let mut s = AlphaBetaSearcher::new(SearchParams::default(), |_: &Board, _: Player| 0.0, SmallRng::seed_from_u64(0));
        let r = s.alphabeta(&b, 1, f64::NEG_INFINITY, -1.0, &open_budget).unwrap();
        assert_eq!(r.best_move, b.active_moves()[0]);
        // Root plus the first child only.
        assert_eq!(r.nodes, 2);
    }

    #[test]
    fn max_depth_caps_iterative_deepening() {
        let b = Board::new(7, 7).place(Player::One, (3, 3)).place(Player::Two, (0, 0));
        let params = SearchParams { max_depth: Some(2), ..SearchParams::default() };
        let mut s = AlphaBetaSearcher::from_params(params, 0);
        let d = s.search(&b, &open_budget);
        assert_eq!(d.source, Source::Search);
        assert_eq!(d.depth, Some(2));
    }

    #[test]
    fn iterative_node_count_sums_every_depth() {
        let b = Board::new(7, 7).place(Player::One, (3, 3)).place(Player::Two, (0, 0));
        let params = SearchParams { max_depth: Some(3), ..SearchParams::default() };
        let d = AlphaBetaSearcher::from_params(params, 0).search(&b, &open_budget);
        let per_depth: u64 = (1..=3)
            .map(|depth| AlphaBetaSearcher::from_params(params, 0).search_depth(&b, depth, &open_budget).unwrap().nodes)
            .sum();
        assert_eq!(d.depth, Some(3));
        assert_eq!(d.nodes, per_depth);
    }

    #[test]
    fn exhausted_tree_stops_deepening() {
        // Every line ends within four plies on this board.
        let b = Board::new(3, 3).place(Player::One, (0, 0)).place(Player::Two, (0, 1));
        let mut s = AlphaBetaSearcher::from_params(SearchParams::default(), 0);
        let d = s.search(&b, &open_budget);
        assert_eq!(d.source, Source::Search);
        assert_eq!(d.score, Some(f64::NEG_INFINITY));
        assert!(d.depth.map_or(false, |x| x <= 6), "kept deepening: {:?}", d.depth);
    }
}
